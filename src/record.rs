use crate::error::{LoadError, LoadResult};

pub const GRADE_NAME: &str = "gradeName";
pub const SUBJECT_NAME: &str = "subjectName";
pub const TOPIC_NAME: &str = "topicName";
pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const TIME_LIMIT: &str = "timeLimit";
pub const PASSING_SCORE: &str = "passingScore";
pub const QUESTION: &str = "question";
pub const POINTS: &str = "points";
pub const ORDER: &str = "order";

/// Per-option column names: (text, isCorrect, explanation) for options 1..=4.
pub const OPTION_COLUMNS: [(&str, &str, &str); 4] = [
    ("option1_text", "option1_isCorrect", "option1_explanation"),
    ("option2_text", "option2_isCorrect", "option2_explanation"),
    ("option3_text", "option3_isCorrect", "option3_explanation"),
    ("option4_text", "option4_isCorrect", "option4_explanation"),
];

/// A raw, untyped cell as delivered by the tabular source.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Empty text is treated the same as an absent cell.
    pub fn from_text(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Missing
        } else {
            CellValue::Text(s.to_string())
        }
    }

    pub fn from_json(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => CellValue::Missing,
            serde_json::Value::String(s) => CellValue::from_text(s),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => CellValue::Number(f),
                None => CellValue::Text(n.to_string()),
            },
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            other => CellValue::Text(other.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Number(f) => f.is_nan(),
            _ => false,
        }
    }

    /// String form of a present cell. Integral numbers render without a
    /// fractional part.
    pub fn as_text(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        match self {
            CellValue::Missing => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    Some(format!("{}", *f as i64))
                } else {
                    Some(f.to_string())
                }
            }
            CellValue::Bool(true) => Some("True".to_string()),
            CellValue::Bool(false) => Some("False".to_string()),
        }
    }
}

/// One input row: column name to raw cell, in source column order.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    /// 1-based data row index within the pass.
    pub row: usize,
    cells: Vec<(String, CellValue)>,
}

impl RawRecord {
    pub fn new(row: usize) -> Self {
        RawRecord {
            row,
            cells: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with(mut self, column: &str, value: CellValue) -> Self {
        self.set(column, value);
        self
    }

    #[cfg(test)]
    pub fn without(mut self, column: &str) -> Self {
        self.cells.retain(|(c, _)| c != column);
        self
    }

    pub fn set(&mut self, column: &str, value: CellValue) {
        if let Some(slot) = self.cells.iter_mut().find(|(c, _)| c == column) {
            slot.1 = value;
        } else {
            self.cells.push((column.to_string(), value));
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Like [`RawRecord::get`], but an absent column is a malformed record.
    pub fn field(&self, column: &str) -> LoadResult<&CellValue> {
        self.get(column).ok_or_else(|| LoadError::missing(column))
    }

    /// Lookup key text for grade/subject/topic columns. A present-but-empty
    /// cell yields "", which simply fails to resolve.
    pub fn key(&self, column: &str) -> LoadResult<String> {
        Ok(self.field(column)?.as_text().unwrap_or_default())
    }

    /// Best available identification for diagnostics.
    pub fn question(&self) -> Option<String> {
        self.get(QUESTION).and_then(CellValue::as_text)
    }
}
