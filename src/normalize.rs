//! Cell coercion. Nothing here fails: bad input degrades to a default.

use crate::record::CellValue;

/// String form of the cell, "" when missing.
pub fn text(raw: &CellValue) -> String {
    raw.as_text().unwrap_or_default()
}

/// String form with every `'` doubled, for embedding inside a SQL literal.
pub fn normalize_text(raw: &CellValue) -> String {
    escape_quotes(&text(raw))
}

pub fn escape_quotes(s: &str) -> String {
    s.replace('\'', "''")
}

/// Integer value truncated toward zero; 0 when missing or non-numeric.
pub fn normalize_int(raw: &CellValue) -> i64 {
    match raw {
        CellValue::Number(f) => truncate(*f),
        CellValue::Text(s) => {
            let t = s.trim();
            if let Ok(v) = t.parse::<i64>() {
                return v;
            }
            t.parse::<f64>().map(truncate).unwrap_or(0)
        }
        CellValue::Bool(b) => i64::from(*b),
        CellValue::Missing => 0,
    }
}

fn truncate(f: f64) -> i64 {
    if f.is_finite() {
        f.trunc() as i64
    } else {
        0
    }
}

/// True iff the uppercased string form is exactly "TRUE".
pub fn normalize_bool(raw: &CellValue) -> bool {
    match raw {
        CellValue::Bool(b) => *b,
        other => other
            .as_text()
            .map(|s| s.to_uppercase() == "TRUE")
            .unwrap_or(false),
    }
}
