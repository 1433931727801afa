use crate::error::{LoadError, LoadResult};
use crate::loader::load_quiz;
use crate::record::RawRecord;
use crate::resolve::{resolve_record, Unresolved};
use crate::store::QuizStore;
use rusqlite::Connection;
use serde::Serialize;

/// Terminal state of one input record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Loaded(LoadedQuiz),
    Skipped(SkippedRecord),
    Errored(ErroredRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedQuiz {
    pub row: usize,
    pub quiz_id: String,
    pub topic_id: String,
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRecord {
    pub row: usize,
    pub reason: Unresolved,
    pub message: String,
}

/// A malformed record. `question` is `None` when the row has no usable
/// question text, in which case `row` is the only identification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErroredRecord {
    pub row: usize,
    pub question: Option<String>,
    pub column: String,
}

impl ErroredRecord {
    pub fn label(&self) -> String {
        match &self.question {
            Some(q) => q.clone(),
            None => format!("<row {}>", self.row),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub loaded: Vec<LoadedQuiz>,
    pub skipped: Vec<SkippedRecord>,
    pub errored: Vec<ErroredRecord>,
    pub committed: bool,
}

impl BatchReport {
    pub fn push(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Loaded(v) => self.loaded.push(v),
            RecordOutcome::Skipped(v) => self.skipped.push(v),
            RecordOutcome::Errored(v) => self.errored.push(v),
        }
    }

    pub fn total(&self) -> usize {
        self.loaded.len() + self.skipped.len() + self.errored.len()
    }
}

/// Resolve then load one record. Row-scoped failures become outcomes; only
/// store faults come back as `Err`.
pub fn process_record<S: QuizStore + ?Sized>(
    store: &S,
    record: &RawRecord,
) -> LoadResult<RecordOutcome> {
    let attempt = resolve_record(store, record).and_then(|resolved| match resolved {
        Ok(topic_id) => load_quiz(store, record, &topic_id).map(Ok),
        Err(reason) => Ok(Err(reason)),
    });

    match attempt {
        Ok(Ok(quiz)) => {
            tracing::info!(row = record.row, question = %quiz.question, "Insertion Successful");
            Ok(RecordOutcome::Loaded(LoadedQuiz {
                row: record.row,
                quiz_id: quiz.id,
                topic_id: quiz.topic_id,
                question: quiz.question,
            }))
        }
        Ok(Err(reason)) => {
            let message = reason.to_string();
            tracing::warn!(row = record.row, "{message}");
            Ok(RecordOutcome::Skipped(SkippedRecord {
                row: record.row,
                reason,
                message,
            }))
        }
        Err(LoadError::MissingField { column }) => {
            let errored = ErroredRecord {
                row: record.row,
                question: record.question(),
                column,
            };
            tracing::error!(
                row = record.row,
                question = %errored.label(),
                column = %errored.column,
                "malformed record"
            );
            Ok(RecordOutcome::Errored(errored))
        }
        Err(e) => Err(e),
    }
}

/// One linear pass over `records` against `store`, in input order. Does not
/// commit; the caller owns the transaction.
pub fn process_records<S, I>(store: &S, records: I) -> LoadResult<BatchReport>
where
    S: QuizStore + ?Sized,
    I: IntoIterator<Item = RawRecord>,
{
    let mut report = BatchReport::default();
    for record in records {
        report.push(process_record(store, &record)?);
    }
    Ok(report)
}

/// Runs the whole pass inside a single transaction and commits once at the
/// end. A store fault drops the transaction, discarding every insert from
/// this pass.
pub fn import_records<I>(conn: &mut Connection, records: I) -> LoadResult<BatchReport>
where
    I: IntoIterator<Item = RawRecord>,
{
    let tx = conn.transaction()?;
    let mut report = process_records::<Connection, _>(&tx, records)?;

    if !report.errored.is_empty() {
        let labels: Vec<String> = report.errored.iter().map(ErroredRecord::label).collect();
        tracing::error!(
            count = labels.len(),
            questions = ?labels,
            "Questions that could not be loaded"
        );
    }

    tx.commit()?;
    report.committed = true;
    tracing::info!(
        records = report.total(),
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        errored = report.errored.len(),
        "quiz import committed"
    );
    Ok(report)
}
