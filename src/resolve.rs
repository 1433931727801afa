use crate::error::LoadResult;
use crate::record::{RawRecord, GRADE_NAME, SUBJECT_NAME, TOPIC_NAME};
use crate::store::{NaturalKey, QuizStore};
use serde::Serialize;
use std::fmt;

/// Why a record's hierarchy could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Unresolved {
    #[serde(rename_all = "camelCase")]
    GradeNotFound { grade_name: String },
    #[serde(rename_all = "camelCase")]
    SubjectNotFound {
        subject_name: String,
        grade_name: String,
    },
    #[serde(rename_all = "camelCase")]
    TopicNotFound {
        topic_name: String,
        subject_name: String,
    },
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unresolved::GradeNotFound { grade_name } => {
                write!(f, "Grade not found for {grade_name}")
            }
            Unresolved::SubjectNotFound {
                subject_name,
                grade_name,
            } => write!(
                f,
                "Subject not found for {subject_name} under grade {grade_name}"
            ),
            Unresolved::TopicNotFound {
                topic_name,
                subject_name,
            } => write!(
                f,
                "Topic not found for {topic_name} under subject {subject_name}"
            ),
        }
    }
}

pub fn resolve_grade<S: QuizStore + ?Sized>(store: &S, name: &str) -> LoadResult<Option<String>> {
    lookup(store, NaturalKey::Grade { name })
}

pub fn resolve_subject<S: QuizStore + ?Sized>(
    store: &S,
    grade_id: &str,
    name: &str,
) -> LoadResult<Option<String>> {
    lookup(store, NaturalKey::Subject { grade_id, name })
}

pub fn resolve_topic<S: QuizStore + ?Sized>(
    store: &S,
    subject_id: &str,
    title: &str,
) -> LoadResult<Option<String>> {
    lookup(store, NaturalKey::Topic { subject_id, title })
}

fn lookup<S: QuizStore + ?Sized>(store: &S, key: NaturalKey<'_>) -> LoadResult<Option<String>> {
    let found = store.find_id(key)?;
    if found.ambiguous {
        tracing::warn!(?key, id = ?found.id, "multiple rows match; using the first");
    }
    Ok(found.id)
}

/// Grade -> Subject -> Topic for one record, stopping at the first miss.
/// Returns the topic id, or the step that failed.
pub fn resolve_record<S: QuizStore + ?Sized>(
    store: &S,
    record: &RawRecord,
) -> LoadResult<Result<String, Unresolved>> {
    let grade_name = record.key(GRADE_NAME)?;
    let Some(grade_id) = resolve_grade(store, &grade_name)? else {
        return Ok(Err(Unresolved::GradeNotFound { grade_name }));
    };

    let subject_name = record.key(SUBJECT_NAME)?;
    let Some(subject_id) = resolve_subject(store, &grade_id, &subject_name)? else {
        return Ok(Err(Unresolved::SubjectNotFound {
            subject_name,
            grade_name,
        }));
    };

    let topic_name = record.key(TOPIC_NAME)?;
    let Some(topic_id) = resolve_topic(store, &subject_id, &topic_name)? else {
        return Ok(Err(Unresolved::TopicNotFound {
            topic_name,
            subject_name,
        }));
    };

    Ok(Ok(topic_id))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db;
    use crate::error::LoadError;
    use crate::record::CellValue;
    use rusqlite::Connection;

    pub(crate) fn seeded() -> Connection {
        let conn = Connection::open_in_memory().expect("open");
        db::ensure_schema(&conn).expect("schema");
        conn.execute_batch(
            "INSERT INTO grades(id, name) VALUES('g5', 'Grade 5'), ('g6', 'Grade 6');
             INSERT INTO subjects(id, grade_id, name) VALUES('s-math5', 'g5', 'Math'), ('s-math6', 'g6', 'Math');
             INSERT INTO topics(id, subject_id, title) VALUES('t-frac5', 's-math5', 'Fractions'), ('t-frac6', 's-math6', 'Fractions');",
        )
        .expect("seed");
        conn
    }

    fn row(grade: &str, subject: &str, topic: &str) -> RawRecord {
        RawRecord::new(1)
            .with(GRADE_NAME, CellValue::from_text(grade))
            .with(SUBJECT_NAME, CellValue::from_text(subject))
            .with(TOPIC_NAME, CellValue::from_text(topic))
    }

    #[test]
    fn subject_lookup_is_scoped_to_grade() {
        let conn = seeded();
        assert_eq!(
            resolve_subject(&conn, "g6", "Math").expect("lookup"),
            Some("s-math6".to_string())
        );
        assert_eq!(resolve_subject(&conn, "g5", "Science").expect("lookup"), None);
        assert_eq!(
            resolve_topic(&conn, "s-math5", "Fractions")
                .expect("lookup")
                .as_deref(),
            Some("t-frac5")
        );
    }

    #[test]
    fn chain_resolves_to_topic() {
        let conn = seeded();
        let got = resolve_record(&conn, &row("Grade 6", "Math", "Fractions")).expect("resolve");
        assert_eq!(got, Ok("t-frac6".to_string()));
    }

    #[test]
    fn chain_stops_at_first_missing_step() {
        let conn = seeded();
        let got = resolve_record(&conn, &row("Grade 9", "Math", "Fractions")).expect("resolve");
        assert_eq!(
            got,
            Err(Unresolved::GradeNotFound {
                grade_name: "Grade 9".into()
            })
        );

        let got = resolve_record(&conn, &row("Grade 5", "History", "Fractions")).expect("resolve");
        assert_eq!(
            got.unwrap_err().to_string(),
            "Subject not found for History under grade Grade 5"
        );

        let got = resolve_record(&conn, &row("Grade 5", "Math", "Decimals")).expect("resolve");
        assert_eq!(
            got.unwrap_err().to_string(),
            "Topic not found for Decimals under subject Math"
        );
    }

    #[test]
    fn later_key_columns_are_not_read_after_a_miss() {
        let conn = seeded();
        let rec = RawRecord::new(1).with(GRADE_NAME, CellValue::from_text("Grade 9"));
        let got = resolve_record(&conn, &rec).expect("resolve");
        assert!(matches!(got, Err(Unresolved::GradeNotFound { .. })));

        let rec = RawRecord::new(1).with(GRADE_NAME, CellValue::from_text("Grade 5"));
        match resolve_record(&conn, &rec) {
            Err(LoadError::MissingField { column }) => assert_eq!(column, SUBJECT_NAME),
            other => panic!("expected missing subjectName, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_names_use_first_inserted_row() {
        let conn = seeded();
        conn.execute("INSERT INTO grades(id, name) VALUES('g5-dup', 'Grade 5')", [])
            .expect("dup");
        let found = conn.find_id(NaturalKey::Grade { name: "Grade 5" }).expect("lookup");
        assert_eq!(found.id.as_deref(), Some("g5"));
        assert!(found.ambiguous);
        assert_eq!(resolve_grade(&conn, "Grade 5").expect("lookup").as_deref(), Some("g5"));
    }
}
