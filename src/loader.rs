use crate::error::LoadResult;
use crate::normalize::{escape_quotes, normalize_bool, normalize_int, normalize_text, text};
use crate::record::{
    RawRecord, DESCRIPTION, OPTION_COLUMNS, ORDER, PASSING_SCORE, POINTS, QUESTION, TIME_LIMIT,
    TITLE,
};
use crate::store::{NewQuiz, QuizOption, QuizStore};
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// Normalizes every content column of `record` into a quiz row for `topic_id`.
/// Every column must be present; the first absent one fails the record.
pub fn build_quiz(record: &RawRecord, topic_id: &str) -> LoadResult<NewQuiz> {
    let mut options: [QuizOption; 4] = Default::default();
    for (slot, (text_col, correct_col, expl_col)) in options.iter_mut().zip(OPTION_COLUMNS) {
        *slot = QuizOption {
            text: text(record.field(text_col)?),
            is_correct: normalize_bool(record.field(correct_col)?),
            explanation: text(record.field(expl_col)?),
        };
    }

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    Ok(NewQuiz {
        id: Uuid::new_v4().to_string(),
        topic_id: topic_id.to_string(),
        title: text(record.field(TITLE)?),
        description: text(record.field(DESCRIPTION)?),
        time_limit: normalize_int(record.field(TIME_LIMIT)?),
        passing_score: normalize_int(record.field(PASSING_SCORE)?),
        question: text(record.field(QUESTION)?),
        points: text(record.field(POINTS)?),
        order: text(record.field(ORDER)?),
        options,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Builds and inserts one quiz. Returns the inserted row.
pub fn load_quiz<S: QuizStore + ?Sized>(
    store: &S,
    record: &RawRecord,
    topic_id: &str,
) -> LoadResult<NewQuiz> {
    let quiz = build_quiz(record, topic_id)?;
    if tracing::enabled!(tracing::Level::TRACE) {
        tracing::trace!(sql = %render_insert(record, &quiz), "quiz insert");
    }
    store.insert_quiz(&quiz)?;
    Ok(quiz)
}

/// Literal-embedded rendering of the insert, for trace output only.
/// The store write itself binds parameters.
pub fn render_insert(record: &RawRecord, quiz: &NewQuiz) -> String {
    let lit = |col: &str| {
        record
            .get(col)
            .map(normalize_text)
            .unwrap_or_default()
    };
    let mut values = vec![
        format!("'{}'", escape_quotes(&quiz.id)),
        format!("'{}'", escape_quotes(&quiz.topic_id)),
        format!("'{}'", lit(TITLE)),
        format!("'{}'", lit(DESCRIPTION)),
        quiz.time_limit.to_string(),
        quiz.passing_score.to_string(),
        format!("'{}'", lit(QUESTION)),
        format!("'{}'", lit(POINTS)),
        format!("'{}'", lit(ORDER)),
    ];
    for ((text_col, _, expl_col), opt) in OPTION_COLUMNS.iter().zip(&quiz.options) {
        values.push(format!("'{}'", lit(*text_col)));
        values.push(if opt.is_correct { "TRUE" } else { "FALSE" }.to_string());
        values.push(format!("'{}'", lit(*expl_col)));
    }
    values.push(format!("'{}'", quiz.created_at));
    values.push(format!("'{}'", quiz.updated_at));
    format!("INSERT INTO quizzes VALUES({})", values.join(", "))
}
