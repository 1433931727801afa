use rusqlite::{params, params_from_iter, Connection};

/// A natural-key lookup, scoped by the parent's surrogate id where the
/// hierarchy has one.
#[derive(Debug, Clone, Copy)]
pub enum NaturalKey<'a> {
    Grade { name: &'a str },
    Subject { grade_id: &'a str, name: &'a str },
    Topic { subject_id: &'a str, title: &'a str },
}

/// Result of a point lookup. `id` is the first row in store order;
/// `ambiguous` is set when the scope held more than one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub id: Option<String>,
    pub ambiguous: bool,
}

/// A fully normalized quiz row, ready to bind.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuiz {
    pub id: String,
    pub topic_id: String,
    pub title: String,
    pub description: String,
    pub time_limit: i64,
    pub passing_score: i64,
    pub question: String,
    pub points: String,
    pub order: String,
    pub options: [QuizOption; 4],
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizOption {
    pub text: String,
    pub is_correct: bool,
    pub explanation: String,
}

/// The slice of the relational store the loader needs. Implementations run
/// inside whatever transaction the caller holds.
pub trait QuizStore {
    fn find_id(&self, key: NaturalKey<'_>) -> rusqlite::Result<Lookup>;
    fn insert_quiz(&self, quiz: &NewQuiz) -> rusqlite::Result<()>;
}

impl QuizStore for Connection {
    fn find_id(&self, key: NaturalKey<'_>) -> rusqlite::Result<Lookup> {
        let (sql, args): (&str, Vec<&str>) = match key {
            NaturalKey::Grade { name } => (
                "SELECT id FROM grades WHERE name = ? ORDER BY rowid LIMIT 2",
                vec![name],
            ),
            NaturalKey::Subject { grade_id, name } => (
                "SELECT id FROM subjects WHERE grade_id = ? AND name = ?
                 ORDER BY rowid LIMIT 2",
                vec![grade_id, name],
            ),
            NaturalKey::Topic { subject_id, title } => (
                "SELECT id FROM topics WHERE subject_id = ? AND title = ?
                 ORDER BY rowid LIMIT 2",
                vec![subject_id, title],
            ),
        };

        let mut stmt = self.prepare_cached(sql)?;
        let ids = stmt
            .query_map(params_from_iter(args), |r| r.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let ambiguous = ids.len() > 1;
        Ok(Lookup {
            id: ids.into_iter().next(),
            ambiguous,
        })
    }

    fn insert_quiz(&self, q: &NewQuiz) -> rusqlite::Result<()> {
        let [o1, o2, o3, o4] = &q.options;
        let mut stmt = self.prepare_cached(
            "INSERT INTO quizzes(
               id, topic_id, title, description, time_limit, passing_score,
               question, points, sort_order,
               option1_text, option1_is_correct, option1_explanation,
               option2_text, option2_is_correct, option2_explanation,
               option3_text, option3_is_correct, option3_explanation,
               option4_text, option4_is_correct, option4_explanation,
               created_at, updated_at
             ) VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )?;
        stmt.execute(params![
            q.id,
            q.topic_id,
            q.title,
            q.description,
            q.time_limit,
            q.passing_score,
            q.question,
            q.points,
            q.order,
            o1.text,
            o1.is_correct,
            o1.explanation,
            o2.text,
            o2.is_correct,
            o2.explanation,
            o3.text,
            o3.is_correct,
            o3.explanation,
            o4.text,
            o4.is_correct,
            o4.explanation,
            q.created_at,
            q.updated_at,
        ])?;
        Ok(())
    }
}
