use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "quizbank.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE_NAME);
    let conn = Connection::open(db_path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Creates the hierarchy and quiz tables when absent. Existing tables are
/// left as they are.
pub fn ensure_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS grades(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_grades_name ON grades(name)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS subjects(
            id TEXT PRIMARY KEY,
            grade_id TEXT NOT NULL,
            name TEXT NOT NULL,
            FOREIGN KEY(grade_id) REFERENCES grades(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_subjects_grade_name ON subjects(grade_id, name)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS topics(
            id TEXT PRIMARY KEY,
            subject_id TEXT NOT NULL,
            title TEXT NOT NULL,
            FOREIGN KEY(subject_id) REFERENCES subjects(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_topics_subject_title ON topics(subject_id, title)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS quizzes(
            id TEXT PRIMARY KEY,
            topic_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            time_limit INTEGER NOT NULL,
            passing_score INTEGER NOT NULL,
            question TEXT NOT NULL,
            points TEXT NOT NULL,
            sort_order TEXT NOT NULL,
            option1_text TEXT NOT NULL,
            option1_is_correct INTEGER NOT NULL,
            option1_explanation TEXT NOT NULL,
            option2_text TEXT NOT NULL,
            option2_is_correct INTEGER NOT NULL,
            option2_explanation TEXT NOT NULL,
            option3_text TEXT NOT NULL,
            option3_is_correct INTEGER NOT NULL,
            option3_explanation TEXT NOT NULL,
            option4_text TEXT NOT NULL,
            option4_is_correct INTEGER NOT NULL,
            option4_explanation TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(topic_id) REFERENCES topics(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_quizzes_topic ON quizzes(topic_id)",
        [],
    )?;

    Ok(())
}
