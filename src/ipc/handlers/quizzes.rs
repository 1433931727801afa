use crate::batch;
use crate::error::LoadError;
use crate::ipc::error::{err, load_failed, no_workspace, ok};
use crate::ipc::types::{AppState, Request};
use crate::record::RawRecord;
use crate::source;
use serde_json::json;
use std::path::PathBuf;

fn run_import(state: &mut AppState, req: &Request, records: Vec<RawRecord>) -> serde_json::Value {
    let Some(conn) = state.db.as_mut() else {
        return no_workspace(&req.id);
    };

    tracing::info!(records = records.len(), "quiz import started");
    match batch::import_records(conn, records) {
        Ok(report) => match serde_json::to_value(&report) {
            Ok(v) => ok(&req.id, v),
            Err(e) => err(&req.id, "internal", e.to_string(), None),
        },
        Err(LoadError::Store(e)) => {
            tracing::error!(error = %e, "quiz import aborted; nothing committed");
            load_failed(&req.id, &e)
        }
        // Row-scoped errors never escape the batch loop.
        Err(e) => err(&req.id, "internal", e.to_string(), None),
    }
}

fn handle_quizzes_import_csv(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return no_workspace(&req.id);
    }
    let Some(csv_path) = req
        .params
        .get("csvPath")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
    else {
        return err(&req.id, "bad_params", "missing csvPath", None);
    };

    let records = match source::read_csv_path(&csv_path) {
        Ok(v) => v,
        Err(e) => {
            return err(
                &req.id,
                "csv_read_failed",
                e.to_string(),
                Some(json!({ "csvPath": csv_path.to_string_lossy() })),
            )
        }
    };
    run_import(state, req, records)
}

fn handle_quizzes_import_rows(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return no_workspace(&req.id);
    }
    let Some(rows) = req.params.get("rows").and_then(|v| v.as_array()) else {
        return err(&req.id, "bad_params", "missing rows", None);
    };
    let records = match source::read_json_rows(rows) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    run_import(state, req, records)
}

fn handle_quizzes_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return no_workspace(&req.id);
    };
    let topic_id = match req.params.get("topicId").and_then(|v| v.as_str()) {
        Some(v) => v.to_string(),
        None => return err(&req.id, "bad_params", "missing topicId", None),
    };

    let mut stmt = match conn.prepare(
        "SELECT id, title, description, time_limit, passing_score, question, points, sort_order,
                option1_text, option1_is_correct, option1_explanation,
                option2_text, option2_is_correct, option2_explanation,
                option3_text, option3_is_correct, option3_explanation,
                option4_text, option4_is_correct, option4_explanation,
                created_at, updated_at
         FROM quizzes
         WHERE topic_id = ?
         ORDER BY rowid",
    ) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let rows = stmt
        .query_map([&topic_id], |row| {
            let mut options = Vec::with_capacity(4);
            for n in 0..4 {
                let base = 8 + n * 3;
                let text: String = row.get(base)?;
                let is_correct: bool = row.get(base + 1)?;
                let explanation: String = row.get(base + 2)?;
                options.push(json!({
                    "text": text,
                    "isCorrect": is_correct,
                    "explanation": explanation,
                }));
            }
            Ok(json!({
                "id": row.get::<_, String>(0)?,
                "title": row.get::<_, String>(1)?,
                "description": row.get::<_, String>(2)?,
                "timeLimit": row.get::<_, i64>(3)?,
                "passingScore": row.get::<_, i64>(4)?,
                "question": row.get::<_, String>(5)?,
                "points": row.get::<_, String>(6)?,
                "order": row.get::<_, String>(7)?,
                "options": options,
                "createdAt": row.get::<_, String>(20)?,
                "updatedAt": row.get::<_, String>(21)?,
            }))
        })
        .and_then(|it| it.collect::<Result<Vec<_>, _>>());

    match rows {
        Ok(quizzes) => ok(&req.id, json!({ "topicId": topic_id, "quizzes": quizzes })),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "quizzes.importCsv" => Some(handle_quizzes_import_csv(state, req)),
        "quizzes.importRows" => Some(handle_quizzes_import_rows(state, req)),
        "quizzes.list" => Some(handle_quizzes_list(state, req)),
        _ => None,
    }
}
