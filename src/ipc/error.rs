use serde_json::json;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({ "id": id, "ok": true, "result": result })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({ "code": code, "message": message.into() });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({ "id": id, "ok": false, "error": error })
}

/// Any quiz method called before `workspace.select`.
pub fn no_workspace(id: &str) -> serde_json::Value {
    err(id, "no_workspace", "select a workspace first", None)
}

/// A store fault ended the import; the pass was rolled back.
pub fn load_failed(id: &str, e: &rusqlite::Error) -> serde_json::Value {
    err(
        id,
        "db_load_failed",
        e.to_string(),
        Some(json!({ "committed": false })),
    )
}
