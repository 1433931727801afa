mod test_support;

use serde_json::json;
use std::io::{BufRead, Write};
use test_support::{error_code, request, request_ok, spawn_sidecar, temp_dir};

#[test]
fn router_dispatch_smoke() {
    let workspace = temp_dir("quizloadd-router-smoke");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert!(health.get("version").and_then(|v| v.as_str()).is_some());
    assert!(health["workspacePath"].is_null());

    let resp = request(&mut stdin, &mut reader, "2", "workspace.select", json!({}));
    assert_eq!(error_code(&resp), Some("bad_params"));

    let selected = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    assert!(selected["dbPath"]
        .as_str()
        .map(|p| p.ends_with("quizbank.sqlite3"))
        .unwrap_or(false));
    assert!(workspace.join("quizbank.sqlite3").is_file());

    let health = request_ok(&mut stdin, &mut reader, "4", "health", json!({}));
    assert_eq!(health["workspacePath"], json!(workspace.to_string_lossy()));

    let resp = request(&mut stdin, &mut reader, "5", "grades.create", json!({}));
    assert_eq!(error_code(&resp), Some("not_implemented"));

    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "quizzes.list",
        json!({ "topicId": "nope" }),
    );
    assert_eq!(listed["quizzes"], json!([]));
}

#[test]
fn malformed_line_gets_bad_json_reply() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    writeln!(stdin, "{{not json").expect("write");
    stdin.flush().expect("flush");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse");
    assert_eq!(value["ok"], json!(false));
    assert_eq!(error_code(&value), Some("bad_json"));

    // The sidecar keeps serving after a bad line.
    let _ = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
}
