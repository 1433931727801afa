#![allow(dead_code)]

use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

pub const CSV_HEADER: &str = "gradeName,subjectName,topicName,title,description,timeLimit,passingScore,question,points,order,option1_text,option1_isCorrect,option1_explanation,option2_text,option2_isCorrect,option2_explanation,option3_text,option3_isCorrect,option3_explanation,option4_text,option4_isCorrect,option4_explanation";

pub fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

pub fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_quizloadd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn quizloadd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

pub fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

pub fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().expect("result")
}

pub fn error_code(value: &serde_json::Value) -> Option<&str> {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
}

/// Inserts Grade 5 > Math > Fractions directly into the workspace database.
/// Returns the topic id.
pub fn seed_hierarchy(workspace: &Path) -> String {
    let conn = rusqlite::Connection::open(workspace.join("quizbank.sqlite3")).expect("open db");
    conn.execute_batch(
        "INSERT INTO grades(id, name) VALUES('g5', 'Grade 5');
         INSERT INTO subjects(id, grade_id, name) VALUES('s-math', 'g5', 'Math');
         INSERT INTO topics(id, subject_id, title) VALUES('t-fractions', 's-math', 'Fractions');",
    )
    .expect("seed hierarchy");
    "t-fractions".to_string()
}

pub fn quiz_row(topic: &str, question: &str) -> serde_json::Value {
    json!({
        "gradeName": "Grade 5",
        "subjectName": "Math",
        "topicName": topic,
        "title": "Quiz 1",
        "description": "",
        "timeLimit": "30",
        "passingScore": "",
        "question": question,
        "points": 10,
        "order": 1,
        "option1_text": "2", "option1_isCorrect": "TRUE", "option1_explanation": "half of 4",
        "option2_text": "3", "option2_isCorrect": "FALSE", "option2_explanation": null,
        "option3_text": "4", "option3_isCorrect": "", "option3_explanation": null,
        "option4_text": "8", "option4_isCorrect": "false", "option4_explanation": null,
    })
}
