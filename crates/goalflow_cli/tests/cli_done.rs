use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("goalflow-{nanos}-{file_name}"))
}

fn write_store_with_tasks(path: &PathBuf, tasks: serde_json::Value) {
    let content = serde_json::json!({
        "schema_version": 1,
        "goals": [
            {
                "id": "goal-1",
                "goal": "learn the cello",
                "created_at": "2026-08-01T00:00:00Z",
                "tasks": tasks
            }
        ]
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn task(id: &str, completed: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": format!("task {id}"),
        "urgency": "Medium",
        "importance": "Medium",
        "due_date": "2026-09-01",
        "impact": 5.0,
        "completed": completed
    })
}

#[test]
fn done_command_toggles_completion_on() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let store_path = temp_path("cli-done.json");

    write_store_with_tasks(
        &store_path,
        serde_json::json!([task("task-1", false), task("task-2", false)]),
    );

    let output = Command::new(exe)
        .args(["done", "goal-1", "task-1"])
        .env("GOALFLOW_STORE_PATH", &store_path)
        .output()
        .expect("failed to run done command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Completed task:"));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    let tasks = &stored["goals"][0]["tasks"];
    assert_eq!(tasks[0]["completed"], true);
    assert_eq!(tasks[1]["completed"], false);
}

#[test]
fn done_command_twice_restores_original_state() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let store_path = temp_path("cli-done-twice.json");

    write_store_with_tasks(&store_path, serde_json::json!([task("task-1", false)]));
    let before = std::fs::read_to_string(&store_path).unwrap();

    for _ in 0..2 {
        let output = Command::new(exe)
            .args(["done", "goal-1", "task-1"])
            .env("GOALFLOW_STORE_PATH", &store_path)
            .output()
            .expect("failed to run done command");
        assert!(output.status.success());
    }

    let after = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert_eq!(before, after);
}

#[test]
fn done_command_reopens_completed_task() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let store_path = temp_path("cli-done-reopen.json");

    write_store_with_tasks(&store_path, serde_json::json!([task("task-1", true)]));

    let output = Command::new(exe)
        .args(["done", "goal-1", "task-1"])
        .env("GOALFLOW_STORE_PATH", &store_path)
        .output()
        .expect("failed to run done command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Reopened task:"));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert_eq!(stored["goals"][0]["tasks"][0]["completed"], false);
}

#[test]
fn done_command_missing_task_is_a_no_op() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let store_path = temp_path("cli-done-missing.json");

    write_store_with_tasks(&store_path, serde_json::json!([task("task-1", false)]));
    let before = std::fs::read_to_string(&store_path).unwrap();

    let output = Command::new(exe)
        .args(["done", "goal-1", "task-9"])
        .env("GOALFLOW_STORE_PATH", &store_path)
        .output()
        .expect("failed to run done command");

    let after = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No matching task: task-9"));
    assert_eq!(before, after);
}

#[test]
fn progress_command_follows_completion() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let store_path = temp_path("cli-progress.json");

    write_store_with_tasks(
        &store_path,
        serde_json::json!([task("task-1", true), task("task-2", false)]),
    );

    let output = Command::new(exe)
        .args(["--json", "progress", "goal-1"])
        .env("GOALFLOW_STORE_PATH", &store_path)
        .output()
        .expect("failed to run progress command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(parsed["progress"], 50.0);
}

#[test]
fn progress_command_empty_goal_is_zero() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let store_path = temp_path("cli-progress-empty.json");

    write_store_with_tasks(&store_path, serde_json::json!([]));

    let output = Command::new(exe)
        .args(["progress", "goal-1"])
        .env("GOALFLOW_STORE_PATH", &store_path)
        .output()
        .expect("failed to run progress command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Progress: 0%"));
}
