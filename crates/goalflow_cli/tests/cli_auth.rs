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

fn write_session(path: &PathBuf) {
    let content = serde_json::json!({
        "uid": "uid-1",
        "email": "user@example.com",
        "id_token": "token-abc"
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

#[test]
fn signup_without_auth_config_fails_fast() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let session_path = temp_path("cli-signup-session.json");

    let output = Command::new(exe)
        .args(["signup", "user@example.com", "secret1"])
        .env("GOALFLOW_SESSION_PATH", &session_path)
        .env_remove("GOALFLOW_AUTH_API_KEY")
        .output()
        .expect("failed to run signup command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: auth_unavailable"));
    assert!(!session_path.exists());
}

#[test]
fn login_without_auth_config_fails_fast() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let session_path = temp_path("cli-login-session.json");

    let output = Command::new(exe)
        .args(["login", "user@example.com", "secret1"])
        .env("GOALFLOW_SESSION_PATH", &session_path)
        .env_remove("GOALFLOW_AUTH_API_KEY")
        .output()
        .expect("failed to run login command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: auth_unavailable"));
}

#[test]
fn whoami_reads_the_session_file() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let session_path = temp_path("cli-whoami-session.json");
    write_session(&session_path);

    let output = Command::new(exe)
        .args(["--json", "whoami"])
        .env("GOALFLOW_SESSION_PATH", &session_path)
        .output()
        .expect("failed to run whoami command");

    std::fs::remove_file(&session_path).ok();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(parsed["email"], "user@example.com");
    assert_eq!(parsed["uid"], "uid-1");
}

#[test]
fn whoami_without_session_reports_not_signed_in() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let session_path = temp_path("cli-whoami-none.json");

    let output = Command::new(exe)
        .args(["whoami"])
        .env("GOALFLOW_SESSION_PATH", &session_path)
        .output()
        .expect("failed to run whoami command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Not signed in"));
}

#[test]
fn logout_clears_the_session_file() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let session_path = temp_path("cli-logout-session.json");
    write_session(&session_path);

    let output = Command::new(exe)
        .args(["logout"])
        .env("GOALFLOW_SESSION_PATH", &session_path)
        .env_remove("GOALFLOW_AUTH_API_KEY")
        .output()
        .expect("failed to run logout command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Signed out user@example.com"));
    assert!(!session_path.exists());
}

#[test]
fn logout_without_session_is_a_no_op() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let session_path = temp_path("cli-logout-none.json");

    let output = Command::new(exe)
        .args(["logout"])
        .env("GOALFLOW_SESSION_PATH", &session_path)
        .output()
        .expect("failed to run logout command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Not signed in"));
}

#[test]
fn signup_rejects_invalid_email_before_calling_the_provider() {
    let exe = env!("CARGO_BIN_EXE_goalflow");
    let session_path = temp_path("cli-signup-email.json");

    let output = Command::new(exe)
        .args(["signup", "not-an-email", "secret1"])
        .env("GOALFLOW_SESSION_PATH", &session_path)
        .env("GOALFLOW_AUTH_API_KEY", "test-key")
        .output()
        .expect("failed to run signup command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(!session_path.exists());
}
