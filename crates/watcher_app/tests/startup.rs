use std::path::Path;
use std::process::{Command, Output};

/// Runs the binary with only `vars` set, from a directory without a `.env`.
fn run_watcher(dir: &Path, vars: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_review-watcher"))
        .env_clear()
        .envs(vars.iter().copied())
        .current_dir(dir)
        .output()
        .expect("binary runs")
}

fn combined(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn missing_secrets_exit_with_status_one() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = run_watcher(dir.path(), &[("WATCHER_LOG", "terminal")]);
    let text = combined(&output);

    assert_eq!(output.status.code(), Some(1), "output: {text}");
    assert!(text.contains("CRITICAL"), "output: {text}");
    for name in ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"] {
        assert!(text.contains(name), "{name} not reported: {text}");
    }
    assert!(!text.contains("watching review status"), "loop started: {text}");
}

#[test]
fn only_absent_secrets_are_named() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = run_watcher(
        dir.path(),
        &[("WATCHER_LOG", "terminal"), ("PRACTICUM_TOKEN", "y0_practicum")],
    );
    let text = combined(&output);

    assert_eq!(output.status.code(), Some(1), "output: {text}");
    assert!(text.contains("TELEGRAM_TOKEN, TELEGRAM_CHAT_ID"), "output: {text}");
    assert!(!text.contains("PRACTICUM_TOKEN"), "output: {text}");
}

#[test]
fn unopenable_log_file_still_reports_to_terminal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let log_path = dir.path().to_string_lossy().into_owned();
    let output = run_watcher(
        dir.path(),
        &[("WATCHER_LOG", "file"), ("WATCHER_LOG_FILE", log_path.as_str())],
    );
    let text = combined(&output);

    assert_eq!(output.status.code(), Some(1), "output: {text}");
    assert!(text.contains("CRITICAL"), "output: {text}");
    assert!(text.contains("TELEGRAM_CHAT_ID"), "output: {text}");
}
