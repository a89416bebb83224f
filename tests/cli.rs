use std::process::Command;
use tempfile::TempDir;

fn boefje() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_boefje"));
    cmd.env_remove("BOEFJE_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_validate_accepts_good_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("boefje.yaml");
    std::fs::write(
        &path,
        "scanner:\n  kind: template\n  program: /usr/bin/testssl.sh\n  args: ['--jsonfile', '{output_file}', '{host}:{port}']\n  expect_json: true\napi:\n  user_agent: OpenKAT\n",
    )
    .unwrap();

    let output = boefje().arg("validate").arg(&path).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"));
    assert!(stdout.contains("testssl.sh"));
}

#[test]
fn test_validate_rejects_bad_config_with_exit_code_2() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("boefje.yaml");
    std::fs::write(&path, "scanner:\n  kind: nmap\n").unwrap();

    let output = boefje().arg("validate").arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_validate_directory_exits_2() {
    let dir = TempDir::new().unwrap();
    let output = boefje().arg("validate").arg(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot read config"));
}

#[test]
fn test_validate_rejects_placeholder_typo() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("boefje.yaml");
    std::fs::write(
        &path,
        "scanner:\n  kind: template\n  program: /usr/bin/wpscan\n  args: ['--url', '{Url}']\n",
    )
    .unwrap();

    let output = boefje().arg("validate").arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("{Url}"));
}

#[test]
fn test_run_with_unreachable_task_exits_3() {
    let dir = TempDir::new().unwrap();
    let output = boefje()
        .arg("run")
        .arg("--work-dir")
        .arg(dir.path())
        .arg("http://127.0.0.1:1/api/v0/tasks/unreachable")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to fetch task"));
}

#[test]
fn test_json_logs_flag() {
    let output = boefje()
        .args(["--json-logs", "run", "http://127.0.0.1:1/task"])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    let first = stderr.lines().next().unwrap_or_default();
    let parsed: serde_json::Value = serde_json::from_str(first).unwrap();
    assert_eq!(parsed["fields"]["message"], "boefje starting");
}
