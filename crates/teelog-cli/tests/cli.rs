use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn teelog() -> Command {
    Command::cargo_bin("teelog").unwrap()
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("teelog.yml");
    fs::write(
        &path,
        format!(
            r#"base_path: {}
caller: true
sinks:
  - file: all.log
    levels: {{ min: info }}
  - file: error.log
    format: console
    levels: {{ min: error }}
"#,
            dir.display()
        ),
    )
    .unwrap();
    path
}

#[test]
fn defaults_prints_production_layout() {
    teelog()
        .arg("defaults")
        .assert()
        .success()
        .stdout(predicate::str::contains("file: all.log"))
        .stdout(predicate::str::contains("file: error.log"))
        .stdout(predicate::str::contains("max_backups: 100"));
}

#[test]
fn check_describes_sinks() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path());

    teelog()
        .arg("check")
        .arg(&config)
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 sinks"))
        .stdout(predicate::str::contains("INFO and up"))
        .stdout(predicate::str::contains("ERROR and up"));
}

#[test]
fn check_rejects_invalid_config() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("bad.yml");
    fs::write(&config, "sinks:\n  - format: json\n").unwrap();

    teelog()
        .arg("check")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("either `file` or `console`"));
}

#[test]
fn emit_writes_to_matching_sinks() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path());

    teelog()
        .args(["emit", "--config"])
        .arg(&config)
        .args(["--level", "warn", "--field", "port=8080", "disk almost full"])
        .assert()
        .success();

    let all = fs::read_to_string(tmp.path().join("all.log")).unwrap();
    let record: serde_json::Value = serde_json::from_str(all.trim()).unwrap();
    assert_eq!(record["level"], "WARN");
    assert_eq!(record["msg"], "disk almost full");
    assert_eq!(record["port"], 8080);
    assert!(record["caller"].as_str().unwrap().contains("emit.rs:"));

    assert!(!tmp.path().join("error.log").exists()
        || fs::read_to_string(tmp.path().join("error.log")).unwrap().is_empty());
}

#[test]
fn emit_fatal_exits_after_writing() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path());

    teelog()
        .args(["emit", "--config"])
        .arg(&config)
        .args(["--level", "fatal", "shutting down"])
        .assert()
        .code(1);

    let errors = fs::read_to_string(tmp.path().join("error.log")).unwrap();
    assert!(errors.contains("\tFATAL\t"));
    assert!(errors.contains("shutting down"));
}

#[test]
fn emit_rejects_unknown_level() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path());

    teelog()
        .args(["emit", "--config"])
        .arg(&config)
        .args(["--level", "verbose", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid log level"));
}
