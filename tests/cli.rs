use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hearth(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hearth").unwrap();
    cmd.env("HEARTH_DATA_DIR", data_dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_line(output: &std::process::Output) -> String {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .trim_end()
        .to_string()
}

#[test]
fn test_message_round_trip() {
    let data_dir = TempDir::new().unwrap();

    let output = hearth(&data_dir)
        .args(["message", "encrypt", "--owner", "family-1", "Pizza night is on me"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let blob = stdout_line(&output);
    assert!(blob.starts_with("U2FsdGVkX1"));

    hearth(&data_dir)
        .args(["message", "decrypt", "--owner", "family-1", &blob])
        .assert()
        .success()
        .stdout("Pizza night is on me\n");
}

#[test]
fn test_legacy_message_is_printed_unchanged() {
    let data_dir = TempDir::new().unwrap();

    hearth(&data_dir)
        .args(["message", "decrypt", "--owner", "family-1", "--explain", "hello world"])
        .assert()
        .success()
        .stdout("hello world\n")
        .stderr(predicate::str::contains("passed through unchanged"));
}

#[test]
fn test_empty_owner_is_rejected() {
    let data_dir = TempDir::new().unwrap();

    hearth(&data_dir)
        .args(["message", "encrypt", "--owner", "", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Owner id must not be empty"));
}

#[test]
fn test_export_import_round_trip() {
    let data_dir = TempDir::new().unwrap();
    let state = data_dir.path().join("state.json");
    let archive = data_dir.path().join("backup.hearth");
    fs::write(&state, r#"{"accounts": [{"name": "Checking", "balance": 1250}]}"#).unwrap();

    hearth(&data_dir)
        .arg("export")
        .arg(&state)
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted backup written to"));

    let contents = fs::read_to_string(&archive).unwrap();
    assert!(!contents.contains("Checking"));

    hearth(&data_dir)
        .arg("import")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Checking\""));
}

#[test]
fn test_import_tampered_archive_fails() {
    let data_dir = TempDir::new().unwrap();
    let state = data_dir.path().join("state.json");
    let archive = data_dir.path().join("backup.hearth");
    fs::write(&state, r#"{"note": "a reasonably long note to span several cipher blocks"}"#)
        .unwrap();

    hearth(&data_dir)
        .arg("export")
        .arg(&state)
        .arg(&archive)
        .assert()
        .success();

    // Corrupt the archive by dropping the trailing base64 group
    let contents = fs::read_to_string(&archive).unwrap();
    let trimmed = contents.trim_end();
    fs::write(&archive, &trimmed[..trimmed.len() - 4]).unwrap();

    hearth(&data_dir)
        .arg("import")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid encrypted file or wrong key"));
}

#[test]
fn test_import_with_changed_secret_fails() {
    let data_dir = TempDir::new().unwrap();
    let state = data_dir.path().join("state.json");
    let archive = data_dir.path().join("backup.hearth");
    fs::write(&state, r#"{"level": 3}"#).unwrap();

    hearth(&data_dir)
        .arg("export")
        .arg(&state)
        .arg(&archive)
        .assert()
        .success();

    fs::write(
        data_dir.path().join("config.json"),
        r#"{"crypto": {"export_secret": "a-different-secret"}}"#,
    )
    .unwrap();

    hearth(&data_dir)
        .arg("import")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid encrypted file or wrong key"));
}

#[test]
fn test_init_and_config() {
    let data_dir = TempDir::new().unwrap();

    hearth(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
    assert!(data_dir.path().join("config.json").exists());

    hearth(&data_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Built-in secrets:   true"))
        .stdout(predicate::str::contains("hearth-local-export-secret-v1").not());
}
