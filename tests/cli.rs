use assert_cmd::Command;
use predicates::prelude::*;

fn sona(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("sona").unwrap();
    // Isolate config and output locations from the real user environment
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("ASSEMBLYAI_API_KEY")
        .current_dir(home);
    cmd
}

#[test]
fn help_lists_subcommands() {
    let home = tempfile::tempdir().unwrap();
    sona(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("transcribe"))
        .stdout(predicate::str::contains("models"));
}

#[test]
fn models_lists_speech_models() {
    let home = tempfile::tempdir().unwrap();
    sona(home.path())
        .arg("models")
        .assert()
        .success()
        .stdout(predicate::str::contains("slam-1"))
        .stdout(predicate::str::contains("nano"));
}

#[test]
fn transcribe_without_api_key_fails_with_hint() {
    let home = tempfile::tempdir().unwrap();
    sona(home.path())
        .args(["transcribe", "./clip.mp3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ASSEMBLYAI_API_KEY"));
}

#[test]
fn transcribe_missing_file_fails_before_upload() {
    let home = tempfile::tempdir().unwrap();
    sona(home.path())
        .env("ASSEMBLYAI_API_KEY", "dummy-key")
        .args(["transcribe", "./definitely-missing.mp3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn config_show_masks_state() {
    let home = tempfile::tempdir().unwrap();
    sona(home.path())
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current Configuration"))
        .stdout(predicate::str::contains("slam-1"));
}
