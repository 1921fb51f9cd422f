use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const QUICK: &str = r#"[{
    "id": "quick",
    "name": "Quick",
    "ratio": "1-1",
    "cycles": 2,
    "steps": [
        { "phase": "inhale", "seconds": 0.02 },
        { "phase": "exhale", "seconds": 0.01 }
    ]
}]"#;

fn breathe(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("breathe").unwrap();
    cmd.env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("BREATHE_TECHNIQUES")
        .env_remove("BREATHE_LOG");
    cmd
}

#[test]
fn list_shows_builtin_techniques() {
    let home = TempDir::new().unwrap();
    breathe(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Box Breathing"))
        .stdout(predicate::str::contains("relax-478"));
}

#[test]
fn list_json() {
    let home = TempDir::new().unwrap();
    let output = breathe(&home)
        .args(["list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["count"], 5);
}

#[test]
fn show_unknown_technique_fails() {
    let home = TempDir::new().unwrap();
    breathe(&home)
        .args(["show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Technique not found: nope"));
}

#[test]
fn duration_coerces_cycles() {
    let home = TempDir::new().unwrap();
    breathe(&home)
        .args(["duration", "box", "--cycles", "-3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("00:16"));
}

#[test]
fn duration_of_default_cycles() {
    let home = TempDir::new().unwrap();
    breathe(&home)
        .args(["duration", "box"])
        .assert()
        .success()
        .stdout(predicate::str::contains("01:04"));
}

#[test]
fn run_custom_techniques_json() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("quick.json");
    fs::write(&file, QUICK).unwrap();

    breathe(&home)
        .args(["run", "--mute", "-o", "json", "--techniques"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""event":"phase""#))
        .stdout(predicate::str::contains("Inhale"))
        .stdout(predicate::str::contains(r#""phases":4"#));
}

#[test]
fn run_json_with_sound_is_line_delimited() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("quick.json");
    fs::write(&file, QUICK).unwrap();

    let output = breathe(&home)
        .args(["run", "-o", "json", "--techniques"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains('\u{7}'));
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    let last = events.last().unwrap();
    assert_eq!(last["event"], "summary");
    assert_eq!(last["phases"], 4);
    assert_eq!(
        events.iter().filter(|e| e["event"] == "phase").count(),
        4
    );

    // The bell still rings, on stderr
    assert_eq!(output.stderr.iter().filter(|&&b| b == 0x07).count(), 4);
}

#[test]
fn techniques_file_from_home() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join(".breathe")).unwrap();
    fs::write(home.path().join(".breathe").join("techniques.json"), QUICK).unwrap();

    breathe(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quick"))
        .stdout(predicate::str::contains("Box Breathing").not());
}

#[test]
fn invalid_techniques_file_fails() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("broken.json");
    fs::write(&file, "[]").unwrap();

    breathe(&home)
        .arg("list")
        .arg("--techniques")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No techniques available"));
}

#[test]
fn completions_bash() {
    let home = TempDir::new().unwrap();
    breathe(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("breathe"));
}
