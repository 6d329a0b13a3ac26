use assert_cmd::Command;

#[test]
fn short_run_writes_reports() {
    let temp_dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("episim-cli")
        .unwrap()
        .args(["--days", "30", "--output-dir"])
        .arg(temp_dir.path())
        .assert()
        .success();

    let series = std::fs::read_to_string(temp_dir.path().join("time_series.csv")).unwrap();
    // header plus one row per simulated day
    assert_eq!(series.lines().count(), 31);
    assert!(temp_dir.path().join("policy_log.csv").exists());
}

#[test]
fn pathogen_preset_is_announced() {
    let output = Command::cargo_bin("episim-cli")
        .unwrap()
        .args(["--days", "5", "--pathogen", "measles"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Measles"));
    assert!(stdout.contains("Simulated 5 days"));
}

#[test]
fn unknown_pathogen_fails() {
    Command::cargo_bin("episim-cli")
        .unwrap()
        .args(["--pathogen", "kuru"])
        .assert()
        .failure();
}

#[test]
fn policies_show_up_in_the_log() {
    let temp_dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("episim-cli")
        .unwrap()
        .args(["--days", "10", "--policy", "masks", "--policy", "lockdown"])
        .arg("--output-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    let log = std::fs::read_to_string(temp_dir.path().join("policy_log.csv")).unwrap();
    assert!(log.contains("masks"));
    assert!(log.contains("lockdown"));
}
