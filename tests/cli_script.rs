use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("compass_cli").expect("binary built");
    cmd.env("COMPASS_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn scripted_session_tracks_commitments() {
    let home = TempDir::new().unwrap();

    cli(&home)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("My First Quest"));

    cli(&home)
        .args(["new", "July", "Budget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("July Budget"));

    cli(&home).args(["income", "2000"]).assert().success();

    cli(&home)
        .args(["add", "Rent", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$1,000.00"))
        .stdout(predicate::str::contains("Remaining after unpaid: $1,000.00"));

    cli(&home)
        .args(["add", "Rent", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));

    cli(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("July Budget (1 commitment)"));

    assert!(home.path().join("data").join("quests.json").exists());
}

#[test]
fn unknown_command_prints_usage() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("fly")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage: compass_cli"));
}

#[test]
fn currency_command_lists_and_switches_codes() {
    let home = TempDir::new().unwrap();

    cli(&home)
        .arg("currency")
        .assert()
        .success()
        .stdout(predicate::str::contains("* $  USD  US Dollar"))
        .stdout(predicate::str::contains("Japanese Yen"));

    cli(&home)
        .args(["currency", "eur"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Currency set to EUR (Euro)"));

    cli(&home)
        .args(["currency", "XYZ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported currency"));
}

#[test]
fn unreadable_config_is_reported_as_an_error() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("config.json"), "{ not json").unwrap();

    cli(&home)
        .arg("show")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}
