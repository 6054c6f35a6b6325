#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const TEMPLATE: &str = "To: {to_email}\nSubject: Secret Santa {year}\n\nHi {santa}, you gift {giftee}.\n{signoff_name}\n";

fn write_fixtures(dir: &Path, santas: &str) {
    fs::write(dir.join("email_template.txt"), TEMPLATE).unwrap();
    fs::write(dir.join("santas.txt"), santas).unwrap();
}

fn santa_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("secret-santa").unwrap();
    cmd.current_dir(dir)
        .env("SANTA_MAILER_ACCOUNT_EMAIL", "north.pole@x.org")
        .env("SANTA_MAILER_ACCOUNT_TOKEN", "s3cret")
        .env("SANTA_EMAIL_SIGNOFF_NAME", "Rudolph");
    cmd
}

#[test]
fn dry_run_lists_santas_without_revealing_giftees() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path(), "email name\na@x.org A\nb@x.org B\nc@x.org C\n");

    santa_cmd(dir.path())
        .args(["--dry-run", "--seed", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would email A <a@x.org>"))
        .stdout(predicate::str::contains("would email C <c@x.org>"))
        .stdout(predicate::str::contains("gift").not());
}

#[test]
fn missing_template_is_fatal() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("santas.txt"), "email name\na@x.org A\n").unwrap();

    santa_cmd(dir.path())
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading email template"));
}

#[test]
fn missing_credentials_are_fatal() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path(), "email name\na@x.org A\nb@x.org B\n");

    santa_cmd(dir.path())
        .env_remove("SANTA_MAILER_ACCOUNT_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "missing environment variable SANTA_MAILER_ACCOUNT_TOKEN",
        ));
}

#[test]
fn single_santa_is_fatal() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path(), "email name\na@x.org A\n");

    santa_cmd(dir.path())
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient participants"));
}

#[test]
fn positional_file_with_custom_delimiter() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("email_template.txt"), "{} gifts {}").unwrap();
    fs::write(dir.path().join("people.csv"), "a@x.org;A\nb@x.org;B\n").unwrap();

    santa_cmd(dir.path())
        .args([
            "--dry-run",
            "--positional",
            "--delimiter",
            ";",
            "--santas",
            "people.csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("would email B <b@x.org>"));
}
