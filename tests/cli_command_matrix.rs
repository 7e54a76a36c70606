use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn help_text(home: &TempDir) -> String {
    let out = cargo_bin_cmd!("trackpush")
        .env_clear()
        .env("HOME", home.path())
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(out).expect("utf8 help")
}

#[test]
fn help_lists_every_input() {
    let home = TempDir::new().expect("temp home");
    let help = help_text(&home);
    for flag in [
        "--registry-token",
        "--github-token",
        "--track",
        "--default-branch",
        "--input",
        "--event-name",
        "--ref-name",
        "--ref-type",
        "--sha",
        "--repository",
        "--github-api-url",
        "--registry-url",
        "--timeout-secs",
    ] {
        assert!(help.contains(flag), "help is missing {flag}");
    }
}

#[test]
fn help_hides_token_values() {
    let home = TempDir::new().expect("temp home");
    cargo_bin_cmd!("trackpush")
        .env_clear()
        .env("HOME", home.path())
        .env("INPUT_REGISTRY_TOKEN", "s3cret-value")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("s3cret-value").not());
}

#[test]
fn version_flag_works() {
    let home = TempDir::new().expect("temp home");
    cargo_bin_cmd!("trackpush")
        .env_clear()
        .env("HOME", home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("trackpush"));
}
