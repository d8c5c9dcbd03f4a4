use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gitgrade(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gitgrade").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("GITGRADE_PROVIDER")
        .env_remove("GITGRADE_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_options() {
    let home = TempDir::new().unwrap();
    gitgrade(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_invalid_url_fails_without_credentials() {
    let home = TempDir::new().unwrap();
    gitgrade(&home)
        .args(["--url", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid GitHub URL. Format: https://github.com/owner/repo",
        ));
}

#[test]
fn test_missing_api_key_is_reported() {
    let home = TempDir::new().unwrap();
    gitgrade(&home)
        .args(["--url", "octo/demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key configured"));
}

#[test]
fn test_unknown_provider_is_rejected() {
    let home = TempDir::new().unwrap();
    gitgrade(&home)
        .args(["--provider", "llama", "--url", "octo/demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown model provider"));
}

#[test]
fn test_missing_config_file_is_reported() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("nope.toml");
    gitgrade(&home)
        .arg("--config")
        .arg(&missing)
        .args(["--url", "octo/demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
