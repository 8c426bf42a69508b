//! CLI tests for the `tr` binary
//!
//! Every command runs inside a scratch directory with its own config and
//! data locations so nothing on the host leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PREFS: &str = r#"
fullName: Asha Rao
email: asha@example.com
origin: Mumbai
destination: Goa
startDate: 2099-03-10
endDate: 2099-03-12
travelMode: Train
budget: Flexible
travellerType: group
groupSize: "4"
interests: [Foodie, Nature]
pace: 3
"#;

fn tr(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tr").unwrap();
    cmd.current_dir(home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("GEMINI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn write_prefs(home: &TempDir) -> std::path::PathBuf {
    let path = home.path().join("trip.yml");
    std::fs::write(&path, PREFS).unwrap();
    path
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    tr(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("prompt"))
        .stdout(predicate::str::contains("cities"));
}

#[test]
fn test_cities_prefix() {
    let home = TempDir::new().unwrap();
    tr(&home)
        .args(["cities", "k"])
        .assert()
        .success()
        .stdout("Kolkata\nKanpur\nKochi\n");
}

#[test]
fn test_cities_no_match_prints_nothing() {
    let home = TempDir::new().unwrap();
    tr(&home).args(["cities", "zz"]).assert().success().stdout("");
}

#[test]
fn test_schema_is_json() {
    let home = TempDir::new().unwrap();
    let output = tr(&home).arg("schema").output().unwrap();
    assert!(output.status.success());

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["type"], "OBJECT");
    assert!(schema["required"].as_array().unwrap().iter().any(|v| v == "itinerary"));
}

#[test]
fn test_prompt_renders_preferences() {
    let home = TempDir::new().unwrap();
    let prefs = write_prefs(&home);
    tr(&home)
        .arg("prompt")
        .arg(&prefs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Asha Rao"))
        .stdout(predicate::str::contains("Mumbai"))
        .stdout(predicate::str::contains("Group Size Range: 4"))
        .stdout(predicate::str::contains("Foodie, Nature"));
}

#[test]
fn test_prompt_uses_project_override() {
    let home = TempDir::new().unwrap();
    let prefs = write_prefs(&home);
    let dir = home.path().join(".travelrad/prompts");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("itinerary.pmt"), "Trip to {{destination}} please").unwrap();

    tr(&home)
        .arg("prompt")
        .arg(&prefs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Trip to Goa please"));
}

#[test]
fn test_prompt_missing_file_fails() {
    let home = TempDir::new().unwrap();
    tr(&home)
        .args(["prompt", "absent.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.yml"));
}

#[test]
fn test_unknown_interest_is_rejected() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("trip.yml");
    std::fs::write(&path, PREFS.replace("[Foodie, Nature]", "[Foodie, Shopping]")).unwrap();
    tr(&home)
        .arg("prompt")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("interest \"Shopping\""));
}

#[test]
fn test_interest_case_is_forgiven() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("trip.yml");
    std::fs::write(&path, PREFS.replace("[Foodie, Nature]", "[foodie, Nature]")).unwrap();
    tr(&home).arg("prompt").arg(&path).assert().success();
}

#[test]
fn test_plan_without_key_names_variable() {
    let home = TempDir::new().unwrap();
    let prefs = write_prefs(&home);
    tr(&home)
        .arg("plan")
        .arg(&prefs)
        .arg("--agree-terms")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn test_plan_honours_configured_key_variable() {
    let home = TempDir::new().unwrap();
    let prefs = write_prefs(&home);
    std::fs::write(home.path().join(".travelrad.yml"), "llm:\n  api-key-env: TRAVELRAD_CLI_TEST_KEY\n").unwrap();

    tr(&home)
        .env_remove("TRAVELRAD_CLI_TEST_KEY")
        .arg("plan")
        .arg(&prefs)
        .assert()
        .failure()
        .stderr(predicate::str::contains("TRAVELRAD_CLI_TEST_KEY"));
}

#[test]
fn test_bad_explicit_config_fails() {
    let home = TempDir::new().unwrap();
    tr(&home)
        .args(["--config", "nope.yml", "schema"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.yml"));
}
