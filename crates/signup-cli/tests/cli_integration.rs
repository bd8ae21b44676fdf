//! Integration tests for signup-cli
//!
//! These tests verify the CLI commands work end-to-end, using a mockito server
//! wherever the user directory is reached.
//! Tests run serially since they share environment variables.

use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use serial_test::serial;
use std::io::Write;
use tempfile::TempDir;

/// Get a Command for the signup binary with a clean environment
fn signup(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("signup").unwrap();
    cmd.env_remove("SIGNUP_API_URL")
        .env_remove("SIGNUP_TIMEOUT_SECS")
        .env_remove("SIGNUP_MAJORS_FILE")
        .env_remove("SIGNUP_EMAIL")
        .env_remove("SIGNUP_VERIFICATION_CODE")
        .env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
#[serial]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    signup(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("signup"))
        .stdout(predicate::str::contains("COMMAND").or(predicate::str::contains("Commands")));
}

#[test]
#[serial]
fn test_cli_version() {
    let home = TempDir::new().unwrap();
    signup(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("signup"));
}

#[test]
#[serial]
fn test_register_help() {
    let home = TempDir::new().unwrap();
    signup(&home)
        .args(["register", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-input"))
        .stdout(predicate::str::contains("--header"));
}

// =============================================================================
// Validate Command Tests
// =============================================================================

#[test]
#[serial]
fn test_validate_all_fields_valid() {
    let home = TempDir::new().unwrap();
    signup(&home)
        .args([
            "validate",
            "--username",
            "student1",
            "--password",
            "Passw0rd",
            "--password-again",
            "Passw0rd",
            "--first-name",
            "Gildong",
            "--last-name",
            "Hong",
            "--student-id",
            "2024123456",
            "--major",
            "College of Software",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("All fields valid"))
        .stdout(predicate::str::contains("Passw0rd").not());
}

#[test]
#[serial]
fn test_validate_reports_invalid_fields() {
    let home = TempDir::new().unwrap();
    signup(&home)
        .args([
            "validate",
            "--username",
            "Bad User",
            "--password",
            "Passw0rd",
            "--password-again",
            "Passw0rd1",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Incorrect"))
        .stderr(predicate::str::contains("field(s) invalid"));
}

#[test]
#[serial]
fn test_validate_json_output() {
    let home = TempDir::new().unwrap();
    let output = signup(&home)
        .args(["validate", "--format", "json", "--student-id", "12345"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 7);
    let student_id = rows.iter().find(|r| r["field"] == "studentId").unwrap();
    assert_eq!(student_id["result"], "only 10 numbers");
}

// =============================================================================
// Majors Command Tests
// =============================================================================

#[test]
#[serial]
fn test_majors_search() {
    let home = TempDir::new().unwrap();
    signup(&home)
        .args(["majors", "--search", "software"])
        .assert()
        .success()
        .stdout(predicate::str::contains("College of Software"))
        .stdout(predicate::str::contains("Department of Physics").not());
}

#[test]
#[serial]
fn test_majors_from_file() {
    let home = TempDir::new().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"["Department of Alchemy", "Department of Astronomy"]"#).unwrap();

    signup(&home)
        .args(["majors", "--majors-file"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Department of Alchemy"))
        .stdout(predicate::str::contains("College of Software").not());
}

#[test]
#[serial]
fn test_majors_file_missing() {
    let home = TempDir::new().unwrap();
    signup(&home)
        .args(["majors", "--majors-file", "/nonexistent/majors.json"])
        .assert()
        .failure();
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
#[serial]
fn test_config_json() {
    let home = TempDir::new().unwrap();
    signup(&home)
        .env("SIGNUP_API_URL", "https://judge.example.com/api")
        .args(["config", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://judge.example.com/api"))
        .stdout(predicate::str::contains("\"source\": \"env\""));
}

#[test]
#[serial]
fn test_config_flag_overrides_env_source() {
    let home = TempDir::new().unwrap();
    let output = signup(&home)
        .env("SIGNUP_API_URL", "https://env.example.com")
        .args(["--api-url", "https://flag.example.com", "config", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let api = rows
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["key"] == "SIGNUP_API_URL")
        .unwrap();
    assert_eq!(api["value"], "https://flag.example.com");
    assert_eq!(api["source"], "flag");
}

#[test]
#[serial]
fn test_config_rejects_bad_timeout() {
    let home = TempDir::new().unwrap();
    signup(&home)
        .env("SIGNUP_TIMEOUT_SECS", "soon")
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SIGNUP_TIMEOUT_SECS"));
}

// =============================================================================
// Check and Register Command Tests
// =============================================================================

#[test]
#[serial]
fn test_check_invalid_username_skips_network() {
    let home = TempDir::new().unwrap();
    signup(&home)
        .args(["--api-url", "http://127.0.0.1:9", "check", "AB"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("3-10 characters"));
}

#[test]
#[serial]
fn test_register_no_input_requires_values() {
    let home = TempDir::new().unwrap();
    signup(&home)
        .args([
            "--api-url",
            "http://127.0.0.1:9",
            "register",
            "--email",
            "s@skku.edu",
            "--code",
            "123456",
            "--no-input",
            "--username",
            "x",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used"));
}

#[test]
#[serial]
fn test_check_available_username() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/user/username-check")
        .match_query(Matcher::UrlEncoded("username".into(), "student1".into()))
        .with_status(200)
        .create();

    signup(&home)
        .args(["--api-url", &server.url(), "check", "student1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("available"));
    mock.assert();
}

#[test]
#[serial]
fn test_check_taken_username() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/user/username-check")
        .match_query(Matcher::UrlEncoded("username".into(), "testuser".into()))
        .with_status(409)
        .create();

    signup(&home)
        .args(["--api-url", &server.url(), "check", "testuser"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("in use"))
        .stderr(predicate::str::contains("already in use"));
    mock.assert();
}

#[test]
#[serial]
fn test_register_from_flags() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let check = server
        .mock("GET", "/user/username-check")
        .match_query(Matcher::UrlEncoded("username".into(), "student1".into()))
        .with_status(200)
        .create();
    let sign_up = server
        .mock("POST", "/user/sign-up")
        .match_header("email-auth", "token-abc")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "username": "student1",
            "realName": "Gildong Hong",
            "studentId": "2024123456",
            "major": "College of Software",
            "email": "s@skku.edu",
            "verificationCode": "123456"
        })))
        .with_status(201)
        .expect(1)
        .create();

    signup(&home)
        .args([
            "--api-url",
            &server.url(),
            "register",
            "--email",
            "s@skku.edu",
            "--code",
            "123456",
            "--header",
            "email-auth:token-abc",
            "--no-input",
            "--username",
            "student1",
            "--password",
            "Passw0rd",
            "--password-again",
            "Passw0rd",
            "--first-name",
            "Gildong",
            "--last-name",
            "Hong",
            "--student-id",
            "2024123456",
            "--major",
            "College of Software",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sign up succeeded!"))
        .stdout(predicate::str::contains("Registration complete."));
    check.assert();
    sign_up.assert();
}

#[test]
#[serial]
fn test_register_rejected_by_server() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    server
        .mock("GET", "/user/username-check")
        .match_query(Matcher::Any)
        .with_status(200)
        .create();
    let sign_up = server
        .mock("POST", "/user/sign-up")
        .with_status(400)
        .expect(1)
        .create();

    signup(&home)
        .args([
            "--api-url",
            &server.url(),
            "register",
            "--email",
            "s@skku.edu",
            "--code",
            "123456",
            "--no-input",
            "--username",
            "student1",
            "--password",
            "Passw0rd",
            "--password-again",
            "Passw0rd",
            "--first-name",
            "Gildong",
            "--last-name",
            "Hong",
            "--student-id",
            "2024123456",
            "--major",
            "College of Software",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Sign up failed!"))
        .stderr(predicate::str::contains("not accepted"));
    sign_up.assert();
}
