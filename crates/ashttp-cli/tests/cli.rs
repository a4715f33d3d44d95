use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("ashttp"))
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> Value {
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn help_lists_query_subcommands() {
    cmd()
        .arg("query")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("decode").and(contains("commands")));
}

#[test]
fn decode_without_query_uses_example() {
    let assert = cmd().arg("query").arg("decode").assert().success();
    let json = stdout_json(&assert);
    assert_eq!(json["protocol_version"], 161);
    assert_eq!(json["command_name"], "FolderSync");
    assert_eq!(json["locale"], 2052);
    assert_eq!(json["device_id"], "9e0c42ba363b9358a2e38141f6582c5d");
    assert_eq!(json["policy_key"], 2_828_802_690u64);
    assert_eq!(json["device_type"], "WindowsMail");
    assert_eq!(json["command_params"], "");
}

#[test]
fn decode_explicit_query() {
    let assert = cmd()
        .arg("query")
        .arg("decode")
        .arg("jQEJBAV0ZXN0MQQBAAAABXBob25lcGFyYW1z")
        .arg("--pretty")
        .assert()
        .success();
    let json = stdout_json(&assert);
    assert_eq!(json["command_name"], "SendMail");
    assert_eq!(json["device_id"], "7465737431");
    assert_eq!(json["policy_key"], 1);
    assert_eq!(json["command_params"], "706172616d73");
}

#[test]
fn malformed_base64_shows_error_and_hint() {
    cmd()
        .arg("query")
        .arg("decode")
        .arg("not*base64")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("error: invalid base64 query").and(contains("hint:")));
}

#[test]
fn invalid_payload_reports_decode_error() {
    cmd()
        .arg("query")
        .arg("decode")
        .arg("jQEJBAA=")
        .assert()
        .failure()
        .stderr(contains("invalid device id length").and(contains("hint:")));
}

#[test]
fn pretty_and_compact_conflict() {
    cmd()
        .arg("query")
        .arg("decode")
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn query_and_input_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("query.txt");
    std::fs::write(&input, "jQEJBAE=").expect("write input");

    cmd()
        .arg("query")
        .arg("decode")
        .arg("jQEJBAE=")
        .arg("--input")
        .arg(input)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn input_file_with_request_url() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("request.txt");
    std::fs::write(
        &input,
        "/Microsoft-Server-ActiveSync?oQkECBCeDEK6NjuTWKLjgUH2WCxdBIIanKgLV2luZG93c01haWw=\n",
    )
    .expect("write input");

    let assert = cmd()
        .arg("query")
        .arg("decode")
        .arg("--input")
        .arg(input)
        .assert()
        .success();
    let json = stdout_json(&assert);
    assert_eq!(json["command_code"], 9);
}

#[test]
fn missing_input_file_shows_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.txt");

    cmd()
        .arg("query")
        .arg("decode")
        .arg("--input")
        .arg(missing)
        .assert()
        .failure()
        .stderr(contains("input file not found").and(contains("hint:")));
}

#[test]
fn output_file_is_written() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("nested").join("query.json");

    cmd()
        .arg("query")
        .arg("decode")
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(contains("OK:"));

    let written = std::fs::read_to_string(&output).expect("read output");
    let json: Value = serde_json::from_str(&written).expect("valid json");
    assert_eq!(json["device_type"], "WindowsMail");
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("query.json");

    cmd()
        .arg("query")
        .arg("decode")
        .arg("-o")
        .arg(output)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
}

#[test]
fn commands_lists_table() {
    cmd()
        .arg("query")
        .arg("commands")
        .assert()
        .success()
        .stdout(contains("0\tSync").and(contains("21\tResolveRecipients")));
}

#[test]
fn commands_json_has_all_entries() {
    let assert = cmd()
        .arg("query")
        .arg("commands")
        .arg("--json")
        .assert()
        .success();
    let json = stdout_json(&assert);
    let entries = json.as_array().expect("array");
    assert_eq!(entries.len(), 18);
    assert_eq!(entries[5]["code"], 9);
    assert_eq!(entries[5]["name"], "FolderSync");
}

#[test]
fn empty_query_value_is_too_short() {
    cmd()
        .arg("query")
        .arg("decode")
        .arg("/Microsoft-Server-ActiveSync?")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("query too short").and(contains("hint:")));
}

#[test]
fn decode_percent_encoded_request_url() {
    let assert = cmd()
        .arg("query")
        .arg("decode")
        .arg("/Microsoft-Server-ActiveSync?jQEJBAI%2B%2FA%3D%3D")
        .assert()
        .success();
    let json = stdout_json(&assert);
    assert_eq!(json["device_id"], "3efc");
}
