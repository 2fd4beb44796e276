//! End-to-end tests driving the handler binary against a mock Vonage API.

mod helpers;

use helpers::{event_json, handler_cmd, mock_vonage, vonage_body};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread")]
async fn test_sends_formatted_alert_and_prints_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/json"))
        .and(body_string_contains("api_key=key"))
        .and(body_string_contains("api_secret=secret"))
        .and(body_string_contains("from=Sensu+Go"))
        .and(body_string_contains("to=15550001%2C15550002"))
        .and(body_string_contains(
            "text=ALERT+-+web1%2Fhttp%3Aconnection+refused",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(vonage_body("0")))
        .expect(1)
        .mount(&server)
        .await;

    let event = event_json("web1", "http", 2, "connection refused\n");
    handler_cmd()
        .args(["-k", "key", "-s", "secret", "-r", "15550001,15550002"])
        .args(["--api-url", &server.uri()])
        .write_stdin(event.to_string())
        .assert()
        .success()
        .stdout("Status: 0\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_deprecated_env_overrides_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/json"))
        .and(body_string_contains("api_key=from-env"))
        .and(body_string_contains("from=ops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vonage_body("0")))
        .expect(1)
        .mount(&server)
        .await;

    let event = event_json("web1", "http", 0, "HTTP OK");
    handler_cmd()
        .args(["-k", "from-flag", "-s", "secret", "-r", "15550001", "-f", "flag-sender"])
        .args(["--api-url", &server.uri()])
        .env("VONAGE_API_KEY", "from-env")
        .env("VONAGE_FROM", "ops")
        .write_stdin(event.to_string())
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_annotation_overrides_recipients() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/json"))
        .and(body_string_contains("to=15559999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vonage_body("0")))
        .expect(1)
        .mount(&server)
        .await;

    let mut event = event_json("web1", "http", 1, "slow response");
    event["check"]["metadata"]["annotations"] =
        json!({ "sensu.io/plugins/vonage/config/recipients": "15559999" });

    handler_cmd()
        .args(["-k", "key", "-s", "secret", "-r", "15550001"])
        .args(["--api-url", &server.uri()])
        .write_stdin(event.to_string())
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_message_still_succeeds() {
    let server = mock_vonage(ResponseTemplate::new(200).set_body_json(vonage_body("4"))).await;

    handler_cmd()
        .args(["-k", "bad", "-s", "bad", "-r", "15550001"])
        .args(["--api-url", &server.uri()])
        .write_stdin(event_json("web1", "http", 2, "down").to_string())
        .assert()
        .success()
        .stdout("Status: 4\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_send_failure_is_reported_to_host() {
    let server = mock_vonage(ResponseTemplate::new(500).set_body_string("boom")).await;

    handler_cmd()
        .args(["-k", "key", "-s", "secret", "-r", "15550001"])
        .args(["--api-url", &server.uri()])
        .write_stdin(event_json("web1", "http", 2, "down").to_string())
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains(
            "error executing handler: Vonage rejected the request: status 500",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_send_failure_aborts_in_abort_mode() {
    let server = mock_vonage(ResponseTemplate::new(500).set_body_string("boom")).await;

    handler_cmd()
        .args(["-k", "key", "-s", "secret", "-r", "15550001"])
        .args(["--api-url", &server.uri(), "--failure-mode", "abort"])
        .write_stdin(event_json("web1", "http", 2, "down").to_string())
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Vonage rejected the request: status 500"))
        .stderr(predicate::str::contains("error executing handler").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failure_mode_from_environment() {
    let server = mock_vonage(ResponseTemplate::new(500)).await;

    handler_cmd()
        .args(["-k", "key", "-s", "secret", "-r", "15550001"])
        .args(["--api-url", &server.uri()])
        .env("VONAGE_FAILURE_MODE", "abort")
        .write_stdin(event_json("web1", "http", 2, "down").to_string())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error executing handler").not());
}

#[test]
fn test_empty_stdin_fails_before_sending() {
    handler_cmd()
        .args(["-k", "key", "-s", "secret", "-r", "15550001"])
        .args(["--api-url", "http://127.0.0.1:9"])
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error executing handler: event is empty"));
}

#[test]
fn test_event_without_check_is_rejected() {
    handler_cmd()
        .write_stdin(r#"{"entity":{"metadata":{"name":"web1"}}}"#)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("event does not contain a check"));
}

#[test]
fn test_help_lists_options() {
    handler_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--api-key"))
        .stdout(predicate::str::contains("--recipients"))
        .stdout(predicate::str::contains("--failure-mode"));
}
