//! Common fixtures for integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BIN: &str = "sensu-vonage-handler";

const HANDLER_ENV: [&str; 8] = [
    "VONAGE_API_KEY",
    "VONAGE_API_SECRET",
    "VONAGE_FROM",
    "VONAGE_RECIPIENTS",
    "VONAGE_API_URL",
    "VONAGE_FAILURE_MODE",
    "VONAGE_LOG_LEVEL",
    "RUST_LOG",
];

/// A host event document for `entity/check`.
pub fn event_json(entity: &str, check: &str, status: i32, output: &str) -> Value {
    json!({
        "timestamp": 1700000000,
        "entity": {
            "entity_class": "agent",
            "metadata": { "name": entity, "namespace": "default" }
        },
        "check": {
            "metadata": { "name": check, "namespace": "default" },
            "status": status,
            "output": output,
            "interval": 60
        }
    })
}

/// The handler binary with a clean handler environment.
pub fn handler_cmd() -> Command {
    let mut cmd = Command::cargo_bin(BIN).expect("handler binary should be built");
    for name in HANDLER_ENV {
        cmd.env_remove(name);
    }
    cmd
}

/// A Vonage body accepting one message with the given status.
pub fn vonage_body(status: &str) -> Value {
    json!({
        "message-count": "1",
        "messages": [{
            "to": "15550001",
            "message-id": "0A0000000123ABCD1",
            "status": status
        }]
    })
}

/// Starts a mock Vonage API answering every send with `response`.
pub async fn mock_vonage(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/json"))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}
