//! A client for sending SMS through the Vonage (Nexmo) REST API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task;
use tracing::{error, info, instrument};

/// Errors from a single send attempt.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("HTTP request to Vonage failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Vonage rejected the request: status {status}, body: {body}")]
    Provider { status: u16, body: String },

    #[error("failed to decode Vonage response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("SMS send task failed: {0}")]
    Task(#[from] task::JoinError),
}

/// An outbound SMS. `to` may hold several comma-joined numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsRequest {
    pub from: String,
    pub to: String,
    pub text: String,
}

/// Per-message result reported by Vonage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct MessageResult {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub message_id: Option<String>,
    /// `"0"` means the message was accepted; anything else is a provider error code.
    pub status: String,
    #[serde(default)]
    pub error_text: Option<String>,
}

impl MessageResult {
    pub fn is_accepted(&self) -> bool {
        self.status == "0"
    }
}

/// The body of a successful `POST /sms/json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct SmsResponse {
    #[serde(rename = "message-count", default)]
    pub message_count: String,
    #[serde(default)]
    pub messages: Vec<MessageResult>,
}

/// A trait for clients that can send one SMS.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_sms(&self, request: &SmsRequest) -> Result<SmsResponse, DispatchError>;
}

#[derive(Serialize)]
struct SendSmsForm<'a> {
    api_key: &'a str,
    api_secret: &'a str,
    from: &'a str,
    to: &'a str,
    text: &'a str,
}

/// A client authenticated with an API key and secret.
pub struct VonageClient {
    api_url: String,
    api_key: String,
    api_secret: String,
    timeout: std::time::Duration,
}

impl VonageClient {
    /// Creates a new `VonageClient` against `api_url`, e.g. `https://rest.nexmo.com`.
    pub fn new(api_url: String, api_key: String, api_secret: String) -> Self {
        Self {
            api_url,
            api_key,
            api_secret,
            timeout: std::time::Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/sms/json", self.api_url.trim_end_matches('/'))
    }

    /// Sends the request in a blocking manner.
    fn send_request(
        timeout: std::time::Duration,
        endpoint: &str,
        form: &SendSmsForm<'_>,
    ) -> Result<SmsResponse, DispatchError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        let response = client.post(endpoint).form(form).send();

        match response {
            Ok(res) => {
                let status = res.status();
                let text = res.text()?;
                if status.is_success() {
                    Ok(serde_json::from_str(&text)?)
                } else {
                    error!(
                        status = %status,
                        body = %text,
                        "Vonage returned an error response"
                    );
                    Err(DispatchError::Provider {
                        status: status.as_u16(),
                        body: text,
                    })
                }
            }
            Err(e) => {
                error!(error = %e, "HTTP request to Vonage failed");
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl SmsSender for VonageClient {
    #[instrument(skip(self, request), fields(to = %request.to))]
    async fn send_sms(&self, request: &SmsRequest) -> Result<SmsResponse, DispatchError> {
        let endpoint = self.endpoint();
        let timeout = self.timeout;
        let api_key = self.api_key.clone();
        let api_secret = self.api_secret.clone();
        let request = request.clone();

        let result = task::spawn_blocking(move || {
            let form = SendSmsForm {
                api_key: &api_key,
                api_secret: &api_secret,
                from: &request.from,
                to: &request.to,
                text: &request.text,
            };
            Self::send_request(timeout, &endpoint, &form)
        })
        .await;

        match result {
            Ok(Ok(response)) => {
                info!(
                    message_count = %response.message_count,
                    "Vonage accepted the SMS request."
                );
                Ok(response)
            }
            Ok(Err(e)) => Err(e),
            Err(e) => {
                error!(error = %e, "SMS send task failed");
                Err(e.into())
            }
        }
    }
}
