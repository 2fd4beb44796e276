//! The two hooks the host drives for every event: validation, which settles
//! the configuration, and execution, which formats and sends the SMS.

use crate::cli::Cli;
use crate::config::Config;
use crate::event::{EventError, MonitoringEvent};
use crate::formatting::{SmsTextFormatter, TextFormatter};
use crate::notification::{DispatchError, SmsRequest, SmsResponse, SmsSender, VonageClient};
use crate::settings::HandlerSettings;
use std::io::Write;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Anything that makes a handler invocation fail.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Event(#[from] EventError),

    #[error("invalid configuration: {0}")]
    Config(#[from] figment::Error),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("failed to write delivery status: {0}")]
    Output(#[from] std::io::Error),
}

/// Delivery status of the first message in the provider's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryStatus {
    pub status: String,
    pub message_id: Option<String>,
    pub error_text: Option<String>,
}

impl DeliveryStatus {
    const UNKNOWN: &'static str = "unknown";

    fn from_response(response: &SmsResponse) -> Self {
        match response.messages.first() {
            Some(first) => Self {
                status: first.status.clone(),
                message_id: first.message_id.clone(),
                error_text: first.error_text.clone(),
            },
            None => Self {
                status: Self::UNKNOWN.to_string(),
                message_id: None,
                error_text: None,
            },
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == "0"
    }
}

/// Validation hook: loads the base configuration for this event and applies
/// the deprecated environment overrides.
pub fn validate<F>(cli: &Cli, event: &MonitoringEvent, env: F) -> Result<HandlerSettings, HandlerError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = Config::load(cli, Some(event), &env)?;
    Ok(HandlerSettings::resolve(&config, &env))
}

/// Sends `message` through a Vonage client built from `settings`.
pub async fn dispatch(
    settings: &HandlerSettings,
    message: &str,
) -> Result<DeliveryStatus, DispatchError> {
    let client = VonageClient::new(
        settings.api_url.clone(),
        settings.api_key.clone(),
        settings.api_secret.clone(),
    );
    dispatch_with(&client, settings, message).await
}

/// Sends `message` through `sender`.
///
/// Only a failed request is an error. A message the provider accepted the
/// request for but then rejected is logged and reported as a normal status.
#[instrument(skip_all, fields(from = %settings.sender_id, to = %settings.recipients))]
pub async fn dispatch_with<S>(
    sender: &S,
    settings: &HandlerSettings,
    message: &str,
) -> Result<DeliveryStatus, DispatchError>
where
    S: SmsSender + ?Sized,
{
    let request = SmsRequest {
        from: settings.sender_id.clone(),
        to: settings.recipients.clone(),
        text: message.to_string(),
    };

    let response = sender.send_sms(&request).await?;
    let status = DeliveryStatus::from_response(&response);

    if response.messages.is_empty() {
        warn!("Vonage response did not contain any message results");
    } else if !status.is_accepted() {
        warn!(
            status = %status.status,
            error_text = status.error_text.as_deref().unwrap_or_default(),
            "Vonage did not accept the message"
        );
    } else {
        info!(status = %status.status, "SMS delivered to Vonage");
    }

    Ok(status)
}

/// Execution hook: formats the event, sends it and writes `Status: <status>`
/// to `out`.
pub async fn execute<S, W>(
    sender: &S,
    settings: &HandlerSettings,
    event: &MonitoringEvent,
    out: &mut W,
) -> Result<DeliveryStatus, HandlerError>
where
    S: SmsSender + ?Sized,
    W: Write,
{
    let message = SmsTextFormatter::default().format(event);
    info!(
        entity = event.entity_name(),
        check = event.check_name(),
        "Sending SMS for event"
    );

    let status = dispatch_with(sender, settings, &message).await?;
    writeln!(out, "Status: {}", status.status)?;
    Ok(status)
}
