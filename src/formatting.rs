// src/formatting.rs

use crate::event::MonitoringEvent;

/// Maximum number of output characters carried in an SMS summary.
pub const DEFAULT_SUMMARY_LENGTH: usize = 100;

/// A trait for turning an event into the text body of a notification.
pub trait TextFormatter: Send + Sync {
    fn format(&self, event: &MonitoringEvent) -> String;
}

/// Produces the single-line, length-bounded SMS body.
pub struct SmsTextFormatter {
    pub max_length: usize,
}

impl Default for SmsTextFormatter {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_SUMMARY_LENGTH,
        }
    }
}

impl TextFormatter for SmsTextFormatter {
    fn format(&self, event: &MonitoringEvent) -> String {
        format!("{} - {}", action(event), summary(event, self.max_length))
    }
}

/// `RESOLVED` for an OK status, `ALERT` for anything else.
pub fn action(event: &MonitoringEvent) -> &'static str {
    match event.check_status() {
        0 => "RESOLVED",
        _ => "ALERT",
    }
}

/// Human-readable severity of the check status.
pub fn status_label(event: &MonitoringEvent) -> &'static str {
    match event.check_status() {
        0 => "Resolved",
        2 => "Critical",
        _ => "Warning",
    }
}

/// `entity/check`, the identity of the event.
pub fn key(event: &MonitoringEvent) -> String {
    format!("{}/{}", event.entity_name(), event.check_name())
}

/// `key:output` with line breaks trimmed from both ends of the output.
///
/// The length test runs against the untrimmed output while truncation applies
/// to the trimmed one, so an output padded past `max_length` with newlines still
/// gets the `...` suffix. Existing deployments depend on that exact boundary.
pub fn summary(event: &MonitoringEvent, max_length: usize) -> String {
    let raw = event.check_output();
    let trimmed = chomp(raw);
    let output = if raw.chars().count() > max_length {
        let head: String = trimmed.chars().take(max_length).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    };
    format!("{}:{}", key(event), output)
}

/// The default message for an event: `ACTION - key:output`.
pub fn format_message(event: &MonitoringEvent) -> String {
    SmsTextFormatter::default().format(event)
}

fn chomp(s: &str) -> &str {
    s.trim_matches(|c| c == '\n' || c == '\r')
}
