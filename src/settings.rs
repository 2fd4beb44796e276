//! Final, immutable settings for one handler invocation.

use crate::config::{Config, FailureMode, API_KEY, API_SECRET, FROM, RECIPIENTS};

/// Everything the dispatcher needs, resolved once per event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSettings {
    pub api_key: String,
    pub api_secret: String,
    pub sender_id: String,
    /// Comma-joined destination numbers, passed to the provider unsplit.
    pub recipients: String,
    pub api_url: String,
    pub failure_mode: FailureMode,
}

impl HandlerSettings {
    /// Applies the deprecated environment overrides on top of `base`.
    ///
    /// A deprecated variable set to a non-empty value replaces the base value,
    /// field by field. Resolution never fails: missing credentials only show
    /// up as provider errors at send time.
    pub fn resolve<F>(base: &Config, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |name: &str, current: &str| {
            env(name)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| current.to_string())
        };

        Self {
            api_key: pick(API_KEY.env, &base.api_key),
            api_secret: pick(API_SECRET.env, &base.api_secret),
            sender_id: pick(FROM.env, &base.from),
            recipients: pick(RECIPIENTS.env, &base.recipients),
            api_url: base.api_url.clone(),
            failure_mode: base.failure_mode,
        }
    }
}
