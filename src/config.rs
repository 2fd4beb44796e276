//! Configuration management for the Vonage handler
//!
//! This module defines the `Config` struct holding the base handler options
//! and the `figment` providers that populate it. Sources are layered from
//! lowest to highest precedence: built-in defaults, an optional TOML file,
//! environment bindings, command-line flags, entity annotations and finally
//! check annotations.

use crate::cli::Cli;
use crate::event::MonitoringEvent;
use figment::{
    providers::{Format, Serialized, Toml},
    value::{Dict, Map, Value},
    Error, Figment, Metadata, Profile, Provider,
};
use serde::{Deserialize, Serialize};

/// Handler name registered with the host.
pub const HANDLER_NAME: &str = "sensu-vonage-handler";

/// Annotation keyspace for per-event option overrides.
pub const KEYSPACE: &str = "sensu.io/plugins/vonage/config";

/// Sender used when no `from` option is supplied anywhere.
pub const DEFAULT_SENDER: &str = "Sensu Go";

/// Base URL of the Vonage REST API.
pub const DEFAULT_API_URL: &str = "https://rest.nexmo.com";

/// A declarative option binding, mirroring how the host SDK describes options.
#[derive(Debug, Clone, Copy)]
pub struct OptionBinding {
    /// Field name in `Config`.
    pub key: &'static str,
    /// Environment variable bound to the option.
    pub env: &'static str,
    /// Annotation path under `KEYSPACE`, if the option may be overridden per event.
    pub path: Option<&'static str>,
}

pub const API_KEY: OptionBinding = OptionBinding {
    key: "api_key",
    env: "VONAGE_API_KEY",
    path: Some("api-key"),
};

pub const API_SECRET: OptionBinding = OptionBinding {
    key: "api_secret",
    env: "VONAGE_API_SECRET",
    path: Some("api-secret"),
};

pub const FROM: OptionBinding = OptionBinding {
    key: "from",
    env: "VONAGE_FROM",
    path: Some("from"),
};

pub const RECIPIENTS: OptionBinding = OptionBinding {
    key: "recipients",
    env: "VONAGE_RECIPIENTS",
    path: Some("recipients"),
};

pub const API_URL: OptionBinding = OptionBinding {
    key: "api_url",
    env: "VONAGE_API_URL",
    path: None,
};

pub const FAILURE_MODE: OptionBinding = OptionBinding {
    key: "failure_mode",
    env: "VONAGE_FAILURE_MODE",
    path: None,
};

pub const LOG_LEVEL: OptionBinding = OptionBinding {
    key: "log_level",
    env: "VONAGE_LOG_LEVEL",
    path: None,
};

/// Every option the handler understands.
pub const OPTIONS: [OptionBinding; 7] = [
    API_KEY,
    API_SECRET,
    FROM,
    RECIPIENTS,
    API_URL,
    FAILURE_MODE,
    LOG_LEVEL,
];

/// What the handler does when the SMS cannot be sent.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Return the error to the host, which reports it and exits non-zero.
    #[default]
    Report,
    /// Log the error and terminate the process on the spot.
    Abort,
}

impl FailureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureMode::Report => "report",
            FailureMode::Abort => "abort",
        }
    }
}

impl std::fmt::Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The base handler configuration, before deprecated environment overrides.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The Vonage API key.
    pub api_key: String,
    /// The Vonage API secret.
    pub api_secret: String,
    /// The number or name that sends the SMS.
    pub from: String,
    /// Comma-separated list of recipient numbers.
    pub recipients: String,
    /// Base URL of the Vonage REST API.
    pub api_url: String,
    /// Behaviour on dispatch failure.
    pub failure_mode: FailureMode,
    /// Log filter for stderr diagnostics.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            from: DEFAULT_SENDER.to_string(),
            recipients: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            failure_mode: FailureMode::Report,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads the handler configuration from every source.
    ///
    /// `env` looks up environment variables; `main` passes the process
    /// environment, tests pass a fixed map. The event is optional so the
    /// configuration can be loaded before an event has been read.
    pub fn load<F>(cli: &Cli, event: Option<&MonitoringEvent>, env: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = &cli.config {
            if !path.exists() {
                return Err(Error::from(format!(
                    "configuration file not found at {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment
            .merge(EnvBindings::collect(&env))
            .merge(cli.clone());

        if let Some(event) = event {
            figment = figment.merge(AnnotationOverrides::collect(event));
        }

        figment.extract()
    }
}

/// Environment variable bindings for each option. Empty values count as unset.
#[derive(Debug, Default)]
pub struct EnvBindings {
    values: Dict,
}

impl EnvBindings {
    pub fn collect<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values = Dict::new();
        for option in OPTIONS {
            if let Some(value) = env(option.env).filter(|v| !v.is_empty()) {
                values.insert(option.key.into(), Value::from(value));
            }
        }
        Self { values }
    }
}

impl Provider for EnvBindings {
    fn metadata(&self) -> Metadata {
        Metadata::named("Environment Variables")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut map = Map::new();
        map.insert(Profile::Default, self.values.clone());
        Ok(map)
    }
}

/// Per-event option overrides read from `KEYSPACE/<path>` annotations.
///
/// A check annotation wins over an entity annotation for the same key.
#[derive(Debug, Default)]
pub struct AnnotationOverrides {
    values: Dict,
}

impl AnnotationOverrides {
    pub fn collect(event: &MonitoringEvent) -> Self {
        let mut values = Dict::new();
        for option in OPTIONS {
            let Some(path) = option.path else { continue };
            let key = annotation_key(path);
            if let Some(value) = event.annotation(&key) {
                values.insert(option.key.into(), Value::from(value.to_string()));
            }
        }
        Self { values }
    }
}

impl Provider for AnnotationOverrides {
    fn metadata(&self) -> Metadata {
        Metadata::named("Event Annotations")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut map = Map::new();
        map.insert(Profile::Default, self.values.clone());
        Ok(map)
    }
}

/// Full annotation key for an option path.
pub fn annotation_key(path: &str) -> String {
    format!("{}/{}", KEYSPACE, path)
}
