//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the handler's flags using the `clap` crate. The parsed
//! flags are one layer of the configuration stack and are merged with the
//! TOML file, environment bindings and event annotations in `Config::load`.

use crate::config::FailureMode;
use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// The Sensu Go Vonage (Nexmo) handler for sending sms alerts.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "sensu-vonage-handler", version, about, long_about = None)]
pub struct Cli {
    /// Path to an optional TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The Vonage API key
    #[arg(short = 'k', long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// The Vonage API secret
    #[arg(short = 's', long, value_name = "SECRET")]
    pub api_secret: Option<String>,

    /// The number/name that will send the sms
    #[arg(short = 'f', long, value_name = "SENDER")]
    pub from: Option<String>,

    /// Comma-separated list of numbers of recipients
    #[arg(short = 'r', long, value_name = "NUMBERS")]
    pub recipients: Option<String>,

    /// Base URL of the Vonage REST API.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// What to do when the SMS cannot be sent.
    #[arg(long, value_enum, value_name = "MODE")]
    pub failure_mode: Option<FailureMode>,

    /// Log filter for diagnostics written to stderr.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        let strings = [
            ("api_key", &self.api_key),
            ("api_secret", &self.api_secret),
            ("from", &self.from),
            ("recipients", &self.recipients),
            ("api_url", &self.api_url),
            ("log_level", &self.log_level),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                dict.insert(key.into(), Value::from(value.clone()));
            }
        }

        if let Some(mode) = self.failure_mode {
            dict.insert("failure_mode".into(), Value::from(mode.as_str()));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
