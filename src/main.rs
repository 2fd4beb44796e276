//! sensu-vonage-handler
//!
//! Reads one Sensu event from stdin and sends it as an SMS through Vonage.

use anyhow::{Context, Result};
use clap::Parser;
use sensu_vonage_handler::{
    cli::Cli,
    config::{Config, FailureMode, HANDLER_NAME},
    event::MonitoringEvent,
    handler::{self, HandlerError},
    notification::VonageClient,
};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    // Loaded once without the event so logging is up before stdin is read.
    let base = Config::load(&cli, None, env_var);
    let log_level = base
        .as_ref()
        .map(|config| config.log_level.clone())
        .unwrap_or_else(|_| Config::default().log_level);
    init_logging(&log_level);
    base.context("failed to load configuration")?;

    let event = MonitoringEvent::from_reader(std::io::stdin().lock())?;
    debug!(
        handler = HANDLER_NAME,
        entity = event.entity_name(),
        check = event.check_name(),
        "Event received"
    );

    let settings = handler::validate(&cli, &event, env_var)?;
    debug!(failure_mode = %settings.failure_mode, "Configuration resolved");

    let client = VonageClient::new(
        settings.api_url.clone(),
        settings.api_key.clone(),
        settings.api_secret.clone(),
    );
    let mut stdout = std::io::stdout().lock();

    match handler::execute(&client, &settings, &event, &mut stdout).await {
        Ok(_) => Ok(()),
        Err(HandlerError::Dispatch(e)) if settings.failure_mode == FailureMode::Abort => {
            error!(error = %e, "SMS dispatch failed, aborting");
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error executing handler: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
