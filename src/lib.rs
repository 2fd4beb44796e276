/// sensu-vonage-handler - Sensu Go handler that sends SMS alerts via Vonage
///
/// The library turns a monitoring event into a short text message and sends it
/// through the Vonage SMS API. The binary wires it to the host: event on
/// stdin, options from flags, environment, TOML and annotations.
pub mod cli;
pub mod config;
pub mod event;
pub mod formatting;
pub mod handler;
pub mod notification;
pub mod settings;

pub use event::MonitoringEvent;
pub use formatting::{action, format_message, key, status_label, summary};
pub use handler::{dispatch, DeliveryStatus, HandlerError};
pub use settings::HandlerSettings;
