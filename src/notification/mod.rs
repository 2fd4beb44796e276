//! Outbound notification channels.
//!
//! The handler only ever talks to one provider, but the sender sits behind the
//! `SmsSender` trait so the dispatch path can be exercised without the network.
pub mod vonage;

pub use vonage::{DispatchError, MessageResult, SmsRequest, SmsResponse, SmsSender, VonageClient};
