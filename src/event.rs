//! The monitoring event handed to the handler by Sensu.
//!
//! Only the handful of fields the handler actually reads are modelled here.
//! Everything else in the host's event document is ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use thiserror::Error;

/// Errors raised while reading or validating the incoming event.
#[derive(Error, Debug)]
pub enum EventError {
    #[error("failed to read event from stdin: {0}")]
    Read(#[from] std::io::Error),

    #[error("event is empty")]
    Empty,

    #[error("failed to unmarshal event: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("event does not contain an entity")]
    MissingEntity,

    #[error("event does not contain a check")]
    MissingCheck,

    #[error("{0} name must not be empty")]
    MissingName(&'static str),
}

/// Object metadata shared by entities and checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

/// The monitored resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Entity {
    #[serde(default)]
    pub metadata: ObjectMeta,
}

/// The result of a single check execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Check {
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// 0 = OK, 1 = warning, 2 = critical, anything else is treated as a warning.
    #[serde(default)]
    pub status: i32,
    /// Raw diagnostic text produced by the check.
    #[serde(default)]
    pub output: String,
}

/// A monitoring event as sent by the host on stdin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MonitoringEvent {
    pub entity: Option<Entity>,
    pub check: Option<Check>,
}

impl MonitoringEvent {
    /// Builds a minimal event, mostly useful in tests.
    pub fn new(entity_name: &str, check_name: &str, status: i32, output: &str) -> Self {
        Self {
            entity: Some(Entity {
                metadata: ObjectMeta {
                    name: entity_name.to_string(),
                    ..Default::default()
                },
            }),
            check: Some(Check {
                metadata: ObjectMeta {
                    name: check_name.to_string(),
                    ..Default::default()
                },
                status,
                output: output.to_string(),
            }),
        }
    }

    /// Reads and validates one event document from `reader`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, EventError> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        if buf.trim().is_empty() {
            return Err(EventError::Empty);
        }
        let event: MonitoringEvent = serde_json::from_str(&buf)?;
        event.validate()?;
        Ok(event)
    }

    /// Checks that the event carries a named entity and a named check.
    pub fn validate(&self) -> Result<(), EventError> {
        let entity = self.entity.as_ref().ok_or(EventError::MissingEntity)?;
        let check = self.check.as_ref().ok_or(EventError::MissingCheck)?;
        if entity.metadata.name.is_empty() {
            return Err(EventError::MissingName("entity"));
        }
        if check.metadata.name.is_empty() {
            return Err(EventError::MissingName("check"));
        }
        Ok(())
    }

    pub fn entity_name(&self) -> &str {
        self.entity
            .as_ref()
            .map(|e| e.metadata.name.as_str())
            .unwrap_or_default()
    }

    pub fn check_name(&self) -> &str {
        self.check
            .as_ref()
            .map(|c| c.metadata.name.as_str())
            .unwrap_or_default()
    }

    pub fn check_status(&self) -> i32 {
        self.check.as_ref().map(|c| c.status).unwrap_or_default()
    }

    pub fn check_output(&self) -> &str {
        self.check
            .as_ref()
            .map(|c| c.output.as_str())
            .unwrap_or_default()
    }

    /// Looks up an annotation, preferring the check over the entity.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        let from_check = self
            .check
            .as_ref()
            .and_then(|c| c.metadata.annotations.get(key))
            .filter(|v| !v.is_empty());
        let from_entity = self
            .entity
            .as_ref()
            .and_then(|e| e.metadata.annotations.get(key))
            .filter(|v| !v.is_empty());
        from_check.or(from_entity).map(String::as_str)
    }
}
