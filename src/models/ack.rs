//! Acknowledgement records attached to acked or disabled nodes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// An operator acknowledgement. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
    pub sender: String,
    /// Channel the ack came through (chat, pager, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    pub time: DateTime<Utc>,
}

/// Loosely typed ack as it arrives inside an update.
#[derive(Deserialize)]
struct RawAck {
    message: Option<String>,
    sender: Option<String>,
    via: Option<String>,
    time: Option<DateTime<Utc>>,
}

impl Ack {
    pub fn new(message: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sender: sender.into(),
            via: None,
            time: Utc::now(),
        }
    }

    pub fn with_via(mut self, via: impl Into<String>) -> Self {
        self.via = Some(via.into());
        self
    }

    /// Parse the `ack` value of an update.
    ///
    /// `null` clears the acknowledgement and yields `Ok(None)`. Any other value
    /// must be a map carrying non-empty `message` and `sender` strings; `time`
    /// defaults to now.
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        if value.is_null() {
            return Ok(None);
        }
        if !value.is_object() {
            return Err(Error::InvalidAck {
                reason: format!("expected a map, got {value}"),
            });
        }

        let raw: RawAck = serde_json::from_value(value.clone()).map_err(|e| Error::InvalidAck {
            reason: e.to_string(),
        })?;

        let message = raw
            .message
            .filter(|m| !m.is_empty())
            .ok_or_else(|| Error::InvalidAck {
                reason: "message is required".to_string(),
            })?;
        let sender = raw
            .sender
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::InvalidAck {
                reason: "sender is required".to_string(),
            })?;

        Ok(Some(Self {
            message,
            sender,
            via: raw.via,
            time: raw.time.unwrap_or_else(Utc::now),
        }))
    }

    pub fn to_value(&self) -> Value {
        // Serializing a plain struct of strings and a timestamp cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl std::fmt::Display for Ack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (by {}", self.message, self.sender)?;
        if let Some(via) = &self.via {
            write!(f, " via {via}")?;
        }
        write!(f, " at {})", self.time.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}
