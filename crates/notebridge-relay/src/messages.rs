//! Relay wire messages.
//!
//! Messages are JSON arrays whose first element names the message:
//!
//! ```text
//! client -> relay   ["EVENT", {event}]
//! relay  -> client  ["OK", "<event id>", true|false, "<prefix>: <message>"]
//! relay  -> client  ["NOTICE", "<message>"]
//! ```

use notebridge_core::{Event, EventId};
use serde_json::Value;

use crate::error::{RelayError, Result};

/// Machine-readable prefix of an `OK` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OkPrefix {
    Duplicate,
    Pow,
    Blocked,
    RateLimited,
    Invalid,
    Restricted,
    Error,
}

impl OkPrefix {
    /// Wire spelling, without the colon.
    pub fn as_str(self) -> &'static str {
        match self {
            OkPrefix::Duplicate => "duplicate",
            OkPrefix::Pow => "pow",
            OkPrefix::Blocked => "blocked",
            OkPrefix::RateLimited => "rate-limited",
            OkPrefix::Invalid => "invalid",
            OkPrefix::Restricted => "restricted",
            OkPrefix::Error => "error",
        }
    }

    /// Split `"<prefix>: rest"` into its prefix, if it has a known one.
    pub fn parse(message: &str) -> Option<Self> {
        let (head, _) = message.split_once(':')?;
        match head {
            "duplicate" => Some(OkPrefix::Duplicate),
            "pow" => Some(OkPrefix::Pow),
            "blocked" => Some(OkPrefix::Blocked),
            "rate-limited" => Some(OkPrefix::RateLimited),
            "invalid" => Some(OkPrefix::Invalid),
            "restricted" => Some(OkPrefix::Restricted),
            "error" => Some(OkPrefix::Error),
            _ => None,
        }
    }

    /// Format a message with this prefix.
    pub fn message(self, detail: &str) -> String {
        format!("{}: {}", self.as_str(), detail)
    }
}

/// Messages sent from a publisher to a relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Publish an event.
    Event(Event),
}

impl ClientMessage {
    /// Encode to the JSON wire form.
    pub fn to_json(&self) -> Result<String> {
        // Tuples keep the event's declared field order; a `Value` would sort it.
        let encoded = match self {
            ClientMessage::Event(event) => serde_json::to_string(&("EVENT", event)),
        };
        encoded.map_err(|e| RelayError::Protocol(e.to_string()))
    }

    /// Decode from the JSON wire form.
    pub fn from_json(s: &str) -> Result<Self> {
        let parts = parse_array(s)?;
        match message_name(&parts)? {
            "EVENT" => {
                let event = parts
                    .get(1)
                    .cloned()
                    .ok_or_else(|| RelayError::Protocol("EVENT without payload".into()))?;
                let event: Event = serde_json::from_value(event)
                    .map_err(|e| RelayError::Protocol(format!("bad event: {}", e)))?;
                Ok(ClientMessage::Event(event))
            }
            other => Err(RelayError::Protocol(format!(
                "unknown client message: {}",
                other
            ))),
        }
    }
}

/// Messages sent from a relay back to a publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayMessage {
    /// Verdict on a published event.
    Ok {
        event_id: EventId,
        accepted: bool,
        message: String,
    },

    /// Human-readable notice.
    Notice { message: String },
}

/// A relay's acceptance of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayAck {
    /// The relay already had the event.
    pub duplicate: bool,
    /// Message text from the relay, possibly empty.
    pub message: String,
}

impl RelayMessage {
    /// Encode to the JSON wire form.
    pub fn to_json(&self) -> Result<String> {
        let encoded = match self {
            RelayMessage::Ok {
                event_id,
                accepted,
                message,
            } => serde_json::to_string(&("OK", event_id, accepted, message)),
            RelayMessage::Notice { message } => serde_json::to_string(&("NOTICE", message)),
        };
        encoded.map_err(|e| RelayError::Protocol(e.to_string()))
    }

    /// Decode from the JSON wire form.
    pub fn from_json(s: &str) -> Result<Self> {
        let parts = parse_array(s)?;
        match message_name(&parts)? {
            "OK" => {
                let event_id = parts
                    .get(1)
                    .and_then(Value::as_str)
                    .and_then(|s| EventId::from_hex(s).ok())
                    .ok_or_else(|| RelayError::Protocol("OK without valid event id".into()))?;
                let accepted = parts
                    .get(2)
                    .and_then(Value::as_bool)
                    .ok_or_else(|| RelayError::Protocol("OK without status".into()))?;
                let message = parts
                    .get(3)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(RelayMessage::Ok {
                    event_id,
                    accepted,
                    message,
                })
            }
            "NOTICE" => {
                let message = parts
                    .get(1)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(RelayMessage::Notice { message })
            }
            other => Err(RelayError::Protocol(format!(
                "unknown relay message: {}",
                other
            ))),
        }
    }

    /// Interpret this message as the answer to publishing `expected`.
    pub fn into_ack(self, expected: &EventId) -> Result<RelayAck> {
        match self {
            RelayMessage::Ok {
                event_id,
                accepted,
                message,
            } => {
                if &event_id != expected {
                    return Err(RelayError::Protocol(format!(
                        "OK for {} while waiting for {}",
                        event_id, expected
                    )));
                }
                let prefix = OkPrefix::parse(&message);
                if accepted {
                    Ok(RelayAck {
                        duplicate: prefix == Some(OkPrefix::Duplicate),
                        message,
                    })
                } else {
                    Err(RelayError::Rejected {
                        prefix,
                        reason: message,
                    })
                }
            }
            RelayMessage::Notice { message } => Err(RelayError::Protocol(format!(
                "expected OK, got NOTICE: {}",
                message
            ))),
        }
    }
}

fn parse_array(s: &str) -> Result<Vec<Value>> {
    match serde_json::from_str(s) {
        Ok(Value::Array(parts)) => Ok(parts),
        Ok(_) => Err(RelayError::Protocol("message is not an array".into())),
        Err(e) => Err(RelayError::Protocol(format!("invalid JSON: {}", e))),
    }
}

fn message_name(parts: &[Value]) -> Result<&str> {
    parts
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| RelayError::Protocol("missing message name".into()))
}
