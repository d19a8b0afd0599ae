use std::fmt;

use crate::types::EventId;

/// A typed value carried alongside an event
///
/// Two payloads are equal only when they hold the same variant and the same
/// value. An `Int(1)` never equals a `Float(1.0)`; wait filters rely on this
/// to treat a type mismatch as a plain non-match.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// An opaque handle into the host's own world (an entity, an object id ..)
    Entity(u64),
}

impl Payload {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Payload::Int(_) => "int",
            Payload::Float(_) => "float",
            Payload::Bool(_) => "bool",
            Payload::Text(_) => "text",
            Payload::Entity(_) => "entity",
        }
    }

    /// Whether `other` holds the same variant, regardless of value
    pub fn same_kind(&self, other: &Payload) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Int(value) => write!(f, "{}", value),
            Payload::Float(value) => write!(f, "{}", value),
            Payload::Bool(value) => write!(f, "{}", value),
            Payload::Text(value) => write!(f, "{:?}", value),
            Payload::Entity(value) => write!(f, "entity#{}", value),
        }
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Payload::Int(value)
    }
}

impl From<i32> for Payload {
    fn from(value: i32) -> Self {
        Payload::Int(i64::from(value))
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Float(value)
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Payload::Bool(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

/// An event to publish: its identity plus an optional payload
#[derive(Clone, Debug, PartialEq)]
pub struct EventRef {
    pub event_id: EventId,
    pub payload: Option<Payload>,
}

impl EventRef {
    pub fn new(event_id: EventId) -> Self {
        Self {
            event_id,
            payload: None,
        }
    }

    pub fn with_payload(event_id: EventId, payload: impl Into<Payload>) -> Self {
        Self {
            event_id,
            payload: Some(payload.into()),
        }
    }
}

impl From<EventId> for EventRef {
    fn from(event_id: EventId) -> Self {
        Self::new(event_id)
    }
}
