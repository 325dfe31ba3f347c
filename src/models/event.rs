//! Inbound event model
//!
//! Everything the chat transport delivers is normalized into an
//! [`InboundEvent`] before it reaches the flow engine.

use std::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// What kind of input the user produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A `/command` with optional whitespace separated arguments
    Command { name: String, args: Vec<String> },
    /// An inline keyboard button press carrying its callback data
    Callback(String),
    /// Any other text message
    FreeText(String),
}

/// Discrete signature used for registry and state matching.
///
/// Free text has no signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventSignature {
    Command(String),
    Callback(String),
}

impl fmt::Display for EventSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSignature::Command(name) => write!(f, "/{}", name),
            EventSignature::Callback(data) => write!(f, "callback:{}", data),
        }
    }
}

/// A single event delivered by the chat transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Correlation id for logging
    pub event_id: Uuid,
    pub user_id: UserId,
    /// Chat the replies go to
    pub chat_id: i64,
    /// Message the event originated from, when the transport knows it
    pub message_id: Option<i32>,
    pub kind: EventKind,
}

impl InboundEvent {
    pub fn new(user_id: UserId, chat_id: i64, kind: EventKind) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            user_id,
            chat_id,
            message_id: None,
            kind,
        }
    }

    pub fn command(user_id: UserId, chat_id: i64, name: &str, args: &[&str]) -> Self {
        Self::new(user_id, chat_id, EventKind::Command {
            name: name.to_lowercase(),
            args: args.iter().map(|a| a.to_string()).collect(),
        })
    }

    pub fn callback(user_id: UserId, chat_id: i64, data: &str) -> Self {
        Self::new(user_id, chat_id, EventKind::Callback(data.to_string()))
    }

    pub fn text(user_id: UserId, chat_id: i64, text: &str) -> Self {
        Self::new(user_id, chat_id, EventKind::FreeText(text.to_string()))
    }

    /// Build an event from raw message text, recognizing `/commands`
    pub fn from_message_text(user_id: UserId, chat_id: i64, text: &str) -> Self {
        match parse_command(text) {
            Some((name, args)) => Self::new(user_id, chat_id, EventKind::Command { name, args }),
            None => Self::text(user_id, chat_id, text),
        }
    }

    /// Bot message the button was pressed on; ignored for anything but callbacks
    pub fn with_message_id(mut self, message_id: i32) -> Self {
        if let EventKind::Callback(_) = self.kind {
            self.message_id = Some(message_id);
        }
        self
    }

    /// Registry signature of this event, `None` for free text
    pub fn signature(&self) -> Option<EventSignature> {
        match &self.kind {
            EventKind::Command { name, .. } => Some(EventSignature::Command(name.clone())),
            EventKind::Callback(data) => Some(EventSignature::Callback(data.clone())),
            EventKind::FreeText(_) => None,
        }
    }

    /// Command arguments, empty for other kinds
    pub fn args(&self) -> &[String] {
        match &self.kind {
            EventKind::Command { args, .. } => args,
            _ => &[],
        }
    }
}

/// Split `/name@bot arg1 arg2` into a lowercase name and its arguments
pub fn parse_command(text: &str) -> Option<(String, Vec<String>)> {
    let mut tokens = text.split_whitespace();
    let head = tokens.next()?.strip_prefix('/')?;
    let name = head.split('@').next().unwrap_or_default().to_lowercase();
    if name.is_empty() {
        return None;
    }

    Some((name, tokens.map(str::to_string).collect()))
}
