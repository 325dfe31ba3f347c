//! Outbound message model
//!
//! Handlers never talk to the chat transport directly. They queue
//! [`OutboundMessage`]s in an [`Outbox`], and the transport renders them
//! once the event has been routed.

use serde::{Deserialize, Serialize};

/// Inline keyboard button: a label and the callback signature it emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub signature: String,
}

/// Ordered grid of buttons, one inner vector per row
pub type Keyboard = Vec<Vec<Button>>;

pub fn button(label: impl Into<String>, signature: impl Into<String>) -> Button {
    Button {
        label: label.into(),
        signature: signature.into(),
    }
}

/// How the transport should deliver a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delivery {
    /// Send a new message
    Send,
    /// Replace the text of an existing message
    Edit(i32),
}

/// Instruction to the chat transport. Text is legacy Telegram Markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
    pub buttons: Option<Keyboard>,
    pub delivery: Delivery,
}

impl OutboundMessage {
    /// Every callback signature carried by this message's buttons
    pub fn signatures(&self) -> impl Iterator<Item = &str> {
        self.buttons
            .iter()
            .flatten()
            .flatten()
            .map(|b| b.signature.as_str())
    }
}

/// Messages produced while handling one event
#[derive(Debug, Clone)]
pub struct Outbox {
    chat_id: i64,
    origin_message: Option<i32>,
    messages: Vec<OutboundMessage>,
}

impl Outbox {
    pub fn new(chat_id: i64, origin_message: Option<i32>) -> Self {
        Self {
            chat_id,
            origin_message,
            messages: Vec::new(),
        }
    }

    /// Send a new message
    pub fn reply(&mut self, text: impl Into<String>) {
        self.push(text.into(), None, Delivery::Send);
    }

    /// Send a new message with an inline keyboard
    pub fn reply_with(&mut self, text: impl Into<String>, keyboard: Keyboard) {
        self.push(text.into(), Some(keyboard), Delivery::Send);
    }

    /// Replace the originating message, or send a new one if there is none
    pub fn replace(&mut self, text: impl Into<String>) {
        let delivery = self.edit_delivery();
        self.push(text.into(), None, delivery);
    }

    /// Replace the originating message with new text and keyboard
    pub fn replace_with(&mut self, text: impl Into<String>, keyboard: Keyboard) {
        let delivery = self.edit_delivery();
        self.push(text.into(), Some(keyboard), delivery);
    }

    pub fn messages(&self) -> &[OutboundMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<OutboundMessage> {
        self.messages
    }

    fn edit_delivery(&self) -> Delivery {
        self.origin_message.map_or(Delivery::Send, Delivery::Edit)
    }

    fn push(&mut self, text: String, buttons: Option<Keyboard>, delivery: Delivery) {
        self.messages.push(OutboundMessage {
            chat_id: self.chat_id,
            text,
            buttons,
            delivery,
        });
    }
}
