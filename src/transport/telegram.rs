//! Telegram transport
//!
//! Converts teloxide updates into [`InboundEvent`]s and renders
//! [`OutboundMessage`]s back through the Bot API.

use teloxide::prelude::*;
use teloxide::sugar::request::RequestLinkPreviewExt;
use teloxide::types::{
    CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, MaybeInaccessibleMessage, Message, MessageId, ParseMode,
};
use teloxide::{ApiError, RequestError};
use tracing::{debug, warn};

use crate::models::{Delivery, InboundEvent, Keyboard, OutboundMessage, UserId};
use crate::utils::errors::Result;

/// Event for a text message; `None` for anything without text or sender
pub fn event_from_message(msg: &Message) -> Option<InboundEvent> {
    let user = msg.from.as_ref()?;
    let text = msg.text()?;

    Some(InboundEvent::from_message_text(UserId(user.id.0 as i64), msg.chat.id.0, text))
}

/// Event for a button press; `None` when the query carries no data
pub fn event_from_callback(query: &CallbackQuery) -> Option<InboundEvent> {
    let data = query.data.as_deref()?;
    let user_id = UserId(query.from.id.0 as i64);

    let event = match &query.message {
        Some(MaybeInaccessibleMessage::Regular(message)) => {
            InboundEvent::callback(user_id, message.chat.id.0, data).with_message_id(message.id.0)
        }
        Some(message) => InboundEvent::callback(user_id, message.chat().id.0, data),
        None => InboundEvent::callback(user_id, user_id.0, data),
    };

    Some(event)
}

/// Build a teloxide inline keyboard
pub fn keyboard_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.signature.clone()))
            .collect::<Vec<_>>()
    }))
}

/// Deliver messages in order
pub async fn render(bot: &Bot, messages: Vec<OutboundMessage>) -> Result<()> {
    for message in messages {
        match message.delivery {
            Delivery::Send => send(bot, &message).await?,
            Delivery::Edit(message_id) => {
                let chat_id = ChatId(message.chat_id);
                let mut request = bot
                    .edit_message_text(chat_id, MessageId(message_id), message.text.clone())
                    .parse_mode(ParseMode::Markdown)
                    .disable_link_preview(true);
                if let Some(keyboard) = &message.buttons {
                    request = request.reply_markup(keyboard_markup(keyboard));
                }

                match request.await {
                    Ok(_) => {}
                    Err(RequestError::Api(ApiError::MessageNotModified)) => {
                        debug!(chat_id = message.chat_id, message_id, "Message already up to date");
                    }
                    Err(e) => {
                        warn!(chat_id = message.chat_id, message_id, error = %e, "Edit failed, sending a new message");
                        send(bot, &message).await?;
                    }
                }
            }
        }
    }

    Ok(())
}

async fn send(bot: &Bot, message: &OutboundMessage) -> Result<()> {
    let mut request = bot
        .send_message(ChatId(message.chat_id), message.text.clone())
        .parse_mode(ParseMode::Markdown)
        .disable_link_preview(true);
    if let Some(keyboard) = &message.buttons {
        request = request.reply_markup(keyboard_markup(keyboard));
    }

    request.await?;
    Ok(())
}

/// Stop the client-side spinner on a pressed button
pub async fn acknowledge(bot: &Bot, query: &CallbackQuery) {
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }
}
