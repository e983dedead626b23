//! Telegram adapter (teloxide).
//!
//! This crate implements the `calcbot-core` ports over the Telegram Bot API:
//! `getUpdates` for the update stream, and `sendMessage` / `editMessageText` /
//! `answerCallbackQuery` for the calculator display.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{
        CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, Update,
        UpdateKind as TgUpdateKind,
    },
};

pub mod router;

use calcbot_core::{
    calculator::Button,
    domain::{ChatId, MessageId, MessageRef, UpdateId},
    errors::Error,
    messaging::{port::MessagingPort, types::InlineKeyboard},
    updates::{ButtonPress, TextMessage, Update as CoreUpdate, UpdateKind, UpdateSource},
    Result,
};

#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn tg_markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
        let rows: Vec<Vec<InlineKeyboardButton>> = keyboard
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| {
                        InlineKeyboardButton::callback(b.label.clone(), b.callback_data.clone())
                    })
                    .collect()
            })
            .collect();
        InlineKeyboardMarkup::new(rows)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }
}

#[async_trait]
impl UpdateSource for TelegramGateway {
    async fn fetch_updates(&self, offset: UpdateId) -> Result<Vec<CoreUpdate>> {
        let updates = self
            .bot
            .get_updates()
            .offset(offset.0)
            .await
            .map_err(Self::map_err)?;

        Ok(updates.into_iter().map(to_core_update).collect())
    }
}

#[async_trait]
impl MessagingPort for TelegramGateway {
    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<MessageRef> {
        let msg = self
            .bot
            .send_message(Self::tg_chat(chat_id), text.to_string())
            .reply_markup(Self::tg_markup(keyboard))
            .await
            .map_err(Self::map_err)?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn edit_inline_keyboard(
        &self,
        msg: MessageRef,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<()> {
        self.bot
            .edit_message_text(
                Self::tg_chat(msg.chat_id),
                Self::tg_msg_id(msg.message_id),
                text.to_string(),
            )
            .reply_markup(Self::tg_markup(keyboard))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str) -> Result<()> {
        self.bot
            .answer_callback_query(callback_id.to_string())
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}

/// Classify a raw Telegram update for the poll loop.
pub fn to_core_update(update: Update) -> CoreUpdate {
    let kind = match update.kind {
        TgUpdateKind::Message(msg) => match msg.text() {
            Some(text) => UpdateKind::Text(TextMessage {
                chat_id: ChatId(msg.chat.id.0),
                text: text.to_string(),
            }),
            None => UpdateKind::Ignored { callback_id: None },
        },
        TgUpdateKind::CallbackQuery(q) => button_press(q),
        _ => UpdateKind::Ignored { callback_id: None },
    };

    CoreUpdate {
        id: UpdateId(update.id),
        kind,
    }
}

fn button_press(q: CallbackQuery) -> UpdateKind {
    let button = q.data.as_deref().and_then(|d| d.parse::<Button>().ok());

    match (q.message, button) {
        (Some(msg), Some(button)) => UpdateKind::Button(ButtonPress {
            callback_id: q.id,
            display: MessageRef {
                chat_id: ChatId(msg.chat.id.0),
                message_id: MessageId(msg.id.0),
            },
            displayed_text: msg.text().unwrap_or_default().to_string(),
            button,
        }),
        // Inline-mode callbacks carry no message; unknown data is not ours.
        _ => UpdateKind::Ignored {
            callback_id: Some(q.id),
        },
    }
}
