use async_trait::async_trait;

use crate::{
    calculator::Button,
    domain::{ChatId, MessageRef, UpdateId},
    Result,
};

/// Incoming update, classified once at ingestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update {
    pub id: UpdateId,
    pub kind: UpdateKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateKind {
    Text(TextMessage),
    Button(ButtonPress),
    /// Anything the calculator does not react to. A callback that could not be
    /// turned into a button press keeps its id so it can still be answered.
    Ignored { callback_id: Option<String> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub text: String,
}

impl TextMessage {
    pub fn is_start_command(&self) -> bool {
        self.text == "/start"
    }
}

/// A tap on a calculator keyboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonPress {
    pub callback_id: String,
    /// The display message the keyboard is attached to.
    pub display: MessageRef,
    /// Text currently shown on that display.
    pub displayed_text: String,
    pub button: Button,
}

/// Inbound half of the gateway: the remote update stream.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Fetch updates with `id >= offset`, ascending by id.
    async fn fetch_updates(&self, offset: UpdateId) -> Result<Vec<Update>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_start_is_a_start_command() {
        let msg = |text: &str| TextMessage {
            chat_id: ChatId(1),
            text: text.to_string(),
        };
        assert!(msg("/start").is_start_command());
        assert!(!msg("/start now").is_start_command());
        assert!(!msg("start").is_start_command());
        assert!(!msg("/START").is_start_command());
    }
}
