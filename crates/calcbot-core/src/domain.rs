/// Telegram chat id (numeric). One chat is one conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
///
/// Also the calculator session key: every display message carries its own state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Identifier the Bot API assigns to each update, increasing over time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UpdateId(pub i32);

impl UpdateId {
    /// The id right after this one (where the cursor goes once this update is seen).
    pub fn next(self) -> UpdateId {
        UpdateId(self.0.saturating_add(1))
    }
}
