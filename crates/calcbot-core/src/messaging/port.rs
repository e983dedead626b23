use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::InlineKeyboard,
    Result,
};

/// Outbound half of the gateway: the calls a calculator display needs.
///
/// Callers treat every call as fire-and-forget; errors are only logged.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<MessageRef>;

    async fn edit_inline_keyboard(
        &self,
        msg: MessageRef,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<()>;

    async fn answer_callback_query(&self, callback_id: &str) -> Result<()>;
}
