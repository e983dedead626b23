//! Update poll loop.
//!
//! Alternates strictly between Fetch and Dispatch. The cursor moves past every
//! update it has seen, ignored ones included, and never moves back. Outbound
//! calls go through the [`Outbox`] so a slow or failing Telegram call never
//! holds up the cursor or the next fetch.

use std::{sync::Arc, time::Duration};

use crate::{
    calculator,
    domain::UpdateId,
    outbox::{OutboundCommand, Outbox},
    session::SessionStore,
    updates::{ButtonPress, TextMessage, Update, UpdateKind, UpdateSource},
};

/// Text of a freshly started calculator display.
pub const INITIAL_DISPLAY: &str = "0";

pub struct Poller {
    source: Arc<dyn UpdateSource>,
    outbox: Outbox,
    sessions: SessionStore,
    cursor: UpdateId,
    interval: Duration,
}

impl Poller {
    pub fn new(
        source: Arc<dyn UpdateSource>,
        outbox: Outbox,
        sessions: SessionStore,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            outbox,
            sessions,
            cursor: UpdateId(0),
            interval,
        }
    }

    /// Next update id to request.
    pub fn cursor(&self) -> UpdateId {
        self.cursor
    }

    #[cfg(test)]
    fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Poll forever. Only ends when the process does.
    pub async fn run(mut self) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "polling started");
        loop {
            self.poll_once().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One Fetch + Dispatch cycle. Returns how many updates were dispatched.
    ///
    /// A failed fetch counts as an empty batch.
    pub async fn poll_once(&mut self) -> usize {
        let batch = match self.source.fetch_updates(self.cursor).await {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!(offset = self.cursor.0, "fetching updates failed: {e}");
                return 0;
            }
        };

        let count = batch.len();
        for update in batch {
            self.dispatch(update);
        }
        count
    }

    /// Handle one update and advance the cursor past it.
    pub fn dispatch(&mut self, update: Update) {
        tracing::debug!(update_id = update.id.0, kind = ?update.kind, "update received");

        match update.kind {
            UpdateKind::Text(msg) => self.on_text(msg),
            UpdateKind::Button(press) => self.on_button(press),
            UpdateKind::Ignored { callback_id } => {
                if let Some(callback_id) = callback_id {
                    self.outbox.send(OutboundCommand::AnswerCallback { callback_id });
                }
            }
        }

        if update.id >= self.cursor {
            self.cursor = update.id.next();
        }
    }

    fn on_text(&mut self, msg: TextMessage) {
        if !msg.is_start_command() {
            return;
        }
        self.outbox.send(OutboundCommand::SendDisplay {
            chat_id: msg.chat_id,
            text: INITIAL_DISPLAY.to_string(),
        });
    }

    fn on_button(&mut self, press: ButtonPress) {
        let session = self.sessions.get_or_create(press.display);
        let next = calculator::apply(*session, &press.displayed_text, press.button);
        *session = next.session;

        tracing::debug!(
            chat_id = press.display.chat_id.0,
            message_id = press.display.message_id.0,
            button = %press.button,
            accumulator = next.session.accumulator,
            display = %next.display,
            "button applied"
        );

        // Telegram rejects edits that leave the text unchanged.
        if next.display != press.displayed_text {
            self.outbox.send(OutboundCommand::EditDisplay {
                msg: press.display,
                text: next.display,
            });
        }
        self.outbox.send(OutboundCommand::AnswerCallback {
            callback_id: press.callback_id,
        });
    }
}
