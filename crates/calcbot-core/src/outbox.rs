//! Fire-and-forget outbound calls.
//!
//! The poll loop enqueues one-way commands on a bounded channel; a single
//! worker task drains it against the [`MessagingPort`]. A single worker keeps
//! the edits of one display in the order they were produced. Enqueueing never
//! waits: a full or closed queue drops the command and logs it.

use std::sync::Arc;

use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};

use crate::{
    domain::{ChatId, MessageRef},
    messaging::{port::MessagingPort, types::InlineKeyboard},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundCommand {
    /// Send a new calculator display.
    SendDisplay { chat_id: ChatId, text: String },
    /// Re-render an existing display in place.
    EditDisplay { msg: MessageRef, text: String },
    /// Stop the client's spinner for a tapped button.
    AnswerCallback { callback_id: String },
}

#[derive(Clone, Debug)]
pub struct Outbox {
    tx: mpsc::Sender<OutboundCommand>,
}

impl Outbox {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// The worker exits once every `Outbox` clone is dropped and the queue is drained.
    pub fn spawn(
        port: Arc<dyn MessagingPort>,
        keyboard: InlineKeyboard,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(rx, port, keyboard));
        (Self { tx }, worker)
    }

    pub fn send(&self, cmd: OutboundCommand) {
        match self.tx.try_send(cmd) {
            Ok(()) => {}
            Err(TrySendError::Full(cmd)) => {
                tracing::warn!(?cmd, "outbox full, dropping outbound call");
            }
            Err(TrySendError::Closed(cmd)) => {
                tracing::warn!(?cmd, "outbox closed, dropping outbound call");
            }
        }
    }
}

/// How the outbox worker ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerExit {
    /// Every sender was dropped and the queue drained.
    Drained,
    Panicked,
    Cancelled,
}

/// Wait for the worker to end and log how it ended.
///
/// Once the worker is gone every later outbound call is dropped, so an early
/// exit is logged at `error`.
pub async fn watch_worker(worker: JoinHandle<()>) -> WorkerExit {
    match worker.await {
        Ok(()) => {
            tracing::info!("outbox worker drained");
            WorkerExit::Drained
        }
        Err(e) if e.is_panic() => {
            tracing::error!("outbox worker panicked, outbound calls will be dropped: {e}");
            WorkerExit::Panicked
        }
        Err(e) => {
            tracing::error!("outbox worker cancelled, outbound calls will be dropped: {e}");
            WorkerExit::Cancelled
        }
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<OutboundCommand>,
    port: Arc<dyn MessagingPort>,
    keyboard: InlineKeyboard,
) {
    while let Some(cmd) = rx.recv().await {
        execute(port.as_ref(), &keyboard, cmd).await;
    }
    tracing::debug!("outbox worker stopped");
}

async fn execute(port: &dyn MessagingPort, keyboard: &InlineKeyboard, cmd: OutboundCommand) {
    match cmd {
        OutboundCommand::SendDisplay { chat_id, text } => {
            match port.send_inline_keyboard(chat_id, &text, keyboard).await {
                Ok(msg) => tracing::info!(
                    chat_id = msg.chat_id.0,
                    message_id = msg.message_id.0,
                    "calculator display sent"
                ),
                Err(e) => tracing::warn!(chat_id = chat_id.0, "send display failed: {e}"),
            }
        }
        OutboundCommand::EditDisplay { msg, text } => {
            if let Err(e) = port.edit_inline_keyboard(msg, &text, keyboard).await {
                tracing::warn!(
                    chat_id = msg.chat_id.0,
                    message_id = msg.message_id.0,
                    "edit display failed: {e}"
                );
            }
        }
        OutboundCommand::AnswerCallback { callback_id } => {
            if let Err(e) = port.answer_callback_query(&callback_id).await {
                tracing::warn!(%callback_id, "answer callback failed: {e}");
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::{domain::MessageId, errors::Error, Result};

    /// Outbound call as observed by [`RecordingPort`].
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Sent {
        Send { chat_id: i64, text: String },
        Edit { chat_id: i64, message_id: i32, text: String },
        Answer { callback_id: String },
    }

    /// Fake messenger that records calls and can be told to fail them all.
    #[derive(Default)]
    pub struct RecordingPort {
        pub calls: Mutex<Vec<Sent>>,
        pub keyboards: Mutex<Vec<InlineKeyboard>>,
        pub fail: bool,
    }

    impl RecordingPort {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<Sent> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Sent, keyboard: Option<&InlineKeyboard>) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if let Some(kb) = keyboard {
                self.keyboards.lock().unwrap().push(kb.clone());
            }
            if self.fail {
                return Err(Error::External("telegram error: boom".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MessagingPort for RecordingPort {
        async fn send_inline_keyboard(
            &self,
            chat_id: ChatId,
            text: &str,
            keyboard: &InlineKeyboard,
        ) -> Result<MessageRef> {
            self.record(
                Sent::Send {
                    chat_id: chat_id.0,
                    text: text.to_string(),
                },
                Some(keyboard),
            )?;
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(1),
            })
        }

        async fn edit_inline_keyboard(
            &self,
            msg: MessageRef,
            text: &str,
            keyboard: &InlineKeyboard,
        ) -> Result<()> {
            self.record(
                Sent::Edit {
                    chat_id: msg.chat_id.0,
                    message_id: msg.message_id.0,
                    text: text.to_string(),
                },
                Some(keyboard),
            )
        }

        async fn answer_callback_query(&self, callback_id: &str) -> Result<()> {
            self.record(
                Sent::Answer {
                    callback_id: callback_id.to_string(),
                },
                None,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{RecordingPort, Sent};
    use super::*;
    use crate::{domain::MessageId, keyboard::calculator_keyboard};

    #[tokio::test]
    async fn worker_executes_in_order_with_keyboard_attached() {
        let port = Arc::new(RecordingPort::default());
        let (outbox, worker) = Outbox::spawn(port.clone(), calculator_keyboard(), 8);

        outbox.send(OutboundCommand::SendDisplay {
            chat_id: ChatId(5),
            text: "0".to_string(),
        });
        outbox.send(OutboundCommand::EditDisplay {
            msg: MessageRef {
                chat_id: ChatId(5),
                message_id: MessageId(9),
            },
            text: "7".to_string(),
        });
        outbox.send(OutboundCommand::AnswerCallback {
            callback_id: "cb".to_string(),
        });
        drop(outbox);
        worker.await.unwrap();

        assert_eq!(
            port.calls(),
            vec![
                Sent::Send {
                    chat_id: 5,
                    text: "0".to_string()
                },
                Sent::Edit {
                    chat_id: 5,
                    message_id: 9,
                    text: "7".to_string()
                },
                Sent::Answer {
                    callback_id: "cb".to_string()
                },
            ]
        );
        let keyboards = port.keyboards.lock().unwrap();
        assert_eq!(keyboards.len(), 2);
        assert!(keyboards.iter().all(|kb| *kb == calculator_keyboard()));
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_worker() {
        let port = Arc::new(RecordingPort::failing());
        let (outbox, worker) = Outbox::spawn(port.clone(), calculator_keyboard(), 8);

        for id in ["a", "b"] {
            outbox.send(OutboundCommand::AnswerCallback {
                callback_id: id.to_string(),
            });
        }
        drop(outbox);
        worker.await.unwrap();

        assert_eq!(port.calls().len(), 2);
    }

    struct PanickingPort;

    #[async_trait::async_trait]
    impl MessagingPort for PanickingPort {
        async fn send_inline_keyboard(
            &self,
            _chat_id: ChatId,
            _text: &str,
            _keyboard: &InlineKeyboard,
        ) -> crate::Result<MessageRef> {
            panic!("send exploded");
        }

        async fn edit_inline_keyboard(
            &self,
            _msg: MessageRef,
            _text: &str,
            _keyboard: &InlineKeyboard,
        ) -> crate::Result<()> {
            panic!("edit exploded");
        }

        async fn answer_callback_query(&self, _callback_id: &str) -> crate::Result<()> {
            panic!("answer exploded");
        }
    }

    #[tokio::test]
    async fn watcher_reports_how_the_worker_ended() {
        let port = Arc::new(RecordingPort::default());
        let (outbox, worker) = Outbox::spawn(port, calculator_keyboard(), 8);
        drop(outbox);
        assert_eq!(watch_worker(worker).await, WorkerExit::Drained);

        let (outbox, worker) = Outbox::spawn(Arc::new(PanickingPort), calculator_keyboard(), 8);
        outbox.send(OutboundCommand::AnswerCallback {
            callback_id: "cb".to_string(),
        });
        assert_eq!(watch_worker(worker).await, WorkerExit::Panicked);

        // Sends after the worker died are dropped without blocking.
        outbox.send(OutboundCommand::AnswerCallback {
            callback_id: "late".to_string(),
        });

        let (_outbox, worker) = Outbox::spawn(
            Arc::new(RecordingPort::default()),
            calculator_keyboard(),
            8,
        );
        worker.abort();
        assert_eq!(watch_worker(worker).await, WorkerExit::Cancelled);
    }

    #[tokio::test]
    async fn full_queue_drops_instead_of_waiting() {
        // current_thread runtime: the worker cannot run until we yield.
        let port = Arc::new(RecordingPort::default());
        let (outbox, worker) = Outbox::spawn(port.clone(), calculator_keyboard(), 1);

        for id in ["a", "b", "c"] {
            outbox.send(OutboundCommand::AnswerCallback {
                callback_id: id.to_string(),
            });
        }
        drop(outbox);
        worker.await.unwrap();

        assert_eq!(
            port.calls(),
            vec![Sent::Answer {
                callback_id: "a".to_string()
            }]
        );
    }
}
