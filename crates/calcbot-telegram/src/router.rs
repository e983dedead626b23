use std::sync::Arc;

use teloxide::prelude::*;

use calcbot_core::{
    config::Config,
    keyboard::calculator_keyboard,
    messaging::port::MessagingPort,
    outbox::{watch_worker, Outbox},
    poller::Poller,
    session::SessionStore,
    updates::UpdateSource,
};

use crate::TelegramGateway;

/// Wire the Telegram gateway into the poll loop and run it forever.
pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    match bot.get_me().await {
        Ok(me) => tracing::info!("calcbot started: @{}", me.username()),
        Err(e) => tracing::warn!("getMe failed, polling anyway: {e}"),
    }
    tracing::info!(
        poll_interval_ms = cfg.poll_interval.as_millis() as u64,
        session_capacity = cfg.session_capacity,
        session_idle_ttl_secs = cfg.session_idle_ttl.as_secs(),
        outbox_capacity = cfg.outbox_capacity,
        "configuration loaded"
    );

    let gateway = Arc::new(TelegramGateway::new(bot));
    let source: Arc<dyn UpdateSource> = gateway.clone();
    let messenger: Arc<dyn MessagingPort> = gateway;

    let (outbox, worker) = Outbox::spawn(messenger, calculator_keyboard(), cfg.outbox_capacity);
    tokio::spawn(watch_worker(worker));
    let sessions = SessionStore::new(cfg.session_capacity, cfg.session_idle_ttl);

    Poller::new(source, outbox, sessions, cfg.poll_interval)
        .run()
        .await;

    Ok(())
}
