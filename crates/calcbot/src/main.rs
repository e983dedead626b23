use std::sync::Arc;

use calcbot_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), calcbot_core::Error> {
    calcbot_core::logging::init("calcbot")?;

    let cfg = Arc::new(Config::load()?);

    calcbot_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| calcbot_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
