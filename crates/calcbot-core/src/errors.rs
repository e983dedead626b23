/// Core error type for the calculator bot.
///
/// Adapter crates should map their specific errors into this type so the poll
/// loop can log failures consistently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
