use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

/// Typed configuration for the calculator bot.
///
/// Only the bot token is required; everything else has a default tuned for a
/// single small bot process.
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,

    // Polling
    pub poll_interval: Duration,

    // Session store bounds
    pub session_capacity: usize,
    pub session_idle_ttl: Duration,

    // Outbound queue
    pub outbox_capacity: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process env in `load`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?;

        let poll_interval =
            Duration::from_millis(parse_u64(lookup("POLL_INTERVAL_MS")).unwrap_or(100));

        let session_capacity = parse_usize(lookup("SESSION_CAPACITY"))
            .unwrap_or(10_000)
            .max(1);
        let session_idle_ttl =
            Duration::from_secs(parse_u64(lookup("SESSION_IDLE_TTL_SECS")).unwrap_or(86_400));

        let outbox_capacity = parse_usize(lookup("OUTBOX_CAPACITY"))
            .unwrap_or(256)
            .max(1);

        Ok(Self {
            telegram_bot_token: telegram_bot_token.trim().to_string(),
            poll_interval,
            session_capacity,
            session_idle_ttl,
            outbox_capacity,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = &val[1..val.len() - 1];
        }

        out.push((key.to_string(), val.to_string()));
    }
    out
}

fn parse_u64(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
}

fn parse_usize(v: Option<String>) -> Option<usize> {
    v.and_then(|s| s.trim().parse::<usize>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
