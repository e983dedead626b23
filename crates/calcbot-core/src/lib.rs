//! Core domain + application logic for the inline-keyboard calculator bot.
//!
//! This crate is intentionally framework-agnostic. Telegram lives behind the
//! ports (traits) in [`updates`] and [`messaging`], implemented in adapter crates.

pub mod calculator;
pub mod config;
pub mod domain;
pub mod errors;
pub mod keyboard;
pub mod logging;
pub mod messaging;
pub mod outbox;
pub mod poller;
pub mod session;
pub mod updates;

pub use errors::{Error, Result};
