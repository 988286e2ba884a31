//! Configuration loading and validation.
//!
//! Configuration is read once at startup, validated, and then handed to the
//! relay and server by value. Nothing mutates it afterwards.

pub mod loader;
pub mod model;

pub use loader::{ensure_valid, load};
pub use model::AppConfig;

/// Environment variable holding the Telegram bot token.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable holding the destination chat id.
pub const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";
