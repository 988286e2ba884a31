//! Outbound delivery to Telegram and Prometheus metrics.

pub mod prometheus;
pub mod telegram;

pub use self::prometheus::Metrics;
pub use self::telegram::{MessageDelivery, OutboundMessage, TelegramClient};
