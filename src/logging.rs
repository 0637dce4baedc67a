//! Tracing setup for the bot process.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{BotError, Result};

/// Parse a `LOG_LEVEL` value such as `info` or `DEBUG`
pub fn parse_level(value: &str) -> Result<LevelFilter> {
    value
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| BotError::ConfigValidation {
            message: format!(
                "LOG_LEVEL '{}' is not one of off, trace, debug, info, warn, error",
                value
            ),
        })
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init(level: LevelFilter) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true),
        )
        .with(level)
        .init();
}
