//! Configuration module - environment variable parsing

use std::env;

use crate::util::time::DEFAULT_TICK_RATE;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Optional fixed seed for the match RNG (particle jitter)
    pub match_seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let tick_rate = match env::var("TICK_RATE") {
            Ok(raw) => raw
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidTickRate(raw.clone()))?,
            Err(_) => DEFAULT_TICK_RATE,
        };

        if !(1..=240).contains(&tick_rate) {
            return Err(ConfigError::TickRateOutOfRange(tick_rate));
        }

        let match_seed = match env::var("MATCH_SEED") {
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed(raw.clone()))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            tick_rate,
            match_seed,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            tick_rate: DEFAULT_TICK_RATE,
            match_seed: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TICK_RATE is not a valid integer: {0}")]
    InvalidTickRate(String),

    #[error("TICK_RATE must be between 1 and 240, got {0}")]
    TickRateOutOfRange(u32),

    #[error("MATCH_SEED is not a valid integer: {0}")]
    InvalidSeed(String),
}
