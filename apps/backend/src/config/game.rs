//! Runtime configuration read once at startup.
//!
//! Every value has a default so a bare `drieslag` binary runs locally.
//! Invalid values are configuration errors, reported before the server binds.

use std::env;
use std::time::Duration;

use crate::domain::activity_log::DEFAULT_CAPACITY;
use crate::domain::{ChooserPolicy, RoomSettings};
use crate::error::AppError;

pub const DEFAULT_ROUND_PAUSE_MS: u64 = 1200;
pub const DEFAULT_EXCHANGE_PAUSE_MS: u64 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by CORS; empty means the localhost fallback.
    pub cors_origins: Vec<String>,
    /// Delay between a round closing and the next one opening.
    pub round_pause: Duration,
    /// How long the exchange summary stays up before mode selection.
    pub exchange_pause: Duration,
    pub chooser: ChooserPolicy,
    pub log_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
            round_pause: Duration::from_millis(DEFAULT_ROUND_PAUSE_MS),
            exchange_pause: Duration::from_millis(DEFAULT_EXCHANGE_PAUSE_MS),
            chooser: ChooserPolicy::default(),
            log_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("BACKEND_HOST").unwrap_or(defaults.host);
        let port = match var("BACKEND_PORT") {
            Some(raw) => parse_number("BACKEND_PORT", &raw)?,
            None => defaults.port,
        };
        let cors_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        let round_pause = match var("DRIESLAG_ROUND_PAUSE_MS") {
            Some(raw) => Duration::from_millis(parse_number("DRIESLAG_ROUND_PAUSE_MS", &raw)?),
            None => defaults.round_pause,
        };
        let exchange_pause = match var("DRIESLAG_EXCHANGE_PAUSE_MS") {
            Some(raw) => {
                Duration::from_millis(parse_number("DRIESLAG_EXCHANGE_PAUSE_MS", &raw)?)
            }
            None => defaults.exchange_pause,
        };
        let chooser = match var("DRIESLAG_MODE_CHOOSER") {
            Some(raw) => raw.parse().map_err(|_| {
                AppError::config(format!(
                    "DRIESLAG_MODE_CHOOSER must be 'loser' or 'winner', got '{raw}'"
                ))
            })?,
            None => defaults.chooser,
        };
        let log_capacity = match var("DRIESLAG_LOG_CAPACITY") {
            Some(raw) => parse_number("DRIESLAG_LOG_CAPACITY", &raw)?,
            None => defaults.log_capacity,
        };
        if log_capacity == 0 {
            return Err(AppError::config("DRIESLAG_LOG_CAPACITY must be at least 1"));
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            round_pause,
            exchange_pause,
            chooser,
            log_capacity,
        })
    }

    pub fn room_settings(&self) -> RoomSettings {
        RoomSettings {
            chooser: self.chooser,
            log_capacity: self.log_capacity,
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::config(format!("{key} must be a non-negative number, got '{raw}'")))
}

/// Comma list of http(s) origins; blanks and "null" are dropped.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}
