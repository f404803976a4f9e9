use std::sync::Arc;

use crate::config::GameConfig;
use crate::services::room_store::RoomStore;

/// Application state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub config: GameConfig,
    /// Live rooms, shared across workers.
    pub rooms: Arc<RoomStore>,
}

impl AppState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rooms: RoomStore::new(),
        }
    }

    /// Default configuration with the given pauses, for tests.
    pub fn for_tests(round_pause_ms: u64, exchange_pause_ms: u64) -> Self {
        Self::new(GameConfig {
            round_pause: std::time::Duration::from_millis(round_pause_ms),
            exchange_pause: std::time::Duration::from_millis(exchange_pause_ms),
            ..GameConfig::default()
        })
    }
}
