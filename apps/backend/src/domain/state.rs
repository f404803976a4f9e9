use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::activity_log::ActivityLog;
use crate::domain::participants::{ParticipantId, Seating};
use crate::domain::reward::ExchangeSummary;
use crate::domain::round::Round;
use crate::domain::validation::GameMode;
use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;

/// Who picks the variant for the next game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChooserPolicy {
    #[default]
    Loser,
    Winner,
}

impl FromStr for ChooserPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loser" => Ok(ChooserPolicy::Loser),
            "winner" => Ok(ChooserPolicy::Winner),
            other => Err(DomainError::validation(
                ErrorCode::BadRequest,
                format!("Unknown chooser policy: {other}"),
            )),
        }
    }
}

/// Per-room rule settings fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSettings {
    pub chooser: ChooserPolicy,
    pub log_capacity: usize,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            chooser: ChooserPolicy::default(),
            log_capacity: crate::domain::activity_log::DEFAULT_CAPACITY,
        }
    }
}

/// End-of-game summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// Real participants in finishing order, loser last.
    pub ranking: Vec<ParticipantId>,
    pub winner: Option<ParticipantId>,
    pub loser: Option<ParticipantId>,
}

/// Room phase. Each variant carries exactly the state valid in it.
#[derive(Debug, Clone)]
pub enum Phase {
    Lobby,
    Playing {
        round: Round,
        /// Real participants who emptied their hand, in order.
        finish_order: Vec<ParticipantId>,
        /// Winner of a closed round waiting out the pause.
        closing: Option<ParticipantId>,
        /// Cards played this game, current pile included.
        table: usize,
        /// Cards in hands when play began.
        dealt: usize,
    },
    Ended {
        result: GameResult,
    },
    RewardExchange {
        result: GameResult,
        exchange: ExchangeSummary,
    },
    ModeSelect {
        result: GameResult,
        chooser: ParticipantId,
        exchange: Option<ExchangeSummary>,
    },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Lobby,
    Playing,
    Ended,
    RewardExchange,
    ModeSelect,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseKind::Lobby => "lobby",
            PhaseKind::Playing => "playing",
            PhaseKind::Ended => "ended",
            PhaseKind::RewardExchange => "reward_exchange",
            PhaseKind::ModeSelect => "mode_select",
        };
        f.write_str(s)
    }
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Lobby => PhaseKind::Lobby,
            Phase::Playing { .. } => PhaseKind::Playing,
            Phase::Ended { .. } => PhaseKind::Ended,
            Phase::RewardExchange { .. } => PhaseKind::RewardExchange,
            Phase::ModeSelect { .. } => PhaseKind::ModeSelect,
        }
    }

    pub fn round(&self) -> Option<&Round> {
        match self {
            Phase::Playing { round, .. } => Some(round),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&GameResult> {
        match self {
            Phase::Ended { result }
            | Phase::RewardExchange { result, .. }
            | Phase::ModeSelect { result, .. } => Some(result),
            Phase::Lobby | Phase::Playing { .. } => None,
        }
    }

    pub fn exchange(&self) -> Option<&ExchangeSummary> {
        match self {
            Phase::RewardExchange { exchange, .. } => Some(exchange),
            Phase::ModeSelect { exchange, .. } => exchange.as_ref(),
            _ => None,
        }
    }
}

/// The room aggregate.
#[derive(Debug, Clone)]
pub struct Room {
    pub code: String,
    pub seating: Seating,
    pub phase: Phase,
    pub mode: GameMode,
    /// Bumped whenever pending continuations must be discarded.
    pub epoch: u64,
    pub seed: u64,
    /// Games dealt so far.
    pub game_no: u32,
    pub settings: RoomSettings,
    pub log: ActivityLog,
}

impl Room {
    pub fn new(code: impl Into<String>, seed: u64, settings: RoomSettings) -> Self {
        Self {
            code: code.into(),
            seating: Seating::new(),
            phase: Phase::Lobby,
            mode: GameMode::default(),
            epoch: 0,
            seed,
            game_no: 0,
            settings,
            log: ActivityLog::with_capacity(settings.log_capacity),
        }
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    /// Turn holder, if play is waiting on someone.
    pub fn current_turn(&self) -> Option<ParticipantId> {
        match &self.phase {
            Phase::Playing {
                round,
                closing: None,
                ..
            } => Some(round.turn),
            _ => None,
        }
    }

    pub fn finish_order(&self) -> &[ParticipantId] {
        match &self.phase {
            Phase::Playing { finish_order, .. } => finish_order,
            _ => &[],
        }
    }

    /// (cards in hands + cards played, cards dealt) while playing.
    pub fn card_balance(&self) -> Option<(usize, usize)> {
        match &self.phase {
            Phase::Playing { table, dealt, .. } => {
                Some((self.seating.total_cards() + table, *dealt))
            }
            _ => None,
        }
    }

    pub fn bump_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    pub fn joinable(&self) -> bool {
        matches!(self.phase, Phase::Lobby)
            && self.seating.real_count() < crate::domain::participants::MAX_REAL_PARTICIPANTS
    }
}
