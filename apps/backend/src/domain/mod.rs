//! Domain layer: pure game logic types and helpers.

pub mod activity_log;
pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_types;
pub mod dealing;
pub mod filler;
pub mod game_transition;
pub mod lifecycle;
pub mod participants;
pub mod pile;
pub mod reward;
pub mod round;
pub mod snapshot;
pub mod state;
pub mod validation;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_props_game;
#[cfg(test)]
mod tests_props_round;
#[cfg(test)]
mod tests_props_validation;

// Re-exports for ergonomics
pub use cards_types::{Card, CardColor, CardFace, CardId, Rank, Suit};
pub use dealing::deal_hands;
pub use lifecycle::{Continuation, Joined, LeaveOutcome, Pause, Step};
pub use participants::{ParticipantId, Profile, PublicParticipant};
pub use state::{ChooserPolicy, Phase, PhaseKind, Room, RoomSettings};
pub use validation::GameMode;
