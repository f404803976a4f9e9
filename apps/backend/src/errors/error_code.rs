//! Error codes for the drieslag server.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in websocket acknowledgements and HTTP problem bodies.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lookup
    /// Room code does not resolve to a live room
    RoomNotFound,
    /// Participant is not seated in the room
    ParticipantNotFound,

    // Sequencing
    /// Action not permitted in the current phase
    WrongPhase,
    /// Acting participant is not the turn holder
    NotYourTurn,
    /// Acting participant already acted this lap
    AlreadyActed,

    // Card selection
    /// Empty selection
    NoCardsSelected,
    /// Selected card is not in the acting hand
    CardNotInHand,
    /// Selected cards do not share one rank
    MixedRanks,
    /// Set size differs from the pile count
    CountMismatch,
    /// Set does not beat the pile
    TooLow,
    /// Pile was raised; appending is closed
    MustRaise,
    /// Raise does not keep the red-card count of the pile
    ColorMismatch,
    /// Opening turn cannot be passed
    MustOpen,

    // Privilege
    /// Host-only action
    HostOnly,
    /// Only the designated chooser may pick the next variant
    NotChooser,
    /// Fewer than two real participants
    InsufficientParticipants,

    // Request Validation
    /// Room already holds the maximum number of participants
    RoomFull,
    /// Variant key not recognised
    UnknownMode,
    /// Malformed message
    BadRequest,
    /// Unsupported protocol message
    BadProtocol,

    // System Errors
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::ParticipantNotFound => "PARTICIPANT_NOT_FOUND",

            Self::WrongPhase => "WRONG_PHASE",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::AlreadyActed => "ALREADY_ACTED",

            Self::NoCardsSelected => "NO_CARDS_SELECTED",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::MixedRanks => "MIXED_RANKS",
            Self::CountMismatch => "COUNT_MISMATCH",
            Self::TooLow => "TOO_LOW",
            Self::MustRaise => "MUST_RAISE",
            Self::ColorMismatch => "COLOR_MISMATCH",
            Self::MustOpen => "MUST_OPEN",

            Self::HostOnly => "HOST_ONLY",
            Self::NotChooser => "NOT_CHOOSER",
            Self::InsufficientParticipants => "INSUFFICIENT_PARTICIPANTS",

            Self::RoomFull => "ROOM_FULL",
            Self::UnknownMode => "UNKNOWN_MODE",
            Self::BadRequest => "BAD_REQUEST",
            Self::BadProtocol => "BAD_PROTOCOL",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
