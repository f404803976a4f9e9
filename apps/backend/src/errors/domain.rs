//! Domain-level error type used by the rules engine and the room actor.
//!
//! This error type is transport-agnostic. The websocket layer turns it into a
//! rejected acknowledgement and the HTTP layer converts it into
//! `crate::error::AppError` via the provided `From` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::errors::ErrorCode;

/// Why a proposed set of cards was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalSetKind {
    NoCards,
    CardNotInHand,
    MixedRanks,
    CountMismatch,
    TooLow,
    MustRaise,
    ColorMismatch,
    /// The round has no pile yet and the acting participant tried to pass.
    MustOpen,
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Participant,
}

/// Which privilege an action required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Host,
    Chooser,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Referenced room or participant does not exist
    NotFound(NotFoundKind, String),
    /// Action attempted outside the phase that permits it
    WrongPhase(String),
    /// Acting identity is not the current turn holder
    NotYourTurn,
    /// Acting identity already played or passed this lap
    AlreadyActed,
    /// Selected cards are not a legal play under the active variant
    IllegalSet(IllegalSetKind, String),
    /// Host or chooser privilege required
    Unauthorized(Privilege, String),
    /// Fewer than two real participants seated
    InsufficientParticipants { present: usize },
    /// Malformed request (unknown variant key, room full, ...)
    Validation(ErrorCode, String),
    /// Internal invariant breach; the room falls back to lobby
    Inconsistent(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::WrongPhase(d) => write!(f, "wrong phase: {d}"),
            DomainError::NotYourTurn => write!(f, "not your turn"),
            DomainError::AlreadyActed => write!(f, "already acted this lap"),
            DomainError::IllegalSet(_, d) => write!(f, "illegal set: {d}"),
            DomainError::Unauthorized(_, d) => write!(f, "unauthorized: {d}"),
            DomainError::InsufficientParticipants { present } => {
                write!(f, "at least 2 players needed, {present} present")
            }
            DomainError::Validation(_, d) => write!(f, "validation error: {d}"),
            DomainError::Inconsistent(d) => write!(f, "inconsistent room state: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn room_not_found(code: impl Into<String>) -> Self {
        Self::NotFound(NotFoundKind::Room, format!("Room {} not found", code.into()))
    }

    pub fn wrong_phase(detail: impl Into<String>) -> Self {
        Self::WrongPhase(detail.into())
    }

    pub fn illegal(kind: IllegalSetKind, detail: impl Into<String>) -> Self {
        Self::IllegalSet(kind, detail.into())
    }

    pub fn host_only(detail: impl Into<String>) -> Self {
        Self::Unauthorized(Privilege::Host, detail.into())
    }

    pub fn validation(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation(code, detail.into())
    }

    pub fn inconsistent(detail: impl Into<String>) -> Self {
        Self::Inconsistent(detail.into())
    }

    /// Stable code for this rejection.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::NotFound(NotFoundKind::Room, _) => ErrorCode::RoomNotFound,
            DomainError::NotFound(NotFoundKind::Participant, _) => ErrorCode::ParticipantNotFound,
            DomainError::WrongPhase(_) => ErrorCode::WrongPhase,
            DomainError::NotYourTurn => ErrorCode::NotYourTurn,
            DomainError::AlreadyActed => ErrorCode::AlreadyActed,
            DomainError::IllegalSet(kind, _) => match kind {
                IllegalSetKind::NoCards => ErrorCode::NoCardsSelected,
                IllegalSetKind::CardNotInHand => ErrorCode::CardNotInHand,
                IllegalSetKind::MixedRanks => ErrorCode::MixedRanks,
                IllegalSetKind::CountMismatch => ErrorCode::CountMismatch,
                IllegalSetKind::TooLow => ErrorCode::TooLow,
                IllegalSetKind::MustRaise => ErrorCode::MustRaise,
                IllegalSetKind::ColorMismatch => ErrorCode::ColorMismatch,
                IllegalSetKind::MustOpen => ErrorCode::MustOpen,
            },
            DomainError::Unauthorized(Privilege::Host, _) => ErrorCode::HostOnly,
            DomainError::Unauthorized(Privilege::Chooser, _) => ErrorCode::NotChooser,
            DomainError::InsufficientParticipants { .. } => ErrorCode::InsufficientParticipants,
            DomainError::Validation(code, _) => *code,
            DomainError::Inconsistent(_) => ErrorCode::Internal,
        }
    }

    /// Human-readable reason shown to the acting client.
    pub fn reason(&self) -> String {
        match self {
            DomainError::NotFound(_, d)
            | DomainError::WrongPhase(d)
            | DomainError::IllegalSet(_, d)
            | DomainError::Unauthorized(_, d)
            | DomainError::Validation(_, d) => d.clone(),
            DomainError::NotYourTurn => "Another player is on turn.".to_string(),
            DomainError::AlreadyActed => "You already acted this lap.".to_string(),
            DomainError::InsufficientParticipants { .. } => {
                "At least 2 players are needed.".to_string()
            }
            DomainError::Inconsistent(_) => {
                "The room hit an inconsistent state and returned to the lobby.".to_string()
            }
        }
    }
}
