//! Synthetic seat that takes the turn only to pass.

use crate::domain::activity_log::ActivityLog;
use crate::domain::participants::Seating;
use crate::domain::round::{Round, TurnOutcome};

/// Pass on behalf of the filler for as long as it holds the turn. Returns
/// the turn holder that needs a real decision, or the closure the passes
/// caused.
pub fn drive(round: &mut Round, seating: &Seating, log: &mut ActivityLog) -> TurnOutcome {
    loop {
        let turn = round.turn;
        let Some(filler) = seating.get(turn).filter(|p| p.is_filler()) else {
            return TurnOutcome::Next(turn);
        };
        if round.acted.contains(&turn) {
            // Already passed this lap; advance would not pick it again.
            return TurnOutcome::Next(turn);
        }

        round.record_pass(turn);
        log.info(format!("{} passes.", filler.name));

        if let TurnOutcome::Closed { winner } = round.advance(seating) {
            return TurnOutcome::Closed { winner };
        }
    }
}
