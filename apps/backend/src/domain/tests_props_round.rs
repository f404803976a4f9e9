/// Property-based tests for turn traversal and round closure
use std::collections::HashSet;

use proptest::prelude::*;

use crate::domain::cards_parsing::try_mint_cards;
use crate::domain::participants::{ParticipantId, Profile, Seating};
use crate::domain::pile::Pile;
use crate::domain::round::{traversal_order, Round, TurnOutcome};
use crate::domain::{test_prelude, Rank};

/// Seating with one entry per flag; `true` seats hold a card.
fn seating_from(holding: &[bool]) -> (Seating, Vec<ParticipantId>) {
    let mut seating = Seating::new();
    let mut ids = Vec::new();
    for holds in holding {
        let id = ParticipantId::new();
        seating
            .add_real(id, &Profile::default())
            .expect("room has space");
        if *holds {
            seating.get_mut(id).expect("seated").hand =
                try_mint_cards(["9H", "9S"]).expect("valid tokens");
        }
        ids.push(id);
    }
    (seating, ids)
}

fn seating_strategy() -> impl Strategy<Value = (Vec<bool>, usize)> {
    prop::collection::vec(any::<bool>(), 2..=8).prop_flat_map(|mut holding| {
        // At least one holder to start from.
        holding[0] = true;
        let holders: Vec<usize> = holding
            .iter()
            .enumerate()
            .filter(|(_, h)| **h)
            .map(|(i, _)| i)
            .collect();
        (Just(holding), prop::sample::select(holders))
    })
}

fn pile_by(by: ParticipantId) -> Pile {
    Pile {
        rank: Rank::Nine,
        count: 1,
        shown: Vec::new(),
        last_played_by: by,
        raised: false,
    }
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: traversal order starts at the starter, has no duplicates
    /// and only contains participants holding cards.
    #[test]
    fn prop_traversal_order_shape((holding, starter) in seating_strategy()) {
        let (seating, ids) = seating_from(&holding);
        let order = traversal_order(&seating, ids[starter]);

        prop_assert_eq!(order.first().copied(), Some(ids[starter]));
        let unique: HashSet<_> = order.iter().collect();
        prop_assert_eq!(unique.len(), order.len());
        prop_assert_eq!(order.len(), holding.iter().filter(|h| **h).count());
        for id in &order {
            prop_assert!(seating.get(*id).unwrap().has_cards());
        }
    }

    /// Property: any sequence of plays and passes closes on the last
    /// player, and nobody is asked twice between plays.
    #[test]
    fn prop_round_closes_on_last_player(
        (holding, starter) in seating_strategy(),
        plays in prop::collection::vec(any::<bool>(), 0..40),
    ) {
        let (seating, ids) = seating_from(&holding);
        let mut round = Round::open(&seating, ids[starter]).unwrap();
        let holders = round.order.len();

        // The starter opens.
        round.record_play(ids[starter], pile_by(ids[starter]));
        let mut last_player = ids[starter];
        let mut passes_since_play = 0usize;
        let mut script = plays.into_iter();

        loop {
            match round.advance(&seating) {
                TurnOutcome::Closed { winner } => {
                    prop_assert_eq!(winner, last_player);
                    prop_assert_eq!(passes_since_play, holders - 1);
                    break;
                }
                TurnOutcome::Next(turn) => {
                    prop_assert!(round.ensure_turn(turn).is_ok());
                    prop_assert!(passes_since_play < holders - 1);
                    if script.next().unwrap_or(false) {
                        round.record_play(turn, pile_by(turn));
                        last_player = turn;
                        passes_since_play = 0;
                    } else {
                        round.record_pass(turn);
                        passes_since_play += 1;
                    }
                }
            }
        }
    }
}
