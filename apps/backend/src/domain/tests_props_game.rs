/// Property-based tests over whole games driven by random legal moves
use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::lifecycle::{Continuation, Step};
use crate::domain::state::{Phase, Room};
use crate::domain::test_state_helpers::lobby_room;
use crate::domain::{test_gens, test_prelude, CardId, GameMode, ParticipantId, PhaseKind};

const STEP_LIMIT: usize = 5_000;

/// Candidate sets from a hand: for every rank, the first 1..=n cards.
fn candidates(room: &Room, who: ParticipantId) -> Vec<Vec<CardId>> {
    let mut by_rank: BTreeMap<_, Vec<CardId>> = BTreeMap::new();
    for card in &room.seating.get(who).expect("seated").hand {
        by_rank.entry(card.rank).or_default().push(card.id);
    }
    by_rank
        .values()
        .flat_map(|ids| (1..=ids.len()).map(move |n| ids[..n].to_vec()))
        .collect()
}

fn hand_sizes(room: &Room) -> Vec<usize> {
    room.seating.iter().map(|p| p.hand.len()).collect()
}

/// Apply continuations until none is pending or the game has ended.
fn drain(room: &mut Room, mut pending: Option<Continuation>) {
    while let Some(c) = pending {
        if c.step == Step::AfterGame {
            break;
        }
        pending = room.resume(c).expect("continuation applies");
    }
}

/// Play one game to its end with random legal moves, checking invariants
/// after every step.
fn play_out(room: &mut Room, rng: &mut ChaCha8Rng) -> Result<(), TestCaseError> {
    let mut finished_so_far: Vec<ParticipantId> = Vec::new();

    for _ in 0..STEP_LIMIT {
        if let Some((held, dealt)) = room.card_balance() {
            prop_assert_eq!(held, dealt, "cards leaked");
        }
        if room.phase_kind() != PhaseKind::Playing {
            return Ok(());
        }

        let order = room.finish_order().to_vec();
        prop_assert!(order.starts_with(&finished_so_far), "finish order shrank");
        finished_so_far = order;

        let turn = room.current_turn().expect("someone holds the turn");
        prop_assert!(!room.seating.is_filler(turn), "filler was left holding the turn");
        prop_assert!(room.seating.get(turn).unwrap().has_cards());

        let mut options = candidates(room, turn);
        options.shuffle(rng);
        let try_pass = rng.random_bool(0.3);

        let mut acted = false;
        if try_pass {
            if let Ok(pending) = room.pass(turn) {
                drain(room, pending);
                acted = true;
            }
        }
        if !acted {
            for ids in &options {
                let before = (hand_sizes(room), room.log.len());
                match room.play_cards(turn, ids) {
                    Ok(pending) => {
                        drain(room, pending);
                        acted = true;
                        break;
                    }
                    Err(_) => {
                        // Rejections leave the room untouched.
                        prop_assert_eq!(before, (hand_sizes(room), room.log.len()));
                    }
                }
            }
        }
        if !acted {
            let pending = room.pass(turn);
            prop_assert!(pending.is_ok(), "no legal move at all: {:?}", pending);
            drain(room, pending.unwrap());
        }
    }
    Err(TestCaseError::fail("game did not finish"))
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: card conservation, monotone finish order, a complete
    /// ranking at the end, and the filler never finishing.
    #[test]
    fn prop_random_games_end_consistently(
        reals in 2usize..=6,
        mode in test_gens::mode(),
        seed in any::<u64>(),
    ) {
        let (mut room, ids) = lobby_room(reals, seed);
        room.start_game(ids[0]).unwrap();
        room.mode = mode;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        play_out(&mut room, &mut rng)?;

        let Phase::Ended { result } = &room.phase else {
            return Err(TestCaseError::fail(format!("expected ended, got {}", room.phase_kind())));
        };
        let ranked: HashSet<_> = result.ranking.iter().copied().collect();
        let expected: HashSet<_> = ids.iter().copied().collect();
        prop_assert_eq!(result.ranking.len(), reals);
        prop_assert_eq!(ranked, expected);
        prop_assert_eq!(result.winner, result.ranking.first().copied());
        if let Some(filler) = room.seating.filler_id() {
            prop_assert!(!result.ranking.contains(&filler));
            prop_assert!(room.seating.get(filler).unwrap().has_cards());
        }
        prop_assert!(room.seating.real_holders().len() <= 1);
    }

    /// Property: the post-game exchange moves at most two cards each way
    /// and conserves the total.
    #[test]
    fn prop_after_game_exchange_conserves_cards(seed in any::<u64>()) {
        let (mut room, ids) = lobby_room(3, seed);
        room.start_game(ids[0]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        play_out(&mut room, &mut rng)?;

        let epoch = room.epoch;
        let pending = room
            .resume(Continuation { step: Step::AfterGame, epoch })
            .unwrap();
        let dealt = room.seating.total_cards();
        match &room.phase {
            Phase::RewardExchange { exchange, .. } => {
                prop_assert!(exchange.to_winner.len() <= 2);
                prop_assert!(exchange.to_loser.len() <= 2);
                prop_assert_eq!(pending.map(|c| c.step), Some(Step::FinishExchange));
            }
            other => prop_assert!(false, "expected exchange, got {:?}", other.kind()),
        }
        // 52 cards over 3 seats: 17 each, one left out.
        prop_assert_eq!(dealt, 51);
        prop_assert_eq!(room.mode, GameMode::Traditional);
    }
}
