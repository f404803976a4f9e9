/// Property-based tests for the play validation variants
use proptest::prelude::*;

use crate::domain::validation::{validate, GameMode, PlayKind};
use crate::domain::{test_gens, test_prelude, Card, CardId, Rank};
use crate::errors::ErrorCode;

fn ids(cards: &[Card]) -> Vec<CardId> {
    cards.iter().map(|c| c.id).collect()
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: the special rank is legal on any pile, in any variant,
    /// and ends the round.
    #[test]
    fn prop_special_rank_always_legal(
        mode in test_gens::mode(),
        pile in proptest::option::of(test_gens::any_pile()),
        threes in (1usize..=4).prop_flat_map(|n| test_gens::set_of(Rank::Three, n)),
    ) {
        let play = validate(mode.rules(), pile.as_ref(), &threes, &ids(&threes));
        prop_assert!(play.is_ok(), "3s rejected: {:?}", play);
        let play = play.unwrap();
        prop_assert_eq!(play.kind, PlayKind::Special);
        prop_assert!(play.ends_round());
    }

    /// Property: in traditional play a differing count is always a count
    /// mismatch, whatever the ranks.
    #[test]
    fn prop_traditional_count_mismatch(
        (pile, count) in (test_gens::any_pile(), 1usize..=3, any::<bool>()).prop_map(
            |(pile, delta, below)| {
                let count = if below && pile.count > delta {
                    pile.count - delta
                } else {
                    pile.count + delta
                };
                (pile, count)
            },
        ),
        rank in test_gens::ordinary_rank(),
    ) {
        let hand: Vec<Card> = (0..count)
            .map(|_| Card::mint(rank, crate::domain::Suit::Spades))
            .collect();
        let err = validate(GameMode::Traditional.rules(), Some(&pile), &hand, &ids(&hand))
            .map_err(|e| e.code());
        prop_assert_eq!(err, Err(ErrorCode::CountMismatch));
    }

    /// Property: in traditional play a same-count set must be strictly
    /// higher.
    #[test]
    fn prop_traditional_not_higher_is_too_low(
        (pile, rank) in test_gens::any_pile().prop_flat_map(|pile| {
            let top = pile.rank as usize;
            (Just(pile), (0..=top).prop_map(|i| Rank::ALL[i]))
        }),
    ) {
        let hand: Vec<Card> = (0..pile.count)
            .map(|_| Card::mint(rank, crate::domain::Suit::Hearts))
            .collect();
        let err = validate(GameMode::Traditional.rules(), Some(&pile), &hand, &ids(&hand))
            .map_err(|e| e.code());
        prop_assert_eq!(err, Err(ErrorCode::TooLow));
    }

    /// Property: after a raise nobody can append the pile's rank.
    #[test]
    fn prop_raised_pile_blocks_appends(
        mode in prop_oneof![Just(GameMode::Appending), Just(GameMode::ColorMatching)],
        (rank, count) in (test_gens::ordinary_rank(), 1usize..=4),
        extra in 1usize..=3,
    ) {
        let pile = fixed_pile(rank, count, true);
        let hand: Vec<Card> = (0..extra)
            .map(|_| Card::mint(rank, crate::domain::Suit::Clubs))
            .collect();
        let err = validate(mode.rules(), Some(&pile), &hand, &ids(&hand)).map_err(|e| e.code());
        prop_assert_eq!(err, Err(ErrorCode::MustRaise));
    }

    /// Property: before a raise any number of same-rank cards appends and
    /// the merged count adds up.
    #[test]
    fn prop_unraised_pile_accepts_appends(
        mode in prop_oneof![Just(GameMode::Appending), Just(GameMode::ColorMatching)],
        (rank, count) in (test_gens::ordinary_rank(), 1usize..=4),
        extra in 1usize..=3,
    ) {
        let pile = fixed_pile(rank, count, false);
        let hand: Vec<Card> = (0..extra)
            .map(|_| Card::mint(rank, crate::domain::Suit::Diamonds))
            .collect();
        let play = validate(mode.rules(), Some(&pile), &hand, &ids(&hand));
        prop_assert!(play.is_ok());
        let play = play.unwrap();
        prop_assert_eq!(play.kind, PlayKind::Append);
        let merged = crate::domain::pile::Pile::after(Some(&pile), &play, pile.last_played_by);
        prop_assert_eq!(merged.count, count + extra);
        prop_assert_eq!(merged.shown.len(), count + extra);
    }
}

fn fixed_pile(rank: Rank, count: usize, raised: bool) -> crate::domain::pile::Pile {
    crate::domain::pile::Pile {
        rank,
        count,
        shown: (0..count)
            .map(|_| crate::domain::CardFace {
                rank,
                suit: crate::domain::Suit::Spades,
            })
            .collect(),
        last_played_by: crate::domain::ParticipantId::new(),
        raised,
    }
}
