//! Room-level transitions: join/leave, start, play/pass, round and game
//! closure, post-game exchange and mode selection.
//!
//! Every intent validates fully before touching state, so a rejection
//! leaves the room as it was. Delayed steps are returned as
//! [`Continuation`]s for the owner to schedule; they carry the epoch they
//! were issued under and are ignored once the epoch has moved on.

use crate::domain::dealing::{deal_hands, deck_count_for, derive_deal_seed};
use crate::domain::filler;
use crate::domain::participants::{ParticipantId, Profile, PublicParticipant};
use crate::domain::pile::Pile;
use crate::domain::reward::{apply_exchange, describe, eligible_pair, ExchangeSummary};
use crate::domain::round::{Round, TurnOutcome};
use crate::domain::state::{ChooserPolicy, GameResult, Phase, Room, RoomSettings};
use crate::domain::validation::{remove_from_hand, validate, GameMode};
use crate::domain::CardId;
use crate::errors::domain::{DomainError, IllegalSetKind, Privilege};

/// Deferred step of the game flow.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// A round closed; clear the pile and open the next one.
    NextRound,
    /// The game ended; deal the next hands and run the exchange.
    AfterGame,
    /// The exchange has been shown long enough; move to mode selection.
    FinishExchange,
}

/// Which configured delay precedes a step.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pause {
    Round,
    Exchange,
}

impl Step {
    pub fn pause(self) -> Pause {
        match self {
            Step::NextRound | Step::AfterGame => Pause::Round,
            Step::FinishExchange => Pause::Exchange,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Continuation {
    pub step: Step,
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    pub you: PublicParticipant,
    pub rejoined: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left { new_host: Option<ParticipantId> },
    /// No real participant remains; the room should be torn down.
    RoomEmpty,
}

impl Room {
    /// A fresh room in lobby with `creator` seated as host.
    pub fn open(
        code: impl Into<String>,
        seed: u64,
        settings: RoomSettings,
        creator: ParticipantId,
        profile: &Profile,
    ) -> Result<(Room, PublicParticipant), DomainError> {
        let mut room = Room::new(code, seed, settings);
        room.seating.add_real(creator, profile)?;
        let you = room.public_of(creator)?;
        room.log.ok(format!("{} created room {}.", you.name, room.code));
        Ok((room, you))
    }

    /// Seat `id`, or rebind an already seated participant.
    pub fn join(&mut self, id: ParticipantId, profile: &Profile) -> Result<Joined, DomainError> {
        if self.seating.contains(id) {
            return Ok(Joined {
                you: self.public_of(id)?,
                rejoined: true,
            });
        }
        if !matches!(self.phase, Phase::Lobby) {
            return Err(DomainError::wrong_phase(
                "The game in this room has already started.",
            ));
        }

        self.seating.add_real(id, profile)?;
        self.seating.sync_filler();
        let you = self.public_of(id)?;
        self.log.ok(format!("{} joined.", you.name));
        Ok(Joined {
            you,
            rejoined: false,
        })
    }

    /// Remove `id`. Any game in progress is abandoned.
    pub fn leave(&mut self, id: ParticipantId) -> Result<LeaveOutcome, DomainError> {
        let departure = self.seating.remove(id).ok_or_else(|| not_seated(id))?;
        if self.seating.real_count() == 0 {
            self.reset_to_lobby();
            return Ok(LeaveOutcome::RoomEmpty);
        }

        if let Some(host) = departure.new_host {
            let name = self.seating.name_of(host);
            self.log.warn(format!("{name} is now host."));
        }
        self.seating.sync_filler();

        let was_lobby = matches!(self.phase, Phase::Lobby);
        self.reset_to_lobby();
        if was_lobby {
            self.log.info(format!("{} left.", departure.removed.name));
        } else {
            self.log.warn(format!(
                "{} left. Back to the lobby.",
                departure.removed.name
            ));
        }
        Ok(LeaveOutcome::Left {
            new_host: departure.new_host,
        })
    }

    pub fn start_game(&mut self, actor: ParticipantId) -> Result<(), DomainError> {
        self.seating.require(actor)?;
        if !matches!(self.phase, Phase::Lobby) {
            return Err(DomainError::wrong_phase("The game has already started."));
        }
        self.ensure_can_deal(actor, "Only the host can start the game.")?;

        let result = self.deal_and_begin();
        let result = self.recover(result);
        if result.is_ok() {
            self.announce_start("Game started.");
        }
        result
    }

    /// Host-only redeal after a finished game, skipping the exchange.
    pub fn rematch(&mut self, actor: ParticipantId) -> Result<(), DomainError> {
        self.seating.require(actor)?;
        if !matches!(
            self.phase,
            Phase::Ended { .. } | Phase::RewardExchange { .. } | Phase::ModeSelect { .. }
        ) {
            return Err(DomainError::wrong_phase(
                "A rematch is only possible after a game.",
            ));
        }
        self.ensure_can_deal(actor, "Only the host can start a rematch.")?;

        self.bump_epoch();
        let result = self.deal_and_begin();
        let result = self.recover(result);
        if result.is_ok() {
            self.announce_start("New game started.");
        }
        result
    }

    pub fn play_cards(
        &mut self,
        actor: ParticipantId,
        card_ids: &[CardId],
    ) -> Result<Option<Continuation>, DomainError> {
        let Phase::Playing {
            round,
            finish_order,
            closing,
            table,
            ..
        } = &mut self.phase
        else {
            return Err(DomainError::wrong_phase("No game is in progress."));
        };
        if closing.is_some() {
            return Err(DomainError::wrong_phase("The round is being closed."));
        }
        let hand = &self.seating.require(actor)?.hand;
        round.ensure_turn(actor)?;
        let play = validate(self.mode.rules(), round.pile.as_ref(), hand, card_ids)?;

        let pile = Pile::after(round.pile.as_ref(), &play, actor);
        round.record_play(actor, pile);
        *table += play.cards.len();

        let player = self.seating.require_mut(actor)?;
        remove_from_hand(&mut player.hand, &play);
        let finished = player.hand.is_empty() && !player.is_filler();
        let name = player.name.clone();

        self.log
            .info(format!("{name} played {}× {}.", play.cards.len(), play.rank));
        if finished && !finish_order.contains(&actor) {
            finish_order.push(actor);
            self.log.ok(format!("{name} is out of cards!"));
        }

        if self.seating.real_holders().len() <= 1 {
            return Ok(Some(self.end_game()));
        }

        if play.ends_round() {
            *closing = Some(actor);
            self.log
                .ok(format!("{name} played a {}: round won outright.", play.rank));
            return Ok(Some(self.continuation(Step::NextRound)));
        }

        let outcome = round.advance(&self.seating);
        Ok(self.settle(outcome))
    }

    pub fn pass(&mut self, actor: ParticipantId) -> Result<Option<Continuation>, DomainError> {
        let Phase::Playing { round, closing, .. } = &mut self.phase else {
            return Err(DomainError::wrong_phase("No game is in progress."));
        };
        if closing.is_some() {
            return Err(DomainError::wrong_phase("The round is being closed."));
        }
        let player = self.seating.require(actor)?;
        round.ensure_turn(actor)?;
        if round.is_opening() && !player.is_filler() {
            return Err(DomainError::illegal(
                IllegalSetKind::MustOpen,
                "You open this round: play a set.",
            ));
        }

        let name = player.name.clone();
        round.record_pass(actor);
        self.log.info(format!("{name} passes."));

        let outcome = round.advance(&self.seating);
        Ok(self.settle(outcome))
    }

    pub fn select_mode(
        &mut self,
        actor: ParticipantId,
        key: &str,
    ) -> Result<Option<Continuation>, DomainError> {
        let Phase::ModeSelect {
            result, chooser, ..
        } = &self.phase
        else {
            return Err(DomainError::wrong_phase("There is no game mode to choose now."));
        };
        self.seating.require(actor)?;
        if *chooser != actor {
            return Err(DomainError::Unauthorized(
                Privilege::Chooser,
                format!(
                    "Only {} may choose the next game mode.",
                    self.seating.name_of(*chooser)
                ),
            ));
        }
        let mode: GameMode = key.parse()?;

        let prior_winner = result.winner.filter(|w| self.holds_real_cards(*w));
        let result = self.starter_or_default(prior_winner).and_then(|starter| {
            self.mode = mode;
            self.begin_game(starter)
        });
        let followup = self.recover(result)?;

        let chooser_name = self.seating.name_of(actor);
        self.log
            .ok(format!("{chooser_name} chose {}.", mode.label()));
        self.announce_start("Game started.");
        Ok(followup)
    }

    /// Anyone seated may send the room back to the lobby.
    pub fn back_to_lobby(&mut self, actor: ParticipantId) -> Result<(), DomainError> {
        self.seating.require(actor)?;
        self.reset_to_lobby();
        self.log.info("Back to the lobby.");
        Ok(())
    }

    pub fn is_current(&self, continuation: &Continuation) -> bool {
        continuation.epoch == self.epoch
    }

    /// Run a deferred step. Stale continuations are ignored.
    pub fn resume(
        &mut self,
        continuation: Continuation,
    ) -> Result<Option<Continuation>, DomainError> {
        if !self.is_current(&continuation) {
            return Ok(None);
        }
        let result = match continuation.step {
            Step::NextRound => self.next_round(),
            Step::AfterGame => self.after_game(),
            Step::FinishExchange => self.finish_exchange(),
        };
        self.recover(result)
    }

    fn next_round(&mut self) -> Result<Option<Continuation>, DomainError> {
        let winner = match &self.phase {
            Phase::Playing {
                closing: Some(winner),
                ..
            } => *winner,
            _ => return Err(DomainError::inconsistent("no closed round to continue")),
        };
        let starter = self
            .next_starter(winner)
            .ok_or_else(|| DomainError::inconsistent("nobody left to open the round"))?;
        let fresh = Round::open(&self.seating, starter)?;

        let Phase::Playing { round, closing, .. } = &mut self.phase else {
            return Err(DomainError::inconsistent("phase changed while opening a round"));
        };
        *round = fresh;
        *closing = None;
        self.log
            .info(format!("{} opens the next round.", self.seating.name_of(starter)));
        Ok(self.settle(TurnOutcome::Next(starter)))
    }

    fn after_game(&mut self) -> Result<Option<Continuation>, DomainError> {
        let Phase::Ended { result } = &self.phase else {
            return Err(DomainError::inconsistent("game end step outside ended phase"));
        };
        let result = result.clone();

        self.deal_next()?;
        match eligible_pair(&self.seating, result.winner, result.loser) {
            Some((winner, loser)) => {
                let exchange = apply_exchange(&mut self.seating, winner, loser)?;
                self.log.info(format!(
                    "Exchange: {} gives {} to {}, {} gives {} back.",
                    self.seating.name_of(loser),
                    describe(&exchange.to_winner),
                    self.seating.name_of(winner),
                    self.seating.name_of(winner),
                    describe(&exchange.to_loser),
                ));
                self.phase = Phase::RewardExchange { result, exchange };
                Ok(Some(self.continuation(Step::FinishExchange)))
            }
            None => {
                self.enter_mode_select(result, None)?;
                Ok(None)
            }
        }
    }

    fn finish_exchange(&mut self) -> Result<Option<Continuation>, DomainError> {
        let Phase::RewardExchange { result, exchange } = &self.phase else {
            return Err(DomainError::inconsistent("exchange step outside exchange phase"));
        };
        let (result, exchange) = (result.clone(), exchange.clone());
        self.enter_mode_select(result, Some(exchange))?;
        Ok(None)
    }

    fn enter_mode_select(
        &mut self,
        result: GameResult,
        exchange: Option<ExchangeSummary>,
    ) -> Result<(), DomainError> {
        let real = |id: &ParticipantId| {
            self.seating
                .get(*id)
                .is_some_and(|p| !p.is_filler())
        };
        let (first, second) = match self.settings.chooser {
            ChooserPolicy::Loser => (result.loser, result.winner),
            ChooserPolicy::Winner => (result.winner, result.loser),
        };
        let chooser = first
            .filter(real)
            .or(second.filter(real))
            .or(self.seating.host())
            .ok_or_else(|| DomainError::inconsistent("no one can choose the next mode"))?;

        self.log.info(format!(
            "{} picks the next game mode.",
            self.seating.name_of(chooser)
        ));
        self.phase = Phase::ModeSelect {
            result,
            chooser,
            exchange,
        };
        Ok(())
    }

    fn end_game(&mut self) -> Continuation {
        let finish_order = self.finish_order().to_vec();
        let holders = self.seating.real_holders();
        let winner = finish_order.first().copied();
        let loser = holders.first().copied();

        let mut ranking = finish_order;
        ranking.extend(holders);

        if let Some(w) = winner {
            self.log
                .ok(format!("{} won the game!", self.seating.name_of(w)));
        }
        if let Some(l) = loser {
            self.log
                .info(format!("{} is left holding cards.", self.seating.name_of(l)));
        }
        self.phase = Phase::Ended {
            result: GameResult {
                ranking,
                winner,
                loser,
            },
        };
        self.continuation(Step::AfterGame)
    }

    /// Run the filler and close the round if the turn walk says so.
    fn settle(&mut self, outcome: TurnOutcome) -> Option<Continuation> {
        let Phase::Playing { round, closing, .. } = &mut self.phase else {
            return None;
        };
        let outcome = match outcome {
            TurnOutcome::Next(_) => filler::drive(round, &self.seating, &mut self.log),
            closed @ TurnOutcome::Closed { .. } => closed,
        };
        match outcome {
            TurnOutcome::Next(_) => None,
            TurnOutcome::Closed { winner } => {
                *closing = Some(winner);
                self.log
                    .ok(format!("Round won by {}.", self.seating.name_of(winner)));
                Some(self.continuation(Step::NextRound))
            }
        }
    }

    fn ensure_can_deal(&self, actor: ParticipantId, host_only: &str) -> Result<(), DomainError> {
        if !self.seating.is_host(actor) {
            return Err(DomainError::host_only(host_only));
        }
        let present = self.seating.real_count();
        if present < 2 {
            return Err(DomainError::InsufficientParticipants { present });
        }
        Ok(())
    }

    fn deal_and_begin(&mut self) -> Result<(), DomainError> {
        self.seating.sync_filler();
        self.deal_next()?;
        let starter = self.starter_or_default(None)?;
        self.begin_game(starter)?;
        Ok(())
    }

    /// Deal the next game's hands to every seat.
    fn deal_next(&mut self) -> Result<(), DomainError> {
        let game_no = self.game_no + 1;
        let decks = deck_count_for(self.seating.real_count());
        let deal = deal_hands(self.seating.len(), decks, derive_deal_seed(self.seed, game_no))?;
        for (participant, hand) in self.seating.iter_mut().zip(deal.hands) {
            participant.hand = hand;
        }
        self.game_no = game_no;
        Ok(())
    }

    fn begin_game(&mut self, starter: ParticipantId) -> Result<Option<Continuation>, DomainError> {
        let round = Round::open(&self.seating, starter)?;
        self.phase = Phase::Playing {
            round,
            finish_order: Vec::new(),
            closing: None,
            table: 0,
            dealt: self.seating.total_cards(),
        };
        Ok(self.settle(TurnOutcome::Next(starter)))
    }

    fn announce_start(&mut self, prefix: &str) {
        if let Some(turn) = self.current_turn() {
            let name = self.seating.name_of(turn);
            self.log.ok(format!("{prefix} {name} starts."));
        }
    }

    fn holds_real_cards(&self, id: ParticipantId) -> bool {
        self.seating
            .get(id)
            .is_some_and(|p| !p.is_filler() && p.has_cards())
    }

    /// `preferred` if given, else the host, else the first real holder.
    fn starter_or_default(
        &self,
        preferred: Option<ParticipantId>,
    ) -> Result<ParticipantId, DomainError> {
        preferred
            .or(self.seating.host().filter(|h| self.holds_real_cards(*h)))
            .or(self.seating.real_holders().first().copied())
            .ok_or_else(|| DomainError::inconsistent("no participant can start"))
    }

    /// The round winner if they still hold cards, else the next real
    /// holder after them in seating order.
    fn next_starter(&self, winner: ParticipantId) -> Option<ParticipantId> {
        if self.seating.get(winner).is_some_and(|p| p.has_cards()) {
            return Some(winner);
        }
        let ids = self.seating.ids();
        let from = ids.iter().position(|id| *id == winner).map_or(0, |i| i + 1);
        (0..ids.len())
            .map(|step| ids[(from + step) % ids.len()])
            .find(|id| self.holds_real_cards(*id))
    }

    fn reset_to_lobby(&mut self) {
        self.phase = Phase::Lobby;
        self.seating.clear_hands();
        self.bump_epoch();
    }

    /// An internal inconsistency sends the room back to the lobby.
    fn recover<T>(&mut self, result: Result<T, DomainError>) -> Result<T, DomainError> {
        if let Err(DomainError::Inconsistent(_)) = &result {
            self.reset_to_lobby();
            self.log
                .warn("Something went wrong. Back to the lobby.");
        }
        result
    }

    fn continuation(&self, step: Step) -> Continuation {
        Continuation {
            step,
            epoch: self.epoch,
        }
    }

    fn public_of(&self, id: ParticipantId) -> Result<PublicParticipant, DomainError> {
        self.seating.public(id).ok_or_else(|| not_seated(id))
    }
}

fn not_seated(id: ParticipantId) -> DomainError {
    DomainError::NotFound(
        crate::errors::domain::NotFoundKind::Participant,
        format!("Participant {id} is not in this room"),
    )
}
