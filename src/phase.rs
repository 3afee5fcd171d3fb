//! One betting street as a small state machine: pending -> active -> complete.

use crate::cards::Card;
use crate::deck::{Deck, DeckError};
use crate::hand::{HandError, HoleCards};
use crate::player::Player;
use crate::rules::{self, Action, ActionError, ActionKind, Contribution};
use std::collections::BTreeSet;
use std::fmt;

/// The four betting streets of a Hold'em hand, in play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Street {
    Blind,
    Flop,
    Turn,
    River,
}

impl Street {
    pub const ALL: [Street; 4] = [Street::Blind, Street::Flop, Street::Turn, Street::River];

    /// Community cards revealed when the street opens.
    pub const fn reveals(self) -> usize {
        match self {
            Street::Blind => 0,
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Street::Blind => "blind",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Pending,
    Active,
    Complete,
}

/// Dealer and blind seats for one hand. The big blind is twice the small blind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blinds {
    pub dealer: usize,
    pub small_blind_seat: usize,
    pub big_blind_seat: usize,
    pub small_blind: u64,
}

impl Blinds {
    /// Seats N, N+1 and N+2 around a table of `seats` players.
    pub fn resolve(dealer: usize, seats: usize, small_blind: u64) -> Self {
        Self {
            dealer,
            small_blind_seat: (dealer + 1) % seats,
            big_blind_seat: (dealer + 2) % seats,
            small_blind,
        }
    }

    pub fn big_blind(&self) -> u64 {
        self.small_blind.saturating_mul(2)
    }

    /// The seat after the big blind opens betting.
    pub fn first_to_act(&self, seats: usize) -> usize {
        (self.big_blind_seat + 1) % seats
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PhaseError {
    #[error("the {0} phase has already started")]
    AlreadyStarted(Street),
    #[error("first actor (seat {0}) is not among the phase's players")]
    FirstNotSeated(usize),
    #[error("seat {0} is not at the table")]
    UnknownSeat(usize),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Hand(#[from] HandError),
}

/// Betting state for one street.
#[derive(Debug, Clone)]
pub struct BettingPhase {
    street: Street,
    status: PhaseStatus,
    blinds: Option<Blinds>,
    seats: Vec<usize>,
    bets: Vec<u64>,
    matched: BTreeSet<usize>,
    current: usize,
    first: usize,
    revealed: Vec<Card>,
}

impl BettingPhase {
    fn new(street: Street, blinds: Option<Blinds>) -> Self {
        Self {
            street,
            status: PhaseStatus::Pending,
            blinds,
            seats: Vec::new(),
            bets: Vec::new(),
            matched: BTreeSet::new(),
            current: 0,
            first: 0,
            revealed: Vec::new(),
        }
    }

    /// Pre-flop street: deals hole cards and posts the blinds on start.
    pub fn blind(blinds: Blinds) -> Self {
        Self::new(Street::Blind, Some(blinds))
    }

    pub fn flop() -> Self {
        Self::new(Street::Flop, None)
    }

    pub fn turn() -> Self {
        Self::new(Street::Turn, None)
    }

    pub fn river() -> Self {
        Self::new(Street::River, None)
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn status(&self) -> PhaseStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == PhaseStatus::Active
    }

    /// Seat whose turn it is.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Seat that opened the betting on this street.
    pub fn first(&self) -> usize {
        self.first
    }

    /// Seats that entered this street, in seating order.
    pub fn seats(&self) -> &[usize] {
        &self.seats
    }

    /// Community cards this street revealed.
    pub fn revealed(&self) -> &[Card] {
        &self.revealed
    }

    /// A seat's bet on this street.
    pub fn bet(&self, seat: usize) -> u64 {
        self.bets.get(seat).copied().unwrap_or(0)
    }

    /// Highest bet anyone has made on this street.
    pub fn table_bet(&self) -> u64 {
        self.bets.iter().copied().max().unwrap_or(0)
    }

    /// Every chip put in on this street, folded players included.
    pub fn total(&self) -> u64 {
        self.bets.iter().sum()
    }

    pub fn is_matched(&self, seat: usize) -> bool {
        self.matched.contains(&seat)
    }

    /// Open the street.
    ///
    /// `seats` are the players still holding cards (every seat for the blind
    /// street, which deals them). Returns the community cards revealed.
    pub fn start(
        &mut self,
        table: &mut [Player],
        seats: &[usize],
        deck: &mut Deck,
        first: usize,
    ) -> Result<&[Card], PhaseError> {
        if self.status != PhaseStatus::Pending {
            return Err(PhaseError::AlreadyStarted(self.street));
        }
        if let Some(&bad) = seats.iter().find(|&&s| s >= table.len()) {
            return Err(PhaseError::UnknownSeat(bad));
        }
        if !seats.contains(&first) {
            return Err(PhaseError::FirstNotSeated(first));
        }

        match self.blinds {
            Some(blinds) => {
                let hands = deck.deal_hands(seats.len(), 2)?;
                let holes =
                    hands.iter().map(|h| HoleCards::from_slice(h)).collect::<Result<Vec<_>, _>>()?;
                for (&seat, hole) in seats.iter().zip(holes) {
                    table[seat].deal(hole);
                }
                self.open(table, seats, first);
                self.post(table, blinds.small_blind_seat, blinds.small_blind);
                self.post(table, blinds.big_blind_seat, blinds.big_blind());
            }
            None => {
                let needed = 1 + self.street.reveals();
                if deck.len() < needed {
                    return Err(DeckError::Exhausted { wanted: needed, left: deck.len() }.into());
                }
                deck.burn()?;
                self.revealed = deck.draw_n(self.street.reveals())?;
                self.open(table, seats, first);
            }
        }

        if !table[self.current].can_act() {
            self.current = self.next_actor(table, self.current);
        }
        log::debug!(
            "{} started: seats {:?}, first to act {}, revealed {:?}",
            self.street,
            self.seats,
            self.current,
            self.revealed.iter().map(Card::to_string).collect::<Vec<_>>()
        );
        Ok(&self.revealed)
    }

    fn open(&mut self, table: &[Player], seats: &[usize], first: usize) {
        self.seats = seats.to_vec();
        self.bets = vec![0; table.len()];
        self.matched.clear();
        self.first = first;
        self.current = first;
        self.status = PhaseStatus::Active;
    }

    fn post(&mut self, table: &mut [Player], seat: usize, amount: u64) {
        if !self.seats.contains(&seat) {
            return;
        }
        let paid = table[seat].stake(amount);
        self.bets[seat] += paid;
        log::debug!("seat {seat} posts blind {paid}");
    }

    /// Legal actions for `seat` on this street; empty when the seat cannot act.
    pub fn legal_actions(&self, table: &[Player], seat: usize) -> Vec<ActionKind> {
        match table.get(seat) {
            Some(p) if self.is_active() && self.seats.contains(&seat) && p.can_act() => {
                rules::legal_actions(self.table_bet(), self.bet(seat), p.stack())
            }
            _ => Vec::new(),
        }
    }

    /// Apply `action` for the current actor, or for `actor` when given.
    /// A rejected action changes nothing.
    pub fn act(
        &mut self,
        table: &mut [Player],
        action: Action,
        actor: Option<usize>,
    ) -> Result<Contribution, ActionError> {
        if !self.is_active() {
            return Err(ActionError::PhaseNotActive);
        }
        let seat = actor.unwrap_or(self.current);
        let in_hand = table.get(seat).is_some_and(Player::in_hand);
        if !in_hand || !self.seats.contains(&seat) {
            return Err(ActionError::NotInHand(seat));
        }

        let table_bet = self.table_bet();
        let contribution = rules::apply(action, table_bet, self.bets[seat], &mut table[seat])?;
        if let Contribution::Chips(chips) = contribution {
            self.bets[seat] += chips;
            let exact_all_in = action == Action::AllIn && self.bets[seat] == table_bet;
            if matches!(action, Action::Call | Action::Check) || exact_all_in {
                self.matched.insert(seat);
            }
        }
        if self.bets[seat] > table_bet {
            self.matched.clear();
            self.matched.insert(seat);
        }
        log::debug!("{} seat {seat}: {action} -> {contribution:?}", self.street);

        self.current = self.next_actor(table, self.current);
        Ok(contribution)
    }

    /// Next seat after `from`, in seating order, that holds cards and has chips.
    /// Stays on `from` when nobody else can act.
    fn next_actor(&self, table: &[Player], from: usize) -> usize {
        let n = table.len();
        (1..=n)
            .map(|k| (from + k) % n)
            .find(|&s| self.seats.contains(&s) && table[s].can_act())
            .unwrap_or(from)
    }

    /// Betting on this street is settled: every player who can still wager
    /// has matched the table bet, and either all of them acknowledged it or
    /// fewer than two of them remain.
    pub fn is_complete(&self, table: &[Player]) -> bool {
        if !self.is_active() {
            return self.status == PhaseStatus::Complete;
        }
        let table_bet = self.table_bet();
        let able: Vec<usize> = self
            .seats
            .iter()
            .copied()
            .filter(|&s| table.get(s).is_some_and(Player::can_act))
            .collect();
        if !able.iter().all(|&s| self.bets[s] == table_bet) {
            return false;
        }
        able.len() < 2 || able.iter().all(|s| self.matched.contains(s))
    }

    pub fn end(&mut self) {
        self.status = PhaseStatus::Complete;
        log::debug!("{} complete, {} in bets", self.street, self.total());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn table(stacks: &[u64]) -> Vec<Player> {
        stacks.iter().enumerate().map(|(i, &s)| Player::new(format!("P{}", i + 1), s)).collect()
    }

    fn started_blind(stacks: &[u64]) -> (BettingPhase, Vec<Player>, Deck) {
        let mut players = table(stacks);
        let mut deck = Deck::standard();
        let blinds = Blinds::resolve(0, players.len(), 5);
        let mut phase = BettingPhase::blind(blinds);
        let seats: Vec<usize> = (0..players.len()).collect();
        let first = blinds.first_to_act(players.len());
        phase.start(&mut players, &seats, &mut deck, first).unwrap();
        (phase, players, deck)
    }

    #[test]
    fn blind_start_deals_and_posts() {
        let (phase, players, deck) = started_blind(&[100, 100, 100, 100]);
        assert_eq!(deck.len(), 52 - 8);
        assert!(players.iter().all(Player::in_hand));
        assert_eq!(phase.bet(1), 5);
        assert_eq!(phase.bet(2), 10);
        assert_eq!(phase.table_bet(), 10);
        assert_eq!(phase.current(), 3);
        assert_eq!(players[1].stack(), 95);
        assert!(!phase.is_complete(&players));
    }

    #[test]
    fn big_blind_keeps_the_option() {
        let (mut phase, mut players, _) = started_blind(&[100, 100, 100]);
        // dealer 0 calls, small blind calls
        phase.act(&mut players, Action::Call, None).unwrap();
        phase.act(&mut players, Action::Call, None).unwrap();
        assert_eq!(phase.current(), 2);
        assert!(!phase.is_complete(&players));
        phase.act(&mut players, Action::Check, None).unwrap();
        assert!(phase.is_complete(&players));
    }

    #[test]
    fn raise_reopens_action() {
        let (mut phase, mut players, _) = started_blind(&[100, 100, 100]);
        phase.act(&mut players, Action::Call, None).unwrap();
        phase.act(&mut players, Action::Raise(20), None).unwrap();
        assert_eq!(phase.bet(1), 30);
        assert!(phase.is_matched(1));
        assert!(!phase.is_matched(0));
        phase.act(&mut players, Action::Call, None).unwrap();
        assert!(!phase.is_complete(&players));
        phase.act(&mut players, Action::Call, None).unwrap();
        assert!(phase.is_complete(&players));
    }

    #[test]
    fn rejected_action_changes_nothing() {
        let (mut phase, mut players, _) = started_blind(&[100, 100, 100]);
        let before = (phase.current(), phase.total(), players.clone());
        let err = phase.act(&mut players, Action::Check, None).unwrap_err();
        assert!(matches!(err, ActionError::Illegal { .. }));
        assert_eq!((phase.current(), phase.total(), players), before);
    }

    #[test]
    fn fold_clears_cards_and_skips_seat() {
        let (mut phase, mut players, _) = started_blind(&[100, 100, 100, 100]);
        assert_eq!(phase.act(&mut players, Action::Fold, None), Ok(Contribution::Fold));
        assert!(!players[3].in_hand());
        assert_eq!(phase.current(), 0);
        let err = phase.act(&mut players, Action::Call, Some(3)).unwrap_err();
        assert_eq!(err, ActionError::NotInHand(3));
    }

    #[test]
    fn all_in_players_are_skipped_and_phase_settles() {
        let (mut phase, mut players, _) = started_blind(&[100, 40, 100]);
        // dealer shoves, small blind calls all in for less, big blind calls
        phase.act(&mut players, Action::AllIn, None).unwrap();
        assert_eq!(phase.current(), 1);
        phase.act(&mut players, Action::AllIn, None).unwrap();
        assert_eq!(phase.current(), 2);
        assert!(!phase.is_complete(&players));
        phase.act(&mut players, Action::Call, None).unwrap();
        assert!(phase.is_complete(&players));
        assert_eq!(phase.total(), 240);
    }

    #[test]
    fn later_street_burns_and_reveals() {
        let mut players = table(&[100, 100]);
        for (p, h) in players.iter_mut().zip(["A♠ K♠", "Q♦ Q♣"]) {
            p.deal(h.parse().unwrap());
        }
        let mut deck = Deck::from_cards(parse_cards("2♣ 3♣ 4♣ 5♣ 6♣").unwrap()).unwrap();
        let mut flop = BettingPhase::flop();
        let shown = flop.start(&mut players, &[0, 1], &mut deck, 1).unwrap().to_vec();
        assert_eq!(shown, parse_cards("3♣ 4♣ 5♣").unwrap());
        assert_eq!(deck.to_vec(), parse_cards("6♣").unwrap());
        assert_eq!(flop.current(), 1);
        assert!(!flop.is_complete(&players));
        assert_eq!(
            flop.start(&mut players, &[0, 1], &mut deck, 1).unwrap_err(),
            PhaseError::AlreadyStarted(Street::Flop)
        );
    }

    #[test]
    fn start_rejects_unseated_first_actor() {
        let mut players = table(&[100, 100]);
        let mut deck = Deck::standard();
        let mut turn = BettingPhase::turn();
        let err = turn.start(&mut players, &[0], &mut deck, 1).unwrap_err();
        assert_eq!(err, PhaseError::FirstNotSeated(1));
        assert_eq!(turn.status(), PhaseStatus::Pending);
        assert_eq!(deck.len(), 52);
    }

    #[test]
    fn street_with_one_able_player_is_complete_at_once() {
        let mut players = table(&[0, 100]);
        for (p, h) in players.iter_mut().zip(["A♠ K♠", "Q♦ Q♣"]) {
            p.deal(h.parse().unwrap());
        }
        let mut deck = Deck::standard();
        let mut river = BettingPhase::river();
        river.start(&mut players, &[0, 1], &mut deck, 0).unwrap();
        assert_eq!(river.current(), 1);
        assert!(river.is_complete(&players));
    }
}
