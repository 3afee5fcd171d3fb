//! One hand of Hold'em: four betting streets, the community board and the payout.
//!
//! A [`Round`] is built once per hand, started once, fed actions until
//! [`Round::is_finished`], and then dropped. [`Round::into_players`] hands the
//! seats (with their updated stacks) back for the next hand.
//!
//! ```
//! use holdem_round::player::Player;
//! use holdem_round::round::{Round, RoundConfig};
//! use holdem_round::rules::Action;
//!
//! let players = vec![Player::new("P1", 100), Player::new("P2", 100)];
//! let mut round = Round::new(players, RoundConfig::default().with_seed(7)).unwrap();
//! round.start().unwrap();
//! assert_eq!(round.pot(), 30);
//!
//! // heads-up: the small blind acts first and folds to the big blind
//! round.act(Action::Fold).unwrap();
//! assert!(round.is_finished());
//! assert_eq!(round.players()[0].stack(), 110);
//! ```

use crate::cards::Card;
use crate::deck::{Deck, DeckError};
use crate::evaluator::{self, EvalError, HandRank};
use crate::hand::{Board, HoleCards};
use crate::phase::{BettingPhase, Blinds, PhaseError, Street};
use crate::player::Player;
use crate::rules::{Action, ActionError, ActionKind};
use rand::Rng;
use std::fmt;

/// Per-hand settings. The big blind is always twice the small blind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundConfig {
    pub small_blind: u64,
    pub dealer: usize,
    /// Shuffle seed; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self { small_blind: 10, dealer: 0, seed: None }
    }
}

impl RoundConfig {
    pub fn with_small_blind(mut self, small_blind: u64) -> Self {
        self.small_blind = small_blind;
        self
    }

    pub fn with_dealer(mut self, dealer: usize) -> Self {
        self.dealer = dealer;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error("a round needs at least 2 players, got {0}")]
    TooFewPlayers(usize),
    #[error("seat {0} has no chips")]
    ZeroStack(usize),
    #[error("stacks add up to more than {} chips", u64::MAX)]
    ChipOverflow,
    #[error("dealer seat {dealer} is out of range for {seats} players")]
    DealerOutOfRange { dealer: usize, seats: usize },
    #[error("small blind must be positive")]
    ZeroSmallBlind,
    #[error("the round has already started")]
    AlreadyStarted,
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Phase(#[from] PhaseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Table position marker. A seat holding two positions reports the dealer first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Dealer,
    SmallBlind,
    BigBlind,
}

impl Role {
    pub const fn symbol(self) -> char {
        match self {
            Role::Dealer => '☆',
            Role::SmallBlind => '⛀',
            Role::BigBlind => '⛁',
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Dealer => "dealer",
            Role::SmallBlind => "small blind",
            Role::BigBlind => "big blind",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// Everyone else folded; no cards were compared.
    Uncontested,
    Showdown,
}

/// How the pot was paid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    /// Winning seats in ascending order.
    pub winners: Vec<usize>,
    /// Chips paid to each seat, indexed by seat.
    pub payouts: Vec<u64>,
    /// The winning hand; `None` for an uncontested pot.
    pub hand: Option<HandRank>,
    pub pot: u64,
}

/// A single hand in progress.
#[derive(Debug, Clone)]
pub struct Round {
    players: Vec<Player>,
    phases: [BettingPhase; 4],
    active: Option<usize>,
    board: Board,
    deck: Deck,
    blinds: Blinds,
    started: bool,
    outcome: Option<Outcome>,
}

impl Round {
    /// Seat `players` with a freshly shuffled deck.
    pub fn new(players: Vec<Player>, config: RoundConfig) -> Result<Self, RoundError> {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        log::debug!("shuffling with seed {seed}");
        let mut deck = Deck::standard();
        deck.shuffle_seeded(seed);
        Self::with_deck(players, config, deck)
    }

    /// Seat `players` and deal from `deck` in its current order.
    pub fn with_deck(
        mut players: Vec<Player>,
        config: RoundConfig,
        deck: Deck,
    ) -> Result<Self, RoundError> {
        let seats = players.len();
        if seats < 2 {
            return Err(RoundError::TooFewPlayers(seats));
        }
        if let Some(seat) = players.iter().position(|p| p.stack() == 0) {
            return Err(RoundError::ZeroStack(seat));
        }
        // bets, the pot and every payout are bounded by this total
        if players.iter().try_fold(0u64, |acc, p| acc.checked_add(p.stack())).is_none() {
            return Err(RoundError::ChipOverflow);
        }
        if config.dealer >= seats {
            return Err(RoundError::DealerOutOfRange { dealer: config.dealer, seats });
        }
        if config.small_blind == 0 {
            return Err(RoundError::ZeroSmallBlind);
        }
        // two hole cards each, three burns, five community cards
        let wanted = 2 * seats + 3 + Board::MAX;
        if deck.len() < wanted {
            return Err(DeckError::Exhausted { wanted, left: deck.len() }.into());
        }

        players.iter_mut().for_each(Player::fold);
        let blinds = Blinds::resolve(config.dealer, seats, config.small_blind);
        Ok(Self {
            players,
            phases: [
                BettingPhase::blind(blinds),
                BettingPhase::flop(),
                BettingPhase::turn(),
                BettingPhase::river(),
            ],
            active: None,
            board: Board::default(),
            deck,
            blinds,
            started: false,
            outcome: None,
        })
    }

    /// Deal hole cards, post the blinds and open the first street.
    pub fn start(&mut self) -> Result<(), RoundError> {
        if self.started {
            return Err(RoundError::AlreadyStarted);
        }
        let seats: Vec<usize> = (0..self.players.len()).collect();
        let first = self.blinds.first_to_act(seats.len());
        self.phases[0].start(&mut self.players, &seats, &mut self.deck, first)?;
        self.started = true;
        self.active = Some(0);
        log::debug!(
            "round started: dealer {}, blinds {}/{}",
            self.blinds.dealer,
            self.blinds.small_blind,
            self.blinds.big_blind()
        );
        self.settle()
    }

    /// Apply `action` for the current actor.
    pub fn act(&mut self, action: Action) -> Result<(), RoundError> {
        self.apply(action, None)
    }

    /// Apply `action` for `seat`, rejecting it unless `seat` is the current actor.
    pub fn act_as(&mut self, seat: usize, action: Action) -> Result<(), RoundError> {
        match self.current() {
            Some(expected) if expected != seat => {
                let err = ActionError::NotYourTurn { expected, got: seat };
                log::warn!("rejected {action} from seat {seat}: {err}");
                Err(err.into())
            }
            _ => self.apply(action, Some(seat)),
        }
    }

    /// Apply an action given as a wire token, e.g. `("raise", Some("20"))`.
    pub fn act_token(&mut self, token: &str, amount: Option<&str>) -> Result<(), RoundError> {
        let action = Action::from_token(token, amount).map_err(|e| {
            log::warn!("rejected token {token:?}: {e}");
            e
        })?;
        self.act(action)
    }

    fn apply(&mut self, action: Action, actor: Option<usize>) -> Result<(), RoundError> {
        let phase = match (self.started, self.outcome.is_some(), self.active) {
            (false, _, _) => Err(ActionError::NotStarted),
            (_, true, _) => Err(ActionError::Finished),
            (_, _, None) => Err(ActionError::PhaseNotActive),
            (_, _, Some(i)) => Ok(i),
        }?;
        if let Err(err) = self.phases[phase].act(&mut self.players, action, actor) {
            log::warn!("rejected {action}: {err}");
            return Err(err.into());
        }
        self.settle()
    }

    /// Advance past every settled street. A street may be settled the moment
    /// it opens, for example when everyone left is all in.
    fn settle(&mut self) -> Result<(), RoundError> {
        loop {
            let contenders = self.contenders();
            if let [winner] = contenders[..] {
                self.payout(OutcomeKind::Uncontested, vec![winner], None);
                return Ok(());
            }
            let Some(i) = self.active else {
                return Ok(());
            };
            if !self.phases[i].is_complete(&self.players) {
                return Ok(());
            }
            self.phases[i].end();

            let next = i + 1;
            if next == self.phases.len() {
                self.active = None;
                return self.showdown(&contenders);
            }
            let first = self.first_to_act(&contenders);
            let revealed =
                self.phases[next].start(&mut self.players, &contenders, &mut self.deck, first)?;
            self.board.extend(revealed.iter().copied());
            self.active = Some(next);
        }
    }

    /// Seats still holding cards, ascending.
    fn contenders(&self) -> Vec<usize> {
        (0..self.players.len()).filter(|&s| self.players[s].in_hand()).collect()
    }

    /// After the blind street, action opens at the first contender from the
    /// small blind onward, preferring one who still has chips.
    fn first_to_act(&self, contenders: &[usize]) -> usize {
        let n = self.players.len();
        let order: Vec<usize> = (0..n)
            .map(|k| (self.blinds.small_blind_seat + k) % n)
            .filter(|s| contenders.contains(s))
            .collect();
        order
            .iter()
            .copied()
            .find(|&s| self.players[s].can_act())
            .or_else(|| order.first().copied())
            .unwrap_or(self.blinds.small_blind_seat)
    }

    fn showdown(&mut self, contenders: &[usize]) -> Result<(), RoundError> {
        let (seats, hands): (Vec<usize>, Vec<Vec<Card>>) = contenders
            .iter()
            .filter_map(|&s| self.players[s].hole().map(|h| (s, h.with_board(&self.board))))
            .unzip();
        let (best, rank) = evaluator::winners(&hands)?;
        let winners: Vec<usize> = best.into_iter().map(|i| seats[i]).collect();
        log::debug!("showdown on [{}]: {rank} for seats {winners:?}", self.board);
        self.payout(OutcomeKind::Showdown, winners, Some(rank));
        Ok(())
    }

    /// Split the pot evenly; leftover chips go one each to the lowest seats.
    fn payout(&mut self, kind: OutcomeKind, winners: Vec<usize>, hand: Option<HandRank>) {
        let pot = self.pot();
        let count = winners.len().max(1) as u64;
        let share = pot / count;
        let mut odd = pot % count;
        let mut payouts = vec![0; self.players.len()];
        for &seat in &winners {
            let extra = u64::from(odd > 0);
            odd -= extra;
            payouts[seat] = share + extra;
            self.players[seat].credit(payouts[seat]);
            log::info!("{} wins {}", self.players[seat].name(), payouts[seat]);
        }
        self.active = None;
        self.outcome = Some(Outcome { kind, winners, payouts, hand, pot });
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// True once the pot has been paid out.
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Chips in the middle; zero once paid out.
    pub fn pot(&self) -> u64 {
        if self.is_finished() {
            return 0;
        }
        self.committed()
    }

    /// Every chip bet this hand, across all streets.
    pub fn committed(&self) -> u64 {
        self.phases.iter().map(BettingPhase::total).sum()
    }

    /// A seat's bets summed across streets.
    pub fn total_bet(&self, seat: usize) -> u64 {
        self.phases.iter().map(|p| p.bet(seat)).sum()
    }

    /// A seat's bet on the current street.
    pub fn phase_bet(&self, seat: usize) -> u64 {
        self.active_phase().map_or(0, |p| p.bet(seat))
    }

    /// Highest bet on the current street.
    pub fn table_bet(&self) -> u64 {
        self.active_phase().map_or(0, BettingPhase::table_bet)
    }

    /// Seat whose turn it is, while a street is open.
    pub fn current(&self) -> Option<usize> {
        self.active_phase().map(BettingPhase::current)
    }

    pub fn street(&self) -> Option<Street> {
        self.active_phase().map(BettingPhase::street)
    }

    fn active_phase(&self) -> Option<&BettingPhase> {
        self.active.map(|i| &self.phases[i])
    }

    /// Legal actions for `seat`, or for the current actor when `None`.
    pub fn legal_actions(&self, seat: Option<usize>) -> Vec<ActionKind> {
        match (self.active_phase(), seat.or(self.current())) {
            (Some(phase), Some(seat)) => phase.legal_actions(&self.players, seat),
            _ => Vec::new(),
        }
    }

    pub fn role(&self, seat: usize) -> Option<Role> {
        if seat == self.blinds.dealer {
            Some(Role::Dealer)
        } else if seat == self.blinds.small_blind_seat {
            Some(Role::SmallBlind)
        } else if seat == self.blinds.big_blind_seat {
            Some(Role::BigBlind)
        } else {
            None
        }
    }

    pub fn blinds(&self) -> Blinds {
        self.blinds
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Community cards as `<rank><suit>` tokens.
    pub fn board_tokens(&self) -> Vec<String> {
        self.board.tokens()
    }

    /// Cards not yet dealt, burnt or revealed.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn hole_cards(&self, seat: usize) -> Option<HoleCards> {
        self.players.get(seat).and_then(Player::hole)
    }

    pub fn into_players(self) -> Vec<Player> {
        self.players
    }
}
