//! Action legality and chip effects.
//!
//! Legality depends only on three numbers: the table bet (highest bet this
//! phase), the actor's own bet this phase and the actor's remaining stack.
//! Every check happens before the player is touched, so a rejected action
//! never mutates anything.

use crate::player::Player;
use std::fmt;
use std::str::FromStr;

/// The closed set of action tokens. These strings are part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Fold,
        ActionKind::Check,
        ActionKind::Call,
        ActionKind::Bet,
        ActionKind::Raise,
        ActionKind::AllIn,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Bet => "bet",
            ActionKind::Raise => "raise",
            ActionKind::AllIn => "all in",
        }
    }

    /// Bet and raise carry a caller-supplied wager.
    pub const fn needs_amount(self) -> bool {
        matches!(self, ActionKind::Bet | ActionKind::Raise)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "fold" => ActionKind::Fold,
            "check" => ActionKind::Check,
            "call" => ActionKind::Call,
            "bet" => ActionKind::Bet,
            "raise" => ActionKind::Raise,
            "all in" | "all-in" => ActionKind::AllIn,
            _ => return Err(ActionError::UnknownToken(s.to_string())),
        };
        Ok(kind)
    }
}

/// A requested action. `Bet` carries the amount to put in; `Raise` carries the
/// increment on top of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet(u64),
    Raise(u64),
    AllIn,
}

impl Action {
    pub const fn kind(self) -> ActionKind {
        match self {
            Action::Fold => ActionKind::Fold,
            Action::Check => ActionKind::Check,
            Action::Call => ActionKind::Call,
            Action::Bet(_) => ActionKind::Bet,
            Action::Raise(_) => ActionKind::Raise,
            Action::AllIn => ActionKind::AllIn,
        }
    }

    /// Build an action from a wire token and an optional textual amount.
    ///
    /// ```
    /// use holdem_round::rules::{Action, ActionError};
    ///
    /// assert_eq!(Action::from_token("raise", Some("40")), Ok(Action::Raise(40)));
    /// assert_eq!(Action::from_token("all in", None), Ok(Action::AllIn));
    /// let err = Action::from_token("bet", Some("-5")).unwrap_err();
    /// assert!(matches!(err, ActionError::NonPositiveAmount(_)));
    /// ```
    pub fn from_token(token: &str, amount: Option<&str>) -> Result<Self, ActionError> {
        let kind: ActionKind = token.parse()?;
        match (kind, amount) {
            (ActionKind::Bet, Some(raw)) => Ok(Action::Bet(parse_wager(kind, raw)?)),
            (ActionKind::Raise, Some(raw)) => Ok(Action::Raise(parse_wager(kind, raw)?)),
            (ActionKind::Bet | ActionKind::Raise, None) => Err(ActionError::MissingAmount(kind)),
            (_, Some(_)) => Err(ActionError::UnexpectedAmount(kind)),
            (ActionKind::Fold, None) => Ok(Action::Fold),
            (ActionKind::Check, None) => Ok(Action::Check),
            (ActionKind::Call, None) => Ok(Action::Call),
            (ActionKind::AllIn, None) => Ok(Action::AllIn),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Bet(a) | Action::Raise(a) => write!(f, "{} {}", self.kind(), a),
            _ => write!(f, "{}", self.kind()),
        }
    }
}

fn parse_wager(kind: ActionKind, raw: &str) -> Result<u64, ActionError> {
    let value: i128 =
        raw.trim().parse().map_err(|_| ActionError::InvalidAmount(raw.to_string()))?;
    if value <= 0 {
        return Err(ActionError::NonPositiveAmount(kind));
    }
    u64::try_from(value).map_err(|_| ActionError::InvalidAmount(raw.to_string()))
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("'{action}' is not legal now; legal actions: {}", tokens(.legal))]
    Illegal { action: ActionKind, legal: Vec<ActionKind> },
    #[error("'{0}' needs a positive amount")]
    NonPositiveAmount(ActionKind),
    #[error("'{0}' needs an amount")]
    MissingAmount(ActionKind),
    #[error("'{0}' does not take an amount")]
    UnexpectedAmount(ActionKind),
    #[error("invalid amount: '{0}'")]
    InvalidAmount(String),
    #[error("unknown action: '{0}'")]
    UnknownToken(String),
    #[error("it is seat {expected}'s turn, not seat {got}'s")]
    NotYourTurn { expected: usize, got: usize },
    #[error("seat {0} is not in the hand")]
    NotInHand(usize),
    #[error("no betting phase is active")]
    PhaseNotActive,
    #[error("the round has not started")]
    NotStarted,
    #[error("the round is finished")]
    Finished,
}

fn tokens(kinds: &[ActionKind]) -> String {
    kinds.iter().map(|k| k.token()).collect::<Vec<_>>().join(", ")
}

/// Chip effect of an accepted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contribution {
    /// Hole cards were surrendered; no chips move.
    Fold,
    /// Chips moved from the stack into the phase bet (possibly zero for a check).
    Chips(u64),
}

/// Legal actions in a fixed order: fold, call, bet, raise, check, all in.
///
/// ```
/// use holdem_round::rules::legal_actions;
/// use holdem_round::rules::ActionKind::*;
///
/// // facing a bet of 20 with 100 behind
/// let legal = legal_actions(20, 0, 100);
/// assert_eq!(legal, vec![Fold, Call, Raise, AllIn]);
/// ```
pub fn legal_actions(table_bet: u64, player_bet: u64, stack: u64) -> Vec<ActionKind> {
    let facing = table_bet > player_bet;
    let level = table_bet == player_bet;
    let can_call = facing && stack > table_bet - player_bet;
    let legal: Vec<ActionKind> = [
        (ActionKind::Fold, facing),
        (ActionKind::Call, can_call),
        (ActionKind::Bet, stack > 0 && level),
        (ActionKind::Raise, can_call),
        (ActionKind::Check, level),
        (ActionKind::AllIn, stack > 0 && table_bet >= player_bet),
    ]
    .into_iter()
    .filter_map(|(kind, ok)| ok.then_some(kind))
    .collect();
    log::trace!("legal actions at table {table_bet}, bet {player_bet}, stack {stack}: {legal:?}");
    legal
}

/// Validate `action` and apply its chip effect to `player`.
///
/// Stakes are always capped at the player's stack.
pub fn apply(
    action: Action,
    table_bet: u64,
    player_bet: u64,
    player: &mut Player,
) -> Result<Contribution, ActionError> {
    let legal = legal_actions(table_bet, player_bet, player.stack());
    if !legal.contains(&action.kind()) {
        return Err(ActionError::Illegal { action: action.kind(), legal });
    }
    if let Action::Bet(0) | Action::Raise(0) = action {
        return Err(ActionError::NonPositiveAmount(action.kind()));
    }
    let to_call = table_bet - player_bet;
    let contribution = match action {
        Action::Fold => {
            player.fold();
            Contribution::Fold
        }
        Action::Check => Contribution::Chips(0),
        Action::Call => Contribution::Chips(player.stake(to_call)),
        Action::Bet(amount) => Contribution::Chips(player.stake(amount)),
        Action::Raise(increment) => {
            Contribution::Chips(player.stake(to_call.saturating_add(increment)))
        }
        Action::AllIn => Contribution::Chips(player.stake(player.stack())),
    };
    Ok(contribution)
}
