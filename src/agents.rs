//! Agents: pluggable players that choose actions for a seat.
//!
//! An agent only ever sees the hand through a read-only [`HoldemEngine`] view
//! and answers with an [`Action`]. [`drive`] owns the loop: it asks the agent
//! seated at the current actor, submits the answer, and re-asks a bounded
//! number of times when the engine rejects it.

use crate::engine::HoldemEngine;
use crate::round::RoundError;
use crate::rules::{Action, ActionKind};

mod bots;

pub use bots::{RandomAgent, RandomProfile};

/// A seat controller asked for a decision whenever its seat is to act.
pub trait PlayerAgent {
    /// Choose an action for `seat`. `rejected` counts earlier refusals this turn.
    fn decide(&mut self, view: &dyn HoldemEngine, seat: usize, rejected: usize) -> Action;

    /// Short label for logs.
    fn name(&self) -> &str {
        "agent"
    }
}

/// Never puts in more than it must: checks, else calls, else goes all in or folds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveAgent;

impl PlayerAgent for PassiveAgent {
    fn decide(&mut self, view: &dyn HoldemEngine, seat: usize, _rejected: usize) -> Action {
        let legal = view.legal_actions(Some(seat));
        [
            (ActionKind::Check, Action::Check),
            (ActionKind::Call, Action::Call),
            (ActionKind::AllIn, Action::AllIn),
        ]
        .into_iter()
        .find(|(kind, _)| legal.contains(kind))
        .map_or(Action::Fold, |(_, action)| action)
    }

    fn name(&self) -> &str {
        "passive"
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DriveError {
    #[error("{agents} agents for {seats} seats")]
    SeatMismatch { agents: usize, seats: usize },
    #[error("seat {seat} had {attempts} actions rejected in a row; last: {last}")]
    TooManyRejections { seat: usize, attempts: usize, last: RoundError },
    #[error(transparent)]
    Round(#[from] RoundError),
}

/// Summary of a driven hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriveStats {
    pub accepted: usize,
    pub rejected: usize,
}

/// Play `engine` to completion with one agent per seat, starting it first if
/// needed. Each turn the current agent gets at most `max_attempts` tries.
pub fn drive(
    engine: &mut dyn HoldemEngine,
    agents: &mut [Box<dyn PlayerAgent>],
    max_attempts: usize,
) -> Result<DriveStats, DriveError> {
    if agents.len() != engine.num_players() {
        return Err(DriveError::SeatMismatch {
            agents: agents.len(),
            seats: engine.num_players(),
        });
    }
    if engine.street().is_none() && !engine.is_finished() {
        engine.start()?;
    }

    let mut stats = DriveStats::default();
    while !engine.is_finished() {
        let Some(seat) = engine.current() else {
            break;
        };
        let agent = &mut agents[seat];
        let mut attempt = 0;
        loop {
            let action = agent.decide(&*engine, seat, attempt);
            match engine.act(action) {
                Ok(()) => {
                    log::debug!("{} (seat {seat}) plays {action}", agent.name());
                    stats.accepted += 1;
                    break;
                }
                Err(err) => {
                    attempt += 1;
                    stats.rejected += 1;
                    if attempt >= max_attempts {
                        return Err(DriveError::TooManyRejections {
                            seat,
                            attempts: attempt,
                            last: err,
                        });
                    }
                }
            }
        }
    }
    Ok(stats)
}
