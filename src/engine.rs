// Engine API boundary. Drivers (agents, UIs, network frontends) talk to a hand
// through this trait only, so they never reach into round or phase internals.
// It is implemented for `Round`.

use crate::hand::HoleCards;
use crate::phase::Street;
use crate::round::{Role, Round, RoundError};
use crate::rules::{Action, ActionKind};

pub trait HoldemEngine {
    // Hand lifecycle
    fn start(&mut self) -> Result<(), RoundError>;
    fn is_finished(&self) -> bool;

    // Actions
    fn act(&mut self, action: Action) -> Result<(), RoundError>;
    fn act_token(&mut self, token: &str, amount: Option<&str>) -> Result<(), RoundError>;

    // Queries
    fn legal_actions(&self, seat: Option<usize>) -> Vec<ActionKind>;
    fn current(&self) -> Option<usize>;
    fn street(&self) -> Option<Street>;
    fn pot(&self) -> u64;
    fn table_bet(&self) -> u64;
    fn phase_bet(&self, seat: usize) -> u64;
    fn total_bet(&self, seat: usize) -> u64;
    fn board_tokens(&self) -> Vec<String>;
    fn role(&self, seat: usize) -> Option<Role>;
    fn stack(&self, seat: usize) -> u64;
    fn hole_cards(&self, seat: usize) -> Option<HoleCards>;
    fn num_players(&self) -> usize;
}

impl HoldemEngine for Round {
    fn start(&mut self) -> Result<(), RoundError> {
        self.start()
    }
    fn is_finished(&self) -> bool {
        self.is_finished()
    }

    fn act(&mut self, action: Action) -> Result<(), RoundError> {
        self.act(action)
    }
    fn act_token(&mut self, token: &str, amount: Option<&str>) -> Result<(), RoundError> {
        self.act_token(token, amount)
    }

    fn legal_actions(&self, seat: Option<usize>) -> Vec<ActionKind> {
        self.legal_actions(seat)
    }
    fn current(&self) -> Option<usize> {
        self.current()
    }
    fn street(&self) -> Option<Street> {
        self.street()
    }
    fn pot(&self) -> u64 {
        self.pot()
    }
    fn table_bet(&self) -> u64 {
        self.table_bet()
    }
    fn phase_bet(&self, seat: usize) -> u64 {
        self.phase_bet(seat)
    }
    fn total_bet(&self, seat: usize) -> u64 {
        self.total_bet(seat)
    }
    fn board_tokens(&self) -> Vec<String> {
        self.board_tokens()
    }
    fn role(&self, seat: usize) -> Option<Role> {
        self.role(seat)
    }
    fn stack(&self, seat: usize) -> u64 {
        self.players().get(seat).map_or(0, |p| p.stack())
    }
    fn hole_cards(&self, seat: usize) -> Option<HoleCards> {
        self.hole_cards(seat)
    }
    fn num_players(&self) -> usize {
        self.players().len()
    }
}
