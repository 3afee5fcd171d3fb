use crate::hand::HoleCards;
use std::fmt;

/// A seated player. Balance and hole cards are only changed by the round engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    name: String,
    stack: u64,
    hole: Option<HoleCards>,
}

impl Player {
    pub fn new(name: impl Into<String>, stack: u64) -> Self {
        Self { name: name.into(), stack, hole: None }
    }

    /// Returns the player's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the player's remaining chips
    pub fn stack(&self) -> u64 {
        self.stack
    }

    /// Returns the player's hole cards; `None` once folded or before the deal
    pub fn hole(&self) -> Option<HoleCards> {
        self.hole
    }

    /// Still contesting the pot.
    pub fn in_hand(&self) -> bool {
        self.hole.is_some()
    }

    /// In the hand with nothing left to wager.
    pub fn is_all_in(&self) -> bool {
        self.in_hand() && self.stack == 0
    }

    /// In the hand and able to put more chips in.
    pub fn can_act(&self) -> bool {
        self.in_hand() && self.stack > 0
    }

    /// Take up to `amount` chips from the stack; returns what was actually taken.
    pub(crate) fn stake(&mut self, amount: u64) -> u64 {
        let taken = amount.min(self.stack);
        self.stack -= taken;
        taken
    }

    /// Add won chips. A round refuses tables whose stacks sum past `u64::MAX`,
    /// so a payout never overflows.
    pub(crate) fn credit(&mut self, amount: u64) {
        self.stack += amount;
    }

    pub(crate) fn deal(&mut self, hole: HoleCards) {
        self.hole = Some(hole);
    }

    pub(crate) fn fold(&mut self) {
        self.hole = None;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hole {
            Some(h) => write!(f, "{}: {} ({})", self.name, h, self.stack),
            None => write!(f, "{}: -- ({})", self.name, self.stack),
        }
    }
}
