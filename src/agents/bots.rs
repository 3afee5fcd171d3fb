use crate::engine::HoldemEngine;
use crate::rules::{Action, ActionKind};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

use super::PlayerAgent;

/// Knobs for [`RandomAgent`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct RandomProfile {
    /// Largest bet or raise increment the agent will ask for.
    pub max_wager: u64,
    /// Chance of asking for a fold even when checking is free.
    pub reckless: f64,
    pub rng_seed: Option<u64>,
}

impl RandomProfile {
    /// Set a deterministic RNG seed for reproducible decisions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_max_wager(mut self, max_wager: u64) -> Self {
        self.max_wager = max_wager.max(1);
        self
    }

    pub fn with_reckless(mut self, reckless: f64) -> Self {
        self.reckless = reckless.clamp(0.0, 1.0);
        self
    }
}

impl Default for RandomProfile {
    fn default() -> Self {
        Self { max_wager: 50, reckless: 0.0, rng_seed: None }
    }
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(v) => StdRng::seed_from_u64(v),
        None => {
            let mut seed = [0u8; 32];
            rand::rng().fill_bytes(&mut seed);
            StdRng::from_seed(seed)
        }
    }
}

/// Picks uniformly among the legal actions, with a random positive wager for
/// bets and raises.
#[derive(Debug)]
pub struct RandomAgent {
    profile: RandomProfile,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(profile: RandomProfile) -> Self {
        let rng = seeded(profile.rng_seed);
        Self { profile, rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(RandomProfile::default().with_seed(seed))
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new(RandomProfile::default())
    }
}

impl PlayerAgent for RandomAgent {
    fn decide(&mut self, view: &dyn HoldemEngine, seat: usize, rejected: usize) -> Action {
        let legal = view.legal_actions(Some(seat));
        if legal.is_empty() {
            return Action::Fold;
        }
        // after a refusal, stop gambling on wagers and take the first safe option
        if rejected > 0 {
            return legal
                .iter()
                .find_map(|k| match k {
                    ActionKind::Check => Some(Action::Check),
                    ActionKind::Call => Some(Action::Call),
                    ActionKind::Fold => Some(Action::Fold),
                    _ => None,
                })
                .unwrap_or(Action::AllIn);
        }
        if self.profile.reckless > 0.0 && self.rng.random::<f64>() < self.profile.reckless {
            return Action::Fold;
        }

        let kind = legal[self.rng.random_range(0..legal.len())];
        let wager = self.rng.random_range(1..=self.profile.max_wager.max(1));
        match kind {
            ActionKind::Fold => Action::Fold,
            ActionKind::Check => Action::Check,
            ActionKind::Call => Action::Call,
            ActionKind::Bet => Action::Bet(wager),
            ActionKind::Raise => Action::Raise(wager),
            ActionKind::AllIn => Action::AllIn,
        }
    }

    fn name(&self) -> &str {
        "random"
    }
}
