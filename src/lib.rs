//! holdem-round: one hand of Texas Hold'em, from the deal to the payout
//!
//! Goals:
//! - Exact hand ranking with full tie-breaks and split pots
//! - Actions validated before anything mutates; chips are always conserved
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: rank a Hold'em hand
//! ```
//! use holdem_round::evaluator::{evaluate_holdem, Category};
//! use holdem_round::hand::{Board, HoleCards};
//!
//! let hole: HoleCards = "A♠ A♥".parse().unwrap();
//! let board: Board = "K♣ Q♦ J♥ 3♠ 2♣".parse().unwrap();
//!
//! let rank = evaluate_holdem(&hole, &board).unwrap();
//! assert_eq!(rank.category, Category::Pair);
//! assert_eq!(rank.ranks(), &[14, 13, 12, 11, 3]);
//! ```
//!
//! ## Playing a hand
//! Build a [`round::Round`], call `start`, then submit actions for the current
//! actor until `is_finished`. [`agents::drive`] does this with one
//! [`agents::PlayerAgent`] per seat. A demo table of random bots runs with:
//! ```sh
//! RUST_LOG=debug cargo run --bin holdem
//! ```

pub mod agents;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod hand;
pub mod phase;
pub mod player;
pub mod round;
pub mod rules;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
