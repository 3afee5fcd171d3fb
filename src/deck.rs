use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{HashSet, VecDeque};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck exhausted: wanted {wanted} cards, {left} left")]
    Exhausted { wanted: usize, left: usize },
    #[error("duplicate card in deck: {0}")]
    Duplicate(Card),
}

/// An ordered sequence of distinct cards, consumed from the front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<Card>,
}

/// Result of a deal: one contiguous slice per player, the shared cards and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Deal {
    pub hands: Vec<Vec<Card>>,
    pub shared: Vec<Card>,
    pub rest: Deck,
}

impl Deck {
    /// A newly allocated, unshuffled 52-card deck in rank-major order.
    ///
    /// ```
    /// use holdem_round::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// assert_eq!(deck.peek().unwrap().to_string(), "2♠");
    /// ```
    pub fn standard() -> Self {
        let mut cards = VecDeque::with_capacity(52);
        for &r in &Rank::ALL {
            for &s in &Suit::ALL {
                cards.push_back(Card::new(r, s));
            }
        }
        Self { cards }
    }

    /// Build a deck in the given order; the first card is dealt first.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DeckError> {
        let mut seen = HashSet::with_capacity(cards.len());
        for &c in &cards {
            if !seen.insert(c) {
                return Err(DeckError::Duplicate(c));
            }
        }
        Ok(Self { cards: cards.into() })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The next card to be dealt, without removing it.
    pub fn peek(&self) -> Option<Card> {
        self.cards.front().copied()
    }

    pub fn to_vec(&self) -> Vec<Card> {
        self.cards.iter().copied().collect()
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.shuffle_with(&mut rng);
    }

    /// Shuffle using the provided RNG implementing Rng.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    /// Draw one card from the front of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    /// Draw exactly `n` cards from the front, or nothing if fewer remain.
    pub fn draw_n(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if n > self.cards.len() {
            return Err(DeckError::Exhausted { wanted: n, left: self.cards.len() });
        }
        Ok(self.cards.drain(..n).collect())
    }

    /// Discard the front card face down.
    pub fn burn(&mut self) -> Result<Card, DeckError> {
        self.draw().ok_or(DeckError::Exhausted { wanted: 1, left: 0 })
    }

    /// Give each of `players` a contiguous run of `per_player` cards, in seating order.
    pub fn deal_hands(
        &mut self,
        players: usize,
        per_player: usize,
    ) -> Result<Vec<Vec<Card>>, DeckError> {
        let wanted = players * per_player;
        if wanted > self.cards.len() {
            return Err(DeckError::Exhausted { wanted, left: self.cards.len() });
        }
        (0..players).map(|_| self.draw_n(per_player)).collect()
    }

    /// Deal player hands followed by `shared` community cards; the remainder is kept.
    ///
    /// ```
    /// use holdem_round::deck::Deck;
    ///
    /// let deal = Deck::standard().deal(3, 2, 5).unwrap();
    /// assert_eq!(deal.hands.len(), 3);
    /// assert_eq!(deal.shared.len(), 5);
    /// assert_eq!(deal.rest.len(), 52 - 11);
    /// ```
    pub fn deal(
        mut self,
        players: usize,
        per_player: usize,
        shared: usize,
    ) -> Result<Deal, DeckError> {
        let wanted = players * per_player + shared;
        if wanted > self.cards.len() {
            return Err(DeckError::Exhausted { wanted, left: self.cards.len() });
        }
        let hands = self.deal_hands(players, per_player)?;
        let shared = self.draw_n(shared)?;
        Ok(Deal { hands, shared, rest: self })
    }
}

/// Shuffle a full copy of `deck` and deal `per_player` cards to each player.
/// The source deck is left untouched.
pub fn shuffle_and_deal<R: Rng + ?Sized>(
    deck: &Deck,
    players: usize,
    per_player: usize,
    rng: &mut R,
) -> Result<Deal, DeckError> {
    let mut copy = deck.clone();
    copy.shuffle_with(rng);
    copy.deal(players, per_player, 0)
}
