mod rank_groups;

use crate::cards::Card;
use crate::hand::{validate_holdem, Board, HandError, HoleCards};
use core::cmp::Ordering;
use rank_groups::RankGroups;
use std::collections::HashSet;
use std::fmt;

/// Compact, comparable hand strength. Higher is better.
/// Encodes category and ranked tiebreakers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u64);

impl HandValue {
    /// Pack a category and up to five rank tiebreakers into a comparable value.
    fn from_parts(category: Category, ranks_desc: &[u8]) -> Self {
        // [ category (8 bits) | r0 (6) | r1 (6) | r2 (6) | r3 (6) | r4 (6) | 10 zero bits ]
        const CAT_SHIFT: u32 = 48;
        const RANK_STRIDE: u32 = 6;
        let mut v: u64 = (category.score() as u64) << CAT_SHIFT;
        for (i, r) in ranks_desc.iter().take(5).enumerate() {
            let offset = CAT_SHIFT - RANK_STRIDE * (i as u32 + 1);
            v |= (*r as u64) << offset;
        }
        HandValue(v)
    }
}

/// Poker hand category from weakest to strongest.
///
/// Scores follow the straight/flush arithmetic: a straight scores 4, a flush 5,
/// both together 9, so there is no category scoring 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 9,
}

impl Category {
    pub const fn score(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::HighCard => "high card",
            Category::Pair => "pair",
            Category::TwoPair => "two pair",
            Category::ThreeOfAKind => "three of a kind",
            Category::Straight => "straight",
            Category::Flush => "flush",
            Category::FullHouse => "full house",
            Category::FourOfAKind => "four of a kind",
            Category::StraightFlush => "straight flush",
        }
    }

    fn from_count_signature(signature: &[u8]) -> Self {
        match signature {
            [4, ..] => Category::FourOfAKind,
            [3, 2] => Category::FullHouse,
            [3, ..] => Category::ThreeOfAKind,
            [2, 2, ..] => Category::TwoPair,
            [2, ..] => Category::Pair,
            _ => Category::HighCard,
        }
    }

    fn from_shape(is_straight: bool, is_flush: bool) -> Self {
        match (is_straight, is_flush) {
            (true, true) => Category::StraightFlush,
            (false, true) => Category::Flush,
            (true, false) => Category::Straight,
            (false, false) => Category::HighCard,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scored hand: category plus up to five tiebreak ranks (2..=14, ace-low wheel uses 1).
/// Ordering is category first, then ranks element-wise.
#[derive(Debug, Clone, Copy)]
pub struct HandRank {
    pub category: Category,
    ranks: [u8; 5],
    len: u8,
    value: HandValue,
}

impl HandRank {
    fn new(category: Category, ranks_desc: &[u8]) -> Self {
        let mut ranks = [0u8; 5];
        let len = ranks_desc.len().min(5);
        ranks[..len].copy_from_slice(&ranks_desc[..len]);
        let value = HandValue::from_parts(category, ranks_desc);
        Self { category, ranks, len: len as u8, value }
    }

    pub fn ranks(&self) -> &[u8] {
        &self.ranks[..self.len as usize]
    }

    /// Return the packed comparable value for ordering/caching.
    pub const fn value(&self) -> HandValue {
        self.value
    }
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HandRank {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for HandRank {}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.category, self.ranks())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
    #[error("a hand needs 5 to 7 cards, got {0}")]
    HandSize(usize),
    #[error("card {0} appears twice in one hand")]
    DuplicateCard(Card),
    #[error("no hands to compare")]
    NoHands,
}

/// Score exactly five cards.
///
/// ```
/// use holdem_round::cards::parse_cards;
/// use holdem_round::evaluator::{evaluate_five, Category};
///
/// let cards = parse_cards("A♠ 2♥ 3♦ 4♣ 5♠").unwrap();
/// let rank = evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]);
/// assert_eq!(rank.category, Category::Straight);
/// assert_eq!(rank.ranks(), &[5, 4, 3, 2, 1]);
/// ```
pub fn evaluate_five(cards: &[Card; 5]) -> HandRank {
    rank_cards(cards)
}

/// Category from the count signature, raised to straight/flush when the shape
/// allows. Works on every card given: the flush needs all of them in one suit
/// and the straight is read off the top five rank groups.
fn rank_cards(cards: &[Card]) -> HandRank {
    let groups = RankGroups::from_cards(cards);
    let signature = groups.signature();
    let mut ranks = groups.ranks();
    if ranks == [14u8, 5, 4, 3, 2] {
        ranks = vec![5, 4, 3, 2, 1];
    }
    let is_straight = match (ranks.iter().max(), ranks.iter().min()) {
        (Some(hi), Some(lo)) => ranks.len() == 5 && hi - lo == 4,
        _ => false,
    };
    let is_flush = cards.iter().all(|c| c.suit() == cards[0].suit());
    let by_counts = Category::from_count_signature(&signature);
    let category = by_counts.max(Category::from_shape(is_straight, is_flush));
    HandRank::new(category, &ranks)
}

/// Score a hand of 5 to 7 distinct cards.
///
/// All cards count: a seven-card hand is a flush only when all seven share a
/// suit, and surplus groups past the fifth are dropped.
///
/// ```
/// use holdem_round::cards::parse_cards;
/// use holdem_round::evaluator::{rank_hand, Category};
///
/// let r = rank_hand(&parse_cards("A♠ A♣ A♥ K♦ K♠ K♣ 2♦").unwrap()).unwrap();
/// assert_eq!(r.category, Category::FullHouse);
/// assert_eq!(r.ranks(), &[14, 13, 2]);
/// ```
pub fn rank_hand(cards: &[Card]) -> Result<HandRank, EvalError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(EvalError::HandSize(cards.len()));
    }
    let mut seen = HashSet::with_capacity(cards.len());
    for &c in cards {
        if !seen.insert(c) {
            return Err(EvalError::DuplicateCard(c));
        }
    }
    Ok(rank_cards(cards))
}

/// Evaluate a Hold'em hand from hole cards and a board of 3 to 5 cards.
pub fn evaluate_holdem(hole: &HoleCards, board: &Board) -> Result<HandRank, EvalError> {
    validate_holdem(hole, board)?;
    rank_hand(&hole.with_board(board))
}

/// Every index whose key equals the maximum key, plus that key.
/// Returns `None` for an empty slice.
///
/// ```
/// use holdem_round::evaluator::allmax;
///
/// let (idx, best) = allmax(&[3, 7, 1, 7], |x| *x).unwrap();
/// assert_eq!(idx, vec![1, 3]);
/// assert_eq!(best, 7);
/// ```
pub fn allmax<T, K, F>(items: &[T], key: F) -> Option<(Vec<usize>, K)>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let keys: Vec<K> = items.iter().map(key).collect();
    let best_at = keys.iter().enumerate().max_by(|a, b| a.1.cmp(b.1)).map(|(i, _)| i)?;
    let winners =
        keys.iter().enumerate().filter(|(_, k)| **k == keys[best_at]).map(|(i, _)| i).collect();
    let best = keys.into_iter().nth(best_at)?;
    Some((winners, best))
}

/// Score every hand and return the indices of all hands sharing the best score.
pub fn winners(hands: &[Vec<Card>]) -> Result<(Vec<usize>, HandRank), EvalError> {
    let ranked = hands.iter().map(|h| rank_hand(h)).collect::<Result<Vec<_>, _>>()?;
    allmax(&ranked, |r| *r).ok_or(EvalError::NoHands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn five(s: &str) -> HandRank {
        let c = parse_cards(s).unwrap();
        evaluate_five(&[c[0], c[1], c[2], c[3], c[4]])
    }

    #[test]
    fn royal_flush_scores_nine() {
        let r = five("A♠ K♠ Q♠ J♠ 10♠");
        assert_eq!(r.category, Category::StraightFlush);
        assert_eq!(r.category.score(), 9);
        assert_eq!(r.ranks(), &[14, 13, 12, 11, 10]);
    }

    #[test]
    fn wheel_is_normalized() {
        let r = five("A♠ 2♥ 3♦ 4♣ 5♠");
        assert_eq!(r.category, Category::Straight);
        assert_eq!(r.ranks(), &[5, 4, 3, 2, 1]);
        assert!(five("2♠ 3♥ 4♦ 5♣ 6♠") > r);
    }

    #[test]
    fn count_categories_and_ranks() {
        let r = five("9♣ 9♦ 9♥ 9♠ A♣");
        assert_eq!((r.category, r.ranks()), (Category::FourOfAKind, &[9, 14][..]));
        let r = five("3♣ 3♦ 3♥ J♠ J♣");
        assert_eq!((r.category, r.ranks()), (Category::FullHouse, &[3, 11][..]));
        let r = five("Q♣ Q♦ Q♥ 9♠ 2♣");
        assert_eq!((r.category, r.ranks()), (Category::ThreeOfAKind, &[12, 9, 2][..]));
        let r = five("J♣ J♦ 9♣ 9♥ 2♠");
        assert_eq!((r.category, r.ranks()), (Category::TwoPair, &[11, 9, 2][..]));
        let r = five("A♥ A♦ 10♠ 9♣ 2♦");
        assert_eq!((r.category, r.ranks()), (Category::Pair, &[14, 10, 9, 2][..]));
        let r = five("A♥ K♦ 7♠ 5♣ 2♦");
        assert_eq!((r.category, r.ranks()), (Category::HighCard, &[14, 13, 7, 5, 2][..]));
    }

    #[test]
    fn flush_beats_straight() {
        assert!(five("K♥ 10♥ 8♥ 6♥ 3♥") > five("9♠ 10♥ J♦ Q♣ K♠"));
        assert_eq!(five("K♥ 10♥ 8♥ 6♥ 3♥").category, Category::Flush);
    }

    #[test]
    fn five_suited_of_seven_is_not_a_flush() {
        let cards = parse_cards("2♥ 7♥ 9♥ J♥ K♥ K♠ K♣").unwrap();
        let r = rank_hand(&cards).unwrap();
        assert_eq!(r.category, Category::ThreeOfAKind);
        assert_eq!(r.ranks(), &[13, 11, 9, 7, 2]);
    }

    #[test]
    fn seven_of_one_suit_is_a_flush() {
        let cards = parse_cards("2♦ 4♦ 6♦ 8♦ 10♦ Q♦ A♦").unwrap();
        let r = rank_hand(&cards).unwrap();
        assert_eq!(r.category, Category::Flush);
        assert_eq!(r.ranks(), &[14, 12, 10, 8, 6]);
    }

    #[test]
    fn straight_is_read_from_top_groups() {
        let low_run = parse_cards("2♥ 3♣ 4♦ 5♠ 6♥ K♣ Q♦").unwrap();
        let r = rank_hand(&low_run).unwrap();
        assert_eq!(r.category, Category::HighCard);
        assert_eq!(r.ranks(), &[13, 12, 6, 5, 4]);

        let top_run = parse_cards("9♥ 10♣ J♦ Q♠ K♥ 3♣ 2♦").unwrap();
        assert_eq!(rank_hand(&top_run).unwrap().category, Category::Straight);
    }

    #[test]
    fn holdem_hand_scores_all_seven_cards() {
        let board: Board = "2♥ 7♥ 9♥ K♠ K♣".parse().unwrap();
        let suited: HoleCards = "J♥ 3♥".parse().unwrap();
        let trips: HoleCards = "K♦ 4♣".parse().unwrap();
        let a = evaluate_holdem(&suited, &board).unwrap();
        let b = evaluate_holdem(&trips, &board).unwrap();
        assert_eq!(a.category, Category::Pair);
        assert_eq!(b.category, Category::ThreeOfAKind);
        assert!(b > a);
    }

    #[test]
    fn rank_hand_validates_input() {
        let four = parse_cards("2♥ 7♥ 9♥ J♥").unwrap();
        assert_eq!(rank_hand(&four), Err(EvalError::HandSize(4)));
        let dup = parse_cards("2♥ 2♥ 9♥ J♥ K♠").unwrap();
        assert!(matches!(rank_hand(&dup), Err(EvalError::DuplicateCard(_))));
    }

    #[test]
    fn winners_include_ties() {
        let board = "A♣ K♦ Q♥ J♠ 2♣";
        let hands = vec![
            parse_cards(&format!("10♣ 3♦ {board}")).unwrap(),
            parse_cards(&format!("10♥ 4♠ {board}")).unwrap(),
            parse_cards(&format!("9♣ 9♦ {board}")).unwrap(),
        ];
        let (idx, best) = winners(&hands).unwrap();
        assert_eq!(idx, vec![0, 1]);
        assert_eq!(best.category, Category::Straight);
        assert_eq!(winners(&[]), Err(EvalError::NoHands));
    }
}
