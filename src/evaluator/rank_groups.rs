use crate::cards::Card;

/// Slots in a scored hand.
const HAND_SLOTS: u8 = 5;

/// Ranks grouped by frequency, sorted by (count desc, rank desc).
///
/// Example: A A A K Q groups as [(14, 3), (13, 1), (12, 1)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RankGroups {
    groups: Vec<(u8, u8)>,
}

impl RankGroups {
    pub(crate) fn from_cards(cards: &[Card]) -> Self {
        let mut counts = [0u8; 15];
        for c in cards {
            counts[c.rank().value() as usize] += 1;
        }
        let mut groups: Vec<(u8, u8)> = (2u8..=14)
            .filter(|&r| counts[r as usize] > 0)
            .map(|r| (r, counts[r as usize]))
            .collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
        groups.truncate(HAND_SLOTS as usize);
        Self { groups }
    }

    /// Group sizes cut down to exactly five slots; the last kept group is split
    /// if it would overshoot, e.g. (3, 3) becomes (3, 2).
    pub(crate) fn signature(&self) -> Vec<u8> {
        let mut left = HAND_SLOTS;
        let mut out = Vec::with_capacity(self.groups.len());
        for &(_, count) in &self.groups {
            if left == 0 {
                break;
            }
            let take = count.min(left);
            out.push(take);
            left -= take;
        }
        out
    }

    /// One rank per kept group (at most five), strongest first. Groups cut from
    /// the signature still keep their rank here.
    pub(crate) fn ranks(&self) -> Vec<u8> {
        self.groups.iter().map(|&(rank, _)| rank).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn groups(s: &str) -> RankGroups {
        RankGroups::from_cards(&parse_cards(s).unwrap())
    }

    #[test]
    fn quads_sort_before_kicker() {
        let g = groups("K♠ A♠ A♣ A♥ A♦");
        assert_eq!(g.signature(), vec![4, 1]);
        assert_eq!(g.ranks(), vec![14, 13]);
    }

    #[test]
    fn count_beats_rank_in_ordering() {
        let g = groups("A♠ 8♣ 8♥ Q♦ 5♠");
        assert_eq!(g.signature(), vec![2, 1, 1, 1]);
        assert_eq!(g.ranks(), vec![8, 14, 12, 5]);
    }

    #[test]
    fn two_trips_truncate_to_full_house() {
        let g = groups("9♠ 9♣ 9♥ 4♠ 4♣ 4♥ 2♦");
        assert_eq!(g.signature(), vec![3, 2]);
        assert_eq!(g.ranks(), vec![9, 4, 2]);
    }

    #[test]
    fn seven_distinct_keep_top_five() {
        let g = groups("2♠ 4♣ 6♥ 8♦ 10♠ Q♣ A♥");
        assert_eq!(g.signature(), vec![1, 1, 1, 1, 1]);
        assert_eq!(g.ranks(), vec![14, 12, 10, 8, 6]);
    }
}
