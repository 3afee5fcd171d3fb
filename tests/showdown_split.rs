use holdem_round::cards::{parse_cards, Card};
use holdem_round::deck::Deck;
use holdem_round::evaluator::Category;
use holdem_round::player::Player;
use holdem_round::round::{OutcomeKind, Round, RoundConfig};
use holdem_round::rules::Action;

fn stacked(holes: &[&str], board: &str) -> Deck {
    let mut order: Vec<Card> = holes.iter().flat_map(|h| parse_cards(h).unwrap()).collect();
    let board = parse_cards(board).unwrap();
    let mut spare: Vec<Card> = Deck::standard()
        .to_vec()
        .into_iter()
        .filter(|c| !order.contains(c) && !board.contains(c))
        .collect();
    for (i, &card) in board.iter().enumerate() {
        if matches!(i, 0 | 3 | 4) {
            order.push(spare.remove(0));
        }
        order.push(card);
    }
    order.extend(spare);
    Deck::from_cards(order).unwrap()
}

fn table(n: usize) -> Vec<Player> {
    (0..n).map(|i| Player::new(format!("P{}", i + 1), 100)).collect()
}

fn check_down(round: &mut Round) {
    while !round.is_finished() {
        round.act(Action::Check).unwrap();
    }
}

#[test]
fn odd_chip_goes_to_the_lowest_seat() {
    // no hole card is a spade, so every remaining hand plays the board's ace-high straight
    let deck = stacked(&["2♣ 3♦", "4♥ 5♣", "7♦ 8♣"], "10♠ J♠ Q♠ K♠ A♠");
    let config = RoundConfig::default().with_small_blind(5);
    let mut round = Round::with_deck(table(3), config, deck).unwrap();
    round.start().unwrap();
    round.act(Action::Call).unwrap(); // seat 0
    round.act(Action::Fold).unwrap(); // small blind gives up 5
    round.act(Action::Check).unwrap(); // big blind
    check_down(&mut round);

    let outcome = round.outcome().unwrap();
    assert_eq!(outcome.kind, OutcomeKind::Showdown);
    assert_eq!(outcome.pot, 25);
    assert_eq!(outcome.winners, vec![0, 2]);
    assert_eq!(outcome.payouts, vec![13, 0, 12]);
    assert_eq!(outcome.hand.unwrap().category, Category::Straight);
    let stacks: Vec<u64> = round.players().iter().map(Player::stack).collect();
    assert_eq!(stacks, vec![103, 95, 102]);
}

#[test]
fn three_way_split_with_two_odd_chips() {
    let deck = stacked(&["2♣ 3♦", "4♥ 5♣", "7♦ 8♣", "2♦ 3♣"], "10♠ J♠ Q♠ K♠ A♠");
    let config = RoundConfig::default().with_small_blind(5);
    let mut round = Round::with_deck(table(4), config, deck).unwrap();
    round.start().unwrap();
    round.act(Action::Call).unwrap(); // seat 3
    round.act(Action::Call).unwrap(); // seat 0
    round.act(Action::Fold).unwrap(); // seat 1, small blind
    round.act(Action::Check).unwrap(); // seat 2, big blind
    check_down(&mut round);

    let outcome = round.outcome().unwrap();
    assert_eq!(outcome.pot, 35);
    assert_eq!(outcome.winners, vec![0, 2, 3]);
    assert_eq!(outcome.payouts, vec![12, 0, 12, 11]);
    let total: u64 = round.players().iter().map(Player::stack).sum();
    assert_eq!(total, 400);
}

#[test]
fn even_split_between_identical_hands() {
    let deck = stacked(&["A♠ K♦", "A♦ K♠", "7♦ 2♣"], "A♣ K♣ 9♥ 5♠ 3♦");
    let mut round = Round::with_deck(table(3), RoundConfig::default(), deck).unwrap();
    round.start().unwrap();
    round.act(Action::Call).unwrap();
    round.act(Action::Call).unwrap();
    round.act(Action::Check).unwrap();
    check_down(&mut round);

    let outcome = round.outcome().unwrap();
    assert_eq!(outcome.winners, vec![0, 1]);
    assert_eq!(outcome.payouts, vec![30, 30, 0]);
    assert_eq!(outcome.hand.unwrap().category, Category::TwoPair);
    assert_eq!(round.pot(), 0);
}

#[test]
fn kicker_breaks_what_looks_like_a_tie() {
    let deck = stacked(&["A♠ Q♦", "A♦ J♠", "7♦ 2♣"], "A♣ K♣ 9♥ 5♠ 3♦");
    let mut round = Round::with_deck(table(3), RoundConfig::default(), deck).unwrap();
    round.start().unwrap();
    round.act(Action::Call).unwrap();
    round.act(Action::Call).unwrap();
    round.act(Action::Check).unwrap();
    check_down(&mut round);

    let outcome = round.outcome().unwrap();
    assert_eq!(outcome.winners, vec![0]);
    assert_eq!(outcome.hand.unwrap().ranks(), &[14, 13, 12, 9, 5]);
}
