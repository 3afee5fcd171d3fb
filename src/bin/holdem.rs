use holdem_round::agents::{drive, PlayerAgent, RandomAgent, RandomProfile};
use holdem_round::player::Player;
use holdem_round::round::{OutcomeKind, Round, RoundConfig};
use std::process::ExitCode;

const SEATS: usize = 4;
const STACK: u64 = 500;
const MAX_ATTEMPTS: usize = 3;

fn main() -> ExitCode {
    env_logger::init();
    println!("holdem-round {}", holdem_round::VERSION);

    let players = (1..=SEATS).map(|i| Player::new(format!("Bot {i}"), STACK)).collect();
    let mut round = match Round::new(players, RoundConfig::default()) {
        Ok(round) => round,
        Err(err) => {
            eprintln!("cannot seat players: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut agents: Vec<Box<dyn PlayerAgent>> = (0..SEATS)
        .map(|_| {
            let profile = RandomProfile::default().with_max_wager(60).with_reckless(0.1);
            Box::new(RandomAgent::new(profile)) as Box<dyn PlayerAgent>
        })
        .collect();

    match drive(&mut round, &mut agents, MAX_ATTEMPTS) {
        Ok(stats) => {
            log::debug!("{} actions accepted, {} rejected", stats.accepted, stats.rejected)
        }
        Err(err) => {
            eprintln!("hand aborted: {err}");
            return ExitCode::FAILURE;
        }
    }

    println!("Board: {}", round.board());
    if let Some(outcome) = round.outcome() {
        let names: Vec<&str> =
            outcome.winners.iter().map(|&s| round.players()[s].name()).collect();
        match (outcome.kind, outcome.hand) {
            (OutcomeKind::Showdown, Some(hand)) => {
                println!("{} won {} with {}", names.join(" and "), outcome.pot, hand.category)
            }
            _ => println!("{} won {} uncontested", names.join(" and "), outcome.pot),
        }
    }
    for (seat, player) in round.players().iter().enumerate() {
        let role = round.role(seat).map_or(' ', |r| r.symbol());
        println!("{role} {player}");
    }
    ExitCode::SUCCESS
}
