use dex_skill::data_processing::{read_json, write_json};
use dex_skill::{
    BattleType, Catalog, ComparisonSet, ItemId, RankError, Session, SessionConfig, SessionState,
    SystemClock,
};
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

enum Command {
    Pick(Vec<usize>),
    Move { item_id: ItemId, to: usize },
    Flag(ItemId),
    Ranking,
    Dismiss,
    Triplets(bool),
    Reset,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let command = match words.next()? {
        "move" => Command::Move {
            item_id: words.next()?.parse().ok()?,
            to: words.next()?.parse::<usize>().ok()?.checked_sub(1)?,
        },
        "flag" => Command::Flag(words.next()?.parse().ok()?),
        "rank" => Command::Ranking,
        "dismiss" => Command::Dismiss,
        "pairs" => Command::Triplets(false),
        "triplets" => Command::Triplets(true),
        "reset" => Command::Reset,
        "quit" => Command::Quit,
        first => {
            // 1-based positions within the presented set
            let positions = std::iter::once(first)
                .chain(words)
                .map(|w| w.parse::<usize>().ok()?.checked_sub(1))
                .collect::<Option<Vec<usize>>>()?;
            Command::Pick(positions)
        }
    };
    Some(command)
}

fn print_set(session: &Session, set: &ComparisonSet) {
    for (i, id) in set.ids.iter().enumerate() {
        let name = session.catalog().get(*id).map_or("?", |item| item.name.as_str());
        println!("  [{}] #{} {}", i + 1, id, name);
    }
}

fn print_ranking(session: &Session) {
    for item in session.get_ranked_view() {
        println!(
            "{:>4}. #{:<4} {:<16} {:>8.2} ({:>3.0}% sure, {} battles)",
            item.rank, item.id, item.name, item.score, item.confidence, item.battle_count
        );
    }
}

fn apply(session: &mut Session, command: Command) -> Result<(), RankError> {
    match command {
        Command::Pick(positions) => {
            let Some(set) = session.get_next_comparison_set().ok() else {
                println!("No comparison available right now");
                return Ok(());
            };
            let chosen: Vec<ItemId> = positions
                .iter()
                .filter_map(|&p| set.ids.get(p).copied())
                .collect();
            if session.submit_choice(&chosen)?.is_none() {
                println!("Ignored");
            }
        }
        Command::Move { item_id, to } => {
            let view = session.get_ranked_view();
            let from = view
                .iter()
                .position(|item| item.id == item_id)
                .ok_or(RankError::UnknownItemReference(item_id))?;
            session.move_item(item_id, from, to)?;
            print_ranking(session);
        }
        Command::Flag(item_id) => session.flag_item(item_id)?,
        Command::Ranking => print_ranking(session),
        Command::Dismiss => {
            session.dismiss_milestone();
        }
        Command::Triplets(triplets) => session.set_battle_type(if triplets {
            BattleType::Triplets
        } else {
            BattleType::Pairs
        }),
        Command::Reset => session.reset_session(),
        Command::Quit => {}
    }
    Ok(())
}

fn prompt(session: &mut Session) {
    let milestone = session.get_milestone_state();
    if milestone.blocked {
        if let Some(snapshot) = session.milestone_snapshot() {
            println!(
                "Milestone {} reached after {} battles! Type `rank` to review, `dismiss` to go on.",
                snapshot.threshold, snapshot.battle_count
            );
        }
        return;
    }
    match session.get_next_comparison_set() {
        Ok(set) => {
            println!("Battle {}: which is better?", session.battle_counter() + 1);
            print_set(session, &set);
        }
        Err(e) => println!("{}", e),
    }
}

/// Interactive ranking session in the terminal
fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        tracing::error!(
            "Usage: {} catalog.csv state.json [config.json5]",
            args[0]
        );
        return;
    }
    let catalog = Catalog::from_csv(&args[1]).expect("Failed to read catalog");
    let config = match args.get(3) {
        Some(path) => SessionConfig::from_file(path).expect("Failed to load session config"),
        None => SessionConfig::default(),
    };
    let mut session =
        Session::new(catalog, config, Arc::new(SystemClock)).expect("Invalid session config");

    let state_path = Path::new(&args[2]);
    if state_path.exists() {
        match read_json::<SessionState>(state_path) {
            Ok(state) => session.import_state(state),
            Err(e) => tracing::error!("Starting fresh, couldn't read {:?}: {}", state_path, e),
        }
    }

    prompt(&mut session);
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(command) => {
                if let Err(e) = apply(&mut session, command) {
                    println!("{}", e);
                }
            }
            None => println!(
                "Commands: <positions>, move <id> <rank>, flag <id>, rank, dismiss, pairs, triplets, reset, quit"
            ),
        }
        prompt(&mut session);
    }

    if let Err(e) = write_json(&session.export_state(), state_path) {
        tracing::error!("Failed to save {:?}: {}", state_path, e);
    }
}
