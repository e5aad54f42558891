use dex_skill::metrics::pairwise_accuracy;
use dex_skill::summary::write_leaderboard;
use dex_skill::{BattleType, Catalog, ItemId, ManualClock, RankError, Session, SessionConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;

const STEP_MS: u64 = 1_000;

struct SyntheticRater {
    strengths: HashMap<ItemId, f64>,
    rng: StdRng,
}

impl SyntheticRater {
    // Strengths spread evenly over [0, spread); the rater's noise is standard logistic.
    fn new(catalog: &Catalog, spread: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let strengths = catalog
            .ids()
            .iter()
            .map(|&id| (id, spread * rng.random::<f64>()))
            .collect();
        Self { strengths, rng }
    }

    fn performance(&mut self, id: ItemId) -> f64 {
        let u: f64 = self.rng.random_range(1e-12..1. - 1e-12);
        self.strengths.get(&id).copied().unwrap_or(0.) + (u / (1. - u)).ln()
    }

    fn choose(&mut self, ids: &[ItemId]) -> Option<ItemId> {
        let performances: Vec<(f64, ItemId)> =
            ids.iter().map(|&id| (self.performance(id), id)).collect();
        performances
            .into_iter()
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }
}

fn run(
    session: &mut Session,
    clock: &ManualClock,
    rater: &mut SyntheticRater,
    num_battles: u64,
) -> Result<(), RankError> {
    let grace_ms = session.config().grace_delay_ms;
    while session.battle_counter() < num_battles {
        let set = session.get_next_comparison_set()?;
        let Some(choice) = rater.choose(&set.ids) else {
            break;
        };
        clock.advance(STEP_MS);
        session.submit_choice(&[choice])?;

        if session.get_milestone_state().blocked {
            let view = session.get_ranked_view();
            tracing::info!(
                "Milestone at {} battles: pairwise accuracy {:?}%",
                session.battle_counter(),
                pairwise_accuracy(&view, &rater.strengths)
            );
            session.dismiss_milestone();
            clock.advance(grace_ms + 1);
        }
    }
    Ok(())
}

/// Ranks a synthetic catalog against a rater with known hidden strengths.
fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 5 {
        tracing::error!(
            "Usage: {} num_items num_battles [pairs|triplets] [config.json5]",
            args[0]
        );
        return;
    }
    let (Ok(num_items), Ok(num_battles)) = (args[1].parse::<u32>(), args[2].parse::<u64>()) else {
        tracing::error!("num_items and num_battles must be non-negative integers");
        return;
    };
    let mut config = match args.get(4) {
        Some(path) => SessionConfig::from_file(path).expect("Failed to load session config"),
        None => SessionConfig::default(),
    };
    if let Some(battle_type) = args.get(3) {
        config.battle_type = match battle_type.as_str() {
            "triplets" => BattleType::Triplets,
            _ => BattleType::Pairs,
        };
    }
    let seed = config.rng_seed.unwrap_or(0);

    let catalog = Catalog::numbered(num_items);
    let clock = ManualClock::starting_at(0);
    let mut rater = SyntheticRater::new(&catalog, 20., seed);
    let mut session =
        Session::new(catalog, config, Arc::new(clock.clone())).expect("Invalid session config");

    if let Err(e) = run(&mut session, &clock, &mut rater, num_battles) {
        tracing::error!("Simulation stopped early: {}", e);
    }

    let view = session.get_ranked_view();
    tracing::info!(
        "Finished {} battles over {} items: pairwise accuracy {:?}%",
        session.battle_counter(),
        view.len(),
        pairwise_accuracy(&view, &rater.strengths)
    );

    let dir = std::path::PathBuf::from("../data/output");
    std::fs::create_dir_all(&dir).expect("Could not create directory");
    write_leaderboard(&view, dir.join("simulated_ranking.csv"));
}
