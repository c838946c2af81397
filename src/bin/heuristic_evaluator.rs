use clap::Parser;
use farm_planner::config::{Configuration, SearchSettings};
use farm_planner::heuristics::Heuristic;
use farm_planner::{solve, SolveError};
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compares search heuristics on seeded random farms", long_about = None)]
struct Args {
    /// Number of random farms to evaluate
    #[clap(long, default_value_t = 20)]
    farms: usize,

    /// Seed of the first farm; farm i uses seed + i
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Maximum number of fields per farm
    #[clap(long, default_value_t = 3)]
    max_fields: usize,

    /// Expansion budget per search
    #[clap(long, default_value_t = 200_000)]
    max_expansions: usize,
}

#[derive(Default)]
struct Tally {
    solved: usize,
    unsolvable: usize,
    over_budget: usize,
    expansions: Vec<usize>,
    /// Farms where this heuristic returned a longer plan than the blind search.
    longer_than_blind: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();

    println!("Starting heuristic evaluation for {} farms...", args.farms);

    for farm_idx in 0..args.farms {
        let seed = args.seed + farm_idx as u64;
        let base = Configuration::random_with_seed(seed, args.max_fields);
        let crops: Vec<String> = base.fields.iter().map(|f| f.crop.to_string()).collect();

        println!(
            "\nFarm {} (Seed: {}): fields [{}], water {}, fertilizer {}",
            farm_idx,
            seed,
            crops.join(", "),
            base.water,
            base.fertilizer
        );

        // Blind search is uniform-cost search, so its plan length is the reference.
        let mut reference: Option<usize> = None;
        for heuristic in Heuristic::ALL.iter().rev() {
            let config = base.clone().with_search(SearchSettings {
                max_expansions: args.max_expansions,
                heuristic: *heuristic,
            });
            let tally = tallies.entry(heuristic.name()).or_default();

            match solve(&config) {
                Ok(solution) => {
                    let length = solution.actions.len();
                    if *heuristic == Heuristic::Blind {
                        reference = Some(length);
                    } else if reference.is_some_and(|best| length > best) {
                        tally.longer_than_blind += 1;
                    }
                    tally.solved += 1;
                    tally.expansions.push(solution.expanded);
                    println!(
                        "  Heuristic: {:<15}, Plan: {:<4}, Expanded: {}",
                        heuristic.name(),
                        length,
                        solution.expanded
                    );
                }
                Err(SolveError::NoSolution { expanded }) => {
                    tally.unsolvable += 1;
                    println!(
                        "  Heuristic: {:<15}, no plan exists (expanded {})",
                        heuristic.name(),
                        expanded
                    );
                }
                Err(SolveError::BudgetExceeded { expanded, .. }) => {
                    tally.over_budget += 1;
                    println!(
                        "  Heuristic: {:<15}, budget exceeded (expanded {})",
                        heuristic.name(),
                        expanded
                    );
                }
                Err(err) => {
                    eprintln!("Error: farm {} (Seed: {}) was rejected: {}", farm_idx, seed, err);
                    break;
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of farms evaluated: {}", args.farms);
    println!("\n--- Summary ---");

    for heuristic in Heuristic::ALL {
        let Some(tally) = tallies.get(heuristic.name()) else {
            continue;
        };
        let average = if tally.expansions.is_empty() {
            0.0
        } else {
            tally.expansions.iter().sum::<usize>() as f64 / tally.expansions.len() as f64
        };
        println!(
            "Heuristic {:<15}: solved {}, unsolvable {}, over budget {}, avg expanded {:.1}, longer than blind {}",
            heuristic.name(),
            tally.solved,
            tally.unsolvable,
            tally.over_budget,
            average,
            tally.longer_than_blind
        );
    }
}
