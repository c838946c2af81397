use anyhow::Context;
use clap::Parser;
use farm_planner::config::Configuration;
use farm_planner::engine::{Action, FarmState};
use farm_planner::heuristics::Heuristic;
use farm_planner::utils::{render_plan, render_schedule};
use farm_planner::{solve, SolveError};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the farm configuration (TOML)
    config: PathBuf,

    /// Maximum number of states to expand before giving up
    #[clap(short = 'n', long)]
    max_expansions: Option<usize>,

    /// Heuristic used to order the search
    #[clap(long, value_enum)]
    heuristic: Option<Heuristic>,

    /// Print the plan as JSON instead of text
    #[clap(long)]
    json: bool,

    /// Also print a per-field timeline
    #[clap(long)]
    by_field: bool,
}

#[derive(Serialize)]
struct PlanReport<'a> {
    actions: &'a [Action],
    cost: u32,
    expanded: usize,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Configuration::from_file(&args.config).with_context(|| {
        format!("Failed to read configuration from {}", args.config.display())
    })?;
    if let Some(max_expansions) = args.max_expansions {
        config.search.max_expansions = max_expansions;
    }
    if let Some(heuristic) = args.heuristic {
        config.search.heuristic = heuristic;
    }

    let initial = FarmState::from_config(&config);
    if !args.json {
        println!("Loaded farm from {}\n", args.config.display());
        println!("Initial state:\n{}\n", initial);
        println!(
            "Searching with heuristic '{}' (budget {} expansions)...\n",
            config.search.heuristic.name(),
            config.search.max_expansions
        );
    }

    match solve(&config) {
        Ok(solution) => {
            if args.json {
                let report = PlanReport {
                    actions: &solution.actions,
                    cost: solution.cost,
                    expanded: solution.expanded,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Plan found ({} actions, {} states expanded):\n",
                    solution.cost, solution.expanded
                );
                println!("{}\n", render_plan(&solution.actions));
                if args.by_field {
                    println!("{}\n", render_schedule(&initial, &solution.actions));
                }
                println!("Final state:\n{}", solution.final_state);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("No plan: {}", err);
            match err {
                SolveError::BudgetExceeded { .. } => {
                    eprintln!("Try a larger --max-expansions, or reduce the number of fields.")
                }
                SolveError::NoSolution { .. } => {
                    eprintln!("Try increasing resources or reducing the number of fields.")
                }
                SolveError::InvalidConfig(_) => {}
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
