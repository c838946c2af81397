use anyhow::Context;
use clap::Parser;
use farm_planner::config::Configuration;
use farm_planner::engine::{Action, FarmState};
use farm_planner::solver::solve_from_state;
use farm_planner::utils::render_plan;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Step through a farm plan by hand", long_about = None)]
struct Args {
    /// Path to the farm configuration (TOML)
    config: PathBuf,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Undo,
    Solve,
    Choose(usize),
    Invalid,
}

impl Command {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "q" => Command::Quit,
            "u" => Command::Undo,
            "s" => Command::Solve,
            other => other.parse().map_or(Command::Invalid, Command::Choose),
        }
    }
}

/// Reads the next command, or `None` once the input is exhausted.
fn read_command(input: &mut impl BufRead) -> io::Result<Option<Command>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(Command::parse(&line)))
}

fn run(
    config: &Configuration,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let crops = config.crop_table()?;

    let mut state = FarmState::from_config(config);
    let mut history: Vec<(FarmState, Action)> = Vec::new();
    writeln!(out, "Welcome to the farm planner!")?;

    loop {
        writeln!(out, "---------------------")?;
        writeln!(out, "Actions taken: {}", history.len())?;
        writeln!(out, "{}", state)?;

        if state.is_goal() {
            writeln!(out)?;
            writeln!(out, "---------------------")?;
            writeln!(out, "🌾 ALL FIELDS HARVESTED! 🌾")?;
            let plan: Vec<Action> = history.iter().map(|(_, action)| *action).collect();
            writeln!(out, "{}", render_plan(&plan))?;
            writeln!(out, "---------------------")?;
            break;
        }

        let actions = state.applicable_actions(&crops);
        if actions.is_empty() {
            writeln!(
                out,
                "No action is possible: the farm is stuck. Undo with 'u' or quit with 'q'."
            )?;
        } else {
            for (i, action) in actions.iter().enumerate() {
                writeln!(out, "  [{}] {}", i + 1, action)?;
            }
        }

        write!(
            out,
            "Choose an action number, 'u' to undo, 's' to solve from here, 'q' to quit: "
        )?;
        out.flush()?;

        let Some(command) = read_command(input).context("Failed to read input")? else {
            writeln!(out)?;
            writeln!(out, "End of input. Goodbye!")?;
            break;
        };

        match command {
            Command::Quit => {
                writeln!(out, "Goodbye!")?;
                break;
            }
            Command::Undo => match history.pop() {
                Some((previous, action)) => {
                    writeln!(out, "Undid '{}'.", action)?;
                    state = previous;
                }
                None => writeln!(out, "Nothing to undo.")?,
            },
            Command::Solve => match solve_from_state(&state, &crops, &config.search) {
                Ok(solution) => {
                    writeln!(out, "Remaining plan ({} actions):", solution.cost)?;
                    writeln!(out, "{}", render_plan(&solution.actions))?;
                }
                Err(err) => writeln!(out, "No plan from here: {}", err)?,
            },
            Command::Choose(choice) if choice >= 1 && choice <= actions.len() => {
                let action = actions[choice - 1];
                let next = state.try_apply(&action, &crops)?;
                history.push((std::mem::replace(&mut state, next), action));
            }
            Command::Choose(_) => writeln!(
                out,
                "Invalid choice: pick a number between 1 and {}.",
                actions.len()
            )?,
            Command::Invalid => {
                writeln!(out, "Invalid input. Use an action number, 'u', 's' or 'q'.")?
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let config = Configuration::from_file(&args.config).with_context(|| {
        format!("Failed to read configuration from {}", args.config.display())
    })?;

    run(&config, &mut io::stdin().lock(), &mut io::stdout().lock())
}
