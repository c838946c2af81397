//! # Farm Planner Library
//!
//! This library computes optimal action plans for a farm of independent crop fields that
//! share limited water and fertilizer. A plan is the shortest sequence of irrigations,
//! fertilizations, day advances and harvests that brings every field to harvest.
//!
//! It is used by three binaries:
//! - `farm_planner`: Loads a TOML configuration, runs the A* search and prints the plan.
//! - `manual_planner`: Lets a person step through the legal actions of a farm, with undo
//!   and an option to let the solver finish from the current state.
//! - `heuristic_evaluator`: Solves seeded random farms with every heuristic and compares
//!   expansions and plan lengths.
//!
//! ## Modules
//! - `config`: Crop kinds and costs (`CropTable`), the `Configuration` file format,
//!   validation and `SearchSettings`.
//! - `engine`: The state model (`FarmState`, `Field`, `Resources`), actions, the canonical
//!   `StateKey` and the transition function.
//! - `heuristics`: Remaining-cost estimators used to order the search frontier.
//! - `solver`: The A* search, `solve` entry point and its typed failures.
//! - `utils`: Plan presentation helpers.

pub mod config;
pub mod engine;
pub mod heuristics;
pub mod solver;
pub mod utils;

pub use solver::{solve, Plan, Solution, SolveError};
