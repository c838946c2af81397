use crate::config::{ConfigError, Configuration, CropTable, SearchSettings};
use crate::engine::{Action, FarmState, StateKey};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Ordered sequence of actions leading from the initial farm to a fully harvested one.
pub type Plan = Vec<Action>;

/// Represents a plan found by the solver.
#[derive(Clone, Debug)]
pub struct Solution {
    /// The optimal action sequence.
    pub actions: Plan,
    /// Number of actions in the plan; every action costs 1.
    pub cost: u32,
    /// Number of states the search expanded before reaching the goal.
    pub expanded: usize,
    /// The fully harvested farm the plan ends in.
    pub final_state: FarmState,
}

/// Why `solve` did not return a plan.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// Every reachable state was explored and none is a goal.
    #[error("no plan exists: every reachable state was explored ({expanded} states expanded)")]
    NoSolution { expanded: usize },
    /// The expansion budget ran out before a goal was found.
    #[error("search budget of {budget} expansions exceeded ({expanded} states expanded)")]
    BudgetExceeded { expanded: usize, budget: usize },
}

impl SolveError {
    /// True when the search itself ran and failed, whether the state space was exhausted
    /// or the budget ran out. Match on the variant to tell the two apart.
    pub fn is_search_failure(&self) -> bool {
        matches!(
            self,
            SolveError::NoSolution { .. } | SolveError::BudgetExceeded { .. }
        )
    }
}

/// A discovered state. Nodes live in an arena and point at their parent, so a plan is
/// only materialized once, for the goal.
struct Node {
    state: FarmState,
    key: StateKey,
    parent: Option<usize>,
    action: Option<Action>,
    cost: u32,
}

/// Frontier entry ordered by priority, then by discovery order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    priority: u32,
    sequence: u64,
    node: usize,
}

/// Validates `config` and searches for a minimum-length plan.
///
/// # Returns
/// * `Ok(Solution)` holding an optimal plan.
/// * `Err(SolveError::InvalidConfig)` if the configuration is rejected; no search is run.
/// * `Err(SolveError::NoSolution)` if no reachable state harvests every field.
/// * `Err(SolveError::BudgetExceeded)` if `config.search.max_expansions` ran out first.
///
/// # Examples
/// ```
/// use farm_planner::config::{Configuration, CropCosts, CropKind, FieldSpec};
/// use farm_planner::solver::solve;
///
/// let config = Configuration::new(vec![FieldSpec::new(1, CropKind::Wheat)], 3, 3)
///     .with_crop_override(CropKind::Wheat, CropCosts::new(1, 1));
/// let solution = solve(&config).unwrap();
/// assert_eq!(solution.actions.len(), 10);
/// ```
pub fn solve(config: &Configuration) -> Result<Solution, SolveError> {
    config.validate()?;
    let crops = config.crop_table()?;
    let initial = FarmState::from_config(config);
    solve_from_state(&initial, &crops, &config.search)
}

/// Runs A* from an arbitrary state.
///
/// The frontier is a min-heap on `cost + estimate`, ties going to the state discovered
/// first. Each state key remembers the cheapest cost it was reached with; a successor is
/// queued when its key is new or when it improves on that cost, and outdated queue
/// entries are skipped when popped. The search is deterministic for a given input.
pub fn solve_from_state(
    initial: &FarmState,
    crops: &CropTable,
    settings: &SearchSettings,
) -> Result<Solution, SolveError> {
    let heuristic = settings.heuristic;
    let budget = settings.max_expansions;
    debug!(
        fields = initial.fields().len(),
        water = initial.resources().water,
        fertilizer = initial.resources().fertilizer,
        heuristic = heuristic.name(),
        budget,
        "starting search"
    );

    let mut nodes = vec![Node {
        state: initial.clone(),
        key: initial.key(),
        parent: None,
        action: None,
        cost: 0,
    }];
    let mut best_cost: HashMap<StateKey, u32> = HashMap::new();
    best_cost.insert(nodes[0].key.clone(), 0);

    let mut frontier = BinaryHeap::new();
    let mut sequence: u64 = 0;
    frontier.push(Reverse(FrontierEntry {
        priority: heuristic.estimate(initial),
        sequence,
        node: 0,
    }));

    let mut expanded = 0;

    while let Some(Reverse(entry)) = frontier.pop() {
        let current = &nodes[entry.node];
        if best_cost
            .get(&current.key)
            .is_some_and(|&best| best < current.cost)
        {
            continue;
        }

        if expanded >= budget {
            warn!(expanded, budget, "search budget exceeded");
            return Err(SolveError::BudgetExceeded { expanded, budget });
        }
        expanded += 1;

        if current.state.is_goal() {
            let actions = reconstruct_plan(&nodes, entry.node);
            info!(actions = actions.len(), expanded, "plan found");
            return Ok(Solution {
                cost: current.cost,
                final_state: current.state.clone(),
                actions,
                expanded,
            });
        }

        if expanded % 1000 == 0 {
            debug!(
                expanded,
                frontier = frontier.len(),
                known = best_cost.len(),
                "search progress"
            );
        }

        let parent = entry.node;
        let cost = current.cost + 1;
        for (action, state) in current.state.successors(crops) {
            let key = state.key();
            if best_cost.get(&key).is_some_and(|&best| best <= cost) {
                continue;
            }
            best_cost.insert(key.clone(), cost);

            sequence += 1;
            let priority = cost + heuristic.estimate(&state);
            nodes.push(Node {
                state,
                key,
                parent: Some(parent),
                action: Some(action),
                cost,
            });
            frontier.push(Reverse(FrontierEntry {
                priority,
                sequence,
                node: nodes.len() - 1,
            }));
        }
    }

    info!(expanded, "frontier exhausted without reaching a harvested farm");
    Err(SolveError::NoSolution { expanded })
}

fn reconstruct_plan(nodes: &[Node], goal: usize) -> Plan {
    let mut actions = Vec::new();
    let mut cursor = Some(goal);
    while let Some(idx) = cursor {
        let node = &nodes[idx];
        if let Some(action) = node.action {
            actions.push(action);
        }
        cursor = node.parent;
    }
    actions.reverse();
    actions
}
