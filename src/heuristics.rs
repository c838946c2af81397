use crate::engine::{FarmState, Field};
use serde::{Deserialize, Serialize};

/// Remaining-cost estimators the search can be ordered by.
///
/// All of them are total functions of a valid state and return 0 for a goal state.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Heuristic {
    /// Per-field input and harvest actions plus the day advances the slowest field needs.
    /// Advances are shared by all fields, so this never overestimates.
    #[default]
    SharedAdvance,
    /// Three actions per remaining stage plus one harvest, summed over fields.
    PerField,
    /// Always 0. Turns A* into a uniform-cost search.
    Blind,
}

impl Heuristic {
    /// Every strategy, in the order the evaluator reports them.
    pub const ALL: [Heuristic; 3] = [
        Heuristic::SharedAdvance,
        Heuristic::PerField,
        Heuristic::Blind,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::SharedAdvance => "shared-advance",
            Heuristic::PerField => "per-field",
            Heuristic::Blind => "blind",
        }
    }

    /// Estimates the number of actions still needed to harvest every field of `state`.
    pub fn estimate(&self, state: &FarmState) -> u32 {
        match self {
            Heuristic::SharedAdvance => shared_advance_estimate(state),
            Heuristic::PerField => per_field_estimate(state),
            Heuristic::Blind => 0,
        }
    }
}

/// Sums `remaining_stages * 3 + 1` over all fields that are not yet harvested.
///
/// Each remaining stage nominally takes an irrigation, a fertilization and a day advance;
/// the final `+ 1` is the harvest. Because one day advance can grow several fields at
/// once, this overcounts on farms with more than one growing field.
///
/// # Arguments
/// * `state`: The farm to evaluate.
///
/// # Returns
/// The estimate as a `u32`; harvested fields contribute 0.
///
/// # Examples
/// ```
/// use farm_planner::config::CropKind;
/// use farm_planner::engine::{FarmState, Field};
/// use farm_planner::heuristics::per_field_estimate;
///
/// let state = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 3, 3);
/// assert_eq!(per_field_estimate(&state), 10);
/// ```
pub fn per_field_estimate(state: &FarmState) -> u32 {
    state
        .fields()
        .iter()
        .filter(|field| !field.is_harvested())
        .map(|field| field.stage.stages_until_harvestable() * 3 + 1)
        .sum()
}

/// Lower bound on remaining actions that accounts for shared day advances.
///
/// Field-scoped actions cannot serve two fields, so each field needs its own
/// irrigations, fertilizations and harvest: `2 * remaining - watered - fertilized + 1`.
/// A day advance moves every ready field at once, so the farm needs at least as many
/// advances as its slowest field has stages left.
///
/// For a single fresh field this equals `per_field_estimate`.
///
/// # Examples
/// ```
/// use farm_planner::config::CropKind;
/// use farm_planner::engine::{FarmState, Field};
/// use farm_planner::heuristics::shared_advance_estimate;
///
/// let one = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 3, 3);
/// assert_eq!(shared_advance_estimate(&one), 10);
///
/// let two = FarmState::new(vec![Field::new(1, CropKind::Wheat), Field::new(2, CropKind::Corn)], 9, 9);
/// assert_eq!(shared_advance_estimate(&two), 17);
/// ```
pub fn shared_advance_estimate(state: &FarmState) -> u32 {
    let mut field_actions = 0;
    let mut advances = 0;

    for field in state.fields().iter().filter(|field| !field.is_harvested()) {
        let remaining = field.stage.stages_until_harvestable();
        field_actions += remaining_inputs(field, remaining) + 1;
        advances = advances.max(remaining);
    }

    field_actions + advances
}

fn remaining_inputs(field: &Field, remaining: u32) -> u32 {
    if remaining == 0 {
        return 0;
    }
    2 * remaining - u32::from(field.watered) - u32::from(field.fertilized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CropCosts, CropKind, CropTable};
    use crate::engine::{Action, GrowthStage};

    fn two_fields() -> FarmState {
        FarmState::new(
            vec![Field::new(1, CropKind::Wheat), Field::new(2, CropKind::Soy)],
            20,
            20,
        )
    }

    #[test]
    fn test_per_field_estimate() {
        let state = two_fields();
        assert_eq!(per_field_estimate(&state), 20);

        let table = CropTable::uniform(CropCosts::new(1, 1));
        // Flags do not change the per-field estimate.
        let watered = state.apply(&Action::irrigate(1, 0), &table);
        assert_eq!(per_field_estimate(&watered), 20);
    }

    #[test]
    fn test_shared_advance_estimate_credits_flags() {
        let table = CropTable::uniform(CropCosts::new(1, 1));
        let state = two_fields();
        assert_eq!(shared_advance_estimate(&state), 7 + 7 + 3);

        let watered = state.apply(&Action::irrigate(1, 0), &table);
        assert_eq!(shared_advance_estimate(&watered), 16);
        let ready = watered.apply(&Action::fertilize(1, 0), &table);
        assert_eq!(shared_advance_estimate(&ready), 15);
    }

    #[test]
    fn test_estimates_for_late_stages() {
        let table = CropTable::uniform(CropCosts::new(1, 1));
        let mut state = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 3, 3);
        for _ in 0..3 {
            state = state
                .apply(&Action::irrigate(1, state.day()), &table)
                .apply(&Action::fertilize(1, state.day()), &table)
                .apply(&Action::advance_day(state.day()), &table);
        }
        assert_eq!(state.field(1).unwrap().stage, GrowthStage::Harvestable);
        for heuristic in [Heuristic::SharedAdvance, Heuristic::PerField] {
            assert_eq!(heuristic.estimate(&state), 1, "{}", heuristic.name());
        }

        let done = state.apply(&Action::harvest(1, 3), &table);
        for heuristic in Heuristic::ALL {
            assert_eq!(heuristic.estimate(&done), 0, "{}", heuristic.name());
        }
    }

    #[test]
    fn test_blind_is_zero() {
        assert_eq!(Heuristic::Blind.estimate(&two_fields()), 0);
    }

    #[test]
    fn test_shared_advance_never_exceeds_per_field() {
        let table = CropTable::uniform(CropCosts::new(1, 1));
        let mut state = two_fields();
        // Walk a few steps down the first legal action each time.
        for _ in 0..12 {
            assert!(shared_advance_estimate(&state) <= per_field_estimate(&state));
            let Some(action) = state.applicable_actions(&table).first().copied() else {
                break;
            };
            state = state.apply(&action, &table);
        }
    }

    #[test]
    fn test_default_heuristic() {
        assert_eq!(Heuristic::default(), Heuristic::SharedAdvance);
    }
}
