//! State model and transition function of the farm planner.
//!
//! This module defines the world the search explores:
//! - `GrowthStage`: the ordered stages a crop passes through, from `Seed` to `Harvested`.
//! - `Field`: one independently scheduled field, with its stage and input flags.
//! - `Resources`: the shared water and fertilizer pools plus the day counter.
//! - `Action`: the unit-scoped and global actions the planner can issue.
//! - `FarmState`: a full snapshot of the farm, with its canonical `StateKey`, goal test,
//!   successor generation and application of actions.
use crate::config::{Configuration, CropKind, CropTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Ordered growth stages of a crop.
///
/// `Harvestable` is the "ready" stage, `Harvested` the terminal one. Stages are totally
/// ordered, so `stage < GrowthStage::Harvestable` reads as "still growing".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthStage {
    Seed,
    Sprout,
    Mature,
    Harvestable,
    Harvested,
}

impl GrowthStage {
    /// Ordinal of the stage, `Seed` being 0.
    pub fn index(&self) -> u32 {
        *self as u32
    }

    /// Number of growth transitions still needed to reach `Harvestable`.
    ///
    /// # Examples
    /// ```
    /// use farm_planner::engine::GrowthStage;
    /// assert_eq!(GrowthStage::Seed.stages_until_harvestable(), 3);
    /// assert_eq!(GrowthStage::Harvestable.stages_until_harvestable(), 0);
    /// assert_eq!(GrowthStage::Harvested.stages_until_harvestable(), 0);
    /// ```
    pub fn stages_until_harvestable(&self) -> u32 {
        GrowthStage::Harvestable.index().saturating_sub(self.index())
    }

    /// The stage after one growth transition. `Harvestable` and `Harvested` do not grow.
    pub fn grown(&self) -> GrowthStage {
        match self {
            GrowthStage::Seed => GrowthStage::Sprout,
            GrowthStage::Sprout => GrowthStage::Mature,
            GrowthStage::Mature => GrowthStage::Harvestable,
            GrowthStage::Harvestable => GrowthStage::Harvestable,
            GrowthStage::Harvested => GrowthStage::Harvested,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GrowthStage::Seed => "seed",
            GrowthStage::Sprout => "sprout",
            GrowthStage::Mature => "mature",
            GrowthStage::Harvestable => "harvestable",
            GrowthStage::Harvested => "harvested",
        }
    }
}

/// One field of the farm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    pub id: u32,
    pub crop: CropKind,
    pub stage: GrowthStage,
    /// Water has been applied during the current stage.
    pub watered: bool,
    /// Fertilizer has been applied during the current stage.
    pub fertilized: bool,
}

impl Field {
    /// A freshly seeded field with no inputs applied.
    pub fn new(id: u32, crop: CropKind) -> Self {
        Field {
            id,
            crop,
            stage: GrowthStage::Seed,
            watered: false,
            fertilized: false,
        }
    }

    pub fn is_harvested(&self) -> bool {
        self.stage == GrowthStage::Harvested
    }

    /// True when advancing the day would move this field to its next stage.
    pub fn is_ready_to_grow(&self) -> bool {
        self.stage < GrowthStage::Harvestable && self.watered && self.fertilized
    }
}

/// Shared pools and elapsed time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Resources {
    pub water: u32,
    pub fertilizer: u32,
    pub day: u32,
}

/// The kinds of action the planner can issue.
///
/// There is no separate growth action: fields only advance a stage through `AdvanceDay`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Irrigate,
    Fertilize,
    Harvest,
    AdvanceDay,
}

/// One step of a plan.
///
/// `field` is `None` only for `AdvanceDay`, which is not scoped to a field. `day` records
/// when the action was issued; it is informational and takes no part in equality.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub field: Option<u32>,
    pub day: u32,
}

impl Action {
    pub fn irrigate(field: u32, day: u32) -> Self {
        Action {
            kind: ActionKind::Irrigate,
            field: Some(field),
            day,
        }
    }

    pub fn fertilize(field: u32, day: u32) -> Self {
        Action {
            kind: ActionKind::Fertilize,
            field: Some(field),
            day,
        }
    }

    pub fn harvest(field: u32, day: u32) -> Self {
        Action {
            kind: ActionKind::Harvest,
            field: Some(field),
            day,
        }
    }

    pub fn advance_day(day: u32) -> Self {
        Action {
            kind: ActionKind::AdvanceDay,
            field: None,
            day,
        }
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.field == other.field
    }
}

impl Eq for Action {}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.field) {
            (ActionKind::Irrigate, Some(id)) => write!(f, "Irrigate Field {}", id),
            (ActionKind::Fertilize, Some(id)) => write!(f, "Fertilize Field {}", id),
            (ActionKind::Harvest, Some(id)) => write!(f, "Harvest Field {}", id),
            (ActionKind::AdvanceDay, _) => write!(f, "End of Day {}. Crops grow.", self.day),
            (kind, None) => write!(f, "{:?} (no field)", kind),
        }
    }
}

/// Errors raised when an externally supplied action does not fit a state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("No field with id {0}")]
    UnknownField(u32),
    #[error("Action '{action}' is not applicable on day {day}")]
    NotApplicable { action: Action, day: u32 },
}

/// Canonical identity of a `FarmState` for duplicate detection.
///
/// Two states have equal keys iff every field's stage and input flags, both pools and the
/// day are equal. Fields are listed in id order. Its `Display` form is
/// `id-stage-watered-fertilized,...|w:<water>|f:<fertilizer>|t:<day>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateKey {
    fields: Vec<(u32, GrowthStage, bool, bool)>,
    water: u32,
    fertilizer: u32,
    day: u32,
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (id, stage, watered, fertilized)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}-{}-{}-{}", id, stage.index(), watered, fertilized)?;
        }
        write!(
            f,
            "|w:{}|f:{}|t:{}",
            self.water, self.fertilizer, self.day
        )
    }
}

/// A snapshot of the whole farm: every field plus the shared resources.
///
/// States are values: `apply` returns a new state and leaves `self` untouched. Fields are
/// kept sorted by id, which makes `key()` independent of the order the caller listed them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FarmState {
    fields: Vec<Field>,
    resources: Resources,
}

impl FarmState {
    /// Creates a state from explicit fields and pools. The day starts at 0.
    pub fn new(mut fields: Vec<Field>, water: u32, fertilizer: u32) -> Self {
        fields.sort_by_key(|field| field.id);
        FarmState {
            fields,
            resources: Resources {
                water,
                fertilizer,
                day: 0,
            },
        }
    }

    /// The initial state described by a configuration: every field a fresh seed, day 0.
    pub fn from_config(config: &Configuration) -> Self {
        let fields = config
            .fields
            .iter()
            .map(|spec| Field::new(spec.id, spec.crop))
            .collect();
        FarmState::new(fields, config.water, config.fertilizer)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn day(&self) -> u32 {
        self.resources.day
    }

    /// Looks a field up by id.
    pub fn field(&self, id: u32) -> Option<&Field> {
        self.position(id).map(|idx| &self.fields[idx])
    }

    fn position(&self, id: u32) -> Option<usize> {
        self.fields.binary_search_by_key(&id, |field| field.id).ok()
    }

    /// Returns the canonical key of this state.
    pub fn key(&self) -> StateKey {
        StateKey {
            fields: self
                .fields
                .iter()
                .map(|f| (f.id, f.stage, f.watered, f.fertilized))
                .collect(),
            water: self.resources.water,
            fertilizer: self.resources.fertilizer,
            day: self.resources.day,
        }
    }

    /// True iff every field has been harvested.
    pub fn is_goal(&self) -> bool {
        self.fields.iter().all(Field::is_harvested)
    }

    /// Lists every legal action from this state, in field-id order.
    ///
    /// Per non-harvested field:
    /// 1. A `Harvestable` field offers only `Harvest`.
    /// 2. Otherwise `Irrigate` is offered if the field is not yet watered and the water pool
    ///    covers its crop's cost; `Fertilize` likewise for fertilizer. Both may be offered.
    ///
    /// When no field offers anything and the goal is not reached, a single `AdvanceDay` is
    /// offered, provided at least one field would grow from it. If none would, the day could
    /// only tick forward over an unchanged farm, so the state is a dead end and the result is
    /// empty.
    pub fn applicable_actions(&self, crops: &CropTable) -> Vec<Action> {
        let day = self.resources.day;
        let mut actions = Vec::new();

        for field in &self.fields {
            if field.is_harvested() {
                continue;
            }

            if field.stage == GrowthStage::Harvestable {
                actions.push(Action::harvest(field.id, day));
                continue;
            }

            let costs = crops.costs(field.crop);
            if !field.watered && self.resources.water >= costs.water {
                actions.push(Action::irrigate(field.id, day));
            }
            if !field.fertilized && self.resources.fertilizer >= costs.fertilizer {
                actions.push(Action::fertilize(field.id, day));
            }
        }

        if actions.is_empty()
            && !self.is_goal()
            && self.fields.iter().any(Field::is_ready_to_grow)
        {
            actions.push(Action::advance_day(day));
        }

        actions
    }

    /// Applies an action produced by `applicable_actions` and returns the successor state.
    ///
    /// Effects:
    /// - `Irrigate`: the field is watered, the water pool pays the crop's cost.
    /// - `Fertilize`: the field is fertilized, the fertilizer pool pays the crop's cost.
    /// - `Harvest`: the field becomes `Harvested`.
    /// - `AdvanceDay`: the day increments; every field that is still growing and has both
    ///   inputs moves to its next stage with both flags cleared.
    ///
    /// A unit action naming a field that does not exist changes nothing. Use `try_apply`
    /// for actions that did not come from `applicable_actions`.
    pub fn apply(&self, action: &Action, crops: &CropTable) -> FarmState {
        let mut next = self.clone();
        let target = action.field.and_then(|id| next.position(id));

        match (action.kind, target) {
            (ActionKind::AdvanceDay, _) => {
                next.resources.day += 1;
                for field in next.fields.iter_mut().filter(|f| f.is_ready_to_grow()) {
                    field.stage = field.stage.grown();
                    field.watered = false;
                    field.fertilized = false;
                }
            }
            (ActionKind::Irrigate, Some(idx)) => {
                let cost = crops.costs(next.fields[idx].crop).water;
                next.fields[idx].watered = true;
                next.resources.water = next.resources.water.saturating_sub(cost);
            }
            (ActionKind::Fertilize, Some(idx)) => {
                let cost = crops.costs(next.fields[idx].crop).fertilizer;
                next.fields[idx].fertilized = true;
                next.resources.fertilizer = next.resources.fertilizer.saturating_sub(cost);
            }
            (ActionKind::Harvest, Some(idx)) => {
                let field = &mut next.fields[idx];
                field.stage = GrowthStage::Harvested;
                field.watered = false;
                field.fertilized = false;
            }
            (_, None) => {}
        }

        next
    }

    /// Applies `action` after checking that it is legal in this state.
    ///
    /// # Returns
    /// * `Ok(FarmState)` with the successor.
    /// * `Err(TransitionError::UnknownField)` if the action targets a field that does not exist.
    /// * `Err(TransitionError::NotApplicable)` if the action is not among `applicable_actions`.
    pub fn try_apply(
        &self,
        action: &Action,
        crops: &CropTable,
    ) -> Result<FarmState, TransitionError> {
        if let Some(id) = action.field {
            if self.position(id).is_none() {
                return Err(TransitionError::UnknownField(id));
            }
        }

        if !self.applicable_actions(crops).contains(action) {
            return Err(TransitionError::NotApplicable {
                action: *action,
                day: self.resources.day,
            });
        }

        Ok(self.apply(action, crops))
    }

    /// Every legal action paired with the state it leads to.
    pub fn successors(&self, crops: &CropTable) -> Vec<(Action, FarmState)> {
        self.applicable_actions(crops)
            .into_iter()
            .map(|action| {
                let next = self.apply(&action, crops);
                (action, next)
            })
            .collect()
    }
}

impl fmt::Display for FarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Day {} | water {} | fertilizer {}",
            self.resources.day, self.resources.water, self.resources.fertilizer
        )?;
        for (i, field) in self.fields.iter().enumerate() {
            write!(
                f,
                "  Field {:<3} {:<7} {:<12} watered: {:<3} fertilized: {}",
                field.id,
                field.crop.name(),
                field.stage.name(),
                if field.watered { "yes" } else { "no" },
                if field.fertilized { "yes" } else { "no" },
            )?;
            if i + 1 < self.fields.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Re-executes `plan` from `initial`, checking each step.
///
/// # Returns
/// * `Ok(FarmState)`: the state after the last action.
/// * `Err(TransitionError)`: the first action that is not legal where it occurs.
pub fn replay(
    initial: &FarmState,
    plan: &[Action],
    crops: &CropTable,
) -> Result<FarmState, TransitionError> {
    plan.iter()
        .try_fold(initial.clone(), |state, action| state.try_apply(action, crops))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CropCosts, FieldSpec};

    fn cheap_table() -> CropTable {
        CropTable::uniform(CropCosts::new(1, 1))
    }

    fn kinds(actions: &[Action]) -> Vec<(ActionKind, Option<u32>)> {
        actions.iter().map(|a| (a.kind, a.field)).collect()
    }

    #[test]
    fn test_from_config_sorts_fields_and_starts_at_day_zero() {
        let config = Configuration::new(
            vec![
                FieldSpec::new(3, CropKind::Corn),
                FieldSpec::new(1, CropKind::Wheat),
            ],
            7,
            5,
        );
        let state = FarmState::from_config(&config);
        let ids: Vec<u32> = state.fields().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(state.day(), 0);
        assert_eq!(state.resources().water, 7);
        assert_eq!(state.resources().fertilizer, 5);
        assert!(state
            .fields()
            .iter()
            .all(|f| f.stage == GrowthStage::Seed && !f.watered && !f.fertilized));
    }

    #[test]
    fn test_key_is_order_independent() {
        let a = FarmState::new(
            vec![Field::new(1, CropKind::Wheat), Field::new(2, CropKind::Soy)],
            4,
            4,
        );
        let b = FarmState::new(
            vec![Field::new(2, CropKind::Soy), Field::new(1, CropKind::Wheat)],
            4,
            4,
        );
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().to_string(), "1-0-false-false,2-0-false-false|w:4|f:4|t:0");
    }

    #[test]
    fn test_key_distinguishes_flags_pools_and_day() {
        let table = cheap_table();
        let start = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 3, 3);
        let irrigated = start.apply(&Action::irrigate(1, 0), &table);
        assert_ne!(start.key(), irrigated.key());

        let mut other_pool = start.clone();
        other_pool.resources.water = 2;
        assert_ne!(start.key(), other_pool.key());

        let mut later = start.clone();
        later.resources.day = 1;
        assert_ne!(start.key(), later.key());
    }

    #[test]
    fn test_same_world_reached_by_different_paths_has_same_key() {
        let table = cheap_table();
        let start = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 3, 3);
        let a = start
            .apply(&Action::irrigate(1, 0), &table)
            .apply(&Action::fertilize(1, 0), &table);
        let b = start
            .apply(&Action::fertilize(1, 0), &table)
            .apply(&Action::irrigate(1, 0), &table);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_goal_test() {
        let mut state = FarmState::new(
            vec![Field::new(1, CropKind::Wheat), Field::new(2, CropKind::Corn)],
            0,
            0,
        );
        assert!(!state.is_goal());
        state.fields[0].stage = GrowthStage::Harvested;
        assert!(!state.is_goal());
        state.fields[1].stage = GrowthStage::Harvested;
        assert!(state.is_goal());
        assert!(state.applicable_actions(&cheap_table()).is_empty());
    }

    #[test]
    fn test_fresh_field_offers_both_inputs() {
        let state = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 2, 1);
        let actions = state.applicable_actions(&CropTable::default());
        assert_eq!(
            kinds(&actions),
            vec![
                (ActionKind::Irrigate, Some(1)),
                (ActionKind::Fertilize, Some(1))
            ]
        );
    }

    #[test]
    fn test_insufficient_pool_blocks_input() {
        // Corn needs 3 water, 2 fertilizer.
        let state = FarmState::new(vec![Field::new(1, CropKind::Corn)], 2, 2);
        let actions = state.applicable_actions(&CropTable::default());
        assert_eq!(kinds(&actions), vec![(ActionKind::Fertilize, Some(1))]);
    }

    #[test]
    fn test_harvestable_field_only_offers_harvest() {
        let mut state = FarmState::new(
            vec![Field::new(1, CropKind::Wheat), Field::new(2, CropKind::Wheat)],
            10,
            10,
        );
        state.fields[0].stage = GrowthStage::Harvestable;
        let actions = state.applicable_actions(&CropTable::default());
        assert_eq!(
            kinds(&actions),
            vec![
                (ActionKind::Harvest, Some(1)),
                (ActionKind::Irrigate, Some(2)),
                (ActionKind::Fertilize, Some(2))
            ]
        );
    }

    #[test]
    fn test_advance_day_only_when_nothing_else_is_possible() {
        let table = cheap_table();
        let start = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 3, 3);
        let watered = start.apply(&Action::irrigate(1, 0), &table);
        assert!(watered
            .applicable_actions(&table)
            .iter()
            .all(|a| a.kind != ActionKind::AdvanceDay));

        let ready = watered.apply(&Action::fertilize(1, 0), &table);
        let actions = ready.applicable_actions(&table);
        assert_eq!(kinds(&actions), vec![(ActionKind::AdvanceDay, None)]);
        assert_eq!(actions[0].day, 0);
    }

    #[test]
    fn test_stalled_farm_has_no_actions() {
        let state = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 0, 0);
        assert!(state.applicable_actions(&CropTable::default()).is_empty());

        // Watered but no fertilizer left: advancing the day would change nothing.
        let mut half = state.clone();
        half.fields[0].watered = true;
        assert!(half.applicable_actions(&CropTable::default()).is_empty());
    }

    #[test]
    fn test_apply_consumes_pools_and_sets_flags() {
        let table = CropTable::default();
        let start = FarmState::new(vec![Field::new(1, CropKind::Tomato)], 10, 10);
        let next = start.apply(&Action::irrigate(1, 0), &table);
        assert_eq!(next.resources().water, 6);
        assert!(next.field(1).unwrap().watered);
        let next = next.apply(&Action::fertilize(1, 0), &table);
        assert_eq!(next.resources().fertilizer, 7);
        assert!(next.field(1).unwrap().fertilized);

        // The parent is left untouched.
        assert_eq!(start.resources().water, 10);
        assert!(!start.field(1).unwrap().watered);
    }

    #[test]
    fn test_advance_day_grows_only_ready_fields() {
        let table = cheap_table();
        let mut state = FarmState::new(
            vec![
                Field::new(1, CropKind::Wheat),
                Field::new(2, CropKind::Wheat),
                Field::new(3, CropKind::Wheat),
            ],
            0,
            0,
        );
        state.fields[0].watered = true;
        state.fields[0].fertilized = true;
        state.fields[1].watered = true;
        state.fields[2].stage = GrowthStage::Harvested;

        let next = state.apply(&Action::advance_day(0), &table);
        assert_eq!(next.day(), 1);
        let grown = next.field(1).unwrap();
        assert_eq!(grown.stage, GrowthStage::Sprout);
        assert!(!grown.watered && !grown.fertilized);
        let waiting = next.field(2).unwrap();
        assert_eq!(waiting.stage, GrowthStage::Seed);
        assert!(waiting.watered);
        assert_eq!(next.field(3).unwrap().stage, GrowthStage::Harvested);
    }

    #[test]
    fn test_harvest_is_terminal() {
        let table = cheap_table();
        let mut state = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 5, 5);
        state.fields[0].stage = GrowthStage::Harvestable;
        let done = state.apply(&Action::harvest(1, 0), &table);
        assert!(done.is_goal());
        assert!(done.applicable_actions(&table).is_empty());
        let after = done.apply(&Action::advance_day(0), &table);
        assert_eq!(after.field(1).unwrap().stage, GrowthStage::Harvested);
    }

    #[test]
    fn test_try_apply_rejects_illegal_actions() {
        let table = CropTable::default();
        let state = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 0, 5);
        assert_eq!(
            state.try_apply(&Action::irrigate(9, 0), &table),
            Err(TransitionError::UnknownField(9))
        );
        assert!(matches!(
            state.try_apply(&Action::irrigate(1, 0), &table),
            Err(TransitionError::NotApplicable { .. })
        ));
        assert!(matches!(
            state.try_apply(&Action::advance_day(0), &table),
            Err(TransitionError::NotApplicable { .. })
        ));
        assert!(state.try_apply(&Action::fertilize(1, 0), &table).is_ok());
    }

    #[test]
    fn test_apply_with_unknown_field_changes_nothing() {
        let table = CropTable::default();
        let state = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 5, 5);
        for action in [
            Action::irrigate(9, 0),
            Action::fertilize(9, 0),
            Action::harvest(9, 0),
        ] {
            assert_eq!(state.apply(&action, &table), state);
            assert_eq!(
                state.try_apply(&action, &table),
                Err(TransitionError::UnknownField(9))
            );
        }
    }

    #[test]
    fn test_action_equality_ignores_day() {
        assert_eq!(Action::irrigate(1, 0), Action::irrigate(1, 7));
        assert_ne!(Action::irrigate(1, 0), Action::fertilize(1, 0));
        assert_ne!(Action::irrigate(1, 0), Action::irrigate(2, 0));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::irrigate(2, 0).to_string(), "Irrigate Field 2");
        assert_eq!(Action::fertilize(2, 0).to_string(), "Fertilize Field 2");
        assert_eq!(Action::harvest(2, 4).to_string(), "Harvest Field 2");
        assert_eq!(
            Action::advance_day(3).to_string(),
            "End of Day 3. Crops grow."
        );
    }

    #[test]
    fn test_replay_full_single_field_plan() {
        let table = cheap_table();
        let start = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 3, 3);
        let mut plan = Vec::new();
        for day in 0..3 {
            plan.push(Action::irrigate(1, day));
            plan.push(Action::fertilize(1, day));
            plan.push(Action::advance_day(day));
        }
        plan.push(Action::harvest(1, 3));

        let end = replay(&start, &plan, &table).unwrap();
        assert!(end.is_goal());
        assert_eq!(end.day(), 3);
        assert_eq!(end.resources().water, 0);
        assert_eq!(end.resources().fertilizer, 0);
    }

    #[test]
    fn test_replay_stops_at_first_illegal_step() {
        let table = cheap_table();
        let start = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 1, 1);
        let plan = vec![
            Action::irrigate(1, 0),
            Action::fertilize(1, 0),
            Action::advance_day(0),
            Action::irrigate(1, 1),
        ];
        let err = replay(&start, &plan, &table).unwrap_err();
        assert!(matches!(err, TransitionError::NotApplicable { day: 1, .. }));
    }

    #[test]
    fn test_display_farm_state() {
        let state = FarmState::new(vec![Field::new(1, CropKind::Wheat)], 3, 2);
        let text = state.to_string();
        assert!(text.starts_with("Day 0 | water 3 | fertilizer 2"));
        assert!(text.contains("Field 1"));
        assert!(text.contains("wheat"));
        assert!(text.contains("seed"));
    }
}
