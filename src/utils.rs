use crate::engine::{Action, ActionKind, FarmState};
use std::collections::BTreeMap;

/// Groups the field-scoped actions of a plan by field id, keeping plan order.
///
/// Day advances are not tied to a field and are left out.
///
/// # Examples
/// ```
/// use farm_planner::engine::Action;
/// use farm_planner::utils::field_schedule;
///
/// let plan = [Action::irrigate(2, 0), Action::irrigate(1, 0), Action::advance_day(0)];
/// let schedule = field_schedule(&plan);
/// assert_eq!(schedule.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
/// assert_eq!(schedule[&2], vec![Action::irrigate(2, 0)]);
/// ```
pub fn field_schedule(plan: &[Action]) -> BTreeMap<u32, Vec<Action>> {
    let mut schedule: BTreeMap<u32, Vec<Action>> = BTreeMap::new();
    for action in plan {
        if let Some(id) = action.field {
            schedule.entry(id).or_default().push(*action);
        }
    }
    schedule
}

/// Renders a plan as numbered steps, one per line.
pub fn render_plan(plan: &[Action]) -> String {
    if plan.is_empty() {
        return "  No actions needed.".to_string();
    }
    plan.iter()
        .enumerate()
        .map(|(i, action)| format!("  Step {:>3} (day {:>2}): {}", i + 1, action.day, action))
        .collect::<Vec<_>>()
        .join("\n")
}

fn action_letter(kind: ActionKind) -> char {
    match kind {
        ActionKind::Irrigate => 'I',
        ActionKind::Fertilize => 'F',
        ActionKind::Harvest => 'H',
        ActionKind::AdvanceDay => '>',
    }
}

/// Renders a per-field timeline of a plan.
///
/// One row per field of `initial`, one column per day. Each cell lists the letters of the
/// actions issued on that field that day: `I` irrigate, `F` fertilize, `H` harvest.
///
/// ```text
/// Field    | d0  | d1  | d2  | d3  |
/// 1 wheat  | IF  | IF  | IF  | H   |
/// ```
pub fn render_schedule(initial: &FarmState, plan: &[Action]) -> String {
    let last_day = plan.iter().map(|a| a.day).max().unwrap_or(0);
    let schedule = field_schedule(plan);

    let mut output = String::from("Field    |");
    for day in 0..=last_day {
        output.push_str(&format!(" {:<4}|", format!("d{}", day)));
    }

    for field in initial.fields() {
        output.push('\n');
        output.push_str(&format!("{:<9}|", format!("{} {}", field.id, field.crop)));
        let actions = schedule.get(&field.id).map(Vec::as_slice).unwrap_or(&[]);
        for day in 0..=last_day {
            let cell: String = actions
                .iter()
                .filter(|a| a.day == day)
                .map(|a| action_letter(a.kind))
                .collect();
            output.push_str(&format!(" {:<4}|", cell));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropKind;
    use crate::engine::Field;

    fn single_field_plan() -> Vec<Action> {
        let mut plan = Vec::new();
        for day in 0..3 {
            plan.push(Action::irrigate(1, day));
            plan.push(Action::fertilize(1, day));
            plan.push(Action::advance_day(day));
        }
        plan.push(Action::harvest(1, 3));
        plan
    }

    #[test]
    fn test_field_schedule_skips_day_advances() {
        let schedule = field_schedule(&single_field_plan());
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[&1].len(), 7);
        assert!(schedule[&1]
            .iter()
            .all(|a| a.kind != ActionKind::AdvanceDay));
    }

    #[test]
    fn test_render_plan() {
        let text = render_plan(&single_field_plan());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "  Step   1 (day  0): Irrigate Field 1");
        assert_eq!(lines[2], "  Step   3 (day  0): End of Day 0. Crops grow.");
        assert_eq!(lines[9], "  Step  10 (day  3): Harvest Field 1");
    }

    #[test]
    fn test_render_empty_plan() {
        assert_eq!(render_plan(&[]), "  No actions needed.");
    }

    #[test]
    fn test_render_schedule() {
        let initial = FarmState::new(
            vec![Field::new(1, CropKind::Wheat), Field::new(2, CropKind::Corn)],
            6,
            3,
        );
        let text = render_schedule(&initial, &single_field_plan());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Field    | d0  | d1  | d2  | d3  |");
        assert_eq!(lines[1], "1 wheat  | IF  | IF  | IF  | H   |");
        assert_eq!(lines[2], "2 corn   |     |     |     |     |");
    }
}
