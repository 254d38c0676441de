//! Reconstructs concrete plan days from a cyclic template plus a sparse,
//! date-keyed override set.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{
    OverrideType, PlanBundle, PlanDay, PlanOverride, PlanTemplate, TemplateDay, WorkoutSpec,
};

use super::macro_allocator;

/// Renders every date in `[start, end]` against the template and override
/// set. Pure: same inputs, same days.
///
/// Override precedence is total for the date it covers: a workout override
/// replaces the label (rest-day flag recomputed), a calorie_target override
/// replaces the value outright, a calorie_delta adds to the plan *default*,
/// and pause/deload force a rest day regardless of any workout payload.
/// When several overrides share a date the last one wins; nothing merges.
pub fn render(
    template: &PlanTemplate,
    overrides: &[PlanOverride],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<PlanDay> {
    if template.days.is_empty() || end < start {
        return Vec::new();
    }
    let cycle_length = template.cycle_length() as i64;

    let by_date: BTreeMap<NaiveDate, &PlanOverride> =
        overrides.iter().map(|o| (o.date, o)).collect();

    let mut days = Vec::new();
    let mut date = start;
    while date <= end {
        let offset = (date - template.start_date).num_days();
        let day_index = offset.rem_euclid(cycle_length) as usize;
        let base = &template.days[day_index];

        let (workout, calorie_target) = match by_date.get(&date) {
            Some(entry) => apply_override(template, base, entry),
            None => (
                base.workout.clone(),
                template.default_calorie_target + base.calorie_delta,
            ),
        };

        let macros =
            macro_allocator::allocate(calorie_target, template.weight_kg, template.goal_type)
                .macros;

        days.push(PlanDay {
            date,
            workout,
            calorie_target,
            macros,
        });
        date = date.succ_opt().expect("date within calendar range");
    }
    days
}

fn apply_override(
    template: &PlanTemplate,
    base: &TemplateDay,
    entry: &PlanOverride,
) -> (WorkoutSpec, i32) {
    let workout = match entry.override_type {
        OverrideType::Pause | OverrideType::Deload => WorkoutSpec::rest_day(),
        OverrideType::Adjust => entry
            .workout
            .clone()
            .unwrap_or_else(|| base.workout.clone()),
    };

    let calorie_target = if let Some(target) = entry.calorie_target {
        target
    } else if let Some(delta) = entry.calorie_delta {
        template.default_calorie_target + delta
    } else {
        template.default_calorie_target + base.calorie_delta
    };

    (workout, calorie_target)
}

/// Converts an assembled bundle into its stored shape: the cyclic template
/// plus the initial overrides needed to reproduce day-level deviations
/// (the weight-loss calorie decrements) under cyclic replay.
pub fn templatize(bundle: &PlanBundle, weight_kg: f64) -> (PlanTemplate, Vec<PlanOverride>) {
    let days = bundle
        .cycle
        .iter()
        .enumerate()
        .map(|(i, workout)| TemplateDay {
            day_index: i as i32,
            workout: workout.clone(),
            calorie_delta: 0,
        })
        .collect();

    let template = PlanTemplate {
        plan_id: uuid::Uuid::new_v4(),
        user_id: bundle.user_id,
        goal_type: bundle.targets.goal_type,
        weight_kg,
        start_date: bundle.start_date,
        end_date: bundle.end_date,
        default_calorie_target: bundle.targets.calorie_target,
        default_macros: bundle.targets.macros,
        days,
    };

    let overrides = bundle
        .days
        .iter()
        .filter(|day| day.calorie_target != bundle.targets.calorie_target)
        .map(|day| PlanOverride {
            date: day.date,
            override_type: OverrideType::Adjust,
            workout: None,
            calorie_target: Some(day.calorie_target),
            calorie_delta: None,
        })
        .collect();

    (template, overrides)
}

/// Folds a new override into an existing set, last write wins per date.
pub fn upsert_override(overrides: &mut Vec<PlanOverride>, entry: PlanOverride) {
    overrides.retain(|existing| existing.date != entry.date);
    overrides.push(entry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalType, MacroTargets};
    use chrono::Duration;
    use uuid::Uuid;

    fn template() -> PlanTemplate {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PlanTemplate {
            plan_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            goal_type: GoalType::Lose,
            weight_kg: 85.0,
            start_date: start,
            end_date: start + Duration::days(27),
            default_calorie_target: 2100,
            default_macros: MacroTargets {
                protein_g: 135,
                carbs_g: 215,
                fat_g: 70,
            },
            days: vec![
                TemplateDay {
                    day_index: 0,
                    workout: WorkoutSpec {
                        label: "Full-Body Strength A".to_string(),
                        exercises: Vec::new(),
                        cardio: None,
                    },
                    calorie_delta: 0,
                },
                TemplateDay {
                    day_index: 1,
                    workout: WorkoutSpec {
                        label: "Cardio Intervals".to_string(),
                        exercises: Vec::new(),
                        cardio: None,
                    },
                    calorie_delta: -100,
                },
                TemplateDay {
                    day_index: 2,
                    workout: WorkoutSpec::rest_day(),
                    calorie_delta: 0,
                },
            ],
        }
    }

    #[test]
    fn empty_override_set_cycles_with_template_period() {
        let template = template();
        let days = render(
            &template,
            &[],
            template.start_date,
            template.start_date + Duration::days(11),
        );
        assert_eq!(days.len(), 12);
        for (i, day) in days.iter().enumerate() {
            assert_eq!(day.workout.label, template.days[i % 3].workout.label);
        }
        // Template-day deltas apply against the default
        assert_eq!(days[1].calorie_target, 2000);
        assert_eq!(days[3].calorie_target, 2100);
    }

    #[test]
    fn calorie_delta_applies_to_default_not_template_day() {
        let template = template();
        // Day index 1 already carries a -100 template delta; the override
        // delta must ignore it.
        let date = template.start_date + Duration::days(1);
        let overrides = vec![PlanOverride {
            date,
            override_type: OverrideType::Adjust,
            workout: None,
            calorie_target: None,
            calorie_delta: Some(-250),
        }];
        let days = render(&template, &overrides, date, date);
        assert_eq!(days[0].calorie_target, 2100 - 250);
    }

    #[test]
    fn pause_forces_rest_day_even_with_workout_payload() {
        let template = template();
        let date = template.start_date;
        let overrides = vec![PlanOverride {
            date,
            override_type: OverrideType::Pause,
            workout: Some(WorkoutSpec {
                label: "Sneaky Squats".to_string(),
                exercises: Vec::new(),
                cardio: None,
            }),
            calorie_target: None,
            calorie_delta: Some(-300),
        }];
        let days = render(&template, &overrides, date, date);
        assert!(days[0].workout.is_rest_day());
        assert_eq!(days[0].calorie_target, 1800);
    }

    #[test]
    fn applying_the_same_override_twice_is_idempotent() {
        let template = template();
        let date = template.start_date + Duration::days(4);
        let entry = PlanOverride {
            date,
            override_type: OverrideType::Adjust,
            workout: Some(WorkoutSpec {
                label: "Swim".to_string(),
                exercises: Vec::new(),
                cardio: None,
            }),
            calorie_target: Some(1900),
            calorie_delta: None,
        };
        let mut overrides = Vec::new();
        upsert_override(&mut overrides, entry.clone());
        let once = render(&template, &overrides, template.start_date, template.end_date);
        upsert_override(&mut overrides, entry);
        let twice = render(&template, &overrides, template.start_date, template.end_date);
        assert_eq!(overrides.len(), 1);
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.workout.label, b.workout.label);
            assert_eq!(a.calorie_target, b.calorie_target);
        }
    }

    #[test]
    fn macros_rederive_from_the_final_calorie_value() {
        let template = template();
        let date = template.start_date;
        let overrides = vec![PlanOverride {
            date,
            override_type: OverrideType::Adjust,
            workout: None,
            calorie_target: Some(1600),
            calorie_delta: None,
        }];
        let days = render(&template, &overrides, date, date);
        assert!((days[0].macros.calories() - 1600).abs() <= 50);
    }
}
