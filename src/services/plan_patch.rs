//! Incremental plan edits: end-date shifts with pause days, and workout
//! substitutions matched by movement pattern at preserved volume.

use chrono::{Duration, NaiveDate};

use crate::models::{
    ExerciseSpec, MovementPattern, OverrideType, PlanOverride, PlanTemplate, WorkoutSpec,
};

use super::plan_renderer::{self, upsert_override};

/// Static keyword table for movement classification. First match wins, so
/// the more specific vertical-pull names come before the generic "row".
const MOVEMENT_KEYWORDS: &[(&str, MovementPattern)] = &[
    ("pulldown", MovementPattern::VerticalPull),
    ("pull-up", MovementPattern::VerticalPull),
    ("pull up", MovementPattern::VerticalPull),
    ("chin-up", MovementPattern::VerticalPull),
    ("chin up", MovementPattern::VerticalPull),
    ("overhead press", MovementPattern::VerticalPush),
    ("shoulder press", MovementPattern::VerticalPush),
    ("push press", MovementPattern::VerticalPush),
    ("bench press", MovementPattern::HorizontalPush),
    ("chest press", MovementPattern::HorizontalPush),
    ("push-up", MovementPattern::HorizontalPush),
    ("push up", MovementPattern::HorizontalPush),
    ("dip", MovementPattern::HorizontalPush),
    ("row", MovementPattern::HorizontalPull),
    ("face pull", MovementPattern::HorizontalPull),
    ("deadlift", MovementPattern::Hinge),
    ("hip thrust", MovementPattern::Hinge),
    ("good morning", MovementPattern::Hinge),
    ("swing", MovementPattern::Hinge),
    ("squat", MovementPattern::Squat),
    ("lunge", MovementPattern::Squat),
    ("leg press", MovementPattern::Squat),
    ("step-up", MovementPattern::Squat),
];

/// Classifies an exercise name into a movement pattern, if any keyword in
/// the lookup table matches.
pub fn classify_movement(name: &str) -> Option<MovementPattern> {
    let lowered = name.to_lowercase();
    MOVEMENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, pattern)| *pattern)
}

/// End-date shift: the plan grows by `shift_days`, the paused dates become
/// rest days carrying the given calorie delta, and dates past the old end
/// are re-covered by cyclic replay at render time.
#[derive(Debug, Clone)]
pub struct EndDateShift {
    pub shift_days: i32,
    /// First paused date; defaults to the day after the current end.
    pub pause_start: Option<NaiveDate>,
    /// Added to the plan default on paused days.
    pub pause_calorie_delta: i32,
}

pub fn shift_end_date(
    template: &mut PlanTemplate,
    overrides: &mut Vec<PlanOverride>,
    shift: &EndDateShift,
) {
    let days = shift.shift_days.max(0);
    if days == 0 {
        return;
    }

    let pause_start = shift
        .pause_start
        .unwrap_or(template.end_date + Duration::days(1));

    for i in 0..days {
        let date = pause_start + Duration::days(i as i64);
        upsert_override(
            overrides,
            PlanOverride {
                date,
                override_type: OverrideType::Pause,
                workout: Some(WorkoutSpec::rest_day()),
                calorie_target: None,
                calorie_delta: Some(shift.pause_calorie_delta),
            },
        );
    }

    template.end_date += Duration::days(days as i64);
}

/// Workout substitution request against an already-rendered plan.
#[derive(Debug, Clone)]
pub struct WorkoutReplacement {
    pub pattern: MovementPattern,
    /// Exercises to substitute in; the matched exercises' total set count
    /// is redistributed across these.
    pub preferred_exercises: Vec<String>,
    /// Drop one set per exercise and one RPE point, on the days the
    /// substitution touches.
    pub reduce_intensity: bool,
    /// Swap the cardio modality, preserving the scheduled duration.
    pub preferred_cardio: Option<String>,
    /// Only days on or after this date are touched.
    pub effective_from: NaiveDate,
}

/// Computes the overrides that realize a substitution over every future,
/// non-rest day of the plan. Pure: the caller persists the result by
/// folding it into the stored override set (last write wins).
pub fn replace_workouts(
    template: &PlanTemplate,
    overrides: &[PlanOverride],
    replacement: &WorkoutReplacement,
) -> Vec<PlanOverride> {
    let start = replacement.effective_from.max(template.start_date);
    let rendered = plan_renderer::render(template, overrides, start, template.end_date);

    let mut patches = Vec::new();
    for day in rendered {
        if day.workout.is_rest_day() {
            continue;
        }
        if let Some(workout) = substitute(&day.workout, replacement) {
            patches.push(PlanOverride {
                date: day.date,
                override_type: OverrideType::Adjust,
                workout: Some(workout),
                calorie_target: Some(day.calorie_target),
                calorie_delta: None,
            });
        }
    }
    patches
}

/// Rewrites one workout per the replacement request, or `None` when the
/// day is unaffected.
fn substitute(workout: &WorkoutSpec, replacement: &WorkoutReplacement) -> Option<WorkoutSpec> {
    let mut changed = false;
    let mut result = workout.clone();

    let matched: Vec<&ExerciseSpec> = workout
        .exercises
        .iter()
        .filter(|e| classify_movement(&e.name) == Some(replacement.pattern))
        .collect();

    if !matched.is_empty() && !replacement.preferred_exercises.is_empty() {
        let total_sets: i32 = matched.iter().map(|e| e.sets).sum();
        let reps = matched[0].reps;
        let rpe = matched[0].rpe;

        result
            .exercises
            .retain(|e| classify_movement(&e.name) != Some(replacement.pattern));

        // Redistribute the matched volume: every preferred exercise gets
        // the base share, the first ones absorb the remainder.
        let count = replacement.preferred_exercises.len() as i32;
        let base = total_sets / count;
        let remainder = total_sets % count;
        for (i, name) in replacement.preferred_exercises.iter().enumerate() {
            let sets = base + if (i as i32) < remainder { 1 } else { 0 };
            if sets == 0 {
                continue;
            }
            result.exercises.push(ExerciseSpec {
                name: name.clone(),
                sets,
                reps,
                rpe,
            });
        }
        changed = true;
    }

    if let (Some(kind), Some(cardio)) = (&replacement.preferred_cardio, result.cardio.as_mut()) {
        if &cardio.kind != kind {
            cardio.kind = kind.clone();
            changed = true;
        }
    }

    // Intensity reduction rides along with a substitution; days the
    // replacement did not touch keep their programmed volume.
    if replacement.reduce_intensity && changed {
        for exercise in &mut result.exercises {
            exercise.sets = (exercise.sets - 1).max(1);
            if let Some(rpe) = exercise.rpe.as_mut() {
                *rpe = (*rpe - 1.0).max(5.0);
            }
        }
    }

    changed.then_some(result)
}
