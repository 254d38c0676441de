//! Deterministic weekly workout templates keyed by goal and training
//! frequency. A static lookup, not a search.

use crate::models::{CardioBlock, ExerciseSpec, GoalType, WorkoutSpec};

/// Goal-specific bounds for training days per week.
fn frequency_bounds(goal: GoalType) -> (i32, i32) {
    match goal {
        GoalType::Gain => (4, 6),
        GoalType::Maintain | GoalType::Lose => (3, 4),
    }
}

const DEFAULT_DAYS_PER_WEEK: i32 = 4;

/// Validates an explicit frequency preference against the overall 2–6
/// window and the goal band; anything else resets to the goal default.
pub fn validated_days_per_week(goal: GoalType, preference: Option<i32>) -> i32 {
    let (low, high) = frequency_bounds(goal);
    match preference {
        Some(days) if (2..=6).contains(&days) && (low..=high).contains(&days) => days,
        _ => DEFAULT_DAYS_PER_WEEK,
    }
}

/// Builds the repeating cycle for a goal. Slicing keeps template order:
/// the first `days_per_week` training slots are taken in sequence and the
/// cycle closes with a single rest day; asking for the template's full
/// training complement returns the whole 7-slot week, rest days included.
pub fn weekly_cycle(goal: GoalType, preference: Option<i32>) -> Vec<WorkoutSpec> {
    let days = validated_days_per_week(goal, preference);
    let template = weekly_template(goal);
    let training: Vec<&WorkoutSpec> = template.iter().filter(|w| !w.is_rest_day()).collect();

    if days as usize == training.len() {
        return template.clone();
    }

    let mut cycle: Vec<WorkoutSpec> = (0..days as usize)
        .map(|i| training[i % training.len()].clone())
        .collect();
    cycle.push(WorkoutSpec::rest_day());
    cycle.truncate(7);
    cycle
}

/// Fixed 7-slot weekly template for a goal.
pub fn weekly_template(goal: GoalType) -> &'static Vec<WorkoutSpec> {
    use std::sync::OnceLock;
    static GAIN: OnceLock<Vec<WorkoutSpec>> = OnceLock::new();
    static MAINTAIN: OnceLock<Vec<WorkoutSpec>> = OnceLock::new();
    static LOSE: OnceLock<Vec<WorkoutSpec>> = OnceLock::new();

    match goal {
        GoalType::Gain => GAIN.get_or_init(|| {
            vec![
                upper_strength("Upper Body Strength A"),
                lower_strength("Lower Body Strength A"),
                WorkoutSpec::rest_day(),
                upper_strength("Upper Body Strength B"),
                lower_strength("Lower Body Strength B"),
                full_body_hypertrophy(),
                WorkoutSpec::rest_day(),
            ]
        }),
        GoalType::Maintain => MAINTAIN.get_or_init(|| {
            vec![
                full_body_strength("Full-Body Strength A"),
                steady_state_cardio(),
                WorkoutSpec::rest_day(),
                full_body_strength("Full-Body Strength B"),
                cardio_intervals(),
                WorkoutSpec::rest_day(),
                WorkoutSpec::rest_day(),
            ]
        }),
        GoalType::Lose => LOSE.get_or_init(|| {
            vec![
                full_body_strength("Full-Body Strength A"),
                cardio_intervals(),
                full_body_strength("Full-Body Strength B"),
                steady_state_cardio(),
                full_body_strength("Full-Body Strength C"),
                WorkoutSpec::rest_day(),
                WorkoutSpec::rest_day(),
            ]
        }),
    }
}

fn upper_strength(label: &str) -> WorkoutSpec {
    WorkoutSpec {
        label: label.to_string(),
        exercises: vec![
            ExerciseSpec::new("Barbell Bench Press", 4, 8, 8.0),
            ExerciseSpec::new("Barbell Row", 4, 8, 8.0),
            ExerciseSpec::new("Overhead Press", 3, 10, 7.5),
            ExerciseSpec::new("Lat Pulldown", 3, 10, 7.5),
        ],
        cardio: None,
    }
}

fn lower_strength(label: &str) -> WorkoutSpec {
    WorkoutSpec {
        label: label.to_string(),
        exercises: vec![
            ExerciseSpec::new("Back Squat", 4, 8, 8.0),
            ExerciseSpec::new("Romanian Deadlift", 4, 8, 8.0),
            ExerciseSpec::new("Walking Lunge", 3, 12, 7.0),
        ],
        cardio: None,
    }
}

fn full_body_hypertrophy() -> WorkoutSpec {
    WorkoutSpec {
        label: "Full-Body Hypertrophy".to_string(),
        exercises: vec![
            ExerciseSpec::new("Goblet Squat", 3, 12, 7.0),
            ExerciseSpec::new("Incline Dumbbell Press", 3, 12, 7.0),
            ExerciseSpec::new("Seated Cable Row", 3, 12, 7.0),
            ExerciseSpec::new("Dumbbell Romanian Deadlift", 3, 12, 7.0),
        ],
        cardio: None,
    }
}

fn full_body_strength(label: &str) -> WorkoutSpec {
    WorkoutSpec {
        label: label.to_string(),
        exercises: vec![
            ExerciseSpec::new("Back Squat", 3, 8, 8.0),
            ExerciseSpec::new("Barbell Bench Press", 3, 8, 8.0),
            ExerciseSpec::new("Barbell Row", 3, 8, 8.0),
            ExerciseSpec::new("Romanian Deadlift", 3, 10, 7.5),
        ],
        cardio: None,
    }
}

fn cardio_intervals() -> WorkoutSpec {
    WorkoutSpec {
        label: "Cardio Intervals".to_string(),
        exercises: Vec::new(),
        cardio: Some(CardioBlock::new("intervals", 25)),
    }
}

fn steady_state_cardio() -> WorkoutSpec {
    WorkoutSpec {
        label: "Steady-State Cardio".to_string(),
        exercises: Vec::new(),
        cardio: Some(CardioBlock::new("steady-state", 40)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lose_cycle_has_five_slots() {
        let cycle = weekly_cycle(GoalType::Lose, None);
        assert_eq!(cycle.len(), 5);
        assert_eq!(cycle.iter().filter(|w| !w.is_rest_day()).count(), 4);
        assert!(cycle.last().unwrap().is_rest_day());
    }

    #[test]
    fn full_training_complement_returns_whole_week() {
        // The gain template carries five training slots
        let gain_full = weekly_cycle(GoalType::Gain, Some(5));
        assert_eq!(gain_full.len(), 7);
        assert_eq!(gain_full.iter().filter(|w| w.is_rest_day()).count(), 2);
    }

    #[test]
    fn out_of_band_preference_resets_to_default() {
        // 6 days is outside the lose band (3–4)
        let cycle = weekly_cycle(GoalType::Lose, Some(6));
        assert_eq!(cycle.len(), 5);
        // 1 day is outside the overall 2–6 window
        let gain = weekly_cycle(GoalType::Gain, Some(1));
        assert_eq!(gain.iter().filter(|w| !w.is_rest_day()).count(), 4);
    }

    #[test]
    fn six_day_gain_cycle_wraps_the_training_pool() {
        let cycle = weekly_cycle(GoalType::Gain, Some(6));
        assert_eq!(cycle.len(), 7);
        assert_eq!(cycle.iter().filter(|w| !w.is_rest_day()).count(), 6);
        // Sixth slot wraps back to the first training day
        assert_eq!(cycle[5].label, cycle[0].label);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(
            weekly_cycle(GoalType::Maintain, Some(3)),
            weekly_cycle(GoalType::Maintain, Some(3))
        );
    }
}
