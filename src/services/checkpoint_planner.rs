//! Biweekly expected-weight checkpoints and the plan duration that keeps
//! the rate of change inside safe bounds.

use crate::models::{GoalType, WeightCheckpoint};

/// Safe weekly change window as a fraction of body weight.
pub const MIN_WEEKLY_RATE: f64 = 0.005;
pub const MAX_WEEKLY_RATE: f64 = 0.01;

/// Tolerance band half-width as a fraction of current body weight.
pub const BAND_FRACTION: f64 = 0.01;

/// Synthesized gain rate when no target weight resolves (fraction of body
/// weight per week).
const GAIN_DRIFT_RATE: f64 = 0.002;

/// Long requests (≥ 60 days) are planned over at least this many weeks.
const LONG_PLAN_MIN_WEEKS: i32 = 12;

#[derive(Debug, Clone)]
pub struct CheckpointInputs {
    pub goal_type: GoalType,
    pub current_weight_kg: f64,
    pub target_weight_kg: Option<f64>,
    /// Signed kg/week, already sign-normalized against the goal.
    pub weekly_change_kg: f64,
    pub requested_days: i32,
}

#[derive(Debug, Clone)]
pub struct CheckpointPlan {
    pub checkpoints: Vec<WeightCheckpoint>,
    /// Never less than the requested days; extension is the only
    /// correction applied to the caller's horizon.
    pub planned_days: i32,
    pub recommended_weeks: i32,
}

fn ceil_div(numerator: i32, denominator: i32) -> i32 {
    (numerator + denominator - 1) / denominator
}

fn band(expected: f64, current_weight_kg: f64) -> (f64, f64) {
    let half_width = BAND_FRACTION * current_weight_kg;
    (expected - half_width, expected + half_width)
}

/// Resolves the weight the plan is steering toward. Lose goals without an
/// explicit target derive one from the weekly rate over the requested
/// horizon; gain/maintain goals without one have no resolvable target.
fn resolve_target(inputs: &CheckpointInputs, requested_weeks: i32) -> Option<f64> {
    if let Some(target) = inputs.target_weight_kg {
        return Some(target);
    }
    match inputs.goal_type {
        GoalType::Lose => Some(
            inputs.current_weight_kg - inputs.weekly_change_kg.abs() * requested_weeks as f64,
        ),
        GoalType::Gain | GoalType::Maintain => None,
    }
}

pub fn plan_checkpoints(inputs: &CheckpointInputs) -> CheckpointPlan {
    let requested_weeks = ceil_div(inputs.requested_days.max(1), 7).max(1);

    let Some(target) = resolve_target(inputs, requested_weeks) else {
        return drift_checkpoints(inputs, requested_weeks);
    };

    let current = inputs.current_weight_kg;
    let delta = (current - target).abs();
    if delta == 0.0 {
        return CheckpointPlan {
            checkpoints: Vec::new(),
            planned_days: inputs.requested_days,
            recommended_weeks: requested_weeks,
        };
    }

    let min_weekly = MIN_WEEKLY_RATE * current;
    let max_weekly = MAX_WEEKLY_RATE * current;
    let requested_rate = delta / requested_weeks as f64;

    let mut recommended_weeks = if requested_rate > max_weekly {
        // Too aggressive; stretch the plan out.
        (delta / max_weekly).ceil() as i32
    } else if requested_rate < min_weekly {
        // Too slow; the checkpoint horizon tightens, but planned_days
        // below still honors the longer request.
        (delta / min_weekly).ceil() as i32
    } else {
        requested_weeks
    };
    if inputs.requested_days >= 60 {
        recommended_weeks = recommended_weeks.max(LONG_PLAN_MIN_WEEKS);
    }

    let planned_days = inputs.requested_days.max(recommended_weeks * 7);

    let count = ceil_div(recommended_weeks + 1, 2);
    let step = delta / count as f64;
    let direction = if target < current { -1.0 } else { 1.0 };

    let checkpoints = (1..=count)
        .map(|i| {
            let expected = current + direction * step * i as f64;
            let (min_weight_kg, max_weight_kg) = band(expected, current);
            WeightCheckpoint {
                week: 2 * i,
                expected_weight_kg: expected,
                min_weight_kg,
                max_weight_kg,
            }
        })
        .collect();

    CheckpointPlan {
        checkpoints,
        planned_days,
        recommended_weeks,
    }
}

/// No resolvable target: synthesize checkpoints at a fixed drift rate
/// (gain 0.2%/week, maintain 0%/week) without touching the horizon.
fn drift_checkpoints(inputs: &CheckpointInputs, requested_weeks: i32) -> CheckpointPlan {
    let current = inputs.current_weight_kg;
    let weekly_drift = match inputs.goal_type {
        GoalType::Gain => GAIN_DRIFT_RATE * current,
        _ => 0.0,
    };

    let count = ceil_div(requested_weeks + 1, 2);
    let checkpoints = (1..=count)
        .map(|i| {
            let week = 2 * i;
            let expected = current + weekly_drift * week as f64;
            let (min_weight_kg, max_weight_kg) = band(expected, current);
            WeightCheckpoint {
                week,
                expected_weight_kg: expected,
                min_weight_kg,
                max_weight_kg,
            }
        })
        .collect();

    CheckpointPlan {
        checkpoints,
        planned_days: inputs.requested_days,
        recommended_weeks: requested_weeks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lose_inputs(days: i32, current: f64, target: f64) -> CheckpointInputs {
        CheckpointInputs {
            goal_type: GoalType::Lose,
            current_weight_kg: current,
            target_weight_kg: Some(target),
            weekly_change_kg: -0.5,
            requested_days: days,
        }
    }

    #[test]
    fn aggressive_request_extends_plan() {
        // 10 kg in 2 weeks is far beyond 1%/week of 90 kg (0.9 kg)
        let plan = plan_checkpoints(&lose_inputs(14, 90.0, 80.0));
        assert_eq!(plan.recommended_weeks, (10.0_f64 / 0.9).ceil() as i32);
        assert_eq!(plan.planned_days, plan.recommended_weeks * 7);
        assert!(plan.planned_days > 14);
    }

    #[test]
    fn slow_request_keeps_requested_duration() {
        // 0.5 kg over 8 weeks is below 0.5%/week of 90 kg; the checkpoint
        // horizon shrinks but the plan length never does.
        let plan = plan_checkpoints(&lose_inputs(56, 90.0, 89.5));
        assert!(plan.recommended_weeks < 8);
        assert_eq!(plan.planned_days, 56);
    }

    #[test]
    fn sixty_day_request_floors_at_twelve_weeks() {
        let plan = plan_checkpoints(&lose_inputs(60, 90.0, 85.0));
        assert!(plan.recommended_weeks >= 12);
        assert_eq!(plan.planned_days, 84);
    }

    #[test]
    fn zero_delta_produces_no_checkpoints() {
        let plan = plan_checkpoints(&lose_inputs(30, 90.0, 90.0));
        assert!(plan.checkpoints.is_empty());
        assert_eq!(plan.planned_days, 30);
    }

    #[test]
    fn gain_without_target_drifts_upward() {
        let inputs = CheckpointInputs {
            goal_type: GoalType::Gain,
            current_weight_kg: 70.0,
            target_weight_kg: None,
            weekly_change_kg: 0.25,
            requested_days: 28,
        };
        let plan = plan_checkpoints(&inputs);
        assert_eq!(plan.planned_days, 28);
        assert!(!plan.checkpoints.is_empty());
        let mut previous = 70.0;
        for checkpoint in &plan.checkpoints {
            assert!(checkpoint.expected_weight_kg > previous);
            previous = checkpoint.expected_weight_kg;
        }
    }
}
