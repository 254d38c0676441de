//! Combines the metabolic calculator, macro allocator, checkpoint planner,
//! and workout cycle generator into a concrete day-by-day plan.

use chrono::Duration;

use crate::models::{
    GoalPreferences, GoalType, PlanBundle, PlanDay, PlanRequest, PlanStatus, PlanTargets,
    UserProfile,
};

use super::checkpoint_planner::{self, CheckpointInputs};
use super::macro_allocator;
use super::metabolic;
use super::workout_cycle;

/// Requested plan length is clamped into this window before the checkpoint
/// planner gets a say; the planner may still extend beyond it.
pub const MIN_REQUESTED_DAYS: i32 = 14;
pub const MAX_REQUESTED_DAYS: i32 = 60;

const LB_TO_KG: f64 = 0.453592;

/// Weight-loss plans step calories down by this much per 14-day block.
const LOSE_BLOCK_DAYS: i32 = 14;
const LOSE_BLOCK_DECREMENT: i32 = 300;

/// Pure plan generation. Produces a complete proposed bundle or nothing;
/// there is no partial output for callers to persist.
pub fn assemble(
    profile: &UserProfile,
    preferences: &GoalPreferences,
    request: &PlanRequest,
) -> PlanBundle {
    let requested_days = request
        .requested_days
        .clamp(MIN_REQUESTED_DAYS, MAX_REQUESTED_DAYS);
    let goal = request.goal_override.unwrap_or(preferences.goal_type);
    let age = profile.age_on(request.start_date);

    let energy = metabolic::energy_targets(
        goal,
        preferences.weekly_change_kg,
        profile.weight_kg,
        profile.height_cm,
        age,
        profile.sex,
        preferences.activity_level,
    );

    let allocation = macro_allocator::allocate(energy.calorie_target, profile.weight_kg, goal);

    // An explicit loss amount beats the stored target weight.
    let target_weight_kg = request
        .target_loss_lb
        .map(|lb| profile.weight_kg - lb * LB_TO_KG)
        .or(preferences.target_weight_kg);

    let checkpoint_plan = checkpoint_planner::plan_checkpoints(&CheckpointInputs {
        goal_type: goal,
        current_weight_kg: profile.weight_kg,
        target_weight_kg,
        weekly_change_kg: energy.weekly_change_kg,
        requested_days,
    });
    let planned_days = checkpoint_plan.planned_days;

    let cycle = workout_cycle::weekly_cycle(goal, preferences.workout_days_per_week);

    let mut days = Vec::with_capacity(planned_days as usize);
    for i in 0..planned_days {
        let date = request.start_date + Duration::days(i as i64);
        let calorie_target = day_calorie_target(goal, energy.calorie_target, i);
        let macros = if calorie_target == energy.calorie_target {
            allocation.macros
        } else {
            macro_allocator::allocate(calorie_target, profile.weight_kg, goal).macros
        };
        days.push(PlanDay {
            date,
            workout: cycle[i as usize % cycle.len()].clone(),
            calorie_target,
            macros,
        });
    }

    let targets = PlanTargets {
        goal_type: goal,
        calorie_target: energy.calorie_target,
        macros: allocation.macros,
        step_goal: metabolic::step_goal(goal, preferences.activity_level),
        tdee: energy.tdee,
        calorie_formula: energy.calorie_formula,
        low_confidence: allocation.low_confidence,
    };

    PlanBundle {
        user_id: profile.user_id,
        status: PlanStatus::Proposed,
        start_date: request.start_date,
        end_date: request.start_date + Duration::days((planned_days - 1) as i64),
        targets,
        cycle,
        days,
        checkpoints: checkpoint_plan.checkpoints,
    }
}

/// Lose plans shed 300 kcal per 14-day block after the first, floored at
/// 1200. Gain/maintain plans never auto-decrement.
fn day_calorie_target(goal: GoalType, base: i32, day_index: i32) -> i32 {
    match goal {
        GoalType::Lose => {
            let block = day_index / LOSE_BLOCK_DAYS;
            (base - LOSE_BLOCK_DECREMENT * block).max(metabolic::MIN_CALORIE_TARGET)
        }
        _ => base,
    }
}
