use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

use super::profile::GoalType;
use super::workout::WorkoutSpec;

/// Protein/carb/fat grams for one calorie target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein_g: i32,
    pub carbs_g: i32,
    pub fat_g: i32,
}

impl MacroTargets {
    /// Derived calories at 4/4/9 kcal per gram.
    pub fn calories(&self) -> i32 {
        self.protein_g * 4 + self.carbs_g * 4 + self.fat_g * 9
    }
}

/// Derived nutrition targets for a plan. Invariant: derived macro calories
/// stay within ±50 kcal of `calorie_target`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTargets {
    pub goal_type: GoalType,
    pub calorie_target: i32,
    pub macros: MacroTargets,
    pub step_goal: i32,
    pub tdee: i32,
    /// Human-readable provenance of the calorie number.
    pub calorie_formula: String,
    /// Set when the macro repair loop could not satisfy its validators.
    pub low_confidence: bool,
}

/// Biweekly expected-weight target with a ±1% tolerance band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightCheckpoint {
    pub week: i32,
    pub expected_weight_kg: f64,
    pub min_weight_kg: f64,
    pub max_weight_kg: f64,
}

/// One concrete day of a rendered plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDay {
    pub date: NaiveDate,
    pub workout: WorkoutSpec,
    pub calorie_target: i32,
    pub macros: MacroTargets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "plan_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Proposed,
    Active,
    Inactive,
}

/// Complete output of the plan assembler: metadata, day-by-day schedule,
/// weight checkpoints, and the cycle the schedule was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanBundle {
    pub user_id: Uuid,
    pub status: PlanStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub targets: PlanTargets,
    /// Repeating workout pattern the days were generated from (≤ 7 slots).
    pub cycle: Vec<WorkoutSpec>,
    pub days: Vec<PlanDay>,
    pub checkpoints: Vec<WeightCheckpoint>,
}

/// Caller request for a new plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub start_date: NaiveDate,
    /// Clamped into [14, 60]; the checkpoint planner may extend the final
    /// plan beyond it, never shorten it.
    pub requested_days: i32,
    /// Pounds to lose; converted to kg and used as the target weight.
    #[serde(default)]
    pub target_loss_lb: Option<f64>,
    #[serde(default)]
    pub goal_override: Option<GoalType>,
}
