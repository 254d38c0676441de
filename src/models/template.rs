use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

use super::plan::MacroTargets;
use super::profile::GoalType;
use super::workout::WorkoutSpec;

/// Compact cyclic representation of a stored plan. The renderer is a pure
/// function of this plus the override set.
///
/// Goal type and body weight ride along so rendered days can re-derive
/// macros through the same goal-aware allocator the assembler used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTemplate {
    pub plan_id: Uuid,
    pub user_id: Uuid,
    pub goal_type: GoalType,
    pub weight_kg: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub default_calorie_target: i32,
    pub default_macros: MacroTargets,
    /// Ordered by day index; length is the cycle length (≤ 7).
    pub days: Vec<TemplateDay>,
}

impl PlanTemplate {
    pub fn cycle_length(&self) -> usize {
        self.days.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDay {
    pub day_index: i32,
    pub workout: WorkoutSpec,
    pub calorie_delta: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "override_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OverrideType {
    Pause,
    Adjust,
    Deload,
}

/// Date-keyed exception to the cyclic template. At most one override per
/// date survives rendering; the last write wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOverride {
    pub date: NaiveDate,
    pub override_type: OverrideType,
    pub workout: Option<WorkoutSpec>,
    /// Replaces the day's calorie target outright.
    pub calorie_target: Option<i32>,
    /// Added to the plan's *default* calorie target, not the template
    /// day's adjusted one.
    pub calorie_delta: Option<i32>,
}
