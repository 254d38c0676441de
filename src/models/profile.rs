use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Biometric record for one user. Immutable per plan-generation call.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub birthdate: Option<NaiveDate>,
    pub age_years: Option<i32>,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub sex: Sex,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Age in whole years on the given date. Birthdate wins over a stored
    /// age; a profile carrying neither falls back to 30.
    pub fn age_on(&self, date: NaiveDate) -> i32 {
        if let Some(birthdate) = self.birthdate {
            return date.years_since(birthdate).unwrap_or(0) as i32;
        }
        self.age_years.unwrap_or(30)
    }
}

/// Marker used only to select the Mifflin-St Jeor constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "sex_marker", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "goal_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Lose,
    Gain,
    Maintain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "activity_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
    /// Anything the caller could not classify. Gets a conservative
    /// mid-range multiplier.
    #[serde(other)]
    Unspecified,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.20,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.90,
            ActivityLevel::Unspecified => 1.40,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::Unspecified => "unspecified",
        }
    }
}

/// Goal and training preferences supplied per plan-generation call.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GoalPreferences {
    pub user_id: Uuid,
    pub goal_type: GoalType,
    /// Signed kg per week. Sign mismatches with the goal are corrected by
    /// the metabolic calculator, never rejected.
    pub weekly_change_kg: f64,
    pub target_weight_kg: Option<f64>,
    pub activity_level: ActivityLevel,
    pub workout_days_per_week: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertProfileRequest {
    pub birthdate: Option<NaiveDate>,
    pub age_years: Option<i32>,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub sex: Sex,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertPreferencesRequest {
    pub goal_type: GoalType,
    pub weekly_change_kg: f64,
    pub target_weight_kg: Option<f64>,
    pub activity_level: ActivityLevel,
    pub workout_days_per_week: Option<i32>,
}
