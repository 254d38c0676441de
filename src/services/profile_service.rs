use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::CoachError;
use crate::models::{
    GoalPreferences, UpsertPreferencesRequest, UpsertProfileRequest, UserProfile,
};

/// Read/write access to the biometric and preference rows the plan engine
/// consumes.
#[derive(Clone)]
pub struct ProfileService {
    db: PgPool,
}

impl ProfileService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, CoachError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, user_id, birthdate, age_years, height_cm, weight_kg, sex,
                   created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(profile)
    }

    /// Profile required by a plan-generation call; absence is an explicit
    /// error, never a silent default.
    pub async fn require_profile(&self, user_id: Uuid) -> Result<UserProfile, CoachError> {
        self.get_profile(user_id)
            .await?
            .ok_or(CoachError::ProfileNotFound(user_id))
    }

    pub async fn get_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<GoalPreferences>, CoachError> {
        let preferences = sqlx::query_as::<_, GoalPreferences>(
            r#"
            SELECT user_id, goal_type, weekly_change_kg, target_weight_kg,
                   activity_level, workout_days_per_week, created_at, updated_at
            FROM goal_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(preferences)
    }

    pub async fn require_preferences(&self, user_id: Uuid) -> Result<GoalPreferences, CoachError> {
        self.get_preferences(user_id)
            .await?
            .ok_or(CoachError::PreferencesNotFound(user_id))
    }

    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        request: UpsertProfileRequest,
    ) -> Result<UserProfile, CoachError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (
                id, user_id, birthdate, age_years, height_cm, weight_kg, sex,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                birthdate = EXCLUDED.birthdate,
                age_years = EXCLUDED.age_years,
                height_cm = EXCLUDED.height_cm,
                weight_kg = EXCLUDED.weight_kg,
                sex = EXCLUDED.sex,
                updated_at = EXCLUDED.updated_at
            RETURNING id, user_id, birthdate, age_years, height_cm, weight_kg, sex,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(request.birthdate)
        .bind(request.age_years)
        .bind(request.height_cm)
        .bind(request.weight_kg)
        .bind(request.sex)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(profile)
    }

    pub async fn upsert_preferences(
        &self,
        user_id: Uuid,
        request: UpsertPreferencesRequest,
    ) -> Result<GoalPreferences, CoachError> {
        let preferences = sqlx::query_as::<_, GoalPreferences>(
            r#"
            INSERT INTO goal_preferences (
                user_id, goal_type, weekly_change_kg, target_weight_kg,
                activity_level, workout_days_per_week, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                goal_type = EXCLUDED.goal_type,
                weekly_change_kg = EXCLUDED.weekly_change_kg,
                target_weight_kg = EXCLUDED.target_weight_kg,
                activity_level = EXCLUDED.activity_level,
                workout_days_per_week = EXCLUDED.workout_days_per_week,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, goal_type, weekly_change_kg, target_weight_kg,
                      activity_level, workout_days_per_week, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(request.goal_type)
        .bind(request.weekly_change_kg)
        .bind(request.target_weight_kg)
        .bind(request.activity_level)
        .bind(request.workout_days_per_week)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(preferences)
    }
}
