use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

use crate::error::CoachError;
use crate::models::{
    GoalType, MacroTargets, OverrideType, PlanBundle, PlanDay, PlanOverride, PlanRequest,
    PlanStatus, PlanTargets, PlanTemplate, TemplateDay, WeightCheckpoint, WorkoutSpec,
};

use super::draft_cache::DraftCache;
use super::plan_assembler;
use super::plan_patch::{self, EndDateShift, WorkoutReplacement};
use super::plan_renderer;
use super::profile_service::ProfileService;

/// A stored plan identified by its row id plus the bundle it renders to.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoredPlan {
    pub plan_id: Uuid,
    pub bundle: PlanBundle,
}

/// Orchestrates the pure plan engine against the plan store and the draft
/// cache. The engine itself never touches I/O; this service is the only
/// place rows are read or written.
#[derive(Clone)]
pub struct PlanService {
    db: PgPool,
    profiles: ProfileService,
    drafts: Option<DraftCache>,
}

#[derive(Debug, FromRow)]
struct PlanRow {
    id: Uuid,
    user_id: Uuid,
    status: PlanStatus,
    goal_type: GoalType,
    start_date: NaiveDate,
    end_date: NaiveDate,
    calorie_target: i32,
    protein_g: i32,
    carbs_g: i32,
    fat_g: i32,
    step_goal: i32,
    tdee: i32,
    calorie_formula: String,
    low_confidence: bool,
    weight_kg: f64,
}

#[derive(Debug, FromRow)]
struct TemplateDayRow {
    day_index: i32,
    workout: Json<WorkoutSpec>,
    calorie_delta: i32,
}

#[derive(Debug, FromRow)]
struct OverrideRow {
    date: NaiveDate,
    override_type: OverrideType,
    workout: Option<Json<WorkoutSpec>>,
    calorie_target: Option<i32>,
    calorie_delta: Option<i32>,
}

#[derive(Debug, FromRow)]
struct CheckpointRow {
    week: i32,
    expected_weight_kg: f64,
    min_weight_kg: f64,
    max_weight_kg: f64,
}

impl PlanService {
    pub fn new(db: PgPool, drafts: Option<DraftCache>) -> Self {
        let profiles = ProfileService::new(db.clone());
        Self {
            db,
            profiles,
            drafts,
        }
    }

    /// Generates a proposed plan for the user and persists it as a cyclic
    /// template plus initial overrides and checkpoints. One atomic call:
    /// either the complete bundle lands or nothing does.
    pub async fn generate_plan(
        &self,
        user_id: Uuid,
        request: PlanRequest,
    ) -> Result<StoredPlan, CoachError> {
        let profile = self.profiles.require_profile(user_id).await?;
        let preferences = self.profiles.require_preferences(user_id).await?;

        let bundle = plan_assembler::assemble(&profile, &preferences, &request);
        let (template, overrides) = plan_renderer::templatize(&bundle, profile.weight_kg);
        let plan_id = template.plan_id;

        let mut tx = self.db.begin().await?;

        // A regenerated proposal supersedes any earlier one.
        sqlx::query(
            "UPDATE plans SET status = 'inactive', updated_at = $2
             WHERE user_id = $1 AND status = 'proposed'",
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO plans (
                id, user_id, status, goal_type, start_date, end_date,
                calorie_target, protein_g, carbs_g, fat_g, step_goal, tdee,
                calorie_formula, low_confidence, weight_kg, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $16)
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .bind(PlanStatus::Proposed)
        .bind(bundle.targets.goal_type)
        .bind(bundle.start_date)
        .bind(bundle.end_date)
        .bind(bundle.targets.calorie_target)
        .bind(bundle.targets.macros.protein_g)
        .bind(bundle.targets.macros.carbs_g)
        .bind(bundle.targets.macros.fat_g)
        .bind(bundle.targets.step_goal)
        .bind(bundle.targets.tdee)
        .bind(&bundle.targets.calorie_formula)
        .bind(bundle.targets.low_confidence)
        .bind(profile.weight_kg)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        for day in &template.days {
            sqlx::query(
                "INSERT INTO plan_template_days (id, plan_id, day_index, workout, calorie_delta)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::new_v4())
            .bind(plan_id)
            .bind(day.day_index)
            .bind(Json(&day.workout))
            .bind(day.calorie_delta)
            .execute(&mut *tx)
            .await?;
        }

        for entry in &overrides {
            self.insert_override(&mut tx, plan_id, entry).await?;
        }

        for checkpoint in &bundle.checkpoints {
            sqlx::query(
                "INSERT INTO plan_checkpoints
                     (id, plan_id, week, expected_weight_kg, min_weight_kg, max_weight_kg)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(Uuid::new_v4())
            .bind(plan_id)
            .bind(checkpoint.week)
            .bind(checkpoint.expected_weight_kg)
            .bind(checkpoint.min_weight_kg)
            .bind(checkpoint.max_weight_kg)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        if let Some(drafts) = &self.drafts {
            if let Err(e) = drafts.set(&bundle).await {
                warn!("failed to cache draft plan for {user_id}: {e}");
            }
        }

        Ok(StoredPlan { plan_id, bundle })
    }

    /// Activates a proposed plan. The prior active plan is deactivated in
    /// the same transaction, keeping at most one active plan per user.
    pub async fn approve_plan(&self, user_id: Uuid, plan_id: Uuid) -> Result<(), CoachError> {
        let mut tx = self.db.begin().await?;

        sqlx::query(
            "UPDATE plans SET status = 'inactive', updated_at = $2
             WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query(
            "UPDATE plans SET status = 'active', updated_at = $3
             WHERE id = $1 AND user_id = $2 AND status = 'proposed'",
        )
        .bind(plan_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Rolls back the deactivation as well.
            return Err(CoachError::PlanNotFound(plan_id));
        }

        tx.commit().await?;

        if let Some(drafts) = &self.drafts {
            if let Err(e) = drafts.invalidate(user_id).await {
                warn!("failed to invalidate draft cache for {user_id}: {e}");
            }
        }

        Ok(())
    }

    /// Reconstructs a stored plan into its full bundle shape.
    pub async fn get_plan(&self, user_id: Uuid, plan_id: Uuid) -> Result<StoredPlan, CoachError> {
        let row = sqlx::query_as::<_, PlanRow>(
            "SELECT id, user_id, status, goal_type, start_date, end_date,
                    calorie_target, protein_g, carbs_g, fat_g, step_goal, tdee,
                    calorie_formula, low_confidence, weight_kg
             FROM plans WHERE id = $1 AND user_id = $2",
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(CoachError::PlanNotFound(plan_id))?;

        self.row_to_stored_plan(row).await
    }

    /// Concrete days of the user's active plan over `[from, to]`, rendered
    /// from the stored template and overrides on demand.
    pub async fn render_active_days(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PlanDay>, CoachError> {
        let (template, overrides) = self.load_active_template(user_id).await?;
        let from = from.max(template.start_date);
        let to = to.min(template.end_date);
        Ok(plan_renderer::render(&template, &overrides, from, to))
    }

    /// Extends the active plan's end date, pausing the covered days.
    pub async fn shift_active_plan_end(
        &self,
        user_id: Uuid,
        shift: EndDateShift,
    ) -> Result<NaiveDate, CoachError> {
        let (mut template, mut overrides) = self.load_active_template(user_id).await?;

        plan_patch::shift_end_date(&mut template, &mut overrides, &shift);

        let mut tx = self.db.begin().await?;
        sqlx::query("UPDATE plans SET end_date = $2, updated_at = $3 WHERE id = $1")
            .bind(template.plan_id)
            .bind(template.end_date)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        // Upserting the whole set covers both new pause days and pause days
        // that replaced an existing override.
        for entry in &overrides {
            self.insert_override(&mut tx, template.plan_id, entry).await?;
        }
        tx.commit().await?;

        Ok(template.end_date)
    }

    /// Applies a workout substitution to every future training day of the
    /// active plan, persisting the resulting overrides.
    pub async fn replace_active_workouts(
        &self,
        user_id: Uuid,
        replacement: WorkoutReplacement,
    ) -> Result<usize, CoachError> {
        let (template, overrides) = self.load_active_template(user_id).await?;
        let patches = plan_patch::replace_workouts(&template, &overrides, &replacement);

        let mut tx = self.db.begin().await?;
        for entry in &patches {
            self.insert_override(&mut tx, template.plan_id, entry).await?;
        }
        tx.commit().await?;

        Ok(patches.len())
    }

    async fn insert_override(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        plan_id: Uuid,
        entry: &PlanOverride,
    ) -> Result<(), CoachError> {
        // Last write wins per (plan, date).
        sqlx::query(
            r#"
            INSERT INTO plan_overrides
                (id, plan_id, date, override_type, workout, calorie_target, calorie_delta)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (plan_id, date) DO UPDATE SET
                override_type = EXCLUDED.override_type,
                workout = EXCLUDED.workout,
                calorie_target = EXCLUDED.calorie_target,
                calorie_delta = EXCLUDED.calorie_delta
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(plan_id)
        .bind(entry.date)
        .bind(entry.override_type)
        .bind(entry.workout.as_ref().map(Json))
        .bind(entry.calorie_target)
        .bind(entry.calorie_delta)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn load_active_template(
        &self,
        user_id: Uuid,
    ) -> Result<(PlanTemplate, Vec<PlanOverride>), CoachError> {
        let row = sqlx::query_as::<_, PlanRow>(
            "SELECT id, user_id, status, goal_type, start_date, end_date,
                    calorie_target, protein_g, carbs_g, fat_g, step_goal, tdee,
                    calorie_formula, low_confidence, weight_kg
             FROM plans WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(CoachError::NoActivePlan(user_id))?;

        let template = self.load_template(&row).await?;
        let overrides = self.load_overrides(row.id).await?;
        Ok((template, overrides))
    }

    async fn load_template(&self, row: &PlanRow) -> Result<PlanTemplate, CoachError> {
        let days = sqlx::query_as::<_, TemplateDayRow>(
            "SELECT day_index, workout, calorie_delta
             FROM plan_template_days WHERE plan_id = $1 ORDER BY day_index",
        )
        .bind(row.id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|day| TemplateDay {
            day_index: day.day_index,
            workout: day.workout.0,
            calorie_delta: day.calorie_delta,
        })
        .collect();

        Ok(PlanTemplate {
            plan_id: row.id,
            user_id: row.user_id,
            goal_type: row.goal_type,
            weight_kg: row.weight_kg,
            start_date: row.start_date,
            end_date: row.end_date,
            default_calorie_target: row.calorie_target,
            default_macros: MacroTargets {
                protein_g: row.protein_g,
                carbs_g: row.carbs_g,
                fat_g: row.fat_g,
            },
            days,
        })
    }

    async fn load_overrides(&self, plan_id: Uuid) -> Result<Vec<PlanOverride>, CoachError> {
        let overrides = sqlx::query_as::<_, OverrideRow>(
            "SELECT date, override_type, workout, calorie_target, calorie_delta
             FROM plan_overrides WHERE plan_id = $1 ORDER BY date",
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| PlanOverride {
            date: row.date,
            override_type: row.override_type,
            workout: row.workout.map(|w| w.0),
            calorie_target: row.calorie_target,
            calorie_delta: row.calorie_delta,
        })
        .collect();

        Ok(overrides)
    }

    async fn load_checkpoints(&self, plan_id: Uuid) -> Result<Vec<WeightCheckpoint>, CoachError> {
        let checkpoints = sqlx::query_as::<_, CheckpointRow>(
            "SELECT week, expected_weight_kg, min_weight_kg, max_weight_kg
             FROM plan_checkpoints WHERE plan_id = $1 ORDER BY week",
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| WeightCheckpoint {
            week: row.week,
            expected_weight_kg: row.expected_weight_kg,
            min_weight_kg: row.min_weight_kg,
            max_weight_kg: row.max_weight_kg,
        })
        .collect();

        Ok(checkpoints)
    }

    async fn row_to_stored_plan(&self, row: PlanRow) -> Result<StoredPlan, CoachError> {
        let template = self.load_template(&row).await?;
        let overrides = self.load_overrides(row.id).await?;
        let checkpoints = self.load_checkpoints(row.id).await?;

        let days = plan_renderer::render(&template, &overrides, row.start_date, row.end_date);
        let cycle = template.days.iter().map(|d| d.workout.clone()).collect();

        Ok(StoredPlan {
            plan_id: row.id,
            bundle: PlanBundle {
                user_id: row.user_id,
                status: row.status,
                start_date: row.start_date,
                end_date: row.end_date,
                targets: PlanTargets {
                    goal_type: row.goal_type,
                    calorie_target: row.calorie_target,
                    macros: template.default_macros,
                    step_goal: row.step_goal,
                    tdee: row.tdee,
                    calorie_formula: row.calorie_formula,
                    low_confidence: row.low_confidence,
                },
                cycle,
                days,
                checkpoints,
            },
        })
    }

    /// Cached draft for the user, if the fast path is configured and warm.
    pub async fn get_draft(&self, user_id: Uuid) -> Result<Option<PlanBundle>, CoachError> {
        match &self.drafts {
            Some(drafts) => drafts.get(user_id).await,
            None => Ok(None),
        }
    }
}
