use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoachError;
use crate::models::{MovementPattern, PlanBundle, PlanDay, PlanRequest};
use crate::services::plan_patch::{EndDateShift, WorkoutReplacement};
use crate::services::plan_service::StoredPlan;
use crate::services::PlanService;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error_code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            error_code: code.to_string(),
            message: message.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

pub fn into_response(error: CoachError) -> (StatusCode, Json<ApiError>) {
    match &error {
        CoachError::ProfileNotFound(_)
        | CoachError::PreferencesNotFound(_)
        | CoachError::PlanNotFound(_)
        | CoachError::NoActivePlan(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new("NOT_FOUND", &error.to_string())),
        ),
        CoachError::InvalidDate(_) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("INVALID_DATE", &error.to_string())),
        ),
        _ => {
            tracing::error!("plan request failed: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("INTERNAL_ERROR", "request failed")),
            )
        }
    }
}

#[derive(Clone)]
pub struct PlanAppState {
    pub plan_service: PlanService,
}

pub fn plan_routes(plan_service: PlanService) -> Router {
    let state = PlanAppState { plan_service };

    Router::new()
        .route("/", post(generate_plan))
        .route("/draft", get(get_draft))
        .route("/active/days", get(get_active_days))
        .route("/active/shift-end", post(shift_end))
        .route("/active/replace-workout", post(replace_workout))
        .route("/:plan_id", get(get_plan))
        .route("/:plan_id/approve", post(approve_plan))
        .with_state(state)
}

/// Generate a proposed plan from the user's profile and preferences.
pub async fn generate_plan(
    State(state): State<PlanAppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<PlanRequest>,
) -> ApiResult<StoredPlan> {
    let stored = state
        .plan_service
        .generate_plan(user_id, request)
        .await
        .map_err(into_response)?;
    Ok(Json(stored))
}

/// Cached draft bundle, if the fast path is configured and warm.
pub async fn get_draft(
    State(state): State<PlanAppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Option<PlanBundle>> {
    let draft = state
        .plan_service
        .get_draft(user_id)
        .await
        .map_err(into_response)?;
    Ok(Json(draft))
}

pub async fn get_plan(
    State(state): State<PlanAppState>,
    Path((user_id, plan_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StoredPlan> {
    let stored = state
        .plan_service
        .get_plan(user_id, plan_id)
        .await
        .map_err(into_response)?;
    Ok(Json(stored))
}

/// Promote a proposed plan to active; the prior active plan is retired in
/// the same transaction.
pub async fn approve_plan(
    State(state): State<PlanAppState>,
    Path((user_id, plan_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<serde_json::Value> {
    state
        .plan_service
        .approve_plan(user_id, plan_id)
        .await
        .map_err(into_response)?;
    Ok(Json(serde_json::json!({ "approved": plan_id })))
}

#[derive(Debug, Deserialize)]
pub struct DayRangeQuery {
    pub from: String,
    pub to: String,
}

/// Range dates cross the query-string boundary as text; anything that is
/// not an ISO calendar date is a hard error, not recovered.
fn parse_date(value: &str) -> Result<NaiveDate, CoachError> {
    value
        .parse()
        .map_err(|_| CoachError::InvalidDate(value.to_string()))
}

pub async fn get_active_days(
    State(state): State<PlanAppState>,
    Path(user_id): Path<Uuid>,
    Query(range): Query<DayRangeQuery>,
) -> ApiResult<Vec<PlanDay>> {
    let from = parse_date(&range.from).map_err(into_response)?;
    let to = parse_date(&range.to).map_err(into_response)?;
    let days = state
        .plan_service
        .render_active_days(user_id, from, to)
        .await
        .map_err(into_response)?;
    Ok(Json(days))
}

#[derive(Debug, Deserialize)]
pub struct ShiftEndRequest {
    pub shift_days: i32,
    #[serde(default)]
    pub pause_start: Option<NaiveDate>,
    #[serde(default)]
    pub pause_calorie_delta: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ShiftEndResponse {
    pub new_end_date: NaiveDate,
}

pub async fn shift_end(
    State(state): State<PlanAppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<ShiftEndRequest>,
) -> ApiResult<ShiftEndResponse> {
    let shift = EndDateShift {
        shift_days: request.shift_days,
        pause_start: request.pause_start,
        pause_calorie_delta: request.pause_calorie_delta.unwrap_or(0),
    };
    let new_end_date = state
        .plan_service
        .shift_active_plan_end(user_id, shift)
        .await
        .map_err(into_response)?;
    Ok(Json(ShiftEndResponse { new_end_date }))
}

#[derive(Debug, Deserialize)]
pub struct ReplaceWorkoutRequest {
    pub pattern: MovementPattern,
    pub preferred_exercises: Vec<String>,
    #[serde(default)]
    pub reduce_intensity: bool,
    #[serde(default)]
    pub preferred_cardio: Option<String>,
    pub effective_from: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ReplaceWorkoutResponse {
    pub days_updated: usize,
}

pub async fn replace_workout(
    State(state): State<PlanAppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<ReplaceWorkoutRequest>,
) -> ApiResult<ReplaceWorkoutResponse> {
    let replacement = WorkoutReplacement {
        pattern: request.pattern,
        preferred_exercises: request.preferred_exercises,
        reduce_intensity: request.reduce_intensity,
        preferred_cardio: request.preferred_cardio,
        effective_from: request.effective_from,
    };
    let days_updated = state
        .plan_service
        .replace_active_workouts(user_id, replacement)
        .await
        .map_err(into_response)?;
    Ok(Json(ReplaceWorkoutResponse { days_updated }))
}
