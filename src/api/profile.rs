use axum::{
    extract::{Path, State},
    routing::{get, put},
    response::Json,
    Router,
};
use uuid::Uuid;

use crate::models::{
    GoalPreferences, UpsertPreferencesRequest, UpsertProfileRequest, UserProfile,
};
use crate::services::ProfileService;

use super::plans::{into_response, ApiResult};

#[derive(Clone)]
pub struct ProfileAppState {
    pub profile_service: ProfileService,
}

pub fn profile_routes(profile_service: ProfileService) -> Router {
    let state = ProfileAppState { profile_service };

    Router::new()
        .route("/", get(get_profile).put(upsert_profile))
        .route("/preferences", put(upsert_preferences))
        .with_state(state)
}

pub async fn get_profile(
    State(state): State<ProfileAppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<UserProfile> {
    let profile = state
        .profile_service
        .require_profile(user_id)
        .await
        .map_err(into_response)?;
    Ok(Json(profile))
}

pub async fn upsert_profile(
    State(state): State<ProfileAppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpsertProfileRequest>,
) -> ApiResult<UserProfile> {
    let profile = state
        .profile_service
        .upsert_profile(user_id, request)
        .await
        .map_err(into_response)?;
    Ok(Json(profile))
}

pub async fn upsert_preferences(
    State(state): State<ProfileAppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpsertPreferencesRequest>,
) -> ApiResult<GoalPreferences> {
    let preferences = state
        .profile_service
        .upsert_preferences(user_id, request)
        .await
        .map_err(into_response)?;
    Ok(Json(preferences))
}
