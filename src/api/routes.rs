use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::health::health_check;
use super::plans::plan_routes;
use super::profile::profile_routes;
use crate::services::{DraftCache, PlanService, ProfileService};

pub fn create_routes(db: PgPool, drafts: Option<DraftCache>) -> Router {
    let plan_service = PlanService::new(db.clone(), drafts);
    let profile_service = ProfileService::new(db);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/users/:user_id/plans", plan_routes(plan_service))
        .nest("/api/users/:user_id/profile", profile_routes(profile_service))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
