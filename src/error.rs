use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy for the coaching core and its storage collaborators.
///
/// Missing rows and malformed dates are hard errors; out-of-range numeric
/// input is normalized by the engine instead of surfacing here.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error("profile not found for user {0}")]
    ProfileNotFound(Uuid),

    #[error("goal preferences not found for user {0}")]
    PreferencesNotFound(Uuid),

    #[error("plan {0} not found")]
    PlanNotFound(Uuid),

    #[error("no active plan for user {0}")]
    NoActivePlan(Uuid),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
