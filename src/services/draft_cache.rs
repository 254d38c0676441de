//! Redis-backed fast path for proposed plan bundles.
//!
//! The cache is an optimization only: every caller must behave identically
//! when it is absent or cold, with the database as the source of truth.

use std::time::Duration;

use redis::AsyncCommands;
use uuid::Uuid;

use crate::error::CoachError;
use crate::models::PlanBundle;

#[derive(Clone)]
pub struct DraftCache {
    client: redis::Client,
    ttl: Duration,
}

impl DraftCache {
    pub fn new(redis_url: &str, ttl: Duration) -> Result<Self, CoachError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client, ttl })
    }

    fn key(user_id: Uuid) -> String {
        format!("plan:draft:{user_id}")
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<PlanBundle>, CoachError> {
        let mut conn = self.client.get_async_connection().await?;
        let payload: Option<String> = conn.get(Self::key(user_id)).await?;
        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub async fn set(&self, bundle: &PlanBundle) -> Result<(), CoachError> {
        let mut conn = self.client.get_async_connection().await?;
        let payload = serde_json::to_string(bundle)?;
        redis::cmd("SETEX")
            .arg(Self::key(bundle.user_id))
            .arg(self.ttl.as_secs())
            .arg(payload)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    pub async fn invalidate(&self, user_id: Uuid) -> Result<(), CoachError> {
        let mut conn = self.client.get_async_connection().await?;
        let _: i64 = conn.del(Self::key(user_id)).await?;
        Ok(())
    }
}
