use std::time::Duration;

use fit_coach::api::routes::create_routes;
use fit_coach::config::{AppConfig, DatabaseConfig};
use fit_coach::services::DraftCache;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let pool = db_config.create_pool().await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let drafts = match &config.redis_url {
        Some(url) => match DraftCache::new(url, Duration::from_secs(config.draft_ttl_secs)) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("draft cache disabled: {e}");
                None
            }
        },
        None => None,
    };

    let app = create_routes(pool, drafts);

    let listener = TcpListener::bind(config.server_address()).await?;
    info!("fit-coach server starting on http://{}", config.server_address());
    info!("Health check available at http://{}/health", config.server_address());

    axum::serve(listener, app).await?;

    Ok(())
}
