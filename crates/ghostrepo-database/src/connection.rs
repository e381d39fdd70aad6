//! PostgreSQL pool setup for the durable stores.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use url::Url;

use ghostrepo_core::config::DatabaseConfig;
use ghostrepo_core::error::{AppError, ErrorKind};
use ghostrepo_core::result::AppResult;

/// Open a pool sized and timed from `[database]`.
pub async fn open_pool(config: &DatabaseConfig) -> AppResult<PgPool> {
    info!(
        url = %redact_url(&config.url),
        max_connections = config.max_connections,
        "Opening PostgreSQL pool"
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Cannot reach PostgreSQL", e))
}

/// Round-trip a trivial query.
pub async fn ping(pool: &PgPool) -> AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| AppError::with_source(ErrorKind::Database, "PostgreSQL ping failed", e))
}

/// The URL with its password blanked, safe for logs.
fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.to_string()
        }
        Err(_) => "<unparseable>".to_string(),
    }
}
