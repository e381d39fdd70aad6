//! Backend selection for the share and unlock stores.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use ghostrepo_core::config::DatabaseConfig;
use ghostrepo_core::result::AppResult;

use crate::connection::{open_pool, ping};
use crate::memory::{MemoryShareLinkStore, MemoryUnlockStore};
use crate::migration::run_migrations;
use crate::postgres::{ShareLinkRepository, UnlockRepository};
use crate::store::{ShareLinkStore, UnlockStore};

/// The configured storage backend.
///
/// The backend is selected at construction time from the database URL:
/// `memory://` selects the in-process store, anything else is treated as a
/// PostgreSQL URL.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Share link registry storage.
    pub shares: Arc<dyn ShareLinkStore>,
    /// Unlock ledger storage.
    pub unlocks: Arc<dyn UnlockStore>,
    /// Connection pool, absent for the in-process backend.
    pub pool: Option<PgPool>,
}

impl Stores {
    /// Connect to the configured backend and run migrations when needed.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            info!("Initializing in-memory store");
            return Ok(Self::memory());
        }

        let pool = open_pool(config).await?;
        run_migrations(&pool).await?;

        Ok(Self {
            shares: Arc::new(ShareLinkRepository::new(pool.clone())),
            unlocks: Arc::new(UnlockRepository::new(pool.clone())),
            pool: Some(pool),
        })
    }

    /// Fresh in-process stores.
    pub fn memory() -> Self {
        Self {
            shares: Arc::new(MemoryShareLinkStore::new()),
            unlocks: Arc::new(MemoryUnlockStore::new()),
            pool: None,
        }
    }

    /// Check backend connectivity.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => ping(pool).await.map(|()| true),
            None => Ok(true),
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("PostgreSQL pool closed");
        }
    }
}
