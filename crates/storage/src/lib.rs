use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod dto;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use error::{Result, StorageError};
pub use store::{ContentSource, RatingStore};

/// Handle to the PostgreSQL pool shared by every repository.
///
/// Built once at process start and handed to the web layer; each store
/// operation run through it is bounded by `operation_timeout`.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    operation_timeout: Duration,
}

impl Database {
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        operation_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(operation_timeout)
            .connect(database_url)
            .await?;

        Ok(Self::from_pool(pool, operation_timeout))
    }

    pub fn from_pool(pool: PgPool, operation_timeout: Duration) -> Self {
        Self {
            pool,
            operation_timeout,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
