pub mod directory;
pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod rules;
pub mod services;
pub mod store;

#[cfg(test)]
mod test_support;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use error::{EngineError, EngineResult, StorageError};
pub use store::{CompetitionStore, InMemoryStore};

/// Postgres-backed handle shared by every request. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> error::Result<Self> {
        Self::connect(database_url, 10).await
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> error::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> error::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
