//! sqlx-backed Postgres implementation of the backend traits.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{DatabaseBackend, DbError, PoolConfig, PoolHandle};

/// Connects to a Postgres endpoint via sqlx.
#[derive(Debug, Clone, Default)]
pub struct PostgresBackend;

#[async_trait]
impl DatabaseBackend for PostgresBackend {
    type Pool = PgPool;

    async fn connect(&self, config: &PoolConfig) -> Result<Self::Pool, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(PoolConfig::MAX_CONNECTIONS)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(&config.url)
            .await?;

        Ok(pool)
    }
}

#[async_trait]
impl PoolHandle for PgPool {
    type Connection = sqlx::pool::PoolConnection<sqlx::Postgres>;

    async fn acquire(&self) -> Result<Self::Connection, DbError> {
        let conn = PgPool::acquire(self).await?;
        Ok(conn)
    }

    async fn ping(&self) -> Result<(), DbError> {
        let mut conn = PgPool::acquire(self).await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    async fn close(&self) {
        PgPool::close(self).await;
    }
}
