//! Database connection lifecycle management.
//!
//! The service talks to a single managed Postgres endpoint through one
//! lazily-built connection pool. [`manager::ConnectionManager`] owns that
//! pool: it initializes it on first use with bounded retries, hands it to
//! callers, recovers from out-of-band pool faults, and tears it down on
//! shutdown. The backing store is abstracted behind [`backend::DatabaseBackend`]
//! so tests can script failures without a live database.

pub mod backend;
pub mod error;
pub mod health;
pub mod manager;
pub mod postgres;
pub mod retry;

pub use backend::{DatabaseBackend, PoolHandle};
pub use error::{DbError, SQLSTATE_ADMIN_SHUTDOWN};
pub use health::HealthResult;
pub use manager::ConnectionManager;
pub use postgres::PostgresBackend;
pub use retry::RetryPolicy;

use std::time::Duration;

use crate::config::DatabaseConfig;

/// Immutable pool construction parameters.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Postgres connection string.
    pub url: String,
    /// Timeout for checking a connection out of the pool.
    pub acquire_timeout: Duration,
    /// Idle time after which the pooled connection is closed.
    pub idle_timeout: Duration,
    /// Maximum lifetime of the pooled connection.
    pub max_lifetime: Duration,
}

impl PoolConfig {
    /// The pool never holds more than one connection. Each process serves
    /// one invocation at a time in the target deployment, and the managed
    /// endpoint meters concurrent connections.
    pub const MAX_CONNECTIONS: u32 = 1;
}

impl From<&DatabaseConfig> for PoolConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            acquire_timeout: Duration::from_secs(config.connect_timeout_seconds),
            idle_timeout: Duration::from_secs(config.idle_timeout_seconds),
            max_lifetime: Duration::from_secs(config.max_lifetime_seconds),
        }
    }
}
