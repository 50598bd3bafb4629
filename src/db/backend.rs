//! Backing-store abstraction for the connection manager.

use async_trait::async_trait;

use super::{DbError, PoolConfig};

/// A source of connection pools. The production implementation is
/// [`super::PostgresBackend`]; tests substitute scripted fakes.
#[async_trait]
pub trait DatabaseBackend: Send + Sync + 'static {
    type Pool: PoolHandle;

    /// Construct a new pool from the given parameters. Called by the
    /// manager's retry loop; each call is one connection attempt.
    async fn connect(&self, config: &PoolConfig) -> Result<Self::Pool, DbError>;
}

/// A live pool. Handles are cheap clones sharing one underlying pool, so
/// callers re-resolve through the manager instead of caching connections.
#[async_trait]
pub trait PoolHandle: Clone + Send + Sync + 'static {
    /// A checked-out connection, returned to the pool when dropped.
    type Connection: Send;

    /// Check one connection out of the pool.
    async fn acquire(&self) -> Result<Self::Connection, DbError>;

    /// Liveness probe: acquire a connection, run a trivial query, release.
    async fn ping(&self) -> Result<(), DbError>;

    /// Close the pool and release its connection.
    async fn close(&self);
}
