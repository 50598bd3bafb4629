//! Lazy, retrying owner of the process's single connection pool.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, RwLock};
use tokio::time::sleep;

use crate::config::RunMode;

use super::{DatabaseBackend, DbError, HealthResult, PoolConfig, PoolHandle, RetryPolicy};

/// Owns the lifecycle of one connection pool.
///
/// The pool is built on first use, shared by every caller thereafter, and
/// rebuilt from scratch after a pool-level fault (production mode) or a
/// shutdown. Callers must re-resolve the pool through the manager on every
/// operation rather than caching it, so a replaced pool is picked up
/// transparently.
///
/// Handles are cheap clones sharing one state; clone freely into tasks and
/// request handlers.
pub struct ConnectionManager<B: DatabaseBackend> {
    inner: Arc<Inner<B>>,
}

struct Inner<B: DatabaseBackend> {
    backend: B,
    config: PoolConfig,
    retry: RetryPolicy,
    run_mode: RunMode,
    pool: RwLock<Option<B::Pool>>,
    // Serializes the construction path so concurrent first-callers build
    // exactly one pool between them.
    init_lock: Mutex<()>,
}

impl<B: DatabaseBackend> Clone for ConnectionManager<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: DatabaseBackend> ConnectionManager<B> {
    pub fn new(backend: B, config: PoolConfig, run_mode: RunMode) -> Self {
        Self::with_retry(backend, config, run_mode, RetryPolicy::default())
    }

    pub fn with_retry(
        backend: B,
        config: PoolConfig,
        run_mode: RunMode,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                config,
                retry,
                run_mode,
                pool: RwLock::new(None),
                init_lock: Mutex::new(()),
            }),
        }
    }

    /// Resolve the pool, building it if this process has none yet.
    ///
    /// Idempotent: with a pool already established this is a lock-read and
    /// a clone, no network traffic. The construction path attempts up to
    /// `retry.max_attempts` connections with linear backoff between them;
    /// exhausting the budget is an error the caller must surface, not
    /// swallow.
    pub async fn initialize(&self) -> Result<B::Pool, DbError> {
        if let Some(pool) = self.inner.pool.read().await.clone() {
            return Ok(pool);
        }

        let _guard = self.inner.init_lock.lock().await;

        // A concurrent caller may have finished while we waited.
        if let Some(pool) = self.inner.pool.read().await.clone() {
            return Ok(pool);
        }

        let retry = &self.inner.retry;
        let mut last_error = None;

        for attempt in 1..=retry.max_attempts {
            if let Some(delay) = retry.delay_before(attempt) {
                tracing::info!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying database connection"
                );
                sleep(delay).await;
            }

            match self.try_connect().await {
                Ok(pool) => {
                    *self.inner.pool.write().await = Some(pool.clone());
                    tracing::info!(attempt, "database connection established");
                    return Ok(pool);
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = retry.max_attempts,
                        error = %e,
                        "database connection attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no connection attempts were made".to_string());

        tracing::error!(
            attempts = retry.max_attempts,
            error = %message,
            "database initialization failed"
        );

        Err(DbError::Unavailable {
            attempts: retry.max_attempts,
            message,
        })
    }

    /// One connection attempt: build the pool and verify it with a
    /// liveness query before publishing it.
    async fn try_connect(&self) -> Result<B::Pool, DbError> {
        let pool = self.inner.backend.connect(&self.inner.config).await?;

        if let Err(e) = pool.ping().await {
            pool.close().await;
            return Err(e);
        }

        Ok(pool)
    }

    /// Resolve the current pool, initializing on demand.
    pub async fn pool(&self) -> Result<B::Pool, DbError> {
        self.initialize().await
    }

    /// Check one connection out of the pool. The connection returns to the
    /// pool when the guard is dropped, on every exit path.
    pub async fn acquire(&self) -> Result<<B::Pool as PoolHandle>::Connection, DbError> {
        let pool = self.initialize().await?;
        pool.acquire().await
    }

    /// Run `operation` against the pool, retrying only server-initiated
    /// disconnects.
    ///
    /// An admin-shutdown SQLSTATE means the endpoint dropped the connection
    /// before the statement ran, so re-issuing is safe; any other error is
    /// propagated after the first attempt since retrying a failed statement
    /// could duplicate its side effects.
    pub async fn query_with_retry<T, F, Fut>(&self, mut operation: F) -> Result<T, DbError>
    where
        F: FnMut(B::Pool) -> Fut,
        Fut: Future<Output = Result<T, DbError>>,
    {
        let retry = &self.inner.retry;
        let mut last_error = None;

        for attempt in 1..=retry.max_attempts {
            if let Some(delay) = retry.delay_before(attempt) {
                sleep(delay).await;
            }

            let pool = self.initialize().await?;

            match operation(pool).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_admin_shutdown() && attempt < retry.max_attempts => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        "server closed the connection, retrying query"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        // Unreachable with max_attempts >= 1; kept for completeness.
        Err(last_error.unwrap_or_else(|| DbError::Connection("query retries exhausted".into())))
    }

    /// Probe the database and report the outcome without failing.
    ///
    /// Latency covers the whole probe from call start, including pool
    /// resolution and connection acquisition, and is reported even when the
    /// probe fails partway through.
    pub async fn check_health(&self) -> HealthResult {
        let start = Instant::now();

        let probe = async {
            let pool = self.initialize().await?;
            pool.ping().await
        };

        match probe.await {
            Ok(()) => HealthResult::healthy(start.elapsed()),
            Err(e) => {
                tracing::warn!(error = %e, "database health check failed");
                HealthResult::unhealthy(start.elapsed(), e)
            }
        }
    }

    /// Whether a pool is currently established, without forcing
    /// initialization.
    pub async fn is_established(&self) -> bool {
        self.inner.pool.read().await.is_some()
    }

    /// React to an out-of-band pool fault (e.g. the endpoint dropped an
    /// idle connection).
    ///
    /// In production the stored pool is discarded so the next caller
    /// rebuilds it, and a detached warm-up task re-initializes eagerly; the
    /// task's failure is logged, never surfaced, since nothing awaits it.
    /// Outside production the fault is logged and the state left alone, so
    /// a misconfigured environment stays visible during development.
    pub async fn handle_pool_error(&self, error: &DbError) {
        if self.inner.run_mode != RunMode::Production {
            tracing::warn!(error = %error, "pool fault (auto-heal disabled outside production)");
            return;
        }

        tracing::error!(error = %error, "pool fault, discarding connection state");
        self.inner.pool.write().await.take();

        let manager = self.clone();
        tokio::spawn(async move {
            if let Err(e) = manager.initialize().await {
                tracing::error!(error = %e, "background reinitialization failed");
            }
        });
    }

    /// Close the pool and clear the state. Safe to call repeatedly and
    /// before any pool exists.
    pub async fn shutdown(&self) {
        if let Some(pool) = self.inner.pool.write().await.take() {
            pool.close().await;
            tracing::info!("database pool closed");
        }
    }
}
