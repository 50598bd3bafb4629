use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::db::{ConnectionManager, PoolConfig, PostgresBackend};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: ConnectionManager<PostgresBackend>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let pool_config = PoolConfig::from(&settings.database);
        let db = ConnectionManager::new(PostgresBackend, pool_config, settings.run_mode);

        Self {
            settings: Arc::new(settings),
            db,
            start_time: Instant::now(),
        }
    }
}
