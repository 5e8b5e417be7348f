use std::sync::Arc;

use crate::{config::Config, database::DbPool};

/// Application state shared across all HTTP handlers
///
/// Holds the database pool and the loaded configuration (the JWT secret is
/// read from here by the auth middleware on every request).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing the database
    pub pool: DbPool,
    /// Application configuration, loaded once at startup
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
