/// Application context and dependency injection
use crate::{
    config::ServerConfig,
    db,
    error::IdentityResult,
    identity::{IdentityService, SqliteClaimStore},
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub identity_db: SqlitePool,
    pub identity_service: Arc<IdentityService>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> IdentityResult<Self> {
        // Validate configuration
        config.validate()?;

        let options = db::DatabaseOptions {
            max_connections: config.storage.max_connections,
            ..Default::default()
        };
        let identity_db = db::create_pool(&config.storage.identity_db, options).await?;

        Self::with_pool(config, identity_db).await
    }

    /// Create a context on an existing pool, running migrations on it
    pub async fn with_pool(config: ServerConfig, identity_db: SqlitePool) -> IdentityResult<Self> {
        db::run_migrations(&identity_db).await?;
        db::test_connection(&identity_db).await?;

        let store = Arc::new(SqliteClaimStore::new(identity_db.clone()));
        let identity_service = Arc::new(
            IdentityService::new(store).with_max_claims_len(config.identity.max_claims_len),
        );

        Ok(Self {
            config: Arc::new(config),
            identity_db,
            identity_service,
        })
    }
}
