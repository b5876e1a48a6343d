//! Database connection pool management
//!
//! This module provides connection pooling for SQLite using SQLx's built-in
//! pooling capabilities with additional configuration and health checking.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{storage, DbError, DbResult};

/// Default minimum number of connections in the pool
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;

/// Default maximum number of connections in the pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default connection timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default idle timeout in seconds (10 minutes)
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default maximum lifetime for a connection (30 minutes)
pub const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// Configuration for database connection pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Database URL (e.g., sqlite://model-registry.db)
    pub database_url: String,

    /// Minimum number of connections to maintain in the pool
    pub min_connections: u32,

    /// Maximum number of connections allowed in the pool
    pub max_connections: u32,

    /// Timeout for establishing a new connection
    pub connect_timeout: Duration,

    /// Idle timeout; `None` keeps idle connections open
    pub idle_timeout: Option<Duration>,

    /// Maximum lifetime of a connection; `None` never recycles
    pub max_lifetime: Option<Duration>,

    /// Whether to enable SQL statement logging
    pub enable_logging: bool,

    /// Whether to run migrations on startup
    pub run_migrations: bool,
}

impl PoolConfig {
    /// Create a new pool configuration with sensible defaults
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            min_connections: DEFAULT_MIN_CONNECTIONS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            idle_timeout: Some(Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS)),
            max_lifetime: Some(Duration::from_secs(DEFAULT_MAX_LIFETIME_SECS)),
            enable_logging: false,
            run_migrations: true,
        }
    }

    /// Single-connection in-memory database.
    ///
    /// Every SQLite in-memory connection is a separate database, so the pool
    /// is pinned to one connection that is never closed.
    pub fn in_memory() -> Self {
        Self {
            min_connections: 1,
            max_connections: 1,
            idle_timeout: None,
            max_lifetime: None,
            ..Self::new("sqlite::memory:")
        }
    }

    /// Set minimum connections
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Set maximum connections
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set idle timeout
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set maximum connection lifetime
    pub fn max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    /// Enable or disable SQL logging
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable automatic migrations
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> DbResult<()> {
        if self.database_url.is_empty() {
            return Err(DbError::Configuration(
                "Database URL cannot be empty".to_string(),
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(DbError::Configuration(format!(
                "min_connections ({}) cannot be greater than max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }

        if self.max_connections == 0 {
            return Err(DbError::Configuration(
                "max_connections must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new("sqlite://model-registry.db")
    }
}

/// Create a SQLite connection pool from configuration
pub async fn create_pool(config: &PoolConfig) -> DbResult<SqlitePool> {
    config.validate()?;

    info!(
        "Creating database connection pool: min={}, max={}, database={}",
        config.min_connections, config.max_connections, config.database_url
    );

    let mut connect_opts = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| DbError::Configuration(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    // sqlx logs statements at debug level unless disabled
    if !config.enable_logging {
        connect_opts = connect_opts.disable_statement_logging();
    }

    let pool = SqlitePoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect_with(connect_opts)
        .await
        .map_err(storage("creating connection pool"))?;

    info!("Database connection pool created successfully");

    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    verify_pool_health(&pool).await?;

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Running database migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| DbError::Migration(format!("Migration failed: {}", e)))?;

    info!("Database migrations completed successfully");
    Ok(())
}

/// Verify that the connection pool is healthy
pub async fn verify_pool_health(pool: &SqlitePool) -> DbResult<()> {
    debug!("Verifying database pool health");

    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(storage("running health check"))?;

    debug!("Database pool health check passed");
    Ok(())
}

/// Gracefully close the connection pool
pub async fn close_pool(pool: SqlitePool) {
    info!("Closing database connection pool");
    pool.close().await;
    info!("Database connection pool closed");
}
