//! Database layer for the model registry
//!
//! This crate persists the registry's typed entities on SQLite, including:
//! - Connection pool management and embedded migrations
//! - The property store, mapping typed properties onto per-kind side tables
//! - Type lookup for the seeded Type descriptors
//! - A generic repository serving one domain type per instance
//!
//! # Example
//!
//! ```rust,no_run
//! use model_registry_db::{create_pool, EntityRepository, PoolConfig, SqliteEntityRepository};
//! use model_registry_db::model_registry_core::RegisteredModel;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool(&PoolConfig::new("sqlite://registry.db")).await?;
//! let models = SqliteEntityRepository::<RegisteredModel>::for_type(pool).await?;
//!
//! let saved = models
//!     .save(RegisteredModel::new("fraud-detector").property("description", "card fraud"))
//!     .await?;
//! let loaded = models.get_by_id(saved.id.unwrap()).await?;
//! assert_eq!(loaded, saved);
//! # Ok(())
//! # }
//! ```

// Re-export core domain types for convenience
pub use model_registry_core;

// Public modules
pub mod error;
pub mod pool;
pub mod property_store;
pub mod repository;
pub mod schema;
pub mod sqlite;
pub mod type_repository;

// Re-exports for convenience
pub use error::{DbError, DbResult};
pub use pool::{close_pool, create_pool, run_migrations, verify_pool_health, PoolConfig};
pub use property_store::PropertyStore;
pub use repository::{EntityRepository, ListOptions, OrderByField};
pub use sqlite::SqliteEntityRepository;
pub use type_repository::{TypeRecord, TypeRepository};

// Re-export sqlx types that users may need
pub use sqlx::sqlite::SqlitePool;

/// Database layer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default database URL environment variable name
pub const DEFAULT_DATABASE_URL_ENV: &str = "DATABASE_URL";
