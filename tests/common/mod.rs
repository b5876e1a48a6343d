//! Common test utilities and helpers
//!
//! Every test gets its own in-memory database with migrations applied.

#![allow(dead_code)]

use model_registry_core::Entity;
use model_registry_db::{create_pool, PoolConfig, SqliteEntityRepository, SqlitePool};
use std::path::{Path, PathBuf};

pub mod fixtures;

/// Fresh in-memory store with the seeded Types
pub async fn setup_test_database() -> SqlitePool {
    create_pool(&PoolConfig::in_memory())
        .await
        .expect("Failed to create in-memory database")
}

/// Repository for `E` over `pool`, resolved by type name
pub async fn repository<E: Entity>(pool: &SqlitePool) -> SqliteEntityRepository<E> {
    SqliteEntityRepository::for_type(pool.clone())
        .await
        .expect("Failed to resolve repository type")
}

/// Write `contents` to `name` under `dir` and return the full path
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}
