//! Composition utilities for building the configuration service with
//! `SQLite` backends.
//!
//! This module provides factory functions for wiring up the application
//! with `SQLite` repositories. It is focused purely on construction and
//! should not contain any domain logic.

use sqlx::SqlitePool;
use std::sync::Arc;

use confhub_core::{ChangeNotifier, ConfigService};

use crate::repositories::SqliteParameterRepository;

/// Factory for creating repository instances with `SQLite` backends.
pub struct CoreFactory;

impl CoreFactory {
    /// Create a parameter repository from a pool.
    pub fn parameter_repository(pool: SqlitePool) -> Arc<SqliteParameterRepository> {
        Arc::new(SqliteParameterRepository::new(pool))
    }

    /// Build a `ConfigService` over `SQLite` storage and the given notifier.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use confhub_db::{CoreFactory, setup_database};
    ///
    /// let pool = setup_database(&db_path).await?;
    /// let service = CoreFactory::build_config_service(pool, notifier);
    /// ```
    pub fn build_config_service(
        pool: SqlitePool,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> ConfigService {
        ConfigService::new(Self::parameter_repository(pool), notifier)
    }
}

/// Test database helper for integration tests.
///
/// Provides an in-memory `SQLite` database with the production schema applied.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    /// Create a new in-memory test database with full schema.
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create a parameter repository using this test database.
    pub fn parameter_repository(&self) -> SqliteParameterRepository {
        SqliteParameterRepository::new(self.pool.clone())
    }

    /// Build a `ConfigService` over this test database.
    pub fn config_service(&self, notifier: Arc<dyn ChangeNotifier>) -> ConfigService {
        CoreFactory::build_config_service(self.pool.clone(), notifier)
    }
}
