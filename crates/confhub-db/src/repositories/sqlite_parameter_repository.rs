//! `SQLite` implementation of the `ParameterRepository` trait.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use confhub_core::{Parameter, ParameterRepository, RepositoryError, Scope};

/// `SQLite` implementation of the `ParameterRepository` trait.
///
/// One row per `(scope, name)`. The flat user scope is stored with
/// `has_app = 0` and an empty `app_name`.
pub struct SqliteParameterRepository {
    pool: SqlitePool,
}

impl SqliteParameterRepository {
    /// Create a new `SQLite` parameter repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Ensure the parameters table exists.
    ///
    /// Call this during initialization to set up the schema.
    pub async fn ensure_table(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS parameters (
                user_id TEXT NOT NULL,
                has_app INTEGER NOT NULL,
                app_name TEXT NOT NULL DEFAULT '',
                name TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, has_app, app_name, name)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal row types and helpers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
struct ParameterRow {
    name: String,
    value: String,
}

impl From<ParameterRow> for Parameter {
    fn from(row: ParameterRow) -> Self {
        Self {
            name: row.name,
            value: row.value,
        }
    }
}

/// Column values identifying a scope: `(user_id, has_app, app_name)`.
fn scope_key(scope: &Scope) -> (&str, bool, &str) {
    (
        scope.user_id.as_str(),
        scope.app_name.is_some(),
        scope.app_name().unwrap_or_default(),
    )
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Map `SQLx` errors to `RepositoryError`.
fn storage_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            RepositoryError::Serialization(e.to_string())
        }
        other => RepositoryError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl ParameterRepository for SqliteParameterRepository {
    async fn get(&self, scope: &Scope, name: &str) -> Result<Option<Parameter>, RepositoryError> {
        let (user_id, has_app, app_name) = scope_key(scope);
        let row: Option<ParameterRow> = sqlx::query_as(
            "SELECT name, value FROM parameters \
             WHERE user_id = ? AND has_app = ? AND app_name = ? AND name = ?",
        )
        .bind(user_id)
        .bind(has_app)
        .bind(app_name)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(Parameter::from))
    }

    async fn list(&self, scope: &Scope) -> Result<Vec<Parameter>, RepositoryError> {
        let (user_id, has_app, app_name) = scope_key(scope);
        let rows: Vec<ParameterRow> = sqlx::query_as(
            "SELECT name, value FROM parameters \
             WHERE user_id = ? AND has_app = ? AND app_name = ?",
        )
        .bind(user_id)
        .bind(has_app)
        .bind(app_name)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(Parameter::from).collect())
    }

    async fn list_names(
        &self,
        scope: &Scope,
        names: &[String],
    ) -> Result<Vec<Parameter>, RepositoryError> {
        if names.is_empty() {
            return self.list(scope).await;
        }

        let (user_id, has_app, app_name) = scope_key(scope);
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT name, value FROM parameters WHERE user_id = ");
        builder
            .push_bind(user_id)
            .push(" AND has_app = ")
            .push_bind(has_app)
            .push(" AND app_name = ")
            .push_bind(app_name)
            .push(" AND name IN (");
        let mut separated = builder.separated(", ");
        for name in names {
            separated.push_bind(name.as_str());
        }
        separated.push_unseparated(")");

        let rows: Vec<ParameterRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(rows.into_iter().map(Parameter::from).collect())
    }

    async fn upsert(
        &self,
        scope: &Scope,
        name: &str,
        value: &str,
    ) -> Result<Parameter, RepositoryError> {
        let (user_id, has_app, app_name) = scope_key(scope);
        let row: ParameterRow = sqlx::query_as(
            r#"
            INSERT INTO parameters (user_id, has_app, app_name, name, value, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, has_app, app_name, name)
            DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            RETURNING name, value
            "#,
        )
        .bind(user_id)
        .bind(has_app)
        .bind(app_name)
        .bind(name)
        .bind(value)
        .bind(now())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.into())
    }

    async fn insert_if_absent(
        &self,
        scope: &Scope,
        name: &str,
        value: &str,
    ) -> Result<Parameter, RepositoryError> {
        let (user_id, has_app, app_name) = scope_key(scope);
        sqlx::query(
            r#"
            INSERT INTO parameters (user_id, has_app, app_name, name, value, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, has_app, app_name, name) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(has_app)
        .bind(app_name)
        .bind(name)
        .bind(value)
        .bind(now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        // Parameters are never deleted, so the row is present from here on
        self.get(scope, name).await?.ok_or_else(|| {
            RepositoryError::Unavailable(format!("parameter {name} vanished in scope {scope}"))
        })
    }
}
