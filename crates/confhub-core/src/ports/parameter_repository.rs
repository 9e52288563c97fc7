//! Scoped parameter store trait definition.
//!
//! This port defines the interface for parameter persistence.
//! Implementations handle all storage details internally.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Parameter, Scope};

/// Durable mapping from a scope to its set of named parameters.
///
/// # Contract
///
/// - Reads never fail for a missing scope or name: `get` returns `None`
///   and listings return an empty `Vec`.
/// - `upsert` is atomic per `(scope, name)`: concurrent writers serialize to
///   last-write-wins, without merging values.
/// - Writes to different scopes or names are independent.
/// - The store never publishes notifications itself.
#[async_trait]
pub trait ParameterRepository: Send + Sync {
    /// Point lookup of one parameter.
    async fn get(&self, scope: &Scope, name: &str) -> Result<Option<Parameter>, RepositoryError>;

    /// All parameters of a scope, in no particular order.
    async fn list(&self, scope: &Scope) -> Result<Vec<Parameter>, RepositoryError>;

    /// Parameters of a scope restricted to `names`.
    ///
    /// An empty `names` slice behaves as [`list`](Self::list). Names that were
    /// never written are silently skipped.
    async fn list_names(
        &self,
        scope: &Scope,
        names: &[String],
    ) -> Result<Vec<Parameter>, RepositoryError>;

    /// Create the parameter, or overwrite its value if it exists.
    ///
    /// Returns the parameter as persisted.
    async fn upsert(
        &self,
        scope: &Scope,
        name: &str,
        value: &str,
    ) -> Result<Parameter, RepositoryError>;

    /// Create the parameter only if it does not exist yet.
    ///
    /// Returns whatever value is stored after the call, which is the existing
    /// one when another writer got there first. Calling it twice with the same
    /// value is harmless.
    async fn insert_if_absent(
        &self,
        scope: &Scope,
        name: &str,
        value: &str,
    ) -> Result<Parameter, RepositoryError>;
}
