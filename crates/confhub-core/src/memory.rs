//! In-memory implementation of the `ParameterRepository` port.
//!
//! Used by tests and by the server's `--in-memory` mode. Scopes live in a
//! sharded concurrent map: writes lock only the shard holding their scope, so
//! unrelated scopes do not contend, and writes to one `(scope, name)` settle
//! last-write-wins.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{Parameter, Scope};
use crate::ports::{ParameterRepository, RepositoryError};

/// Parameter store backed by a process-local concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryParameterRepository {
    scopes: DashMap<Scope, HashMap<String, String>>,
}

impl InMemoryParameterRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParameterRepository for InMemoryParameterRepository {
    async fn get(&self, scope: &Scope, name: &str) -> Result<Option<Parameter>, RepositoryError> {
        Ok(self
            .scopes
            .get(scope)
            .and_then(|params| params.get(name).map(|value| Parameter::new(name, value.as_str()))))
    }

    async fn list(&self, scope: &Scope) -> Result<Vec<Parameter>, RepositoryError> {
        Ok(self
            .scopes
            .get(scope)
            .map(|params| {
                params
                    .iter()
                    .map(|(name, value)| Parameter::new(name.as_str(), value.as_str()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_names(
        &self,
        scope: &Scope,
        names: &[String],
    ) -> Result<Vec<Parameter>, RepositoryError> {
        if names.is_empty() {
            return self.list(scope).await;
        }

        let Some(params) = self.scopes.get(scope) else {
            return Ok(Vec::new());
        };

        let mut seen = Vec::with_capacity(names.len());
        let mut found = Vec::new();
        for name in names {
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);
            if let Some(value) = params.get(name) {
                found.push(Parameter::new(name.as_str(), value.as_str()));
            }
        }
        Ok(found)
    }

    async fn upsert(
        &self,
        scope: &Scope,
        name: &str,
        value: &str,
    ) -> Result<Parameter, RepositoryError> {
        self.scopes
            .entry(scope.clone())
            .or_default()
            .insert(name.to_string(), value.to_string());
        Ok(Parameter::new(name, value))
    }

    async fn insert_if_absent(
        &self,
        scope: &Scope,
        name: &str,
        value: &str,
    ) -> Result<Parameter, RepositoryError> {
        let mut params = self.scopes.entry(scope.clone()).or_default();
        let stored = match params.entry(name.to_string()) {
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(slot) => slot.insert(value.to_string()).clone(),
        };
        Ok(Parameter::new(name, stored))
    }
}
