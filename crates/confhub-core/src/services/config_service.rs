//! Configuration service - parameter reads, writes and change notification.

use std::sync::Arc;

use crate::domain::{Parameter, Scope, UI_PARAMETER_DEFAULTS, UiParameters, UiParametersUpdate};
use crate::events::ParameterChangeEvent;
use crate::ports::{ChangeNotifier, CoreError, ParameterRepository};

/// Service for parameter operations.
///
/// Every write is persisted first and notified second. A notifier failure is
/// logged and swallowed: it never fails or rolls back a committed write.
/// The service holds no mutable state of its own; concurrent writers are
/// serialized by the repository.
pub struct ConfigService {
    repo: Arc<dyn ParameterRepository>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl ConfigService {
    /// Create a new configuration service.
    pub fn new(repo: Arc<dyn ParameterRepository>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self { repo, notifier }
    }

    /// All parameters of a scope. An unknown scope yields an empty list.
    pub async fn get_all(&self, scope: &Scope) -> Result<Vec<Parameter>, CoreError> {
        Ok(self.repo.list(scope).await?)
    }

    /// One parameter, or `None` if it was never written.
    pub async fn get(&self, scope: &Scope, name: &str) -> Result<Option<Parameter>, CoreError> {
        Ok(self.repo.get(scope, name).await?)
    }

    /// Parameters restricted to `names`; an empty slice means all of them.
    pub async fn get_many(
        &self,
        scope: &Scope,
        names: &[String],
    ) -> Result<Vec<Parameter>, CoreError> {
        if names.is_empty() {
            return self.get_all(scope).await;
        }
        Ok(self.repo.list_names(scope, names).await?)
    }

    /// Set one parameter, creating it if absent, then notify.
    ///
    /// Returns the parameter as persisted.
    pub async fn update(
        &self,
        scope: &Scope,
        name: &str,
        value: &str,
    ) -> Result<Parameter, CoreError> {
        let existing = self.repo.get(scope, name).await?;
        let saved = self.repo.upsert(scope, name, value).await?;

        tracing::debug!(
            scope = %scope,
            parameter = name,
            created = existing.is_none(),
            "Parameter written"
        );

        self.notify(ParameterChangeEvent::single(scope, saved.name.clone()));
        Ok(saved)
    }

    /// Apply a batch of updates, then publish a single event naming them all.
    ///
    /// Updates are applied one by one in input order and are not atomic as a
    /// group: if one fails, the earlier ones stay committed and no event is
    /// published. Results mirror the input order. An empty batch writes
    /// nothing and publishes nothing.
    pub async fn update_many(
        &self,
        scope: &Scope,
        updates: &[Parameter],
    ) -> Result<Vec<Parameter>, CoreError> {
        if updates.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved = Vec::with_capacity(updates.len());
        for update in updates {
            saved.push(self.repo.upsert(scope, &update.name, &update.value).await?);
        }

        let mut names: Vec<String> = Vec::with_capacity(updates.len());
        for update in updates {
            if !names.contains(&update.name) {
                names.push(update.name.clone());
            }
        }

        tracing::debug!(scope = %scope, count = saved.len(), "Parameter batch written");

        self.notify(ParameterChangeEvent::many(scope, names));
        Ok(saved)
    }

    /// UI preferences of a user, materialising defaults on first access.
    ///
    /// Missing fields are created with create-only writes, so concurrent first
    /// readers converge on the same record and never overwrite a concurrent
    /// update. Materialising defaults is not a change and publishes nothing.
    pub async fn get_ui_parameters(&self, user_id: &str) -> Result<UiParameters, CoreError> {
        let scope = Scope::user(user_id);
        let stored = self.materialize_ui_parameters(&scope).await?;
        Ok(UiParameters::from_parameters(&stored))
    }

    /// Merge the set fields of `update` into the user's UI preferences.
    ///
    /// Fields left unset are untouched. Returns the full merged record. An
    /// update with no field set writes nothing and publishes nothing.
    pub async fn update_ui_parameters(
        &self,
        user_id: &str,
        update: &UiParametersUpdate,
    ) -> Result<UiParameters, CoreError> {
        let scope = Scope::user(user_id);
        let stored = self.materialize_ui_parameters(&scope).await?;
        let mut record = UiParameters::from_parameters(&stored);

        let changes = update.to_parameters();
        if changes.is_empty() {
            return Ok(record);
        }

        for change in &changes {
            self.repo.upsert(&scope, &change.name, &change.value).await?;
        }
        record.merge(update);

        self.notify(ParameterChangeEvent::many(
            &scope,
            changes.into_iter().map(|p| p.name).collect(),
        ));
        Ok(record)
    }

    async fn materialize_ui_parameters(&self, scope: &Scope) -> Result<Vec<Parameter>, CoreError> {
        let names: Vec<String> = UI_PARAMETER_DEFAULTS
            .iter()
            .map(|(name, _)| (*name).to_string())
            .collect();
        let mut stored = self.repo.list_names(scope, &names).await?;

        let mut initialised = 0usize;
        for (name, default) in UI_PARAMETER_DEFAULTS {
            if !stored.iter().any(|p| p.name == name) {
                stored.push(self.repo.insert_if_absent(scope, name, default).await?);
                initialised += 1;
            }
        }

        if initialised > 0 {
            tracing::info!(scope = %scope, fields = initialised, "Initialised default UI parameters");
        }
        Ok(stored)
    }

    fn notify(&self, event: ParameterChangeEvent) {
        let scope = event.scope();
        match self.notifier.publish(event) {
            Ok(()) => {
                tracing::debug!(target: "confhub.notifications", scope = %scope, "Change event published");
            }
            Err(e) => {
                tracing::warn!(
                    target: "confhub.notifications",
                    scope = %scope,
                    error = %e,
                    "Failed to publish change event; write is kept"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChangedParameters;
    use crate::memory::InMemoryParameterRepository;
    use crate::ports::{NotifierError, RepositoryError};
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<ParameterChangeEvent>>,
    }

    impl RecordingNotifier {
        fn events(&self) -> Vec<ParameterChangeEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ChangeNotifier for RecordingNotifier {
        fn publish(&self, event: ParameterChangeEvent) -> Result<(), NotifierError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    mock! {
        Notifier {}
        impl ChangeNotifier for Notifier {
            fn publish(&self, event: ParameterChangeEvent) -> Result<(), NotifierError>;
        }
    }

    mock! {
        Repo {}
        #[async_trait]
        impl ParameterRepository for Repo {
            async fn get(&self, scope: &Scope, name: &str) -> Result<Option<Parameter>, RepositoryError>;
            async fn list(&self, scope: &Scope) -> Result<Vec<Parameter>, RepositoryError>;
            async fn list_names(&self, scope: &Scope, names: &[String]) -> Result<Vec<Parameter>, RepositoryError>;
            async fn upsert(&self, scope: &Scope, name: &str, value: &str) -> Result<Parameter, RepositoryError>;
            async fn insert_if_absent(&self, scope: &Scope, name: &str, value: &str) -> Result<Parameter, RepositoryError>;
        }
    }

    fn service() -> (ConfigService, Arc<InMemoryParameterRepository>, Arc<RecordingNotifier>) {
        let repo = Arc::new(InMemoryParameterRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = ConfigService::new(repo.clone(), notifier.clone());
        (service, repo, notifier)
    }

    fn sorted(mut params: Vec<Parameter>) -> Vec<Parameter> {
        params.sort_by(|a, b| a.name.cmp(&b.name));
        params
    }

    #[tokio::test]
    async fn test_get_all_unknown_scope_is_empty() {
        let (service, _, notifier) = service();
        assert!(service.get_all(&Scope::user("u1")).await.unwrap().is_empty());
        assert!(service.get(&Scope::user("u1"), "k1").await.unwrap().is_none());
        assert!(notifier.events().is_empty());
    }

    #[tokio::test]
    async fn test_update_then_get_and_one_event_per_write() {
        let (service, _, notifier) = service();
        let scope = Scope::user("u1");

        let saved = service.update(&scope, "k1", "v1").await.unwrap();
        assert_eq!(saved, Parameter::new("k1", "v1"));
        assert_eq!(service.get(&scope, "k1").await.unwrap().unwrap().value, "v1");

        service.update(&scope, "k1", "v2").await.unwrap();
        assert_eq!(service.get(&scope, "k1").await.unwrap().unwrap().value, "v2");

        let events = notifier.events();
        assert_eq!(events.len(), 2);
        for event in events {
            assert_eq!(event.user_id, "u1");
            assert_eq!(event.app_name, None);
            assert_eq!(event.changed, ChangedParameters::Single("k1".to_string()));
        }
    }

    #[tokio::test]
    async fn test_repeated_identical_update_still_notifies_each_call() {
        let (service, _, notifier) = service();
        let scope = Scope::app("u1", "study");

        service.update(&scope, "k", "same").await.unwrap();
        service.update(&scope, "k", "same").await.unwrap();

        assert_eq!(service.get_all(&scope).await.unwrap(), vec![Parameter::new("k", "same")]);
        assert_eq!(notifier.events().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_value_is_legal() {
        let (service, _, _) = service();
        let scope = Scope::user("u1");

        service.update(&scope, "k", "").await.unwrap();
        assert_eq!(service.get(&scope, "k").await.unwrap(), Some(Parameter::new("k", "")));
    }

    #[tokio::test]
    async fn test_app_scopes_are_independent() {
        let (service, _, notifier) = service();

        service.update(&Scope::app("u1", "foo"), "k", "v").await.unwrap();

        assert!(service.get_all(&Scope::app("u1", "bar")).await.unwrap().is_empty());
        assert_eq!(
            service.get_all(&Scope::app("u1", "foo")).await.unwrap(),
            vec![Parameter::new("k", "v")]
        );
        assert_eq!(notifier.events()[0].app_name.as_deref(), Some("foo"));
    }

    #[tokio::test]
    async fn test_get_many_filters() {
        let (service, _, _) = service();
        let scope = Scope::user("u1");
        service.update(&scope, "a", "1").await.unwrap();
        service.update(&scope, "b", "2").await.unwrap();

        let all = sorted(service.get_all(&scope).await.unwrap());
        assert_eq!(sorted(service.get_many(&scope, &[]).await.unwrap()), all);

        let never = service.get_many(&scope, &["x".to_string()]).await.unwrap();
        assert!(never.is_empty());

        let only_a = service.get_many(&scope, &["a".to_string()]).await.unwrap();
        assert_eq!(only_a, vec![Parameter::new("a", "1")]);
    }

    #[tokio::test]
    async fn test_update_many_emits_one_event_with_all_names() {
        let (service, _, notifier) = service();
        let scope = Scope::app("u1", "common");
        let batch = vec![
            Parameter::new("b", "2"),
            Parameter::new("a", "1"),
            Parameter::new("c", "3"),
        ];

        let saved = service.update_many(&scope, &batch).await.unwrap();
        assert_eq!(saved, batch);

        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].changed,
            ChangedParameters::Many(vec!["b".into(), "a".into(), "c".into()])
        );
        assert_eq!(events[0].app_name.as_deref(), Some("common"));
    }

    #[tokio::test]
    async fn test_update_many_single_entry_is_still_a_batch_event() {
        let (service, _, notifier) = service();
        let scope = Scope::user("u1");

        service
            .update_many(&scope, &[Parameter::new("k", "v")])
            .await
            .unwrap();

        assert_eq!(
            notifier.events(),
            vec![ParameterChangeEvent::many(&scope, vec!["k".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_update_many_duplicate_names_last_wins() {
        let (service, _, notifier) = service();
        let scope = Scope::user("u1");

        service
            .update_many(&scope, &[Parameter::new("k", "1"), Parameter::new("k", "2")])
            .await
            .unwrap();

        assert_eq!(service.get(&scope, "k").await.unwrap().unwrap().value, "2");
        assert_eq!(
            notifier.events()[0].changed,
            ChangedParameters::Many(vec!["k".to_string()])
        );
    }

    #[tokio::test]
    async fn test_update_many_empty_batch_does_nothing() {
        let (service, _, notifier) = service();
        let saved = service.update_many(&Scope::user("u1"), &[]).await.unwrap();
        assert!(saved.is_empty());
        assert!(notifier.events().is_empty());
    }

    #[tokio::test]
    async fn test_notifier_failure_keeps_write() {
        let repo = Arc::new(InMemoryParameterRepository::new());
        let mut notifier = MockNotifier::new();
        notifier
            .expect_publish()
            .times(1)
            .returning(|_| Err(NotifierError::Unavailable("broker down".to_string())));
        let service = ConfigService::new(repo.clone(), Arc::new(notifier));
        let scope = Scope::user("u1");

        let saved = service.update(&scope, "k", "v").await.unwrap();
        assert_eq!(saved.value, "v");
        assert_eq!(repo.get(&scope, "k").await.unwrap().unwrap().value, "v");
    }

    #[tokio::test]
    async fn test_storage_failure_propagates_without_event() {
        let mut repo = MockRepo::new();
        repo.expect_get().returning(|_, _| Ok(None));
        repo.expect_upsert()
            .returning(|_, _, _| Err(RepositoryError::Unavailable("timeout".to_string())));
        let mut notifier = MockNotifier::new();
        notifier.expect_publish().never();
        let service = ConfigService::new(Arc::new(repo), Arc::new(notifier));

        let err = service.update(&Scope::user("u1"), "k", "v").await.unwrap_err();
        assert!(matches!(err, CoreError::Repository(RepositoryError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_partial_batch_failure_keeps_earlier_writes() {
        let mut repo = MockRepo::new();
        let mut calls = 0;
        repo.expect_upsert().times(2).returning(move |_, name, value| {
            calls += 1;
            if calls == 1 {
                Ok(Parameter::new(name, value))
            } else {
                Err(RepositoryError::Unavailable("connection reset".to_string()))
            }
        });
        let mut notifier = MockNotifier::new();
        notifier.expect_publish().never();
        let service = ConfigService::new(Arc::new(repo), Arc::new(notifier));

        let result = service
            .update_many(
                &Scope::user("u1"),
                &[Parameter::new("a", "1"), Parameter::new("b", "2")],
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_ui_parameters_default_then_stable() {
        let (service, repo, notifier) = service();

        let first = service.get_ui_parameters("u1").await.unwrap();
        assert_eq!(first, UiParameters::with_defaults());
        assert_eq!(
            repo.list(&Scope::user("u1")).await.unwrap().len(),
            UI_PARAMETER_DEFAULTS.len()
        );

        let second = service.get_ui_parameters("u1").await.unwrap();
        assert_eq!(second, first);
        assert!(notifier.events().is_empty());
    }

    #[tokio::test]
    async fn test_ui_partial_update_leaves_other_fields() {
        let (service, _, notifier) = service();
        let before = service
            .update_ui_parameters(
                "u1",
                &UiParametersUpdate {
                    substation_layout: Some("vertical".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let after = service
            .update_ui_parameters(
                "u1",
                &UiParametersUpdate {
                    theme: Some("Light".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(after.theme, "Light");
        assert_eq!(after.substation_layout, "vertical");
        assert_eq!(after.use_name, before.use_name);
        assert_eq!(service.get_ui_parameters("u1").await.unwrap(), after);

        let events = notifier.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1].changed,
            ChangedParameters::Many(vec!["theme".to_string()])
        );
    }

    #[tokio::test]
    async fn test_ui_empty_update_writes_nothing() {
        let (service, _, notifier) = service();
        let record = service
            .update_ui_parameters("u1", &UiParametersUpdate::default())
            .await
            .unwrap();
        assert_eq!(record, UiParameters::with_defaults());
        assert!(notifier.events().is_empty());
    }

    #[tokio::test]
    async fn test_ui_defaults_do_not_clobber_open_writes() {
        let (service, _, _) = service();
        service.update(&Scope::user("u1"), "theme", "Light").await.unwrap();

        let record = service.get_ui_parameters("u1").await.unwrap();
        assert_eq!(record.theme, "Light");
        assert!(record.use_name);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_readers_converge() {
        let (service, repo, _) = service();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.get_ui_parameters("u1").await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), UiParameters::with_defaults());
        }
        assert_eq!(
            repo.list(&Scope::user("u1")).await.unwrap().len(),
            UI_PARAMETER_DEFAULTS.len()
        );
    }
}
