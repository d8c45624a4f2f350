use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::types::SavedScenario;
use crate::error::Result;

/// Storage backend for saved scenarios
#[async_trait]
pub trait ScenarioRepository: Send + Sync {
    async fn insert(&self, scenario: &SavedScenario) -> Result<()>;

    async fn find(&self, id: Uuid) -> Result<Option<SavedScenario>>;

    /// Newest-updated first
    async fn list(&self) -> Result<Vec<SavedScenario>>;

    /// Read the stored scenario, rebuild it with `apply` and write it back as a
    /// single unit. `None` if the id does not exist. Concurrent calls on one id
    /// are last-writer-wins.
    async fn update_with(
        &self,
        id: Uuid,
        apply: &(dyn for<'a> Fn(&'a SavedScenario) -> SavedScenario + Send + Sync),
    ) -> Result<Option<SavedScenario>>;

    /// `false` if the id does not exist
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[derive(Debug, Default)]
pub struct InMemoryScenarioRepository {
    scenarios: RwLock<HashMap<Uuid, SavedScenario>>,
}

impl InMemoryScenarioRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScenarioRepository for InMemoryScenarioRepository {
    async fn insert(&self, scenario: &SavedScenario) -> Result<()> {
        self.scenarios.write().await.insert(scenario.id, scenario.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<SavedScenario>> {
        Ok(self.scenarios.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<SavedScenario>> {
        let mut scenarios: Vec<SavedScenario> = self.scenarios.read().await.values().cloned().collect();
        scenarios.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(scenarios)
    }

    async fn update_with(
        &self,
        id: Uuid,
        apply: &(dyn for<'a> Fn(&'a SavedScenario) -> SavedScenario + Send + Sync),
    ) -> Result<Option<SavedScenario>> {
        let mut scenarios = self.scenarios.write().await;
        let Some(prior) = scenarios.get(&id) else {
            return Ok(None);
        };
        let next = apply(prior);
        scenarios.insert(id, next.clone());
        Ok(Some(next))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.scenarios.write().await.remove(&id).is_some())
    }
}
