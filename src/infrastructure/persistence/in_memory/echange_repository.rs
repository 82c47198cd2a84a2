//! # In-Memory Echange Repository
//!
//! In-memory implementation of [`EchangeRepository`].

use crate::domain::entities::Echange;
use crate::domain::services::query::EchangeFilter;
use crate::domain::value_objects::EchangeId;
use crate::infrastructure::persistence::traits::{
    EchangeRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`EchangeRepository`].
///
/// Results are returned newest first.
#[derive(Debug, Clone)]
pub struct InMemoryEchangeRepository {
    storage: Arc<RwLock<HashMap<EchangeId, Echange>>>,
}

impl InMemoryEchangeRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored exchanges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all exchanges.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        storage.clear();
    }
}

impl Default for InMemoryEchangeRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first(mut echanges: Vec<Echange>) -> Vec<Echange> {
    echanges.sort_by(|a, b| b.date_creation().cmp(&a.date_creation()));
    echanges
}

#[async_trait]
impl EchangeRepository for InMemoryEchangeRepository {
    async fn save(&self, echange: &Echange) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        let code_taken = storage
            .values()
            .any(|e| e.code_reference() == echange.code_reference() && e.uuid() != echange.uuid());
        if code_taken {
            return Err(RepositoryError::duplicate(
                "Echange",
                echange.code_reference(),
            ));
        }
        let stale = storage
            .get(&echange.uuid())
            .filter(|stored| stored.version() >= echange.version() && *stored != echange);
        if let Some(stored) = stale {
            return Err(RepositoryError::version_conflict(
                "Echange",
                echange.uuid().to_string(),
                echange.version(),
                stored.version(),
            ));
        }
        storage.insert(echange.uuid(), echange.clone());
        Ok(())
    }

    async fn get(&self, id: &EchangeId) -> RepositoryResult<Option<Echange>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_by_code(&self, code_reference: &str) -> RepositoryResult<Option<Echange>> {
        let storage = self.storage.read().await;
        Ok(storage
            .values()
            .find(|e| e.code_reference() == code_reference)
            .cloned())
    }

    async fn find(&self, filter: &EchangeFilter) -> RepositoryResult<Vec<Echange>> {
        let storage = self.storage.read().await;
        let matches: Vec<Echange> = storage
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        Ok(newest_first(matches))
    }

    async fn delete(&self, id: &EchangeId) -> RepositoryResult<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage.remove(id).is_some())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.len() as u64)
    }
}
