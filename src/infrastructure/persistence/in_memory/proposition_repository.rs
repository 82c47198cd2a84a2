//! # In-Memory Proposition Repository
//!
//! In-memory implementation of [`PropositionRepository`].

use crate::domain::entities::EchangeProposition;
use crate::domain::value_objects::{EchangeId, PropositionId, UserId};
use crate::infrastructure::persistence::traits::{PropositionRepository, RepositoryResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`PropositionRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryPropositionRepository {
    storage: Arc<RwLock<HashMap<PropositionId, EchangeProposition>>>,
}

impl InMemoryPropositionRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn select(
        &self,
        predicate: impl Fn(&EchangeProposition) -> bool,
    ) -> Vec<EchangeProposition> {
        let storage = self.storage.read().await;
        let mut matches: Vec<EchangeProposition> =
            storage.values().filter(|p| predicate(p)).cloned().collect();
        matches.sort_by_key(EchangeProposition::date_creation);
        matches
    }
}

#[async_trait]
impl PropositionRepository for InMemoryPropositionRepository {
    async fn save(&self, proposition: &EchangeProposition) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.insert(proposition.uuid(), proposition.clone());
        Ok(())
    }

    async fn get(&self, id: &PropositionId) -> RepositoryResult<Option<EchangeProposition>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_by_echange(
        &self,
        echange: &EchangeId,
    ) -> RepositoryResult<Vec<EchangeProposition>> {
        Ok(self.select(|p| p.echange_uuid() == *echange).await)
    }

    async fn find_by_proposant(
        &self,
        proposant: &UserId,
    ) -> RepositoryResult<Vec<EchangeProposition>> {
        Ok(self.select(|p| p.proposant_uuid() == *proposant).await)
    }
}
