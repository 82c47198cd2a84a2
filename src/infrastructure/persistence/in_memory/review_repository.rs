//! # In-Memory Review Repository
//!
//! In-memory implementation of [`ReviewRepository`].

use crate::domain::entities::EchangeReview;
use crate::domain::value_objects::{EchangeId, ReviewId};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, ReviewRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`ReviewRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewRepository {
    storage: Arc<RwLock<HashMap<ReviewId, EchangeReview>>>,
}

impl InMemoryReviewRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn save(&self, review: &EchangeReview) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        let already_reviewed = storage.values().any(|r| {
            r.echange_uuid() == review.echange_uuid()
                && r.auteur_uuid() == review.auteur_uuid()
                && r.uuid() != review.uuid()
        });
        if already_reviewed {
            return Err(RepositoryError::duplicate(
                "EchangeReview",
                format!("{}/{}", review.echange_uuid(), review.auteur_uuid()),
            ));
        }
        storage.insert(review.uuid(), review.clone());
        Ok(())
    }

    async fn find_by_echange(&self, echange: &EchangeId) -> RepositoryResult<Vec<EchangeReview>> {
        let storage = self.storage.read().await;
        let mut reviews: Vec<EchangeReview> = storage
            .values()
            .filter(|r| r.echange_uuid() == *echange)
            .cloned()
            .collect();
        reviews.sort_by_key(EchangeReview::date_creation);
        Ok(reviews)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{Echange, EchangeCreateData, ReviewCreateData};
    use crate::domain::services::validation::ValidationPolicy;
    use crate::domain::value_objects::{Actor, CategorieId, UserId};

    fn cancelled() -> Echange {
        let createur = UserId::new_v4();
        let data = EchangeCreateData::builder(
            "Livres",
            "Lot de romans policiers",
            CategorieId::new_v4(),
            "Romans",
            "Bandes dessinées",
        )
        .build();
        let mut echange = Echange::create(data, createur, &ValidationPolicy::default()).unwrap();
        echange.cancel(&Actor::utilisateur(createur), None).unwrap();
        echange
    }

    #[tokio::test]
    async fn one_review_per_author() {
        let repo = InMemoryReviewRepository::new();
        let echange = cancelled();
        let auteur = UserId::new_v4();

        let first = EchangeReview::new(&echange, auteur, ReviewCreateData::new(4)).unwrap();
        repo.save(&first).await.unwrap();

        let second = EchangeReview::new(&echange, auteur, ReviewCreateData::new(2)).unwrap();
        assert!(repo.save(&second).await.unwrap_err().is_duplicate());

        let other = EchangeReview::new(&echange, UserId::new_v4(), ReviewCreateData::new(5)).unwrap();
        repo.save(&other).await.unwrap();

        assert_eq!(repo.find_by_echange(&echange.uuid()).await.unwrap().len(), 2);
    }

    #[test]
    fn unknown_exchange_has_no_reviews() {
        let repo = InMemoryReviewRepository::new();
        let reviews = tokio_test::block_on(repo.find_by_echange(&EchangeId::new_v4())).unwrap();
        assert!(reviews.is_empty());
    }
}
