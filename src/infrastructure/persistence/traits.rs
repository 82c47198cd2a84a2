//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! The exchange backend is an external collaborator; these traits let the
//! application service run against any store. In-memory adapters live in
//! [`in_memory`](super::in_memory).
//!
//! # Available Repositories
//!
//! - [`EchangeRepository`]: exchanges, unique by id and by code reference
//! - [`PropositionRepository`]: propositions, looked up by parent exchange
//! - [`ReviewRepository`]: reviews, one per author per exchange
//!
//! Exchange writes use optimistic locking on the aggregate `version`: a save
//! carrying a version no newer than the stored one is rejected with
//! [`RepositoryError::VersionConflict`].

use crate::domain::entities::{Echange, EchangeProposition, EchangeReview};
use crate::domain::services::query::EchangeFilter;
use crate::domain::value_objects::{EchangeId, PropositionId, UserId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Uniqueness constraint violated.
    #[error("Duplicate entity: {entity_type} with key {key} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Conflicting key.
        key: String,
    },

    /// A newer version was stored since the entity was loaded.
    #[error("Version conflict: {entity_type} with id {id} has been modified")]
    VersionConflict {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
        /// Version carried by the rejected write.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// Store unreachable.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, key: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            key: key.into(),
        }
    }

    /// Creates a version conflict error.
    #[must_use]
    pub fn version_conflict(
        entity_type: &'static str,
        id: impl Into<String>,
        expected: u64,
        actual: u64,
    ) -> Self {
        Self::VersionConflict {
            entity_type,
            id: id.into(),
            expected,
            actual,
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns true if this is a version conflict error.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for [`Echange`] aggregates.
#[async_trait]
pub trait EchangeRepository: Send + Sync + fmt::Debug {
    /// Inserts or replaces an exchange.
    ///
    /// A replacement must carry a higher `version` than the stored copy.
    /// Saving an unchanged copy again is accepted.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::Duplicate` if another exchange already uses the
    ///   same code reference.
    /// - `RepositoryError::VersionConflict` if the stored copy was modified
    ///   since `echange` was loaded.
    async fn save(&self, echange: &Echange) -> RepositoryResult<()>;

    /// Gets an exchange by ID. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    async fn get(&self, id: &EchangeId) -> RepositoryResult<Option<Echange>>;

    /// Gets an exchange by its human-readable reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    async fn find_by_code(&self, code_reference: &str) -> RepositoryResult<Option<Echange>>;

    /// Returns the exchanges matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    async fn find(&self, filter: &EchangeFilter) -> RepositoryResult<Vec<Echange>>;

    /// Deletes an exchange. Returns true if it existed.
    ///
    /// Propositions and reviews are not cascaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    async fn delete(&self, id: &EchangeId) -> RepositoryResult<bool>;

    /// Counts stored exchanges.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    async fn count(&self) -> RepositoryResult<u64>;
}

/// Repository for [`EchangeProposition`] entities.
#[async_trait]
pub trait PropositionRepository: Send + Sync + fmt::Debug {
    /// Inserts or replaces a proposition.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    async fn save(&self, proposition: &EchangeProposition) -> RepositoryResult<()>;

    /// Gets a proposition by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    async fn get(&self, id: &PropositionId) -> RepositoryResult<Option<EchangeProposition>>;

    /// Returns the propositions on one exchange, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    async fn find_by_echange(&self, echange: &EchangeId)
    -> RepositoryResult<Vec<EchangeProposition>>;

    /// Returns the propositions submitted by one user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    async fn find_by_proposant(&self, proposant: &UserId)
    -> RepositoryResult<Vec<EchangeProposition>>;
}

/// Repository for [`EchangeReview`] entities.
#[async_trait]
pub trait ReviewRepository: Send + Sync + fmt::Debug {
    /// Stores a new review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the author already reviewed
    /// this exchange.
    async fn save(&self, review: &EchangeReview) -> RepositoryResult<()>;

    /// Returns the reviews on one exchange, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    async fn find_by_echange(&self, echange: &EchangeId) -> RepositoryResult<Vec<EchangeReview>>;
}
