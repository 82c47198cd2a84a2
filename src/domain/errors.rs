//! # Domain Errors
//!
//! Business-rule violations raised by the aggregates and domain services.
//!
//! Three families:
//!
//! - validation: caller input breaks listing rules, carries every violation
//! - state: an operation does not fit the current lifecycle status
//! - authorization: the actor's role does not allow the operation

use crate::domain::value_objects::{EchangeId, EchangeStatut, PropositionId, PropositionStatut};
use thiserror::Error;

/// Error raised by domain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Input violates one or more business rules. Every violation is listed.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The exchange status table has no such edge.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current status.
        from: EchangeStatut,
        /// Requested status.
        to: EchangeStatut,
    },

    /// The proposition status table has no such edge.
    #[error("invalid proposition state transition from {from} to {to}")]
    InvalidPropositionStateTransition {
        /// Current status.
        from: PropositionStatut,
        /// Requested status.
        to: PropositionStatut,
    },

    /// The operation is not permitted while the exchange is in this status.
    #[error("{operation} not allowed while exchange is {statut}")]
    IncompatibleState {
        /// Operation that was attempted.
        operation: &'static str,
        /// Status the exchange was in.
        statut: EchangeStatut,
    },

    /// The actor's role does not permit the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The proposition is attached to another exchange.
    #[error("proposition {proposition} does not belong to exchange {echange}")]
    PropositionMismatch {
        /// The proposition.
        proposition: PropositionId,
        /// The exchange it was applied to.
        echange: EchangeId,
    },

    /// A bounded value is outside its range.
    #[error("{field} out of range: {message}")]
    OutOfRange {
        /// Offending field.
        field: &'static str,
        /// Description of the accepted range.
        message: String,
    },
}

impl DomainError {
    /// Creates a validation error from a single violation.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates an out-of-range error.
    #[must_use]
    pub fn out_of_range(field: &'static str, message: impl Into<String>) -> Self {
        Self::OutOfRange {
            field,
            message: message.into(),
        }
    }

    /// Returns true for errors caused by the current lifecycle status.
    #[must_use]
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidStateTransition { .. }
                | Self::InvalidPropositionStateTransition { .. }
                | Self::IncompatibleState { .. }
        )
    }

    /// Returns true for input validation errors.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::OutOfRange { .. })
    }

    /// Returns the individual violations for validation errors.
    #[must_use]
    pub fn violations(&self) -> &[String] {
        match self {
            Self::Validation(violations) => violations,
            _ => &[],
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
