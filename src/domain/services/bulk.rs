//! # Bulk Operations
//!
//! Lifecycle events applied to many exchanges at once, and the per-item
//! outcome report.
//!
//! Bulk operations are best-effort: each item is applied on its own and a
//! failure on one item never rolls back the others.

use crate::domain::entities::Echange;
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{Actor, EchangeId, EchangeStatut};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lifecycle event that can be applied in bulk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BulkEvent {
    /// Brouillon → EnAttente.
    Submit,
    /// EnAttente → Brouillon.
    Withdraw,
    /// Brouillon/EnAttente → Publie.
    Publish,
    /// Moderation block with a reason.
    Block {
        /// Reason shown to the creator.
        motif: String,
    },
    /// Bloque → status held before the block.
    Unblock,
    /// Negocie → Finalise.
    Finalize,
    /// Any non-terminal → Annule.
    Cancel {
        /// Optional reason.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        motif: Option<String>,
    },
    /// Finalise/Annule (or expired Publie) → Archive.
    Archive,
}

impl BulkEvent {
    /// Status the event moves an exchange to. `None` for [`Self::Unblock`],
    /// whose target depends on each exchange's history.
    #[must_use]
    pub const fn target(&self) -> Option<EchangeStatut> {
        match self {
            Self::Submit => Some(EchangeStatut::EnAttente),
            Self::Withdraw => Some(EchangeStatut::Brouillon),
            Self::Publish => Some(EchangeStatut::Publie),
            Self::Unblock => None,
            Self::Block { .. } => Some(EchangeStatut::Bloque),
            Self::Finalize => Some(EchangeStatut::Finalise),
            Self::Cancel { .. } => Some(EchangeStatut::Annule),
            Self::Archive => Some(EchangeStatut::Archive),
        }
    }

    /// Wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Withdraw => "withdraw",
            Self::Publish => "publish",
            Self::Block { .. } => "block",
            Self::Unblock => "unblock",
            Self::Finalize => "finalize",
            Self::Cancel { .. } => "cancel",
            Self::Archive => "archive",
        }
    }

    /// Applies the event through the matching aggregate operation.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying lifecycle operation returns.
    pub fn apply(&self, echange: &mut Echange, actor: &Actor) -> DomainResult<()> {
        match self {
            Self::Submit => echange.submit(actor),
            Self::Withdraw => echange.withdraw(actor),
            Self::Publish => echange.publish(actor),
            Self::Block { motif } => echange.block(actor, motif.clone()),
            Self::Unblock => echange.unblock(actor),
            Self::Finalize => echange.finalize(actor),
            Self::Cancel { motif } => echange.cancel(actor, motif.clone()),
            Self::Archive => echange.archive(actor),
        }
    }
}

/// Per-item report of a bulk operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkOutcome {
    /// Items the operation was applied to.
    pub succeeded: Vec<EchangeId>,
    /// Items that failed, with the error message.
    pub failed: Vec<BulkFailure>,
}

/// One failed item of a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    /// The exchange.
    pub uuid: EchangeId,
    /// Why it failed.
    pub message: String,
}

impl BulkOutcome {
    /// Records a success.
    pub fn push_success(&mut self, uuid: EchangeId) {
        self.succeeded.push(uuid);
    }

    /// Records a failure.
    pub fn push_failure(&mut self, uuid: EchangeId, message: impl Into<String>) {
        self.failed.push(BulkFailure {
            uuid,
            message: message.into(),
        });
    }

    /// Returns true if every item succeeded.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of items processed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Returns true if no item was processed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for BulkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed",
            self.succeeded.len(),
            self.failed.len()
        )
    }
}
