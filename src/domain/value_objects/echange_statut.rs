//! # Exchange Status
//!
//! Exchange lifecycle state machine.
//!
//! # State Machine
//!
//! ```text
//! Brouillon ⇄ EnAttente
//!     └──────────┴→ Publie → EnCours → Negocie → Finalise → Archive
//!                     │  └──────────────↗                      ↑  │
//!                     └───────────(expired)────────────────────┘  │
//!                     ↑                                           │
//!                     └────────────────(restore)──────────────────┘
//!
//! Any non-terminal state → Annule → Archive
//! Any non-terminal state → Bloque → state it was blocked from (unblock)
//! ```
//!
//! The table only says which edges exist. Guards that depend on the aggregate
//! (actor role, expiration, required fields) live on
//! [`Echange`](crate::domain::entities::Echange).
//!
//! # Examples
//!
//! ```
//! use echange_core::domain::value_objects::EchangeStatut;
//!
//! assert!(EchangeStatut::Brouillon.can_transition_to(EchangeStatut::Publie));
//! assert!(!EchangeStatut::Finalise.can_transition_to(EchangeStatut::Publie));
//! ```

use crate::domain::value_objects::enums::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exchange lifecycle status.
///
/// # Terminal States
///
/// - [`Finalise`](EchangeStatut::Finalise) — the swap happened
/// - [`Annule`](EchangeStatut::Annule) — withdrawn by its creator or a moderator
/// - [`Archive`](EchangeStatut::Archive) — soft-deleted; only an administrative
///   restore leaves it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EchangeStatut {
    /// Being drafted; the only state where content may be edited.
    #[default]
    Brouillon = 0,
    /// Submitted, waiting for publication.
    EnAttente = 1,
    /// Visible and open to propositions.
    Publie = 2,
    /// A proposition is under negotiation; still open to propositions.
    EnCours = 3,
    /// A proposition was accepted; waiting for both parties to confirm.
    Negocie = 4,
    /// The exchange took place (terminal).
    Finalise = 5,
    /// Cancelled (terminal).
    Annule = 6,
    /// Blocked by moderation.
    Bloque = 7,
    /// Archived (terminal, restorable).
    Archive = 8,
}

impl EchangeStatut {
    /// All states, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Brouillon,
        Self::EnAttente,
        Self::Publie,
        Self::EnCours,
        Self::Negocie,
        Self::Finalise,
        Self::Annule,
        Self::Bloque,
        Self::Archive,
    ];

    /// Returns true if this is a terminal state.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalise | Self::Annule | Self::Archive)
    }

    /// Returns true if the exchange is still live.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if content fields may be edited.
    #[inline]
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Brouillon)
    }

    /// Returns true if counterparties may submit or have propositions accepted.
    #[inline]
    #[must_use]
    pub const fn accepts_propositions(&self) -> bool {
        matches!(self, Self::Publie | Self::EnCours)
    }

    /// Returns true if this state can transition to `target`.
    ///
    /// - Brouillon → EnAttente, Publie, Annule, Bloque
    /// - EnAttente → Brouillon, Publie, Annule, Bloque
    /// - Publie → EnCours, Negocie, Annule, Bloque, Archive
    /// - EnCours → Negocie, Annule, Bloque
    /// - Negocie → Finalise, Annule, Bloque
    /// - Bloque → Brouillon, EnAttente, Publie, EnCours, Negocie, Annule
    /// - Finalise, Annule → Archive
    /// - Archive → Publie
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Brouillon, Self::EnAttente)
                | (Self::Brouillon, Self::Publie)
                | (Self::Brouillon, Self::Annule)
                | (Self::Brouillon, Self::Bloque)
                | (Self::EnAttente, Self::Brouillon)
                | (Self::EnAttente, Self::Publie)
                | (Self::EnAttente, Self::Annule)
                | (Self::EnAttente, Self::Bloque)
                | (Self::Publie, Self::EnCours)
                | (Self::Publie, Self::Negocie)
                | (Self::Publie, Self::Annule)
                | (Self::Publie, Self::Bloque)
                | (Self::Publie, Self::Archive)
                | (Self::EnCours, Self::Negocie)
                | (Self::EnCours, Self::Annule)
                | (Self::EnCours, Self::Bloque)
                | (Self::Negocie, Self::Finalise)
                | (Self::Negocie, Self::Annule)
                | (Self::Negocie, Self::Bloque)
                | (Self::Bloque, Self::Brouillon)
                | (Self::Bloque, Self::EnAttente)
                | (Self::Bloque, Self::Publie)
                | (Self::Bloque, Self::EnCours)
                | (Self::Bloque, Self::Negocie)
                | (Self::Bloque, Self::Annule)
                | (Self::Finalise, Self::Archive)
                | (Self::Annule, Self::Archive)
                | (Self::Archive, Self::Publie)
        )
    }

    /// Returns the valid next states from this state.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|target| self.can_transition_to(*target))
            .collect()
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Brouillon => "brouillon",
            Self::EnAttente => "en_attente",
            Self::Publie => "publie",
            Self::EnCours => "en_cours",
            Self::Negocie => "negocie",
            Self::Finalise => "finalise",
            Self::Annule => "annule",
            Self::Bloque => "bloque",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for EchangeStatut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EchangeStatut {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|statut| statut.as_str() == lowered)
            .ok_or_else(|| ParseEnumError::InvalidValue("EchangeStatut", s.to_string()))
    }
}
