//! # Proposition Status
//!
//! Counter-offer lifecycle state machine.
//!
//! # State Machine
//!
//! ```text
//! EnAttente → Etudiee → Negociee → Acceptee
//!     │          │          │   └─→ Refusee
//!     └──────────┴──────────┴─────→ Annulee
//! ```
//!
//! Forward skips are allowed (a creator may accept a proposition straight
//! away), backward moves are not.
//!
//! # Examples
//!
//! ```
//! use echange_core::domain::value_objects::PropositionStatut;
//!
//! let state = PropositionStatut::EnAttente;
//! assert!(state.can_transition_to(PropositionStatut::Etudiee));
//! assert!(!PropositionStatut::Acceptee.can_transition_to(PropositionStatut::Refusee));
//! ```

use crate::domain::value_objects::enums::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Proposition lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PropositionStatut {
    /// Submitted, not yet looked at.
    #[default]
    EnAttente = 0,
    /// Being studied by the exchange's creator.
    Etudiee = 1,
    /// Terms are being negotiated.
    Negociee = 2,
    /// Accepted by the creator (terminal).
    Acceptee = 3,
    /// Refused by the creator (terminal).
    Refusee = 4,
    /// Withdrawn by its proposant (terminal).
    Annulee = 5,
}

impl PropositionStatut {
    /// All states, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::EnAttente,
        Self::Etudiee,
        Self::Negociee,
        Self::Acceptee,
        Self::Refusee,
        Self::Annulee,
    ];

    /// Returns true if this is a terminal state.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Acceptee | Self::Refusee | Self::Annulee)
    }

    /// Returns true if this is an active (non-terminal) state.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this state can transition to `target`.
    ///
    /// - EnAttente → Etudiee, Negociee, Acceptee, Refusee, Annulee
    /// - Etudiee → Negociee, Acceptee, Refusee, Annulee
    /// - Negociee → Acceptee, Refusee, Annulee
    /// - Terminal states → (none)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::EnAttente, Self::Etudiee)
                | (Self::EnAttente, Self::Negociee)
                | (Self::EnAttente, Self::Acceptee)
                | (Self::EnAttente, Self::Refusee)
                | (Self::EnAttente, Self::Annulee)
                | (Self::Etudiee, Self::Negociee)
                | (Self::Etudiee, Self::Acceptee)
                | (Self::Etudiee, Self::Refusee)
                | (Self::Etudiee, Self::Annulee)
                | (Self::Negociee, Self::Acceptee)
                | (Self::Negociee, Self::Refusee)
                | (Self::Negociee, Self::Annulee)
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
            Self::EnAttente => "en_attente",
            Self::Etudiee => "etudiee",
            Self::Negociee => "negociee",
            Self::Acceptee => "acceptee",
            Self::Refusee => "refusee",
            Self::Annulee => "annulee",
        }
    }
}

impl fmt::Display for PropositionStatut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropositionStatut {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|statut| statut.as_str() == lowered)
            .ok_or_else(|| ParseEnumError::InvalidValue("PropositionStatut", s.to_string()))
    }
}
