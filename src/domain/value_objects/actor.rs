//! # Actor
//!
//! Who is performing an operation. The role an actor plays on a given exchange
//! (creator, counterparty, moderator) is resolved by the aggregate, since the
//! same user can be a creator on one exchange and a counterparty on another.

use crate::domain::value_objects::ids::UserId;
use serde::{Deserialize, Serialize};

/// The caller of a domain operation.
///
/// # Examples
///
/// ```
/// use echange_core::domain::value_objects::{Actor, UserId};
///
/// let user = Actor::utilisateur(UserId::new_v4());
/// assert!(!user.est_moderateur());
///
/// let modo = Actor::moderateur(UserId::new_v4());
/// assert!(modo.est_moderateur());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    uuid: UserId,
    est_moderateur: bool,
}

impl Actor {
    /// A regular marketplace user.
    #[must_use]
    pub const fn utilisateur(uuid: UserId) -> Self {
        Self {
            uuid,
            est_moderateur: false,
        }
    }

    /// A user holding moderation rights.
    #[must_use]
    pub const fn moderateur(uuid: UserId) -> Self {
        Self {
            uuid,
            est_moderateur: true,
        }
    }

    /// Returns the user id.
    #[inline]
    #[must_use]
    pub const fn uuid(&self) -> UserId {
        self.uuid
    }

    /// Returns true if the actor holds moderation rights.
    #[inline]
    #[must_use]
    pub const fn est_moderateur(&self) -> bool {
        self.est_moderateur
    }
}
