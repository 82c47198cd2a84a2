//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`EchangeId`], [`PropositionId`], [`ReviewId`]: entity identifiers
//! - [`UserId`], [`CategorieId`]: references to external collaborators
//!
//! ## Lifecycle
//!
//! - [`EchangeStatut`]: exchange state machine
//! - [`PropositionStatut`]: proposition state machine
//! - [`Actor`] and [`ActorRole`]: who performs a transition
//!
//! ## Listing
//!
//! - [`ObjetEchange`], [`Recherche`], [`Conditions`], [`Localisation`], [`ValueRange`]

pub mod actor;
pub mod echange_statut;
pub mod enums;
pub mod ids;
pub mod listing;
pub mod proposition_statut;
pub mod timestamp;

pub use actor::Actor;
pub use echange_statut::EchangeStatut;
pub use enums::{ActorRole, EtatObjet, ModeEchange, ParseEnumError, TypeObjet};
pub use ids::{CategorieId, EchangeId, PropositionId, ReviewId, UserId};
pub use listing::{Conditions, Localisation, ObjetEchange, Recherche, ValueRange};
pub use proposition_statut::PropositionStatut;
pub use timestamp::Timestamp;
