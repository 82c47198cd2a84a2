//! # Domain Entities
//!
//! Aggregate roots and entities representing core business concepts.
//!
//! ## Aggregates
//!
//! - [`Echange`]: exchange listing with its lifecycle state machine
//!
//! ## Entities
//!
//! - [`EchangeProposition`]: counter-offer with its own sub-lifecycle
//! - [`EchangeReview`]: rating on a closed exchange

pub mod echange;
pub mod proposition;
pub mod review;

pub use echange::{
    Echange, EchangeContent, EchangeCreateData, EchangeCreateDataBuilder, EchangeMetrics,
    EchangeUpdateData, TransitionRecord, code_reference,
};
pub use proposition::{ConditionsProposees, EchangeProposition, Offre, PropositionCreateData};
pub use review::{EchangeReview, NOTE_RANGE, ReviewAspects, ReviewCreateData, average_note};
