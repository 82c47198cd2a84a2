//! # Persistence Layer
//!
//! Repository ports and their in-memory implementations.
//!
//! ## Repository Traits (Ports)
//!
//! - [`EchangeRepository`]: Persistence for exchanges
//! - [`PropositionRepository`]: Persistence for propositions
//! - [`ReviewRepository`]: Persistence for reviews
//!
//! ## Implementations
//!
//! - `in_memory`: thread-safe in-memory stores

pub mod in_memory;
pub mod traits;

pub use traits::{
    EchangeRepository, PropositionRepository, RepositoryError, RepositoryResult,
    ReviewRepository,
};
