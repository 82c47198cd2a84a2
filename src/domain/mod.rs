//! # Domain Layer
//!
//! Business rules of the exchange marketplace, free of I/O.
//!
//! - [`entities`]: the [`Echange`](entities::Echange) aggregate, propositions and reviews
//! - [`value_objects`]: identifiers, statuses and listing descriptions
//! - [`services`]: validation, equity evaluation and the query façade
//! - [`errors`]: [`DomainError`](errors::DomainError)

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
