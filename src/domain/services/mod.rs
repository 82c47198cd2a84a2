//! # Domain Services
//!
//! Pure functions over exchange content that don't belong to a single entity.
//!
//! ## Services
//!
//! - [`validation::validate`]: errors, warnings and suggestions for a listing
//! - [`equity::evaluate_equity`]: advisory fairness heuristic
//! - [`query`]: filtering, sorting, pagination and statistics
//! - [`bulk`]: lifecycle events applied to many exchanges

pub mod bulk;
pub mod equity;
pub mod query;
pub mod validation;

pub use bulk::{BulkEvent, BulkFailure, BulkOutcome};
pub use equity::{EquityEvaluation, EquityPolicy, Valuation, evaluate_equity};
pub use query::{
    EchangeAnalytics, EchangeFilter, EchangeQuery, EchangeStats, Page, SortField, SortOrder,
    analytics, compute_stats, paginate,
};
pub use validation::{ValidationPolicy, ValidationReport, validate};
