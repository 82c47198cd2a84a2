//! # Backend API
//!
//! REST client for the remote exchange backend.
//!
//! - [`EchangeApiClient`]: one method per endpoint
//! - [`envelope`]: response-shape normalization
//! - [`ApiError`]: transport and status errors

pub mod echange_client;
pub mod envelope;
pub mod error;
pub mod http_client;

pub use echange_client::{EchangeApiClient, EchangeList};
pub use envelope::{Listing, ResponseShape};
pub use error::{ApiError, ApiResult};
