//! # Application Layer
//!
//! Use-case orchestration over the domain and the repository ports.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::EchangeService;
