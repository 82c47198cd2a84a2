//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`EchangeService`]: exchange, proposition and review use cases over the
//!   repository ports

pub mod echange_service;

pub use echange_service::{EchangeService, ValidatedEchange};
