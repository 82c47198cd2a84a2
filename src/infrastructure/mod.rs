//! # Infrastructure Layer
//!
//! Adapters around the domain.
//!
//! - [`persistence`]: repository ports and in-memory stores
//! - [`api`]: typed REST client for the remote exchange backend

pub mod api;
pub mod persistence;
