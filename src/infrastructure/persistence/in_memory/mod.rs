//! # In-Memory Repositories
//!
//! In-memory implementations for tests and embedded use without a backend.
//!
//! ## Available Repositories
//!
//! - [`InMemoryEchangeRepository`]: exchange persistence
//! - [`InMemoryPropositionRepository`]: proposition persistence
//! - [`InMemoryReviewRepository`]: review persistence
//!
//! ## Thread Safety
//!
//! All implementations use `Arc<RwLock<HashMap>>` for thread-safe access.

pub mod echange_repository;
pub mod proposition_repository;
pub mod review_repository;

pub use echange_repository::InMemoryEchangeRepository;
pub use proposition_repository::InMemoryPropositionRepository;
pub use review_repository::InMemoryReviewRepository;
