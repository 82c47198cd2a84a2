//! # echange-core
//!
//! Domain engine for marketplace exchanges ("échanges"): a holder offers a product
//! or service and describes what they are looking for in return, counterparties
//! answer with propositions, and the exchange moves through a moderated lifecycle.
//!
//! ## Layers
//!
//! - [`domain`]: the [`Echange`](domain::entities::Echange) aggregate and its
//!   state machine, propositions, reviews, validation, equity evaluation and the
//!   pure query/statistics façade.
//! - [`application`]: [`EchangeService`](application::services::EchangeService),
//!   orchestrating the domain over repository ports, and the layered error type.
//! - [`infrastructure`]: repository ports with in-memory adapters, and the typed
//!   REST client for the remote backend.
//! - [`config`] and [`logging`]: ambient configuration and tracing setup.
//!
//! # Examples
//!
//! ```
//! use echange_core::domain::entities::{Echange, EchangeCreateData};
//! use echange_core::domain::services::validation::ValidationPolicy;
//! use echange_core::domain::value_objects::{CategorieId, EchangeStatut, UserId};
//!
//! let data = EchangeCreateData::builder(
//!     "Vélo de route",
//!     "Vélo de route en aluminium, taille 56, révisé récemment",
//!     CategorieId::new_v4(),
//!     "Vélo de route taille 56",
//!     "Guitare acoustique",
//! )
//! .build();
//!
//! let echange = Echange::create(data, UserId::new_v4(), &ValidationPolicy::default()).unwrap();
//! assert_eq!(echange.statut(), EchangeStatut::Brouillon);
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
