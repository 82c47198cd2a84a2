//! # Echange API Client
//!
//! Typed client for the remote exchange backend.
//!
//! Every endpoint goes through [`HttpClient`] and the [`envelope`] module, so
//! callers only ever see domain types. Creation requests are validated
//! locally first; an invalid listing never reaches the network.
//!
//! # Examples
//!
//! ```ignore
//! use echange_core::infrastructure::api::EchangeApiClient;
//! use echange_core::domain::services::query::EchangeQuery;
//!
//! let client = EchangeApiClient::new("https://api.example.com", 5000)?;
//! let page = client.list(&EchangeQuery::new()).await?;
//! println!("{} of {}", page.count, page.total);
//! ```
//!
//! [`envelope`]: crate::infrastructure::api::envelope

use crate::config::ApiConfig;
use crate::domain::entities::{
    Echange, EchangeCreateData, EchangeProposition, EchangeReview, EchangeUpdateData,
    PropositionCreateData, ReviewCreateData,
};
use crate::domain::errors::DomainError;
use crate::domain::services::bulk::{BulkEvent, BulkOutcome};
use crate::domain::services::query::{EchangeAnalytics, EchangeFilter, EchangeQuery, EchangeStats};
use crate::domain::services::validation::{ValidationPolicy, validate};
use crate::domain::value_objects::{EchangeId, EchangeStatut, PropositionId, PropositionStatut};
use crate::infrastructure::api::envelope::{Listing, extract_entity, normalize_list};
use crate::infrastructure::api::error::ApiResult;
use crate::infrastructure::api::http_client::HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

const ECHANGES_KEY: &str = "echanges";
const ECHANGE_KEY: &str = "echange";
const PROPOSITION_KEY: &str = "proposition";
const REVIEWS_KEY: &str = "reviews";
const REVIEW_KEY: &str = "review";

/// A normalized page of exchanges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchangeList {
    /// Exchanges on this page.
    pub echanges: Vec<Echange>,
    /// Number of exchanges on this page.
    pub count: u64,
    /// Number of exchanges across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Number of pages.
    pub pages: u32,
}

impl From<Listing<Echange>> for EchangeList {
    fn from(listing: Listing<Echange>) -> Self {
        Self {
            echanges: listing.items,
            count: listing.count,
            total: listing.total,
            page: listing.page,
            pages: listing.pages,
        }
    }
}

#[derive(Debug, Serialize)]
struct PropositionStatusBody<'a> {
    statut: PropositionStatut,
    #[serde(skip_serializing_if = "Option::is_none")]
    motif_refus: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct BulkUpdateBody<'a> {
    uuids: &'a [EchangeId],
    #[serde(skip_serializing_if = "Option::is_none")]
    statut: Option<EchangeStatut>,
    #[serde(flatten)]
    event: &'a BulkEvent,
}

#[derive(Debug, Serialize)]
struct BulkDeleteBody<'a> {
    uuids: &'a [EchangeId],
}

/// Client for the exchange endpoints of the backend.
#[derive(Debug, Clone)]
pub struct EchangeApiClient {
    http: HttpClient,
    base_url: String,
    policy: ValidationPolicy,
}

impl EchangeApiClient {
    /// Creates a client with the default validation policy.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> ApiResult<Self> {
        Ok(Self {
            http: HttpClient::new(timeout_ms)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy: ValidationPolicy::default(),
        })
    }

    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the HTTP client cannot be created.
    pub fn from_config(config: &ApiConfig, policy: ValidationPolicy) -> ApiResult<Self> {
        Ok(Self::new(config.base_url.clone(), config.timeout_ms)?.with_policy(policy))
    }

    /// Replaces the policy used for local validation.
    #[must_use]
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the base URL, without trailing slash.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========== Exchanges ==========

    /// Lists exchanges. `GET /echanges`
    ///
    /// # Errors
    ///
    /// Returns transport and status errors, or `ApiError::Decode` for an
    /// unrecognized response shape.
    pub async fn list(&self, query: &EchangeQuery) -> ApiResult<EchangeList> {
        let params = query.to_query_pairs();
        debug!(params = params.len(), "Listing exchanges");
        let raw: Value = self
            .http
            .get_with_params(&self.url("/echanges"), &params)
            .await?;
        let list = EchangeList::from(normalize_list::<Echange>(raw, ECHANGES_KEY)?);
        debug!(count = list.count, total = list.total, "Exchanges listed");
        Ok(list)
    }

    /// Fetches one exchange. `GET /echanges/{uuid}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if it does not exist or the response
    /// carries no exchange.
    pub async fn get(&self, id: EchangeId) -> ApiResult<Echange> {
        let raw: Value = self.http.get(&self.url(&format!("/echanges/{}", id))).await?;
        extract_entity(raw, ECHANGE_KEY)
    }

    /// Creates an exchange. `POST /echanges`
    ///
    /// The listing is validated locally first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` without sending anything if validation
    /// fails, otherwise transport and status errors.
    pub async fn create(&self, data: &EchangeCreateData) -> ApiResult<Echange> {
        let report = validate(data, &self.policy).into_result()?;
        for warning in &report.warnings {
            debug!(warning = %warning, "Listing warning");
        }
        let raw: Value = self.http.post(&self.url("/echanges"), data).await?;
        extract_entity(raw, ECHANGE_KEY)
    }

    /// Updates an exchange. `PUT /echanges/{uuid}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for an empty update, otherwise transport
    /// and status errors.
    pub async fn update(&self, id: EchangeId, data: &EchangeUpdateData) -> ApiResult<Echange> {
        if data.is_empty() {
            return Err(DomainError::validation("Aucune modification à enregistrer").into());
        }
        let raw: Value = self
            .http
            .put(&self.url(&format!("/echanges/{}", id)), data)
            .await?;
        extract_entity(raw, ECHANGE_KEY)
    }

    /// Deletes an exchange. `DELETE /echanges/{uuid}`
    ///
    /// # Errors
    ///
    /// Returns transport and status errors.
    pub async fn delete(&self, id: EchangeId) -> ApiResult<()> {
        self.http.delete(&self.url(&format!("/echanges/{}", id))).await
    }

    // ========== Propositions ==========

    /// Submits a proposition. `POST /echanges/{uuid}/propositions`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` without sending anything if the offer is
    /// incomplete, otherwise transport and status errors.
    pub async fn create_proposition(
        &self,
        echange: EchangeId,
        data: &PropositionCreateData,
    ) -> ApiResult<EchangeProposition> {
        let violations = data.violations();
        if !violations.is_empty() {
            return Err(DomainError::Validation(violations).into());
        }
        let raw: Value = self
            .http
            .post(&self.url(&format!("/echanges/{}/propositions", echange)), data)
            .await?;
        extract_entity(raw, PROPOSITION_KEY)
    }

    /// Moves a proposition to `statut`. `PUT /propositions/{uuid}`
    ///
    /// # Errors
    ///
    /// Returns transport and status errors.
    pub async fn update_proposition(
        &self,
        id: PropositionId,
        statut: PropositionStatut,
        motif_refus: Option<&str>,
    ) -> ApiResult<EchangeProposition> {
        let body = PropositionStatusBody {
            statut,
            motif_refus,
        };
        let raw: Value = self
            .http
            .put(&self.url(&format!("/propositions/{}", id)), &body)
            .await?;
        extract_entity(raw, PROPOSITION_KEY)
    }

    // ========== Reviews ==========

    /// Lists the reviews on an exchange. `GET /echanges/{uuid}/reviews`
    ///
    /// # Errors
    ///
    /// Returns transport and status errors, or `ApiError::Decode` for an
    /// unrecognized response shape.
    pub async fn list_reviews(&self, echange: EchangeId) -> ApiResult<Vec<EchangeReview>> {
        let raw: Value = self
            .http
            .get(&self.url(&format!("/echanges/{}/reviews", echange)))
            .await?;
        Ok(normalize_list::<EchangeReview>(raw, REVIEWS_KEY)?.items)
    }

    /// Posts a review. `POST /echanges/{uuid}/reviews`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` without sending anything for an
    /// out-of-range score, otherwise transport and status errors.
    pub async fn create_review(
        &self,
        echange: EchangeId,
        data: &ReviewCreateData,
    ) -> ApiResult<EchangeReview> {
        data.check()?;
        let raw: Value = self
            .http
            .post(&self.url(&format!("/echanges/{}/reviews", echange)), data)
            .await?;
        extract_entity(raw, REVIEW_KEY)
    }

    // ========== Read side ==========

    /// Aggregate statistics. `GET /echanges/stats`
    ///
    /// # Errors
    ///
    /// Returns transport and status errors.
    pub async fn stats(&self, filter: &EchangeFilter) -> ApiResult<EchangeStats> {
        let raw: Value = self
            .http
            .get_with_params(&self.url("/echanges/stats"), &filter.to_query_pairs())
            .await?;
        extract_entity(raw, "stats")
    }

    /// Analytics for one exchange. `GET /echanges/{uuid}/analytics`
    ///
    /// # Errors
    ///
    /// Returns transport and status errors.
    pub async fn analytics(&self, id: EchangeId) -> ApiResult<EchangeAnalytics> {
        let raw: Value = self
            .http
            .get(&self.url(&format!("/echanges/{}/analytics", id)))
            .await?;
        extract_entity(raw, "analytics")
    }

    // ========== Bulk ==========

    /// Applies a lifecycle event to many exchanges.
    /// `POST /echanges/bulk-update`
    ///
    /// The backend applies each item independently.
    ///
    /// # Errors
    ///
    /// Returns transport and status errors; per-item failures are reported
    /// in the outcome.
    pub async fn bulk_update(&self, ids: &[EchangeId], event: &BulkEvent) -> ApiResult<BulkOutcome> {
        let body = BulkUpdateBody {
            uuids: ids,
            statut: event.target(),
            event,
        };
        let raw: Value = self.http.post(&self.url("/echanges/bulk-update"), &body).await?;
        let outcome: BulkOutcome = extract_entity(raw, "result")?;
        log_outcome("bulk-update", &outcome);
        Ok(outcome)
    }

    /// Deletes many exchanges. `POST /echanges/bulk-delete`
    ///
    /// # Errors
    ///
    /// Returns transport and status errors; per-item failures are reported
    /// in the outcome.
    pub async fn bulk_delete(&self, ids: &[EchangeId]) -> ApiResult<BulkOutcome> {
        let body = BulkDeleteBody { uuids: ids };
        let raw: Value = self.http.post(&self.url("/echanges/bulk-delete"), &body).await?;
        let outcome: BulkOutcome = extract_entity(raw, "result")?;
        log_outcome("bulk-delete", &outcome);
        Ok(outcome)
    }
}

fn log_outcome(operation: &str, outcome: &BulkOutcome) {
    if outcome.is_complete_success() {
        debug!(operation, %outcome, "Bulk operation done");
    } else {
        warn!(operation, %outcome, "Bulk operation partially failed");
    }
}
