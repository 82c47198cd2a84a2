//! # Echange Service
//!
//! Orchestrates the exchange use cases over the repository ports.
//!
//! Every mutating operation follows the same steps: load the aggregate, apply
//! the domain operation, then save. Domain errors are raised before anything
//! is written. Of two concurrent mutations of the same exchange, the second
//! save fails with a version conflict and nothing of it is stored; the
//! exchange is saved before any proposition it affects.
//!
//! Bulk operations fan out per item with `futures::future::join_all` and
//! report per-item results in a [`BulkOutcome`]. Items that succeeded stay
//! applied when others fail.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{
    Echange, EchangeCreateData, EchangeMetrics, EchangeProposition, EchangeReview,
    EchangeUpdateData, PropositionCreateData, ReviewCreateData, average_note,
};
use crate::domain::errors::DomainError;
use crate::domain::services::bulk::{BulkEvent, BulkOutcome};
use crate::domain::services::equity::{EquityEvaluation, evaluate_equity};
use crate::domain::services::query::{
    EchangeAnalytics, EchangeFilter, EchangeQuery, EchangeStats, Page, analytics, compute_stats,
};
use crate::domain::services::validation::{ValidationPolicy, ValidationReport, validate};
use crate::domain::value_objects::{
    Actor, ActorRole, EchangeId, PropositionId, PropositionStatut, Timestamp, UserId,
};
use crate::infrastructure::persistence::in_memory::{
    InMemoryEchangeRepository, InMemoryPropositionRepository, InMemoryReviewRepository,
};
use crate::infrastructure::persistence::{
    EchangeRepository, PropositionRepository, ReviewRepository,
};
use futures::future::join_all;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An exchange together with the validation report of its latest content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEchange {
    /// The stored exchange.
    pub echange: Echange,
    /// Warnings and suggestions raised by validation. Never has errors.
    pub report: ValidationReport,
}

/// Application service for exchanges, propositions and reviews.
#[derive(Clone)]
pub struct EchangeService {
    echanges: Arc<dyn EchangeRepository>,
    propositions: Arc<dyn PropositionRepository>,
    reviews: Arc<dyn ReviewRepository>,
    policy: ValidationPolicy,
}

impl fmt::Debug for EchangeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EchangeService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl EchangeService {
    /// Creates a service over the given repositories with the default policy.
    #[must_use]
    pub fn new(
        echanges: Arc<dyn EchangeRepository>,
        propositions: Arc<dyn PropositionRepository>,
        reviews: Arc<dyn ReviewRepository>,
    ) -> Self {
        Self {
            echanges,
            propositions,
            reviews,
            policy: ValidationPolicy::default(),
        }
    }

    /// Creates a service backed by fresh in-memory repositories.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryEchangeRepository::new()),
            Arc::new(InMemoryPropositionRepository::new()),
            Arc::new(InMemoryReviewRepository::new()),
        )
    }

    /// Replaces the validation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the validation policy.
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    async fn load(&self, id: EchangeId) -> ApplicationResult<Echange> {
        self.echanges
            .get(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Echange", id.to_string()))
    }

    async fn load_proposition(&self, id: PropositionId) -> ApplicationResult<EchangeProposition> {
        self.propositions
            .get(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("EchangeProposition", id.to_string()))
    }

    /// Loads, applies `op` and saves.
    async fn mutate<F>(&self, id: EchangeId, operation: &str, op: F) -> ApplicationResult<Echange>
    where
        F: FnOnce(&mut Echange) -> Result<(), DomainError>,
    {
        let mut echange = self.load(id).await?;
        let before = echange.statut();
        if let Err(e) = op(&mut echange) {
            warn!(echange = %id, operation, error = %e, "Exchange operation rejected");
            return Err(e.into());
        }
        self.echanges.save(&echange).await?;
        info!(
            echange = %id,
            operation,
            from = %before,
            to = %echange.statut(),
            "Exchange updated"
        );
        Ok(echange)
    }

    // ========== Content ==========

    /// Validates and stores a new draft exchange owned by `actor`.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Domain` with every violation if validation fails.
    /// - `ApplicationError::Repository` if the code reference is taken or the
    ///   store fails.
    pub async fn create(
        &self,
        data: EchangeCreateData,
        actor: &Actor,
    ) -> ApplicationResult<ValidatedEchange> {
        let report = validate(&data, &self.policy).into_result()?;
        let echange = Echange::create(data, actor.uuid(), &self.policy)?;
        self.echanges.save(&echange).await?;
        info!(
            echange = %echange.uuid(),
            code = echange.code_reference(),
            createur = %actor.uuid(),
            warnings = report.warnings.len(),
            "Exchange created"
        );
        Ok(ValidatedEchange { echange, report })
    }

    /// Edits a draft.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` for an unknown exchange.
    /// - `ApplicationError::Domain` for a non-creator, a non-draft or invalid
    ///   content.
    pub async fn update(
        &self,
        id: EchangeId,
        data: EchangeUpdateData,
        actor: &Actor,
    ) -> ApplicationResult<ValidatedEchange> {
        let mut report = ValidationReport::default();
        let echange = self
            .mutate(id, "update", |e| {
                report = e.update(data, actor, &self.policy)?;
                Ok(())
            })
            .await?;
        Ok(ValidatedEchange { echange, report })
    }

    /// Fetches an exchange.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if it does not exist.
    pub async fn get(&self, id: EchangeId) -> ApplicationResult<Echange> {
        self.load(id).await
    }

    /// Fetches an exchange by its reference.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if no exchange has this reference.
    pub async fn get_by_code(&self, code_reference: &str) -> ApplicationResult<Echange> {
        self.echanges
            .find_by_code(code_reference)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Echange", code_reference))
    }

    /// Deletes an exchange. Only its creator or a moderator may.
    ///
    /// Propositions and reviews attached to it are kept.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` for an unknown exchange and
    /// `ApplicationError::Domain` for any other actor.
    pub async fn delete(&self, id: EchangeId, actor: &Actor) -> ApplicationResult<()> {
        let echange = self.load(id).await?;
        if echange.role_of(actor) == ActorRole::Contrepartie {
            return Err(
                DomainError::unauthorized("delete requires the creator or a moderator").into(),
            );
        }
        self.echanges.delete(&id).await?;
        info!(echange = %id, by = %actor.uuid(), "Exchange deleted");
        Ok(())
    }

    // ========== Lifecycle ==========

    /// Submits a draft for publication.
    ///
    /// # Errors
    ///
    /// See [`Echange::submit`].
    pub async fn submit(&self, id: EchangeId, actor: &Actor) -> ApplicationResult<Echange> {
        self.mutate(id, "submit", |e| e.submit(actor)).await
    }

    /// Withdraws a submission back to draft.
    ///
    /// # Errors
    ///
    /// See [`Echange::withdraw`].
    pub async fn withdraw(&self, id: EchangeId, actor: &Actor) -> ApplicationResult<Echange> {
        self.mutate(id, "withdraw", |e| e.withdraw(actor)).await
    }

    /// Publishes an exchange.
    ///
    /// # Errors
    ///
    /// See [`Echange::publish`].
    pub async fn publish(&self, id: EchangeId, actor: &Actor) -> ApplicationResult<Echange> {
        self.mutate(id, "publish", |e| e.publish(actor)).await
    }

    /// Blocks an exchange for moderation.
    ///
    /// # Errors
    ///
    /// See [`Echange::block`].
    pub async fn block(
        &self,
        id: EchangeId,
        actor: &Actor,
        motif: impl Into<String>,
    ) -> ApplicationResult<Echange> {
        let motif = motif.into();
        self.mutate(id, "block", |e| e.block(actor, motif)).await
    }

    /// Lifts a block.
    ///
    /// # Errors
    ///
    /// See [`Echange::unblock`].
    pub async fn unblock(&self, id: EchangeId, actor: &Actor) -> ApplicationResult<Echange> {
        self.mutate(id, "unblock", |e| e.unblock(actor)).await
    }

    /// Marks the swap as done.
    ///
    /// # Errors
    ///
    /// See [`Echange::finalize`].
    pub async fn finalize(&self, id: EchangeId, actor: &Actor) -> ApplicationResult<Echange> {
        self.mutate(id, "finalize", |e| e.finalize(actor)).await
    }

    /// Cancels an exchange.
    ///
    /// # Errors
    ///
    /// See [`Echange::cancel`].
    pub async fn cancel(
        &self,
        id: EchangeId,
        actor: &Actor,
        motif: Option<String>,
    ) -> ApplicationResult<Echange> {
        self.mutate(id, "cancel", |e| e.cancel(actor, motif)).await
    }

    /// Archives an exchange.
    ///
    /// # Errors
    ///
    /// See [`Echange::archive`].
    pub async fn archive(&self, id: EchangeId, actor: &Actor) -> ApplicationResult<Echange> {
        self.mutate(id, "archive", |e| e.archive(actor)).await
    }

    /// Restores an archived exchange, optionally with a new expiration date.
    ///
    /// # Errors
    ///
    /// See [`Echange::restore`].
    pub async fn restore(
        &self,
        id: EchangeId,
        actor: &Actor,
        nouvelle_expiration: Option<Timestamp>,
    ) -> ApplicationResult<Echange> {
        self.mutate(id, "restore", |e| e.restore(actor, nouvelle_expiration))
            .await
    }

    // ========== Moderation ==========

    /// Records moderator approval.
    ///
    /// # Errors
    ///
    /// See [`Echange::approve`].
    pub async fn approve(&self, id: EchangeId, actor: &Actor) -> ApplicationResult<Echange> {
        self.mutate(id, "approve", |e| e.approve(actor)).await
    }

    /// Withdraws moderator approval.
    ///
    /// # Errors
    ///
    /// See [`Echange::revoke_approval`].
    pub async fn revoke_approval(&self, id: EchangeId, actor: &Actor) -> ApplicationResult<Echange> {
        self.mutate(id, "revoke approval", |e| e.revoke_approval(actor))
            .await
    }

    /// Overwrites the counters after an audit.
    ///
    /// # Errors
    ///
    /// See [`Echange::correct_metrics`].
    pub async fn correct_metrics(
        &self,
        id: EchangeId,
        actor: &Actor,
        metriques: EchangeMetrics,
    ) -> ApplicationResult<Echange> {
        self.mutate(id, "correct metrics", |e| e.correct_metrics(actor, metriques))
            .await
    }

    /// Counts a view.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` for an unknown exchange.
    pub async fn record_view(&self, id: EchangeId) -> ApplicationResult<Echange> {
        let mut echange = self.load(id).await?;
        echange.record_view();
        self.echanges.save(&echange).await?;
        debug!(echange = %id, vues = echange.metriques().vues, "View recorded");
        Ok(echange)
    }

    /// Counts a user's interest.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` for an unknown exchange.
    pub async fn record_interest(&self, id: EchangeId) -> ApplicationResult<Echange> {
        let mut echange = self.load(id).await?;
        echange.record_interest();
        self.echanges.save(&echange).await?;
        debug!(
            echange = %id,
            interesses = echange.metriques().interesses,
            "Interest recorded"
        );
        Ok(echange)
    }

    // ========== Propositions ==========

    /// Submits a proposition on a published exchange.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` for an unknown exchange.
    /// - `ApplicationError::Domain` as described on
    ///   [`Echange::receive_proposition`].
    pub async fn create_proposition(
        &self,
        echange_id: EchangeId,
        data: PropositionCreateData,
        actor: &Actor,
    ) -> ApplicationResult<EchangeProposition> {
        let mut echange = self.load(echange_id).await?;
        let proposition = echange.receive_proposition(data, actor)?;
        self.echanges.save(&echange).await?;
        self.propositions.save(&proposition).await?;
        info!(
            echange = %echange_id,
            proposition = %proposition.uuid(),
            proposant = %actor.uuid(),
            "Proposition received"
        );
        Ok(proposition)
    }

    /// Moves a proposition through its lifecycle, updating the exchange.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` for an unknown proposition or exchange.
    /// - `ApplicationError::Domain` as described on
    ///   [`Echange::update_proposition_status`].
    pub async fn update_proposition_status(
        &self,
        proposition_id: PropositionId,
        statut: PropositionStatut,
        actor: &Actor,
        motif_refus: Option<String>,
    ) -> ApplicationResult<EchangeProposition> {
        let mut proposition = self.load_proposition(proposition_id).await?;
        let mut echange = self.load(proposition.echange_uuid()).await?;
        let before = echange.statut();

        if let Err(e) = echange.update_proposition_status(&mut proposition, statut, actor, motif_refus)
        {
            warn!(
                proposition = %proposition_id,
                target = %statut,
                error = %e,
                "Proposition update rejected"
            );
            return Err(e.into());
        }

        self.echanges.save(&echange).await?;
        self.propositions.save(&proposition).await?;
        info!(
            proposition = %proposition_id,
            statut = %statut,
            echange = %echange.uuid(),
            echange_from = %before,
            echange_to = %echange.statut(),
            "Proposition updated"
        );
        Ok(proposition)
    }

    /// Lists the propositions on an exchange, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_propositions(
        &self,
        echange_id: EchangeId,
    ) -> ApplicationResult<Vec<EchangeProposition>> {
        Ok(self.propositions.find_by_echange(&echange_id).await?)
    }

    /// Lists the propositions submitted by a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn propositions_of(&self, proposant: UserId) -> ApplicationResult<Vec<EchangeProposition>> {
        Ok(self.propositions.find_by_proposant(&proposant).await?)
    }

    // ========== Reviews ==========

    /// Adds a review to a finalized or cancelled exchange.
    ///
    /// Only the creator and users who made a proposition on the exchange may
    /// review it, once each.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` for an unknown exchange.
    /// - `ApplicationError::Domain` for an outsider, an open exchange or an
    ///   out-of-range note.
    /// - `ApplicationError::Repository` (conflict) for a second review.
    pub async fn add_review(
        &self,
        echange_id: EchangeId,
        data: ReviewCreateData,
        actor: &Actor,
    ) -> ApplicationResult<EchangeReview> {
        let echange = self.load(echange_id).await?;
        let participant = actor.uuid() == echange.createur_uuid()
            || self
                .propositions
                .find_by_echange(&echange_id)
                .await?
                .iter()
                .any(|p| p.proposant_uuid() == actor.uuid());
        if !participant {
            return Err(DomainError::unauthorized(
                "only participants of the exchange can review it",
            )
            .into());
        }

        let review = EchangeReview::new(&echange, actor.uuid(), data)?;
        self.reviews.save(&review).await?;
        info!(
            echange = %echange_id,
            review = %review.uuid(),
            note = review.note(),
            "Review added"
        );
        Ok(review)
    }

    /// Lists the reviews on an exchange, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_reviews(&self, echange_id: EchangeId) -> ApplicationResult<Vec<EchangeReview>> {
        Ok(self.reviews.find_by_echange(&echange_id).await?)
    }

    /// Average note of an exchange's reviews, `None` without reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn average_note(&self, echange_id: EchangeId) -> ApplicationResult<Option<Decimal>> {
        let reviews = self.reviews.find_by_echange(&echange_id).await?;
        Ok(average_note(&reviews))
    }

    // ========== Read side ==========

    /// Filters, sorts and paginates stored exchanges.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list(&self, query: &EchangeQuery) -> ApplicationResult<Page<Echange>> {
        let candidates = self.echanges.find(&query.filter).await?;
        Ok(query.apply(candidates))
    }

    /// Statistics over the exchanges matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn stats(&self, filter: &EchangeFilter) -> ApplicationResult<EchangeStats> {
        let echanges = self.echanges.find(filter).await?;
        Ok(compute_stats(&echanges))
    }

    /// Analytics for one exchange.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` for an unknown exchange.
    pub async fn analytics(&self, id: EchangeId) -> ApplicationResult<EchangeAnalytics> {
        Ok(analytics(&self.load(id).await?))
    }

    /// Equity evaluation of a stored exchange.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` for an unknown exchange.
    pub async fn evaluate_equity(&self, id: EchangeId) -> ApplicationResult<EquityEvaluation> {
        let echange = self.load(id).await?;
        Ok(evaluate_equity(&echange, &self.policy.equity))
    }

    // ========== Bulk ==========

    /// Applies `event` to every exchange in `ids`.
    ///
    /// Items are independent: a failure is recorded and the others proceed.
    /// Nothing is rolled back.
    pub async fn bulk_update_status(
        &self,
        ids: &[EchangeId],
        event: &BulkEvent,
        actor: &Actor,
    ) -> BulkOutcome {
        let operation = event.name();
        let results = join_all(
            ids.iter()
                .map(|id| self.mutate(*id, operation, |e| event.apply(e, actor))),
        )
        .await;
        let outcome = collect_outcome(ids, results.into_iter().map(|r| r.map(|_| ())));
        log_outcome("bulk update", &outcome);
        outcome
    }

    /// Deletes every exchange in `ids` the actor may delete.
    pub async fn bulk_delete(&self, ids: &[EchangeId], actor: &Actor) -> BulkOutcome {
        let results = join_all(ids.iter().map(|id| self.delete(*id, actor))).await;
        let outcome = collect_outcome(ids, results);
        log_outcome("bulk delete", &outcome);
        outcome
    }
}

fn collect_outcome(
    ids: &[EchangeId],
    results: impl IntoIterator<Item = ApplicationResult<()>>,
) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(()) => outcome.push_success(*id),
            Err(e) => outcome.push_failure(*id, e.user_message()),
        }
    }
    outcome
}

fn log_outcome(operation: &str, outcome: &BulkOutcome) {
    if outcome.is_complete_success() {
        info!(operation, %outcome, "Bulk operation done");
    } else {
        warn!(operation, %outcome, "Bulk operation partially failed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::Offre;
    use crate::domain::value_objects::{EchangeStatut, TypeObjet};

    fn data(titre: &str) -> EchangeCreateData {
        EchangeCreateData::builder(
            titre,
            "Description suffisamment détaillée",
            crate::domain::value_objects::CategorieId::new_v4(),
            "Objet proposé",
            "Objet recherché",
        )
        .build()
    }

    fn offer() -> PropositionCreateData {
        PropositionCreateData::new(Offre::new(TypeObjet::Produit, "Une platine vinyle"))
    }

    async fn published(service: &EchangeService) -> (Echange, Actor) {
        let createur = Actor::utilisateur(UserId::new_v4());
        let created = service.create(data("Vélo"), &createur).await.unwrap();
        let echange = service
            .publish(created.echange.uuid(), &createur)
            .await
            .unwrap();
        (echange, createur)
    }

    mod content {
        use super::*;

        #[tokio::test]
        async fn create_stores_draft() {
            let service = EchangeService::in_memory();
            let actor = Actor::utilisateur(UserId::new_v4());
            let created = service.create(data("Guitare"), &actor).await.unwrap();

            assert_eq!(created.echange.statut(), EchangeStatut::Brouillon);
            assert!(created.report.is_valid());
            let stored = service.get(created.echange.uuid()).await.unwrap();
            assert_eq!(stored, created.echange);
            let by_code = service
                .get_by_code(created.echange.code_reference())
                .await
                .unwrap();
            assert_eq!(by_code.uuid(), stored.uuid());
        }

        #[tokio::test]
        async fn create_rejects_invalid_data_without_saving() {
            let service = EchangeService::in_memory();
            let actor = Actor::utilisateur(UserId::new_v4());
            let err = service.create(data(""), &actor).await.unwrap_err();

            assert!(err.is_validation());
            let page = service.list(&EchangeQuery::new()).await.unwrap();
            assert_eq!(page.total, 0);
        }

        #[tokio::test]
        async fn update_by_stranger_is_unauthorized() {
            let service = EchangeService::in_memory();
            let actor = Actor::utilisateur(UserId::new_v4());
            let created = service.create(data("Guitare"), &actor).await.unwrap();

            let update = EchangeUpdateData {
                titre: Some("Guitare électrique".into()),
                ..EchangeUpdateData::default()
            };
            let err = service
                .update(
                    created.echange.uuid(),
                    update.clone(),
                    &Actor::utilisateur(UserId::new_v4()),
                )
                .await
                .unwrap_err();
            assert!(err.is_unauthorized());

            let updated = service
                .update(created.echange.uuid(), update, &actor)
                .await
                .unwrap();
            assert_eq!(updated.echange.titre(), "Guitare électrique");
        }

        #[tokio::test]
        async fn unknown_exchange_is_not_found() {
            let service = EchangeService::in_memory();
            let err = service.get(EchangeId::new_v4()).await.unwrap_err();
            assert!(err.is_not_found());
        }
    }

    mod lifecycle {
        use super::*;

        #[tokio::test]
        async fn rejected_transition_is_not_saved() {
            let service = EchangeService::in_memory();
            let (echange, createur) = published(&service).await;

            let err = service.finalize(echange.uuid(), &createur).await.unwrap_err();
            assert!(err.is_state_error());
            let stored = service.get(echange.uuid()).await.unwrap();
            assert_eq!(stored.statut(), EchangeStatut::Publie);
            assert_eq!(stored.version(), echange.version());
        }

        #[tokio::test]
        async fn counters_are_persisted() {
            let service = EchangeService::in_memory();
            let (echange, _) = published(&service).await;

            service.record_view(echange.uuid()).await.unwrap();
            service.record_view(echange.uuid()).await.unwrap();
            service.record_interest(echange.uuid()).await.unwrap();

            let stats = service.analytics(echange.uuid()).await.unwrap();
            assert_eq!(stats.vues, 2);
            assert_eq!(stats.interesses, 1);
        }

        #[tokio::test]
        async fn moderation_round_trip() {
            let service = EchangeService::in_memory();
            let (echange, _) = published(&service).await;
            let modo = Actor::moderateur(UserId::new_v4());

            let blocked = service
                .block(echange.uuid(), &modo, "Contenu trompeur")
                .await
                .unwrap();
            assert_eq!(blocked.statut(), EchangeStatut::Bloque);

            let unblocked = service.unblock(echange.uuid(), &modo).await.unwrap();
            assert_eq!(unblocked.statut(), EchangeStatut::Publie);

            let approved = service.approve(echange.uuid(), &modo).await.unwrap();
            assert!(approved.est_valide());
        }

        #[tokio::test]
        async fn delete_requires_creator_or_moderator() {
            let service = EchangeService::in_memory();
            let (echange, createur) = published(&service).await;

            let err = service
                .delete(echange.uuid(), &Actor::utilisateur(UserId::new_v4()))
                .await
                .unwrap_err();
            assert!(err.is_unauthorized());

            service.delete(echange.uuid(), &createur).await.unwrap();
            assert!(service.get(echange.uuid()).await.unwrap_err().is_not_found());
        }
    }

    mod propositions {
        use super::*;

        #[tokio::test]
        async fn accept_moves_exchange_to_negocie() {
            let service = EchangeService::in_memory();
            let (echange, createur) = published(&service).await;
            let proposant = Actor::utilisateur(UserId::new_v4());

            let proposition = service
                .create_proposition(echange.uuid(), offer(), &proposant)
                .await
                .unwrap();
            let accepted = service
                .update_proposition_status(
                    proposition.uuid(),
                    PropositionStatut::Acceptee,
                    &createur,
                    None,
                )
                .await
                .unwrap();

            assert_eq!(accepted.statut(), PropositionStatut::Acceptee);
            let stored = service.get(echange.uuid()).await.unwrap();
            assert_eq!(stored.statut(), EchangeStatut::Negocie);
            assert_eq!(stored.metriques().propositions_recues, 1);
            assert_eq!(stored.metriques().propositions_acceptees, 1);
            assert_eq!(service.list_propositions(echange.uuid()).await.unwrap().len(), 1);
            assert_eq!(
                service.propositions_of(proposant.uuid()).await.unwrap().len(),
                1
            );
        }

        #[tokio::test]
        async fn proposant_cannot_accept_own_proposition() {
            let service = EchangeService::in_memory();
            let (echange, _) = published(&service).await;
            let proposant = Actor::utilisateur(UserId::new_v4());
            let proposition = service
                .create_proposition(echange.uuid(), offer(), &proposant)
                .await
                .unwrap();

            let err = service
                .update_proposition_status(
                    proposition.uuid(),
                    PropositionStatut::Acceptee,
                    &proposant,
                    None,
                )
                .await
                .unwrap_err();
            assert!(err.is_unauthorized());
        }

        #[tokio::test]
        async fn unknown_proposition_is_not_found() {
            let service = EchangeService::in_memory();
            let err = service
                .update_proposition_status(
                    PropositionId::new_v4(),
                    PropositionStatut::Etudiee,
                    &Actor::utilisateur(UserId::new_v4()),
                    None,
                )
                .await
                .unwrap_err();
            assert!(err.is_not_found());
        }
    }

    mod reviews {
        use super::*;

        #[tokio::test]
        async fn participants_review_once() {
            let service = EchangeService::in_memory();
            let (echange, createur) = published(&service).await;
            let proposant = Actor::utilisateur(UserId::new_v4());
            service
                .create_proposition(echange.uuid(), offer(), &proposant)
                .await
                .unwrap();
            service.cancel(echange.uuid(), &createur, None).await.unwrap();

            service
                .add_review(echange.uuid(), ReviewCreateData::new(4), &createur)
                .await
                .unwrap();
            service
                .add_review(echange.uuid(), ReviewCreateData::new(5), &proposant)
                .await
                .unwrap();

            let again = service
                .add_review(echange.uuid(), ReviewCreateData::new(1), &proposant)
                .await
                .unwrap_err();
            assert!(again.is_conflict());

            let outsider = service
                .add_review(
                    echange.uuid(),
                    ReviewCreateData::new(1),
                    &Actor::utilisateur(UserId::new_v4()),
                )
                .await
                .unwrap_err();
            assert!(outsider.is_unauthorized());

            assert_eq!(service.list_reviews(echange.uuid()).await.unwrap().len(), 2);
            assert_eq!(
                service.average_note(echange.uuid()).await.unwrap(),
                Some(Decimal::new(450, 2))
            );
        }

        #[tokio::test]
        async fn open_exchange_cannot_be_reviewed() {
            let service = EchangeService::in_memory();
            let (echange, createur) = published(&service).await;
            let err = service
                .add_review(echange.uuid(), ReviewCreateData::new(4), &createur)
                .await
                .unwrap_err();
            assert!(err.is_state_error());
        }
    }

    mod bulk {
        use super::*;

        #[tokio::test]
        async fn bulk_update_counts_each_item() {
            let service = EchangeService::in_memory();
            let createur = Actor::utilisateur(UserId::new_v4());
            let a = service.create(data("Lampe"), &createur).await.unwrap();
            let b = service.create(data("Chaise"), &createur).await.unwrap();
            service.submit(b.echange.uuid(), &createur).await.unwrap();
            service.publish(b.echange.uuid(), &createur).await.unwrap();
            let missing = EchangeId::new_v4();

            let ids = [a.echange.uuid(), b.echange.uuid(), missing];
            let outcome = service
                .bulk_update_status(&ids, &BulkEvent::Submit, &createur)
                .await;

            assert_eq!(outcome.succeeded, vec![a.echange.uuid()]);
            assert_eq!(outcome.failed.len(), 2);
            assert_eq!(outcome.to_string(), "1 succeeded, 2 failed");
            assert_eq!(
                service.get(a.echange.uuid()).await.unwrap().statut(),
                EchangeStatut::EnAttente
            );
        }

        #[tokio::test]
        async fn bulk_delete_skips_foreign_exchanges() {
            let service = EchangeService::in_memory();
            let owner = Actor::utilisateur(UserId::new_v4());
            let other = Actor::utilisateur(UserId::new_v4());
            let mine = service.create(data("Lampe"), &owner).await.unwrap();
            let theirs = service.create(data("Chaise"), &other).await.unwrap();

            let outcome = service
                .bulk_delete(&[mine.echange.uuid(), theirs.echange.uuid()], &owner)
                .await;

            assert_eq!(outcome.succeeded, vec![mine.echange.uuid()]);
            assert_eq!(outcome.failed.len(), 1);
            assert!(service.get(theirs.echange.uuid()).await.is_ok());
        }
    }
}
