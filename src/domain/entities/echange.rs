//! # Echange Aggregate Root
//!
//! The [`Echange`] aggregate owns a listing's content, its lifecycle status,
//! moderation sign-off, counters and transition history.
//!
//! # State Machine
//!
//! ```text
//! Brouillon ⇄ EnAttente → Publie → EnCours → Negocie → Finalise → Archive
//!     │           │          │        │         │                   │
//!     └───────────┴──────────┴────────┴─────────┴→ Bloque / Annule  │
//!                            ▲                                      │
//!                            └──────────── restore ─────────────────┘
//! ```
//!
//! Every transition goes through a single guarded path that checks the
//! [`EchangeStatut`] table, bumps the version and appends a
//! [`TransitionRecord`] carrying the actor and the role they held.
//!
//! # Examples
//!
//! ```
//! use echange_core::domain::entities::{Echange, EchangeCreateData};
//! use echange_core::domain::services::validation::ValidationPolicy;
//! use echange_core::domain::value_objects::{Actor, CategorieId, EchangeStatut, UserId};
//!
//! let createur = UserId::new_v4();
//! let data = EchangeCreateData::builder(
//!     "Vélo de route",
//!     "Vélo de route en aluminium, taille 56",
//!     CategorieId::new_v4(),
//!     "Vélo de route",
//!     "Guitare acoustique",
//! )
//! .build();
//!
//! let mut echange = Echange::create(data, createur, &ValidationPolicy::default()).unwrap();
//! echange.publish(&Actor::utilisateur(createur)).unwrap();
//!
//! assert_eq!(echange.statut(), EchangeStatut::Publie);
//! assert!(echange.date_publication().is_some());
//! ```

use crate::domain::entities::proposition::{EchangeProposition, PropositionCreateData};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::validation::{ValidationPolicy, ValidationReport, validate};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{
    Actor, ActorRole, CategorieId, Conditions, EchangeId, EchangeStatut, Localisation,
    ObjetEchange, PropositionStatut, Recherche, TypeObjet, UserId, ValueRange,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of human-readable exchange references.
pub const CODE_REFERENCE_PREFIX: &str = "ECH";

/// Builds a reference of the form `ECH-YYYYMMDD-XXXXXXXX` from the creation
/// date and the leading hex digits of the id.
#[must_use]
pub fn code_reference(uuid: EchangeId, date_creation: Timestamp) -> String {
    let hex = uuid.as_uuid().simple().to_string().to_uppercase();
    let suffix = hex.get(..8).unwrap_or(&hex);
    format!(
        "{CODE_REFERENCE_PREFIX}-{}-{suffix}",
        date_creation.to_date_code()
    )
}

/// Read-only view over the listing content shared by [`Echange`] and
/// [`EchangeCreateData`]. Validation and equity evaluation run on it.
#[derive(Debug, Clone, Copy)]
pub struct EchangeContent<'a> {
    /// Title.
    pub titre: &'a str,
    /// Full description.
    pub description: &'a str,
    /// Short description for result lists.
    pub description_courte: Option<&'a str>,
    /// Category reference.
    pub categorie_uuid: Option<CategorieId>,
    /// Search tags.
    pub tags: &'a [String],
    /// Image references.
    pub images: &'a [String],
    /// Hand-over location.
    pub localisation: Option<&'a Localisation>,
    /// Whether the swap can happen remotely.
    pub echange_a_distance: bool,
    /// What is offered.
    pub objet_echange: &'a ObjetEchange,
    /// What is wanted.
    pub recherche: &'a Recherche,
    /// Swap mechanics.
    pub conditions: &'a Conditions,
}

impl<'a> From<&'a EchangeCreateData> for EchangeContent<'a> {
    fn from(data: &'a EchangeCreateData) -> Self {
        Self {
            titre: &data.titre,
            description: &data.description,
            description_courte: data.description_courte.as_deref(),
            categorie_uuid: data.categorie_uuid,
            tags: &data.tags,
            images: &data.images,
            localisation: data.localisation.as_ref(),
            echange_a_distance: data.echange_a_distance,
            objet_echange: &data.objet_echange,
            recherche: &data.recherche,
            conditions: &data.conditions,
        }
    }
}

impl<'a> From<&'a Echange> for EchangeContent<'a> {
    fn from(echange: &'a Echange) -> Self {
        Self {
            titre: &echange.titre,
            description: &echange.description,
            description_courte: echange.description_courte.as_deref(),
            categorie_uuid: Some(echange.categorie_uuid),
            tags: &echange.tags,
            images: &echange.images,
            localisation: echange.localisation.as_ref(),
            echange_a_distance: echange.echange_a_distance,
            objet_echange: &echange.objet_echange,
            recherche: &echange.recherche,
            conditions: &echange.conditions,
        }
    }
}

/// Input for a new exchange.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EchangeCreateData {
    /// Title.
    pub titre: String,
    /// Full description.
    pub description: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_courte: Option<String>,
    /// Category reference.
    pub categorie_uuid: Option<CategorieId>,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Image references.
    #[serde(default)]
    pub images: Vec<String>,
    /// Hand-over location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localisation: Option<Localisation>,
    /// Whether the swap can happen remotely.
    #[serde(default)]
    pub echange_a_distance: bool,
    /// What is offered.
    pub objet_echange: ObjetEchange,
    /// What is wanted.
    pub recherche: Recherche,
    /// Swap mechanics.
    #[serde(default)]
    pub conditions: Conditions,
    /// Overrides the default validity window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_expiration: Option<Timestamp>,
}

impl EchangeCreateData {
    /// Returns a builder seeded with the required fields.
    ///
    /// Both sides default to [`TypeObjet::Produit`].
    #[must_use]
    pub fn builder(
        titre: impl Into<String>,
        description: impl Into<String>,
        categorie_uuid: CategorieId,
        objet_description: impl Into<String>,
        recherche_description: impl Into<String>,
    ) -> EchangeCreateDataBuilder {
        EchangeCreateDataBuilder {
            data: Self {
                titre: titre.into(),
                description: description.into(),
                categorie_uuid: Some(categorie_uuid),
                objet_echange: ObjetEchange::new(TypeObjet::Produit, objet_description),
                recherche: Recherche::new(TypeObjet::Produit, recherche_description),
                ..Self::default()
            },
        }
    }
}

/// Fluent builder for [`EchangeCreateData`].
#[derive(Debug, Clone)]
pub struct EchangeCreateDataBuilder {
    data: EchangeCreateData,
}

impl EchangeCreateDataBuilder {
    /// Replaces the offered object.
    #[must_use]
    pub fn objet(mut self, objet: ObjetEchange) -> Self {
        self.data.objet_echange = objet;
        self
    }

    /// Replaces the search description.
    #[must_use]
    pub fn recherche(mut self, recherche: Recherche) -> Self {
        self.data.recherche = recherche;
        self
    }

    /// Sets the offered object's estimated value.
    #[must_use]
    pub fn valeur_estimee(mut self, valeur: Decimal) -> Self {
        self.data.objet_echange.valeur_estimee = Some(valeur);
        self
    }

    /// Sets the accepted value range.
    #[must_use]
    pub fn valeurs_acceptees(mut self, range: ValueRange) -> Self {
        self.data.recherche.valeurs_acceptees = Some(range);
        self
    }

    /// Sets the swap mechanics.
    #[must_use]
    pub fn conditions(mut self, conditions: Conditions) -> Self {
        self.data.conditions = conditions;
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.data.tags = tags;
        self
    }

    /// Sets the image references.
    #[must_use]
    pub fn images(mut self, images: Vec<String>) -> Self {
        self.data.images = images;
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn localisation(mut self, localisation: Localisation) -> Self {
        self.data.localisation = Some(localisation);
        self
    }

    /// Marks the swap as possible remotely.
    #[must_use]
    pub fn a_distance(mut self, a_distance: bool) -> Self {
        self.data.echange_a_distance = a_distance;
        self
    }

    /// Sets the short description.
    #[must_use]
    pub fn description_courte(mut self, description: impl Into<String>) -> Self {
        self.data.description_courte = Some(description.into());
        self
    }

    /// Overrides the expiration date.
    #[must_use]
    pub fn expiration(mut self, date: Timestamp) -> Self {
        self.data.date_expiration = Some(date);
        self
    }

    /// Returns the assembled input.
    #[must_use]
    pub fn build(self) -> EchangeCreateData {
        self.data
    }
}

/// Partial content update. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EchangeUpdateData {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titre: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New short description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_courte: Option<String>,
    /// New category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie_uuid: Option<CategorieId>,
    /// New tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// New location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localisation: Option<Localisation>,
    /// New remote flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echange_a_distance: Option<bool>,
    /// New offered object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objet_echange: Option<ObjetEchange>,
    /// New search description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recherche: Option<Recherche>,
    /// New mechanics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
    /// New expiration date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_expiration: Option<Timestamp>,
}

impl EchangeUpdateData {
    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Activity counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EchangeMetrics {
    /// Page views.
    pub vues: u64,
    /// Users who flagged interest.
    pub interesses: u64,
    /// Propositions received.
    pub propositions_recues: u64,
    /// Propositions accepted.
    pub propositions_acceptees: u64,
    /// Completed swaps.
    pub echanges_realises: u64,
}

/// One entry of the transition history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Status before.
    pub from: EchangeStatut,
    /// Status after.
    pub to: EchangeStatut,
    /// Who triggered it.
    pub acteur_uuid: UserId,
    /// Role held by the actor.
    pub role: ActorRole,
    /// When it happened.
    pub date: Timestamp,
}

/// A marketplace exchange listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echange {
    uuid: EchangeId,
    code_reference: String,
    titre: String,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description_courte: Option<String>,
    categorie_uuid: CategorieId,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    localisation: Option<Localisation>,
    #[serde(default)]
    echange_a_distance: bool,
    objet_echange: ObjetEchange,
    recherche: Recherche,
    #[serde(default)]
    conditions: Conditions,
    statut: EchangeStatut,
    #[serde(default)]
    est_valide: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    valide_par: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_validation: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    motif_blocage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    motif_annulation: Option<String>,
    #[serde(flatten)]
    metriques: EchangeMetrics,
    createur_uuid: UserId,
    date_creation: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_publication: Option<Timestamp>,
    date_modification: Timestamp,
    date_expiration: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_archivage: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_finalisation: Option<Timestamp>,
    #[serde(default)]
    historique: Vec<TransitionRecord>,
    #[serde(default)]
    version: u64,
}

impl Echange {
    /// Creates a draft exchange from validated input.
    ///
    /// The exchange starts in [`EchangeStatut::Brouillon`] with zeroed
    /// counters; publication is always a separate step.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` listing every violated rule.
    pub fn create(
        data: EchangeCreateData,
        createur_uuid: UserId,
        policy: &ValidationPolicy,
    ) -> DomainResult<Self> {
        validate(&data, policy).into_result()?;
        let categorie_uuid = data
            .categorie_uuid
            .ok_or_else(|| DomainError::validation("La catégorie est requise"))?;

        let uuid = EchangeId::new_v4();
        let now = Timestamp::now();
        let date_expiration = data
            .date_expiration
            .unwrap_or_else(|| now.add_days(policy.delai_validite_jours));

        Ok(Self {
            uuid,
            code_reference: code_reference(uuid, now),
            titre: data.titre.trim().to_string(),
            description: data.description,
            description_courte: data.description_courte,
            categorie_uuid,
            tags: data.tags,
            images: data.images,
            localisation: data.localisation,
            echange_a_distance: data.echange_a_distance,
            objet_echange: data.objet_echange,
            recherche: data.recherche,
            conditions: data.conditions,
            statut: EchangeStatut::Brouillon,
            est_valide: false,
            valide_par: None,
            date_validation: None,
            motif_blocage: None,
            motif_annulation: None,
            metriques: EchangeMetrics::default(),
            createur_uuid,
            date_creation: now,
            date_publication: None,
            date_modification: now,
            date_expiration,
            date_archivage: None,
            date_finalisation: None,
            historique: Vec::new(),
            version: 1,
        })
    }

    // ========== Accessors ==========

    /// Returns the exchange ID.
    #[inline]
    #[must_use]
    pub fn uuid(&self) -> EchangeId {
        self.uuid
    }

    /// Returns the human-readable reference.
    #[inline]
    #[must_use]
    pub fn code_reference(&self) -> &str {
        &self.code_reference
    }

    /// Returns the title.
    #[inline]
    #[must_use]
    pub fn titre(&self) -> &str {
        &self.titre
    }

    /// Returns the description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the short description.
    #[inline]
    #[must_use]
    pub fn description_courte(&self) -> Option<&str> {
        self.description_courte.as_deref()
    }

    /// Returns the category.
    #[inline]
    #[must_use]
    pub fn categorie_uuid(&self) -> CategorieId {
        self.categorie_uuid
    }

    /// Returns the tags.
    #[inline]
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the image references.
    #[inline]
    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Returns the location.
    #[inline]
    #[must_use]
    pub fn localisation(&self) -> Option<&Localisation> {
        self.localisation.as_ref()
    }

    /// Returns true if the swap can happen remotely.
    #[inline]
    #[must_use]
    pub fn echange_a_distance(&self) -> bool {
        self.echange_a_distance
    }

    /// Returns the offered object.
    #[inline]
    #[must_use]
    pub fn objet_echange(&self) -> &ObjetEchange {
        &self.objet_echange
    }

    /// Returns what is wanted in return.
    #[inline]
    #[must_use]
    pub fn recherche(&self) -> &Recherche {
        &self.recherche
    }

    /// Returns the swap mechanics.
    #[inline]
    #[must_use]
    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    /// Returns the lifecycle status.
    #[inline]
    #[must_use]
    pub fn statut(&self) -> EchangeStatut {
        self.statut
    }

    /// Returns true once a moderator signed the listing off.
    #[inline]
    #[must_use]
    pub fn est_valide(&self) -> bool {
        self.est_valide
    }

    /// Returns the moderator who signed it off.
    #[inline]
    #[must_use]
    pub fn valide_par(&self) -> Option<UserId> {
        self.valide_par
    }

    /// Returns when it was signed off.
    #[inline]
    #[must_use]
    pub fn date_validation(&self) -> Option<Timestamp> {
        self.date_validation
    }

    /// Returns the blocking reason.
    #[inline]
    #[must_use]
    pub fn motif_blocage(&self) -> Option<&str> {
        self.motif_blocage.as_deref()
    }

    /// Returns the cancellation reason.
    #[inline]
    #[must_use]
    pub fn motif_annulation(&self) -> Option<&str> {
        self.motif_annulation.as_deref()
    }

    /// Returns the activity counters.
    #[inline]
    #[must_use]
    pub fn metriques(&self) -> &EchangeMetrics {
        &self.metriques
    }

    /// Returns the creator.
    #[inline]
    #[must_use]
    pub fn createur_uuid(&self) -> UserId {
        self.createur_uuid
    }

    /// Returns the creation date.
    #[inline]
    #[must_use]
    pub fn date_creation(&self) -> Timestamp {
        self.date_creation
    }

    /// Returns the publication date.
    #[inline]
    #[must_use]
    pub fn date_publication(&self) -> Option<Timestamp> {
        self.date_publication
    }

    /// Returns the last modification date.
    #[inline]
    #[must_use]
    pub fn date_modification(&self) -> Timestamp {
        self.date_modification
    }

    /// Returns the expiration date.
    #[inline]
    #[must_use]
    pub fn date_expiration(&self) -> Timestamp {
        self.date_expiration
    }

    /// Returns the archiving date.
    #[inline]
    #[must_use]
    pub fn date_archivage(&self) -> Option<Timestamp> {
        self.date_archivage
    }

    /// Returns the finalization date.
    #[inline]
    #[must_use]
    pub fn date_finalisation(&self) -> Option<Timestamp> {
        self.date_finalisation
    }

    /// Returns the transition history, oldest first.
    #[inline]
    #[must_use]
    pub fn historique(&self) -> &[TransitionRecord] {
        &self.historique
    }

    /// Returns the version, incremented on every mutation.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns true once the expiration date has passed.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.date_expiration.is_expired()
    }

    /// Returns the role `actor` holds on this exchange.
    #[must_use]
    pub fn role_of(&self, actor: &Actor) -> ActorRole {
        if actor.uuid() == self.createur_uuid {
            ActorRole::Createur
        } else if actor.est_moderateur() {
            ActorRole::Moderateur
        } else {
            ActorRole::Contrepartie
        }
    }

    // ========== Guards ==========

    fn ensure_creator(&self, actor: &Actor, operation: &str) -> DomainResult<()> {
        if actor.uuid() == self.createur_uuid {
            Ok(())
        } else {
            Err(DomainError::unauthorized(format!(
                "{operation} requires the exchange creator"
            )))
        }
    }

    fn ensure_moderator(actor: &Actor, operation: &str) -> DomainResult<()> {
        if actor.est_moderateur() {
            Ok(())
        } else {
            Err(DomainError::unauthorized(format!(
                "{operation} requires a moderator"
            )))
        }
    }

    fn ensure_creator_or_moderator(&self, actor: &Actor, operation: &str) -> DomainResult<()> {
        if actor.uuid() == self.createur_uuid || actor.est_moderateur() {
            Ok(())
        } else {
            Err(DomainError::unauthorized(format!(
                "{operation} requires the exchange creator or a moderator"
            )))
        }
    }

    fn ensure_from(&self, allowed: &[EchangeStatut], target: EchangeStatut) -> DomainResult<()> {
        if allowed.contains(&self.statut) {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                from: self.statut,
                to: target,
            })
        }
    }

    fn missing_required_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.titre.trim().is_empty() {
            missing.push("Le titre est requis".to_string());
        }
        if self.description.trim().is_empty() {
            missing.push("La description est requise".to_string());
        }
        if self.objet_echange.description.trim().is_empty() {
            missing.push("La description de l'objet proposé est requise".to_string());
        }
        if self.recherche.description.trim().is_empty() {
            missing.push("La description de la recherche est requise".to_string());
        }
        missing
    }

    fn ensure_complete(&self) -> DomainResult<()> {
        let missing = self.missing_required_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(missing))
        }
    }

    fn touch(&mut self) {
        self.date_modification = Timestamp::now();
        self.version = self.version.saturating_add(1);
    }

    fn transition_to(
        &mut self,
        target: EchangeStatut,
        acteur_uuid: UserId,
        role: ActorRole,
    ) -> DomainResult<()> {
        if !self.statut.can_transition_to(target) {
            return Err(DomainError::InvalidStateTransition {
                from: self.statut,
                to: target,
            });
        }
        let now = Timestamp::now();
        self.historique.push(TransitionRecord {
            from: self.statut,
            to: target,
            acteur_uuid,
            role,
            date: now,
        });
        self.statut = target;
        self.date_modification = now;
        self.version = self.version.saturating_add(1);
        Ok(())
    }

    fn transition_as(&mut self, target: EchangeStatut, actor: &Actor) -> DomainResult<()> {
        let role = self.role_of(actor);
        self.transition_to(target, actor.uuid(), role)
    }

    // ========== Content ==========

    /// Applies a partial content update and re-validates the result.
    ///
    /// Returns the validation report so callers can surface warnings.
    ///
    /// # Errors
    ///
    /// - `DomainError::Unauthorized` if the actor is not the creator.
    /// - `DomainError::IncompatibleState` outside [`EchangeStatut::Brouillon`].
    /// - `DomainError::Validation` if the updated content breaks a rule.
    pub fn update(
        &mut self,
        data: EchangeUpdateData,
        actor: &Actor,
        policy: &ValidationPolicy,
    ) -> DomainResult<ValidationReport> {
        self.ensure_creator(actor, "update")?;
        if !self.statut.is_editable() {
            return Err(DomainError::IncompatibleState {
                operation: "update",
                statut: self.statut,
            });
        }

        let mut draft = self.clone();
        if let Some(titre) = data.titre {
            draft.titre = titre.trim().to_string();
        }
        if let Some(description) = data.description {
            draft.description = description;
        }
        if let Some(description_courte) = data.description_courte {
            draft.description_courte = Some(description_courte);
        }
        if let Some(categorie_uuid) = data.categorie_uuid {
            draft.categorie_uuid = categorie_uuid;
        }
        if let Some(tags) = data.tags {
            draft.tags = tags;
        }
        if let Some(images) = data.images {
            draft.images = images;
        }
        if let Some(localisation) = data.localisation {
            draft.localisation = Some(localisation);
        }
        if let Some(a_distance) = data.echange_a_distance {
            draft.echange_a_distance = a_distance;
        }
        if let Some(objet) = data.objet_echange {
            draft.objet_echange = objet;
        }
        if let Some(recherche) = data.recherche {
            draft.recherche = recherche;
        }
        if let Some(conditions) = data.conditions {
            draft.conditions = conditions;
        }
        if let Some(date_expiration) = data.date_expiration {
            draft.date_expiration = date_expiration;
        }

        let report = validate(&draft, policy).into_result()?;
        draft.touch();
        *self = draft;
        Ok(report)
    }

    // ========== State Transitions ==========

    /// Submits the draft for review.
    ///
    /// Transitions: Brouillon → EnAttente
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` for anyone but the creator,
    /// `DomainError::Validation` if required fields are missing, and
    /// `DomainError::InvalidStateTransition` outside Brouillon.
    pub fn submit(&mut self, actor: &Actor) -> DomainResult<()> {
        self.ensure_creator(actor, "submit")?;
        self.ensure_from(&[EchangeStatut::Brouillon], EchangeStatut::EnAttente)?;
        self.ensure_complete()?;
        self.transition_as(EchangeStatut::EnAttente, actor)
    }

    /// Withdraws a pending submission back to draft.
    ///
    /// Transitions: EnAttente → Brouillon
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` for anyone but the creator and
    /// `DomainError::InvalidStateTransition` outside EnAttente.
    pub fn withdraw(&mut self, actor: &Actor) -> DomainResult<()> {
        self.ensure_creator(actor, "withdraw")?;
        self.ensure_from(&[EchangeStatut::EnAttente], EchangeStatut::Brouillon)?;
        self.transition_as(EchangeStatut::Brouillon, actor)
    }

    /// Publishes the listing.
    ///
    /// Transitions: Brouillon/EnAttente → Publie
    ///
    /// # Errors
    ///
    /// - `DomainError::Unauthorized` unless creator or moderator.
    /// - `DomainError::InvalidStateTransition` from any other status.
    /// - `DomainError::Validation` if required fields are missing or the
    ///   listing already expired.
    pub fn publish(&mut self, actor: &Actor) -> DomainResult<()> {
        self.ensure_creator_or_moderator(actor, "publish")?;
        self.ensure_from(
            &[EchangeStatut::Brouillon, EchangeStatut::EnAttente],
            EchangeStatut::Publie,
        )?;
        self.ensure_complete()?;
        if self.is_expired() {
            return Err(DomainError::validation(
                "La date d'expiration est dépassée",
            ));
        }

        self.transition_as(EchangeStatut::Publie, actor)?;
        self.date_publication = self.date_publication.or(Some(self.date_modification));
        Ok(())
    }

    /// Blocks the listing for moderation.
    ///
    /// Transitions: Brouillon/EnAttente/Publie/EnCours/Negocie → Bloque
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` for non-moderators,
    /// `DomainError::Validation` for a blank reason and
    /// `DomainError::InvalidStateTransition` from terminal states.
    pub fn block(&mut self, actor: &Actor, motif: impl Into<String>) -> DomainResult<()> {
        Self::ensure_moderator(actor, "block")?;
        let motif = motif.into();
        if motif.trim().is_empty() {
            return Err(DomainError::validation("Le motif de blocage est requis"));
        }

        self.transition_as(EchangeStatut::Bloque, actor)?;
        self.motif_blocage = Some(motif);
        Ok(())
    }

    /// Lifts a block and puts the exchange back where it was blocked from.
    ///
    /// Transitions: Bloque → Brouillon/EnAttente/Publie/EnCours/Negocie
    ///
    /// Returning to Publie goes through the same completeness and expiration
    /// checks as [`publish`](Self::publish).
    ///
    /// # Errors
    ///
    /// - `DomainError::Unauthorized` for non-moderators.
    /// - `DomainError::InvalidStateTransition` outside Bloque.
    /// - `DomainError::Validation` when returning to Publie with missing
    ///   fields or a past expiration.
    pub fn unblock(&mut self, actor: &Actor) -> DomainResult<()> {
        Self::ensure_moderator(actor, "unblock")?;
        let target = self.status_before_block();
        self.ensure_from(&[EchangeStatut::Bloque], target)?;
        if target == EchangeStatut::Publie {
            self.ensure_complete()?;
            if self.is_expired() {
                return Err(DomainError::validation(
                    "La date d'expiration est dépassée",
                ));
            }
        }

        self.transition_as(target, actor)?;
        self.motif_blocage = None;
        if target == EchangeStatut::Publie {
            self.date_publication = self.date_publication.or(Some(self.date_modification));
        }
        Ok(())
    }

    /// Status the last block was applied from. Falls back to Publie when the
    /// history does not record it.
    fn status_before_block(&self) -> EchangeStatut {
        self.historique
            .iter()
            .rev()
            .find(|record| record.to == EchangeStatut::Bloque)
            .map_or(EchangeStatut::Publie, |record| record.from)
    }

    /// Completes the swap.
    ///
    /// Transitions: Negocie → Finalise
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` unless creator or moderator and
    /// `DomainError::InvalidStateTransition` outside Negocie.
    pub fn finalize(&mut self, actor: &Actor) -> DomainResult<()> {
        self.ensure_creator_or_moderator(actor, "finalize")?;
        self.transition_as(EchangeStatut::Finalise, actor)?;
        self.metriques.echanges_realises = self.metriques.echanges_realises.saturating_add(1);
        self.date_finalisation = self.date_finalisation.or(Some(self.date_modification));
        Ok(())
    }

    /// Cancels the exchange.
    ///
    /// Transitions: any non-terminal → Annule
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` unless creator or moderator and
    /// `DomainError::InvalidStateTransition` from terminal states.
    pub fn cancel(&mut self, actor: &Actor, motif: Option<String>) -> DomainResult<()> {
        self.ensure_creator_or_moderator(actor, "cancel")?;
        self.transition_as(EchangeStatut::Annule, actor)?;
        self.motif_annulation = motif.filter(|m| !m.trim().is_empty());
        Ok(())
    }

    /// Archives the exchange.
    ///
    /// Transitions: Finalise/Annule → Archive, or Publie → Archive once expired
    ///
    /// # Errors
    ///
    /// - `DomainError::Unauthorized` unless creator or moderator.
    /// - `DomainError::IncompatibleState` for a published listing that has
    ///   not expired yet.
    /// - `DomainError::InvalidStateTransition` from any other status.
    pub fn archive(&mut self, actor: &Actor) -> DomainResult<()> {
        self.ensure_creator_or_moderator(actor, "archive")?;
        if self.statut == EchangeStatut::Publie && !self.is_expired() {
            return Err(DomainError::IncompatibleState {
                operation: "archive",
                statut: self.statut,
            });
        }

        self.transition_as(EchangeStatut::Archive, actor)?;
        self.date_archivage = self.date_archivage.or(Some(self.date_modification));
        Ok(())
    }

    /// Restores an archived listing back to published.
    ///
    /// Transitions: Archive → Publie
    ///
    /// # Errors
    ///
    /// - `DomainError::Unauthorized` for non-moderators.
    /// - `DomainError::InvalidStateTransition` outside Archive.
    /// - `DomainError::Validation` if the (possibly extended) expiration date
    ///   has passed.
    pub fn restore(
        &mut self,
        actor: &Actor,
        nouvelle_expiration: Option<Timestamp>,
    ) -> DomainResult<()> {
        Self::ensure_moderator(actor, "restore")?;
        self.ensure_from(&[EchangeStatut::Archive], EchangeStatut::Publie)?;
        let expiration = nouvelle_expiration.unwrap_or(self.date_expiration);
        if expiration.is_expired() {
            return Err(DomainError::validation(
                "Impossible de restaurer un échange expiré",
            ));
        }

        self.transition_as(EchangeStatut::Publie, actor)?;
        self.date_expiration = expiration;
        self.date_archivage = None;
        Ok(())
    }

    // ========== Moderation ==========

    /// Signs the listing off. Independent of the lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` for non-moderators.
    pub fn approve(&mut self, actor: &Actor) -> DomainResult<()> {
        Self::ensure_moderator(actor, "approve")?;
        if self.est_valide {
            return Ok(());
        }
        self.est_valide = true;
        self.valide_par = Some(actor.uuid());
        self.touch();
        self.date_validation = Some(self.date_modification);
        Ok(())
    }

    /// Withdraws a previous sign-off.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` for non-moderators.
    pub fn revoke_approval(&mut self, actor: &Actor) -> DomainResult<()> {
        Self::ensure_moderator(actor, "revoke approval")?;
        if !self.est_valide {
            return Ok(());
        }
        self.est_valide = false;
        self.valide_par = None;
        self.date_validation = None;
        self.touch();
        Ok(())
    }

    /// Overwrites the counters after an audit.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` for non-moderators and
    /// `DomainError::OutOfRange` if accepted propositions exceed received ones.
    pub fn correct_metrics(&mut self, actor: &Actor, metriques: EchangeMetrics) -> DomainResult<()> {
        Self::ensure_moderator(actor, "correct metrics")?;
        if metriques.propositions_acceptees > metriques.propositions_recues {
            return Err(DomainError::out_of_range(
                "propositions_acceptees",
                format!(
                    "{} accepted exceeds {} received",
                    metriques.propositions_acceptees, metriques.propositions_recues
                ),
            ));
        }
        self.metriques = metriques;
        self.touch();
        Ok(())
    }

    // ========== Counters ==========

    /// Counts a page view.
    pub fn record_view(&mut self) {
        self.metriques.vues = self.metriques.vues.saturating_add(1);
        self.version = self.version.saturating_add(1);
    }

    /// Counts a user flagging interest.
    pub fn record_interest(&mut self) {
        self.metriques.interesses = self.metriques.interesses.saturating_add(1);
        self.version = self.version.saturating_add(1);
    }

    // ========== Propositions ==========

    /// Receives a counter-offer from a counterparty.
    ///
    /// Increments `propositions_recues` and returns the new proposition in
    /// [`PropositionStatut::EnAttente`].
    ///
    /// # Errors
    ///
    /// - `DomainError::IncompatibleState` unless Publie or EnCours.
    /// - `DomainError::Unauthorized` if the creator proposes on their own listing.
    /// - `DomainError::Validation` for an invalid offer, or a monetary
    ///   complement on a listing whose mode does not allow one.
    pub fn receive_proposition(
        &mut self,
        data: PropositionCreateData,
        actor: &Actor,
    ) -> DomainResult<EchangeProposition> {
        if !self.statut.accepts_propositions() {
            return Err(DomainError::IncompatibleState {
                operation: "create proposition",
                statut: self.statut,
            });
        }
        if actor.uuid() == self.createur_uuid {
            return Err(DomainError::unauthorized(
                "the creator cannot propose on their own exchange",
            ));
        }
        if data.complement_monetaire().is_some_and(|c| !c.is_zero())
            && !self.conditions.mode.allows_complement()
        {
            return Err(DomainError::validation(
                "Cet échange n'accepte pas de complément monétaire",
            ));
        }

        let proposition = EchangeProposition::new(self.uuid, actor.uuid(), data)?;
        self.metriques.propositions_recues = self.metriques.propositions_recues.saturating_add(1);
        self.touch();
        Ok(proposition)
    }

    /// Moves a proposition through its lifecycle and applies the side
    /// effects on this exchange.
    ///
    /// - `Negociee` moves a Publie exchange to EnCours.
    /// - `Acceptee` moves a Publie or EnCours exchange to Negocie and
    ///   increments `propositions_acceptees`.
    /// - `Refusee` and `Annulee` only touch the proposition.
    ///
    /// Only the proposant may cancel; every other change is made by the
    /// exchange creator. Nothing is mutated when an error is returned.
    ///
    /// # Errors
    ///
    /// - `DomainError::PropositionMismatch` if it belongs to another exchange.
    /// - `DomainError::Unauthorized` for the wrong actor.
    /// - `DomainError::InvalidPropositionStateTransition` for an illegal edge.
    /// - `DomainError::IncompatibleState` when the exchange status forbids it.
    pub fn update_proposition_status(
        &mut self,
        proposition: &mut EchangeProposition,
        target: PropositionStatut,
        actor: &Actor,
        motif_refus: Option<String>,
    ) -> DomainResult<()> {
        if proposition.echange_uuid() != self.uuid {
            return Err(DomainError::PropositionMismatch {
                proposition: proposition.uuid(),
                echange: self.uuid,
            });
        }

        if target == PropositionStatut::Annulee {
            if actor.uuid() != proposition.proposant_uuid() {
                return Err(DomainError::unauthorized(
                    "only the proposant can cancel a proposition",
                ));
            }
        } else {
            self.ensure_creator(actor, "answer proposition")?;
        }
        proposition.ensure_can_move_to(target)?;

        let parent_target = match target {
            PropositionStatut::Negociee => match self.statut {
                EchangeStatut::Publie => Some(EchangeStatut::EnCours),
                EchangeStatut::EnCours => None,
                statut => {
                    return Err(DomainError::IncompatibleState {
                        operation: "negotiate proposition",
                        statut,
                    });
                }
            },
            PropositionStatut::Acceptee => match self.statut {
                EchangeStatut::Publie | EchangeStatut::EnCours => Some(EchangeStatut::Negocie),
                statut => {
                    return Err(DomainError::IncompatibleState {
                        operation: "accept proposition",
                        statut,
                    });
                }
            },
            _ => None,
        };

        if let Some(parent_target) = parent_target {
            self.transition_to(
                parent_target,
                proposition.proposant_uuid(),
                ActorRole::Contrepartie,
            )?;
        }
        proposition.apply_status(target, motif_refus)?;

        if target == PropositionStatut::Acceptee {
            self.metriques.propositions_acceptees =
                self.metriques.propositions_acceptees.saturating_add(1);
            self.touch();
        }
        Ok(())
    }
}

impl AsRef<Echange> for Echange {
    fn as_ref(&self) -> &Echange {
        self
    }
}

impl fmt::Display for Echange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Echange({} \"{}\" [{}])",
            self.code_reference, self.titre, self.statut
        )
    }
}
