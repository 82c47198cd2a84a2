//! # Proposition Entity
//!
//! A counter-offer submitted by a counterparty on a published exchange.
//!
//! Propositions are created and moved through their lifecycle by the parent
//! [`Echange`](crate::domain::entities::Echange), which owns the counters and
//! status side effects. This module only holds the proposition's own data and
//! its local transition rule.
//!
//! ```text
//! EnAttente → Etudiee → Negociee → Acceptee | Refusee
//!     └──────────┴──────────┴────→ Annulee (proposant only)
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{
    EchangeId, EtatObjet, PropositionId, PropositionStatut, TypeObjet, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the counterparty puts on the table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Offre {
    /// Product or service.
    #[serde(rename = "type")]
    pub type_objet: TypeObjet,
    /// Free-text description.
    pub description: String,
    /// Estimated value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valeur_estimee: Option<Decimal>,
    /// Condition of the offered item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etat: Option<EtatObjet>,
}

impl Offre {
    /// Creates an offer from a description.
    #[must_use]
    pub fn new(type_objet: TypeObjet, description: impl Into<String>) -> Self {
        Self {
            type_objet,
            description: description.into(),
            valeur_estimee: None,
            etat: None,
        }
    }

    /// Sets the estimated value.
    #[must_use]
    pub fn with_valeur(mut self, valeur: Decimal) -> Self {
        self.valeur_estimee = Some(valeur);
        self
    }
}

/// Terms the counterparty attaches to the offer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionsProposees {
    /// Monetary top-up offered on top of the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement_monetaire: Option<Decimal>,
    /// Proposed completion delay, in days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delai_propose: Option<u32>,
    /// Note on the terms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Input for a new proposition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropositionCreateData {
    /// The offer.
    pub offre: Offre,
    /// Optional terms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions_proposees: Option<ConditionsProposees>,
    /// Message to the exchange holder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PropositionCreateData {
    /// Creates input from an offer alone.
    #[must_use]
    pub fn new(offre: Offre) -> Self {
        Self {
            offre,
            conditions_proposees: None,
            message: None,
        }
    }

    /// Attaches a message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches terms.
    #[must_use]
    pub fn with_conditions(mut self, conditions: ConditionsProposees) -> Self {
        self.conditions_proposees = Some(conditions);
        self
    }

    /// Returns the offered monetary top-up, if any.
    #[must_use]
    pub fn complement_monetaire(&self) -> Option<Decimal> {
        self.conditions_proposees
            .as_ref()
            .and_then(|c| c.complement_monetaire)
    }

    /// Checks the proposition input and returns every violation.
    #[must_use]
    pub fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.offre.description.trim().is_empty() {
            errors.push("La description de l'offre est requise".to_string());
        }
        if self
            .offre
            .valeur_estimee
            .is_some_and(|v| v.is_sign_negative() && !v.is_zero())
        {
            errors.push("La valeur de l'offre ne peut pas être négative".to_string());
        }
        if self
            .complement_monetaire()
            .is_some_and(|v| v.is_sign_negative() && !v.is_zero())
        {
            errors.push("Le complément monétaire ne peut pas être négatif".to_string());
        }
        errors
    }
}

/// A counter-offer on an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchangeProposition {
    uuid: PropositionId,
    echange_uuid: EchangeId,
    proposant_uuid: UserId,
    offre: Offre,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conditions_proposees: Option<ConditionsProposees>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    statut: PropositionStatut,
    date_creation: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_reponse: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    motif_refus: Option<String>,
}

impl EchangeProposition {
    pub(crate) fn new(
        echange_uuid: EchangeId,
        proposant_uuid: UserId,
        data: PropositionCreateData,
    ) -> DomainResult<Self> {
        let violations = data.violations();
        if !violations.is_empty() {
            return Err(DomainError::Validation(violations));
        }

        Ok(Self {
            uuid: PropositionId::new_v4(),
            echange_uuid,
            proposant_uuid,
            offre: data.offre,
            conditions_proposees: data.conditions_proposees,
            message: data.message,
            statut: PropositionStatut::EnAttente,
            date_creation: Timestamp::now(),
            date_reponse: None,
            motif_refus: None,
        })
    }

    // ========== Accessors ==========

    /// Returns the proposition ID.
    #[inline]
    #[must_use]
    pub fn uuid(&self) -> PropositionId {
        self.uuid
    }

    /// Returns the parent exchange ID.
    #[inline]
    #[must_use]
    pub fn echange_uuid(&self) -> EchangeId {
        self.echange_uuid
    }

    /// Returns the counterparty who submitted it.
    #[inline]
    #[must_use]
    pub fn proposant_uuid(&self) -> UserId {
        self.proposant_uuid
    }

    /// Returns the offer.
    #[inline]
    #[must_use]
    pub fn offre(&self) -> &Offre {
        &self.offre
    }

    /// Returns the proposed terms.
    #[inline]
    #[must_use]
    pub fn conditions_proposees(&self) -> Option<&ConditionsProposees> {
        self.conditions_proposees.as_ref()
    }

    /// Returns the message to the holder.
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn statut(&self) -> PropositionStatut {
        self.statut
    }

    /// Returns when it was submitted.
    #[inline]
    #[must_use]
    pub fn date_creation(&self) -> Timestamp {
        self.date_creation
    }

    /// Returns when a final answer was given.
    #[inline]
    #[must_use]
    pub fn date_reponse(&self) -> Option<Timestamp> {
        self.date_reponse
    }

    /// Returns the refusal reason.
    #[inline]
    #[must_use]
    pub fn motif_refus(&self) -> Option<&str> {
        self.motif_refus.as_deref()
    }

    /// Returns true once accepted, refused or cancelled.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.statut.is_terminal()
    }

    pub(crate) fn ensure_can_move_to(&self, target: PropositionStatut) -> DomainResult<()> {
        if self.statut.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidPropositionStateTransition {
                from: self.statut,
                to: target,
            })
        }
    }

    /// Applies a status change. Parent side effects are the caller's concern.
    pub(crate) fn apply_status(
        &mut self,
        target: PropositionStatut,
        motif_refus: Option<String>,
    ) -> DomainResult<()> {
        self.ensure_can_move_to(target)?;
        self.statut = target;
        if target.is_terminal() && self.date_reponse.is_none() {
            self.date_reponse = Some(Timestamp::now());
        }
        if target == PropositionStatut::Refusee {
            self.motif_refus = motif_refus.filter(|m| !m.trim().is_empty());
        }
        Ok(())
    }
}

impl fmt::Display for EchangeProposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Proposition({} on {} [{}])",
            self.uuid, self.echange_uuid, self.statut
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn proposition() -> EchangeProposition {
        EchangeProposition::new(
            EchangeId::new_v4(),
            UserId::new_v4(),
            PropositionCreateData::new(Offre::new(TypeObjet::Produit, "Guitare folk")),
        )
        .unwrap()
    }

    #[test]
    fn new_proposition_is_pending() {
        let p = proposition();
        assert_eq!(p.statut(), PropositionStatut::EnAttente);
        assert!(p.date_reponse().is_none());
        assert!(!p.is_closed());
    }

    #[test]
    fn rejects_blank_offer_and_negative_amounts() {
        let data = PropositionCreateData::new(
            Offre::new(TypeObjet::Service, " ").with_valeur(Decimal::from(-1)),
        )
        .with_conditions(ConditionsProposees {
            complement_monetaire: Some(Decimal::from(-10)),
            ..ConditionsProposees::default()
        });

        let err = EchangeProposition::new(EchangeId::new_v4(), UserId::new_v4(), data)
            .unwrap_err();
        assert_eq!(err.violations().len(), 3);
    }

    #[test]
    fn refusal_records_reason_and_answer_date() {
        let mut p = proposition();
        p.apply_status(PropositionStatut::Etudiee, None).unwrap();
        assert!(p.date_reponse().is_none());

        p.apply_status(PropositionStatut::Refusee, Some("Pas intéressé".into()))
            .unwrap();
        assert_eq!(p.motif_refus(), Some("Pas intéressé"));
        assert!(p.date_reponse().is_some());
        assert!(p.is_closed());
    }

    #[test]
    fn closed_proposition_cannot_move() {
        let mut p = proposition();
        p.apply_status(PropositionStatut::Annulee, None).unwrap();
        let err = p
            .apply_status(PropositionStatut::Acceptee, None)
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidPropositionStateTransition { .. }
        ));
    }
}
