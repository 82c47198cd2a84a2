//! # Review Entity
//!
//! Ratings left once an exchange is over. Reviews are immutable after
//! creation.

use crate::domain::entities::echange::Echange;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{EchangeId, EchangeStatut, ReviewId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Accepted range for the overall note and every sub-score.
pub const NOTE_RANGE: RangeInclusive<u8> = 1..=5;

/// Optional sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewAspects {
    /// How well the other party communicated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication: Option<u8>,
    /// Whether deadlines were kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ponctualite: Option<u8>,
    /// Whether the item matched its description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conformite: Option<u8>,
}

impl ReviewAspects {
    fn check(&self) -> DomainResult<()> {
        for (field, score) in [
            ("communication", self.communication),
            ("ponctualite", self.ponctualite),
            ("conformite", self.conformite),
        ] {
            if let Some(score) = score {
                check_note(field, score)?;
            }
        }
        Ok(())
    }
}

/// Input for a new review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCreateData {
    /// Overall note.
    pub note: u8,
    /// Sub-scores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspects: Option<ReviewAspects>,
    /// Free-text comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentaire: Option<String>,
}

impl ReviewCreateData {
    /// Creates input with just a note.
    #[must_use]
    pub fn new(note: u8) -> Self {
        Self {
            note,
            aspects: None,
            commentaire: None,
        }
    }

    /// Attaches a comment.
    #[must_use]
    pub fn with_commentaire(mut self, commentaire: impl Into<String>) -> Self {
        self.commentaire = Some(commentaire.into());
        self
    }

    /// Attaches sub-scores.
    #[must_use]
    pub fn with_aspects(mut self, aspects: ReviewAspects) -> Self {
        self.aspects = Some(aspects);
        self
    }

    /// Checks the note and sub-scores are within 1..=5.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` for the first offending score.
    pub fn check(&self) -> DomainResult<()> {
        check_note("note", self.note)?;
        match &self.aspects {
            Some(aspects) => aspects.check(),
            None => Ok(()),
        }
    }
}

fn check_note(field: &'static str, note: u8) -> DomainResult<()> {
    if NOTE_RANGE.contains(&note) {
        Ok(())
    } else {
        Err(DomainError::out_of_range(
            field,
            format!(
                "{note} is not between {} and {}",
                NOTE_RANGE.start(),
                NOTE_RANGE.end()
            ),
        ))
    }
}

/// A rating on a closed exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchangeReview {
    uuid: ReviewId,
    echange_uuid: EchangeId,
    auteur_uuid: UserId,
    note: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aspects: Option<ReviewAspects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    commentaire: Option<String>,
    date_creation: Timestamp,
}

impl EchangeReview {
    /// Creates a review on `echange`.
    ///
    /// Who may review and the one-review-per-author rule depend on stored
    /// propositions and reviews, so they are checked by the service.
    ///
    /// # Errors
    ///
    /// - `DomainError::IncompatibleState` unless the exchange is Finalise or Annule.
    /// - `DomainError::OutOfRange` for a note or sub-score outside 1..=5.
    pub fn new(echange: &Echange, auteur_uuid: UserId, data: ReviewCreateData) -> DomainResult<Self> {
        if !matches!(
            echange.statut(),
            EchangeStatut::Finalise | EchangeStatut::Annule
        ) {
            return Err(DomainError::IncompatibleState {
                operation: "review",
                statut: echange.statut(),
            });
        }
        data.check()?;

        Ok(Self {
            uuid: ReviewId::new_v4(),
            echange_uuid: echange.uuid(),
            auteur_uuid,
            note: data.note,
            aspects: data.aspects,
            commentaire: data.commentaire.filter(|c| !c.trim().is_empty()),
            date_creation: Timestamp::now(),
        })
    }

    /// Returns the review ID.
    #[inline]
    #[must_use]
    pub fn uuid(&self) -> ReviewId {
        self.uuid
    }

    /// Returns the reviewed exchange.
    #[inline]
    #[must_use]
    pub fn echange_uuid(&self) -> EchangeId {
        self.echange_uuid
    }

    /// Returns the author.
    #[inline]
    #[must_use]
    pub fn auteur_uuid(&self) -> UserId {
        self.auteur_uuid
    }

    /// Returns the overall note.
    #[inline]
    #[must_use]
    pub fn note(&self) -> u8 {
        self.note
    }

    /// Returns the sub-scores.
    #[inline]
    #[must_use]
    pub fn aspects(&self) -> Option<&ReviewAspects> {
        self.aspects.as_ref()
    }

    /// Returns the comment.
    #[inline]
    #[must_use]
    pub fn commentaire(&self) -> Option<&str> {
        self.commentaire.as_deref()
    }

    /// Returns the creation date.
    #[inline]
    #[must_use]
    pub fn date_creation(&self) -> Timestamp {
        self.date_creation
    }
}

/// Mean overall note, `None` without reviews.
#[must_use]
pub fn average_note(reviews: &[EchangeReview]) -> Option<Decimal> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u64 = reviews.iter().map(|r| u64::from(r.note)).sum();
    Decimal::from(sum)
        .checked_div(Decimal::from(reviews.len()))
        .map(|avg| avg.round_dp(2))
}
