//! # Listing Value Objects
//!
//! The two sides of an exchange listing and its mechanics:
//!
//! - [`ObjetEchange`]: what the holder offers
//! - [`Recherche`]: what the holder wants in return
//! - [`Conditions`]: how the swap is carried out
//! - [`Localisation`]: where the hand-over happens
//! - [`ValueRange`]: an optional `{min, max}` amount range

use crate::domain::value_objects::enums::{EtatObjet, ModeEchange, TypeObjet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An optional amount range. Either bound may be absent.
///
/// # Examples
///
/// ```
/// use echange_core::domain::value_objects::ValueRange;
/// use rust_decimal::Decimal;
///
/// let range = ValueRange::between(Decimal::from(150), Decimal::from(200));
/// assert!(range.is_consistent());
/// assert!(range.contains(Decimal::from(175)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueRange {
    /// Lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    /// Upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

impl ValueRange {
    /// Creates a range with both bounds.
    #[must_use]
    pub const fn between(min: Decimal, max: Decimal) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Returns false only when both bounds are present and `min > max`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }

    /// Returns true if either bound is negative.
    #[must_use]
    pub fn has_negative_bound(&self) -> bool {
        self.min.is_some_and(|v| v.is_sign_negative() && !v.is_zero())
            || self.max.is_some_and(|v| v.is_sign_negative() && !v.is_zero())
    }

    /// Returns true if neither bound is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Returns true if `value` lies within the present bounds.
    #[must_use]
    pub fn contains(&self, value: Decimal) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// What the holder offers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjetEchange {
    /// Product or service.
    #[serde(rename = "type")]
    pub type_objet: TypeObjet,
    /// Free-text description of the offered item.
    pub description: String,
    /// Condition of the item.
    #[serde(default)]
    pub etat: EtatObjet,
    /// Estimated value, never negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valeur_estimee: Option<Decimal>,
}

impl ObjetEchange {
    /// Creates an offered object with a description and default condition.
    #[must_use]
    pub fn new(type_objet: TypeObjet, description: impl Into<String>) -> Self {
        Self {
            type_objet,
            description: description.into(),
            etat: EtatObjet::default(),
            valeur_estimee: None,
        }
    }

    /// Sets the condition.
    #[must_use]
    pub fn with_etat(mut self, etat: EtatObjet) -> Self {
        self.etat = etat;
        self
    }

    /// Sets the estimated value.
    #[must_use]
    pub fn with_valeur(mut self, valeur: Decimal) -> Self {
        self.valeur_estimee = Some(valeur);
        self
    }
}

/// What the holder is looking for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recherche {
    /// Product or service.
    #[serde(rename = "type")]
    pub type_objet: TypeObjet,
    /// Free-text description of what is wanted.
    pub description: String,
    /// Accepted value range for counter-offers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valeurs_acceptees: Option<ValueRange>,
}

impl Recherche {
    /// Creates a search description with no accepted value range.
    #[must_use]
    pub fn new(type_objet: TypeObjet, description: impl Into<String>) -> Self {
        Self {
            type_objet,
            description: description.into(),
            valeurs_acceptees: None,
        }
    }

    /// Sets the accepted value range.
    #[must_use]
    pub fn with_valeurs_acceptees(mut self, range: ValueRange) -> Self {
        self.valeurs_acceptees = Some(range);
        self
    }
}

/// Exchange mechanics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Conditions {
    /// How the swap happens.
    pub mode: ModeEchange,
    /// Bounds on a monetary top-up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement_monetaire: Option<ValueRange>,
    /// Maximum delay to complete the swap, in days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delai_max: Option<u32>,
    /// Guarantees given by the holder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garanties: Option<String>,
    /// Restrictions imposed by the holder.
    pub restrictions: Vec<String>,
    /// Whether the holder accepts platform mediation on dispute.
    pub mediation_acceptee: bool,
}

impl Conditions {
    /// Returns true if a non-blank guarantee is defined.
    #[must_use]
    pub fn has_garanties(&self) -> bool {
        self.garanties
            .as_deref()
            .is_some_and(|g| !g.trim().is_empty())
    }
}

/// Where the hand-over takes place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Localisation {
    /// City.
    pub ville: String,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_postal: Option<String>,
    /// Country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pays: Option<String>,
}

impl Localisation {
    /// Creates a location from a city name.
    #[must_use]
    pub fn ville(ville: impl Into<String>) -> Self {
        Self {
            ville: ville.into(),
            code_postal: None,
            pays: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn range_consistency() {
        assert!(ValueRange::default().is_consistent());
        assert!(ValueRange::between(Decimal::from(1), Decimal::from(1)).is_consistent());
        assert!(!ValueRange::between(Decimal::from(2), Decimal::from(1)).is_consistent());
        assert!(
            ValueRange {
                min: Some(Decimal::from(5)),
                max: None
            }
            .is_consistent()
        );
    }

    #[test]
    fn range_negative_bounds() {
        let range = ValueRange {
            min: Some(Decimal::from(-1)),
            max: None,
        };
        assert!(range.has_negative_bound());
        assert!(!ValueRange::between(Decimal::ZERO, Decimal::from(3)).has_negative_bound());
    }

    #[test]
    fn range_contains_with_open_bounds() {
        let open_top = ValueRange {
            min: Some(Decimal::from(10)),
            max: None,
        };
        assert!(open_top.contains(Decimal::from(1_000)));
        assert!(!open_top.contains(Decimal::from(9)));
        assert!(ValueRange::default().contains(Decimal::from(-3)));
    }

    #[test]
    fn objet_uses_type_key_on_the_wire() {
        let objet = ObjetEchange::new(TypeObjet::Service, "Cours de guitare")
            .with_valeur(Decimal::from(40));
        let json = serde_json::to_value(&objet).unwrap();
        assert_eq!(json["type"], "service");
        assert_eq!(json["etat"], "bon");
    }

    #[test]
    fn conditions_deserialize_with_defaults() {
        let conditions: Conditions = serde_json::from_str(r#"{"mode":"progressive"}"#).unwrap();
        assert_eq!(conditions.mode, ModeEchange::Progressive);
        assert!(conditions.restrictions.is_empty());
        assert!(!conditions.mediation_acceptee);
        assert!(!conditions.has_garanties());
    }

    #[test]
    fn blank_guarantee_does_not_count() {
        let conditions = Conditions {
            garanties: Some("   ".to_string()),
            ..Conditions::default()
        };
        assert!(!conditions.has_garanties());
    }
}
