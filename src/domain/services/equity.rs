//! # Equity Evaluator
//!
//! Advisory fairness heuristic comparing the offered value with the value range
//! the holder accepts in return.
//!
//! # Calculation
//!
//! ```text
//! v     = offered estimated value       (default: policy.valeur_par_defaut)
//! max   = accepted range upper bound    (default: 2 * v)
//! min   = accepted range lower bound    (default: 0)
//! ratio = v / ((min + max) / 2)
//! equitable ⇔ ratio_min ≤ ratio ≤ ratio_max
//! ```
//!
//! The result is a hint for the listing author, never a guarantee of fairness.
//! The monetary complement is deliberately left out of the ratio.
//!
//! # Examples
//!
//! ```
//! use echange_core::domain::entities::EchangeCreateData;
//! use echange_core::domain::services::equity::{evaluate_equity, EquityPolicy};
//! use echange_core::domain::value_objects::{CategorieId, ValueRange};
//! use rust_decimal::Decimal;
//!
//! let data = EchangeCreateData::builder(
//!     "Vélo", "Vélo de ville", CategorieId::new_v4(), "Vélo", "Guitare",
//! )
//! .valeur_estimee(Decimal::from(100))
//! .valeurs_acceptees(ValueRange::between(Decimal::from(90), Decimal::from(110)))
//! .build();
//!
//! let evaluation = evaluate_equity(&data, &EquityPolicy::default());
//! assert!(evaluation.equitable);
//! assert_eq!(evaluation.ratio, Decimal::ONE);
//! ```

use crate::domain::entities::echange::EchangeContent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Thresholds and defaults for the equity heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPolicy {
    /// Value assumed when the offered object has no estimate.
    pub valeur_par_defaut: Decimal,
    /// Lowest ratio still considered equitable.
    pub ratio_min: Decimal,
    /// Highest ratio still considered equitable.
    pub ratio_max: Decimal,
}

impl Default for EquityPolicy {
    fn default() -> Self {
        Self {
            valeur_par_defaut: Decimal::ONE_HUNDRED,
            ratio_min: Decimal::new(8, 1),
            ratio_max: Decimal::new(12, 1),
        }
    }
}

/// Which side of the tolerance band a ratio falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Valuation {
    /// Offered value is well below what is requested.
    SousEvalue,
    /// Within tolerance.
    Equilibre,
    /// Offered value is well above what is requested.
    Surevalue,
}

/// Outcome of [`evaluate_equity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityEvaluation {
    /// True when the ratio lies within the policy band.
    pub equitable: bool,
    /// Offered value divided by the midpoint of the accepted range.
    pub ratio: Decimal,
    /// Position of the ratio relative to the band.
    pub valuation: Valuation,
    /// Improvement hints for the author.
    pub suggestions: Vec<String>,
    /// Risks the listing runs as it stands.
    pub risques: Vec<String>,
}

/// Evaluates the equity of a listing.
///
/// Accepts anything that can be viewed as [`EchangeContent`]: an
/// [`Echange`](crate::domain::entities::Echange) or an
/// [`EchangeCreateData`](crate::domain::entities::EchangeCreateData).
#[must_use]
pub fn evaluate_equity<'a>(
    content: impl Into<EchangeContent<'a>>,
    policy: &EquityPolicy,
) -> EquityEvaluation {
    let content = content.into();
    let valeur = content
        .objet_echange
        .valeur_estimee
        .unwrap_or(policy.valeur_par_defaut);
    let range = content.recherche.valeurs_acceptees.unwrap_or_default();

    let max = range
        .max
        .unwrap_or_else(|| valeur.checked_mul(Decimal::TWO).unwrap_or(Decimal::MAX));
    let min = range.min.unwrap_or(Decimal::ZERO);
    let ratio = equity_ratio(valeur, min, max);

    let valuation = if ratio < policy.ratio_min {
        Valuation::SousEvalue
    } else if ratio > policy.ratio_max {
        Valuation::Surevalue
    } else {
        Valuation::Equilibre
    };

    let mut suggestions = Vec::new();
    let mut risques = Vec::new();

    match valuation {
        Valuation::SousEvalue => {
            suggestions.push(
                "L'objet proposé semble sous-évalué : augmentez sa valeur estimée ou abaissez les valeurs acceptées"
                    .to_string(),
            );
            risques.push(
                "Proposition déséquilibrée : les contreparties pourraient juger l'échange défavorable"
                    .to_string(),
            );
        }
        Valuation::Surevalue => {
            suggestions.push(
                "L'objet proposé semble surévalué : revoyez sa valeur estimée ou élargissez les valeurs acceptées"
                    .to_string(),
            );
            risques.push(
                "Échange difficile à conclure : peu de contreparties atteindront cette valeur"
                    .to_string(),
            );
        }
        Valuation::Equilibre => {}
    }

    if !content.conditions.has_garanties() {
        suggestions.push("Précisez des garanties pour rassurer les contreparties".to_string());
    }
    if !content.conditions.mediation_acceptee {
        suggestions.push("Acceptez la médiation de la plateforme en cas de litige".to_string());
    }

    EquityEvaluation {
        equitable: valuation == Valuation::Equilibre,
        ratio,
        valuation,
        suggestions,
        risques,
    }
}

// A zero midpoint only happens with an empty range: equal when nothing is
// offered either, unbounded otherwise.
fn equity_ratio(valeur: Decimal, min: Decimal, max: Decimal) -> Decimal {
    let midpoint = min
        .checked_add(max)
        .and_then(|sum| sum.checked_div(Decimal::TWO))
        .unwrap_or(Decimal::MAX);

    if midpoint.is_zero() {
        return if valeur.is_zero() {
            Decimal::ONE
        } else {
            Decimal::MAX
        };
    }
    valeur.checked_div(midpoint).unwrap_or(Decimal::MAX)
}
