//! # Validation Engine
//!
//! Structural and business-rule checks run before a listing is created,
//! updated or submitted.
//!
//! Every rule runs regardless of earlier failures and its outcome lands in one
//! of three buckets:
//!
//! | Bucket | Blocks save | Examples |
//! |---|---|---|
//! | errors | yes | missing title, missing category, negative value |
//! | warnings | no | short description, no images, equity mismatch |
//! | suggestions | no | no tags, no guarantees |
//!
//! # Examples
//!
//! ```
//! use echange_core::domain::entities::EchangeCreateData;
//! use echange_core::domain::services::validation::{validate, ValidationPolicy};
//! use echange_core::domain::value_objects::CategorieId;
//!
//! let data = EchangeCreateData::builder("", "", CategorieId::new_v4(), "", "").build();
//! let report = validate(&data, &ValidationPolicy::default());
//!
//! assert!(!report.is_valid());
//! assert_eq!(report.errors.len(), 4);
//! ```

use crate::domain::entities::echange::EchangeContent;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::equity::{EquityPolicy, Valuation, evaluate_equity};
use serde::{Deserialize, Serialize};

/// Default number of days a listing stays valid after creation.
pub const DEFAULT_DELAI_VALIDITE_JOURS: i64 = 30;

/// Thresholds used by the validation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Minimum title length, in characters.
    pub titre_min_chars: usize,
    /// Descriptions shorter than this raise a warning.
    pub description_warning_chars: usize,
    /// Validity window applied at creation when no expiration is given.
    pub delai_validite_jours: i64,
    /// Equity band used for the value mismatch warning.
    pub equity: EquityPolicy,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            titre_min_chars: 3,
            description_warning_chars: 20,
            delai_validite_jours: DEFAULT_DELAI_VALIDITE_JOURS,
            equity: EquityPolicy::default(),
        }
    }
}

/// Aggregated result of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Violations that block saving.
    pub errors: Vec<String>,
    /// Issues worth fixing; saving is allowed.
    pub warnings: Vec<String>,
    /// Informational hints.
    pub suggestions: Vec<String>,
}

impl ValidationReport {
    /// True iff there are no errors. Warnings and suggestions never block.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts the report into a result, failing with every error at once.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` listing all errors if any were found.
    pub fn into_result(self) -> DomainResult<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(DomainError::Validation(self.errors))
        }
    }
}

/// Runs every validation rule against a listing.
#[must_use]
pub fn validate<'a>(
    content: impl Into<EchangeContent<'a>>,
    policy: &ValidationPolicy,
) -> ValidationReport {
    let content = content.into();
    let mut report = ValidationReport::default();

    check_required_fields(&content, policy, &mut report);
    check_values(&content, &mut report);
    check_presentation(&content, policy, &mut report);
    check_equity(&content, policy, &mut report);
    check_completeness(&content, &mut report);

    report
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn check_required_fields(
    content: &EchangeContent<'_>,
    policy: &ValidationPolicy,
    report: &mut ValidationReport,
) {
    if is_blank(content.titre) {
        report.errors.push("Le titre est requis".to_string());
    } else if content.titre.trim().chars().count() < policy.titre_min_chars {
        report.errors.push(format!(
            "Le titre doit contenir au moins {} caractères",
            policy.titre_min_chars
        ));
    }

    if is_blank(content.description) {
        report.errors.push("La description est requise".to_string());
    }

    if content.categorie_uuid.is_none() {
        report.errors.push("La catégorie est requise".to_string());
    }

    if is_blank(&content.objet_echange.description) {
        report
            .errors
            .push("La description de l'objet proposé est requise".to_string());
    }

    if is_blank(&content.recherche.description) {
        report
            .errors
            .push("La description de la recherche est requise".to_string());
    }
}

fn check_values(content: &EchangeContent<'_>, report: &mut ValidationReport) {
    if content
        .objet_echange
        .valeur_estimee
        .is_some_and(|v| v.is_sign_negative() && !v.is_zero())
    {
        report
            .errors
            .push("La valeur estimée ne peut pas être négative".to_string());
    }

    if let Some(range) = content.recherche.valeurs_acceptees {
        if range.has_negative_bound() {
            report
                .errors
                .push("Les valeurs acceptées ne peuvent pas être négatives".to_string());
        }
        if !range.is_consistent() {
            report.errors.push(
                "La valeur minimale acceptée doit être inférieure ou égale à la valeur maximale"
                    .to_string(),
            );
        }
    }

    if let Some(range) = content.conditions.complement_monetaire {
        if range.has_negative_bound() {
            report
                .errors
                .push("Le complément monétaire ne peut pas être négatif".to_string());
        }
        if !range.is_consistent() {
            report.errors.push(
                "Le complément monétaire minimal doit être inférieur ou égal au maximal"
                    .to_string(),
            );
        }
    }
}

fn check_presentation(
    content: &EchangeContent<'_>,
    policy: &ValidationPolicy,
    report: &mut ValidationReport,
) {
    let description_len = content.description.trim().chars().count();
    if description_len < policy.description_warning_chars {
        report.warnings.push(format!(
            "La description est courte (moins de {} caractères)",
            policy.description_warning_chars
        ));
    }

    if content.images.is_empty() {
        report
            .warnings
            .push("Aucune image : les annonces illustrées reçoivent plus de propositions".to_string());
    }

    let has_location = content
        .localisation
        .is_some_and(|l| !is_blank(&l.ville));
    if !has_location && !content.echange_a_distance {
        report.warnings.push(
            "Aucune localisation : précisez une ville ou indiquez un échange à distance"
                .to_string(),
        );
    }
}

// Only meaningful when the author actually estimated the offered value.
fn check_equity(
    content: &EchangeContent<'_>,
    policy: &ValidationPolicy,
    report: &mut ValidationReport,
) {
    let Some(valeur) = content.objet_echange.valeur_estimee else {
        return;
    };
    if valeur.is_sign_negative() && !valeur.is_zero() {
        return;
    }

    let evaluation = evaluate_equity(*content, &policy.equity);
    match evaluation.valuation {
        Valuation::SousEvalue => report.warnings.push(format!(
            "L'objet proposé semble sous-évalué par rapport aux valeurs acceptées (ratio {})",
            evaluation.ratio.round_dp(2)
        )),
        Valuation::Surevalue => report.warnings.push(format!(
            "L'objet proposé semble surévalué par rapport aux valeurs acceptées (ratio {})",
            evaluation.ratio.round_dp(2)
        )),
        Valuation::Equilibre => {}
    }
}

fn check_completeness(content: &EchangeContent<'_>, report: &mut ValidationReport) {
    if content.description_courte.is_none_or(is_blank) {
        report
            .suggestions
            .push("Ajoutez une description courte pour les listes de résultats".to_string());
    }
    if content.tags.is_empty() {
        report
            .suggestions
            .push("Ajoutez des tags pour améliorer la visibilité de l'annonce".to_string());
    }
    if content.conditions.restrictions.is_empty() {
        report
            .suggestions
            .push("Précisez d'éventuelles restrictions".to_string());
    }
    if !content.conditions.has_garanties() {
        report
            .suggestions
            .push("Précisez les garanties offertes".to_string());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::EchangeCreateData;
    use crate::domain::value_objects::{CategorieId, Conditions, Localisation, ValueRange};
    use rust_decimal::Decimal;

    fn complete() -> EchangeCreateData {
        EchangeCreateData::builder(
            "Vélo de route",
            "Vélo de route en aluminium, taille 56, révisé en mars",
            CategorieId::new_v4(),
            "Vélo de route taille 56",
            "Guitare acoustique",
        )
        .description_courte("Vélo route taille 56")
        .tags(vec!["velo".into(), "sport".into()])
        .images(vec!["velo.jpg".into()])
        .localisation(Localisation::ville("Lyon"))
        .conditions(Conditions {
            garanties: Some("Facture d'achat".into()),
            restrictions: vec!["Remise en main propre".into()],
            mediation_acceptee: true,
            ..Conditions::default()
        })
        .build()
    }

    mod errors {
        use super::*;

        #[test]
        fn complete_listing_is_clean() {
            let report = validate(&complete(), &ValidationPolicy::default());
            assert!(report.is_valid());
            assert!(report.warnings.is_empty(), "{:?}", report.warnings);
            assert!(report.suggestions.is_empty(), "{:?}", report.suggestions);
        }

        #[test]
        fn one_error_per_missing_field() {
            let mut data = complete();
            data.titre = "  ".into();
            data.description = String::new();
            data.categorie_uuid = None;
            data.objet_echange.description = String::new();
            data.recherche.description = "\t".into();

            let report = validate(&data, &ValidationPolicy::default());
            assert!(!report.is_valid());
            assert_eq!(report.errors.len(), 5, "{:?}", report.errors);
        }

        #[test]
        fn short_title() {
            let mut data = complete();
            data.titre = "Vé".into();
            let report = validate(&data, &ValidationPolicy::default());
            assert_eq!(report.errors.len(), 1);
            assert!(report.errors.iter().any(|e| e.contains("au moins 3")));
        }

        #[test]
        fn negative_value_and_inverted_range() {
            let mut data = complete();
            data.objet_echange.valeur_estimee = Some(Decimal::from(-5));
            data.recherche.valeurs_acceptees =
                Some(ValueRange::between(Decimal::from(200), Decimal::from(100)));
            let report = validate(&data, &ValidationPolicy::default());
            assert_eq!(report.errors.len(), 2, "{:?}", report.errors);
        }

        #[test]
        fn inverted_complement_range() {
            let mut data = complete();
            data.conditions.complement_monetaire =
                Some(ValueRange::between(Decimal::from(50), Decimal::from(10)));
            let report = validate(&data, &ValidationPolicy::default());
            assert!(!report.is_valid());
        }

        #[test]
        fn into_result_carries_every_error() {
            let data = EchangeCreateData::builder("", "", CategorieId::new_v4(), "", "").build();
            let err = validate(&data, &ValidationPolicy::default())
                .into_result()
                .unwrap_err();
            assert_eq!(err.violations().len(), 4);
        }
    }

    mod warnings {
        use super::*;

        #[test]
        fn under_valued_listing_warns() {
            let mut data = complete();
            data.objet_echange.valeur_estimee = Some(Decimal::from(100));
            data.recherche.valeurs_acceptees =
                Some(ValueRange::between(Decimal::from(150), Decimal::from(200)));

            let report = validate(&data, &ValidationPolicy::default());
            assert!(report.is_valid());
            assert!(report.warnings.iter().any(|w| w.contains("sous-évalué")));
        }

        #[test]
        fn over_valued_listing_warns() {
            let mut data = complete();
            data.objet_echange.valeur_estimee = Some(Decimal::from(1_000));
            data.recherche.valeurs_acceptees =
                Some(ValueRange::between(Decimal::from(100), Decimal::from(200)));

            let report = validate(&data, &ValidationPolicy::default());
            assert!(report.warnings.iter().any(|w| w.contains("surévalué")));
        }

        #[test]
        fn no_equity_warning_without_estimate() {
            let mut data = complete();
            data.recherche.valeurs_acceptees =
                Some(ValueRange::between(Decimal::from(150), Decimal::from(200)));
            let report = validate(&data, &ValidationPolicy::default());
            assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        }

        #[test]
        fn presentation_warnings() {
            let mut data = complete();
            data.description = "Trop court".into();
            data.images.clear();
            data.localisation = None;

            let report = validate(&data, &ValidationPolicy::default());
            assert!(report.is_valid());
            assert_eq!(report.warnings.len(), 3, "{:?}", report.warnings);
        }

        #[test]
        fn remote_exchange_needs_no_location() {
            let mut data = complete();
            data.localisation = None;
            data.echange_a_distance = true;
            let report = validate(&data, &ValidationPolicy::default());
            assert!(report.warnings.is_empty());
        }
    }

    mod suggestions {
        use super::*;

        #[test]
        fn bare_listing_gets_every_suggestion() {
            let data = EchangeCreateData::builder(
                "Vélo",
                "Vélo de ville avec panier",
                CategorieId::new_v4(),
                "Vélo",
                "Guitare",
            )
            .build();
            let report = validate(&data, &ValidationPolicy::default());
            assert!(report.is_valid());
            assert_eq!(report.suggestions.len(), 4, "{:?}", report.suggestions);
        }
    }
}
