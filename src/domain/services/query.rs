//! # Query Façade
//!
//! Pure read-side functions over exchange snapshots: filtering, text search,
//! sorting, pagination, aggregate statistics and per-exchange analytics.
//!
//! Nothing here mutates or performs I/O. The in-memory repository and the
//! service build on these functions; the REST client sends the same filter
//! as query parameters.

use crate::domain::entities::Echange;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{
    CategorieId, EchangeId, EchangeStatut, TypeObjet, UserId, ValueRange,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Default page size.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Criteria for selecting exchanges. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchangeFilter {
    /// Category.
    pub categorie_uuid: Option<CategorieId>,
    /// Creator.
    pub createur_uuid: Option<UserId>,
    /// Accepted statuses; empty means any.
    pub statuts: Vec<EchangeStatut>,
    /// Offered object type.
    pub type_objet: Option<TypeObjet>,
    /// City, compared case-insensitively.
    pub ville: Option<String>,
    /// Range on the offered object's estimated value. Exchanges without an
    /// estimate never match a bounded range.
    pub valeur: Option<ValueRange>,
    /// Created at or after.
    pub date_debut: Option<Timestamp>,
    /// Created at or before.
    pub date_fin: Option<Timestamp>,
    /// Case-insensitive text over title, description and tags.
    pub search: Option<String>,
    /// Keep only moderator-approved exchanges.
    pub only_valid: bool,
}

impl EchangeFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one status.
    #[must_use]
    pub fn with_statut(mut self, statut: EchangeStatut) -> Self {
        self.statuts.push(statut);
        self
    }

    /// Restricts to one category.
    #[must_use]
    pub fn with_categorie(mut self, categorie_uuid: CategorieId) -> Self {
        self.categorie_uuid = Some(categorie_uuid);
        self
    }

    /// Restricts to one creator.
    #[must_use]
    pub fn with_createur(mut self, createur_uuid: UserId) -> Self {
        self.createur_uuid = Some(createur_uuid);
        self
    }

    /// Restricts to one city.
    #[must_use]
    pub fn with_ville(mut self, ville: impl Into<String>) -> Self {
        self.ville = Some(ville.into());
        self
    }

    /// Restricts by estimated value.
    #[must_use]
    pub fn with_valeur(mut self, range: ValueRange) -> Self {
        self.valeur = Some(range);
        self
    }

    /// Adds a text search.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Returns true if `echange` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, echange: &Echange) -> bool {
        self.categorie_uuid
            .is_none_or(|c| echange.categorie_uuid() == c)
            && self
                .createur_uuid
                .is_none_or(|u| echange.createur_uuid() == u)
            && (self.statuts.is_empty() || self.statuts.contains(&echange.statut()))
            && self
                .type_objet
                .is_none_or(|t| echange.objet_echange().type_objet == t)
            && self.ville.as_deref().is_none_or(|ville| {
                echange
                    .localisation()
                    .is_some_and(|l| l.ville.trim().to_lowercase() == ville.trim().to_lowercase())
            })
            && self.valeur.is_none_or(|range| {
                range.is_unbounded()
                    || echange
                        .objet_echange()
                        .valeur_estimee
                        .is_some_and(|v| range.contains(v))
            })
            && self
                .date_debut
                .is_none_or(|d| !echange.date_creation().is_before(&d))
            && self
                .date_fin
                .is_none_or(|d| !echange.date_creation().is_after(&d))
            && self
                .search
                .as_deref()
                .is_none_or(|term| matches_text(echange, term))
            && (!self.only_valid || echange.est_valide())
    }

    /// Flattens the filter into query parameters for the remote API.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(c) = self.categorie_uuid {
            pairs.push(("categorie_uuid", c.to_string()));
        }
        if let Some(u) = self.createur_uuid {
            pairs.push(("createur_uuid", u.to_string()));
        }
        if !self.statuts.is_empty() {
            let statuts: Vec<&str> = self.statuts.iter().map(EchangeStatut::as_str).collect();
            pairs.push(("statut", statuts.join(",")));
        }
        if let Some(t) = self.type_objet {
            pairs.push(("type_objet", t.to_string()));
        }
        if let Some(ville) = &self.ville {
            pairs.push(("ville", ville.clone()));
        }
        if let Some(range) = self.valeur {
            if let Some(min) = range.min {
                pairs.push(("valeur_min", min.to_string()));
            }
            if let Some(max) = range.max {
                pairs.push(("valeur_max", max.to_string()));
            }
        }
        if let Some(d) = self.date_debut {
            pairs.push(("date_debut", d.to_iso8601()));
        }
        if let Some(d) = self.date_fin {
            pairs.push(("date_fin", d.to_iso8601()));
        }
        if let Some(term) = &self.search {
            pairs.push(("search", term.clone()));
        }
        if self.only_valid {
            pairs.push(("est_valide", "true".to_string()));
        }
        pairs
    }
}

fn matches_text(echange: &Echange, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    echange.titre().to_lowercase().contains(&needle)
        || echange.description().to_lowercase().contains(&needle)
        || echange
            .tags()
            .iter()
            .any(|t| t.to_lowercase().contains(&needle))
}

/// Selects the exchanges matching `filter`, in input order.
#[must_use]
pub fn filter<'a>(echanges: &'a [Echange], filter: &EchangeFilter) -> Vec<&'a Echange> {
    echanges.iter().filter(|e| filter.matches(e)).collect()
}

/// Case-insensitive text search over title, description and tags.
#[must_use]
pub fn search<'a>(echanges: &'a [Echange], term: &str) -> Vec<&'a Echange> {
    echanges.iter().filter(|e| matches_text(e, term)).collect()
}

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Creation date.
    #[default]
    DateCreation,
    /// Title, case-insensitive.
    Titre,
    /// Estimated value; exchanges without one sort first ascending.
    Valeur,
    /// View count.
    Vues,
}

impl SortField {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DateCreation => "date_creation",
            Self::Titre => "titre",
            Self::Valeur => "valeur",
            Self::Vues => "vues",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn compare(a: &Echange, b: &Echange, field: SortField) -> Ordering {
    match field {
        SortField::DateCreation => a.date_creation().cmp(&b.date_creation()),
        SortField::Titre => a.titre().to_lowercase().cmp(&b.titre().to_lowercase()),
        SortField::Valeur => a
            .objet_echange()
            .valeur_estimee
            .cmp(&b.objet_echange().valeur_estimee),
        SortField::Vues => a.metriques().vues.cmp(&b.metriques().vues),
    }
}

/// Sorts in place. The sort is stable.
pub fn sort<E: AsRef<Echange>>(items: &mut [E], field: SortField, order: SortOrder) {
    items.sort_by(|a, b| {
        let ordering = compare(a.as_ref(), b.as_ref(), field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Number of items on this page.
    pub count: usize,
    /// Number of items across all pages.
    pub total: usize,
    /// 1-based page number.
    pub page: u32,
    /// Number of pages.
    pub pages: u32,
}

/// Cuts `items` into pages of `limit` and returns page `page` (1-based).
///
/// Page 0 is read as page 1 and a zero limit as [`DEFAULT_PAGE_LIMIT`]. A page
/// past the end is empty but keeps the totals.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Page<T> {
    let page = page.max(1);
    let limit = if limit == 0 { DEFAULT_PAGE_LIMIT } else { limit };
    let total = items.len();
    let limit_len = usize::try_from(limit).unwrap_or(usize::MAX);
    let pages = u32::try_from(total.div_ceil(limit_len)).unwrap_or(u32::MAX);
    let skip = usize::try_from(page.saturating_sub(1))
        .unwrap_or(usize::MAX)
        .saturating_mul(limit_len);

    let items: Vec<T> = items.into_iter().skip(skip).take(limit_len).collect();
    Page {
        count: items.len(),
        items,
        total,
        page,
        pages,
    }
}

/// A listing request: filter, sort and page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchangeQuery {
    /// Selection criteria.
    pub filter: EchangeFilter,
    /// Sort column.
    pub sort_by: SortField,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// 1-based page; 0 reads as 1.
    pub page: u32,
    /// Page size; 0 reads as [`DEFAULT_PAGE_LIMIT`].
    pub limit: u32,
}

impl EchangeQuery {
    /// First page of everything, newest first.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter.
    #[must_use]
    pub fn with_filter(mut self, filter: EchangeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the sort column and direction.
    #[must_use]
    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = field;
        self.sort_order = order;
        self
    }

    /// Selects a page.
    #[must_use]
    pub fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    /// Filters, sorts and paginates `echanges`.
    #[must_use]
    pub fn apply(&self, echanges: Vec<Echange>) -> Page<Echange> {
        let mut selected: Vec<Echange> = echanges
            .into_iter()
            .filter(|e| self.filter.matches(e))
            .collect();
        sort(&mut selected, self.sort_by, self.sort_order);
        paginate(selected, self.page, self.limit)
    }

    /// Query parameters for the remote API, filter keys flattened in.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let limit = if self.limit == 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            self.limit
        };
        let mut pairs = vec![
            ("page", self.page.max(1).to_string()),
            ("limit", limit.to_string()),
            ("sort_by", self.sort_by.to_string()),
            ("sort_order", self.sort_order.to_string()),
        ];
        pairs.extend(self.filter.to_query_pairs());
        pairs
    }
}

/// Aggregate statistics over a set of exchanges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchangeStats {
    /// Number of exchanges.
    pub total: usize,
    /// Count per status.
    pub par_statut: BTreeMap<EchangeStatut, usize>,
    /// Count per offered object type.
    pub par_type: BTreeMap<TypeObjet, usize>,
    /// Count per city; exchanges without a city are not counted.
    pub par_ville: BTreeMap<String, usize>,
    /// Mean estimated value over exchanges that have one.
    pub valeur_moyenne: Option<Decimal>,
    /// `finalise / (finalise + annule)`, absent when both are zero.
    pub taux_reussite: Option<Decimal>,
    /// Sum of views.
    pub total_vues: u64,
    /// Sum of received propositions.
    pub total_propositions: u64,
    /// Sum of accepted propositions.
    pub total_propositions_acceptees: u64,
}

impl EchangeStats {
    /// Returns the count for one status.
    #[must_use]
    pub fn count(&self, statut: EchangeStatut) -> usize {
        self.par_statut.get(&statut).copied().unwrap_or(0)
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<Decimal> {
    if denominator == 0 {
        return None;
    }
    Decimal::from(numerator)
        .checked_div(Decimal::from(denominator))
        .map(|r| r.round_dp(4))
}

/// Computes [`EchangeStats`].
#[must_use]
pub fn compute_stats<E: AsRef<Echange>>(echanges: &[E]) -> EchangeStats {
    let mut stats = EchangeStats {
        total: echanges.len(),
        ..EchangeStats::default()
    };
    let mut valeur_sum = Decimal::ZERO;
    let mut valeur_count: u64 = 0;

    for echange in echanges.iter().map(AsRef::as_ref) {
        *stats.par_statut.entry(echange.statut()).or_default() += 1;
        *stats
            .par_type
            .entry(echange.objet_echange().type_objet)
            .or_default() += 1;
        if let Some(ville) = echange
            .localisation()
            .map(|l| l.ville.trim())
            .filter(|v| !v.is_empty())
        {
            *stats.par_ville.entry(ville.to_string()).or_default() += 1;
        }
        if let Some(v) = echange.objet_echange().valeur_estimee {
            valeur_sum = valeur_sum.saturating_add(v);
            valeur_count = valeur_count.saturating_add(1);
        }

        let m = echange.metriques();
        stats.total_vues = stats.total_vues.saturating_add(m.vues);
        stats.total_propositions = stats
            .total_propositions
            .saturating_add(m.propositions_recues);
        stats.total_propositions_acceptees = stats
            .total_propositions_acceptees
            .saturating_add(m.propositions_acceptees);
    }

    if valeur_count > 0 {
        stats.valeur_moyenne = valeur_sum
            .checked_div(Decimal::from(valeur_count))
            .map(|v| v.round_dp(2));
    }

    let finalises = stats.count(EchangeStatut::Finalise) as u64;
    let annules = stats.count(EchangeStatut::Annule) as u64;
    stats.taux_reussite = ratio(finalises, finalises.saturating_add(annules));
    stats
}

/// Read-side metrics for one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchangeAnalytics {
    /// The exchange.
    pub uuid: EchangeId,
    /// Current status.
    pub statut: EchangeStatut,
    /// Views.
    pub vues: u64,
    /// Interest flags.
    pub interesses: u64,
    /// Propositions received.
    pub propositions_recues: u64,
    /// Propositions accepted.
    pub propositions_acceptees: u64,
    /// `acceptees / recues`, absent without propositions.
    pub taux_acceptation: Option<Decimal>,
    /// Whole days left before expiration, never negative.
    pub jours_restants: i64,
    /// Whether the expiration date has passed.
    pub est_expire: bool,
    /// Whole days since creation.
    pub age_jours: i64,
}

/// Computes [`EchangeAnalytics`] as of now.
#[must_use]
pub fn analytics(echange: &Echange) -> EchangeAnalytics {
    let now = Timestamp::now();
    let m = echange.metriques();
    EchangeAnalytics {
        uuid: echange.uuid(),
        statut: echange.statut(),
        vues: m.vues,
        interesses: m.interesses,
        propositions_recues: m.propositions_recues,
        propositions_acceptees: m.propositions_acceptees,
        taux_acceptation: ratio(m.propositions_acceptees, m.propositions_recues),
        jours_restants: now.days_until(&echange.date_expiration()).max(0),
        est_expire: echange.is_expired(),
        age_jours: echange.date_creation().days_until(&now),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{EchangeCreateData, Offre, PropositionCreateData};
    use crate::domain::services::validation::ValidationPolicy;
    use crate::domain::value_objects::{
        Actor, Localisation, ObjetEchange, PropositionStatut,
    };

    fn make(titre: &str, ville: Option<&str>, valeur: Option<i64>) -> (Echange, Actor) {
        let createur = UserId::new_v4();
        let mut objet = ObjetEchange::new(TypeObjet::Produit, "Objet");
        if let Some(v) = valeur {
            objet = objet.with_valeur(Decimal::from(v));
        }
        let mut builder = EchangeCreateData::builder(
            titre,
            "Description suffisamment longue",
            CategorieId::new_v4(),
            "Objet",
            "Autre objet",
        )
        .objet(objet)
        .tags(vec!["Vintage".into()]);
        if let Some(v) = ville {
            builder = builder.localisation(Localisation::ville(v));
        }
        let echange =
            Echange::create(builder.build(), createur, &ValidationPolicy::default()).unwrap();
        (echange, Actor::utilisateur(createur))
    }

    fn fixture() -> Vec<Echange> {
        let (a, _) = make("Vélo", Some("Lyon"), Some(150));

        let (mut b, cb) = make("Guitare", Some("Paris"), Some(300));
        b.publish(&cb).unwrap();
        b.record_view();
        b.record_view();

        let (mut c, cc) = make("Appareil photo", Some("lyon"), None);
        c.publish(&cc).unwrap();
        c.cancel(&cc, None).unwrap();

        let (mut d, cd) = make("Batterie", None, Some(50));
        d.publish(&cd).unwrap();
        let mut p = d
            .receive_proposition(
                PropositionCreateData::new(Offre::new(TypeObjet::Produit, "Clavier")),
                &Actor::utilisateur(UserId::new_v4()),
            )
            .unwrap();
        d.update_proposition_status(&mut p, PropositionStatut::Acceptee, &cd, None)
            .unwrap();
        d.finalize(&cd).unwrap();
        d.record_view();

        vec![a, b, c, d]
    }

    mod filtering {
        use super::*;

        #[test]
        fn empty_filter_matches_all() {
            let all = fixture();
            assert_eq!(filter(&all, &EchangeFilter::new()).len(), 4);
        }

        #[test]
        fn by_status_and_city() {
            let all = fixture();
            let published = filter(&all, &EchangeFilter::new().with_statut(EchangeStatut::Publie));
            assert_eq!(published.len(), 1);
            assert_eq!(published.first().map(|e| e.titre()), Some("Guitare"));

            let lyon = filter(&all, &EchangeFilter::new().with_ville("LYON"));
            assert_eq!(lyon.len(), 2);
        }

        #[test]
        fn by_value_range_excludes_missing_estimates() {
            let all = fixture();
            let range = ValueRange::between(Decimal::from(100), Decimal::from(200));
            let hits = filter(&all, &EchangeFilter::new().with_valeur(range));
            assert_eq!(hits.len(), 1);
            assert_eq!(hits.first().map(|e| e.titre()), Some("Vélo"));
        }

        #[test]
        fn by_creator() {
            let all = fixture();
            let createur = all.first().unwrap().createur_uuid();
            assert_eq!(
                filter(&all, &EchangeFilter::new().with_createur(createur)).len(),
                1
            );
        }

        #[test]
        fn only_valid() {
            let mut all = fixture();
            all.first_mut()
                .unwrap()
                .approve(&Actor::moderateur(UserId::new_v4()))
                .unwrap();
            let f = EchangeFilter {
                only_valid: true,
                ..EchangeFilter::default()
            };
            assert_eq!(filter(&all, &f).len(), 1);
        }

        #[test]
        fn text_search_is_case_insensitive_over_tags() {
            let all = fixture();
            assert_eq!(search(&all, "GUITARE").len(), 1);
            assert_eq!(search(&all, "vintage").len(), 4);
            assert_eq!(search(&all, "  ").len(), 4);
            assert!(search(&all, "trombone").is_empty());
        }

        #[test]
        fn query_pairs() {
            let f = EchangeFilter::new()
                .with_statut(EchangeStatut::Publie)
                .with_statut(EchangeStatut::EnCours)
                .with_search("vélo");
            let pairs = f.to_query_pairs();
            assert!(pairs.contains(&("statut", "publie,en_cours".to_string())));
            assert!(pairs.contains(&("search", "vélo".to_string())));
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn sort_by_views_desc() {
            let all = fixture();
            let mut refs: Vec<&Echange> = all.iter().collect();
            sort(&mut refs, SortField::Vues, SortOrder::Desc);
            assert_eq!(refs.first().map(|e| e.titre()), Some("Guitare"));
        }

        #[test]
        fn sort_by_title_asc() {
            let mut all = fixture();
            sort(&mut all, SortField::Titre, SortOrder::Asc);
            let titles: Vec<&str> = all.iter().map(Echange::titre).collect();
            assert_eq!(titles, ["Appareil photo", "Batterie", "Guitare", "Vélo"]);
        }

        #[test]
        fn sort_by_value_puts_missing_first() {
            let mut all = fixture();
            sort(&mut all, SortField::Valeur, SortOrder::Asc);
            assert_eq!(all.first().map(Echange::titre), Some("Appareil photo"));
            assert_eq!(all.last().map(Echange::titre), Some("Guitare"));
        }

        #[test]
        fn pagination() {
            let page = paginate((1..=45).collect::<Vec<u32>>(), 3, 20);
            assert_eq!(page.items, (41..=45).collect::<Vec<u32>>());
            assert_eq!(page.count, 5);
            assert_eq!(page.total, 45);
            assert_eq!(page.pages, 3);

            let beyond = paginate((1..=5).collect::<Vec<u32>>(), 9, 2);
            assert!(beyond.items.is_empty());
            assert_eq!(beyond.pages, 3);

            let defaults = paginate(Vec::<u32>::new(), 0, 0);
            assert_eq!(defaults.page, 1);
            assert_eq!(defaults.pages, 0);
        }

        #[test]
        fn query_filters_sorts_and_pages() {
            let query = EchangeQuery::new()
                .with_filter(EchangeFilter::new().with_ville("LYON"))
                .sorted_by(SortField::Titre, SortOrder::Asc)
                .with_page(1, 1);
            let page = query.apply(fixture());
            assert_eq!(page.total, 2);
            assert_eq!(page.pages, 2);
            assert_eq!(page.items.first().map(Echange::titre), Some("Appareil photo"));
        }

        #[test]
        fn query_pairs_include_paging_and_filter() {
            let pairs = EchangeQuery::new()
                .with_filter(EchangeFilter::new().with_search("vélo"))
                .to_query_pairs();
            assert!(pairs.contains(&("page", "1".to_string())));
            assert!(pairs.contains(&("limit", DEFAULT_PAGE_LIMIT.to_string())));
            assert!(pairs.contains(&("sort_by", "date_creation".to_string())));
            assert!(pairs.contains(&("sort_order", "desc".to_string())));
            assert!(pairs.contains(&("search", "vélo".to_string())));
        }
    }

    mod statistics {
        use super::*;

        #[test]
        fn aggregate_stats() {
            let stats = compute_stats(&fixture());
            assert_eq!(stats.total, 4);
            assert_eq!(stats.count(EchangeStatut::Brouillon), 1);
            assert_eq!(stats.count(EchangeStatut::Finalise), 1);
            assert_eq!(stats.count(EchangeStatut::Annule), 1);
            assert_eq!(stats.par_type.get(&TypeObjet::Produit), Some(&4));
            assert_eq!(stats.par_ville.get("Lyon"), Some(&1));
            assert_eq!(stats.par_ville.get("lyon"), Some(&1));
            // (150 + 300 + 50) / 3
            assert_eq!(stats.valeur_moyenne, Some(Decimal::new(16667, 2)));
            assert_eq!(stats.taux_reussite, Some(Decimal::new(5, 1)));
            assert_eq!(stats.total_vues, 3);
            assert_eq!(stats.total_propositions, 1);
            assert_eq!(stats.total_propositions_acceptees, 1);
        }

        #[test]
        fn success_rate_absent_without_closed_exchanges() {
            let (a, _) = make("Vélo", None, None);
            assert_eq!(compute_stats(&[a]).taux_reussite, None);
            assert_eq!(compute_stats::<Echange>(&[]).valeur_moyenne, None);
        }

        #[test]
        fn per_exchange_analytics() {
            let all = fixture();
            let finalised = all.last().unwrap();
            let a = analytics(finalised);
            assert_eq!(a.statut, EchangeStatut::Finalise);
            assert_eq!(a.taux_acceptation, Some(Decimal::ONE));
            assert!(!a.est_expire);
            assert!(a.jours_restants >= 29);
            assert_eq!(a.age_jours, 0);

            let fresh = analytics(all.first().unwrap());
            assert_eq!(fresh.taux_acceptation, None);
        }
    }
}
