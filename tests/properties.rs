//! Property tests for the exchange state machine, counters, validation and
//! equity evaluation.

#![allow(clippy::unwrap_used)]

use echange_core::domain::entities::{
    Echange, EchangeCreateData, EchangeProposition, Offre, PropositionCreateData,
};
use echange_core::domain::services::equity::{EquityPolicy, Valuation, evaluate_equity};
use echange_core::domain::services::validation::{ValidationPolicy, validate};
use echange_core::domain::value_objects::{
    Actor, CategorieId, EchangeStatut, PropositionStatut, TypeObjet, UserId, ValueRange,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy)]
enum Op {
    Submit,
    Withdraw,
    Publish,
    Block,
    Unblock,
    Finalize,
    Cancel,
    Archive,
    Restore,
    Propose,
    Answer(usize, PropositionStatut),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Submit),
        1 => Just(Op::Withdraw),
        1 => Just(Op::Publish),
        1 => Just(Op::Block),
        1 => Just(Op::Unblock),
        1 => Just(Op::Finalize),
        1 => Just(Op::Cancel),
        1 => Just(Op::Archive),
        1 => Just(Op::Restore),
        3 => Just(Op::Propose),
        4 => (
            any::<usize>(),
            prop::sample::select(vec![
                PropositionStatut::Etudiee,
                PropositionStatut::Negociee,
                PropositionStatut::Acceptee,
                PropositionStatut::Refusee,
                PropositionStatut::Annulee,
            ])
        )
            .prop_map(|(i, statut)| Op::Answer(i, statut)),
    ]
}

struct Market {
    echange: Echange,
    propositions: Vec<EchangeProposition>,
    createur: Actor,
    moderateur: Actor,
    proposant: Actor,
}

impl Market {
    fn new() -> Self {
        let createur = Actor::utilisateur(UserId::new_v4());
        let data = EchangeCreateData::builder(
            "Vélo de route",
            "Vélo de route en aluminium, taille 56",
            CategorieId::new_v4(),
            "Vélo de route taille 56",
            "Guitare acoustique",
        )
        .build();
        Self {
            echange: Echange::create(data, createur.uuid(), &ValidationPolicy::default())
                .unwrap(),
            propositions: Vec::new(),
            createur,
            moderateur: Actor::moderateur(UserId::new_v4()),
            proposant: Actor::utilisateur(UserId::new_v4()),
        }
    }

    fn apply(&mut self, op: Op) -> bool {
        let createur = self.createur;
        let moderateur = self.moderateur;
        let result = match op {
            Op::Submit => self.echange.submit(&createur),
            Op::Withdraw => self.echange.withdraw(&createur),
            Op::Publish => self.echange.publish(&createur),
            Op::Block => self.echange.block(&moderateur, "Signalement"),
            Op::Unblock => self.echange.unblock(&moderateur),
            Op::Finalize => self.echange.finalize(&createur),
            Op::Cancel => self.echange.cancel(&createur, None),
            Op::Archive => self.echange.archive(&createur),
            Op::Restore => self.echange.restore(&moderateur, None),
            Op::Propose => self
                .echange
                .receive_proposition(
                    PropositionCreateData::new(Offre::new(TypeObjet::Produit, "Guitare folk")),
                    &self.proposant,
                )
                .map(|p| self.propositions.push(p)),
            Op::Answer(i, statut) => {
                if self.propositions.is_empty() {
                    return false;
                }
                let len = self.propositions.len();
                let actor = if statut == PropositionStatut::Annulee {
                    self.proposant
                } else {
                    createur
                };
                match self.propositions.get_mut(i % len) {
                    Some(p) => self
                        .echange
                        .update_proposition_status(p, statut, &actor, None),
                    None => return false,
                }
            }
        };
        result.is_ok()
    }
}

proptest! {
    #[test]
    fn terminal_states_only_leave_through_restore(ops in prop::collection::vec(op(), 1..40)) {
        let mut market = Market::new();
        for op in ops {
            let before = market.echange.statut();
            let applied = market.apply(op);
            let after = market.echange.statut();
            if !applied {
                prop_assert_eq!(before, after);
                continue;
            }
            if before.is_terminal() && after != before {
                let restored = before == EchangeStatut::Archive
                    && after == EchangeStatut::Publie
                    && matches!(op, Op::Restore);
                prop_assert!(
                    after.is_terminal() || restored,
                    "{} -> {} via {:?}",
                    before,
                    after,
                    op
                );
            }
        }
    }

    #[test]
    fn counters_never_decrease(ops in prop::collection::vec(op(), 1..40)) {
        let mut market = Market::new();
        let mut previous = *market.echange.metriques();
        for op in ops {
            market.apply(op);
            let current = *market.echange.metriques();
            prop_assert!(current.propositions_recues >= current.propositions_acceptees);
            prop_assert!(current.propositions_recues >= previous.propositions_recues);
            prop_assert!(current.propositions_acceptees >= previous.propositions_acceptees);
            prop_assert!(current.propositions_acceptees <= previous.propositions_acceptees + 1);
            prop_assert!(current.propositions_acceptees <= 1);
            let accepted = market
                .propositions
                .iter()
                .filter(|p| p.statut() == PropositionStatut::Acceptee)
                .count();
            prop_assert!(accepted <= 1, "{} accepted after {:?}", accepted, op);
            previous = current;
        }
    }

    #[test]
    fn unblock_returns_to_the_blocked_status(ops in prop::collection::vec(op(), 1..40)) {
        let mut market = Market::new();
        let mut blocked_from = None;
        for op in ops {
            let before = market.echange.statut();
            let applied = market.apply(op);
            if !applied {
                continue;
            }
            match op {
                Op::Block => blocked_from = Some(before),
                Op::Unblock => prop_assert_eq!(Some(market.echange.statut()), blocked_from),
                _ => {}
            }
        }
    }

    #[test]
    fn one_error_per_missing_field(
        titre in any::<bool>(),
        description in any::<bool>(),
        categorie in any::<bool>(),
        objet in any::<bool>(),
        recherche in any::<bool>(),
    ) {
        let blank = |missing: bool, value: &str| if missing { String::new() } else { value.to_string() };
        let mut data = EchangeCreateData::builder(
            blank(titre, "Vélo de route"),
            blank(description, "Vélo de route en aluminium, taille 56"),
            CategorieId::new_v4(),
            blank(objet, "Vélo de route taille 56"),
            blank(recherche, "Guitare acoustique"),
        )
        .build();
        if categorie {
            data.categorie_uuid = None;
        }

        let missing = [titre, description, categorie, objet, recherche]
            .into_iter()
            .filter(|m| *m)
            .count();
        let report = validate(&data, &ValidationPolicy::default());
        prop_assert_eq!(report.errors.len(), missing, "{:?}", report.errors);
        prop_assert_eq!(report.is_valid(), missing == 0);
    }

    #[test]
    fn symmetric_band_is_equitable(cents in 1i64..100_000_000) {
        let v = Decimal::new(cents, 2);
        let data = EchangeCreateData::builder(
            "Vélo de route",
            "Vélo de route en aluminium, taille 56",
            CategorieId::new_v4(),
            "Vélo de route taille 56",
            "Guitare acoustique",
        )
        .valeur_estimee(v)
        .valeurs_acceptees(ValueRange::between(
            v * Decimal::new(9, 1),
            v * Decimal::new(11, 1),
        ))
        .build();

        let evaluation = evaluate_equity(&data, &EquityPolicy::default());
        prop_assert!(evaluation.equitable);
        prop_assert_eq!(evaluation.valuation, Valuation::Equilibre);
        prop_assert_eq!(evaluation.ratio, Decimal::ONE);
    }
}

#[test]
fn terminal_transition_table() {
    for from in EchangeStatut::ALL.into_iter().filter(EchangeStatut::is_terminal) {
        for to in from.valid_transitions() {
            assert!(
                to.is_terminal() || (from == EchangeStatut::Archive && to == EchangeStatut::Publie),
                "{from} -> {to}"
            );
        }
    }
}
