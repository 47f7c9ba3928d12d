//! Consequence finding: quasi-support, support and the contradiction set.
//!
//! ## Quasi-support
//!
//! For a hypothesis clause `C`, the clauses of the knowledge base together
//! with the unit clauses `¬l` for every `l ∈ C` are reduced by Davis–Putnam
//! elimination of every proposition. What remains is a CNF `Φ` over
//! assumptions only, equivalent to `∃P (K ∧ ¬C)`. Negating it yields the DNF
//! of assumption terms that force `C`:
//!
//! ```text
//! QS(C) = ¬Φ        QS(C1 ∧ … ∧ Cn) = QS(C1) ∧ … ∧ QS(Cn)
//! ```
//!
//! The contradiction set is `QS(false)`: the eliminated CNF of the knowledge
//! base alone, negated. The eliminated CNF is cached inside the [`Kb`] until
//! its next mutation.
//!
//! ## Support
//!
//! `SP(H) = QS(H) ∧ ¬QS(false)`. Every quasi-support term is conditioned on
//! the eliminated knowledge base: a falsified clause drops the term, a fully
//! satisfied CNF keeps it, anything else refines it into consistent sub-terms.

use std::collections::BTreeMap;
use std::rc::Rc;

use log::debug;

use crate::atoms::Registry;
use crate::error::Result;
use crate::expr::{Form, Sentence, Term};
use crate::kb::Kb;
use crate::progress::{NoopObserver, Observer, Stage};
use crate::types::Var;

pub struct Resolver<'a> {
    kb: &'a Kb,
    observer: Rc<dyn Observer>,
}

impl<'a> Resolver<'a> {
    pub fn new(kb: &'a Kb) -> Self {
        Self::with_observer(kb, Rc::new(NoopObserver))
    }

    pub fn with_observer(kb: &'a Kb, observer: Rc<dyn Observer>) -> Self {
        Self { kb, observer }
    }

    pub fn kb(&self) -> &'a Kb {
        self.kb
    }

    /// Quasi-support of a hypothesis.
    ///
    /// A CNF hypothesis is used as is; a DNF one is converted first.
    pub fn find_qs(&self, hypothesis: &Sentence) -> Result<Sentence> {
        self.kb.check_sentence(hypothesis)?;
        self.observer.started(Stage::Resolution, hypothesis.len());
        let qs = self.quasi_support(hypothesis);
        self.observer.finished(Stage::Resolution, qs.len());
        Ok(qs)
    }

    /// Support of a hypothesis: its quasi-support without the scenarios that
    /// make the knowledge base inconsistent.
    pub fn find_sp(&self, hypothesis: &Sentence) -> Result<Sentence> {
        self.kb.check_sentence(hypothesis)?;
        self.observer.started(Stage::Resolution, hypothesis.len());
        let qs = self.quasi_support(hypothesis);
        let consistency = self.contradiction_cnf();

        let mut sp = Sentence::new(Form::Dnf);
        for term in qs.iter() {
            let rest = consistency.condition(term);
            if rest.is_false() {
                debug!("sp: dropping inconsistent term {}", Sentence::dnf([term.clone()]));
                continue;
            }
            if rest.is_true() {
                sp.insert(term.clone());
                continue;
            }
            let refined = Sentence::dnf([term.clone()]).and_dnf(&rest.to_dnf());
            debug!(
                "sp: refined {} into {} terms",
                Sentence::dnf([term.clone()]),
                refined.len()
            );
            for t in refined.iter() {
                sp.insert(t.clone());
            }
        }
        sp.update();

        self.observer.finished(Stage::Resolution, sp.len());
        Ok(sp)
    }

    /// The contradiction set `QS(false)`: assumption terms that make the
    /// knowledge base inconsistent.
    pub fn contradiction(&self) -> Sentence {
        let mut res = self.contradiction_cnf().negate();
        res.update();
        res
    }

    /// The knowledge base with every proposition eliminated.
    fn contradiction_cnf(&self) -> Sentence {
        if let Some(cnf) = self.kb.cached_contradiction() {
            return cnf;
        }
        let cnf = eliminate(self.kb.clauses().clone(), self.kb.registry());
        self.kb.cache_contradiction(cnf.clone());
        cnf
    }

    fn quasi_support(&self, hypothesis: &Sentence) -> Sentence {
        let hypothesis = hypothesis.to_cnf();
        let mut qs = Sentence::constant(Form::Dnf, true);
        for clause in hypothesis.iter() {
            if clause.is_contradictory() {
                continue;
            }
            qs = qs.and_dnf(&self.clause_quasi_support(clause));
            if qs.is_false() {
                break;
            }
        }
        qs
    }

    fn clause_quasi_support(&self, clause: &Term) -> Sentence {
        let phi = if clause.is_empty() {
            self.contradiction_cnf()
        } else {
            let mut f = self.kb.clauses().clone();
            for lit in clause.iter() {
                f.insert(Term::unit(-lit));
            }
            eliminate(f, self.kb.registry())
        };
        let mut qs = phi.negate();
        qs.update();
        qs
    }
}

/// Existentially eliminate every proposition of `cnf` by resolution.
///
/// At each step the proposition with the fewest potential resolvents
/// (`|pos|·|neg|`) goes first; ties go to the lowest index. The result
/// mentions assumptions only and is free of subsumed clauses.
pub fn eliminate(mut cnf: Sentence, registry: &Registry) -> Sentence {
    assert_eq!(cnf.form(), Form::Cnf, "only a CNF can be eliminated");
    cnf.update();

    loop {
        if cnf.is_false() {
            return cnf;
        }

        let candidate = occurrences(&cnf, registry)
            .into_iter()
            .min_by_key(|&(_, (pos, neg))| pos * neg);
        let Some((v, (pos, neg))) = candidate else {
            return cnf;
        };
        debug!("eliminate {} ({} pos, {} neg) from {} clauses", v, pos, neg, cnf.len());
        cnf = resolve_on(&cnf, v);
    }
}

/// `(positive, negative)` occurrence counts of every proposition.
fn occurrences(cnf: &Sentence, registry: &Registry) -> BTreeMap<Var, (usize, usize)> {
    let mut counts: BTreeMap<Var, (usize, usize)> = BTreeMap::new();
    for lit in cnf.iter().flat_map(|clause| clause.iter()) {
        if !registry.is_proposition(lit.var()) {
            continue;
        }
        let (pos, neg) = counts.entry(lit.var()).or_default();
        if lit.is_positive() {
            *pos += 1;
        } else {
            *neg += 1;
        }
    }
    counts
}

fn resolve_on(cnf: &Sentence, v: Var) -> Sentence {
    let mut pos = Vec::new();
    let mut neg = Vec::new();
    let mut res = Sentence::new(Form::Cnf);

    for clause in cnf.iter() {
        match clause.iter().find(|lit| lit.var() == v) {
            Some(lit) if lit.is_positive() => pos.push(clause),
            Some(_) => neg.push(clause),
            None => {
                res.insert(clause.clone());
            }
        }
    }

    for p in &pos {
        for n in &neg {
            let resolvent: Term = p.iter().chain(n.iter()).filter(|lit| lit.var() != v).collect();
            if !resolvent.is_contradictory() {
                res.insert(resolvent);
            }
        }
    }

    res.update();
    res
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use test_log::test;

    use super::*;
    use crate::error::Error;

    fn train_kb() -> Kb {
        let mut kb = Kb::new();
        kb.create_assumption("Person_sick", 0.05).unwrap();
        kb.create_assumption("Heavy_rain", 0.1).unwrap();
        kb.create_assumption("Rain_causes_train_problem", 0.2).unwrap();
        kb.create_proposition("train_delay").unwrap();
        kb.add_horn_text("Heavy_rain, Rain_causes_train_problem -> train_delay")
            .unwrap();
        kb.add_horn_text("Person_sick -> train_delay").unwrap();
        kb
    }

    #[test]
    fn test_qs_train_delay() {
        let kb = train_kb();
        let resolver = Resolver::new(&kb);
        let h = kb.construct_cnf("train_delay").unwrap();
        let qs = resolver.find_qs(&h).unwrap();
        assert_eq!(kb.render(&qs), "(Person_sick) + (Heavy_rain Rain_causes_train_problem)");
    }

    #[test]
    fn test_qs_constants() {
        let kb = train_kb();
        let resolver = Resolver::new(&kb);

        let tautology = kb.construct_cnf("(train_delay ~train_delay)").unwrap();
        assert!(resolver.find_qs(&tautology).unwrap().is_true());

        let empty = kb.construct_cnf("true").unwrap();
        assert!(resolver.find_qs(&empty).unwrap().is_true());

        // The knowledge base is consistent: nothing supports `false`.
        let falsum = kb.construct_cnf("false").unwrap();
        assert!(resolver.find_qs(&falsum).unwrap().is_false());
        assert!(resolver.contradiction().is_false());
    }

    #[test]
    fn test_qs_assumption_hypothesis() {
        let kb = train_kb();
        let resolver = Resolver::new(&kb);
        let h = kb.construct_cnf("(Heavy_rain Person_sick)").unwrap();
        let qs = resolver.find_qs(&h).unwrap();
        assert_eq!(kb.render(&qs), "(Person_sick) + (Heavy_rain)");
    }

    #[test]
    fn test_unknown_atom() {
        let kb = train_kb();
        let other = {
            let mut other = train_kb();
            other.create_proposition("snow").unwrap();
            other
        };
        let h = other.construct_cnf("snow").unwrap();
        assert_eq!(
            Resolver::new(&kb).find_qs(&h),
            Err(Error::UnknownAtom("x5".to_string()))
        );
    }

    fn inconsistent_kb() -> Kb {
        let mut kb = train_kb();
        kb.create_assumption("Strike", 0.3).unwrap();
        kb.create_proposition("station_open").unwrap();
        kb.add_horn_text("Strike -> train_delay").unwrap();
        kb.add_horn_text("Heavy_rain -> station_open").unwrap();
        kb.add_horn_text("Strike, station_open -> false").unwrap();
        kb
    }

    #[test]
    fn test_contradiction() {
        let kb = inconsistent_kb();
        let resolver = Resolver::new(&kb);
        let contradiction = resolver.contradiction();
        assert_eq!(kb.render(&contradiction), "(Heavy_rain Strike)");
        assert!(kb.cached_contradiction().is_some());
    }

    #[test]
    fn test_contradiction_follows_mutation() {
        let mut kb = inconsistent_kb();
        let before = Resolver::new(&kb).contradiction();
        assert_eq!(kb.render(&before), "(Heavy_rain Strike)");

        kb.add_horn_text("Person_sick, Rain_causes_train_problem -> false").unwrap();
        assert!(kb.cached_contradiction().is_none());

        let after = Resolver::new(&kb).contradiction();
        let expected = kb
            .construct_dnf("(Heavy_rain Strike) + (Person_sick Rain_causes_train_problem)")
            .unwrap();
        assert_eq!(after, expected);
        assert!(kb.cached_contradiction().is_some());
    }

    #[test]
    fn test_sp_removes_inconsistent_scenarios() {
        let kb = inconsistent_kb();
        let resolver = Resolver::new(&kb);
        let h = kb.construct_cnf("train_delay").unwrap();

        let qs = resolver.find_qs(&h).unwrap();
        assert_eq!(
            kb.render(&qs),
            "(Person_sick) + (Heavy_rain Rain_causes_train_problem) + (Strike)"
        );

        // Every term is only partially inconsistent: `Heavy_rain Strike` is cut out of each.
        let sp = resolver.find_sp(&h).unwrap();
        assert_eq!(
            kb.render(&sp),
            "(Person_sick ~Heavy_rain) + (Person_sick ~Strike) + \
             (Heavy_rain Rain_causes_train_problem ~Strike) + (~Heavy_rain Strike)"
        );
    }

    #[test]
    fn test_sp_drops_wholly_inconsistent_terms() {
        let kb = inconsistent_kb();
        let resolver = Resolver::new(&kb);
        let h = kb.construct_cnf("(Heavy_rain) (Strike)").unwrap();
        assert_eq!(kb.render(&resolver.find_qs(&h).unwrap()), "(Heavy_rain Strike)");
        assert!(resolver.find_sp(&h).unwrap().is_false());
    }

    #[test]
    fn test_eliminate_chain() {
        let mut kb = Kb::new();
        kb.create_assumption("a", 0.5).unwrap();
        kb.create_proposition("p").unwrap();
        kb.create_proposition("q").unwrap();
        kb.add_horn_text("a -> p").unwrap();
        kb.add_horn_text("p -> q").unwrap();
        kb.add_horn_text("q -> false").unwrap();
        let cnf = eliminate(kb.clauses().clone(), kb.registry());
        assert_eq!(kb.render(&cnf), "(~a)");
    }

    #[test]
    fn test_observer_is_notified() {
        #[derive(Default)]
        struct Counter(RefCell<Vec<Stage>>);
        impl Observer for Counter {
            fn finished(&self, stage: Stage, _size: usize) {
                self.0.borrow_mut().push(stage);
            }
        }

        let kb = train_kb();
        let counter = Rc::new(Counter::default());
        let resolver = Resolver::with_observer(&kb, counter.clone());
        let h = kb.construct_cnf("train_delay").unwrap();
        resolver.find_qs(&h).unwrap();
        resolver.find_sp(&h).unwrap();
        assert_eq!(counter.0.borrow().as_slice(), &[Stage::Resolution, Stage::Resolution]);
    }
}
