//! Degrees of quasi-support and support.
//!
//! ```text
//! dqs(H)              = P(QS(H))
//! dsp(H) unnormalised = P(SP(H))
//! dsp(H)              = P(SP(H)) / (1 - dqs(false))
//! ```
//!
//! A [`NumericResolver`] borrows its knowledge base immutably, so `dqs(false)`
//! is computed at most once per resolver.

use std::cell::Cell;
use std::rc::Rc;

use log::info;
use num_bigint::BigUint;

use crate::bdd::{Bdd, BddConfig};
use crate::error::{Error, Result};
use crate::expr::{Form, Sentence};
use crate::kb::Kb;
use crate::prob::{BddComputer, ProbabilityComputer, Strategy};
use crate::progress::{NoopObserver, Observer};
use crate::resolver::Resolver;

pub struct NumericResolver<'a> {
    resolver: Resolver<'a>,
    strategy: Strategy,
    computer: Box<dyn ProbabilityComputer>,
    observer: Rc<dyn Observer>,
    contradiction: Cell<Option<f64>>,
}

impl<'a> NumericResolver<'a> {
    pub fn new(kb: &'a Kb, strategy: Strategy) -> Self {
        Self::with_observer(kb, strategy, Rc::new(NoopObserver))
    }

    pub fn with_observer(kb: &'a Kb, strategy: Strategy, observer: Rc<dyn Observer>) -> Self {
        Self {
            resolver: Resolver::with_observer(kb, observer.clone()),
            strategy,
            computer: strategy.computer(observer.clone()),
            observer,
            contradiction: Cell::new(None),
        }
    }

    pub fn resolver(&self) -> &Resolver<'a> {
        &self.resolver
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn computer(&self) -> &dyn ProbabilityComputer {
        self.computer.as_ref()
    }

    fn kb(&self) -> &'a Kb {
        self.resolver.kb()
    }

    fn evaluate(&self, dnf: &Sentence) -> Result<f64> {
        self.computer.probability(dnf, &self.kb().registry().weights())
    }

    pub fn find_qs(&self, hypothesis: &Sentence) -> Result<Sentence> {
        self.resolver.find_qs(hypothesis)
    }

    pub fn find_sp(&self, hypothesis: &Sentence) -> Result<Sentence> {
        self.resolver.find_sp(hypothesis)
    }

    /// Degree of quasi-support: probability of the quasi-support.
    pub fn calc_dqs(&self, hypothesis: &Sentence) -> Result<f64> {
        let qs = self.find_qs(hypothesis)?;
        self.evaluate(&qs)
    }

    /// Probability of the support, not normalised.
    pub fn calc_non_normalised_dsp(&self, hypothesis: &Sentence) -> Result<f64> {
        let sp = self.find_sp(hypothesis)?;
        self.evaluate(&sp)
    }

    /// Probability that the knowledge base is inconsistent: `dqs(false)`.
    pub fn calc_contradiction(&self) -> Result<f64> {
        if let Some(p) = self.contradiction.get() {
            return Ok(p);
        }
        let p = self.evaluate(&self.resolver.contradiction())?;
        info!("dqs(false) = {}", p);
        self.contradiction.set(Some(p));
        Ok(p)
    }

    /// Degree of support, conditioned on the knowledge base being consistent.
    pub fn calc_normalised_dsp(&self, hypothesis: &Sentence) -> Result<f64> {
        let contradiction = self.calc_contradiction()?;
        let consistent = 1.0 - contradiction;
        if consistent <= 1e-12 {
            return Err(Error::DegenerateNormalization);
        }
        Ok(self.calc_non_normalised_dsp(hypothesis)? / consistent)
    }

    /// Number of complete assumption assignments under which the quasi-support holds.
    pub fn count_qs_scenarios(&self, hypothesis: &Sentence) -> Result<BigUint> {
        let qs = self.find_qs(hypothesis)?;
        let config = match self.strategy {
            Strategy::Bdd(config) => config,
            Strategy::Expansion => BddConfig::default(),
        };
        let bdd = Bdd::new(config);
        let f = BddComputer::with_observer(config, self.observer.clone()).build(&bdd, &qs)?;
        let registry = self.kb().registry();
        let count = bdd.sat_count(f, registry.len());
        Ok(count >> registry.num_propositions())
    }

    fn parse(&self, text: &str) -> Result<Sentence> {
        self.kb().construct_cnf(text)
    }

    pub fn find_qs_text(&self, hypothesis: &str) -> Result<Sentence> {
        self.find_qs(&self.parse(hypothesis)?)
    }

    pub fn find_sp_text(&self, hypothesis: &str) -> Result<Sentence> {
        self.find_sp(&self.parse(hypothesis)?)
    }

    pub fn calc_dqs_text(&self, hypothesis: &str) -> Result<f64> {
        self.calc_dqs(&self.parse(hypothesis)?)
    }

    pub fn calc_non_normalised_dsp_text(&self, hypothesis: &str) -> Result<f64> {
        self.calc_non_normalised_dsp(&self.parse(hypothesis)?)
    }

    pub fn calc_normalised_dsp_text(&self, hypothesis: &str) -> Result<f64> {
        self.calc_normalised_dsp(&self.parse(hypothesis)?)
    }

    /// `dqs(false)` for a hypothesis given as the constant sentence.
    pub fn falsum() -> Sentence {
        Sentence::constant(Form::Cnf, false)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

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

    fn strategies() -> [Strategy; 2] {
        [Strategy::default(), Strategy::Expansion]
    }

    #[test]
    fn test_train_delay() {
        let kb = train_kb();
        for strategy in strategies() {
            let numeric = NumericResolver::new(&kb, strategy);
            let dqs = numeric.calc_dqs_text("train_delay").unwrap();
            assert!((dqs - 0.069).abs() < 1e-12, "dqs = {}", dqs);
            let dsp = numeric.calc_normalised_dsp_text("train_delay").unwrap();
            assert!((dsp - 0.069).abs() < 1e-12, "dsp = {}", dsp);
            assert_eq!(numeric.calc_contradiction().unwrap(), 0.0);
        }
    }

    #[test]
    fn test_count_qs_scenarios() {
        let kb = train_kb();
        let numeric = NumericResolver::new(&kb, Strategy::default());
        // x1 + x2 x3 over three assumptions: 4 + 1 scenarios.
        assert_eq!(numeric.count_qs_scenarios(&kb.construct_cnf("train_delay").unwrap()).unwrap(), BigUint::from(5u32));
        assert_eq!(numeric.count_qs_scenarios(&NumericResolver::falsum()).unwrap(), BigUint::from(0u32));
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
    fn test_normalisation_identity() {
        let kb = inconsistent_kb();
        for strategy in strategies() {
            let numeric = NumericResolver::new(&kb, strategy);
            let contradiction = numeric.calc_contradiction().unwrap();
            assert!((contradiction - 0.03).abs() < 1e-12);

            let h = kb.construct_cnf("train_delay").unwrap();
            let raw = numeric.calc_non_normalised_dsp(&h).unwrap();
            let normalised = numeric.calc_normalised_dsp(&h).unwrap();
            assert!((normalised - raw / (1.0 - contradiction)).abs() < 1e-12);
            assert!(raw <= numeric.calc_dqs(&h).unwrap() + 1e-12);
        }
    }

    #[test]
    fn test_degenerate_normalisation() {
        let mut kb = Kb::new();
        kb.create_assumption("always", 1.0).unwrap();
        kb.create_proposition("p").unwrap();
        kb.add_horn_text("always -> p").unwrap();
        kb.add_horn_text("p -> false").unwrap();
        let numeric = NumericResolver::new(&kb, Strategy::default());
        assert_eq!(
            numeric.calc_normalised_dsp_text("p"),
            Err(Error::DegenerateNormalization)
        );
    }

    #[test]
    fn test_unknown_atom() {
        let kb = train_kb();
        let numeric = NumericResolver::new(&kb, Strategy::default());
        assert_eq!(
            numeric.calc_dqs_text("snow"),
            Err(Error::UnknownAtom("snow".to_string()))
        );
    }
}
