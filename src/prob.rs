//! Probability of an assumption-only DNF.
//!
//! Every assumption is an independent Bernoulli variable. The probability of
//! a DNF is the mass of the assignments satisfying at least one of its terms.
//! Two interchangeable computers are provided:
//!
//! - [`BddComputer`] builds the reduced ordered BDD of the DNF in canonical
//!   index order and evaluates it bottom-up with memoization.
//! - [`ExpansionComputer`] applies inclusion–exclusion over the terms,
//!   pruning every conjunction that is already contradictory.
//!
//! Both agree up to floating-point rounding; the BDD is the scalable one.

use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::str::FromStr;

use log::debug;

use crate::atoms::Weights;
use crate::bdd::{Bdd, BddConfig, MAX_NODE_BUDGET};
use crate::error::{Error, Result};
use crate::expr::{Form, Sentence, Term};
use crate::progress::{NoopObserver, Observer, Stage};
use crate::reference::Ref;

pub trait ProbabilityComputer {
    /// Probability that at least one term of `dnf` is true.
    fn probability(&self, dnf: &Sentence, weights: &Weights) -> Result<f64>;

    /// Probability of `fixed ∧ dnf`, where `fixed` is a consistent partial
    /// assignment and the atoms outside it stay free.
    fn probability_given(&self, dnf: &Sentence, fixed: &Term, weights: &Weights) -> Result<f64> {
        let p_fixed = term_probability(fixed, weights)?;
        if p_fixed == 0.0 {
            return Ok(0.0);
        }
        Ok(p_fixed * self.probability(&dnf.condition(fixed), weights)?)
    }
}

/// Product of the literal probabilities of a term.
pub fn term_probability(term: &Term, weights: &Weights) -> Result<f64> {
    let mut res = 1.0;
    for lit in term.iter() {
        res *= lit.weight(weights.probability(lit.var())?);
    }
    if term.is_contradictory() {
        return Ok(0.0);
    }
    Ok(res)
}

fn check_weights(dnf: &Sentence, weights: &Weights) -> Result<()> {
    assert_eq!(dnf.form(), Form::Dnf, "probabilities are computed for a DNF");
    for var in dnf.vars() {
        weights.probability(var)?;
    }
    Ok(())
}

/// Evaluation through a freshly built decision structure.
pub struct BddComputer {
    config: BddConfig,
    observer: Rc<dyn Observer>,
}

impl BddComputer {
    pub fn new(config: BddConfig) -> Self {
        Self::with_observer(config, Rc::new(NoopObserver))
    }

    pub fn with_observer(config: BddConfig, observer: Rc<dyn Observer>) -> Self {
        Self { config, observer }
    }

    pub fn config(&self) -> BddConfig {
        self.config
    }

    /// Build the function of `dnf` inside `bdd`: one cube per term, OR-ed together.
    pub fn build(&self, bdd: &Bdd, dnf: &Sentence) -> Result<Ref> {
        assert_eq!(dnf.form(), Form::Dnf, "only a DNF can be built");
        self.observer.started(Stage::Construction, dnf.len());
        let mut res = bdd.zero;
        for term in dnf.iter() {
            let cube = bdd.cube(term.iter())?;
            res = bdd.apply_or(res, cube)?;
        }
        self.observer.finished(Stage::Construction, bdd.num_nodes());
        debug!(
            "built {} terms into {} nodes (cache hits/misses = {:?})",
            dnf.len(),
            bdd.num_nodes(),
            bdd.cache_stats()
        );
        Ok(res)
    }
}

impl Default for BddComputer {
    fn default() -> Self {
        Self::new(BddConfig::default())
    }
}

impl ProbabilityComputer for BddComputer {
    fn probability(&self, dnf: &Sentence, weights: &Weights) -> Result<f64> {
        check_weights(dnf, weights)?;
        let bdd = Bdd::new(self.config);
        let f = self.build(&bdd, dnf)?;
        bdd.weighted_count(f, weights)
    }
}

/// Inclusion–exclusion over the terms.
///
/// ```text
/// P(t1 ∨ … ∨ tn) = Σ_{S ≠ ∅} (-1)^(|S|+1) · P(⋀_{i ∈ S} ti)
/// ```
///
/// Exponential in the number of mutually consistent terms.
#[derive(Debug, Default, Copy, Clone)]
pub struct ExpansionComputer;

impl ExpansionComputer {
    fn expand(terms: &[&Term], current: &Term, odd: bool, weights: &Weights) -> Result<f64> {
        let mut sum = 0.0;
        for (i, &term) in terms.iter().enumerate() {
            // Every superset of a contradictory conjunction is contradictory too.
            if current.conflicts_with(term) {
                continue;
            }
            let next = current.union(term);
            let p = term_probability(&next, weights)?;
            sum += if odd { p } else { -p };
            sum += Self::expand(&terms[i + 1..], &next, !odd, weights)?;
        }
        Ok(sum)
    }
}

impl ProbabilityComputer for ExpansionComputer {
    fn probability(&self, dnf: &Sentence, weights: &Weights) -> Result<f64> {
        check_weights(dnf, weights)?;
        let mut dnf = dnf.clone();
        dnf.update();
        if dnf.is_true() {
            return Ok(1.0);
        }
        let terms: Vec<&Term> = dnf.iter().collect();
        Self::expand(&terms, &Term::new(), true, weights)
    }
}

/// Choice of [`ProbabilityComputer`].
///
/// Printed and parsed as the parameter of the `set_strategy` command:
/// `bdd`, `bdd,<node budget>` or `expansion`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Strategy {
    Bdd(BddConfig),
    Expansion,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Bdd(BddConfig::default())
    }
}

impl Strategy {
    pub fn computer(&self, observer: Rc<dyn Observer>) -> Box<dyn ProbabilityComputer> {
        match *self {
            Strategy::Bdd(config) => Box::new(BddComputer::with_observer(config, observer)),
            Strategy::Expansion => Box::new(ExpansionComputer),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Bdd(config) => write!(f, "bdd,{}", config.node_budget()),
            Strategy::Expansion => write!(f, "expansion"),
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(',').map(str::trim);
        let name = parts.next().unwrap_or_default();
        let budget = parts.next();
        if parts.next().is_some() {
            return Err(Error::parse(0, format!("too many strategy parameters in `{}`", s)));
        }
        match (name, budget) {
            ("bdd", None) => Ok(Strategy::default()),
            ("bdd", Some(budget)) => {
                let position = name.len() + 1;
                let budget = budget
                    .parse::<usize>()
                    .map_err(|e| Error::parse(position, format!("invalid node budget `{}`: {}", budget, e)))?;
                if budget > MAX_NODE_BUDGET {
                    return Err(Error::parse(
                        position,
                        format!("node budget {} exceeds the maximum of {}", budget, MAX_NODE_BUDGET),
                    ));
                }
                Ok(Strategy::Bdd(BddConfig::default().with_node_budget(budget)))
            }
            ("expansion", None) => Ok(Strategy::Expansion),
            _ => Err(Error::parse(0, format!("unknown strategy `{}`", s))),
        }
    }
}
