//! Exhaustive scenario enumeration, used to cross-check the symbolic engine.
//!
//! A scenario is a complete assignment of the atoms mentioned by a
//! hypothesis DNF. Assignments are enumerated as binary numbers whose most
//! significant bit is the atom with the lowest index; a set bit makes the atom
//! true. Under each scenario both the hypothesis and the contradiction set of
//! the knowledge base are simplified and classified.

use log::debug;

use crate::error::{Error, Result};
use crate::expr::{Form, Literal, Sentence, Term};
use crate::kb::Kb;
use crate::prob::{term_probability, ProbabilityComputer};
use crate::resolver::Resolver;
use crate::types::Var;

/// Largest number of atoms that can be enumerated.
pub const MAX_ATOMS: usize = 30;

/// How a DNF simplifies under a scenario.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Outcome {
    /// Reduces to exactly the scenario term.
    Satisfied,
    /// Reduces to false.
    Unsatisfiable,
    /// Still depends on atoms outside the scenario.
    Partial,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub assignment: Term,
    pub probability: f64,
    pub hypothesis: Outcome,
    pub contradiction: Outcome,
    /// Contribution to the hypothesis mass.
    pub hypothesis_mass: f64,
    /// Contribution to the contradiction mass.
    pub contradiction_mass: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioReport {
    pub atoms: Vec<Var>,
    pub satisfied: usize,
    pub partial: usize,
    pub inconsistent: usize,
    pub hypothesis_mass: f64,
    pub contradiction_mass: f64,
}

impl ScenarioReport {
    pub fn num_scenarios(&self) -> usize {
        1 << self.atoms.len()
    }
}

pub struct ScenarioAnalyzer<'a> {
    kb: &'a Kb,
    computer: &'a dyn ProbabilityComputer,
}

impl<'a> ScenarioAnalyzer<'a> {
    pub fn new(kb: &'a Kb, computer: &'a dyn ProbabilityComputer) -> Self {
        Self { kb, computer }
    }

    pub fn analyze(&self, hypothesis: &Sentence) -> Result<ScenarioReport> {
        self.analyze_with(hypothesis, |_| {})
    }

    /// Enumerate every scenario of `hypothesis`, handing each to `visit`.
    pub fn analyze_with(&self, hypothesis: &Sentence, mut visit: impl FnMut(&Scenario)) -> Result<ScenarioReport> {
        assert_eq!(hypothesis.form(), Form::Dnf, "scenarios are enumerated for a DNF");
        self.kb.check_sentence(hypothesis)?;

        let atoms: Vec<Var> = hypothesis.vars().into_iter().collect();
        let n = atoms.len();
        if n > MAX_ATOMS {
            return Err(Error::ScenarioSpaceTooLarge {
                atoms: n,
                limit: MAX_ATOMS,
            });
        }

        let contradiction = Resolver::new(self.kb).contradiction();
        let weights = self.kb.registry().weights();

        let mut report = ScenarioReport {
            atoms: atoms.clone(),
            ..Default::default()
        };

        for mask in 0u32..(1u32 << n) {
            let assignment: Term = atoms
                .iter()
                .enumerate()
                .map(|(i, &v)| Literal::new(v, mask & (1 << (n - 1 - i)) != 0))
                .collect();
            let probability = term_probability(&assignment, &weights)?;

            let (h, h_mass) = self.contribution(hypothesis, &assignment, probability)?;
            let (c, c_mass) = self.contribution(&contradiction, &assignment, probability)?;

            if c == Outcome::Satisfied {
                report.inconsistent += 1;
            } else if h == Outcome::Partial || c == Outcome::Partial {
                report.partial += 1;
            } else if h == Outcome::Satisfied {
                report.satisfied += 1;
            }
            report.hypothesis_mass += h_mass;
            report.contradiction_mass += c_mass;

            let scenario = Scenario {
                assignment,
                probability,
                hypothesis: h,
                contradiction: c,
                hypothesis_mass: h_mass,
                contradiction_mass: c_mass,
            };
            debug!("scenario {:0width$b}: {:?}", mask, scenario, width = n);
            visit(&scenario);
        }

        Ok(report)
    }

    fn contribution(&self, dnf: &Sentence, assignment: &Term, probability: f64) -> Result<(Outcome, f64)> {
        let outcome = classify(dnf, assignment);
        let mass = match outcome {
            Outcome::Unsatisfiable => 0.0,
            Outcome::Satisfied => probability,
            Outcome::Partial => {
                self.computer
                    .probability_given(dnf, assignment, &self.kb.registry().weights())?
            }
        };
        Ok((outcome, mass))
    }
}

/// Intersect `dnf` with the scenario and classify what is left.
pub fn classify(dnf: &Sentence, assignment: &Term) -> Outcome {
    let mut res = dnf.clone();
    for lit in assignment.iter() {
        res.add_literal(lit);
    }
    res.update();

    if res.is_false() {
        Outcome::Unsatisfiable
    } else if res == Sentence::dnf([assignment.clone()]) {
        Outcome::Satisfied
    } else {
        Outcome::Partial
    }
}
