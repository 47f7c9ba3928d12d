//! Atom registry: names, kinds and canonical indices.
//!
//! The registry is the single place where canonical indices are handed out.
//! Everything downstream (clauses, hypotheses, decision structures) refers to
//! atoms by [`Var`] only, and numeric code receives probabilities through a
//! [`Weights`] snapshot taken from the registry.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::Var;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AtomKind {
    /// Independent probabilistic atom.
    Assumption { probability: f64 },
    /// Derived atom without a probability of its own.
    Proposition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub name: String,
    pub var: Var,
    pub kind: AtomKind,
}

impl Atom {
    pub fn is_assumption(&self) -> bool {
        matches!(self.kind, AtomKind::Assumption { .. })
    }

    pub fn probability(&self) -> Option<f64> {
        match self.kind {
            AtomKind::Assumption { probability } => Some(probability),
            AtomKind::Proposition => None,
        }
    }
}

/// Name-to-atom map with monotonically assigned indices.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Slot `i` holds the atom with index `i + 1`.
    atoms: Vec<Atom>,
    names: HashMap<String, Var>,
    /// Insertion order per kind, for display.
    assumptions: Vec<Var>,
    propositions: Vec<Var>,
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "true"
        && name != "false"
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that `name` is well-formed and not yet taken.
    pub fn check_name(&self, name: &str) -> Result<()> {
        if !is_valid_name(name) {
            return Err(Error::parse(0, format!("invalid atom name `{}`", name)));
        }
        if self.names.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn register(&mut self, name: &str, kind: AtomKind) -> Result<Var> {
        self.check_name(name)?;
        let var = Var::new(self.atoms.len() as u32 + 1);
        self.atoms.push(Atom {
            name: name.to_string(),
            var,
            kind,
        });
        self.names.insert(name.to_string(), var);
        match kind {
            AtomKind::Assumption { .. } => self.assumptions.push(var),
            AtomKind::Proposition => self.propositions.push(var),
        }
        Ok(var)
    }

    pub fn create_assumption(&mut self, name: &str, probability: f64) -> Result<Var> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::InvalidProbability {
                name: name.to_string(),
                value: probability,
            });
        }
        self.register(name, AtomKind::Assumption { probability })
    }

    pub fn create_proposition(&mut self, name: &str) -> Result<Var> {
        self.register(name, AtomKind::Proposition)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, var: Var) -> bool {
        var.index() <= self.atoms.len()
    }

    pub fn lookup(&self, name: &str) -> Option<Var> {
        self.names.get(name).copied()
    }

    pub fn get(&self, var: Var) -> Option<&Atom> {
        self.atoms.get(var.index() - 1)
    }

    pub fn name(&self, var: Var) -> &str {
        self.get(var).map_or("?", |atom| atom.name.as_str())
    }

    pub fn is_assumption(&self, var: Var) -> bool {
        self.get(var).is_some_and(Atom::is_assumption)
    }

    pub fn is_proposition(&self, var: Var) -> bool {
        self.get(var).is_some_and(|atom| !atom.is_assumption())
    }

    /// All atoms in canonical index order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.atoms.iter()
    }

    /// Assumptions in insertion order.
    pub fn assumptions(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.assumptions.iter().map(|&v| &self.atoms[v.index() - 1])
    }

    /// Propositions in insertion order.
    pub fn propositions(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.propositions.iter().map(|&v| &self.atoms[v.index() - 1])
    }

    pub fn num_assumptions(&self) -> usize {
        self.assumptions.len()
    }

    pub fn num_propositions(&self) -> usize {
        self.propositions.len()
    }

    /// Snapshot of the assumption probabilities, indexed by canonical index.
    pub fn weights(&self) -> Weights {
        let mut probs = vec![None; self.atoms.len() + 1];
        for atom in &self.atoms {
            probs[atom.var.index()] = atom.probability();
        }
        Weights(probs)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Per-index assumption probabilities handed to the probability computers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Weights(Vec<Option<f64>>);

impl Weights {
    /// Build weights directly from `(index, probability)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Var, f64)>) -> Self {
        let mut probs: Vec<Option<f64>> = Vec::new();
        for (var, p) in pairs {
            if probs.len() <= var.index() {
                probs.resize(var.index() + 1, None);
            }
            probs[var.index()] = Some(p);
        }
        Weights(probs)
    }

    pub fn get(&self, var: Var) -> Option<f64> {
        self.0.get(var.index()).copied().flatten()
    }

    pub fn probability(&self, var: Var) -> Result<f64> {
        self.get(var).ok_or(Error::MissingProbability(var))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_indices_are_monotonic() {
        let mut reg = Registry::new();
        let a = reg.create_assumption("a", 0.5).unwrap();
        let p = reg.create_proposition("p").unwrap();
        let b = reg.create_assumption("b", 0.1).unwrap();
        assert_eq!((a.id(), p.id(), b.id()), (1, 2, 3));
        assert_eq!(reg.lookup("p"), Some(p));
        assert_eq!(reg.name(b), "b");
        assert!(reg.is_assumption(a));
        assert!(reg.is_proposition(p));
        let names: Vec<_> = reg.assumptions().map(|atom| atom.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_duplicate_name() {
        let mut reg = Registry::new();
        reg.create_assumption("a", 0.5).unwrap();
        assert_eq!(reg.create_proposition("a"), Err(Error::DuplicateName("a".to_string())));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_invalid_probability() {
        let mut reg = Registry::new();
        assert!(matches!(
            reg.create_assumption("a", 1.5),
            Err(Error::InvalidProbability { .. })
        ));
        assert!(matches!(
            reg.create_assumption("a", f64::NAN),
            Err(Error::InvalidProbability { .. })
        ));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_invalid_name() {
        let mut reg = Registry::new();
        assert!(matches!(reg.create_proposition("a b"), Err(Error::Parse { .. })));
        assert!(matches!(reg.create_proposition("false"), Err(Error::Parse { .. })));
        assert!(matches!(reg.create_proposition(""), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_weights() {
        let mut reg = Registry::new();
        let a = reg.create_assumption("a", 0.25).unwrap();
        let p = reg.create_proposition("p").unwrap();
        let w = reg.weights();
        assert_eq!(w.get(a), Some(0.25));
        assert_eq!(w.get(p), None);
        assert_eq!(w.probability(p), Err(Error::MissingProbability(p)));
        assert_eq!(w.get(Var::new(10)), None);
    }
}
