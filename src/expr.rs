//! Two-level propositional sentences over literals.
//!
//! A [`Sentence`] is either a DNF (a disjunction of conjunctive [`Term`]s) or a
//! CNF (a conjunction of disjunctive clauses, also stored as [`Term`]s). The
//! element type is the same for both shapes: only the enclosing [`Form`]
//! decides whether an element's literals are AND-ed or OR-ed.
//!
//! # Constants
//!
//! | Form | no elements | only the empty element |
//! |------|-------------|------------------------|
//! | DNF  | false       | true                   |
//! | CNF  | true        | false                  |
//!
//! # Dual identity
//!
//! An element holding both `l` and `~l` is the dual identity of its operator:
//! a contradictory term is false, a tautological clause is true. Such elements
//! are tolerated everywhere and dropped by [`Sentence::update`].
//!
//! Sentences are plain values: `clone()` produces an independent copy, which
//! is the only way to branch an exploration without aliasing.

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::ops::Neg;

use crate::types::Var;

/// An atom index together with a polarity.
///
/// Literals order by index first, positive before negative, so the literals of
/// a [`Term`] always iterate in canonical variable order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Literal {
    var: Var,
    negated: bool,
}

impl Literal {
    pub fn new(var: Var, positive: bool) -> Self {
        Self {
            var,
            negated: !positive,
        }
    }

    pub fn pos(var: Var) -> Self {
        Self::new(var, true)
    }

    pub fn neg(var: Var) -> Self {
        Self::new(var, false)
    }

    pub fn var(self) -> Var {
        self.var
    }

    pub fn is_positive(self) -> bool {
        !self.negated
    }

    pub fn is_negated(self) -> bool {
        self.negated
    }

    pub fn negate(self) -> Self {
        Self {
            var: self.var,
            negated: !self.negated,
        }
    }

    /// Probability of this literal given the probability `p` of its atom.
    pub fn weight(self, p: f64) -> f64 {
        if self.negated {
            1.0 - p
        } else {
            p
        }
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", if self.negated { "~" } else { "" }, self.var)
    }
}

/// A duplicate-free set of literals: a conjunction inside a DNF, a disjunction
/// inside a CNF.
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Term(BTreeSet<Literal>);

impl Term {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unit(lit: Literal) -> Self {
        Self(BTreeSet::from([lit]))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Literal> + '_ {
        self.0.iter().copied()
    }

    pub fn vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.0.iter().map(|lit| lit.var())
    }

    pub fn contains(&self, lit: Literal) -> bool {
        self.0.contains(&lit)
    }

    /// Returns `true` if the literal was not already present.
    pub fn insert(&mut self, lit: Literal) -> bool {
        self.0.insert(lit)
    }

    pub fn remove(&mut self, lit: Literal) -> bool {
        self.0.remove(&lit)
    }

    /// Check whether the term holds some literal together with its negation.
    pub fn is_contradictory(&self) -> bool {
        // `x` and `~x` are adjacent in canonical order.
        self.0
            .iter()
            .zip(self.0.iter().skip(1))
            .any(|(a, b)| a.var() == b.var())
    }

    /// Check whether some literal of `self` appears negated in `other`.
    pub fn conflicts_with(&self, other: &Term) -> bool {
        self.iter().any(|lit| other.contains(-lit))
    }

    /// `self ⊆ other`: as a term `self` is implied by `other`, as a clause it implies `other`.
    pub fn subsumes(&self, other: &Term) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn union(&self, other: &Term) -> Term {
        Term(self.0.union(&other.0).copied().collect())
    }

    /// Negate every literal (turns a clause into the term of its negation and back).
    pub fn negated(&self) -> Term {
        self.iter().map(Literal::negate).collect()
    }

    /// Product of the literal weights, `0` for a contradictory term.
    pub fn weight(&self, mut probability: impl FnMut(Var) -> f64) -> f64 {
        if self.is_contradictory() {
            return 0.0;
        }
        self.iter().map(|lit| lit.weight(probability(lit.var()))).product()
    }
}

impl FromIterator<Literal> for Term {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Term(iter.into_iter().collect())
    }
}

impl Extend<Literal> for Term {
    fn extend<I: IntoIterator<Item = Literal>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl<const N: usize> From<[Literal; N]> for Term {
    fn from(lits: [Literal; N]) -> Self {
        lits.into_iter().collect()
    }
}

/// The outer shape of a [`Sentence`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Form {
    /// Disjunction of conjunctive terms.
    Dnf,
    /// Conjunction of disjunctive clauses.
    Cnf,
}

impl Form {
    pub fn dual(self) -> Self {
        match self {
            Form::Dnf => Form::Cnf,
            Form::Cnf => Form::Dnf,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Sentence {
    form: Form,
    elements: BTreeSet<Term>,
}

impl Sentence {
    /// Empty sentence: the identity of its outer operator.
    pub fn new(form: Form) -> Self {
        Self {
            form,
            elements: BTreeSet::new(),
        }
    }

    pub fn dnf(terms: impl IntoIterator<Item = Term>) -> Self {
        Self {
            form: Form::Dnf,
            elements: terms.into_iter().collect(),
        }
    }

    pub fn cnf(clauses: impl IntoIterator<Item = Term>) -> Self {
        Self {
            form: Form::Cnf,
            elements: clauses.into_iter().collect(),
        }
    }

    /// The constant `value` in the given form.
    pub fn constant(form: Form, value: bool) -> Self {
        let mut res = Self::new(form);
        let identity = form == Form::Cnf;
        if value != identity {
            res.elements.insert(Term::new());
        }
        res
    }

    pub fn form(&self) -> Form {
        self.form
    }

    pub fn iter(&self) -> impl Iterator<Item = &Term> + '_ {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, element: &Term) -> bool {
        self.elements.contains(element)
    }

    pub fn insert(&mut self, element: Term) -> bool {
        self.elements.insert(element)
    }

    pub fn is_false(&self) -> bool {
        match self.form {
            Form::Dnf => self.elements.is_empty(),
            Form::Cnf => self.elements.iter().any(Term::is_empty),
        }
    }

    pub fn is_true(&self) -> bool {
        match self.form {
            Form::Dnf => self.elements.iter().any(Term::is_empty),
            Form::Cnf => self.elements.is_empty(),
        }
    }

    /// All atoms mentioned, in canonical order.
    pub fn vars(&self) -> BTreeSet<Var> {
        self.elements.iter().flat_map(|t| t.vars()).collect()
    }

    /// Conjoin a literal: a DNF AND-extends every term, a CNF gains the unit clause.
    pub fn add_literal(&mut self, lit: Literal) {
        match self.form {
            Form::Dnf => {
                let terms = std::mem::take(&mut self.elements);
                self.elements = terms
                    .into_iter()
                    .map(|mut t| {
                        t.insert(lit);
                        t
                    })
                    .collect();
            }
            Form::Cnf => {
                self.elements.insert(Term::unit(lit));
            }
        }
    }

    /// Simplify in place: drop dual-identity elements, collapse to the constant
    /// when the empty element is present, and remove subsumed elements.
    pub fn update(&mut self) {
        self.elements.retain(|t| !t.is_contradictory());
        if self.elements.contains(&Term::new()) {
            self.elements = BTreeSet::from([Term::new()]);
            return;
        }
        self.absorb();
    }

    /// Remove every element that is a strict superset of another one.
    ///
    /// Sound for both forms: `a ∨ (a ∧ b) = a` and `a ∧ (a ∨ b) = a`.
    pub fn absorb(&mut self) {
        let mut sorted: Vec<Term> = std::mem::take(&mut self.elements).into_iter().collect();
        sorted.sort_by_key(Term::len);
        let mut kept: Vec<Term> = Vec::with_capacity(sorted.len());
        for t in sorted {
            if !kept.iter().any(|k| k.subsumes(&t)) {
                kept.push(t);
            }
        }
        self.elements = kept.into_iter().collect();
    }

    /// Simplify under the partial assignment `fixed` (a set of literals known true).
    ///
    /// The fixed atoms disappear from the result; all other atoms stay free.
    pub fn condition(&self, fixed: &Term) -> Sentence {
        let mut res = Sentence::new(self.form);
        for element in &self.elements {
            let decided = match self.form {
                // A term containing a falsified literal is false.
                Form::Dnf => element.conflicts_with(fixed),
                // A clause containing a satisfied literal is true.
                Form::Cnf => element.iter().any(|lit| fixed.contains(lit)),
            };
            if decided {
                continue;
            }
            res.elements.insert(
                element
                    .iter()
                    .filter(|&lit| !fixed.contains(lit) && !fixed.contains(-lit))
                    .collect(),
            );
        }
        res.update();
        res
    }

    /// De Morgan: the negation of a DNF is the CNF of negated terms, and vice versa.
    pub fn negate(&self) -> Sentence {
        Sentence {
            form: self.form.dual(),
            elements: self.elements.iter().map(Term::negated).collect(),
        }
    }

    /// Convert to DNF by distribution. Worst-case exponential.
    pub fn to_dnf(&self) -> Sentence {
        match self.form {
            Form::Dnf => self.clone(),
            Form::Cnf => {
                let mut acc = Sentence::constant(Form::Dnf, true);
                for clause in &self.elements {
                    acc = acc.and_dnf(&Sentence::dnf(clause.iter().map(Term::unit)));
                    if acc.is_false() {
                        break;
                    }
                }
                acc
            }
        }
    }

    /// Convert to CNF by distribution. Worst-case exponential.
    pub fn to_cnf(&self) -> Sentence {
        match self.form {
            Form::Cnf => self.clone(),
            Form::Dnf => self.negate().to_dnf().negate(),
        }
    }

    /// Conjunction of two DNFs, distributed back into a DNF.
    pub fn and_dnf(&self, other: &Sentence) -> Sentence {
        assert_eq!(self.form, Form::Dnf, "and_dnf expects DNF operands");
        assert_eq!(other.form, Form::Dnf, "and_dnf expects DNF operands");
        let mut res = Sentence::new(Form::Dnf);
        for a in &self.elements {
            for b in &other.elements {
                if !a.conflicts_with(b) {
                    res.elements.insert(a.union(b));
                }
            }
        }
        res.update();
        res
    }

    /// Render with the given atom names, in the parseable text grammar.
    pub fn render_with<F>(&self, mut name: F) -> String
    where
        F: FnMut(Var) -> String,
    {
        if self.elements.is_empty() {
            return match self.form {
                Form::Dnf => "false".to_string(),
                Form::Cnf => "true".to_string(),
            };
        }
        let separator = match self.form {
            Form::Dnf => " + ",
            Form::Cnf => " ",
        };
        self.elements
            .iter()
            .map(|t| {
                let lits: Vec<String> = t
                    .iter()
                    .map(|lit| format!("{}{}", if lit.is_negated() { "~" } else { "" }, name(lit.var())))
                    .collect();
                format!("({})", lits.join(" "))
            })
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl Display for Sentence {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_with(|v| v.to_string()))
    }
}
