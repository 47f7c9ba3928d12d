//! The knowledge base: an append-only CNF over registered atoms.
//!
//! Clauses are contributed as Horn rules `a1 ∧ … ∧ an → h`, stored as the
//! clause `¬a1 ∨ … ∨ ¬an ∨ h`. A rule whose head is `false` is an integrity
//! constraint and stores as `¬a1 ∨ … ∨ ¬an`.
//!
//! Every mutating call either succeeds completely or leaves the knowledge
//! base untouched.

use std::cell::RefCell;
use std::collections::HashSet;

use log::debug;

use crate::atoms::Registry;
use crate::error::{Error, Result};
use crate::expr::{Form, Literal, Sentence, Term};
use crate::parser::{parse_horn, parse_sentence, Element, ParsedLiteral};
use crate::types::Var;

#[derive(Debug, Clone)]
pub struct Kb {
    registry: Registry,
    clauses: Sentence,
    /// Eliminated CNF of the knowledge base alone, shared by every query.
    /// Cleared on each mutation.
    contradiction: RefCell<Option<Sentence>>,
}

impl Default for Kb {
    fn default() -> Self {
        Self::new()
    }
}

impl Kb {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            clauses: Sentence::new(Form::Cnf),
            contradiction: RefCell::new(None),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The knowledge base as one CNF.
    pub fn clauses(&self) -> &Sentence {
        &self.clauses
    }

    fn invalidate(&self) {
        self.contradiction.borrow_mut().take();
    }

    pub(crate) fn cached_contradiction(&self) -> Option<Sentence> {
        self.contradiction.borrow().clone()
    }

    pub(crate) fn cache_contradiction(&self, cnf: Sentence) {
        *self.contradiction.borrow_mut() = Some(cnf);
    }

    pub fn create_assumption(&mut self, name: &str, probability: f64) -> Result<Var> {
        let var = self.registry.create_assumption(name, probability)?;
        debug!("assumption {} = {} (p = {})", var, name, probability);
        self.invalidate();
        Ok(var)
    }

    pub fn create_proposition(&mut self, name: &str) -> Result<Var> {
        let var = self.registry.create_proposition(name)?;
        debug!("proposition {} = {}", var, name);
        self.invalidate();
        Ok(var)
    }

    /// Create several propositions in order. On error none of them is created.
    pub fn create_propositions<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Vec<Var>> {
        let mut seen = HashSet::new();
        for name in names.iter().map(AsRef::as_ref) {
            self.registry.check_name(name)?;
            if !seen.insert(name) {
                return Err(Error::DuplicateName(name.to_string()));
            }
        }
        names.iter().map(|name| self.create_proposition(name.as_ref())).collect()
    }

    fn check_known(&self, lit: Literal, context: &dyn Fn() -> String) -> Result<()> {
        if self.registry.contains(lit.var()) {
            Ok(())
        } else {
            Err(Error::MalformedClause(format!(
                "{} references unknown atom {}",
                context(),
                lit.var()
            )))
        }
    }

    /// Add the rule `body → head`; `head = None` adds the integrity constraint `body → false`.
    pub fn add_horn_clause(&mut self, body: &[Literal], head: Option<Literal>) -> Result<()> {
        let describe = || {
            let body: Vec<String> = body.iter().map(|l| l.to_string()).collect();
            let head = head.map_or("false".to_string(), |h| h.to_string());
            format!("`{} -> {}`", body.join(" "), head)
        };
        for &lit in body.iter().chain(head.iter()) {
            self.check_known(lit, &describe)?;
        }

        let clause: Term = body.iter().map(|&l| -l).chain(head).collect();
        self.add_clause(clause)
    }

    /// Add an arbitrary clause. Tautological clauses are accepted and ignored.
    pub fn add_clause(&mut self, clause: Term) -> Result<()> {
        for lit in clause.iter() {
            self.check_known(lit, &|| format!("clause {}", Sentence::cnf([clause.clone()])))?;
        }
        if clause.is_contradictory() {
            debug!("ignoring tautological clause {}", Sentence::cnf([clause]));
            return Ok(());
        }
        debug!("add clause {}", Sentence::cnf([clause.clone()]));
        self.clauses.insert(clause);
        self.invalidate();
        Ok(())
    }

    /// Parse and add a Horn clause such as `a, b -> h` or `(a b) -> false`.
    pub fn add_horn_text(&mut self, text: &str) -> Result<()> {
        let horn = parse_horn(text)?;
        let resolve = |lit: &ParsedLiteral| {
            self.resolve(lit)
                .map_err(|_| Error::parse(lit.position, format!("unknown atom `{}`", lit.name)))
        };
        let body = horn.body.iter().map(resolve).collect::<Result<Vec<_>>>()?;
        let head = horn.head.as_ref().map(resolve).transpose()?;
        self.add_horn_clause(&body, head)
    }

    /// Drop every atom and clause.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.clauses = Sentence::new(Form::Cnf);
        self.invalidate();
    }

    fn resolve(&self, lit: &ParsedLiteral) -> Result<Literal> {
        match self.registry.lookup(&lit.name) {
            Some(var) => Ok(Literal::new(var, lit.positive)),
            None => Err(Error::UnknownAtom(lit.name.clone())),
        }
    }

    fn construct(&self, text: &str, form: Form) -> Result<Sentence> {
        let mut res = Sentence::new(form);
        for element in parse_sentence(text)? {
            match element {
                Element::Group(lits) => {
                    let term = lits.iter().map(|l| self.resolve(l)).collect::<Result<Term>>()?;
                    res.insert(term);
                }
                // `true` in a DNF and `false` in a CNF are the empty element;
                // the other two are the identity and add nothing.
                Element::Constant(value) => {
                    if value == (form == Form::Dnf) {
                        res.insert(Term::new());
                    }
                }
            }
        }
        Ok(res)
    }

    /// Parse text as a CNF: each element is a clause.
    pub fn construct_cnf(&self, text: &str) -> Result<Sentence> {
        self.construct(text, Form::Cnf)
    }

    /// Parse text as a DNF: each element is a term.
    pub fn construct_dnf(&self, text: &str) -> Result<Sentence> {
        self.construct(text, Form::Dnf)
    }

    /// Check that every atom of `sentence` is registered.
    pub fn check_sentence(&self, sentence: &Sentence) -> Result<()> {
        match sentence.vars().into_iter().find(|&v| !self.registry.contains(v)) {
            Some(v) => Err(Error::UnknownAtom(v.to_string())),
            None => Ok(()),
        }
    }

    /// Render a sentence with atom names, in the parseable text grammar.
    pub fn render(&self, sentence: &Sentence) -> String {
        sentence.render_with(|v| self.registry.name(v).to_string())
    }
}
