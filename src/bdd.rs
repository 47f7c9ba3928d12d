//! Reduced ordered BDD manager with complement edges and a node budget.
//!
//! Variables are canonical atom indices: a smaller index sits closer to the
//! root. All nodes are hash-consed through the unique table, so isomorphic
//! subgraphs are shared and every function has exactly one representation.
//!
//! The unique table holds at most [`BddConfig::node_budget`] decision nodes.
//! The allocation that would cross the budget fails with
//! [`Error::NodeBudgetExceeded`] and the whole construction is abandoned.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::error::{Error, Result};
use crate::expr::Literal;
use crate::node::Node;
use crate::reference::Ref;
use crate::table::Table;
use crate::utils::{pairing3, MyHash};

/// Largest node budget a [`Bdd`] can address: node indices live in the 31 bits of a [`Ref`].
pub const MAX_NODE_BUDGET: usize = i32::MAX as usize - 1;

/// Sizing of a [`Bdd`] manager.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BddConfig {
    node_budget: usize,
    cache_bits: usize,
}

impl Default for BddConfig {
    fn default() -> Self {
        Self {
            node_budget: 1 << 20,
            cache_bits: 16,
        }
    }
}

impl BddConfig {
    /// Maximum number of decision nodes (terminal excluded), saturating at [`MAX_NODE_BUDGET`].
    pub fn with_node_budget(mut self, node_budget: usize) -> Self {
        self.node_budget = node_budget.min(MAX_NODE_BUDGET);
        self
    }

    /// Computed table of `2^bits` entries; also sizes the unique table buckets.
    pub fn with_cache_bits(mut self, cache_bits: usize) -> Self {
        assert!(cache_bits <= 31, "Cache bits should be in the range 0..=31");
        self.cache_bits = cache_bits;
        self
    }

    pub fn node_budget(&self) -> usize {
        self.node_budget
    }

    pub fn cache_bits(&self) -> usize {
        self.cache_bits
    }
}

type Storage = Table<Node>;

impl Storage {
    pub fn variable(&self, index: usize) -> u32 {
        self.value(index).variable
    }
    pub fn low(&self, index: usize) -> Ref {
        self.value(index).low
    }
    pub fn high(&self, index: usize) -> Ref {
        self.value(index).high
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum OpKey {
    Ite(Ref, Ref, Ref),
}

impl MyHash for OpKey {
    fn hash(&self) -> u64 {
        match self {
            OpKey::Ite(f, g, h) => pairing3(
                f.unsigned() as u64,
                g.unsigned() as u64,
                h.unsigned() as u64,
            ),
        }
    }
}

pub struct Bdd {
    storage: RefCell<Storage>,
    cache: RefCell<Cache<OpKey, Ref>>,
    node_budget: usize,
    pub zero: Ref,
    pub one: Ref,
}

impl Bdd {
    pub fn new(config: BddConfig) -> Self {
        // One extra slot for the terminal.
        let mut storage = Storage::new(config.node_budget + 1, config.cache_bits.min(20));

        let one = storage.add(Node::default()).expect("room for the terminal");
        assert_eq!(one, 1); // Make sure the terminal node is (1).
        let one = Ref::positive(one as u32);
        let zero = -one;

        Self {
            storage: RefCell::new(storage),
            cache: RefCell::new(Cache::new(config.cache_bits)),
            node_budget: config.node_budget,
            zero,
            one,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(BddConfig::default())
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bdd")
            .field("budget", &self.node_budget)
            .field("nodes", &self.num_nodes())
            .finish()
    }
}

impl Bdd {
    pub fn variable(&self, index: u32) -> u32 {
        self.storage.borrow().variable(index as usize)
    }
    pub fn low(&self, index: u32) -> Ref {
        self.storage.borrow().low(index as usize)
    }
    pub fn high(&self, index: u32) -> Ref {
        self.storage.borrow().high(index as usize)
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.low(node.index());
        if node.is_negated() {
            -low
        } else {
            low
        }
    }
    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.high(node.index());
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        self.is_zero(node) || self.is_one(node)
    }

    /// Number of decision nodes allocated so far.
    pub fn num_nodes(&self) -> usize {
        self.storage.borrow().len() - 1
    }

    pub fn node_budget(&self) -> usize {
        self.node_budget
    }

    /// `(hits, misses)` of the computed table.
    pub fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.borrow();
        (cache.hits(), cache.misses())
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Result<Ref> {
        assert_ne!(v, 0, "Variable index should not be zero");

        // Handle canonicity
        if high.is_negated() {
            return Ok(-self.mk_node(v, -low, -high)?);
        }

        // Handle duplicates
        if low == high {
            return Ok(low);
        }

        let node = Node {
            variable: v,
            low,
            high,
        };
        match self.storage.borrow_mut().put(node) {
            Some(i) => Ok(Ref::positive(i as u32)),
            None => {
                debug!("mk(v = {}): node budget of {} exhausted", v, self.node_budget);
                Err(Error::NodeBudgetExceeded {
                    budget: self.node_budget,
                })
            }
        }
    }

    pub fn mk_var(&self, v: u32) -> Result<Ref> {
        self.mk_node(v, self.zero, self.one)
    }

    /// Conjunction of literals, built bottom-up without ITE calls.
    ///
    /// A contradictory set of literals yields `zero`.
    pub fn cube(&self, literals: impl IntoIterator<Item = Literal>) -> Result<Ref> {
        let mut literals = literals.into_iter().collect::<Vec<_>>();
        literals.sort();
        literals.dedup();
        if literals.windows(2).any(|w| w[0].var() == w[1].var()) {
            return Ok(self.zero);
        }
        let mut current = self.one;
        for lit in literals.into_iter().rev() {
            let v = lit.var().id();
            current = if lit.is_negated() {
                self.mk_node(v, current, self.zero)?
            } else {
                self.mk_node(v, self.zero, current)?
            };
        }
        Ok(current)
    }

    pub fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        assert_ne!(v, 0, "Variable index should not be zero");

        let i = node.index();
        if self.is_terminal(node) || v < self.variable(i) {
            return (node, node);
        }
        assert_eq!(v, self.variable(i));
        (self.low_node(node), self.high_node(node))
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(x, y, z) = (x ∧ y) ∨ (¬x ∧ z)
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Result<Ref> {
        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if self.is_one(f) {
            return Ok(g);
        }
        if self.is_zero(f) {
            return Ok(h);
        }

        // More base cases:
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        if g == h {
            return Ok(g);
        }
        if self.is_one(g) && self.is_zero(h) {
            return Ok(f);
        }
        if self.is_zero(g) && self.is_one(h) {
            return Ok(-f);
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,~F) => ite(F,G,1)
        if g == f {
            return self.apply_ite(f, self.one, h);
        }
        if h == f {
            return self.apply_ite(f, g, self.zero);
        }
        if g == -f {
            return self.apply_ite(f, self.zero, h);
        }
        if h == -f {
            return self.apply_ite(f, g, self.one);
        }

        // ite(~F,G,H) => ite(F,H,G)
        let (mut f, mut g, mut h) = (f, g, h);
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }

        // ite(F,~G,H) => ~ite(F,G,~H)
        let mut n = false;
        if g.is_negated() {
            n = true;
            g = -g;
            h = -h;
        }

        let key = OpKey::Ite(f, g, h);
        let cached = self.cache.borrow().get(&key).copied();
        if let Some(res) = cached {
            return Ok(if n { -res } else { res });
        }

        // Determine the top variable:
        let m = [f, g, h]
            .into_iter()
            .filter(|&r| !self.is_terminal(r))
            .map(|r| self.variable(r.index()))
            .min()
            .expect("f is not a terminal");

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0)?;
        let t = self.apply_ite(f1, g1, h1)?;

        let res = self.mk_node(m, e, t)?;
        self.cache.borrow_mut().insert(key, res);

        Ok(if n { -res } else { res })
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Result<Ref> {
        self.apply_ite(u, v, self.zero)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Result<Ref> {
        self.apply_ite(u, self.one, v)
    }

    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Result<Ref> {
        let mut res = self.zero;
        for node in nodes {
            res = self.apply_or(res, node)?;
        }
        Ok(res)
    }

    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<u32> {
        let mut visited = HashSet::new();
        visited.insert(self.one.index());
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            let i = node.index();
            if visited.insert(i) {
                queue.push_back(self.low(i));
                queue.push_back(self.high(i));
            }
        }

        visited
    }

    /// Number of nodes reachable from `f`, the terminal included.
    pub fn size(&self, f: Ref) -> usize {
        self.descendants([f]).len()
    }

    pub fn to_bracket_string(&self, node: Ref) -> String {
        if self.is_zero(node) {
            return "(0)".to_string();
        } else if self.is_one(node) {
            return "(1)".to_string();
        }

        let v = self.variable(node.index());
        let low = self.low_node(node);
        let high = self.high_node(node);

        format!(
            "{}:(x{}, {}, {})",
            node,
            v,
            self.to_bracket_string(high),
            self.to_bracket_string(low)
        )
    }
}
