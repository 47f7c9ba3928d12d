//! Model counting over a built decision structure.

use std::collections::HashMap;

use num_bigint::BigUint;

use crate::atoms::Weights;
use crate::bdd::Bdd;
use crate::error::Result;
use crate::reference::Ref;
use crate::types::Var;

impl Bdd {
    /// Probability that `node` is true when every variable `v` is an
    /// independent Bernoulli variable with `P(v) = weights[v]`.
    ///
    /// ```text
    /// P(one) = 1, P(~f) = 1 - P(f)
    /// P(node) = p(v)·P(high) + (1 - p(v))·P(low)
    /// ```
    pub fn weighted_count(&self, node: Ref, weights: &Weights) -> Result<f64> {
        let mut cache = HashMap::new();
        self._weighted_count(node, weights, &mut cache)
    }

    fn _weighted_count(&self, node: Ref, weights: &Weights, cache: &mut HashMap<u32, f64>) -> Result<f64> {
        let i = node.index();
        let regular = if self.is_terminal(node) {
            1.0
        } else if let Some(&p) = cache.get(&i) {
            p
        } else {
            let p = weights.probability(Var::new(self.variable(i)))?;
            let low = self._weighted_count(self.low(i), weights, cache)?;
            let high = self._weighted_count(self.high(i), weights, cache)?;
            let res = p * high + (1.0 - p) * low;
            cache.insert(i, res);
            res
        };
        Ok(if node.is_negated() { 1.0 - regular } else { regular })
    }

    /// Number of satisfying assignments over variables `1..=num_vars`.
    pub fn sat_count(&self, node: Ref, num_vars: usize) -> BigUint {
        let mut cache = HashMap::new();
        let max = BigUint::from(1u32) << num_vars;
        self._sat_count(node, &max, &mut cache)
    }

    fn _sat_count(&self, node: Ref, max: &BigUint, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        } else if self.is_one(node) {
            return max.clone();
        }

        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let low = self.low(node.index());
        let high = self.high(node.index());

        let count_low = self._sat_count(low, max, cache);
        let count_high = self._sat_count(high, max, cache);

        let count: BigUint = (count_low + count_high) >> 1;
        let count = if node.is_negated() { max - count } else { count };

        cache.insert(node, count.clone());
        count
    }
}
