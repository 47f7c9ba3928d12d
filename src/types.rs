//! Canonical atom indices.
//!
//! Every atom registered in a knowledge base receives a [`Var`]: a 1-based,
//! monotonically assigned index shared by assumptions and propositions.
//! The same index labels the atom's nodes in the decision structure, so the
//! registration order *is* the variable order of every BDD built for a query.
use std::fmt;

/// A canonical atom index (1-indexed).
///
/// # Invariants
///
/// - Indices are `>= 1` (0 is reserved for the BDD terminals)
/// - Indices are assigned once, in registration order, and never reused
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates a new index.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Var(id)
    }

    /// Returns the raw index.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Returns the raw index as a `usize`, for slot lookups.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_creation() {
        let v1 = Var::new(1);
        let v2 = Var::new(2);
        assert_eq!(v1.id(), 1);
        assert_eq!(v2.index(), 2);
        assert!(v1 < v2);
        assert_eq!(v2.to_string(), "x2");
    }

    #[test]
    #[should_panic(expected = "Variable IDs must be >= 1")]
    fn test_var_zero_panics() {
        Var::new(0);
    }
}
