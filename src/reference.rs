use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// Handle to a decision-structure node: a storage index with a complement bit.
///
/// The sign carries the complement edge: `-r` denotes the negation of the
/// function `r` points to, at no cost.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Ref(i32);

impl Ref {
    /// Regular (non-complemented) reference to the node at `index`.
    pub const fn positive(index: u32) -> Self {
        assert!(index != 0 && index <= i32::MAX as u32);
        Self(index as i32)
    }

    pub const fn is_negated(self) -> bool {
        self.0 < 0
    }

    pub const fn negate(self) -> Self {
        Self(-self.0)
    }

    /// Storage index of the referenced node, ignoring the complement bit.
    pub const fn index(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// Dense non-negative encoding (`2·index + negated`), used as a hash input.
    pub const fn unsigned(self) -> u32 {
        (self.0.unsigned_abs() << 1) + self.is_negated() as u32
    }
}

impl Neg for Ref {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}",
            if self.is_negated() { "~" } else { "" },
            self.index()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref() {
        let r = Ref::positive(5);
        assert!(!r.is_negated());
        assert!((-r).is_negated());
        assert_eq!((-r).index(), 5);
        assert_eq!(-(-r), r);
        assert_eq!(r.unsigned(), 10);
        assert_eq!((-r).unsigned(), 11);
        assert_eq!((-r).to_string(), "~@5");
    }
}
