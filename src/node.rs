use crate::reference::Ref;
use crate::utils::{pairing3, MyHash};

/// A decision node: branch on `variable`, follow `high` when it is true.
///
/// `variable` is the canonical atom index; `0` marks the terminal.
/// The `high` edge of a stored node is never complemented.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Default for Node {
    fn default() -> Self {
        // Self-loop on the first real slot; only the terminal uses this.
        Self {
            variable: 0,
            low: Ref::positive(1),
            high: Ref::positive(1),
        }
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing3(
            self.variable as u64,
            self.low.unsigned() as u64,
            self.high.unsigned() as u64,
        )
    }
}
