//! Identity tokens for decision variables.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_VARIABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity token for a decision variable.
///
/// Assigned once at construction and never recomputed. The display name
/// plays no part in identity: two variables may share a name and still be
/// distinct, and renaming concerns only printing and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct VariableId(u64);

impl VariableId {
    /// Allocate the next unused token.
    pub(crate) fn fresh() -> Self {
        Self(NEXT_VARIABLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the inner u64 value.
    pub fn inner(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::VariableId;

    #[test]
    fn fresh_ids_are_distinct() {
        let a = VariableId::fresh();
        let b = VariableId::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn fresh_ids_increase() {
        let a = VariableId::fresh();
        let b = VariableId::fresh();
        assert!(b.inner() > a.inner());
    }
}
