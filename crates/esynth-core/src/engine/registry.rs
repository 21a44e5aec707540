use crate::core::chem::StructuralIndex;
use std::collections::HashSet;

/// Structural indices of every fragment produced so far in one enumeration.
///
/// The registry is only touched from the sequential merge step, so insertion
/// order (and therefore which of two equivalent complexes survives) is fixed by
/// frontier order rather than by thread scheduling.
#[derive(Debug, Default)]
pub(crate) struct ComplexRegistry {
    seen: HashSet<StructuralIndex>,
}

impl ComplexRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the index was not yet registered.
    pub(crate) fn register(&mut self, index: StructuralIndex) -> bool {
        self.seen.insert(index)
    }
}
