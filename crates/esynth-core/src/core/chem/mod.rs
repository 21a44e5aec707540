//! Chemistry services consumed by the assembly engine.
//!
//! The engine never inspects atoms or rings itself. Everything it needs from a
//! molecule (an identity for deduplication and a fingerprint for scoring) comes
//! through [`ChemistryProvider`], so a different toolkit can be plugged in without
//! touching the enumeration code. [`GraphChemistry`] is the in-crate provider that
//! works directly on the [`Structure`] graph.

pub(crate) mod canonical;
pub mod elements;
pub mod fingerprint;

use crate::core::models::structure::Structure;
use fingerprint::{DEFAULT_RADIUS, Fingerprint};
use std::fmt;
use thiserror::Error;

/// Stable identity of an assembled molecule.
///
/// Two structures that differ only in atom numbering share an index, which is what
/// makes deduplication independent of enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuralIndex(pub(crate) u64);

impl StructuralIndex {
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StructuralIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ChemistryError {
    #[error("Cannot derive chemistry for an empty structure")]
    EmptyStructure,
    #[error("Chemistry provider failed: {0}")]
    Provider(String),
}

pub trait ChemistryProvider: Sync {
    fn structural_index(&self, structure: &Structure) -> Result<StructuralIndex, ChemistryError>;

    fn fingerprint(&self, structure: &Structure) -> Result<Fingerprint, ChemistryError>;
}

/// Graph-refinement provider: Morgan-style structural index and radius-2
/// circular fingerprints.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphChemistry;

impl ChemistryProvider for GraphChemistry {
    fn structural_index(&self, structure: &Structure) -> Result<StructuralIndex, ChemistryError> {
        if structure.is_empty() {
            return Err(ChemistryError::EmptyStructure);
        }
        Ok(canonical::structural_index(structure))
    }

    fn fingerprint(&self, structure: &Structure) -> Result<Fingerprint, ChemistryError> {
        if structure.is_empty() {
            return Err(ChemistryError::EmptyStructure);
        }
        Ok(fingerprint::circular(structure, DEFAULT_RADIUS))
    }
}
