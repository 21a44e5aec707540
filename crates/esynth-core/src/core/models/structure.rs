use crate::core::chem::elements;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single = 1,
    Double = 2,
    Triple = 3,
    Aromatic = 4,
}

impl TryFrom<u8> for BondOrder {
    type Error = StructureError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Single),
            2 => Ok(Self::Double),
            3 => Ok(Self::Triple),
            4 => Ok(Self::Aromatic),
            other => Err(StructureError::InvalidBondOrder(other)),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Aromatic => "Aromatic",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
        }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }

    /// The other endpoint, if `atom` is one of the two.
    pub fn partner_of(&self, atom: usize) -> Option<usize> {
        if self.atom1 == atom {
            Some(self.atom2)
        } else if self.atom2 == atom {
            Some(self.atom1)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureAtom {
    pub symbol: String,
    pub atomic_number: u8,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StructureError {
    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),
    #[error("Invalid bond order code {0}; expected 1, 2, 3 or 4 (aromatic)")]
    InvalidBondOrder(u8),
    #[error("Bond references atom {index}, but the structure has {len} atoms")]
    AtomOutOfRange { index: usize, len: usize },
    #[error("Atom {0} cannot be bonded to itself")]
    SelfBond(usize),
    #[error("Atoms {0} and {1} are already bonded")]
    DuplicateBond(usize, usize),
}

/// The ordered atom list and bond table of a fragment.
///
/// This is the chemistry representation handed to a
/// [`ChemistryProvider`](crate::core::chem::ChemistryProvider); the engine only ever
/// appends atoms and bonds to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Structure {
    atoms: Vec<StructureAtom>,
    bonds: Vec<Bond>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, symbol: &str) -> Result<usize, StructureError> {
        let atomic_number = elements::atomic_number(symbol)
            .ok_or_else(|| StructureError::UnknownElement(symbol.to_string()))?;
        self.atoms.push(StructureAtom {
            symbol: symbol.to_string(),
            atomic_number,
        });
        Ok(self.atoms.len() - 1)
    }

    pub fn add_bond(
        &mut self,
        atom1: usize,
        atom2: usize,
        order: BondOrder,
    ) -> Result<(), StructureError> {
        let len = self.atoms.len();
        for index in [atom1, atom2] {
            if index >= len {
                return Err(StructureError::AtomOutOfRange { index, len });
            }
        }
        if atom1 == atom2 {
            return Err(StructureError::SelfBond(atom1));
        }
        if self
            .bonds
            .iter()
            .any(|b| b.contains(atom1) && b.contains(atom2))
        {
            return Err(StructureError::DuplicateBond(atom1, atom2));
        }
        self.bonds.push(Bond::new(atom1, atom2, order));
        Ok(())
    }

    pub fn atoms(&self) -> &[StructureAtom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Neighbour lists with bond orders, indexed by atom.
    pub fn adjacency(&self) -> Vec<Vec<(usize, BondOrder)>> {
        let mut adjacency = vec![Vec::new(); self.atoms.len()];
        for bond in &self.bonds {
            adjacency[bond.atom1].push((bond.atom2, bond.order));
            adjacency[bond.atom2].push((bond.atom1, bond.order));
        }
        adjacency
    }

    /// Appends a copy of `other` and returns the index offset applied to its atoms.
    pub(crate) fn append(&mut self, other: &Structure) -> usize {
        let offset = self.atoms.len();
        self.atoms.extend(other.atoms.iter().cloned());
        self.bonds.extend(
            other
                .bonds
                .iter()
                .map(|b| Bond::new(b.atom1 + offset, b.atom2 + offset, b.order)),
        );
        offset
    }
}
