use super::connection::{ConnectableAtom, SiteKind};
use super::ids::ConnectionId;
use super::structure::Structure;
use crate::core::chem::{ChemistryError, ChemistryProvider, StructuralIndex};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentKind {
    Brick,
    Linker,
    /// An assembled molecule. `parts` lists the template names it was built from,
    /// in join order.
    Complex { parts: Vec<String> },
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::Brick => write!(f, "Brick"),
            FragmentKind::Linker => write!(f, "Linker"),
            FragmentKind::Complex { .. } => write!(f, "Complex"),
        }
    }
}

/// A committed bond between two connection sites of a complex.
///
/// Sites are atom indices into the complex's [`Structure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub id: ConnectionId,
    pub from_site: usize,
    pub to_site: usize,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FragmentError {
    #[error("Connection site {site} is out of range for a structure with {atom_count} atoms")]
    SiteOutOfRange { site: usize, atom_count: usize },
    #[error("Atom {0} is declared as a connection site more than once")]
    DuplicateSite(usize),
    #[error("Connection site {site} accepts no atom types")]
    EmptyAllowList { site: usize },
    #[error("Connection site {site} is reactive but has a capacity of zero")]
    ZeroCapacity { site: usize },
    #[error("Chemistry failure: {0}")]
    Chemistry(#[from] ChemistryError),
}

/// A Brick, a Linker or an assembled Complex.
///
/// Equality and hashing go through the structural index only: two fragments are
/// the same molecule when their indices match, regardless of name or how they
/// were assembled.
#[derive(Debug, Clone)]
pub struct Fragment {
    name: String,
    kind: FragmentKind,
    index: StructuralIndex,
    structure: Structure,
    atoms: Vec<ConnectableAtom>,
    connections: Vec<Connection>,
}

impl Fragment {
    pub fn brick(
        name: impl Into<String>,
        structure: Structure,
        atoms: Vec<ConnectableAtom>,
        chemistry: &dyn ChemistryProvider,
    ) -> Result<Self, FragmentError> {
        Self::template(name.into(), FragmentKind::Brick, structure, atoms, chemistry)
    }

    /// Builds a linker template. Every connection point is marked as a linker
    /// atom, which changes how partners match against it.
    pub fn linker(
        name: impl Into<String>,
        structure: Structure,
        atoms: Vec<ConnectableAtom>,
        chemistry: &dyn ChemistryProvider,
    ) -> Result<Self, FragmentError> {
        let atoms = atoms.into_iter().map(|a| a.into_linker_atom()).collect();
        Self::template(name.into(), FragmentKind::Linker, structure, atoms, chemistry)
    }

    fn template(
        name: String,
        kind: FragmentKind,
        structure: Structure,
        atoms: Vec<ConnectableAtom>,
        chemistry: &dyn ChemistryProvider,
    ) -> Result<Self, FragmentError> {
        validate_sites(&structure, &atoms)?;
        let index = chemistry.structural_index(&structure)?;
        Ok(Self {
            name,
            kind,
            index,
            structure,
            atoms,
            connections: Vec::new(),
        })
    }

    pub(crate) fn complex(
        name: String,
        parts: Vec<String>,
        index: StructuralIndex,
        structure: Structure,
        atoms: Vec<ConnectableAtom>,
        connections: Vec<Connection>,
    ) -> Self {
        Self {
            name,
            kind: FragmentKind::Complex { parts },
            index,
            structure,
            atoms,
            connections,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FragmentKind {
        &self.kind
    }

    pub fn is_brick(&self) -> bool {
        matches!(self.kind, FragmentKind::Brick)
    }

    pub fn is_linker(&self) -> bool {
        matches!(self.kind, FragmentKind::Linker)
    }

    pub fn is_complex(&self) -> bool {
        matches!(self.kind, FragmentKind::Complex { .. })
    }

    pub fn index(&self) -> StructuralIndex {
        self.index
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn atoms(&self) -> &[ConnectableAtom] {
        &self.atoms
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Template names this fragment was built from. A template lists itself.
    pub fn parts(&self) -> Vec<&str> {
        match &self.kind {
            FragmentKind::Complex { parts } => parts.iter().map(String::as_str).collect(),
            _ => vec![self.name.as_str()],
        }
    }

    /// Number of joins that produced this fragment; zero for templates.
    pub fn depth(&self) -> usize {
        self.connections.len()
    }

    /// Connection points that can still take a bond, with their position in
    /// [`atoms`](Self::atoms). Every call starts a fresh pass.
    pub fn open_connection_points(&self) -> impl Iterator<Item = (usize, &ConnectableAtom)> + '_ {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| atom.has_capacity())
    }

    pub fn open_valence(&self) -> usize {
        self.open_connection_points().count()
    }

    pub fn has_open_valence(&self) -> bool {
        self.open_connection_points().next().is_some()
    }
}

fn validate_sites(structure: &Structure, atoms: &[ConnectableAtom]) -> Result<(), FragmentError> {
    let atom_count = structure.atom_count();
    let mut seen = HashSet::with_capacity(atoms.len());
    for atom in atoms {
        let site = atom.site();
        if site >= atom_count {
            return Err(FragmentError::SiteOutOfRange { site, atom_count });
        }
        if !seen.insert(site) {
            return Err(FragmentError::DuplicateSite(site));
        }
        if atom.kind() == SiteKind::Standard && atom.allowable_types().is_empty() {
            return Err(FragmentError::EmptyAllowList { site });
        }
        if !atom.is_simple() && atom.max_connect() == 0 {
            return Err(FragmentError::ZeroCapacity { site });
        }
    }
    Ok(())
}

impl PartialEq for Fragment {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Fragment {}

impl Hash for Fragment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' ({} atoms, open valence {})",
            self.kind,
            self.name,
            self.structure.atom_count(),
            self.open_valence()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chem::GraphChemistry;
    use crate::core::models::structure::BondOrder;

    fn ethyl() -> Structure {
        let mut s = Structure::new();
        s.add_atom("C").unwrap();
        s.add_atom("C").unwrap();
        s.add_bond(0, 1, BondOrder::Single).unwrap();
        s
    }

    #[test]
    fn brick_and_linker_roles_are_exclusive() {
        let brick = Fragment::brick(
            "ethyl",
            ethyl(),
            vec![ConnectableAtom::new("X", 0, ["Y"])],
            &GraphChemistry,
        )
        .unwrap();
        let linker = Fragment::linker(
            "bridge",
            ethyl(),
            vec![ConnectableAtom::new("Y", 1, ["X"])],
            &GraphChemistry,
        )
        .unwrap();

        assert!(brick.is_brick() && !brick.is_linker() && !brick.is_complex());
        assert!(linker.is_linker() && !linker.is_brick() && !linker.is_complex());
        assert!(!brick.atoms()[0].is_linker_atom());
        assert!(linker.atoms()[0].is_linker_atom());
        assert_eq!(brick.depth(), 0);
        assert_eq!(brick.parts(), vec!["ethyl"]);
    }

    #[test]
    fn equality_follows_structural_index_not_name() {
        let a = Fragment::brick("a", ethyl(), vec![], &GraphChemistry).unwrap();
        let b = Fragment::linker("b", ethyl(), vec![], &GraphChemistry).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn open_connection_points_skip_full_and_simple_atoms() {
        let mut s = ethyl();
        s.add_atom("O").unwrap();
        s.add_bond(1, 2, BondOrder::Single).unwrap();
        let mut fragment = Fragment::brick(
            "ethanol",
            s,
            vec![
                ConnectableAtom::new("X", 0, ["Y"]),
                ConnectableAtom::new("X", 1, ["Y"]).with_kind(SiteKind::Simple),
                ConnectableAtom::new("O", 2, ["Y"]),
            ],
            &GraphChemistry,
        )
        .unwrap();

        assert_eq!(fragment.open_valence(), 2);
        fragment.atoms[0].record_connection(ConnectionId(0));

        let open: Vec<usize> = fragment.open_connection_points().map(|(i, _)| i).collect();
        assert_eq!(open, vec![2]);
        // Restartable: a second pass yields the same points.
        assert_eq!(fragment.open_connection_points().count(), 1);
        assert!(fragment.has_open_valence());
    }

    #[test]
    fn templates_reject_bad_sites() {
        let out_of_range = Fragment::brick(
            "bad",
            ethyl(),
            vec![ConnectableAtom::new("X", 5, ["Y"])],
            &GraphChemistry,
        );
        assert_eq!(
            out_of_range.unwrap_err(),
            FragmentError::SiteOutOfRange {
                site: 5,
                atom_count: 2
            }
        );

        let duplicate = Fragment::brick(
            "bad",
            ethyl(),
            vec![
                ConnectableAtom::new("X", 0, ["Y"]),
                ConnectableAtom::new("Z", 0, ["Y"]),
            ],
            &GraphChemistry,
        );
        assert_eq!(duplicate.unwrap_err(), FragmentError::DuplicateSite(0));

        let no_allow = Fragment::brick(
            "bad",
            ethyl(),
            vec![ConnectableAtom::new("X", 0, Vec::<&str>::new())],
            &GraphChemistry,
        );
        assert_eq!(
            no_allow.unwrap_err(),
            FragmentError::EmptyAllowList { site: 0 }
        );

        let zero = Fragment::brick(
            "bad",
            ethyl(),
            vec![ConnectableAtom::new("X", 1, ["Y"]).with_max_connect(0)],
            &GraphChemistry,
        );
        assert_eq!(zero.unwrap_err(), FragmentError::ZeroCapacity { site: 1 });
    }

    #[test]
    fn universal_and_simple_sites_may_have_empty_allow_lists() {
        let fragment = Fragment::brick(
            "ok",
            ethyl(),
            vec![
                ConnectableAtom::new("U", 0, Vec::<&str>::new()).with_kind(SiteKind::Universal),
                ConnectableAtom::new("S", 1, Vec::<&str>::new()).with_kind(SiteKind::Simple),
            ],
            &GraphChemistry,
        );
        assert!(fragment.is_ok());
    }

    #[test]
    fn empty_structure_surfaces_chemistry_error() {
        let result = Fragment::brick("empty", Structure::new(), vec![], &GraphChemistry);
        assert_eq!(
            result.unwrap_err(),
            FragmentError::Chemistry(ChemistryError::EmptyStructure)
        );
    }

    #[test]
    fn display_names_kind_and_open_valence() {
        let brick = Fragment::brick(
            "ethyl",
            ethyl(),
            vec![ConnectableAtom::new("X", 0, ["Y"])],
            &GraphChemistry,
        )
        .unwrap();
        assert_eq!(brick.to_string(), "Brick 'ethyl' (2 atoms, open valence 1)");
    }
}
