use super::atom_type::AtomType;
use super::ids::ConnectionId;
use crate::core::matching;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The reactivity class of a connection point.
///
/// Only the kind is stored; whether a point belongs to a linker is a separate
/// flag because it is decided by the owning fragment, not by the library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    /// A regular point that requires mutual agreement with its partner.
    #[default]
    Standard,
    /// A universal connector: any partner that accepts its type may bond to it.
    Universal,
    /// A non-reactive point that never takes part in a bond.
    Simple,
}

impl FromStr for SiteKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "normal" => Ok(SiteKind::Standard),
            "universal" | "any" => Ok(SiteKind::Universal),
            "simple" | "inert" => Ok(SiteKind::Simple),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            SiteKind::Standard => "standard",
            SiteKind::Universal => "universal",
            SiteKind::Simple => "simple",
        })
    }
}

/// A connection point exposed by a fragment.
///
/// `site` is the index of the underlying atom in the owning fragment's
/// [`Structure`](super::structure::Structure); that index is the only link back to
/// the owner. Cloning performs a full value copy, so copies never share their
/// allowable-type lists or counters with the template they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectableAtom {
    atom_type: AtomType,
    site: usize,
    max_connect: u32,
    allowable_types: Vec<AtomType>,
    external_connections: u32,
    connection_id: Option<ConnectionId>,
    kind: SiteKind,
    linker_atom: bool,
}

impl ConnectableAtom {
    /// Creates a standard, single-capacity connection point.
    ///
    /// Duplicate entries in `allowable` are collapsed; the first occurrence keeps
    /// its position.
    pub fn new<T, I>(atom_type: impl Into<AtomType>, site: usize, allowable: I) -> Self
    where
        T: Into<AtomType>,
        I: IntoIterator<Item = T>,
    {
        let mut allowable_types: Vec<AtomType> = Vec::new();
        for t in allowable {
            let t = t.into();
            if !allowable_types.contains(&t) {
                allowable_types.push(t);
            }
        }
        Self {
            atom_type: atom_type.into(),
            site,
            max_connect: 1,
            allowable_types,
            external_connections: 0,
            connection_id: None,
            kind: SiteKind::Standard,
            linker_atom: false,
        }
    }

    pub fn with_max_connect(mut self, max_connect: u32) -> Self {
        self.max_connect = max_connect;
        self
    }

    pub fn with_kind(mut self, kind: SiteKind) -> Self {
        self.kind = kind;
        self
    }

    /// Marks the point as owned by a linker fragment.
    pub fn into_linker_atom(mut self) -> Self {
        self.linker_atom = true;
        self
    }

    pub fn atom_type(&self) -> &AtomType {
        &self.atom_type
    }

    pub fn site(&self) -> usize {
        self.site
    }

    pub fn max_connect(&self) -> u32 {
        self.max_connect
    }

    pub fn allowable_types(&self) -> &[AtomType] {
        &self.allowable_types
    }

    pub fn external_connections(&self) -> u32 {
        self.external_connections
    }

    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.connection_id
    }

    pub fn kind(&self) -> SiteKind {
        self.kind
    }

    pub fn is_simple(&self) -> bool {
        self.kind == SiteKind::Simple
    }

    pub fn can_connect_to_any(&self) -> bool {
        self.kind == SiteKind::Universal
    }

    pub fn is_linker_atom(&self) -> bool {
        self.linker_atom
    }

    pub fn allows(&self, atom_type: &AtomType) -> bool {
        self.allowable_types.contains(atom_type)
    }

    pub fn remaining_capacity(&self) -> u32 {
        if self.is_simple() {
            0
        } else {
            self.max_connect.saturating_sub(self.external_connections)
        }
    }

    pub fn has_capacity(&self) -> bool {
        self.remaining_capacity() > 0
    }

    /// See [`matching::can_connect`].
    pub fn can_connect_to(&self, other: &ConnectableAtom) -> bool {
        matching::can_connect(self, other)
    }

    pub(crate) fn record_connection(&mut self, id: ConnectionId) {
        self.external_connections += 1;
        self.connection_id = Some(id);
    }

    /// Shifts the site and connection id when the owning structure is appended
    /// behind another one during a join.
    pub(crate) fn relocate(&mut self, site_offset: usize, id_offset: u32) {
        self.site += site_offset;
        self.connection_id = self.connection_id.map(|id| id.offset(id_offset));
    }
}

impl fmt::Display for ConnectableAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Connections{{ Max: {} Allow: ", self.atom_type, self.max_connect)?;
        for t in &self.allowable_types {
            write!(f, "{} ", t)?;
        }
        match self.connection_id {
            Some(id) => write!(f, "  Conn Id: ({})", id)?,
            None => write!(f, "  Conn Id: (-)")?,
        }
        write!(f, " }}")
    }
}
