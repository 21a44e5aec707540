use super::{FragmentLibrary, LibraryError};
use crate::core::chem::ChemistryProvider;
use crate::core::models::atom_type::AtomType;
use crate::core::models::connection::{ConnectableAtom, SiteKind};
use crate::core::models::fragment::{Fragment, FragmentError};
use crate::core::models::structure::{BondOrder, Structure, StructureError};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLibrary {
    #[serde(default)]
    brick: Vec<RawTemplate>,
    #[serde(default)]
    linker: Vec<RawTemplate>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTemplate {
    name: String,
    atoms: Vec<String>,
    #[serde(default)]
    bonds: Vec<(usize, usize, u8)>,
    #[serde(default)]
    sites: Vec<RawSite>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawSite {
    atom: usize,
    #[serde(rename = "type")]
    atom_type: AtomType,
    #[serde(default)]
    allow: Vec<AtomType>,
    #[serde(default = "default_max_connect")]
    max_connect: u32,
    #[serde(default)]
    kind: SiteKind,
}

fn default_max_connect() -> u32 {
    1
}

#[derive(Debug, Error)]
pub enum LibraryLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid structure for template '{name}': {source}")]
    Structure {
        name: String,
        source: StructureError,
    },
    #[error("Invalid template '{name}': {source}")]
    Fragment { name: String, source: FragmentError },
    #[error(transparent)]
    Library(#[from] LibraryError),
}

#[derive(Clone, Copy)]
enum Role {
    Brick,
    Linker,
}

impl FragmentLibrary {
    /// Reads a TOML fragment library from disk.
    ///
    /// Bricks are inserted before linkers, each group in file order. Every template
    /// gets its structural index from `chemistry` at load time.
    ///
    /// # Errors
    ///
    /// Returns `LibraryLoadError::Io` or `LibraryLoadError::Toml` when the file
    /// cannot be read or parsed, and the remaining variants when a template is
    /// malformed or its name is reused.
    pub fn load(path: &Path, chemistry: &dyn ChemistryProvider) -> Result<Self, LibraryLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| LibraryLoadError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        let library = Self::parse(&content, &path_str, chemistry)?;
        info!(
            path = %path_str,
            bricks = library.bricks().count(),
            linkers = library.linkers().count(),
            "Loaded fragment library"
        );
        Ok(library)
    }

    pub fn from_toml_str(
        content: &str,
        chemistry: &dyn ChemistryProvider,
    ) -> Result<Self, LibraryLoadError> {
        Self::parse(content, "<inline>", chemistry)
    }

    fn parse(
        content: &str,
        origin: &str,
        chemistry: &dyn ChemistryProvider,
    ) -> Result<Self, LibraryLoadError> {
        let raw: RawLibrary = toml::from_str(content).map_err(|e| LibraryLoadError::Toml {
            path: origin.to_string(),
            source: e,
        })?;

        let mut library = FragmentLibrary::new();
        let entries = raw
            .brick
            .into_iter()
            .map(|t| (Role::Brick, t))
            .chain(raw.linker.into_iter().map(|t| (Role::Linker, t)));

        for (role, template) in entries {
            let fragment = build_template(role, template, chemistry)?;
            debug!(template = %fragment, "Registered template");
            library.insert(fragment)?;
        }
        Ok(library)
    }
}

fn build_template(
    role: Role,
    raw: RawTemplate,
    chemistry: &dyn ChemistryProvider,
) -> Result<Fragment, LibraryLoadError> {
    let structure_error = |source| LibraryLoadError::Structure {
        name: raw.name.clone(),
        source,
    };

    let mut structure = Structure::new();
    for symbol in &raw.atoms {
        structure.add_atom(symbol).map_err(structure_error)?;
    }
    for &(a, b, code) in &raw.bonds {
        let order = BondOrder::try_from(code).map_err(structure_error)?;
        structure.add_bond(a, b, order).map_err(structure_error)?;
    }

    let atoms = raw
        .sites
        .into_iter()
        .map(|site| {
            ConnectableAtom::new(site.atom_type, site.atom, site.allow)
                .with_max_connect(site.max_connect)
                .with_kind(site.kind)
        })
        .collect();

    let result = match role {
        Role::Brick => Fragment::brick(raw.name.clone(), structure, atoms, chemistry),
        Role::Linker => Fragment::linker(raw.name.clone(), structure, atoms, chemistry),
    };
    result.map_err(|source| LibraryLoadError::Fragment {
        name: raw.name,
        source,
    })
}
