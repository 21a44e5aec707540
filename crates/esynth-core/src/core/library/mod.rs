//! Storage for the Brick and Linker templates an enumeration draws from.
//!
//! Templates are loaded once (see [`loader`]) and then only read. The engine copies
//! a template whenever it needs one with fresh capacity counters, so the library
//! can be shared across threads for the whole run.

pub mod loader;

use crate::core::models::fragment::Fragment;
use crate::core::models::ids::TemplateId;
use slotmap::SlotMap;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LibraryError {
    #[error("A template named '{0}' is already in the library")]
    DuplicateName(String),
    #[error("'{0}' is an assembled complex and cannot be stored as a template")]
    NotATemplate(String),
}

#[derive(Debug, Default, Clone)]
pub struct FragmentLibrary {
    templates: SlotMap<TemplateId, Fragment>,
    order: Vec<TemplateId>,
    by_name: HashMap<String, TemplateId>,
}

impl FragmentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a Brick or Linker template. Names are unique within a library.
    pub fn insert(&mut self, fragment: Fragment) -> Result<TemplateId, LibraryError> {
        if fragment.is_complex() {
            return Err(LibraryError::NotATemplate(fragment.name().to_string()));
        }
        if self.by_name.contains_key(fragment.name()) {
            return Err(LibraryError::DuplicateName(fragment.name().to_string()));
        }
        let name = fragment.name().to_string();
        let id = self.templates.insert(fragment);
        self.order.push(id);
        self.by_name.insert(name, id);
        Ok(id)
    }

    pub fn get(&self, id: TemplateId) -> Option<&Fragment> {
        self.templates.get(id)
    }

    pub fn find(&self, name: &str) -> Option<&Fragment> {
        self.by_name.get(name).and_then(|&id| self.templates.get(id))
    }

    /// All templates in insertion order.
    pub fn templates(&self) -> impl Iterator<Item = &Fragment> + '_ {
        self.order.iter().filter_map(|&id| self.templates.get(id))
    }

    pub fn bricks(&self) -> impl Iterator<Item = &Fragment> + '_ {
        self.templates().filter(|f| f.is_brick())
    }

    pub fn linkers(&self) -> impl Iterator<Item = &Fragment> + '_ {
        self.templates().filter(|f| f.is_linker())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chem::GraphChemistry;
    use crate::core::models::connection::ConnectableAtom;
    use crate::core::models::structure::Structure;

    fn single_atom(symbol: &str) -> Structure {
        let mut s = Structure::new();
        s.add_atom(symbol).unwrap();
        s
    }

    fn brick(name: &str, symbol: &str) -> Fragment {
        Fragment::brick(
            name,
            single_atom(symbol),
            vec![ConnectableAtom::new("X", 0, ["Y"])],
            &GraphChemistry,
        )
        .unwrap()
    }

    fn linker(name: &str, symbol: &str) -> Fragment {
        Fragment::linker(
            name,
            single_atom(symbol),
            vec![ConnectableAtom::new("Y", 0, ["X"])],
            &GraphChemistry,
        )
        .unwrap()
    }

    #[test]
    fn insert_keeps_order_and_splits_roles() {
        let mut library = FragmentLibrary::new();
        library.insert(brick("b1", "C")).unwrap();
        library.insert(linker("l1", "O")).unwrap();
        library.insert(brick("b2", "N")).unwrap();

        assert_eq!(library.len(), 3);
        let names: Vec<&str> = library.templates().map(|f| f.name()).collect();
        assert_eq!(names, vec!["b1", "l1", "b2"]);
        let bricks: Vec<&str> = library.bricks().map(|f| f.name()).collect();
        assert_eq!(bricks, vec!["b1", "b2"]);
        assert_eq!(library.linkers().count(), 1);
    }

    #[test]
    fn lookup_by_name_and_id() {
        let mut library = FragmentLibrary::new();
        let id = library.insert(brick("benzene", "C")).unwrap();
        assert_eq!(library.get(id).unwrap().name(), "benzene");
        assert!(library.find("benzene").unwrap().is_brick());
        assert!(library.find("toluene").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut library = FragmentLibrary::new();
        library.insert(brick("dup", "C")).unwrap();
        assert_eq!(
            library.insert(linker("dup", "O")),
            Err(LibraryError::DuplicateName("dup".to_string()))
        );
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn new_library_is_empty() {
        let library = FragmentLibrary::new();
        assert!(library.is_empty());
        assert_eq!(library.bricks().count(), 0);
    }
}
