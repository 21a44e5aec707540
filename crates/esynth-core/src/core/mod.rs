//! # Core Module
//!
//! The stateless foundation of esynth: everything needed to describe fragments and
//! decide whether two of their connection points may be joined.
//!
//! ## Architecture
//!
//! - **Fragment Representation** ([`models`]) - Atom types, connection points, molecular
//!   structures and the closed Brick/Linker/Complex fragment variant
//! - **Compatibility Rules** ([`matching`]) - The ordered rule table deciding whether two
//!   connection points may bond, and the bookkeeping that commits a bond
//! - **Chemistry Boundary** ([`chem`]) - Structural indices and fingerprints behind the
//!   [`chem::ChemistryProvider`] trait, with a graph-based default implementation
//! - **Template Storage** ([`library`]) - Loading and indexing brick and linker templates

pub mod chem;
pub mod library;
pub mod matching;
pub mod models;
