//! # Core Models Module
//!
//! Data structures describing fragments and their connection points.
//!
//! ## Key Components
//!
//! - [`atom_type`] - Shared, immutable connection-point category labels
//! - [`connection`] - Connection points with capacity bookkeeping
//! - [`structure`] - Minimal molecular graph (atoms and bonds) owned by each fragment
//! - [`fragment`] - The closed Brick/Linker/Complex fragment variant
//! - [`ids`] - Identifier types for library templates and committed connections
//!
//! ## Usage
//!
//! ```ignore
//! use esynth::core::models::{atom_type::AtomType, connection::ConnectableAtom};
//!
//! let amine = ConnectableAtom::new("N.am", 0, ["C.co"]);
//! let carbonyl = ConnectableAtom::new("C.co", 3, ["N.am"]);
//! assert!(amine.can_connect_to(&carbonyl));
//! ```

pub mod atom_type;
pub mod connection;
pub mod fragment;
pub mod ids;
pub mod structure;
