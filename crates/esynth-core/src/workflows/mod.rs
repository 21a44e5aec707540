//! # Workflows Module
//!
//! High-level entry points for callers of esynth.
//!
//! - **Enumeration Workflow** ([`enumerate`]) - Bounded combinatorial assembly of a
//!   fragment library, exposed as a lazy iterator of accepted complexes
//!   ([`enumerate::Enumeration`]) and as a collecting [`enumerate::run`].

pub mod enumerate;
