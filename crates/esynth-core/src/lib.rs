//! # esynth Core Library
//!
//! Combinatorial generation of candidate molecules from reusable fragments
//! ("bricks" and "linkers") joined at typed, capacity-limited connection points,
//! followed by screening through an injected acceptance predictor.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split used across the workspace:
//!
//! - **[`core`]: The Foundation.** Value types for connection points and fragments,
//!   the compatibility matcher, the molecular graph with its structural index and
//!   fingerprint, and the fragment library loader.
//!
//! - **[`engine`]: The Logic Core.** Configuration, level-by-level expansion of the
//!   assembly frontier, deduplication of produced complexes, and the acceptance
//!   filter that wraps an external predictor.
//!
//! - **[`workflows`]: The Public API.** The enumeration entry point, exposed both as a
//!   lazy iterator of accepted complexes and as a collecting `run` function.

pub mod core;
pub mod engine;
pub mod workflows;
