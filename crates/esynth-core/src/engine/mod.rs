//! # Engine Module
//!
//! The machinery that turns a fragment library into a stream of assembled
//! complexes.
//!
//! ## Overview
//!
//! Enumeration proceeds level by level. The frontier starts as fresh copies of every
//! Brick with an open connection point; each level joins every frontier fragment
//! with every compatible partner, drops complexes whose structural index has been
//! seen before, scores the survivors through the acceptance filter and hands the
//! fragments that still have open valence to the next level.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Depth and size bounds, partner pool selection
//! - **Context** ([`context`]) - The read-only inputs shared by every level
//! - **Acceptance** ([`acceptance`]) - The injected predictor and its threshold
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level error aggregation
//!
//! Expansion, joining and deduplication are crate-internal; the public entry point
//! is [`crate::workflows::enumerate`].
//!
//! ## Key Capabilities
//!
//! - **Parallel expansion** of independent frontier fragments behind the `parallel`
//!   feature, with deterministic, order-stable merging
//! - **Order-independent deduplication** through structural indices
//! - **Fault isolation**: a chemistry or predictor failure drops one candidate,
//!   a bookkeeping fault stops the run

pub mod acceptance;
pub mod config;
pub mod context;
pub mod error;
pub(crate) mod expansion;
pub(crate) mod join;
pub mod progress;
pub(crate) mod registry;
