use crate::core::chem::ChemistryProvider;
use crate::core::library::FragmentLibrary;
use crate::core::models::fragment::Fragment;
use crate::engine::acceptance::{AcceptanceError, AcceptanceFilter, Verdict};
use crate::engine::config::AssemblyConfig;
use crate::engine::context::AssemblyContext;
use crate::engine::error::EngineError;
use crate::engine::expansion::{self, Candidate};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::registry::ComplexRegistry;
use std::collections::VecDeque;
use std::iter::FusedIterator;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct AcceptedComplex {
    pub complex: Fragment,
    /// Predictor score; `None` when enumerating without a predictor.
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    pub levels_completed: usize,
    /// Complexes built by successful joins, duplicates included.
    pub generated: usize,
    /// Complexes whose structural index had not been seen before.
    pub unique: usize,
    pub duplicates: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Candidates dropped because the chemistry provider or the predictor failed.
    pub faults: usize,
}

#[derive(Debug, Clone)]
pub struct EnumerationResult {
    pub accepted: Vec<AcceptedComplex>,
    pub stats: EnumerationStats,
}

/// Lazy, level-by-level enumeration of accepted complexes.
///
/// Each call to [`next`](Iterator::next) drains the complexes accepted at the
/// current level before expanding the following one, so a consumer that stops
/// early never pays for deeper levels. After an `Err` item the iterator is
/// exhausted.
pub struct Enumeration<'a> {
    context: AssemblyContext<'a>,
    partners: Vec<&'a Fragment>,
    frontier: Vec<Fragment>,
    registry: ComplexRegistry,
    pending: VecDeque<AcceptedComplex>,
    depth: usize,
    stats: EnumerationStats,
    finished: bool,
}

impl<'a> Enumeration<'a> {
    /// Validates the inputs and seeds the frontier with every Brick that has an
    /// open connection point. Bricks with identical structure are seeded once.
    pub fn new(context: AssemblyContext<'a>) -> Result<Self, EngineError> {
        context.validate()?;
        context.reporter.report(Progress::PhaseStart {
            name: "Enumeration",
        });

        let mut registry = ComplexRegistry::new();
        let mut frontier = Vec::new();
        for brick in context.library.bricks() {
            if !brick.has_open_valence() {
                debug!(brick = brick.name(), "Brick has no open connection points; not seeded");
                continue;
            }
            if !registry.register(brick.index()) {
                debug!(brick = brick.name(), "Brick duplicates an earlier template; not seeded");
                continue;
            }
            frontier.push(brick.clone());
        }

        info!(
            seeds = frontier.len(),
            max_depth = context.config.max_depth,
            partners = %context.config.partners,
            "Seeded assembly frontier"
        );

        Ok(Self {
            partners: context.partner_templates(),
            context,
            frontier,
            registry,
            pending: VecDeque::new(),
            depth: 0,
            stats: EnumerationStats::default(),
            finished: false,
        })
    }

    pub fn stats(&self) -> &EnumerationStats {
        &self.stats
    }

    /// Number of levels expanded so far.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn limit_reached(&self) -> bool {
        self.context
            .config
            .max_complexes
            .is_some_and(|limit| self.stats.unique >= limit)
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.context.reporter.report(Progress::PhaseFinish);
        info!(
            levels = self.stats.levels_completed,
            unique = self.stats.unique,
            duplicates = self.stats.duplicates,
            accepted = self.stats.accepted,
            rejected = self.stats.rejected,
            faults = self.stats.faults,
            "Enumeration finished"
        );
    }

    #[instrument(skip_all, name = "assembly_level", fields(depth = self.depth + 1))]
    fn advance(&mut self) -> Result<(), EngineError> {
        if self.depth >= self.context.config.max_depth
            || self.frontier.is_empty()
            || self.limit_reached()
        {
            self.finish();
            return Ok(());
        }

        self.depth += 1;
        let depth = self.depth;
        self.context.reporter.report(Progress::LevelStart {
            depth,
            frontier: self.frontier.len() as u64,
        });
        info!(frontier = self.frontier.len(), "Expanding level");

        let candidates = expansion::expand_level(&self.frontier, &self.partners, &self.context)?;
        let unique = self.deduplicate(candidates);
        let verdicts = self.score(&unique);
        let level_unique = unique.len();

        let mut next_frontier = Vec::new();
        let mut accepted = 0;
        for (complex, verdict) in unique.into_iter().zip(verdicts) {
            match verdict {
                Ok(Verdict::Accepted { score }) => {
                    accepted += 1;
                    if complex.has_open_valence() {
                        next_frontier.push(complex.clone());
                    }
                    self.pending.push_back(AcceptedComplex { complex, score });
                }
                Ok(Verdict::Rejected { score }) => {
                    self.stats.rejected += 1;
                    debug!(complex = complex.name(), score, "Rejected by acceptance filter");
                    if !self.context.config.prune_rejected && complex.has_open_valence() {
                        next_frontier.push(complex);
                    }
                }
                Err(error) => {
                    self.stats.faults += 1;
                    warn!(
                        complex = complex.name(),
                        index = %complex.index(),
                        %error,
                        "Dropping candidate after acceptance fault"
                    );
                }
            }
        }

        self.stats.accepted += accepted;
        self.stats.levels_completed = depth;
        self.frontier = next_frontier;

        info!(
            unique = level_unique,
            accepted,
            next_frontier = self.frontier.len(),
            "Level complete"
        );
        self.context.reporter.report(Progress::LevelFinish {
            depth,
            unique: level_unique,
            accepted,
        });
        Ok(())
    }

    /// Merges a level's candidates into the registry in candidate order.
    ///
    /// Once the complex limit is reached the remaining built candidates are
    /// skipped uncounted; faults are still tallied.
    fn deduplicate(&mut self, candidates: Vec<Candidate>) -> Vec<Fragment> {
        let mut unique = Vec::new();
        for candidate in candidates {
            match candidate {
                Candidate::Built(complex) => {
                    if self.limit_reached() {
                        continue;
                    }
                    self.stats.generated += 1;
                    if self.registry.register(complex.index()) {
                        self.stats.unique += 1;
                        unique.push(complex);
                    } else {
                        self.stats.duplicates += 1;
                        debug!(complex = complex.name(), index = %complex.index(), "Duplicate complex");
                    }
                }
                Candidate::Fault { left, right, error } => {
                    self.stats.faults += 1;
                    warn!(left = %left, right = %right, %error, "Dropping candidate after chemistry fault");
                }
            }
        }
        unique
    }

    fn score(&self, complexes: &[Fragment]) -> Vec<Result<Verdict, AcceptanceError>> {
        let filter = self.context.filter;
        let chemistry = self.context.chemistry;

        #[cfg(not(feature = "parallel"))]
        let iterator = complexes.iter();

        #[cfg(feature = "parallel")]
        let iterator = complexes.par_iter();

        iterator
            .map(|complex| filter.evaluate(complex, chemistry))
            .collect()
    }
}

impl Iterator for Enumeration<'_> {
    type Item = Result<AcceptedComplex, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(complex) = self.pending.pop_front() {
                return Some(Ok(complex));
            }
            if self.finished {
                return None;
            }
            if let Err(error) = self.advance() {
                self.finished = true;
                return Some(Err(error));
            }
        }
    }
}

impl FusedIterator for Enumeration<'_> {}

/// Runs a complete enumeration and collects every accepted complex.
#[instrument(skip_all, name = "enumeration_workflow")]
pub fn run<'a>(
    library: &'a FragmentLibrary,
    config: &'a AssemblyConfig,
    chemistry: &'a dyn ChemistryProvider,
    filter: &'a AcceptanceFilter,
    reporter: &'a ProgressReporter<'a>,
) -> Result<EnumerationResult, EngineError> {
    let context = AssemblyContext::new(library, config, chemistry, filter, reporter);
    let mut enumeration = Enumeration::new(context)?;

    let mut accepted = Vec::new();
    for item in enumeration.by_ref() {
        accepted.push(item?);
    }

    let stats = *enumeration.stats();
    info!(
        "Workflow complete. {} complex(es) accepted out of {} unique.",
        accepted.len(),
        stats.unique
    );
    Ok(EnumerationResult { accepted, stats })
}
