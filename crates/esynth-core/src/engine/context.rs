use super::acceptance::AcceptanceFilter;
use super::config::{AssemblyConfig, ConfigError};
use super::progress::ProgressReporter;
use crate::core::chem::ChemistryProvider;
use crate::core::library::FragmentLibrary;
use crate::core::models::fragment::Fragment;

/// Everything an enumeration reads but never modifies.
#[derive(Clone, Copy)]
pub struct AssemblyContext<'a> {
    pub library: &'a FragmentLibrary,
    pub config: &'a AssemblyConfig,
    pub chemistry: &'a dyn ChemistryProvider,
    pub filter: &'a AcceptanceFilter,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a> AssemblyContext<'a> {
    pub fn new(
        library: &'a FragmentLibrary,
        config: &'a AssemblyConfig,
        chemistry: &'a dyn ChemistryProvider,
        filter: &'a AcceptanceFilter,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            library,
            config,
            chemistry,
            filter,
            reporter,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.library.is_empty() {
            return Err(ConfigError::EmptyLibrary);
        }
        if self.library.bricks().next().is_none() {
            return Err(ConfigError::NoBricks);
        }
        Ok(())
    }

    /// Templates a frontier fragment may be joined with, in library order.
    pub fn partner_templates(&self) -> Vec<&'a Fragment> {
        if self.config.partners.includes_bricks() {
            self.library.templates().collect()
        } else {
            self.library.linkers().collect()
        }
    }
}
