use super::config::ConfigError;
use crate::core::chem::ChemistryError;
use crate::core::matching::ConnectionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Connection bookkeeping fault: {source}")]
    Connection {
        #[from]
        source: ConnectionError,
    },

    #[error("Chemistry provider failed: {source}")]
    Chemistry {
        #[from]
        source: ChemistryError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Faults that only invalidate the candidate being built. Everything else ends
    /// the enumeration.
    pub fn is_candidate_fault(&self) -> bool {
        matches!(self, EngineError::Chemistry { .. })
    }
}
