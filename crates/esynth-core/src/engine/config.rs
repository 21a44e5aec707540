use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("The fragment library is empty")]
    EmptyLibrary,
    #[error("The fragment library contains no bricks to seed the enumeration")]
    NoBricks,
}

/// Which fragments a frontier fragment may be joined with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartnerPool {
    /// Linker templates only.
    #[default]
    Linkers,
    /// Every Brick and Linker template.
    Templates,
    /// Every template plus the other fragments of the current frontier.
    Frontier,
}

impl PartnerPool {
    pub fn includes_bricks(self) -> bool {
        !matches!(self, PartnerPool::Linkers)
    }

    pub fn includes_frontier(self) -> bool {
        matches!(self, PartnerPool::Frontier)
    }
}

impl FromStr for PartnerPool {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linkers" => Ok(PartnerPool::Linkers),
            "templates" => Ok(PartnerPool::Templates),
            "frontier" => Ok(PartnerPool::Frontier),
            other => Err(ConfigError::InvalidParameter {
                name: "partners",
                reason: format!(
                    "unknown partner pool '{}'; expected linkers, templates or frontier",
                    other
                ),
            }),
        }
    }
}

impl fmt::Display for PartnerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PartnerPool::Linkers => "linkers",
            PartnerPool::Templates => "templates",
            PartnerPool::Frontier => "frontier",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyConfig {
    /// Number of expansion levels; always at least one.
    pub max_depth: usize,
    /// Stop once this many unique complexes have been produced.
    pub max_complexes: Option<usize>,
    pub partners: PartnerPool,
    /// Keep rejected complexes out of the next frontier.
    pub prune_rejected: bool,
}

#[derive(Default)]
pub struct AssemblyConfigBuilder {
    max_depth: Option<usize>,
    max_complexes: Option<usize>,
    partners: Option<PartnerPool>,
    prune_rejected: Option<bool>,
}

impl AssemblyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
    pub fn max_complexes(mut self, limit: Option<usize>) -> Self {
        self.max_complexes = limit;
        self
    }
    pub fn partners(mut self, pool: PartnerPool) -> Self {
        self.partners = Some(pool);
        self
    }
    pub fn prune_rejected(mut self, prune: bool) -> Self {
        self.prune_rejected = Some(prune);
        self
    }

    pub fn build(self) -> Result<AssemblyConfig, ConfigError> {
        let max_depth = self
            .max_depth
            .ok_or(ConfigError::MissingParameter("max_depth"))?;
        if max_depth == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_complexes == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_complexes",
                reason: "must be at least 1 when set".to_string(),
            });
        }
        Ok(AssemblyConfig {
            max_depth,
            max_complexes: self.max_complexes,
            partners: self.partners.unwrap_or_default(),
            prune_rejected: self.prune_rejected.unwrap_or(false),
        })
    }
}
