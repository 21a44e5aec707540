use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileAssemblyConfig {
    #[serde(rename = "max-depth")]
    pub max_depth: Option<usize>,
    #[serde(rename = "max-complexes")]
    pub max_complexes: Option<usize>,
    pub partners: Option<String>,
    #[serde(rename = "prune-rejected")]
    pub prune_rejected: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileAcceptanceConfig {
    pub model: Option<PathBuf>,
    pub threshold: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub assembly: Option<FileAssemblyConfig>,
    pub acceptance: Option<FileAcceptanceConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
