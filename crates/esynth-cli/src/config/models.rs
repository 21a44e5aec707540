use esynth::engine::config as core_config;
use std::path::PathBuf;

pub struct AppConfig {
    pub library_path: PathBuf,
    pub output_path: PathBuf,
    pub assembly: core_config::AssemblyConfig,
    /// Weight file of the acceptance model; `None` accepts every unique complex.
    pub model_path: Option<PathBuf>,
    pub threshold: f64,
}
