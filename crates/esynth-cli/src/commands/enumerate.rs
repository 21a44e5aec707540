use crate::cli::EnumerateArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::output::ComplexWriter;
use crate::predictor::LinearPredictor;
use crate::utils::progress::CliProgressHandler;
use esynth::core::chem::GraphChemistry;
use esynth::core::library::FragmentLibrary;
use esynth::engine::acceptance::AcceptanceFilter;
use esynth::engine::context::AssemblyContext;
use esynth::engine::progress::ProgressReporter;
use esynth::workflows::enumerate::Enumeration;
use std::fs::File;
use std::io::BufWriter;
use tracing::{info, warn};

pub fn run(args: EnumerateArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_config(&args)?;
    if app_config.model_path.is_none() && args.threshold.is_some() {
        warn!("A threshold was given without a model; every unique complex will be accepted.");
    }

    info!("Loading fragment library from {:?}", &app_config.library_path);
    let library = FragmentLibrary::load(&app_config.library_path, &GraphChemistry)?;
    let filter = build_filter(&app_config)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let file = File::create(&app_config.output_path)?;
    let mut writer = ComplexWriter::new(BufWriter::new(file))?;

    println!(
        "Enumerating up to {} level(s) from {} template(s)...",
        app_config.assembly.max_depth,
        library.len()
    );
    info!("Invoking the core enumeration workflow...");

    let context = AssemblyContext::new(
        &library,
        &app_config.assembly,
        &GraphChemistry,
        &filter,
        &reporter,
    );
    let mut enumeration = Enumeration::new(context)?;
    for accepted in enumeration.by_ref() {
        writer.write(&accepted?)?;
    }
    let stats = *enumeration.stats();
    let rows = writer.finish()?;

    info!(
        rows,
        unique = stats.unique,
        duplicates = stats.duplicates,
        rejected = stats.rejected,
        faults = stats.faults,
        "Workflow finished"
    );

    if rows == 0 {
        warn!("Enumeration completed but accepted no complexes.");
        println!("Warning: no complex was accepted.");
    } else {
        println!(
            "✓ {} accepted complex(es) written to: {}",
            rows,
            app_config.output_path.display()
        );
    }
    println!(
        "  {} unique, {} duplicate(s), {} rejected, {} dropped after faults",
        stats.unique, stats.duplicates, stats.rejected, stats.faults
    );

    Ok(())
}

fn build_filter(app_config: &AppConfig) -> Result<AcceptanceFilter> {
    let Some(model_path) = &app_config.model_path else {
        info!("No acceptance model configured; running permissively.");
        return Ok(AcceptanceFilter::permissive());
    };

    info!("Loading acceptance model from {:?}", model_path);
    let model = LinearPredictor::load(model_path)?;
    AcceptanceFilter::new(Box::new(model), app_config.threshold)
        .map_err(|e| CliError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const LIBRARY: &str = r#"
[[brick]]
name = "amine"
atoms = ["C", "N"]
bonds = [[0, 1, 1]]
[[brick.sites]]
atom = 1
type = "N.am"
allow = ["C.co"]

[[brick]]
name = "alcohol"
atoms = ["C", "C", "O"]
bonds = [[0, 1, 1], [1, 2, 1]]
[[brick.sites]]
atom = 2
type = "O.3"
allow = ["C.co"]

[[linker]]
name = "acyl"
atoms = ["C", "O"]
bonds = [[0, 1, 2]]
[[linker.sites]]
atom = 0
type = "C.co"
allow = ["N.am", "O.3"]
"#;

    fn args(dir: &std::path::Path) -> EnumerateArgs {
        let library = dir.join("library.toml");
        fs::write(&library, LIBRARY).unwrap();
        EnumerateArgs {
            library,
            output: dir.join("out.csv"),
            config: None,
            max_depth: Some(1),
            max_complexes: None,
            partners: None,
            prune_rejected: false,
            model: None,
            threshold: None,
            set_values: vec![],
        }
    }

    #[test]
    fn permissive_run_writes_every_unique_complex() {
        let dir = tempdir().unwrap();
        let args = args(dir.path());
        let output = args.output.clone();

        run(args).unwrap();

        let text = fs::read_to_string(output).unwrap();
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|r| r.contains(",amine+acyl,")));
        assert!(rows.iter().any(|r| r.contains(",alcohol+acyl,")));
    }

    #[test]
    fn a_model_that_rejects_everything_leaves_only_the_header() {
        let dir = tempdir().unwrap();
        let model = dir.path().join("model.csv");
        fs::write(&model, "term,weight\nbias,-50.0\n").unwrap();

        let mut args = args(dir.path());
        args.model = Some(model);
        let output = args.output.clone();

        run(args).unwrap();

        let text = fs::read_to_string(output).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn missing_library_is_reported() {
        let dir = tempdir().unwrap();
        let mut args = args(dir.path());
        args.library = dir.path().join("absent.toml");

        assert!(matches!(run(args), Err(CliError::Library(_))));
    }
}
