use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::EnumerateArgs;
use crate::error::{CliError, Result};
use esynth::engine::config::{self as core_config, PartnerPool};

pub fn build_config(args: &EnumerateArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let assembly_file = file_config.assembly.take().unwrap_or_default();
    let acceptance_file = file_config.acceptance.take().unwrap_or_default();

    let file_partners = assembly_file
        .partners
        .as_deref()
        .map(str::parse::<PartnerPool>)
        .transpose()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let assembly = core_config::AssemblyConfigBuilder::new()
        .max_depth(
            args.max_depth
                .or(assembly_file.max_depth)
                .unwrap_or(defaults.max_depth),
        )
        .max_complexes(args.max_complexes.or(assembly_file.max_complexes))
        .partners(args.partners.or(file_partners).unwrap_or(defaults.partners))
        .prune_rejected(
            args.prune_rejected
                || assembly_file
                    .prune_rejected
                    .unwrap_or(defaults.prune_rejected),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let threshold = args
        .threshold
        .or(acceptance_file.threshold)
        .unwrap_or(defaults.threshold);
    if !threshold.is_finite() {
        return Err(CliError::Config(format!(
            "`acceptance.threshold` must be a finite number, got {}",
            threshold
        )));
    }

    Ok(AppConfig {
        library_path: args.library.clone(),
        output_path: args.output.clone(),
        assembly,
        model_path: args.model.clone().or(acceptance_file.model),
        threshold,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "assembly.max-depth" => {
                config.assembly.get_or_insert_with(Default::default).max_depth =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                    })?);
            }
            "assembly.max-complexes" => {
                config
                    .assembly
                    .get_or_insert_with(Default::default)
                    .max_complexes = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            "assembly.partners" => {
                config.assembly.get_or_insert_with(Default::default).partners =
                    Some(value_str.to_string());
            }
            "assembly.prune-rejected" => {
                config
                    .assembly
                    .get_or_insert_with(Default::default)
                    .prune_rejected = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid boolean value for {}: {}", key, value_str))
                })?);
            }
            "acceptance.threshold" => {
                config
                    .acceptance
                    .get_or_insert_with(Default::default)
                    .threshold = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                })?);
            }
            "acceptance.model" => {
                config.acceptance.get_or_insert_with(Default::default).model =
                    Some(value_str.into());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
