use config::{Config, File};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::*;

/// A helper function that will search for all config files in the given directory and return them as a vec
/// of the paths.
///
/// Supported file extensions are:
/// - `.toml`.
/// - `.json`.
///
/// The gauge name table is a `.json` file too, so it is skipped here when it
/// sits in the config directory; it is loaded by [`load`] instead.
pub fn search_config_files<P: AsRef<Path>>(
    base_dir: P,
) -> quicksnap_utils::Result<Vec<PathBuf>> {
    // A pattern that covers all toml or json files in the config directory and subdirectories.
    let toml_pattern = format!("{}/**/*.toml", base_dir.as_ref().display());
    let json_pattern = format!("{}/**/*.json", base_dir.as_ref().display());
    tracing::trace!(
        "Loading config files from {} and {}",
        toml_pattern,
        json_pattern
    );
    let toml_files = glob::glob(&toml_pattern)?;
    let json_files = glob::glob(&json_pattern)?;
    toml_files
        .chain(json_files)
        .map(|v| v.map_err(quicksnap_utils::Error::from))
        .filter(|v| {
            !matches!(v, Ok(p) if p.file_stem().map_or(false, |s| s == "GaugeNames"))
        })
        .collect()
}

/// Try to parse the [`QuickSnapConfig`] from the given config file(s).
pub fn parse_from_files(
    files: &[PathBuf],
) -> quicksnap_utils::Result<QuickSnapConfig> {
    let mut builder = Config::builder();
    for config_file in files {
        tracing::trace!("Loading config file: {}", config_file.display());
        // get file extension
        let ext = config_file
            .extension()
            .map(|e| e.to_str().unwrap_or(""))
            .unwrap_or("");
        let format = match ext {
            "toml" => config::FileFormat::Toml,
            "json" => config::FileFormat::Json,
            _ => {
                tracing::warn!("Unknown file extension: {}", ext);
                continue;
            }
        };
        builder = builder
            .add_source(File::from(config_file.as_path()).format(format));
    }

    // also merge in the environment (with a prefix of QUICKSNAP).
    let builder = builder.add_source(
        config::Environment::with_prefix("QUICKSNAP").separator("__"),
    );
    let cfg = builder.build()?;
    // and finally deserialize the config and post-process it
    let config: Result<
        QuickSnapConfig,
        serde_path_to_error::Error<config::ConfigError>,
    > = serde_path_to_error::deserialize(cfg);
    match config {
        Ok(c) => postloading_process(c),
        Err(e) => {
            tracing::error!("{}", e);
            Err(e.into())
        }
    }
}

/// Load the configuration files and the gauge name table of a directory.
///
/// Returns `Ok(QuickSnapConfig)` on success.
///
/// # Arguments
///
/// * `path` - The configuration directory
///
/// # Example
///
/// ```no_run
/// use quicksnap_config::utils::load;
///
/// let config = load("/path/to/config").unwrap();
/// ```
///
/// it is the same as using the [`search_config_files`] and [`parse_from_files`] functions combined,
/// plus resolving `gauge-names` relative to `path`.
pub fn load<P: AsRef<Path>>(
    path: P,
) -> quicksnap_utils::Result<QuickSnapConfig> {
    let mut config = parse_from_files(&search_config_files(&path)?)?;
    if let Some(table) = config.gauge_names.as_ref() {
        let table_path = if table.is_absolute() {
            table.clone()
        } else {
            path.as_ref().join(table)
        };
        config.gauge_name_table = GaugeNames::load(table_path)?;
        tracing::debug!(
            "Loaded {} static gauge names",
            config.gauge_name_table.len()
        );
    }
    Ok(config)
}

/// The postloading_process exists to validate configuration and standardize
/// the format of the configuration
pub fn postloading_process(
    mut config: QuickSnapConfig,
) -> quicksnap_utils::Result<QuickSnapConfig> {
    tracing::trace!("Checking configration sanity ...");

    // drop disabled projects, and complain about duplicates.
    config.projects.retain(|p| p.enabled);
    let mut seen = HashSet::new();
    for project in &config.projects {
        if !seen.insert(project.tag) {
            tracing::warn!(
                "!!WARNING!!: project {} is configured more than once, only the first entry is used",
                project.tag
            );
        }
    }

    if config.proposal_reward_source == ProposalRewardSource::Contract
        && config.contracts.snapshot_bribe.is_none()
    {
        tracing::warn!(
            "!!WARNING!!: proposal-reward-source is `contract` but contracts.snapshot-bribe is not configured,
            proposal incentives will be empty"
        );
    }

    if config.contracts.merkle_distributor.is_none() {
        tracing::warn!(
            "!!WARNING!!: contracts.merkle-distributor is not configured, rewards cannot be claimed"
        );
    }

    if config.price_oracle.api_key.is_none() {
        tracing::warn!(
            "No CoinGecko api key configured, the public rate limit applies"
        );
    }

    tracing::trace!(
        "postloaded config: {}",
        serde_json::to_string_pretty(&config)?
    );

    Ok(config)
}
