use crate::QuickSnapConfig;
use anyhow::Context;
use directories_next::ProjectDirs;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

/// Package identifier, where the default configuration is defined.
/// If the user does not pass `--config-dir`
/// it will default to read from the default location depending on the OS.
pub const PACKAGE_ID: [&str; 3] = ["finance", "quicksnap", "quicksnap"];

/// The crates whose logs are controlled by the verbosity flag.
const LOG_TARGETS: [&str; 8] = [
    "quicksnap",
    "quicksnap_aggregator",
    "quicksnap_config",
    "quicksnap_context",
    "quicksnap_contracts",
    "quicksnap_indexer",
    "quicksnap_price_oracle_backends",
    "quicksnap_types",
];

/// Options shared by every QuickSnap command.
#[derive(Debug, Clone, StructOpt)]
pub struct Opts {
    /// A level of verbosity, and can be used multiple times
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: i32,
    /// Directory that contains configration files.
    #[structopt(
        short = "c",
        long = "config-dir",
        value_name = "PATH",
        parse(from_os_str)
    )]
    pub config_dir: Option<PathBuf>,
}

/// Loads the configuration from the given directory.
///
/// Returns `Ok(Config)` on success, or `Err(anyhow::Error)` on failure.
///
/// # Arguments
///
/// * `config_dir` - An optional `PathBuf` representing the directory that contains the configuration.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use quicksnap_config::cli::load_config;
///
/// let arg = Some(PathBuf::from("/tmp/config"));
/// let config = load_config(arg).unwrap();
/// ```
pub fn load_config<P>(
    config_dir: Option<P>,
) -> Result<QuickSnapConfig, anyhow::Error>
where
    P: AsRef<Path>,
{
    tracing::debug!("Getting default dirs for quicksnap");
    let path = match config_dir {
        Some(p) => p.as_ref().to_path_buf(),
        None => {
            ProjectDirs::from(PACKAGE_ID[0], PACKAGE_ID[1], PACKAGE_ID[2])
                .context("failed to get config")?
                .config_dir()
                .to_path_buf()
        }
    };
    // return an error if the path is not a directory.
    if !path.is_dir() {
        return Err(anyhow::anyhow!("{} is not a directory", path.display()));
    }
    tracing::trace!("Loading Config from {} ..", path.display());
    let v = crate::utils::load(path)?;
    tracing::trace!("Config loaded..");
    Ok(v)
}

/// Sets up the logger, based on the verbosity level passed in.
///
/// Logs go to stderr so that command output on stdout stays parseable.
///
/// # Arguments
///
/// * `verbosity` - An i32 integer representing the verbosity level.
///
/// # Examples
///
/// ```no_run
/// quicksnap_config::cli::setup_logger(3).unwrap();
/// ```
pub fn setup_logger(verbosity: i32) -> anyhow::Result<()> {
    use tracing::Level;
    let log_level = match verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    for target in LOG_TARGETS {
        env_filter =
            env_filter.add_directive(format!("{target}={log_level}").parse()?);
    }
    let logger = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_max_level(log_level)
        .with_env_filter(env_filter);
    // pretty logs for humans
    #[cfg(not(feature = "json-logs"))]
    let logger = logger.pretty();
    // otherwise, we should use json, which is easy to parse.
    #[cfg(feature = "json-logs")]
    let logger = logger.json().flatten_event(true).with_current_span(false);

    logger.init();
    Ok(())
}
