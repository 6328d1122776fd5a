//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check;
pub(crate) mod pages;

use std::path::PathBuf;

use clap::Args;
use docnav_config::{CliSettings, Config};
use docnav_site::{
    BuildError, DuplicateLinkWarning, FileLedger, LastUpdatedLedger, NullLedger, SiteBuild,
    build_site,
};
use docnav_storage_fs::FsStorage;

use crate::error::CliError;
use crate::output::Output;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use pages::PagesArgs;

/// Arguments shared by every command that loads a site.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover docnav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Site base path, must start and end with "/" (overrides config).
    #[arg(long, env = "DOCNAV_BASE_PATH")]
    base_path: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl SiteArgs {
    /// Load configuration, applying these arguments on top of `settings`.
    fn load_config(&self, settings: CliSettings) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            base_path: self.base_path.clone(),
            ..settings
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Create the filesystem storage for a configuration.
fn open_storage(config: &Config) -> Result<FsStorage, CliError> {
    Ok(FsStorage::with_exclude(config.docs.source_dir.clone(), &config.docs.exclude)?)
}

/// Create the last-updated ledger for a configuration.
fn open_ledger(config: &Config) -> Box<dyn LastUpdatedLedger> {
    if config.docs.cache_enabled {
        Box::new(FileLedger::new(config.docs.cache_dir()))
    } else {
        Box::new(NullLedger)
    }
}

/// Build the site, printing duplicate link warnings whether or not the build
/// succeeds.
fn validate_site(
    config: &Config,
    ledger: &dyn LastUpdatedLedger,
    output: &Output,
) -> Result<SiteBuild, CliError> {
    let storage = open_storage(config)?;
    match build_site(config, &storage, ledger) {
        Ok(build) => {
            report_warnings(output, build.warnings());
            Ok(build)
        }
        Err(BuildError::Navigation(errors)) => {
            report_warnings(output, &errors.warnings);
            Err(BuildError::Navigation(errors).into())
        }
        Err(e) => Err(e.into()),
    }
}

fn report_warnings(output: &Output, warnings: &[DuplicateLinkWarning]) {
    for warning in warnings {
        output.warning(format_args!("Warning: {warning}"));
    }
}
