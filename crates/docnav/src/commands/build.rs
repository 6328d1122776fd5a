//! `docnav build` command implementation.

use std::path::PathBuf;

use clap::Args;
use docnav_config::CliSettings;
use docnav_site::ManifestWriter;

use super::{SiteArgs, open_ledger, validate_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub(crate) site: SiteArgs,

    /// Output directory for the site manifest (default: .docnav/dist/).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Disable the last-updated ledger.
    #[arg(long)]
    no_cache: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.site.load_config(CliSettings {
            cache_enabled: self.no_cache.then_some(false),
            out_dir: self.output_dir,
            ..CliSettings::default()
        })?;
        let out_dir = config.docs.out_dir.clone();

        output.info(format_args!("Source: {}", config.docs.source_dir.display()));
        output.info(format_args!("Output: {}", out_dir.display()));

        let ledger = open_ledger(&config);
        let mut build = validate_site(&config, ledger.as_ref(), &output)?;
        build.publish(&ManifestWriter::new(out_dir.clone()))?;
        build.commit(ledger.as_ref());

        output.success(format_args!(
            "Site manifest written to {} ({} pages)",
            out_dir.display(),
            build.resolve().pages.len()
        ));
        Ok(())
    }
}
