//! `docnav check` command implementation.

use clap::Args;
use docnav_config::CliSettings;

use super::{SiteArgs, open_ledger, validate_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub(crate) site: SiteArgs,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.site.load_config(CliSettings::default())?;
        output.info(format_args!("Source: {}", config.docs.source_dir.display()));

        let ledger = open_ledger(&config);
        let build = validate_site(&config, ledger.as_ref(), &output)?;

        let navigation = build.navigation();
        output.success(format_args!(
            "Navigation is valid: {} nav entries, {} sidebar sections, {} documents",
            navigation.nav.len(),
            navigation.sidebar.len(),
            build.registry().len()
        ));
        let unlisted = build.unlisted_documents().len();
        if unlisted > 0 {
            output.muted(format_args!(
                "{unlisted} documents are not linked from navigation (see `docnav pages`)"
            ));
        }
        Ok(())
    }
}
