//! `docnav pages` command implementation.

use chrono::DateTime;
use clap::Args;
use docnav_config::CliSettings;

use super::{SiteArgs, open_ledger, validate_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the pages command.
#[derive(Args)]
pub(crate) struct PagesArgs {
    #[command(flatten)]
    pub(crate) site: SiteArgs,
}

impl PagesArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.site.load_config(CliSettings::default())?;
        let ledger = open_ledger(&config);
        let build = validate_site(&config, ledger.as_ref(), &output)?;

        let linked = build.navigation().document_paths();
        let mut unlisted = 0;
        for doc in build.registry().documents() {
            let line = format!(
                "{:<40} {:<32} {}",
                display_path(&doc.path),
                doc.title,
                format_timestamp(doc.last_updated)
            );
            if linked.contains(doc.path.as_str()) {
                output.info(&line);
            } else {
                unlisted += 1;
                output.warning(format_args!("{line}  (unlisted)"));
            }
        }

        output.muted(format_args!(
            "{} documents, {unlisted} unlisted",
            build.registry().len()
        ));
        Ok(())
    }
}

/// Display form of a canonical document path.
fn display_path(path: &str) -> String {
    format!("/{path}")
}

/// Human-readable form of a millisecond timestamp.
fn format_timestamp(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .filter(|&ms| ms > 0)
        .and_then(DateTime::from_timestamp_millis)
        .map_or_else(
            || "-".to_owned(),
            |dt| dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        )
}
