use anyhow::Context;
use sla_core::{client::NotionClient, config::Config, sync::Synchronizer};

use crate::output::{print_json, summary_line};

/// `sla-sync` — one full fetch → classify → write pass over the configured database.
///
/// Configuration errors are reported before any request is made.
pub fn run(dry_run: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let client = NotionClient::new(&config).context("failed to build HTTP client")?;
    let synchronizer = Synchronizer::new(client, &config).dry_run(dry_run);

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt
        .block_on(synchronizer.run())
        .with_context(|| format!("SLA sync of database {} failed", config.database_id))?;

    if json {
        print_json(&report)?;
    } else {
        println!("{}", summary_line(&report));
    }
    Ok(())
}
