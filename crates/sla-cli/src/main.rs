mod cmd;
mod output;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "sla-sync",
    about = "Recompute the SLA label of every page in a Notion database and write back the ones that changed",
    long_about = "Recompute the SLA label of every page in a Notion database and write back the ones that changed.\n\n\
                  Configuration is read from the environment: NOTION_TOKEN and DATABASE_ID are required; \
                  TZ selects the time zone (default Europe/Istanbul).",
    version
)]
struct Cli {
    /// Output the run summary as JSON
    #[arg(long, short = 'j')]
    json: bool,

    /// Classify and report without writing any labels
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cmd::sync::run(cli.dry_run, cli.json) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
