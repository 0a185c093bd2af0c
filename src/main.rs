//! gcsprobe - Google Cloud Storage Credential Probe
//!
//! Lists the buckets visible to the ambient credentials and prints whether
//! authentication worked.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gcsprobe::config::ProbeConfig;
use gcsprobe::error::Result;
use gcsprobe::probe;

/// gcsprobe - verify ambient GCP credentials by listing storage buckets
#[derive(Parser)]
#[command(name = "gcsprobe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let config = ProbeConfig::from_env();
    tracing::debug!("Resolved configuration: {:?}", config);

    let outcome = probe::run(&config).await;

    let stdout = std::io::stdout();
    outcome.render(&mut stdout.lock())?;
    Ok(())
}

/// Initialize logging on stderr so the report on stdout stays exact
fn init_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
