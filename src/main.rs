use anyhow::Context;
use clap::Parser;
use hazard::config::{Args, Config};
use hazard::statics;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(statics::ENV_LOG_DEFAULT)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_args(&args).context("invalid configuration")?;
    info!(server = %config.server, timeout_secs = config.timeout_secs, "starting panel");

    hazard::run_gui(config).map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
