//! # pixspike - image to Poisson spike train encoder
//!
//! Command-line front end for `pixspike-core`.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pixspike_cli::config::CliConfig;
use pixspike_cli::PixspikeCli;

fn main() {
    // Parse first so --verbose and the config file can pick the default level
    let cli = PixspikeCli::parse();

    let default_level = if cli.verbose {
        "debug".to_string()
    } else {
        CliConfig::resolve(cli.config.as_deref())
            .ok()
            .and_then(|config| config.log_level)
            .unwrap_or_else(|| "info".to_string())
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    if let Err(err) = cli.execute() {
        error!("Command failed: {}", err);
        std::process::exit(1);
    }
}
