//! Configuration file initialization command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Write a default configuration file
#[derive(Args, Debug)]
pub struct InitConfigCommand {
    /// Where to write (defaults to the user config directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl InitConfigCommand {
    pub fn execute(self) -> CliResult<()> {
        let path = match self.path {
            Some(path) => path,
            None => CliConfig::default_config_path()?,
        };
        if path.exists() && !self.force {
            return Err(CliError::invalid_args(format!(
                "{} already exists; pass --force to overwrite",
                path.display()
            )));
        }

        CliConfig::default().save_to_file(&path)?;
        info!("Wrote default configuration to {}", path.display());
        Ok(())
    }
}
