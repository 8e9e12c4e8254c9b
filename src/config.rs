use crate::error::{HazardError, Result};
use crate::statics;
use clap::Parser;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Parser)]
#[command(name = "hazard", about = "Hazard home-automation control panel", version)]
pub struct Args {
    /// Backend base URL, e.g. http://hazard.local:8080
    #[arg(short, long, env = statics::ENV_SERVER)]
    pub server: Option<String>,

    /// JSON5 config file (`server`, `timeout_secs`)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Settings read from a config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL without a trailing slash.
    pub server: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: statics::DEFAULT_SERVER.to_string(),
            timeout_secs: statics::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Defaults, then the config file, then flags (`--server` also reads `HAZARD_SERVER`).
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = &args.config {
            config.merge_file(path)?;
        }
        if let Some(server) = &args.server {
            config.server = server.clone();
        }
        if let Some(secs) = args.timeout_secs {
            config.timeout_secs = secs;
        }
        config.validate()?;
        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)?;
        let file: ConfigFile = json5::from_str(&text)
            .map_err(|e| HazardError::Config(format!("{}: {e}", path.display())))?;
        if let Some(server) = file.server {
            self.server = server;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout_secs = secs;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        let trimmed = self.server.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(HazardError::Config(format!(
                "server must be an http(s) URL, got {:?}",
                self.server
            )));
        }
        if self.timeout_secs == 0 {
            return Err(HazardError::Config("timeout_secs must be at least 1".into()));
        }
        self.server = trimmed.to_string();
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
