use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::config::{AppConfig, BackendConfig};
use crate::error::{AppError, Result};
use crate::utils::current_human_timestamp;

#[derive(Debug, Parser)]
#[command(name = "site-navigator")]
#[command(about = "Navigate construction site records from a terminal shell")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file; defaults to assets/configs/app.json when present
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Hash fragment the page was opened on, e.g. "#/project_detail/2"
    #[arg(long)]
    pub hash: Option<String>,

    /// off, error, warn, info, debug or trace
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[arg(short, long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Base URL of the REST API, implies the remote backend
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    Mock,
    Remote,
}

const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MOCK_LATENCY: Duration = Duration::from_millis(250);

impl Cli {
    /// Layer command line flags over the loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(level) = &self.log_level {
            config.logging.level = LevelFilter::from_str(level.trim()).map_err(|_| {
                AppError::message(format!("--log-level `{level}` is not a log level"))
            })?;
        }

        let kind = match (self.backend, &self.base_url) {
            (Some(kind), _) => kind,
            (None, Some(_)) => BackendKind::Remote,
            (None, None) => return Ok(()),
        };

        config.backend = match (kind, &config.backend) {
            (BackendKind::Mock, BackendConfig::Mock { latency }) => BackendConfig::Mock {
                latency: *latency,
            },
            (BackendKind::Mock, BackendConfig::Remote { .. }) => BackendConfig::Mock {
                latency: DEFAULT_MOCK_LATENCY,
            },
            (BackendKind::Remote, current) => {
                let (configured_url, timeout) = match current {
                    BackendConfig::Remote { base_url, timeout } => {
                        (Some(base_url.clone()), *timeout)
                    }
                    BackendConfig::Mock { .. } => (None, DEFAULT_REMOTE_TIMEOUT),
                };
                let base_url = self.base_url.clone().or(configured_url).ok_or_else(|| {
                    AppError::message("the remote backend needs --base-url or backend.base_url")
                })?;
                BackendConfig::Remote { base_url, timeout }
            }
        };
        Ok(())
    }
}

pub fn show_banner() {
    println!("# ------------------------------------------------------------------------ #");
    println!("# Site Navigator");
    println!("# Executing date: {}", current_human_timestamp());
    println!("#");
    println!("# Type `help` for the command list, `exit` to quit.");
    println!("# ------------------------------------------------------------------------ #");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "site-navigator",
            "--hash",
            "#/teams",
            "--log-level",
            "debug",
            "--backend",
            "mock",
        ]);
        assert_eq!(cli.hash.as_deref(), Some("#/teams"));
        assert_eq!(cli.backend, Some(BackendKind::Mock));

        let mut config = AppConfig::builtin();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config.logging.level, LevelFilter::Debug);
    }

    #[test]
    fn base_url_switches_to_remote() {
        let cli = Cli::parse_from(["site-navigator", "--base-url", "http://localhost:8080"]);
        let mut config = AppConfig::builtin();
        cli.apply_overrides(&mut config).unwrap();

        assert_eq!(
            config.backend,
            BackendConfig::Remote {
                base_url: "http://localhost:8080".to_string(),
                timeout: DEFAULT_REMOTE_TIMEOUT,
            }
        );
    }

    #[test]
    fn remote_without_url_is_an_error() {
        let cli = Cli::parse_from(["site-navigator", "--backend", "remote"]);
        let mut config = AppConfig::builtin();
        assert!(cli.apply_overrides(&mut config).is_err());
    }
}
