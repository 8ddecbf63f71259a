use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use super::{validator, AppConfig, BackendConfig, LoggingConfig, NavigationConfig};
use crate::error::{AppError, Context, Result};
use crate::fetch::request::expand_env_vars;
use crate::ui::navigation::ParamPolicy;

/// Read, convert and validate the JSON application configuration at `path`.
pub fn load_app_config(path: &Path) -> Result<AppConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read app config JSON at {}", path.display()))?;
    parse_app_config(&json)
        .map_err(|err| AppError::message(format!("{}: {err}", path.display())))
}

pub fn parse_app_config(json: &str) -> Result<AppConfig> {
    let raw: RawAppConfig =
        serde_json::from_str(json).context("failed to parse app config JSON")?;
    let config = raw.into_app_config()?;
    validator::validate_app_config(&config)?;
    Ok(config)
}

#[derive(Debug, Deserialize)]
struct RawAppConfig {
    #[serde(default)]
    backend: RawBackendConfig,
    #[serde(default)]
    navigation: RawNavigationConfig,
    #[serde(default)]
    logging: RawLoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawBackendConfig {
    Mock {
        #[serde(default = "default_latency_ms")]
        latency_ms: u64,
    },
    Remote {
        base_url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl Default for RawBackendConfig {
    fn default() -> Self {
        RawBackendConfig::Mock {
            latency_ms: default_latency_ms(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawNavigationConfig {
    #[serde(default = "default_start_route")]
    start_route: String,
    #[serde(default)]
    param_policy: ParamPolicy,
}

impl Default for RawNavigationConfig {
    fn default() -> Self {
        Self {
            start_route: default_start_route(),
            param_policy: ParamPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawLoggingConfig {
    #[serde(default = "default_level")]
    level: String,
}

impl Default for RawLoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_latency_ms() -> u64 {
    250
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_start_route() -> String {
    "login".to_string()
}

fn default_level() -> String {
    "info".to_string()
}

impl RawAppConfig {
    fn into_app_config(self) -> Result<AppConfig> {
        let backend = match self.backend {
            RawBackendConfig::Mock { latency_ms } => BackendConfig::Mock {
                latency: Duration::from_millis(latency_ms),
            },
            RawBackendConfig::Remote {
                base_url,
                timeout_secs,
            } => BackendConfig::Remote {
                base_url: expand_env_vars(base_url.trim())?,
                timeout: Duration::from_secs(timeout_secs),
            },
        };

        let level = LevelFilter::from_str(self.logging.level.trim()).map_err(|_| {
            AppError::message(format!(
                "logging.level `{}` is not one of off, error, warn, info, debug, trace",
                self.logging.level
            ))
        })?;

        Ok(AppConfig {
            backend,
            navigation: NavigationConfig {
                start_route: self.navigation.start_route.trim().to_string(),
                param_policy: self.navigation.param_policy,
            },
            logging: LoggingConfig { level },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_bundled_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(super::super::DEFAULT_CONFIG_PATH);
        let config = load_app_config(&path).expect("bundled config loads");
        assert_eq!(config.navigation.start_route, "login");
        assert!(matches!(config.backend, BackendConfig::Mock { .. }));
    }

    #[test]
    fn empty_object_yields_defaults() {
        let config = parse_app_config("{}").unwrap();
        assert_eq!(config, AppConfig::builtin());
    }

    #[test]
    fn parses_remote_backend_and_strict_policy() {
        let config = parse_app_config(
            r#"{
                "backend": { "type": "remote", "base_url": "https://api.example.com/", "timeout_secs": 3 },
                "navigation": { "start_route": "dashboard", "param_policy": "strict" },
                "logging": { "level": "debug" }
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.backend,
            BackendConfig::Remote {
                base_url: "https://api.example.com/".to_string(),
                timeout: Duration::from_secs(3),
            }
        );
        assert_eq!(config.navigation.param_policy, ParamPolicy::Strict);
        assert_eq!(config.logging.level, LevelFilter::Debug);
    }

    #[test]
    fn rejects_unknown_level() {
        let err = parse_app_config(r#"{ "logging": { "level": "loud" } }"#).unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn reports_file_path_on_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "navigation": {{ "start_route": "warehouse/9" }} }}"#
        )
        .unwrap();

        let err = load_app_config(file.path()).unwrap_err().to_string();
        assert!(err.contains(&file.path().display().to_string()), "{err}");
        assert!(err.contains("start_route"), "{err}");
    }
}
