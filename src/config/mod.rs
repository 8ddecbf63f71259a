use std::path::Path;
use std::time::Duration;

use log::LevelFilter;

use crate::error::Result;
use crate::ui::navigation::ParamPolicy;

pub mod loader;
pub mod validator;

pub use loader::load_app_config;

/// Location of the bundled configuration, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "assets/configs/app.json";

#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    /// In-memory repositories with simulated network latency.
    Mock { latency: Duration },
    Remote { base_url: String, timeout: Duration },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationConfig {
    pub start_route: String,
    pub param_policy: ParamPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: LevelFilter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub navigation: NavigationConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn builtin() -> Self {
        Self {
            backend: BackendConfig::Mock {
                latency: Duration::from_millis(250),
            },
            navigation: NavigationConfig {
                start_route: "login".to_string(),
                param_policy: ParamPolicy::Fallback,
            },
            logging: LoggingConfig {
                level: LevelFilter::Info,
            },
        }
    }

    /// Load `path` when given, else the bundled file when present, else the built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => load_app_config(path),
            None => {
                let bundled = Path::new(DEFAULT_CONFIG_PATH);
                if bundled.exists() {
                    load_app_config(bundled)
                } else {
                    Ok(Self::builtin())
                }
            }
        }
    }
}
