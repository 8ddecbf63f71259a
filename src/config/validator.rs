use std::time::Duration;

use crate::error::{AppError, Result};
use crate::ui::navigation::{ParamPolicy, Route};

use super::{AppConfig, BackendConfig};

/// Upper bound for simulated latency; anything above makes the shell unusable.
const MAX_MOCK_LATENCY: Duration = Duration::from_secs(10);

/// Validate the application configuration and surface every issue at once.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    let mut issues = Vec::new();

    validate_backend(&config.backend, &mut issues);
    validate_start_route(&config.navigation.start_route, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "app config invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_backend(backend: &BackendConfig, issues: &mut Vec<String>) {
    match backend {
        BackendConfig::Mock { latency } => {
            if *latency > MAX_MOCK_LATENCY {
                issues.push(format!(
                    "backend.latency_ms must be at most {} ms",
                    MAX_MOCK_LATENCY.as_millis()
                ));
            }
        }
        BackendConfig::Remote { base_url, timeout } => {
            if base_url.is_empty() {
                issues.push("backend.base_url must not be empty".to_string());
            } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                issues.push(format!(
                    "backend.base_url `{base_url}` must start with http:// or https://"
                ));
            }
            if timeout.is_zero() {
                issues.push("backend.timeout_secs must be greater than zero".to_string());
            }
        }
    }
}

/// The start route is checked strictly whatever the runtime policy is.
fn validate_start_route(start_route: &str, issues: &mut Vec<String>) {
    if let Err(err) = Route::parse(start_route, ParamPolicy::Strict) {
        issues.push(format!("navigation.start_route: {err}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggingConfig, NavigationConfig};
    use log::LevelFilter;

    fn config(backend: BackendConfig, start_route: &str) -> AppConfig {
        AppConfig {
            backend,
            navigation: NavigationConfig {
                start_route: start_route.to_string(),
                param_policy: ParamPolicy::Fallback,
            },
            logging: LoggingConfig {
                level: LevelFilter::Info,
            },
        }
    }

    #[test]
    fn aggregates_every_issue() {
        let bad = config(
            BackendConfig::Remote {
                base_url: "ftp://files".to_string(),
                timeout: Duration::ZERO,
            },
            "project_detail/",
        );

        let message = validate_app_config(&bad).unwrap_err().to_string();
        assert!(message.contains("http://"), "{message}");
        assert!(message.contains("timeout_secs"), "{message}");
        assert!(message.contains("start_route"), "{message}");
    }

    #[test]
    fn accepts_parameterised_start_route() {
        let ok = config(
            BackendConfig::Mock {
                latency: Duration::ZERO,
            },
            "project_detail/3",
        );
        validate_app_config(&ok).unwrap();
    }

    #[test]
    fn rejects_excessive_latency() {
        let slow = config(
            BackendConfig::Mock {
                latency: Duration::from_secs(60),
            },
            "dashboard",
        );
        assert!(validate_app_config(&slow).is_err());
    }
}
