use std::path::Path;
use std::time::Duration;

use nodetools_core::debug::DEFAULT_BROWSER;

use super::error::{ConfigError, Result};
use super::nodetools_toml::NodetoolsToml;

pub const DEFAULT_SITE_URI: &str = "http://localhost:8080";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

const DEFAULT_BROWSER_CANDIDATES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Configuration with defaults applied and values validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub browser: String,
    pub site_uri: String,
    pub browser_candidates: Vec<String>,
    pub poll_interval: Duration,
    pub debounce: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            browser: DEFAULT_BROWSER.to_string(),
            site_uri: DEFAULT_SITE_URI.to_string(),
            browser_candidates: DEFAULT_BROWSER_CANDIDATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl Settings {
    /// Load the global config, then the project's `nodetools.toml` on top.
    pub fn load_for_project<P: AsRef<Path>>(project_dir: P) -> Result<Self> {
        let global_path = crate::paths::global_config_path().map_err(ConfigError::Home)?;
        let global = NodetoolsToml::load_optional(&global_path)?;
        let project = NodetoolsToml::load_from_dir(project_dir)?;
        Self::from_toml(&global.merged_with(project))
    }

    pub fn from_toml(config: &NodetoolsToml) -> Result<Self> {
        let defaults = Self::default();

        let browser = match config.debug.browser.as_deref().map(str::trim) {
            Some("") => {
                return Err(ConfigError::Validation(
                    "debug.browser cannot be empty".to_string(),
                ));
            }
            Some(browser) => browser.to_string(),
            None => defaults.browser,
        };

        let site_uri = match config.debug.site_uri.as_deref().map(str::trim) {
            Some(uri) => validate_site_uri("debug.site_uri", uri)?,
            None => defaults.site_uri,
        };

        let browser_candidates = match &config.debug.browser_candidates {
            Some(list) => {
                let list: Vec<String> = list
                    .iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if list.is_empty() {
                    return Err(ConfigError::Validation(
                        "debug.browser_candidates must name at least one executable".to_string(),
                    ));
                }
                list
            }
            None => defaults.browser_candidates,
        };

        let poll_interval = match config.tail.poll_interval_ms {
            Some(ms) => Duration::from_millis(validate_range("tail.poll_interval_ms", ms, 10, 60_000)?),
            None => defaults.poll_interval,
        };
        let debounce = match config.tail.debounce_ms {
            Some(ms) => Duration::from_millis(validate_range("tail.debounce_ms", ms, 10, 10_000)?),
            None => defaults.debounce,
        };

        Ok(Self {
            browser,
            site_uri,
            browser_candidates,
            poll_interval,
            debounce,
        })
    }
}

/// Check that `uri` is an absolute http(s) URI with a host. `key` names the
/// setting or flag in error messages.
pub fn validate_site_uri(key: &str, uri: &str) -> Result<String> {
    let rest = uri
        .strip_prefix("http://")
        .or_else(|| uri.strip_prefix("https://"))
        .ok_or_else(|| {
            ConfigError::Validation(format!(
                "{key} must start with http:// or https:// (got '{uri}')"
            ))
        })?;
    if rest.trim_matches('/').is_empty() {
        return Err(ConfigError::Validation(format!(
            "{key} is missing a host (got '{uri}')"
        )));
    }
    Ok(uri.to_string())
}

fn validate_range(key: &str, value: u64, min: u64, max: u64) -> Result<u64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Validation(format!(
            "{key} must be between {min} and {max} (got {value})"
        )))
    }
}
