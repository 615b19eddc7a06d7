use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::error::{ConfigError, Result};

pub const PROJECT_CONFIG_FILE: &str = "nodetools.toml";

/// Contents of `nodetools.toml` (project) or `~/.nodetools/config.toml` (global).
///
/// Every value is optional so a project file can override single keys of the
/// global one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodetoolsToml {
    /// [debug] section - debugger launch
    #[serde(default)]
    pub debug: DebugSection,

    /// [tail] section - log tailing
    #[serde(default)]
    pub tail: TailSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DebugSection {
    /// Executable handed to the process launcher
    pub browser: Option<String>,

    /// Base URI the site is served from
    pub site_uri: Option<String>,

    /// Executables searched on PATH to decide whether a debugger browser exists
    pub browser_candidates: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TailSection {
    pub poll_interval_ms: Option<u64>,
    pub debounce_ms: Option<u64>,
}

impl NodetoolsToml {
    /// Load `nodetools.toml` from a project directory; missing file means defaults.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(PROJECT_CONFIG_FILE);
        Self::load_optional(&path)
    }

    /// Load a config file if it exists.
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(path.as_ref().to_path_buf(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }

    /// Layer `overlay` on top of `self`; keys set in `overlay` win.
    pub fn merged_with(self, overlay: NodetoolsToml) -> Self {
        Self {
            debug: DebugSection {
                browser: overlay.debug.browser.or(self.debug.browser),
                site_uri: overlay.debug.site_uri.or(self.debug.site_uri),
                browser_candidates: overlay
                    .debug
                    .browser_candidates
                    .or(self.debug.browser_candidates),
            },
            tail: TailSection {
                poll_interval_ms: overlay.tail.poll_interval_ms.or(self.tail.poll_interval_ms),
                debounce_ms: overlay.tail.debounce_ms.or(self.tail.debounce_ms),
            },
        }
    }
}
