//! Remote debugger launch.

use std::path::Path;

use tracing::{info, warn};

use crate::entry::EntryPointResolver;
use crate::host::{BrowserProbe, Notifier, ProcessLauncher};

pub const DEFAULT_BROWSER: &str = "chrome";
pub const BROWSER_MISSING_MESSAGE: &str =
    "Chrome is not installed! Node Inspector requires Chrome.";

/// What a debug request resolves to before touching any collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugAction {
    Notify(String),
    OpenBrowser { executable: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    BrowserMissing,
    Launched { url: String },
    LaunchFailed { url: String, error: String },
}

/// `{base}/{entry}/debug`, without doubling a trailing slash on `base`.
pub fn debug_url(site_base_uri: &str, entry: &str) -> String {
    let base = site_base_uri.trim_end_matches('/');
    format!("{base}/{entry}/debug")
}

#[derive(Debug, Clone)]
pub struct DebugLauncher {
    executable: String,
}

impl Default for DebugLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_BROWSER)
    }
}

impl DebugLauncher {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn plan(
        &self,
        browser_installed: bool,
        site_base_uri: &str,
        root: &Path,
        resolver: &EntryPointResolver,
    ) -> DebugAction {
        if !browser_installed {
            return DebugAction::Notify(BROWSER_MISSING_MESSAGE.to_string());
        }

        let entry = resolver.resolve(root);
        DebugAction::OpenBrowser {
            executable: self.executable.clone(),
            url: debug_url(site_base_uri, &entry),
        }
    }

    /// Probe for the browser and open the debugger, reporting failures to
    /// `notifier`.
    pub fn launch(
        &self,
        probe: &dyn BrowserProbe,
        site_base_uri: &str,
        root: &Path,
        resolver: &EntryPointResolver,
        notifier: &mut dyn Notifier,
        launcher: &mut dyn ProcessLauncher,
    ) -> LaunchOutcome {
        let installed = probe.is_debugger_browser_available();
        match self.plan(installed, site_base_uri, root, resolver) {
            DebugAction::Notify(message) => {
                notifier.notify(&message);
                LaunchOutcome::BrowserMissing
            }
            DebugAction::OpenBrowser { executable, url } => {
                match launcher.launch_browser(&executable, &url) {
                    Ok(()) => {
                        info!(%url, browser = %executable, "opened debugger");
                        LaunchOutcome::Launched { url }
                    }
                    Err(e) => {
                        warn!(%url, browser = %executable, error = %e, "failed to open debugger");
                        notifier.notify(&format!("Could not start {executable}: {e}"));
                        LaunchOutcome::LaunchFailed {
                            url,
                            error: e.to_string(),
                        }
                    }
                }
            }
        }
    }
}
