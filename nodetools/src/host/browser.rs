use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use nodetools_core::{BrowserProbe, ProcessLauncher};
use tracing::debug;

/// Looks for a debugger-capable browser among executables on `PATH`.
#[derive(Debug, Clone)]
pub struct PathBrowserProbe {
    candidates: Vec<String>,
    search_path: Option<std::ffi::OsString>,
}

impl PathBrowserProbe {
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            search_path: env::var_os("PATH"),
        }
    }

    #[cfg(test)]
    fn with_search_path(candidates: Vec<String>, search_path: &std::ffi::OsStr) -> Self {
        Self {
            candidates,
            search_path: Some(search_path.to_os_string()),
        }
    }

    pub fn find(&self) -> Option<PathBuf> {
        self.candidates
            .iter()
            .find_map(|name| find_executable(name, self.search_path.as_deref()))
    }
}

impl BrowserProbe for PathBrowserProbe {
    fn is_debugger_browser_available(&self) -> bool {
        let found = self.find();
        debug!(found = ?found, "debugger browser probe");
        found.is_some() || mac_app_bundle_installed()
    }
}

fn find_executable(name: &str, search_path: Option<&std::ffi::OsStr>) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }

    let paths = search_path?;
    env::split_paths(paths).find_map(|dir| {
        let full = dir.join(name);
        if full.is_file() {
            return Some(full);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{name}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

#[cfg(target_os = "macos")]
fn mac_app_bundle_installed() -> bool {
    Path::new("/Applications/Google Chrome.app").is_dir()
        || Path::new("/Applications/Chromium.app").is_dir()
}

#[cfg(not(target_os = "macos"))]
fn mac_app_bundle_installed() -> bool {
    false
}

/// Spawns the browser detached from the terminal.
///
/// When the hinted executable is not on `PATH`, the first available fallback
/// is used instead.
#[derive(Debug, Clone, Default)]
pub struct CommandLauncher {
    fallbacks: Vec<String>,
}

impl CommandLauncher {
    pub fn new(fallbacks: Vec<String>) -> Self {
        Self { fallbacks }
    }

    fn executable_for(&self, hint: &str) -> String {
        let search_path = env::var_os("PATH");
        if find_executable(hint, search_path.as_deref()).is_some() {
            return hint.to_string();
        }
        self.fallbacks
            .iter()
            .find_map(|name| find_executable(name, search_path.as_deref()))
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| hint.to_string())
    }
}

impl ProcessLauncher for CommandLauncher {
    fn launch_browser(&mut self, executable_hint: &str, url: &str) -> io::Result<()> {
        let executable = self.executable_for(executable_hint);
        debug!(%executable, %url, "spawning browser");
        Command::new(&executable)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn probe_finds_candidate_on_search_path() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("chromium"), "").unwrap();

        let probe = PathBrowserProbe::with_search_path(
            vec!["google-chrome".to_string(), "chromium".to_string()],
            temp.path().as_os_str(),
        );
        assert_eq!(probe.find(), Some(temp.path().join("chromium")));
    }

    #[test]
    fn probe_misses_when_no_candidate_exists() {
        let temp = TempDir::new().unwrap();
        let probe = PathBrowserProbe::with_search_path(
            vec!["google-chrome".to_string()],
            temp.path().as_os_str(),
        );
        assert_eq!(probe.find(), None);
    }

    #[test]
    fn probe_accepts_explicit_executable_path() {
        let temp = TempDir::new().unwrap();
        let exe = temp.path().join("my-browser");
        std::fs::write(&exe, "").unwrap();

        let probe = PathBrowserProbe::with_search_path(
            vec![exe.display().to_string()],
            std::ffi::OsStr::new(""),
        );
        assert_eq!(probe.find(), Some(exe));
    }

    #[test]
    fn launching_missing_executable_fails() {
        let mut launcher = CommandLauncher::default();
        let result = launcher.launch_browser(
            "/definitely/not/a/browser",
            "http://localhost:8080/server.js/debug",
        );
        assert!(result.is_err());
    }
}
