//! Site watcher for `nodetools watch`.
//!
//! Watches the files in the project root that classification and entry
//! resolution read.

use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use nodetools_core::entry::PACKAGE_JSON_FILE;
use nodetools_core::project::WEB_CONFIG_FILE;
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Handle that keeps the watcher alive
pub struct WatcherHandle {
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
    _thread: std::thread::JoinHandle<()>,
}

/// Reports create/update/delete of the files that decide classification and
/// entry resolution.
pub struct SiteWatcher {
    project_dir: PathBuf,
    debounce: Duration,
    changed_tx: mpsc::Sender<()>,
}

impl SiteWatcher {
    pub fn new(project_dir: PathBuf, debounce: Duration, changed_tx: mpsc::Sender<()>) -> Self {
        Self {
            project_dir,
            debounce,
            changed_tx,
        }
    }

    pub fn start(self) -> Result<WatcherHandle, Box<dyn std::error::Error>> {
        let (tx, rx) = std_mpsc::channel();
        let mut debouncer = new_debouncer(self.debounce, tx)?;

        // Non-recursive so `node_modules` churn never reaches us.
        debouncer
            .watcher()
            .watch(&self.project_dir, RecursiveMode::NonRecursive)?;

        let changed_tx = self.changed_tx.clone();
        let project_dir = self.project_dir.clone();
        let handle = std::thread::spawn(move || {
            for result in rx {
                match result {
                    Ok(events) => {
                        if events
                            .iter()
                            .any(|event| is_site_file(&project_dir, &event.path))
                        {
                            let _ = changed_tx.blocking_send(());
                        }
                    }
                    Err(e) => {
                        warn!(error = ?e, "site watch error");
                    }
                }
            }
        });

        Ok(WatcherHandle {
            _debouncer: debouncer,
            _thread: handle,
        })
    }
}

const SITE_FILES: &[&str] = &[WEB_CONFIG_FILE, PACKAGE_JSON_FILE, "server.js", "app.js"];

/// Some platforms report directory-level events; those count as a hint to
/// re-check the site.
fn is_site_file(project_dir: &Path, path: &Path) -> bool {
    path == project_dir
        || SITE_FILES
            .iter()
            .any(|name| path == project_dir.join(name))
}
