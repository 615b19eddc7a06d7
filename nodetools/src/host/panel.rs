//! Terminal stand-ins for the host panel and notification surfaces.

use std::collections::HashSet;
use std::io::{self, Write};

use nodetools_core::{Notifier, PanelHost, WatchedLogTarget};
use tracing::warn;

use crate::output;

/// Panel host that streams the log tab to a writer (stdout by default).
pub struct TerminalPanel<W: Write> {
    out: W,
    tabs: HashSet<String>,
}

impl TerminalPanel<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalPanel<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            tabs: HashSet::new(),
        }
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> PanelHost for TerminalPanel<W> {
    fn tab_exists(&self, id: &str) -> bool {
        self.tabs.contains(id)
    }

    fn add_tab(&mut self, id: &str, title: &str, target: &WatchedLogTarget, _color: &str) {
        self.tabs.insert(id.to_string());
        output::step(&format!(
            "{} tab streaming {}",
            title,
            output::emphasized(&target.file_path().display().to_string())
        ));
    }

    fn remove_tab(&mut self, id: &str) {
        if self.tabs.remove(id) {
            output::muted("Log tab closed");
        }
    }

    fn append(&mut self, id: &str, bytes: &[u8]) {
        if !self.tabs.contains(id) {
            return;
        }
        if let Err(e) = self.out.write_all(bytes).and_then(|()| self.out.flush()) {
            warn!(error = %e, "failed to write log output");
        }
    }

    fn set_actions_visible(&mut self, visible: bool) {
        if visible {
            output::detail("Debug action available (nodetools debug)");
        } else {
            output::detail("Debug action hidden");
        }
    }
}

/// Notifications printed as terminal warnings.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, message: &str) {
        output::warning(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodetools_core::LOG_TAB_ID;
    use std::path::Path;

    #[test]
    fn append_writes_only_to_open_tab() {
        let mut panel = TerminalPanel::new(Vec::new());
        panel.append(LOG_TAB_ID, b"before\n");

        let target = WatchedLogTarget::for_entry(Path::new("/srv/site"), "server.js");
        panel.add_tab(LOG_TAB_ID, "Output", &target, "#556B2F");
        panel.append(LOG_TAB_ID, b"listening on 8080\n");
        panel.remove_tab(LOG_TAB_ID);
        panel.append(LOG_TAB_ID, b"after\n");

        assert_eq!(panel.writer().as_slice(), b"listening on 8080\n");
        assert!(!panel.tab_exists(LOG_TAB_ID));
    }

    #[test]
    fn status_lines_stay_out_of_log_stream() {
        let mut panel = TerminalPanel::new(Vec::new());
        let target = WatchedLogTarget::for_entry(Path::new("/srv/site"), "index.js");

        panel.add_tab(LOG_TAB_ID, "Output", &target, "#556B2F");
        panel.set_actions_visible(true);
        panel.append(LOG_TAB_ID, b"GET / 200\n");
        panel.set_actions_visible(false);
        TerminalNotifier.notify("Chrome is not installed! Node Inspector requires Chrome.");
        panel.remove_tab(LOG_TAB_ID);

        assert_eq!(panel.writer().as_slice(), b"GET / 200\n");
    }
}
