//! Collaborator interfaces implemented by the hosting application.

use std::io;

use crate::project::WatchedLogTarget;

/// Identifier reserved for the log output tab.
pub const LOG_TAB_ID: &str = "2f09fa84-888f-47c9-b333-b3501a0055b4";
pub const LOG_TAB_TITLE: &str = "Output";
/// Dark olive green
pub const LOG_TAB_COLOR: &str = "#556B2F";

/// Editing mode of the host workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkspaceKind {
    #[default]
    Editor,
    Design,
    Other,
}

impl WorkspaceKind {
    pub fn supports_editing(self) -> bool {
        matches!(self, WorkspaceKind::Editor)
    }

    pub fn from_id(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "editor" | "files" => Some(WorkspaceKind::Editor),
            "design" => Some(WorkspaceKind::Design),
            "other" => Some(WorkspaceKind::Other),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            WorkspaceKind::Editor => "editor",
            WorkspaceKind::Design => "design",
            WorkspaceKind::Other => "other",
        }
    }
}

/// Panel hosting surface.
pub trait PanelHost {
    fn tab_exists(&self, id: &str) -> bool;

    fn add_tab(&mut self, id: &str, title: &str, target: &WatchedLogTarget, color: &str);

    fn remove_tab(&mut self, id: &str);

    /// Append streamed log content to a tab.
    fn append(&mut self, id: &str, bytes: &[u8]);

    /// Show or hide the debug action group.
    fn set_actions_visible(&mut self, visible: bool);
}

pub trait Notifier {
    fn notify(&mut self, message: &str);
}

pub trait ProcessLauncher {
    fn launch_browser(&mut self, executable_hint: &str, url: &str) -> io::Result<()>;
}

pub trait BrowserProbe {
    fn is_debugger_browser_available(&self) -> bool;
}

impl<F: Fn() -> bool> BrowserProbe for F {
    fn is_debugger_browser_available(&self) -> bool {
        self()
    }
}

/// Live subscription to appended bytes of one log file.
///
/// Dropping the subscription stops delivery.
pub trait Subscription {}

/// Source of appended-bytes notifications.
///
/// Implementations deliver chunks tagged with `generation` to the dispatch
/// loop, which drops chunks whose generation is no longer current.
pub trait TailWatcher {
    type Subscription: Subscription;

    fn watch(&mut self, target: &WatchedLogTarget, generation: u64) -> io::Result<Self::Subscription>;
}
