//! Log tab lifecycle controller.
//!
//! [`LogTabController::update`] is a pure transition: it takes the current
//! controller value and an event and returns the next value plus the effects
//! a dispatcher must apply. The current value is never modified, so a failed
//! classification leaves the previous state fully in place.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::entry::EntryPointResolver;
use crate::error::Result;
use crate::host::{LOG_TAB_COLOR, LOG_TAB_ID, LOG_TAB_TITLE, WorkspaceKind};
use crate::project::{ProjectState, WatchedLogTarget};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogTabState {
    #[default]
    Absent,
    Present(WatchedLogTarget),
}

impl LogTabState {
    pub fn is_present(&self) -> bool {
        matches!(self, LogTabState::Present(_))
    }

    pub fn target(&self) -> Option<&WatchedLogTarget> {
        match self {
            LogTabState::Present(target) => Some(target),
            LogTabState::Absent => None,
        }
    }
}

/// Host notifications driving the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Host finished loading. `site_path` is `None` when no site is open.
    Initialize {
        site_path: Option<PathBuf>,
        workspace: WorkspaceKind,
    },
    WorkspaceChanged(WorkspaceKind),
    SiteChanged {
        site_path: Option<PathBuf>,
    },
    /// Editor page focus moved.
    PageChanged,
}

/// Side effects computed by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AddTab {
        id: &'static str,
        title: &'static str,
        color: &'static str,
        target: WatchedLogTarget,
    },
    RemoveTab {
        id: &'static str,
    },
    /// The tab stays; its tail subscription must move to `target`.
    Retarget {
        target: WatchedLogTarget,
    },
    SetActionsVisible(bool),
}

/// Inputs a transition reads but does not own.
pub struct Env<'a> {
    pub resolver: &'a EntryPointResolver,
    /// Whether the host currently holds a tab with [`LOG_TAB_ID`].
    pub tab_exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub controller: LogTabController,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogTabController {
    project: ProjectState,
    workspace: WorkspaceKind,
    /// Last visibility pushed to the host; `None` before the first push.
    actions_visible: Option<bool>,
    tab: LogTabState,
}

impl LogTabController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&self) -> &ProjectState {
        &self.project
    }

    pub fn workspace(&self) -> WorkspaceKind {
        self.workspace
    }

    pub fn tab(&self) -> &LogTabState {
        &self.tab
    }

    pub fn actions_visible(&self) -> bool {
        self.actions_visible.unwrap_or(false)
    }

    /// Whether the user can currently see the log tab.
    pub fn is_shown(&self) -> bool {
        self.tab.is_present() && self.workspace.supports_editing()
    }

    pub fn update(&self, event: Event, env: &Env<'_>) -> Result<Transition> {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match event {
            Event::Initialize {
                site_path,
                workspace,
            } => {
                next.workspace = workspace;
                next.project = evaluate_site(site_path, env.resolver)?;
                next.sync_actions(&mut effects);
                next.sync_tab(env.tab_exists, &mut effects);
            }
            Event::WorkspaceChanged(workspace) => {
                next.workspace = workspace;
                next.sync_actions(&mut effects);
            }
            Event::SiteChanged { site_path } => {
                next.project = evaluate_site(site_path, env.resolver)?;
                next.sync_actions(&mut effects);
                next.sync_tab(env.tab_exists, &mut effects);
            }
            Event::PageChanged => {
                if next.project.should_show() {
                    next.project = next.project.with_entry(env.resolver);
                }
                next.sync_tab(env.tab_exists, &mut effects);
            }
        }

        debug!(
            tab_present = next.tab.is_present(),
            effects = effects.len(),
            "log tab transition"
        );
        Ok(Transition {
            controller: next,
            effects,
        })
    }

    fn sync_actions(&mut self, effects: &mut Vec<Effect>) {
        let visible = self.workspace.supports_editing() && self.project.is_node_project();
        if self.actions_visible != Some(visible) {
            self.actions_visible = Some(visible);
            effects.push(Effect::SetActionsVisible(visible));
        }
    }

    fn sync_tab(&mut self, tab_exists: bool, effects: &mut Vec<Effect>) {
        match (self.project.log_target(), tab_exists) {
            (Some(target), false) => {
                info!(path = %target.file_path().display(), "creating log tab");
                effects.push(Effect::AddTab {
                    id: LOG_TAB_ID,
                    title: LOG_TAB_TITLE,
                    color: LOG_TAB_COLOR,
                    target: target.clone(),
                });
                self.tab = LogTabState::Present(target);
            }
            (Some(target), true) => {
                if self.tab.target() != Some(&target) {
                    debug!(path = %target.file_path().display(), "log target changed");
                    effects.push(Effect::Retarget {
                        target: target.clone(),
                    });
                    self.tab = LogTabState::Present(target);
                }
            }
            (None, true) => {
                info!("removing log tab");
                effects.push(Effect::RemoveTab { id: LOG_TAB_ID });
                self.tab = LogTabState::Absent;
            }
            (None, false) => {
                self.tab = LogTabState::Absent;
            }
        }
    }
}

fn evaluate_site(site_path: Option<PathBuf>, resolver: &EntryPointResolver) -> Result<ProjectState> {
    match site_path {
        Some(path) if !path.as_os_str().is_empty() => ProjectState::evaluate(&path, resolver),
        _ => Ok(ProjectState::empty()),
    }
}
