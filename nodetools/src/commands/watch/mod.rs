//! `nodetools watch`
//!
//! Runs the log tab controller against the terminal:
//! - classifies the project and opens the log tab for Node sites
//! - re-evaluates when `web.config`, `package.json` or a conventional entry changes
//! - streams the entry's log file to stdout until Ctrl+c

mod site_watcher;

use std::path::{Path, PathBuf};

use nodetools_core::{Dispatcher, EntryPointResolver, Event, WorkspaceKind};
use tokio::sync::mpsc;
use tracing::info;

use crate::config::Settings;
use crate::host::{NotifyTailWatcher, TailChunk, TerminalPanel};
use crate::output;

use site_watcher::SiteWatcher;

const TAIL_CHANNEL_CAPACITY: usize = 64;

pub fn run(project_dir: PathBuf, workspace: WorkspaceKind) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_async(project_dir, workspace))
}

async fn run_async(
    project_dir: PathBuf,
    workspace: WorkspaceKind,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_for_project(&project_dir)?;

    let (tail_tx, mut tail_rx) = mpsc::channel::<TailChunk>(TAIL_CHANNEL_CAPACITY);
    let (site_tx, mut site_rx) = mpsc::channel::<()>(8);

    let watcher = NotifyTailWatcher::new(tail_tx, settings.poll_interval, settings.debounce);
    let mut dispatcher = Dispatcher::new(
        TerminalPanel::stdout(),
        watcher,
        EntryPointResolver::default(),
    );

    output::section("Watch");
    dispatcher.handle(Event::Initialize {
        site_path: Some(project_dir.clone()),
        workspace,
    })?;
    report_site(&dispatcher, &project_dir);

    let _site_watcher = SiteWatcher::new(project_dir.clone(), settings.debounce, site_tx).start()?;
    output::muted("Ctrl+c to stop");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("stopping watch");
                break;
            }
            Some(()) = site_rx.recv() => {
                let was_node = dispatcher.controller().project().is_node_project();
                let event = Event::SiteChanged { site_path: Some(project_dir.clone()) };
                // Keep the previous tab state when the site cannot be classified.
                if let Err(e) = dispatcher.handle(event) {
                    output::warning(&e.to_string());
                    continue;
                }
                if was_node != dispatcher.controller().project().is_node_project() {
                    report_site(&dispatcher, &project_dir);
                }
            }
            Some(chunk) = tail_rx.recv() => {
                dispatcher.on_tail_chunk(chunk.generation, &chunk.bytes);
            }
        }
    }

    Ok(())
}

fn report_site<P, W>(dispatcher: &Dispatcher<P, W>, project_dir: &Path)
where
    P: nodetools_core::PanelHost,
    W: nodetools_core::TailWatcher,
{
    let controller = dispatcher.controller();
    if controller.project().is_node_project() {
        let entry = controller.project().entry_script().unwrap_or_default();
        output::success(&format!(
            "Node site detected, entry {}",
            output::emphasized(entry)
        ));
        if !controller.is_shown() {
            output::muted(&format!(
                "Workspace '{}' does not support editing; log tab and debug action are hidden",
                controller.workspace().id()
            ));
        } else if controller.actions_visible() {
            output::muted("Run `nodetools debug` to open the Node inspector");
        }
    } else {
        output::warning(&format!(
            "{} is not a Node site (no iisnode handler in web.config); waiting for changes",
            project_dir.display()
        ));
    }
}
