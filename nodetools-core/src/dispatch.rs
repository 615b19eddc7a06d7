//! Single-threaded event dispatch.
//!
//! The dispatcher owns the controller value, runs transitions, then applies
//! the resulting effects to the panel host and the tail watcher. Tail chunks
//! come back through [`Dispatcher::on_tail_chunk`] on the same thread.

use tracing::{debug, warn};

use crate::controller::{Effect, Env, Event, LogTabController};
use crate::entry::EntryPointResolver;
use crate::error::Result;
use crate::host::{LOG_TAB_ID, PanelHost, TailWatcher};
use crate::project::WatchedLogTarget;

pub struct Dispatcher<P: PanelHost, W: TailWatcher> {
    controller: LogTabController,
    resolver: EntryPointResolver,
    panel: P,
    watcher: W,
    subscription: Option<W::Subscription>,
    generation: u64,
}

impl<P: PanelHost, W: TailWatcher> Dispatcher<P, W> {
    pub fn new(panel: P, watcher: W, resolver: EntryPointResolver) -> Self {
        Self {
            controller: LogTabController::new(),
            resolver,
            panel,
            watcher,
            subscription: None,
            generation: 0,
        }
    }

    pub fn controller(&self) -> &LogTabController {
        &self.controller
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Generation of the live tail subscription, if any.
    pub fn active_generation(&self) -> Option<u64> {
        self.subscription.as_ref().map(|_| self.generation)
    }

    /// Run one event to completion.
    ///
    /// On error the controller keeps its previous value and no effect is
    /// applied.
    pub fn handle(&mut self, event: Event) -> Result<Vec<Effect>> {
        let env = Env {
            resolver: &self.resolver,
            tab_exists: self.panel.tab_exists(LOG_TAB_ID),
        };
        let transition = self.controller.update(event, &env)?;
        self.controller = transition.controller;
        for effect in &transition.effects {
            self.apply(effect);
        }
        Ok(transition.effects)
    }

    /// Deliver appended log bytes. Chunks from a superseded subscription are
    /// dropped.
    pub fn on_tail_chunk(&mut self, generation: u64, bytes: &[u8]) {
        if self.active_generation() != Some(generation) {
            debug!(generation, current = self.generation, "dropping stale tail chunk");
            return;
        }
        if bytes.is_empty() || !self.panel.tab_exists(LOG_TAB_ID) {
            return;
        }
        self.panel.append(LOG_TAB_ID, bytes);
    }

    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::AddTab {
                id,
                title,
                color,
                target,
            } => {
                self.panel.add_tab(id, title, target, color);
                self.subscribe(target);
            }
            Effect::RemoveTab { id } => {
                self.subscription = None;
                self.panel.remove_tab(id);
            }
            Effect::Retarget { target } => self.subscribe(target),
            Effect::SetActionsVisible(visible) => self.panel.set_actions_visible(*visible),
        }
    }

    fn subscribe(&mut self, target: &WatchedLogTarget) {
        // Drop the old subscription before starting the next one.
        self.subscription = None;
        self.generation += 1;
        match self.watcher.watch(target, self.generation) {
            Ok(subscription) => self.subscription = Some(subscription),
            Err(e) => warn!(
                path = %target.file_path().display(),
                error = %e,
                "could not watch log file"
            ),
        }
    }
}
