//! nodetools core
//!
//! Detects Node.js sites from on-disk artifacts, resolves their entry script,
//! and drives the lifecycle of a live log tab bound to the entry's log file.
//!
//! Host integration (panels, notifications, process launch, browser
//! detection, file tailing) is expressed as traits in [`host`].

pub mod controller;
pub mod debug;
pub mod dispatch;
pub mod entry;
mod error;
pub mod host;
pub mod project;

pub use controller::{Effect, Env, Event, LogTabController, LogTabState, Transition};
pub use debug::{DebugAction, DebugLauncher, LaunchOutcome, debug_url};
pub use dispatch::Dispatcher;
pub use entry::{EntryPointResolver, EntryProbe, EntrySource, Resolution, resolve};
pub use error::*;
pub use host::*;
pub use project::{ProjectState, WatchedLogTarget, classify};
