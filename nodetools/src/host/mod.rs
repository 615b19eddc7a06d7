//! Terminal implementations of the host collaborators.

mod browser;
mod panel;
mod tail;

pub use browser::*;
pub use panel::*;
pub use tail::*;
