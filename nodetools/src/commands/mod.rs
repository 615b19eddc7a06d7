pub mod debug;
pub mod detect;
pub mod entry;
pub mod watch;

use std::path::{Path, PathBuf};

/// Absolute, canonical project directory (defaults to the current directory).
pub fn resolve_project_dir(dir: Option<&Path>) -> std::io::Result<PathBuf> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    std::fs::canonicalize(&dir).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Project directory {} is not accessible: {e}", dir.display()),
        )
    })
}
