use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while classifying a project root
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClassifyError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ClassifyError::Read { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
