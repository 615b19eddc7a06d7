//! Project classification and the per-evaluation project snapshot.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::entry::EntryPointResolver;
use crate::error::{ClassifyError, Result};

pub const WEB_CONFIG_FILE: &str = "web.config";

/// Handler registration that marks an iisnode-hosted site.
pub const NODE_HOST_MARKER: &str = "<add name=\"iisnode\"";

const LOG_DIR_SUFFIX: &str = ".logs";
const LOG_FILE_NAME: &str = "0.txt";

/// Decide whether `root` hosts a Node.js site.
///
/// An empty root is never a Node site. A missing `web.config` is not an
/// error; one that exists but cannot be read is. The file is decoded
/// leniently, so encoding problems never count as read failures.
pub fn classify(root: &Path) -> Result<bool> {
    if root.as_os_str().is_empty() {
        return Ok(false);
    }

    let config_path = root.join(WEB_CONFIG_FILE);
    let bytes = match fs::read(&config_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(root = %root.display(), "no web.config; not a node site");
            return Ok(false);
        }
        Err(source) => {
            return Err(ClassifyError::Read {
                path: config_path,
                source,
            });
        }
    };

    let is_node = decode_text(&bytes).contains(NODE_HOST_MARKER);
    debug!(root = %root.display(), is_node, "classified web.config");
    Ok(is_node)
}

/// Decode a text file the way editors do: honour a UTF-16 or UTF-8 byte
/// order mark, otherwise treat the bytes as UTF-8 and replace invalid
/// sequences.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    match bytes {
        [0xff, 0xfe, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xfe, 0xff, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xef, 0xbb, 0xbf, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Immutable result of evaluating a site root.
///
/// A new snapshot is produced for every site change; fields are never updated
/// independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectState {
    root: PathBuf,
    is_node_project: bool,
    entry_script: Option<String>,
}

impl ProjectState {
    /// Snapshot for "no site open".
    pub fn empty() -> Self {
        Self::default()
    }

    /// Classify `root` and, for Node sites, resolve the entry script.
    pub fn evaluate(root: &Path, resolver: &EntryPointResolver) -> Result<Self> {
        let is_node_project = classify(root)?;
        let entry_script = is_node_project.then(|| resolver.resolve(root));
        Ok(Self {
            root: root.to_path_buf(),
            is_node_project,
            entry_script,
        })
    }

    /// Same snapshot with the entry script resolved again from disk.
    pub fn with_entry(&self, resolver: &EntryPointResolver) -> Self {
        Self {
            root: self.root.clone(),
            is_node_project: self.is_node_project,
            entry_script: self.is_node_project.then(|| resolver.resolve(&self.root)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_node_project(&self) -> bool {
        self.is_node_project
    }

    pub fn entry_script(&self) -> Option<&str> {
        self.entry_script.as_deref()
    }

    pub fn has_root(&self) -> bool {
        !self.root.as_os_str().is_empty()
    }

    /// Whether a log tab should exist for this snapshot.
    pub fn should_show(&self) -> bool {
        self.is_node_project && self.has_root()
    }

    /// Log file target for this snapshot, if it is a Node site.
    pub fn log_target(&self) -> Option<WatchedLogTarget> {
        if !self.should_show() {
            return None;
        }
        let entry = self.entry_script.as_deref()?;
        Some(WatchedLogTarget::for_entry(&self.root, entry))
    }
}

/// The append-only log file streamed into the log tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchedLogTarget {
    file_path: PathBuf,
}

impl WatchedLogTarget {
    /// `{root}/{entry}.logs/0.txt`
    pub fn for_entry(root: &Path, entry: &str) -> Self {
        let log_dir = format!("{entry}{LOG_DIR_SUFFIX}");
        Self {
            file_path: root.join(log_dir).join(LOG_FILE_NAME),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Directory holding the log file.
    pub fn log_dir(&self) -> Option<&Path> {
        self.file_path.parent()
    }
}
