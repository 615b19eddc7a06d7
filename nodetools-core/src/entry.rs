//! Entry script resolution.
//!
//! Resolution runs an ordered list of probes and stops at the first one that
//! yields a name. When every probe misses, the resolver falls back to
//! [`DEFAULT_ENTRY`], which may not exist on disk; log path construction
//! tolerates that.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::project::decode_text;

pub const PACKAGE_JSON_FILE: &str = "package.json";
pub const DEFAULT_ENTRY: &str = "server.js";

/// Where a resolved entry script came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySource {
    /// `main` field of `package.json`
    Manifest,
    /// A conventional file found in the project root
    Conventional,
    /// Nothing matched
    Default,
}

impl EntrySource {
    pub fn id(self) -> &'static str {
        match self {
            EntrySource::Manifest => "package.json",
            EntrySource::Conventional => "conventional file",
            EntrySource::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub entry: String,
    pub source: EntrySource,
}

/// One step of entry resolution.
pub trait EntryProbe: Send + Sync {
    fn name(&self) -> &str;

    /// Return the entry script name, or `None` to fall through.
    fn probe(&self, root: &Path) -> Option<Resolution>;
}

/// Reads the `main` field of `package.json` verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestMainProbe;

impl EntryProbe for ManifestMainProbe {
    fn name(&self) -> &str {
        "manifest-main"
    }

    fn probe(&self, root: &Path) -> Option<Resolution> {
        let manifest_path = root.join(PACKAGE_JSON_FILE);
        if !manifest_path.is_file() {
            return None;
        }

        let raw = match fs::read(&manifest_path) {
            Ok(bytes) => decode_text(&bytes),
            Err(e) => {
                warn!(path = %manifest_path.display(), error = %e, "could not read package.json");
                return None;
            }
        };
        let parsed: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %manifest_path.display(), error = %e, "malformed package.json");
                return None;
            }
        };

        let main = parsed.get("main")?;
        let Some(main) = main.as_str() else {
            debug!(path = %manifest_path.display(), "package.json main is not a string");
            return None;
        };
        // An empty name would produce an unusable log path.
        if main.is_empty() {
            return None;
        }

        Some(Resolution {
            entry: main.to_string(),
            source: EntrySource::Manifest,
        })
    }
}

/// Matches when a file with a fixed name exists in the root.
#[derive(Debug, Clone)]
pub struct ConventionalFileProbe {
    file_name: String,
}

impl ConventionalFileProbe {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl EntryProbe for ConventionalFileProbe {
    fn name(&self) -> &str {
        &self.file_name
    }

    fn probe(&self, root: &Path) -> Option<Resolution> {
        root.join(&self.file_name).is_file().then(|| Resolution {
            entry: self.file_name.clone(),
            source: EntrySource::Conventional,
        })
    }
}

/// Ordered, never-failing entry script resolver.
pub struct EntryPointResolver {
    probes: Vec<Box<dyn EntryProbe>>,
    fallback: String,
}

impl Default for EntryPointResolver {
    fn default() -> Self {
        Self::new(
            vec![
                Box::new(ManifestMainProbe),
                Box::new(ConventionalFileProbe::new("server.js")),
                Box::new(ConventionalFileProbe::new("app.js")),
            ],
            DEFAULT_ENTRY,
        )
    }
}

impl std::fmt::Debug for EntryPointResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.probes.iter().map(|p| p.name()).collect();
        f.debug_struct("EntryPointResolver")
            .field("probes", &names)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl EntryPointResolver {
    pub fn new(probes: Vec<Box<dyn EntryProbe>>, fallback: impl Into<String>) -> Self {
        let fallback = fallback.into();
        let fallback = if fallback.is_empty() {
            DEFAULT_ENTRY.to_string()
        } else {
            fallback
        };
        Self { probes, fallback }
    }

    /// Resolve the entry script and report which probe matched.
    pub fn resolve_detailed(&self, root: &Path) -> Resolution {
        for probe in &self.probes {
            if let Some(resolution) = probe.probe(root) {
                debug!(
                    root = %root.display(),
                    probe = probe.name(),
                    entry = %resolution.entry,
                    "resolved entry script"
                );
                return resolution;
            }
        }

        debug!(root = %root.display(), entry = %self.fallback, "no probe matched; using default entry");
        Resolution {
            entry: self.fallback.clone(),
            source: EntrySource::Default,
        }
    }

    /// Resolve the entry script relative to `root`.
    pub fn resolve(&self, root: &Path) -> String {
        self.resolve_detailed(root).entry
    }
}

/// Resolve with the default probe order.
pub fn resolve(root: &Path) -> String {
    EntryPointResolver::default().resolve(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn manifest_main_is_returned_verbatim_even_if_missing() {
        let temp = TempDir::new().unwrap();
        write(&temp, "package.json", r#"{"name":"demo","main":"./lib/start.js"}"#);
        write(&temp, "server.js", "");

        let resolution = EntryPointResolver::default().resolve_detailed(temp.path());
        assert_eq!(resolution.entry, "./lib/start.js");
        assert_eq!(resolution.source, EntrySource::Manifest);
    }

    #[test]
    fn manifest_without_main_falls_through_to_server_js() {
        let temp = TempDir::new().unwrap();
        write(&temp, "package.json", r#"{"name":"demo"}"#);
        write(&temp, "server.js", "");
        write(&temp, "app.js", "");

        assert_eq!(resolve(temp.path()), "server.js");
    }

    #[test]
    fn malformed_manifest_falls_through_to_app_js() {
        let temp = TempDir::new().unwrap();
        write(&temp, "package.json", r#"{"main": "index.js""#);
        write(&temp, "app.js", "");

        let resolution = EntryPointResolver::default().resolve_detailed(temp.path());
        assert_eq!(resolution.entry, "app.js");
        assert_eq!(resolution.source, EntrySource::Conventional);
    }

    #[test]
    fn non_string_main_is_a_failed_probe() {
        let temp = TempDir::new().unwrap();
        write(&temp, "package.json", r#"{"main": 42}"#);
        write(&temp, "app.js", "");

        assert_eq!(resolve(temp.path()), "app.js");
    }

    #[test]
    fn manifest_with_utf8_bom_is_read() {
        let temp = TempDir::new().unwrap();
        let mut bytes = vec![0xef, 0xbb, 0xbf];
        bytes.extend_from_slice(br#"{"main":"index.js"}"#);
        std::fs::write(temp.path().join("package.json"), bytes).unwrap();

        assert_eq!(resolve(temp.path()), "index.js");
    }

    #[test]
    fn corrupt_manifest_bytes_do_not_fail_resolution() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("package.json"), [0xff, 0xfe, 0xfd]).unwrap();

        assert_eq!(resolve(temp.path()), "server.js");
    }

    #[test]
    fn empty_root_defaults_to_server_js() {
        let temp = TempDir::new().unwrap();
        let resolution = EntryPointResolver::default().resolve_detailed(temp.path());
        assert_eq!(resolution.entry, DEFAULT_ENTRY);
        assert_eq!(resolution.source, EntrySource::Default);
    }

    #[test]
    fn missing_root_defaults_to_server_js() {
        assert_eq!(resolve(Path::new("/definitely/not/a/project")), "server.js");
    }

    #[test]
    fn entry_directory_named_server_js_is_not_a_match() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("server.js")).unwrap();
        write(&temp, "app.js", "");

        assert_eq!(resolve(temp.path()), "app.js");
    }

    #[test]
    fn custom_probe_order_is_respected() {
        let temp = TempDir::new().unwrap();
        write(&temp, "server.js", "");
        write(&temp, "app.js", "");

        let resolver = EntryPointResolver::new(
            vec![
                Box::new(ConventionalFileProbe::new("app.js")),
                Box::new(ConventionalFileProbe::new("server.js")),
            ],
            "main.js",
        );
        assert_eq!(resolver.resolve(temp.path()), "app.js");
    }

    #[test]
    fn empty_fallback_is_replaced_with_default() {
        let resolver = EntryPointResolver::new(Vec::new(), "");
        assert_eq!(resolver.resolve(Path::new("")), DEFAULT_ENTRY);
    }
}
