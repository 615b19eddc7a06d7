use std::path::{Path, PathBuf};

use nodetools_core::{EntryPointResolver, WatchedLogTarget, classify};
use serde::Serialize;

use crate::output;

#[derive(Debug, Serialize)]
struct EntryReport {
    root: PathBuf,
    is_node: bool,
    entry: String,
    source: &'static str,
    log_path: PathBuf,
}

pub fn run(project_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let is_node = classify(project_dir)?;
    let resolution = EntryPointResolver::default().resolve_detailed(project_dir);
    let target = WatchedLogTarget::for_entry(project_dir, &resolution.entry);

    let report = EntryReport {
        root: project_dir.to_path_buf(),
        is_node,
        entry: resolution.entry,
        source: resolution.source.id(),
        log_path: target.file_path().to_path_buf(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::step(&format!(
        "Entry {} (from {})",
        output::emphasized(&report.entry),
        report.source
    ));
    output::step(&format!(
        "Log file {}",
        output::emphasized(&report.log_path.display().to_string())
    ));
    if !report.is_node {
        output::warning("Not a Node site; the log tab would not be shown");
    }
    Ok(())
}
