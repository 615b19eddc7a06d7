use std::path::Path;

use nodetools_core::{DebugLauncher, EntryPointResolver, LaunchOutcome, classify};

use crate::config::{Settings, validate_site_uri};
use crate::host::{CommandLauncher, PathBrowserProbe, TerminalNotifier};
use crate::output;

pub fn run(
    project_dir: &Path,
    uri: Option<String>,
    browser: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_for_project(project_dir)?;
    let site_uri = match uri.as_deref().map(str::trim) {
        Some(uri) => validate_site_uri("--uri", uri)?,
        None => settings.site_uri,
    };

    if !classify(project_dir)? {
        output::warning("Not a Node site; the debugger may not be reachable");
    }

    let launcher = DebugLauncher::new(browser.unwrap_or(settings.browser));

    let mut candidates = vec![launcher.executable().to_string()];
    candidates.extend(settings.browser_candidates.iter().cloned());
    let probe = PathBrowserProbe::new(candidates);

    let outcome = launcher.launch(
        &probe,
        &site_uri,
        project_dir,
        &EntryPointResolver::default(),
        &mut TerminalNotifier,
        &mut CommandLauncher::new(settings.browser_candidates),
    );

    // Missing browser and spawn failures were already reported to the user.
    if let LaunchOutcome::Launched { url } = outcome {
        output::success(&format!("Opened debugger at {}", output::emphasized(&url)));
    }
    Ok(())
}
