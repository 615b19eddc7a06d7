use std::path::Path;

use nodetools_core::classify;

use crate::output;

/// Print whether `project_dir` is a Node site. Returns the classification.
pub fn run(project_dir: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let is_node = classify(project_dir)?;
    let shown = output::emphasized(&project_dir.display().to_string());
    if is_node {
        output::success(&format!("{shown} is a Node site"));
    } else {
        output::warning(&format!("{shown} is not a Node site"));
        output::detail("Node sites register the iisnode handler in web.config");
    }
    Ok(is_node)
}
