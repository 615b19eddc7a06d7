use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use nodetools_core::WorkspaceKind;

use crate::commands::{self, resolve_project_dir};

/// Exit status of `nodetools detect` for projects that are not Node sites.
pub const NOT_NODE_EXIT_CODE: i32 = 2;

/// nodetools - Node.js site detection, live logs and debugger launcher
#[derive(Parser)]
#[command(name = "nodetools")]
#[command(version, disable_version_flag = true)]
#[command(about = "nodetools - Node.js site detection, live logs and debugger launcher")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show version
    #[arg(long, global = true)]
    pub version: bool,

    /// Show verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

fn parse_workspace(value: &str) -> Result<WorkspaceKind, String> {
    WorkspaceKind::from_id(value)
        .ok_or_else(|| format!("unknown workspace '{value}' (expected editor, design or other)"))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a project is a Node site
    Detect {
        /// Project directory (defaults to current directory)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Show the resolved entry script and its log file
    Entry {
        /// Print a JSON report
        #[arg(long)]
        json: bool,

        /// Project directory (defaults to current directory)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Stream the entry script's log while the project is a Node site
    Watch {
        /// Workspace the log tab runs in
        #[arg(long, default_value = "editor", value_parser = parse_workspace)]
        workspace: WorkspaceKind,

        /// Project directory (defaults to current directory)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Open the Node inspector for the entry script in a browser
    Debug {
        /// Site base URI (overrides debug.site_uri)
        #[arg(long, env = "NODETOOLS_SITE_URI")]
        uri: Option<String>,

        /// Browser executable (overrides debug.browser)
        #[arg(long)]
        browser: Option<String>,

        /// Project directory (defaults to current directory)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

impl Cli {
    pub fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        if self.version {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }

        let Some(command) = self.command else {
            Cli::command().print_help()?;
            println!();
            return Ok(());
        };

        match command {
            Commands::Detect { dir } => {
                let project_dir = resolve_project_dir(dir.as_deref())?;
                if !commands::detect::run(&project_dir)? {
                    std::process::exit(NOT_NODE_EXIT_CODE);
                }
                Ok(())
            }
            Commands::Entry { json, dir } => {
                let project_dir = resolve_project_dir(dir.as_deref())?;
                commands::entry::run(&project_dir, json)
            }
            Commands::Watch { workspace, dir } => {
                let project_dir = resolve_project_dir(dir.as_deref())?;
                commands::watch::run(project_dir, workspace)
            }
            Commands::Debug { uri, browser, dir } => {
                let project_dir = resolve_project_dir(dir.as_deref())?;
                commands::debug::run(&project_dir, uri, browser)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_parses_optional_dir() {
        let cli = Cli::try_parse_from(["nodetools", "detect", "/srv/site"]).unwrap();
        let Some(Commands::Detect { dir }) = cli.command else {
            panic!("expected Detect");
        };
        assert_eq!(dir, Some(PathBuf::from("/srv/site")));
    }

    #[test]
    fn watch_defaults_to_editor_workspace() {
        let cli = Cli::try_parse_from(["nodetools", "watch"]).unwrap();
        let Some(Commands::Watch { workspace, dir }) = cli.command else {
            panic!("expected Watch");
        };
        assert_eq!(workspace, WorkspaceKind::Editor);
        assert!(dir.is_none());
    }

    #[test]
    fn watch_accepts_design_workspace() {
        let cli = Cli::try_parse_from(["nodetools", "watch", "--workspace", "design"]).unwrap();
        let Some(Commands::Watch { workspace, .. }) = cli.command else {
            panic!("expected Watch");
        };
        assert_eq!(workspace, WorkspaceKind::Design);
    }

    #[test]
    fn watch_accepts_other_workspace() {
        let cli = Cli::try_parse_from(["nodetools", "watch", "--workspace", "Other"]).unwrap();
        let Some(Commands::Watch { workspace, .. }) = cli.command else {
            panic!("expected Watch");
        };
        assert_eq!(workspace, WorkspaceKind::Other);
    }

    #[test]
    fn watch_rejects_unknown_workspace() {
        assert!(Cli::try_parse_from(["nodetools", "watch", "--workspace", "reports"]).is_err());
    }

    #[test]
    fn debug_parses_uri_and_browser() {
        let cli = Cli::try_parse_from([
            "nodetools",
            "debug",
            "--uri",
            "http://localhost:1337",
            "--browser",
            "chromium",
        ])
        .unwrap();
        let Some(Commands::Debug { uri, browser, dir }) = cli.command else {
            panic!("expected Debug");
        };
        assert_eq!(uri.as_deref(), Some("http://localhost:1337"));
        assert_eq!(browser.as_deref(), Some("chromium"));
        assert!(dir.is_none());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["nodetools", "entry", "-v", "--json"]).unwrap();
        assert!(cli.verbose);
    }
}
