//! Command-line argument parsing for taskbrew.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// A command console for programs, projects, tasks and subtasks.
#[derive(Parser, Debug)]
#[command(name = "taskbrew")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides the config file)
    #[arg(long, value_name = "PATH", env = "TASKBREW_DB")]
    pub db: Option<PathBuf>,

    /// Keep records in memory only (nothing is saved)
    #[arg(long, conflicts_with = "db")]
    pub memory: bool,

    /// Run lines from a script file instead of the console (use "-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Run a line instead of the console; may be repeated
    #[arg(short = 'e', long = "exec", value_name = "LINE")]
    pub exec: Vec<String>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// True when lines come from `--script` or `-e` rather than the keyboard.
    pub fn is_headless(&self) -> bool {
        self.script.is_some() || !self.exec.is_empty()
    }
}
