//! codedust CLI tool.
//!
//! Usage:
//! ```bash
//! codedust -e py -e js -p src [-p tests] [-i REGEX]... [-c codedust.ini]
//! codedust --list-rules
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Line-based code hygiene inspector
#[derive(Parser)]
#[command(name = "codedust")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File extension to inspect, without the dot (repeatable)
    #[arg(short, long = "extension", value_name = "EXT", required_unless_present = "list_rules")]
    pub extensions: Vec<String>,

    /// Root directory to search (repeatable)
    #[arg(short, long = "path", value_name = "DIR", required_unless_present = "list_rules")]
    pub paths: Vec<PathBuf>,

    /// Regular expression; matching file paths are skipped (repeatable)
    #[arg(short, long = "ignore", value_name = "REGEX")]
    pub ignores: Vec<String>,

    /// Path to an INI configuration file
    #[arg(short, long, env = "CODEDUST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Skip files excluded by .gitignore
    #[arg(long)]
    pub respect_gitignore: bool,

    /// Number of scanning threads (default: one per core)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// List available rules and exit
    #[arg(long)]
    pub list_rules: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format for inspection results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per issue plus a summary line.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// Annotated source snippets.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.list_rules {
        commands::list_rules::run();
        return Ok(());
    }

    commands::check::run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repeatable_flags_collect() {
        let cli = Cli::try_parse_from([
            "codedust", "-e", "py", "--extension", "js", "-p", "src", "-p", "lib", "-i", "gen",
        ])
        .unwrap();
        assert_eq!(cli.extensions, vec!["py", "js"]);
        assert_eq!(cli.paths, vec![PathBuf::from("src"), PathBuf::from("lib")]);
        assert_eq!(cli.ignores, vec!["gen"]);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn extension_and_path_are_required() {
        assert!(Cli::try_parse_from(["codedust", "-p", "src"]).is_err());
        assert!(Cli::try_parse_from(["codedust", "-e", "py"]).is_err());
    }

    #[test]
    fn list_rules_needs_nothing_else() {
        let cli = Cli::try_parse_from(["codedust", "--list-rules"]).unwrap();
        assert!(cli.list_rules);
        assert!(cli.extensions.is_empty());
    }
}
