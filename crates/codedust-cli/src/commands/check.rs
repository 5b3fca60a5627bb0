//! Check command implementation.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::CommandFactory;
use codedust_core::{Analyzer, AnalyzerError, Config, ConfigError, LintResult};
use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use crate::Cli;

/// Runs an inspection and exits non-zero if anything was found.
pub fn run(cli: &Cli) -> Result<()> {
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => usage_error(e),
    };

    let mut builder = Analyzer::builder()
        .extensions(cli.extensions.iter().cloned())
        .config(config)
        .respect_gitignore(cli.respect_gitignore)
        .parallelism(cli.jobs);
    for root in &cli.paths {
        builder = builder.root(root);
    }
    for pattern in &cli.ignores {
        builder = builder.ignore(pattern);
    }

    let analyzer = match builder.build() {
        Ok(analyzer) => analyzer,
        Err(e) if is_usage_error(&e) => usage_error(e),
        Err(e) => return Err(e).context("Failed to build analyzer"),
    };

    tracing::info!(
        "Inspecting {} root(s) for {} extension(s)",
        analyzer.roots().len(),
        analyzer.extension_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, cli.format)?;
    report_failures(&mut std::io::stderr().lock(), &result)?;

    if result.is_failure() {
        std::process::exit(1);
    }

    Ok(())
}

/// Loads the file given with `--config`; built-in defaults otherwise.
fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };
    tracing::debug!("Using config: {}", path.display());
    Config::from_file(path)
}

/// Build errors caused by the command line rather than the environment.
fn is_usage_error(error: &AnalyzerError) -> bool {
    matches!(
        error,
        AnalyzerError::NotADirectory(_) | AnalyzerError::Ignore { .. } | AnalyzerError::Config(_)
    )
}

fn report_failures(out: &mut impl Write, result: &LintResult) -> Result<()> {
    for failure in &result.failures {
        writeln!(
            out,
            "Cannot read file {}: {}",
            failure.path.display(),
            failure.message
        )?;
    }
    Ok(())
}

/// Prints a usage error and exits with clap's usage status (2).
fn usage_error(message: impl Display) -> ! {
    Cli::command().error(ErrorKind::ValueValidation, message).exit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use codedust_core::{ReadFailure, RuleCode};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_config_flag() {
        let config = load_config(None).unwrap();
        assert!(config.section("default").is_none());
        let py = config.rule_set("py").unwrap();
        assert!(RuleCode::ALL.iter().all(|c| py.is_enabled(*c)));
    }

    #[test]
    fn explicit_config_is_loaded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rules.ini");
        std::fs::write(&path, "[py]\nCD0202 = disable\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert!(!config.rule_set("py").unwrap().is_enabled(RuleCode::Cd0202));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(Some(&tmp.path().join("absent.ini"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn bad_root_is_a_usage_error() {
        let tmp = TempDir::new().unwrap();
        let err = Analyzer::builder()
            .root(tmp.path().join("missing"))
            .build()
            .err()
            .unwrap();
        assert!(is_usage_error(&err));
        assert!(err.to_string().starts_with("Path not found: '"));
    }

    #[test]
    fn each_failure_is_reported_once() {
        let mut result = LintResult::new();
        result.failures.push(ReadFailure {
            path: PathBuf::from("a.py"),
            message: "stream did not contain valid UTF-8".to_string(),
        });

        let mut buf = Vec::new();
        report_failures(&mut buf, &result).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Cannot read file a.py: stream did not contain valid UTF-8\n"
        );
    }
}
