//! Multi-file analysis: discovery, parallel scanning and merging.

use crate::config::{Config, ConfigError, RuleSet};
use crate::scanner::{scan_file, ScanError};
use crate::types::{LintResult, ReadFailure, Violation};

use rayon::prelude::*;
use regex::Regex;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while setting up or running an analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A root path is missing or not a directory.
    #[error("Path not found: '{}'", .0.display())]
    NotADirectory(PathBuf),

    /// An ignore pattern is not a valid regular expression.
    #[error("Invalid ignore pattern {pattern:?}: {source}")]
    Ignore {
        /// The pattern as given.
        pattern: String,
        /// Regex compilation error.
        source: regex::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    roots: Vec<PathBuf>,
    extensions: Vec<String>,
    ignore_patterns: Vec<String>,
    config: Option<Config>,
    rule_sets: HashMap<String, RuleSet>,
    respect_gitignore: bool,
    parallelism: Option<usize>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root directory to walk.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.roots.push(path.into());
        self
    }

    /// Adds a file extension to inspect (without the dot).
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.push(extension.into());
        self
    }

    /// Adds multiple file extensions.
    #[must_use]
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions
            .extend(extensions.into_iter().map(Into::into));
        self
    }

    /// Adds a regular expression; files whose path matches it are skipped.
    #[must_use]
    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration rule sets are resolved from.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses `rules` for `extension` instead of resolving from configuration.
    #[must_use]
    pub fn rule_set(mut self, extension: impl Into<String>, rules: RuleSet) -> Self {
        self.rule_sets.insert(extension.into(), rules);
        self
    }

    /// Sets whether `.gitignore` files are honoured (default: false).
    #[must_use]
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Sets the number of scanning threads. `None` uses rayon's default.
    #[must_use]
    pub fn parallelism(mut self, threads: Option<usize>) -> Self {
        self.parallelism = threads;
        self
    }

    /// Builds the analyzer, resolving one rule set per extension.
    ///
    /// # Errors
    ///
    /// Returns an error if a root is not a directory, an ignore pattern is
    /// invalid, or configuration does not resolve.
    pub fn build(mut self) -> Result<Analyzer, AnalyzerError> {
        if let Some(root) = self.roots.iter().find(|root| !root.is_dir()) {
            return Err(AnalyzerError::NotADirectory(root.clone()));
        }

        let ignore_patterns = self
            .ignore_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| AnalyzerError::Ignore {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let config = self.config.unwrap_or_default();
        let mut rule_sets = HashMap::new();
        for extension in normalize_extensions(&self.extensions) {
            let rules = match self.rule_sets.remove(&extension) {
                Some(rules) => rules,
                None => config.rule_set(&extension)?,
            };
            debug!("Rules for .{}: {:?}", extension, rules);
            rule_sets.insert(extension, rules);
        }

        Ok(Analyzer {
            roots: self.roots,
            rule_sets,
            ignore_patterns,
            respect_gitignore: self.respect_gitignore,
            parallelism: self.parallelism,
        })
    }
}

/// Trims whitespace and a leading dot, drops blanks and duplicates.
fn normalize_extensions(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for ext in raw {
        let ext = ext.trim();
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        if !ext.is_empty() && !out.iter().any(|seen| seen == ext) {
            out.push(ext.to_string());
        }
    }
    out
}

/// Drives file discovery and scanning across root directories.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    roots: Vec<PathBuf>,
    rule_sets: HashMap<String, RuleSet>,
    ignore_patterns: Vec<Regex>,
    respect_gitignore: bool,
    parallelism: Option<usize>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Root directories being analyzed.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// The resolved rule set for `extension`.
    #[must_use]
    pub fn rule_set(&self, extension: &str) -> Option<&RuleSet> {
        self.rule_sets.get(extension)
    }

    /// Number of extensions being inspected.
    #[must_use]
    pub fn extension_count(&self) -> usize {
        self.rule_sets.len()
    }

    /// Discovers and scans all matching files.
    ///
    /// Files that cannot be read are recorded in [`LintResult::failures`]
    /// and do not stop the run.
    ///
    /// # Errors
    ///
    /// Returns an error only if the worker pool cannot be started.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis of {} root(s)", self.roots.len());

        let files = self.discover_files();
        info!("Found {} files to inspect", files.len());

        let outcomes = match self.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(|| scan_all(&files)),
            None => scan_all(&files),
        };

        let mut result = LintResult::new();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(ScanError::Read { source, .. }) => {
                    debug!("Cannot read file {}: {}", path.display(), source);
                    result.failures.push(ReadFailure {
                        path,
                        message: source.to_string(),
                    });
                }
            }
        }
        result.sort();

        info!(
            "Analysis complete: {} issue(s) in {} file(s)",
            result.issue_count(),
            result.files_checked
        );

        Ok(result)
    }

    /// Lists candidate files with the rule set that applies to each.
    #[must_use]
    pub fn discover_files(&self) -> Vec<(PathBuf, &RuleSet)> {
        let mut files = Vec::new();
        for root in &self.roots {
            for path in self.walk(root) {
                if self.should_ignore(&path) {
                    debug!("Ignoring: {}", path.display());
                    continue;
                }
                if let Some(rules) = self.rules_for(&path) {
                    files.push((path, rules));
                }
            }
        }
        files
    }

    fn walk(&self, root: &Path) -> Vec<PathBuf> {
        if self.respect_gitignore {
            ignore::WalkBuilder::new(root)
                .git_ignore(true)
                .git_global(true)
                .git_exclude(true)
                .require_git(false)
                .hidden(false)
                .parents(false)
                .sort_by_file_name(|a, b| a.cmp(b))
                .build()
                .filter_map(|entry| entry.map_err(|e| warn!("Skipping entry: {}", e)).ok())
                .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
                .map(ignore::DirEntry::into_path)
                .collect()
        } else {
            walkdir::WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.map_err(|e| warn!("Skipping entry: {}", e)).ok())
                .filter(|e| e.file_type().is_file())
                .map(walkdir::DirEntry::into_path)
                .collect()
        }
    }

    /// Checks if a path matches any ignore pattern.
    #[must_use]
    pub fn should_ignore(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.ignore_patterns
            .iter()
            .any(|pattern| pattern.is_match(&path_str))
    }

    fn rules_for(&self, path: &Path) -> Option<&RuleSet> {
        path.extension()
            .and_then(OsStr::to_str)
            .and_then(|ext| self.rule_sets.get(ext))
    }
}

type Outcome = (PathBuf, Result<Vec<Violation>, ScanError>);

fn scan_all(files: &[(PathBuf, &RuleSet)]) -> Vec<Outcome> {
    files
        .par_iter()
        .map(|(path, rules)| {
            debug!("Inspecting: {}", path.display());
            (path.clone(), scan_file(path, rules))
        })
        .collect()
}
