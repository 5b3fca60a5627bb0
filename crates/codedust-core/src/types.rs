//! Core types for violations and results.

use crate::rule_code::RuleCode;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Serialize;
use std::path::PathBuf;

/// Message of the diagnostic emitted when a file ends while suppressed.
pub const NOT_REENABLED_MESSAGE: &str = "CodeDust should be re-enabled afterwards.";

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    /// File path as discovered.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Byte offset of the line in the file (for miette integration).
    pub offset: usize,
    /// Length of the line in bytes, line break excluded.
    pub length: usize,
}

impl Location {
    /// Creates a location for a whole line.
    #[must_use]
    pub fn new(file: PathBuf, line: usize) -> Self {
        Self {
            file,
            line,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A hygiene finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Rule code. `None` for scanner diagnostics that no rule owns, such as
    /// suppression that was never turned back on.
    pub code: Option<RuleCode>,
    /// Where the violation was found.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    /// Creates a violation of a rule.
    #[must_use]
    pub fn new(code: RuleCode, location: Location, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            location,
            message: message.into(),
        }
    }

    /// Creates the diagnostic for a suppression opened at `location` and
    /// never closed.
    #[must_use]
    pub fn not_reenabled(location: Location) -> Self {
        Self {
            code: None,
            location,
            message: NOT_REENABLED_MESSAGE.to_string(),
        }
    }

    /// Text shown in the code slot of reports.
    #[must_use]
    pub fn code_label(&self) -> &'static str {
        self.code.map_or("CodeDust", RuleCode::as_str)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}]: ({}) {}",
            self.location.file.display(),
            self.location.line,
            self.code_label(),
            self.message
        )
    }
}

/// A file that was discovered but could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadFailure {
    /// File that failed.
    pub path: PathBuf,
    /// Why it failed.
    pub message: String,
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{code}] {message}")]
pub struct ViolationDiagnostic {
    code: &'static str,
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
    #[help]
    help: Option<String>,
}

impl ViolationDiagnostic {
    /// Builds a diagnostic for `violation` against the file's `content`.
    #[must_use]
    pub fn new(violation: &Violation, content: String) -> Self {
        let location = &violation.location;
        let end = content.len();
        let offset = location.offset.min(end);
        let length = location.length.min(end - offset);
        Self {
            code: violation.code_label(),
            message: violation.message.clone(),
            source_code: NamedSource::new(location.file.display().to_string(), content),
            span: SourceSpan::from((offset, length)),
            label_message: violation
                .code
                .map_or("suppressed from here", RuleCode::name)
                .to_string(),
            help: violation.code.map(|c| c.description().to_string()),
        }
    }
}

/// Result of running an analysis.
#[derive(Debug, Default, Serialize)]
pub struct LintResult {
    /// All violations found, ordered by file then line.
    pub violations: Vec<Violation>,
    /// Files that could not be read.
    pub failures: Vec<ReadFailure>,
    /// Number of files scanned successfully.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reported issues, including scanner diagnostics.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if any violation was found.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Returns true if the run should exit non-zero.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.has_issues() || !self.failures.is_empty()
    }

    /// Counts violations of a single rule.
    #[must_use]
    pub fn count_of(&self, code: RuleCode) -> usize {
        self.violations
            .iter()
            .filter(|v| v.code == Some(code))
            .count()
    }

    /// Adds violations and failures from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.failures.extend(other.failures);
        self.files_checked += other.files_checked;
    }

    /// Sorts violations by file, then line. Order within a line is kept.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
        });
        self.failures.sort_by(|a, b| a.path.cmp(&b.path));
    }
}
