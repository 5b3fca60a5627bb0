//! File scanning with inline suppression directives.
//!
//! A line ending in one of these markers controls the scanner:
//!
//! ```text
//! x = 1  # CodeDust: SKIP    <- this line is not inspected
//! # CodeDust: OFF            <- stop inspecting from here
//! # CodeDust: ON             <- resume inspecting
//! ```
//!
//! Skipped and suppressed lines still serve as neighbour context for the
//! lines around them. A file that ends while suppressed gets one extra
//! diagnostic pointing at the `OFF` marker.

use crate::config::RuleSet;
use crate::context::{lines, Line, LineContext};
use crate::inspector::{inspect, Inspection};
use crate::types::{Location, Violation};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const OFF_MARKER: &str = " CodeDust: OFF";
const ON_MARKER: &str = " CodeDust: ON";
const SKIP_MARKER: &str = " CodeDust: SKIP";

/// Errors that can occur while scanning a file.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The file could not be opened or decoded.
    #[error("Cannot read file {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Inline directive carried by a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Suppress inspection from this line on.
    Off,
    /// Resume inspection.
    On,
    /// Do not inspect this line.
    Skip,
}

impl Directive {
    /// Parses the directive a line ends with, if any.
    ///
    /// The marker must be the last text before the line break; an
    /// unterminated last line carries no directive.
    #[must_use]
    pub fn parse(line: &Line<'_>) -> Option<Self> {
        if !line.terminated {
            return None;
        }
        [
            (OFF_MARKER, Self::Off),
            (ON_MARKER, Self::On),
            (SKIP_MARKER, Self::Skip),
        ]
        .into_iter()
        .find(|(marker, _)| line.text.ends_with(marker))
        .map(|(_, directive)| directive)
    }
}

/// Per-file suppression state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Lines are inspected.
    #[default]
    Enabled,
    /// Lines are not inspected.
    Suppressed {
        /// 1-based line of the `OFF` marker that started suppression.
        since: usize,
    },
}

impl ScanState {
    /// Applies the directive of line `number` and returns whether that line
    /// should be inspected.
    pub fn advance(&mut self, number: usize, directive: Option<Directive>) -> bool {
        match directive {
            Some(Directive::Off) => *self = Self::Suppressed { since: number },
            Some(Directive::On) => *self = Self::Enabled,
            Some(Directive::Skip) | None => {}
        }
        *self == Self::Enabled && directive != Some(Directive::Skip)
    }

    /// Line where the still-open suppression began, if any.
    #[must_use]
    pub fn open_since(self) -> Option<usize> {
        match self {
            Self::Suppressed { since } => Some(since),
            Self::Enabled => None,
        }
    }
}

/// Lazy iterator over the violations of one file, in line order.
pub struct FileScan<'a> {
    path: &'a Path,
    lines: Vec<Line<'a>>,
    rules: &'a RuleSet,
    index: usize,
    state: ScanState,
    pending: Option<(LineContext<'a>, Inspection<'a, 'a>)>,
    finished: bool,
}

impl<'a> FileScan<'a> {
    /// Prepares a scan of `content`, reported under `path`.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, rules: &'a RuleSet) -> Self {
        Self {
            path,
            lines: lines(content).collect(),
            rules,
            index: 0,
            state: ScanState::default(),
            pending: None,
            finished: false,
        }
    }

    fn location(&self, line: &Line<'_>, number: usize) -> Location {
        Location::new(self.path.to_path_buf(), number).with_span(line.offset, line.text.len())
    }

    /// Emits the end-of-file diagnostic once, if suppression is still open.
    fn finish(&mut self) -> Option<Violation> {
        if self.finished {
            return None;
        }
        self.finished = true;
        let since = self.state.open_since()?;
        debug!(
            "{}: suppression opened on line {} was never closed",
            self.path.display(),
            since
        );
        let line = self.lines.get(since - 1).copied()?;
        Some(Violation::not_reenabled(self.location(&line, since)))
    }
}

impl Iterator for FileScan<'_> {
    type Item = Violation;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((ctx, inspection)) = &mut self.pending {
                if let Some(finding) = inspection.next() {
                    let ctx = *ctx;
                    let location = self.location(&ctx.current, ctx.number);
                    return Some(Violation::new(finding.code, location, finding.message));
                }
                self.pending = None;
            }

            let Some(ctx) = LineContext::at(&self.lines, self.index) else {
                return self.finish();
            };
            self.index += 1;

            if self
                .state
                .advance(ctx.number, Directive::parse(&ctx.current))
            {
                self.pending = Some((ctx, inspect(ctx, self.rules)));
            }
        }
    }
}

/// Scans in-memory content and collects its violations.
#[must_use]
pub fn scan_source(path: &Path, content: &str, rules: &RuleSet) -> Vec<Violation> {
    FileScan::new(path, content, rules).collect()
}

/// Reads and scans one file.
///
/// # Errors
///
/// Returns [`ScanError::Read`] if the file cannot be read as UTF-8 text.
/// No violations are reported for such a file.
pub fn scan_file(path: &Path, rules: &RuleSet) -> Result<Vec<Violation>, ScanError> {
    let content = std::fs::read_to_string(path).map_err(|e| ScanError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(scan_source(path, &content, rules))
}
