//! # codedust-core
//!
//! Line-based code hygiene inspection.
//!
//! Files are checked line by line against whitespace, indentation, length
//! and comment formatting rules. Every check sees the current line plus
//! one line of context on each side; nothing is tokenized or parsed.
//!
//! - [`RuleSet`] holds the resolved settings and rule toggles for one
//!   file extension, built by [`Config::rule_set`]
//! - [`inspect`] evaluates one [`LineContext`] against a rule set
//! - [`FileScan`] walks a file, honouring `CodeDust: SKIP/OFF/ON`
//!   directives
//! - [`Analyzer`] discovers files under root directories and scans them in
//!   parallel
//!
//! ## Example
//!
//! ```no_run
//! use codedust_core::{Analyzer, Config};
//!
//! let config = Config::from_file("codedust.ini".as_ref())?;
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .extension("py")
//!     .config(config)
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for violation in &result.violations {
//!     println!("{violation}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod inspector;
mod rule_code;
mod scanner;
mod types;

pub mod classify;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{resolve, Config, ConfigError, RuleSet, Section, Setting, DEFAULT_SECTION};
pub use context::{lines, Line, LineContext, SourceLines};
pub use inspector::{inspect, message, violates, Finding, Inspection};
pub use rule_code::{Category, RuleCode, UnknownRuleCode};
pub use scanner::{scan_file, scan_source, Directive, FileScan, ScanError, ScanState};
pub use types::{
    LintResult, Location, ReadFailure, Violation, ViolationDiagnostic, NOT_REENABLED_MESSAGE,
};
