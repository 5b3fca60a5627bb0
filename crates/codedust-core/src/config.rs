//! Rule configuration: the typed [`RuleSet`] and the INI resolver.
//!
//! A configuration file holds one `[default]` section and one section per
//! file extension:
//!
//! ```ini
//! [default]
//! max_line_length = 100
//! CD0201 = disable
//!
//! [py]
//! line_comment = #
//!
//! [js]
//! line_comment = //
//! indent_size = 2
//! ```
//!
//! Resolution order (later wins): built-in defaults, `[default]`, then the
//! extension's own section.

use crate::rule_code::RuleCode;
use ini::Ini;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the section shared by every extension.
pub const DEFAULT_SECTION: &str = "default";

/// Value that disables a rule code. Anything else keeps it enabled.
const DISABLE: &str = "disable";

/// A setting the resolver does not recognise, kept as an opaque value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Setting {
    /// Value that parsed as an integer.
    Int(i64),
    /// Any other text value.
    Str(String),
    /// Toggle for a code-shaped key with no known rule.
    Bool(bool),
}

/// Fully resolved rules for one file extension.
///
/// Immutable once built; shared read-only across scanning threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    /// Spaces per indentation level.
    pub indent_size: usize,
    /// Maximum line length in characters, trailing whitespace excluded.
    pub max_line_length: usize,
    /// Required length of a section header line.
    pub section_header_length: usize,
    /// Line comment marker (e.g. `#` or `//`). Comment rules need it.
    pub line_comment: Option<String>,
    #[serde(skip)]
    enabled: [bool; RuleCode::COUNT],
    /// Keys with no built-in meaning, passed through as-is.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Setting>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            indent_size: 4,
            max_line_length: 120,
            section_header_length: 100,
            line_comment: None,
            enabled: [true; RuleCode::COUNT],
            extra: BTreeMap::new(),
        }
    }
}

impl RuleSet {
    /// Creates a rule set with built-in defaults and every rule enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true unless `code` was explicitly disabled.
    #[must_use]
    pub fn is_enabled(&self, code: RuleCode) -> bool {
        self.enabled[code.index()]
    }

    /// Enables or disables a single rule code.
    pub fn set_enabled(&mut self, code: RuleCode, enabled: bool) {
        self.enabled[code.index()] = enabled;
    }

    /// Returns the codes that are currently disabled.
    #[must_use]
    pub fn disabled(&self) -> Vec<RuleCode> {
        RuleCode::ALL
            .into_iter()
            .filter(|code| !self.is_enabled(*code))
            .collect()
    }

    /// Sets the indentation size.
    #[must_use]
    pub fn with_indent_size(mut self, size: usize) -> Self {
        self.indent_size = size;
        self
    }

    /// Sets the maximum line length.
    #[must_use]
    pub fn with_max_line_length(mut self, length: usize) -> Self {
        self.max_line_length = length;
        self
    }

    /// Sets the section header length.
    #[must_use]
    pub fn with_section_header_length(mut self, length: usize) -> Self {
        self.section_header_length = length;
        self
    }

    /// Sets the line comment marker. An empty marker means none.
    #[must_use]
    pub fn with_line_comment(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        self.line_comment = (!marker.is_empty()).then_some(marker);
        self
    }

    /// Disables a rule code.
    #[must_use]
    pub fn disable(mut self, code: RuleCode) -> Self {
        self.set_enabled(code, false);
        self
    }

    /// The configured comment marker, if non-empty.
    #[must_use]
    pub fn comment_marker(&self) -> Option<&str> {
        self.line_comment.as_deref().filter(|m| !m.is_empty())
    }

    /// Applies one raw `key = value` entry. `section` is only used for
    /// error reporting.
    fn apply(&mut self, section: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        if RuleCode::is_code_shaped(key) {
            let enabled = !value.eq_ignore_ascii_case(DISABLE);
            match key.parse::<RuleCode>() {
                Ok(code) => self.set_enabled(code, enabled),
                Err(_) => {
                    debug!("Unknown rule code {} in [{}]", key, section);
                    self.extra
                        .insert(key.to_ascii_uppercase(), Setting::Bool(enabled));
                }
            }
            return Ok(());
        }

        match key {
            "indent_size" => self.indent_size = positive(section, key, value)?,
            "max_line_length" => self.max_line_length = positive(section, key, value)?,
            "section_header_length" => {
                self.section_header_length = positive(section, key, value)?;
            }
            "line_comment" => {
                self.line_comment = (!value.is_empty()).then(|| value.to_string());
            }
            _ => {
                let setting = value
                    .parse::<i64>()
                    .map_or_else(|_| Setting::Str(value.to_string()), Setting::Int);
                self.extra.insert(key.to_string(), setting);
            }
        }
        Ok(())
    }
}

fn positive(section: &str, key: &str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<i64>() {
        Ok(n) if n > 0 => usize::try_from(n).map_err(|_| invalid(section, key, value)),
        _ => Err(invalid(section, key, value)),
    }
}

fn invalid(section: &str, key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        expected: "a positive integer",
    }
}

/// One named section of raw `key = value` pairs.
///
/// Keys are lower-cased and values trimmed on insertion, so lookups are
/// case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: BTreeMap<String, String>,
}

impl Section {
    /// Creates an empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Adds an entry, replacing any previous value for the key.
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts an entry, replacing any previous value for the key.
    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries
            .insert(key.trim().to_lowercase(), value.trim().to_string());
    }

    /// Section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Resolves the rule set for one extension.
///
/// Entries of `global` are overlaid by entries of `extension` before any
/// value is interpreted, so an extension section can repair a bad global
/// value.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSetting`] when a numeric setting does not
/// resolve to a positive integer.
pub fn resolve(
    base: &RuleSet,
    global: Option<&Section>,
    extension: Option<&Section>,
) -> Result<RuleSet, ConfigError> {
    let mut merged: BTreeMap<&str, (&str, &str)> = BTreeMap::new();
    for section in [global, extension].into_iter().flatten() {
        for (key, value) in section.iter() {
            merged.insert(key, (section.name(), value));
        }
    }

    let mut rules = base.clone();
    for (key, (section, value)) in merged {
        rules.apply(section, key, value)?;
    }
    Ok(rules)
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default)]
pub struct Config {
    sections: HashMap<String, Section>,
}

impl Config {
    /// Creates an empty configuration (built-in defaults only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from an INI file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from an INI string.
    ///
    /// # Errors
    ///
    /// Returns an error if the INI is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        let mut config = Self::new();
        for (name, properties) in &ini {
            // Keys above the first section header have no extension to apply to.
            let Some(name) = name else { continue };
            let section = config
                .sections
                .entry(name.to_string())
                .or_insert_with(|| Section::new(name));
            for (key, value) in properties {
                section.insert(key, value);
            }
        }
        Ok(config)
    }

    /// Adds or replaces a section.
    #[must_use]
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.insert(section.name().to_string(), section);
        self
    }

    /// Looks up a section by exact name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Resolves the rule set for `extension`.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub fn rule_set(&self, extension: &str) -> Result<RuleSet, ConfigError> {
        resolve(
            &RuleSet::default(),
            self.section(DEFAULT_SECTION),
            self.section(extension),
        )
    }

    /// Resolves one rule set per extension.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error encountered.
    pub fn rule_sets<I, S>(&self, extensions: I) -> Result<HashMap<String, RuleSet>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref();
                self.rule_set(ext).map(|rules| (ext.to_string(), rules))
            })
            .collect()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A setting has a value the evaluator cannot use.
    #[error("Invalid value {value:?} for {key} in [{section}]: expected {expected}")]
    InvalidSetting {
        /// Section the value came from.
        section: String,
        /// Setting name.
        key: String,
        /// Offending raw value.
        value: String,
        /// What the setting accepts.
        expected: &'static str,
    },
}
