//! Rule codes and the built-in rule catalogue.
//!
//! Every hygiene check has a stable `CDxxyy` code, where `xx` is the
//! category and `yy` the check within it.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Category a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Blank line placement (`CD01xx`).
    EmptyLines,
    /// Spacing around punctuation (`CD02xx`).
    Spaces,
    /// Leading whitespace (`CD03xx`).
    Indentation,
    /// Line and section header length (`CD04xx`).
    Length,
    /// Line comment formatting (`CD05xx`).
    Comments,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EmptyLines => "empty lines",
            Self::Spaces => "spaces",
            Self::Indentation => "indentation",
            Self::Length => "length",
            Self::Comments => "comments",
        };
        f.write_str(name)
    }
}

/// Identifier of a single hygiene check.
///
/// Variants are declared in evaluation order; [`RuleCode::ALL`] and
/// [`RuleCode::index`] rely on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum RuleCode {
    Cd0101,
    Cd0102,
    Cd0103,
    Cd0104,
    Cd0105,
    Cd0106,
    Cd0107,
    Cd0201,
    Cd0202,
    Cd0203,
    Cd0204,
    Cd0205,
    Cd0206,
    Cd0207,
    Cd0208,
    Cd0209,
    Cd0210,
    Cd0301,
    Cd0302,
    Cd0303,
    Cd0401,
    Cd0402,
    Cd0501,
    Cd0502,
}

impl RuleCode {
    /// Number of known rule codes.
    pub const COUNT: usize = 24;

    /// All rule codes in evaluation order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Cd0101,
        Self::Cd0102,
        Self::Cd0103,
        Self::Cd0104,
        Self::Cd0105,
        Self::Cd0106,
        Self::Cd0107,
        Self::Cd0201,
        Self::Cd0202,
        Self::Cd0203,
        Self::Cd0204,
        Self::Cd0205,
        Self::Cd0206,
        Self::Cd0207,
        Self::Cd0208,
        Self::Cd0209,
        Self::Cd0210,
        Self::Cd0301,
        Self::Cd0302,
        Self::Cd0303,
        Self::Cd0401,
        Self::Cd0402,
        Self::Cd0501,
        Self::Cd0502,
    ];

    /// Position of this code in [`RuleCode::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical upper-case code (e.g. `"CD0201"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cd0101 => "CD0101",
            Self::Cd0102 => "CD0102",
            Self::Cd0103 => "CD0103",
            Self::Cd0104 => "CD0104",
            Self::Cd0105 => "CD0105",
            Self::Cd0106 => "CD0106",
            Self::Cd0107 => "CD0107",
            Self::Cd0201 => "CD0201",
            Self::Cd0202 => "CD0202",
            Self::Cd0203 => "CD0203",
            Self::Cd0204 => "CD0204",
            Self::Cd0205 => "CD0205",
            Self::Cd0206 => "CD0206",
            Self::Cd0207 => "CD0207",
            Self::Cd0208 => "CD0208",
            Self::Cd0209 => "CD0209",
            Self::Cd0210 => "CD0210",
            Self::Cd0301 => "CD0301",
            Self::Cd0302 => "CD0302",
            Self::Cd0303 => "CD0303",
            Self::Cd0401 => "CD0401",
            Self::Cd0402 => "CD0402",
            Self::Cd0501 => "CD0501",
            Self::Cd0502 => "CD0502",
        }
    }

    /// Kebab-case rule name (e.g. `"no-trailing-space"`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cd0101 => "no-leading-blank-line",
            Self::Cd0102 => "no-trailing-blank-line",
            Self::Cd0103 => "final-newline",
            Self::Cd0104 => "no-consecutive-blank-lines",
            Self::Cd0105 => "no-blank-after-open",
            Self::Cd0106 => "no-blank-before-close",
            Self::Cd0107 => "no-blank-after-section-header",
            Self::Cd0201 => "no-double-space",
            Self::Cd0202 => "no-trailing-space",
            Self::Cd0203 => "no-space-before-comma",
            Self::Cd0204 => "no-space-before-semicolon",
            Self::Cd0205 => "no-space-after-open-paren",
            Self::Cd0206 => "no-space-before-close-paren",
            Self::Cd0207 => "space-after-comma",
            Self::Cd0208 => "space-after-semicolon",
            Self::Cd0209 => "space-before-equals",
            Self::Cd0210 => "space-after-equals",
            Self::Cd0301 => "no-tabs",
            Self::Cd0302 => "indent-multiple",
            Self::Cd0303 => "single-level-indent",
            Self::Cd0401 => "max-line-length",
            Self::Cd0402 => "section-header-length",
            Self::Cd0501 => "space-after-comment-marker",
            Self::Cd0502 => "space-before-comment-marker",
        }
    }

    /// Brief description of what the rule checks.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Cd0101 => "No blank line at the start of the file",
            Self::Cd0102 => "No blank line at the end of the file",
            Self::Cd0103 => "The file ends with a line break",
            Self::Cd0104 => "No consecutive blank lines",
            Self::Cd0105 => "No blank line right after an opening bracket",
            Self::Cd0106 => "No blank line right before a closing bracket",
            Self::Cd0107 => "No blank line right after a section header",
            Self::Cd0201 => "No runs of spaces inside a line",
            Self::Cd0202 => "No spaces before the line break",
            Self::Cd0203 => "No space before a comma",
            Self::Cd0204 => "No space before a semicolon",
            Self::Cd0205 => "No space after an opening parenthesis",
            Self::Cd0206 => "No space before a closing parenthesis",
            Self::Cd0207 => "A space follows every comma",
            Self::Cd0208 => "A space follows every semicolon",
            Self::Cd0209 => "A space precedes the equal sign",
            Self::Cd0210 => "A space follows the equal sign",
            Self::Cd0301 => "No tab characters",
            Self::Cd0302 => "Indentation is a multiple of indent_size",
            Self::Cd0303 => "Indentation grows by at most one level per line",
            Self::Cd0401 => "Lines fit within max_line_length",
            Self::Cd0402 => "Section headers are section_header_length long",
            Self::Cd0501 => "A space separates the comment marker from the text",
            Self::Cd0502 => "A space precedes an inline comment marker",
        }
    }

    /// Category derived from the first two digits of the code.
    #[must_use]
    pub fn category(self) -> Category {
        match self {
            Self::Cd0101
            | Self::Cd0102
            | Self::Cd0103
            | Self::Cd0104
            | Self::Cd0105
            | Self::Cd0106
            | Self::Cd0107 => Category::EmptyLines,
            Self::Cd0201
            | Self::Cd0202
            | Self::Cd0203
            | Self::Cd0204
            | Self::Cd0205
            | Self::Cd0206
            | Self::Cd0207
            | Self::Cd0208
            | Self::Cd0209
            | Self::Cd0210 => Category::Spaces,
            Self::Cd0301 | Self::Cd0302 | Self::Cd0303 => Category::Indentation,
            Self::Cd0401 | Self::Cd0402 => Category::Length,
            Self::Cd0501 | Self::Cd0502 => Category::Comments,
        }
    }

    /// Returns true if `key` has the shape of a rule code: `CD` followed
    /// by four digits, in any letter case. The code need not be known.
    #[must_use]
    pub fn is_code_shaped(key: &str) -> bool {
        let bytes = key.as_bytes();
        bytes.len() == 6
            && bytes[..2].eq_ignore_ascii_case(b"CD")
            && bytes[2..].iter().all(u8::is_ascii_digit)
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RuleCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Returned when a string is not a known rule code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown rule code: {0}")]
pub struct UnknownRuleCode(pub String);

impl FromStr for RuleCode {
    type Err = UnknownRuleCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRuleCode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        for (i, code) in RuleCode::ALL.iter().enumerate() {
            assert_eq!(code.index(), i, "{code} out of place");
        }
    }

    #[test]
    fn all_is_sorted_by_code_string() {
        let strings: Vec<&str> = RuleCode::ALL.iter().map(|c| c.as_str()).collect();
        let mut sorted = strings.clone();
        sorted.sort_unstable();
        assert_eq!(strings, sorted);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("cd0201".parse::<RuleCode>(), Ok(RuleCode::Cd0201));
        assert_eq!("Cd0502".parse::<RuleCode>(), Ok(RuleCode::Cd0502));
        assert!("CD9999".parse::<RuleCode>().is_err());
        assert!("indent_size".parse::<RuleCode>().is_err());
    }

    #[test]
    fn code_shape() {
        assert!(RuleCode::is_code_shaped("CD0101"));
        assert!(RuleCode::is_code_shaped("cd9999"));
        assert!(!RuleCode::is_code_shaped("CD010"));
        assert!(!RuleCode::is_code_shaped("CD01011"));
        assert!(!RuleCode::is_code_shaped("XX0101"));
        assert!(!RuleCode::is_code_shaped("CD01a1"));
    }

    #[test]
    fn category_matches_code_prefix() {
        for code in RuleCode::ALL {
            let expected = match &code.as_str()[..4] {
                "CD01" => Category::EmptyLines,
                "CD02" => Category::Spaces,
                "CD03" => Category::Indentation,
                "CD04" => Category::Length,
                _ => Category::Comments,
            };
            assert_eq!(code.category(), expected, "{code}");
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = RuleCode::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RuleCode::COUNT);
    }
}
