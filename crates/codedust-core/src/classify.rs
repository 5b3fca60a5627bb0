//! Stateless line predicates.
//!
//! All functions take the line content without its line break.

/// Characters a section header may be built from.
const HEADER_CHARS: [char; 3] = ['#', '/', '-'];

/// Returns true if the line holds nothing but whitespace.
#[must_use]
pub fn is_empty(line: &str) -> bool {
    line.trim().is_empty()
}

/// Number of leading space characters. Tabs do not count.
#[must_use]
pub fn indent_width(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ').count()
}

/// Returns true if the trimmed line is a run of at least two copies of a
/// single header character (`#`, `/` or `-`).
///
/// ```
/// use codedust_core::classify::is_section_header;
///
/// assert!(is_section_header("  ########  "));
/// assert!(!is_section_header("# Title"));
/// assert!(!is_section_header("#"));
/// ```
#[must_use]
pub fn is_section_header(line: &str) -> bool {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) if HEADER_CHARS.contains(&first) => {
            trimmed.len() > first.len_utf8() && chars.all(|c| c == first)
        }
        _ => false,
    }
}

/// Returns true if the whole line is a comment introduced by `marker`.
///
/// Code followed by a trailing comment is not a line comment. Always false
/// when no marker is configured.
#[must_use]
pub fn is_line_comment(line: &str, marker: Option<&str>) -> bool {
    match marker {
        Some(marker) if !marker.is_empty() => line.trim_start().starts_with(marker),
        _ => false,
    }
}
