//! Per-line rule evaluation.
//!
//! [`inspect`] walks the rule catalogue in code order and lazily yields a
//! [`Finding`] for every enabled rule the line breaks. Checks never fail:
//! a check whose neighbour is missing simply does not fire.

use crate::classify::{indent_width, is_empty, is_line_comment, is_section_header};
use crate::config::RuleSet;
use crate::context::{Line, LineContext};
use crate::rule_code::RuleCode;

const OPENERS: &[char] = &['{', '[', '(', '<'];
const CLOSERS: &[char] = &['}', ']', ')', '>'];

/// Run of `=` that marks a separator or banner rather than an assignment.
const EQUALS_RUN: &str = "====";

/// A rule broken by one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Rule that fired.
    pub code: RuleCode,
    /// Rendered message, with settings such as `indent_size` filled in.
    pub message: String,
}

/// Lazy iterator over the findings for one line, in rule-code order.
#[derive(Debug, Clone)]
pub struct Inspection<'c, 'r> {
    ctx: LineContext<'c>,
    rules: &'r RuleSet,
    codes: std::array::IntoIter<RuleCode, { RuleCode::COUNT }>,
}

impl Iterator for Inspection<'_, '_> {
    type Item = Finding;

    fn next(&mut self) -> Option<Self::Item> {
        let (ctx, rules) = (&self.ctx, self.rules);
        self.codes
            .by_ref()
            .filter(|code| rules.is_enabled(*code))
            .find(|code| violates(*code, ctx, rules))
            .map(|code| Finding {
                code,
                message: message(code, rules),
            })
    }
}

/// Inspects one line in the context of its neighbours.
#[must_use]
pub fn inspect<'c, 'r>(ctx: LineContext<'c>, rules: &'r RuleSet) -> Inspection<'c, 'r> {
    Inspection {
        ctx,
        rules,
        codes: RuleCode::ALL.into_iter(),
    }
}

/// Evaluates a single rule against a line, ignoring whether it is enabled.
#[must_use]
pub fn violates(code: RuleCode, ctx: &LineContext<'_>, rules: &RuleSet) -> bool {
    let current = ctx.current;
    match code {
        RuleCode::Cd0101 => is_empty(current.text) && ctx.previous.is_none(),
        RuleCode::Cd0102 => is_empty(current.text) && ctx.next.is_none(),
        RuleCode::Cd0103 => !current.terminated && ctx.next.is_none(),
        _ => ctx
            .previous
            .is_some_and(|previous| violates_with_previous(code, previous, current, ctx.next, rules)),
    }
}

fn violates_with_previous(
    code: RuleCode,
    previous: Line<'_>,
    current: Line<'_>,
    next: Option<Line<'_>>,
    rules: &RuleSet,
) -> bool {
    let text = current.text;
    let trimmed = text.trim();
    match code {
        RuleCode::Cd0101 | RuleCode::Cd0102 | RuleCode::Cd0103 => false,
        RuleCode::Cd0104 => is_empty(previous.text) && is_empty(text),
        RuleCode::Cd0105 => is_empty(text) && previous.text.trim_end().ends_with(OPENERS),
        RuleCode::Cd0106 => {
            is_empty(text) && next.is_some_and(|n| n.text.trim_start().starts_with(CLOSERS))
        }
        RuleCode::Cd0107 => {
            is_empty(text)
                && is_section_header(previous.text)
                && !next.is_some_and(|n| is_line_comment(n.text, rules.comment_marker()))
        }
        RuleCode::Cd0201 => trimmed.contains("  "),
        RuleCode::Cd0202 => current.terminated && text.ends_with(' '),
        RuleCode::Cd0203 => trimmed.contains(" ,"),
        RuleCode::Cd0204 => trimmed.contains(" ;"),
        RuleCode::Cd0205 => trimmed.contains("( "),
        RuleCode::Cd0206 => trimmed.contains(" )"),
        RuleCode::Cd0207 => has_pair(text, |a, b| a == ',' && starts_operand(b)),
        RuleCode::Cd0208 => has_pair(text, |a, b| a == ';' && starts_operand(b)),
        RuleCode::Cd0209 => {
            !text.contains(EQUALS_RUN) && has_pair(text, |a, b| b == '=' && ends_assignee(a))
        }
        RuleCode::Cd0210 => {
            !text.contains(EQUALS_RUN) && has_pair(text, |a, b| a == '=' && starts_value(b))
        }
        RuleCode::Cd0301 => text.contains('\t'),
        RuleCode::Cd0302 => indent_width(text)
            .checked_rem(rules.indent_size)
            .is_some_and(|rem| rem != 0),
        RuleCode::Cd0303 => {
            let (now, before) = (indent_width(text), indent_width(previous.text));
            !is_empty(previous.text) && now > before && now - before > rules.indent_size
        }
        RuleCode::Cd0401 => text.trim_end().chars().count() > rules.max_line_length,
        RuleCode::Cd0402 => {
            is_section_header(text) && trimmed.chars().count() != rules.section_header_length
        }
        RuleCode::Cd0501 => commented(text, rules).is_some_and(|marker| {
            !text.contains(&format!("{marker} ")) && text.trim() != marker
        }),
        RuleCode::Cd0502 => commented(text, rules).is_some_and(|marker| {
            !text.contains(&format!(" {marker}")) && !text.starts_with(marker)
        }),
    }
}

/// The comment marker, when the line carries it and is not a section header.
fn commented<'r>(text: &str, rules: &'r RuleSet) -> Option<&'r str> {
    rules
        .comment_marker()
        .filter(|marker| text.contains(marker) && !is_section_header(text))
}

fn has_pair(text: &str, pred: impl Fn(char, char) -> bool) -> bool {
    text.chars().zip(text.chars().skip(1)).any(|(a, b)| pred(a, b))
}

fn starts_operand(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '('
}

fn ends_assignee(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | ')' | ']' | '}' | '"' | '\'')
}

fn starts_value(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '(' | '[' | '{' | '"' | '\'')
}

/// Renders the user-facing message for `code`.
#[must_use]
pub fn message(code: RuleCode, rules: &RuleSet) -> String {
    match code {
        RuleCode::Cd0101 => "There should be no empty lines at the start of the file.".into(),
        RuleCode::Cd0102 => "There should be no empty lines at the end of the file.".into(),
        RuleCode::Cd0103 => "There should be a line break at the end of the file.".into(),
        RuleCode::Cd0104 => "There should be no multiple consecutive empty lines.".into(),
        RuleCode::Cd0105 => {
            "There should be no empty lines at the start of a parenthesis block.".into()
        }
        RuleCode::Cd0106 => {
            "There should be no empty lines at the end of a parenthesis block.".into()
        }
        RuleCode::Cd0107 => "There should be no empty lines after the section header.".into(),
        RuleCode::Cd0201 => "There should be no multiple consecutive spaces in a line.".into(),
        RuleCode::Cd0202 => "There should be no spaces at the end of a line.".into(),
        RuleCode::Cd0203 => "There should be no space before comma.".into(),
        RuleCode::Cd0204 => "There should be no space before semicolon.".into(),
        RuleCode::Cd0205 => "There should be no space after opening parentheses.".into(),
        RuleCode::Cd0206 => "There should be no space before closing parentheses.".into(),
        RuleCode::Cd0207 => "There should be a space after comma.".into(),
        RuleCode::Cd0208 => "There should be a space after semicolon.".into(),
        RuleCode::Cd0209 => "There should be a space before equal sign.".into(),
        RuleCode::Cd0210 => "There should be a space after equal sign.".into(),
        RuleCode::Cd0301 => format!("Don't use tabs, use {} spaces.", rules.indent_size),
        RuleCode::Cd0302 => format!("Use {} spaces per indentation level.", rules.indent_size),
        RuleCode::Cd0303 => format!(
            "Don't indent for more than one level ({} spaces) at a time.",
            rules.indent_size
        ),
        RuleCode::Cd0401 => format!(
            "Line should not be longer than {} characters.",
            rules.max_line_length
        ),
        RuleCode::Cd0402 => format!(
            "Section header should be {} characters long.",
            rules.section_header_length
        ),
        RuleCode::Cd0501 => {
            "There should be a space between comment syntax characters and comment text.".into()
        }
        RuleCode::Cd0502 => "There should be a space before comment syntax characters.".into(),
    }
}
