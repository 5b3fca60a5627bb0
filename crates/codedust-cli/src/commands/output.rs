//! Shared output formatting for inspection results.

use anyhow::Result;
use codedust_core::{LintResult, Violation, ViolationDiagnostic};
use miette::GraphicalReportHandler;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use crate::OutputFormat;

/// Print inspection results to stdout in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write(&mut out, result, format)?;
    out.flush()?;
    Ok(())
}

/// Write inspection results in the specified format.
pub fn write(out: &mut impl Write, result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, result),
        OutputFormat::Json => write_json(out, result),
        OutputFormat::Pretty => write_pretty(out, result),
    }
}

fn write_text(out: &mut impl Write, result: &LintResult) -> Result<()> {
    for violation in &result.violations {
        writeln!(out, "{violation}")?;
    }
    write_summary(out, result)
}

fn write_summary(out: &mut impl Write, result: &LintResult) -> Result<()> {
    writeln!(out, "{} issue(s)", result.issue_count())?;
    Ok(())
}

fn write_json(out: &mut impl Write, result: &LintResult) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, result)?;
    writeln!(out)?;
    Ok(())
}

fn write_pretty(out: &mut impl Write, result: &LintResult) -> Result<()> {
    let handler = GraphicalReportHandler::new();
    let mut sources: HashMap<&Path, Option<String>> = HashMap::new();

    for violation in &result.violations {
        let content = sources
            .entry(violation.location.file.as_path())
            .or_insert_with_key(|path| std::fs::read_to_string(path).ok());
        match content {
            Some(content) => {
                let diagnostic = ViolationDiagnostic::new(violation, content.clone());
                let mut rendered = String::new();
                handler.render_report(&mut rendered, &diagnostic)?;
                writeln!(out, "{}", location_line(violation))?;
                writeln!(out, "{rendered}")?;
            }
            None => writeln!(out, "{violation}")?,
        }
    }
    write_summary(out, result)
}

fn location_line(violation: &Violation) -> String {
    format!(
        "{} [{}]:",
        violation.location.file.display(),
        violation.location.line
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use codedust_core::{Location, RuleCode};
    use std::path::PathBuf;

    fn sample() -> LintResult {
        let mut result = LintResult::new();
        result.files_checked = 1;
        result.violations = vec![
            Violation::new(
                RuleCode::Cd0202,
                Location::new(PathBuf::from("src/app.py"), 3),
                "There should be no spaces at the end of a line.",
            ),
            Violation::not_reenabled(Location::new(PathBuf::from("src/app.py"), 9)),
        ];
        result
    }

    fn render(result: &LintResult, format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write(&mut buf, result, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_format() {
        assert_eq!(
            render(&sample(), OutputFormat::Text),
            "src/app.py [3]: (CD0202) There should be no spaces at the end of a line.\n\
             src/app.py [9]: (CodeDust) CodeDust should be re-enabled afterwards.\n\
             2 issue(s)\n"
        );
    }

    #[test]
    fn text_format_without_issues() {
        assert_eq!(render(&LintResult::new(), OutputFormat::Text), "0 issue(s)\n");
    }

    #[test]
    fn json_format() {
        let json: serde_json::Value =
            serde_json::from_str(&render(&sample(), OutputFormat::Json)).unwrap();
        assert_eq!(json["files_checked"], 1);
        assert_eq!(json["violations"][0]["code"], "CD0202");
        assert_eq!(json["violations"][0]["location"]["line"], 3);
        assert!(json["violations"][1]["code"].is_null());
    }

    #[test]
    fn pretty_format_falls_back_for_missing_sources() {
        let output = render(&sample(), OutputFormat::Pretty);
        assert!(output.contains("src/app.py [3]: (CD0202)"));
        assert!(output.ends_with("2 issue(s)\n"));
    }

    #[test]
    fn pretty_format_renders_snippets() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("a.py");
        std::fs::write(&file, "x = 1\ny = 2 \n").unwrap();

        let mut result = LintResult::new();
        result.violations.push(Violation::new(
            RuleCode::Cd0202,
            Location::new(file.clone(), 2).with_span(6, 6),
            "There should be no spaces at the end of a line.",
        ));

        let output = render(&result, OutputFormat::Pretty);
        assert!(output.contains(&format!("{} [2]:", file.display())));
        assert!(output.contains("CD0202"));
        assert!(output.contains("y = 2"));
        assert!(output.ends_with("1 issue(s)\n"));
    }
}
