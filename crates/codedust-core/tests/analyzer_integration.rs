//! End-to-end tests running the analyzer over temporary directory trees.

use codedust_core::{Analyzer, Config, RuleCode, RuleSet};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn report(result: &codedust_core::LintResult, root: &Path) -> Vec<String> {
    result
        .violations
        .iter()
        .map(|v| {
            format!(
                "{} [{}]: ({})",
                v.location.file.strip_prefix(root).unwrap().display(),
                v.location.line,
                v.code_label()
            )
        })
        .collect()
}

#[test]
fn clean_tree_has_no_issues() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app.py", "import os\n\nprint(os.name)\n");

    let result = Analyzer::builder()
        .root(tmp.path())
        .extension("py")
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(result.files_checked, 1);
    assert!(!result.has_issues());
    assert!(!result.is_failure());
}

#[test]
fn suppression_scenario_reports_only_enabled_lines() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "a.py",
        "a\n# CodeDust: OFF\nb  \nc  \n# CodeDust: ON\nd  \n",
    );

    let result = Analyzer::builder()
        .root(tmp.path())
        .extension("py")
        .config(Config::parse("[py]\nline_comment = #\n").unwrap())
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(result.count_of(RuleCode::Cd0202), 1);
    let trailing = result
        .violations
        .iter()
        .find(|v| v.code == Some(RuleCode::Cd0202))
        .unwrap();
    assert_eq!(trailing.location.line, 6);
}

#[test]
fn unterminated_suppression_is_reported_once() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.py", "a\n# CodeDust: OFF\nb\n");

    let result = Analyzer::builder()
        .root(tmp.path())
        .extension("py")
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    let uncoded: Vec<_> = result
        .violations
        .iter()
        .filter(|v| v.code.is_none())
        .collect();
    assert_eq!(uncoded.len(), 1);
    assert_eq!(uncoded[0].location.line, 2);
    assert!(result.has_issues());
}

#[test]
fn each_extension_gets_its_own_rules() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.py", "x = 1\ny = 2 \n");
    write(tmp.path(), "b.js", "x = 1\ny = 2 \n");

    let config = Config::parse(
        "[default]\nmax_line_length = 80\n\n[js]\nCD0202 = disable\n",
    )
    .unwrap();

    let analyzer = Analyzer::builder()
        .root(tmp.path())
        .extensions(["py", "js"])
        .config(config)
        .build()
        .unwrap();

    assert_eq!(analyzer.extension_count(), 2);
    assert_eq!(analyzer.rule_set("js").map(|r| r.max_line_length), Some(80));
    assert!(!analyzer
        .rule_set("js")
        .is_some_and(|r| r.is_enabled(RuleCode::Cd0202)));

    let result = analyzer.analyze().unwrap();
    assert_eq!(report(&result, tmp.path()), vec!["a.py [2]: (CD0202)"]);
}

#[test]
fn disabled_rule_never_appears() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.py", "x = 0\na=b\nc=d\n");

    let result = Analyzer::builder()
        .root(tmp.path())
        .extension("py")
        .rule_set("py", RuleSet::default().disable(RuleCode::Cd0209))
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(result.count_of(RuleCode::Cd0209), 0);
    assert_eq!(result.count_of(RuleCode::Cd0210), 2);
}

#[test]
fn ignore_patterns_match_full_paths() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "src/a.py", "x = 1\ny = 2 \n");
    write(tmp.path(), "build/gen/b.py", "x = 1\ny = 2 \n");

    let result = Analyzer::builder()
        .root(tmp.path())
        .extension("py")
        .ignore(r"[/\\]build[/\\]")
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(result.files_checked, 1);
    assert_eq!(report(&result, tmp.path()), vec!["src/a.py [2]: (CD0202)"]);
}

#[test]
fn multiple_roots_are_merged_in_path_order() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write(first.path(), "z.py", "x = 1\ny = 2 \n");
    write(second.path(), "a.py", "x = 1\ny = 2 \n");

    let result = Analyzer::builder()
        .root(first.path())
        .root(second.path())
        .extension("py")
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(result.files_checked, 2);
    let files: Vec<&Path> = result
        .violations
        .iter()
        .map(|v| v.location.file.as_path())
        .collect();
    let mut sorted = files.clone();
    sorted.sort();
    assert_eq!(files, sorted);
}

#[test]
fn unreadable_file_is_a_failure_not_an_issue() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "good.py", "x = 1\n");
    let bad = write(tmp.path(), "bad.py", [0xff, 0xfe, 0x00, b'\n']);

    let result = Analyzer::builder()
        .root(tmp.path())
        .extension("py")
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(result.files_checked, 1);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].path, bad);
    assert!(!result.has_issues());
    assert!(result.is_failure());
}

#[test]
fn crlf_files_behave_like_lf_files() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "lf.py", "a = 1\nb = 2 \n");
    write(tmp.path(), "crlf.py", "a = 1\r\nb = 2 \r\n");

    let result = Analyzer::builder()
        .root(tmp.path())
        .extension("py")
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(
        report(&result, tmp.path()),
        vec!["crlf.py [2]: (CD0202)", "lf.py [2]: (CD0202)"]
    );
}

#[test]
fn repeated_runs_are_identical() {
    let tmp = TempDir::new().unwrap();
    for i in 0..8 {
        write(
            tmp.path(),
            &format!("pkg{i}/m.py"),
            "\n\na=b\n   c ,d  \n# CodeDust: OFF\ne\n",
        );
    }

    let analyzer = Analyzer::builder()
        .root(tmp.path())
        .extension("py")
        .parallelism(Some(4))
        .build()
        .unwrap();

    let first = analyzer.analyze().unwrap();
    let second = analyzer.analyze().unwrap();
    assert_eq!(first.violations, second.violations);
    assert_eq!(first.files_checked, 8);
}

#[test]
fn gitignore_is_honoured_when_requested() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), ".gitignore", "generated/\n");
    write(tmp.path(), "a.py", "x = 1\ny = 2 \n");
    write(tmp.path(), "generated/b.py", "x = 1\ny = 2 \n");

    let plain = Analyzer::builder()
        .root(tmp.path())
        .extension("py")
        .build()
        .unwrap()
        .analyze()
        .unwrap();
    assert_eq!(plain.files_checked, 2);

    let filtered = Analyzer::builder()
        .root(tmp.path())
        .extension("py")
        .respect_gitignore(true)
        .build()
        .unwrap()
        .analyze()
        .unwrap();
    assert_eq!(filtered.files_checked, 1);
    assert_eq!(report(&filtered, tmp.path()), vec!["a.py [2]: (CD0202)"]);
}
