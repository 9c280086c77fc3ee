//! Runs fixture cases against the compiler

use slenderize_core::compile;

use crate::common::TestCase;

/// Outcome of one case
#[derive(Debug)]
pub struct CaseResult {
    pub passed: bool,
    pub source: String,
    pub expected: String,
    pub actual: String,
}

impl CaseResult {
    pub fn print_failure(&self, label: &str) {
        eprintln!("--- {label}");
        eprintln!("source:   {:?}", self.source);
        eprintln!("expected: {:?}", self.expected);
        eprintln!("actual:   {:?}", self.actual);
    }
}

/// Compile `source` and describe the outcome the way fixtures spell it.
fn outcome(source: &str) -> String {
    match compile(source.as_bytes()) {
        Ok(output) => output.compose(),
        Err(err) => format!("error {:?} at line {}", err.code(), err.line),
    }
}

fn check(source: String, expected: String) -> CaseResult {
    let actual = outcome(&source);
    CaseResult {
        passed: actual == expected,
        source,
        expected,
        actual,
    }
}

/// Run a case exactly as written
pub fn run_case(case: &TestCase) -> CaseResult {
    let expected = match (&case.html, &case.error) {
        (Some(html), None) => html.clone(),
        (None, Some(err)) => format!("error {} at line {}", err.code, err.line),
        _ => panic!("case {} must set exactly one of `html` and `error`", case.id),
    };
    check(case.source.clone(), expected)
}

/// Run a case nested one level under a `div`.
///
/// Every non-blank line gains a tab, so a passing case must come out
/// wrapped in `<div>...</div>` and a failing one must fail one line later.
pub fn run_nested(case: &TestCase) -> CaseResult {
    let mut source = String::from("div\n");
    for line in case.source.split_inclusive('\n') {
        if !line.trim_start_matches('\t').starts_with('\n') {
            source.push('\t');
        }
        source.push_str(line);
    }

    let expected = match (&case.html, &case.error) {
        (Some(html), None) => {
            let body = html.strip_suffix('\n').unwrap_or(html);
            format!("<div>{body}</div>\n")
        }
        (None, Some(err)) => format!("error {} at line {}", err.code, err.line + 1),
        _ => panic!("case {} must set exactly one of `html` and `error`", case.id),
    };
    check(source, expected)
}
