//! Fixture loading from YAML files

use std::path::Path;

use serde::Deserialize;

/// A single test case from a fixture file.
///
/// Exactly one of `html` and `error` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub source: String,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub error: Option<ExpectedError>,
}

/// Expected failure: the `ParseErrorCode` variant name and the 1-based line.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedError {
    pub code: String,
    pub line: usize,
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}
