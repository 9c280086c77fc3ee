//! Test infrastructure for the compiler
//!
//! Provides fixture loading and the runner that checks a case both as
//! written and nested one level under a wrapping tag.

mod harness;
mod loader;

pub use harness::{run_case, run_nested};
pub use loader::{load_fixtures_by_name, TestCase};
