//! Test Utilities and Mocks
//!
//! Shared fixtures and a scripted command runner for the integration and
//! contract tests. Each test target pulls this in with `#[path]`.

#![allow(dead_code, unused_imports)]


// Re-exports for convenience
pub use fixtures::{fixture_path, write_document};
pub use mock_runner::{MockRunner, Script};
