//! Test modules for the Makani Suggest server.
//!
//! This module holds the cross-cutting tests (configuration, error
//! plumbing, end-to-end flows through the synchronizer and gateway) and
//! the shared fixtures they use. Component tests live next to their code.

pub mod error_tests;
pub mod flow_tests;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{word_list_strategy, TestFixture};
