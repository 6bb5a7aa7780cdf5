//! Data structures for the Makani Suggest server.
//!
//! This module contains the in-memory structures that back query answering.

pub mod prefix_index;

// Re-export common data structures
pub use prefix_index::{PrefixIndex, SharedIndex};
