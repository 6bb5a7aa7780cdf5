// Copyright (c) 2026 Makani Suggest Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! JSON-RPC 2.0 method handlers.
//!
//! This module contains the methods the autocomplete server exposes:
//! word writes, prefix queries (one-shot and streaming), and status.

pub mod add_word;
pub mod status;
pub mod suggest;

// Re-exports
pub use add_word::{register_add_word_method, ADD_WORD_METHOD};
pub use status::{register_status_method, StatusResult, STATUS_METHOD};
pub use suggest::{
    register_prefix_subscription, register_suggest_method, PREFIX_SUBSCRIPTION, SUGGESTIONS_EVENT,
    SUGGEST_METHOD,
};
