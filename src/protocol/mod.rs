//! Protocol module for the Makani Suggest server.
//!
//! Clients speak newline-delimited JSON-RPC 2.0; see [`jsonrpc`].

pub mod jsonrpc;
