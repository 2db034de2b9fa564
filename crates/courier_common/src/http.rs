// --- File: crates/courier_common/src/http.rs ---
//! HTTP utilities shared across the workspace.

pub mod client;
