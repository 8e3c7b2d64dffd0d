//! Integration tests against an in-process feed server (no network access needed).
//!
//! Run: `cargo test -p quakewatch_core --test integration`

mod common;
mod dashboard_flow;
mod fetch;
mod polling;
