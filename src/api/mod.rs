//! RangeGraph API Server module
//!
//! Provides the HTTP upload endpoint in front of the analysis pipeline.
//! Run with `rangegraph-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
