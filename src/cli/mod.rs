//! CLI command handlers

pub mod commands;

pub use commands::{audit, docs, graph, names, DocsFormat, GraphFormat, NamesFormat};
