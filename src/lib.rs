//! RangeGraph - named range dependency viewer for Excel workbooks
//!
//! Reads a workbook's defined names, captures the formulas they point at,
//! infers which names use which, and renders the result as a dependency
//! graph and a documentation table.
//!
//! # Features
//!
//! - Defined-name extraction from `.xlsx` files (calamine)
//! - Case-insensitive textual dependency inference between names
//! - Dependency graph with Graphviz DOT and JSON output
//! - Formula → Python expression translation by pattern substitution
//! - Keyword-based formula documentation, or an external text generator
//! - Documentation table export to Excel
//!
//! # Example
//!
//! ```no_run
//! use rangegraph::core::{build_graph, extract_references, resolve_dependencies};
//! use rangegraph::workbook::XlsxWorkbook;
//!
//! let workbook = XlsxWorkbook::open("model.xlsx")?;
//! let references = extract_references(&workbook);
//! let dependencies = resolve_dependencies(&references);
//! let graph = build_graph(&dependencies);
//!
//! println!("Names: {}", references.len());
//! println!("{}", graph.to_dot());
//! # Ok::<(), rangegraph::error::RangeGraphError>(())
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;
pub mod workbook;

// Re-export commonly used types
pub use error::{RangeGraphError, RangeGraphResult};
pub use types::{DependencyMap, NamedReference, References, TranslationResult};
