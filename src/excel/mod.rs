//! Excel output for the documentation table

mod exporter;

pub use exporter::TableExporter;
