//! Workbook access
//!
//! The extractor only needs two capabilities from a workbook: enumerate its
//! defined names, and read one cell's content. [`WorkbookAccessor`] is that
//! seam; [`XlsxWorkbook`] backs it with a real `.xlsx` file and
//! [`MemoryWorkbook`] with hand-built data.

mod address;
mod definition;
mod memory;
mod xlsx;

pub use address::CellAddress;
pub use definition::{is_external_definition, parse_destinations};
pub use memory::MemoryWorkbook;
pub use xlsx::XlsxWorkbook;

use crate::error::RangeGraphResult;

/// A (sheet, address) pair a defined name points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub sheet: String,
    pub address: String,
}

impl Destination {
    pub fn new(sheet: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            address: address.into(),
        }
    }
}

const BUILTIN_PREFIX: &str = "_xlnm.";

/// An entry of the workbook's defined-name table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinedName {
    pub name: String,
    /// Raw definition text (`Sheet1!$B$1`, `'My Sheet'!$A$1:$A$9`, `0.07`, ...)
    pub definition: Option<String>,
    pub is_external: bool,
    pub destinations: Vec<Destination>,
}

impl DefinedName {
    /// Builds a defined name from its definition text, deriving the
    /// external flag and the destinations from the text.
    pub fn from_definition(name: impl Into<String>, definition: impl Into<String>) -> Self {
        let definition = definition.into();
        Self {
            name: name.into(),
            is_external: is_external_definition(&definition),
            destinations: parse_destinations(&definition),
            definition: Some(definition),
        }
    }

    /// Excel's own names (`_xlnm.Print_Area`, `_xlnm._FilterDatabase`, ...)
    pub fn is_builtin(&self) -> bool {
        self.name
            .get(..BUILTIN_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(BUILTIN_PREFIX))
    }

    /// True when the definition is missing or blank
    pub fn is_blank(&self) -> bool {
        self.definition
            .as_deref()
            .map(|d| d.trim().is_empty())
            .unwrap_or(true)
    }
}

/// What a cell holds, as far as the extractor cares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// Literal value or empty cell
    Value,
    /// Stored formula text, leading `=` included
    Formula(String),
}

/// Read-only view of a loaded workbook
pub trait WorkbookAccessor {
    /// Every entry of the defined-name table, in workbook order
    fn defined_names(&self) -> Vec<DefinedName>;

    /// Content of the single cell at `address` on `sheet`.
    ///
    /// `address` may still carry a sheet qualifier; only the part after the
    /// last `!` is used.
    fn read_cell(&self, sheet: &str, address: &str) -> RangeGraphResult<CellContent>;
}
