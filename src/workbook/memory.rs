//! In-memory workbook, for callers that already hold the name table and
//! cell formulas (tests, other front ends)

use std::collections::HashMap;

use tracing::warn;

use super::address::CellAddress;
use super::{CellContent, DefinedName, WorkbookAccessor};
use crate::error::{RangeGraphError, RangeGraphResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    names: Vec<DefinedName>,
    sheets: HashMap<String, HashMap<CellAddress, CellContent>>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty sheet
    pub fn with_sheet(mut self, sheet: &str) -> Self {
        self.sheets.entry(sheet.to_string()).or_default();
        self
    }

    /// Add a defined name from its definition text
    pub fn with_name(self, name: &str, definition: &str) -> Self {
        self.with_defined_name(DefinedName::from_definition(name, definition))
    }

    pub fn with_defined_name(mut self, defined: DefinedName) -> Self {
        self.names.push(defined);
        self
    }

    /// Store a formula cell. `formula` is kept verbatim.
    pub fn with_formula(self, sheet: &str, address: &str, formula: &str) -> Self {
        self.with_cell(sheet, address, CellContent::Formula(formula.to_string()))
    }

    /// Store a literal value cell
    pub fn with_value(self, sheet: &str, address: &str) -> Self {
        self.with_cell(sheet, address, CellContent::Value)
    }

    fn with_cell(mut self, sheet: &str, address: &str, content: CellContent) -> Self {
        let cells = self.sheets.entry(sheet.to_string()).or_default();
        match CellAddress::parse(address) {
            Ok(cell) => {
                cells.insert(cell, content);
            }
            Err(e) => warn!(sheet, address, error = %e, "ignoring cell with invalid address"),
        }
        self
    }
}

impl WorkbookAccessor for MemoryWorkbook {
    fn defined_names(&self) -> Vec<DefinedName> {
        self.names.clone()
    }

    fn read_cell(&self, sheet: &str, address: &str) -> RangeGraphResult<CellContent> {
        let cells = self
            .sheets
            .get(sheet)
            .ok_or_else(|| RangeGraphError::destination(sheet, address, "sheet not found"))?;
        let cell = CellAddress::parse(address)
            .map_err(|e| RangeGraphError::destination(sheet, address, e.to_string()))?;

        Ok(cells.get(&cell).cloned().unwrap_or(CellContent::Value))
    }
}
