//! `.xlsx` workbooks read through calamine

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_from_rs, Range, Reader, Xlsx};
use tracing::{debug, warn};

use super::address::CellAddress;
use super::{CellContent, DefinedName, WorkbookAccessor};
use crate::error::{RangeGraphError, RangeGraphResult};

/// A loaded `.xlsx` snapshot: the defined-name table plus each sheet's
/// formula grid. Cell values are never loaded, only whether a formula is
/// stored.
pub struct XlsxWorkbook {
    names: Vec<DefinedName>,
    /// Per sheet: its formula grid, or the reason it could not be read
    formulas: HashMap<String, Result<Range<String>, String>>,
}

impl XlsxWorkbook {
    /// Load a workbook from raw `.xlsx` bytes
    pub fn from_bytes(bytes: &[u8]) -> RangeGraphResult<Self> {
        let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
            .map_err(|e: calamine::XlsxError| RangeGraphError::WorkbookLoad(e.to_string()))?;
        Ok(Self::load(workbook))
    }

    /// Load a workbook from a file on disk
    pub fn open<P: AsRef<Path>>(path: P) -> RangeGraphResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            RangeGraphError::WorkbookLoad(format!("{}: {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes)
    }

    fn load<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> Self {
        let names: Vec<DefinedName> = workbook
            .defined_names()
            .iter()
            .map(|(name, definition)| {
                DefinedName::from_definition(name.as_str(), definition.as_str())
            })
            .collect();

        let mut formulas = HashMap::new();
        for sheet in workbook.sheet_names() {
            let grid = workbook.worksheet_formula(&sheet).map_err(|e| e.to_string());
            if let Err(ref reason) = grid {
                warn!(sheet = %sheet, %reason, "sheet formulas unreadable");
            }
            formulas.insert(sheet, grid);
        }

        debug!(names = names.len(), sheets = formulas.len(), "workbook loaded");
        Self { names, formulas }
    }

    /// Sheet names, sorted
    pub fn sheet_names(&self) -> Vec<&str> {
        let mut sheets: Vec<&str> = self.formulas.keys().map(String::as_str).collect();
        sheets.sort_unstable();
        sheets
    }
}

impl WorkbookAccessor for XlsxWorkbook {
    fn defined_names(&self) -> Vec<DefinedName> {
        self.names.clone()
    }

    fn read_cell(&self, sheet: &str, address: &str) -> RangeGraphResult<CellContent> {
        let grid = match self.formulas.get(sheet) {
            Some(Ok(grid)) => grid,
            Some(Err(reason)) => {
                return Err(RangeGraphError::destination(sheet, address, reason.as_str()))
            }
            None => return Err(RangeGraphError::destination(sheet, address, "sheet not found")),
        };
        let cell = CellAddress::parse(address)
            .map_err(|e| RangeGraphError::destination(sheet, address, e.to_string()))?;

        match grid.get_value((cell.row, cell.col)) {
            Some(formula) if !formula.is_empty() => {
                // calamine drops the leading '=' the cell shows
                let stored = if formula.starts_with('=') {
                    formula.clone()
                } else {
                    format!("={}", formula)
                };
                Ok(CellContent::Formula(stored))
            }
            _ => Ok(CellContent::Value),
        }
    }
}
