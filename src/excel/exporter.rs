//! Excel export of the documentation table

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::{RangeGraphError, RangeGraphResult};
use crate::types::TranslationResult;

const TABLE_SHEET: &str = "Documentation";
const EDGE_SHEET: &str = "Dependencies";

/// Column widths for Named Reference, Documentation, Excel Formula,
/// Translated Expression
const COLUMN_WIDTHS: [f64; 4] = [24.0, 60.0, 40.0, 40.0];

/// Writes the documentation table (and optionally the dependency edges)
/// to an `.xlsx` workbook
pub struct TableExporter<'a> {
    rows: &'a [TranslationResult],
    edges: &'a [(String, String)],
}

impl<'a> TableExporter<'a> {
    pub fn new(rows: &'a [TranslationResult]) -> Self {
        Self { rows, edges: &[] }
    }

    /// Also write a sheet listing `(dependency, dependent)` pairs
    pub fn with_edges(mut self, edges: &'a [(String, String)]) -> Self {
        self.edges = edges;
        self
    }

    /// Export to a file
    pub fn export(&self, output_path: &Path) -> RangeGraphResult<()> {
        let mut workbook = self.build()?;
        workbook
            .save(output_path)
            .map_err(|e| export_error("Failed to save Excel file", e))
    }

    /// Export to an in-memory `.xlsx`
    pub fn to_bytes(&self) -> RangeGraphResult<Vec<u8>> {
        let mut workbook = self.build()?;
        workbook
            .save_to_buffer()
            .map_err(|e| export_error("Failed to build Excel file", e))
    }

    fn build(&self) -> RangeGraphResult<Workbook> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        let sheet = workbook.add_worksheet();
        self.write_table(sheet, &header)
            .map_err(|e| export_error("Failed to write documentation sheet", e))?;

        if !self.edges.is_empty() {
            let sheet = workbook.add_worksheet();
            self.write_edges(sheet, &header)
                .map_err(|e| export_error("Failed to write dependency sheet", e))?;
        }

        Ok(workbook)
    }

    fn write_table(&self, sheet: &mut Worksheet, header: &Format) -> Result<(), XlsxError> {
        sheet.set_name(TABLE_SHEET)?;

        for (col, title) in TranslationResult::HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, header)?;
            sheet.set_column_width(col as u16, COLUMN_WIDTHS[col])?;
        }

        for (idx, row) in self.rows.iter().enumerate() {
            let excel_row = (idx + 1) as u32;
            for (col, text) in row.cells().iter().enumerate() {
                // formulas are written as text so the stored formula is shown, not evaluated
                sheet.write_string(excel_row, col as u16, *text)?;
            }
        }

        sheet.set_freeze_panes(1, 0)?;
        Ok(())
    }

    fn write_edges(&self, sheet: &mut Worksheet, header: &Format) -> Result<(), XlsxError> {
        sheet.set_name(EDGE_SHEET)?;
        sheet.write_string_with_format(0, 0, "Dependency", header)?;
        sheet.write_string_with_format(0, 1, "Dependent", header)?;
        sheet.set_column_width(0, 24)?;
        sheet.set_column_width(1, 24)?;

        for (idx, (from, to)) in self.edges.iter().enumerate() {
            let excel_row = (idx + 1) as u32;
            sheet.write_string(excel_row, 0, from)?;
            sheet.write_string(excel_row, 1, to)?;
        }
        Ok(())
    }
}

fn export_error(context: &str, e: XlsxError) -> RangeGraphError {
    RangeGraphError::Export(format!("{}: {}", context, e))
}
