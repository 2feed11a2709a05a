//! Reference extraction from a workbook's defined-name table

use tracing::{debug, warn};

use crate::types::{NamedReference, References};
use crate::workbook::{CellContent, Destination, WorkbookAccessor};

/// Walk every defined name and resolve it to its destination cell.
///
/// Names without a definition, Excel's built-in `_xlnm.` names and names
/// pointing into another workbook are skipped. When a name has several
/// destinations each one overwrites the previous entry, so the last
/// destination wins. A destination that cannot
/// be read keeps `formula = None`; it never aborts the walk.
pub fn extract_references<W>(workbook: &W) -> References
where
    W: WorkbookAccessor + ?Sized,
{
    let mut references = References::new();

    for defined in workbook.defined_names() {
        if defined.is_blank() {
            debug!(name = %defined.name, "skipping name without definition");
            continue;
        }
        if defined.is_builtin() {
            debug!(name = %defined.name, "skipping built-in name");
            continue;
        }
        if defined.is_external {
            debug!(name = %defined.name, "skipping external name");
            continue;
        }

        for destination in &defined.destinations {
            let reference = resolve_destination(workbook, &defined.name, destination);
            references.insert(defined.name.clone(), reference);
        }
    }

    debug!(count = references.len(), "named references extracted");
    references
}

fn resolve_destination<W>(workbook: &W, name: &str, destination: &Destination) -> NamedReference
where
    W: WorkbookAccessor + ?Sized,
{
    let mut reference = NamedReference::new(&destination.sheet, &destination.address);

    match workbook.read_cell(&destination.sheet, &destination.address) {
        Ok(CellContent::Formula(formula)) => reference.formula = Some(formula),
        Ok(CellContent::Value) => {}
        Err(e) => {
            warn!(name, error = %e, "destination unreadable, keeping reference without formula");
        }
    }

    reference
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::{DefinedName, MemoryWorkbook};
    use pretty_assertions::assert_eq;

    fn sales_workbook() -> MemoryWorkbook {
        MemoryWorkbook::new()
            .with_name("Revenue", "Sheet1!$B$1")
            .with_name("Sales", "Sheet1!$A$1:$A$3")
            .with_formula("Sheet1", "B1", "=SUM(Sales)")
            .with_value("Sheet1", "A1")
    }

    #[test]
    fn test_extracts_formula_and_range() {
        let refs = extract_references(&sales_workbook());

        assert_eq!(refs.len(), 2);
        assert_eq!(
            refs["Revenue"],
            NamedReference::new("Sheet1", "$B$1").with_formula("=SUM(Sales)")
        );
        assert_eq!(refs["Sales"], NamedReference::new("Sheet1", "$A$1:$A$3"));
    }

    #[test]
    fn test_value_cell_has_no_formula() {
        let wb = MemoryWorkbook::new()
            .with_name("Rate", "Inputs!$C$2")
            .with_value("Inputs", "C2");
        let refs = extract_references(&wb);
        assert_eq!(refs["Rate"].formula, None);
    }

    #[test]
    fn test_formula_text_kept_verbatim() {
        let wb = MemoryWorkbook::new()
            .with_name("Total", "Sheet1!$D$9")
            .with_formula("Sheet1", "D9", "=  Sales * (1+Rate) ");
        let refs = extract_references(&wb);
        assert_eq!(refs["Total"].formula.as_deref(), Some("=  Sales * (1+Rate) "));
    }

    #[test]
    fn test_skips_external_and_blank_names() {
        let wb = MemoryWorkbook::new()
            .with_sheet("Sheet1")
            .with_name("Linked", "[1]Sheet1!$A$1")
            .with_defined_name(DefinedName {
                name: "Empty".to_string(),
                definition: None,
                is_external: false,
                destinations: vec![Destination::new("Sheet1", "$A$1")],
            })
            .with_defined_name(DefinedName {
                name: "Blank".to_string(),
                definition: Some("   ".to_string()),
                is_external: false,
                destinations: vec![Destination::new("Sheet1", "$A$1")],
            })
            .with_name("Kept", "Sheet1!$A$1");

        let refs = extract_references(&wb);
        let names: Vec<&str> = refs.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Kept"]);
    }

    #[test]
    fn test_last_destination_wins() {
        let wb = MemoryWorkbook::new()
            .with_name("Multi", "Sheet1!$A$1,Sheet2!$B$2")
            .with_formula("Sheet1", "A1", "=1+1")
            .with_value("Sheet2", "B2");

        let refs = extract_references(&wb);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs["Multi"], NamedReference::new("Sheet2", "$B$2"));
    }

    #[test]
    fn test_bad_destination_does_not_abort() {
        let wb = MemoryWorkbook::new()
            .with_name("Ghost", "Missing!$A$1")
            .with_name("Total", "Sheet1!$A$1")
            .with_formula("Sheet1", "A1", "=Ghost*2");

        let refs = extract_references(&wb);
        assert_eq!(refs["Ghost"], NamedReference::new("Missing", "$A$1"));
        assert_eq!(refs["Total"].formula.as_deref(), Some("=Ghost*2"));
    }

    #[test]
    fn test_malformed_address_keeps_entry() {
        let wb = MemoryWorkbook::new()
            .with_sheet("Sheet1")
            .with_defined_name(DefinedName {
                name: "Broken".to_string(),
                definition: Some("Sheet1!ZZZZ0".to_string()),
                is_external: false,
                destinations: vec![Destination::new("Sheet1", "ZZZZ0")],
            });

        let refs = extract_references(&wb);
        assert_eq!(refs["Broken"].formula, None);
        assert_eq!(refs["Broken"].reference, "ZZZZ0");
    }

    #[test]
    fn test_skips_builtin_names() {
        let wb = MemoryWorkbook::new()
            .with_name("_xlnm.Print_Area", "Sheet1!$A$1:$C$9")
            .with_name("_XLNM._FilterDatabase", "Sheet1!$A$1:$C$1")
            .with_name("Total", "Sheet1!$D$9")
            .with_formula("Sheet1", "D9", "=1+1");

        let refs = extract_references(&wb);
        let names: Vec<&str> = refs.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Total"]);
    }

    #[test]
    fn test_constant_name_has_no_entry() {
        let wb = MemoryWorkbook::new().with_name("TaxRate", "0.0725");
        assert!(extract_references(&wb).is_empty());
    }
}
