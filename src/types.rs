use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

//==============================================================================
// Named References
//==============================================================================

/// A defined name resolved to its destination cell.
///
/// Serializes as `{ "sheet": ..., "ref": ..., "formula": ... }`, the shape
/// shown to users when listing the references found in a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedReference {
    pub sheet: String,
    /// Cell or range address, possibly still carrying a sheet qualifier
    #[serde(rename = "ref")]
    pub reference: String,
    /// Stored formula text, only when the destination cell holds a formula
    pub formula: Option<String>,
}

impl NamedReference {
    pub fn new(sheet: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            reference: reference.into(),
            formula: None,
        }
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    /// Formula text if present and non-empty
    pub fn formula_text(&self) -> Option<&str> {
        self.formula.as_deref().filter(|f| !f.is_empty())
    }
}

/// All named references of one workbook, keyed by defined name.
pub type References = BTreeMap<String, NamedReference>;

/// Reference name → names it textually mentions.
pub type DependencyMap = BTreeMap<String, Vec<String>>;

//==============================================================================
// Documentation Table
//==============================================================================

/// One row of the documentation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    #[serde(rename = "Named Reference")]
    pub name: String,
    #[serde(rename = "Documentation")]
    pub documentation: String,
    #[serde(rename = "Excel Formula")]
    pub excel_formula: String,
    #[serde(rename = "Translated Expression")]
    pub translated_expression: String,
}

impl TranslationResult {
    pub const HEADERS: [&'static str; 4] = [
        "Named Reference",
        "Documentation",
        "Excel Formula",
        "Translated Expression",
    ];

    /// Cells in header order
    pub fn cells(&self) -> [&str; 4] {
        [
            self.name.as_str(),
            self.documentation.as_str(),
            self.excel_formula.as_str(),
            self.translated_expression.as_str(),
        ]
    }
}

//==============================================================================
// Graph Description
//==============================================================================

/// Tool-neutral description of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDescription {
    pub nodes: Vec<String>,
    /// `(prerequisite, dependent)` pairs
    pub edges: Vec<(String, String)>,
    /// Graphviz rendering of the same graph
    pub dot: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_reference_serializes_ref_key() {
        let reference = NamedReference::new("Sheet1", "$B$1").with_formula("=SUM(Sales)");
        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(json["ref"], "$B$1");
        assert_eq!(json["sheet"], "Sheet1");
        assert_eq!(json["formula"], "=SUM(Sales)");
    }

    #[test]
    fn test_missing_formula_serializes_null() {
        let reference = NamedReference::new("Data", "$A$1:$A$3");
        let json = serde_json::to_value(&reference).unwrap();
        assert!(json["formula"].is_null());
    }

    #[test]
    fn test_formula_text_ignores_empty() {
        let reference = NamedReference::new("Sheet1", "$A$1").with_formula("");
        assert_eq!(reference.formula_text(), None);
    }

    #[test]
    fn test_translation_result_column_names() {
        let row = TranslationResult {
            name: "Revenue".to_string(),
            documentation: "Sums".to_string(),
            excel_formula: "=SUM(Sales)".to_string(),
            translated_expression: "sum([Sales])".to_string(),
        };
        let json = serde_json::to_value(&row).unwrap();
        for header in TranslationResult::HEADERS {
            assert!(json.get(header).is_some(), "missing column {header}");
        }
        assert_eq!(row.cells()[3], "sum([Sales])");
    }
}
