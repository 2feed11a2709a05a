//! Formula → Python expression translation
//!
//! A fixed, ordered list of textual substitutions, applied to the formula
//! body. There is no parser behind it: anything the patterns do not match
//! passes through untouched.

use regex::Regex;

use crate::error::RangeGraphResult;

/// Translates Excel formulas into best-effort Python expressions
#[derive(Debug, Clone)]
pub struct FormulaTranslator {
    sum_pattern: Regex,
    if_pattern: Regex,
}

impl FormulaTranslator {
    pub fn new() -> RangeGraphResult<Self> {
        Ok(Self {
            // SUM(args) with no nested parentheses
            sum_pattern: Regex::new(r"(?i)\bSUM\(([^()]*)\)")?,
            // IF(cond,then,else) split on the first two commas, not nesting-aware
            if_pattern: Regex::new(r"(?i)\bIF\(([^,]*),([^,]*),([^)]*)\)")?,
        })
    }

    /// Translate a formula. Empty or absent input gives an empty string.
    ///
    /// Example: `=IF(A1>0,A1,0)` → `(A1 if A1>0 else 0)`
    pub fn translate(&self, formula: Option<&str>) -> String {
        let body = match formula.map(strip_marker) {
            Some(body) if !body.is_empty() => body,
            _ => return String::new(),
        };

        // 1. SUM(x) → sum([x])
        let result = self.sum_pattern.replace_all(body, "sum([${1}])");
        // 2. power
        let result = result.replace('^', "**");
        // 3. string join approximated as addition
        let result = result.replace('&', "+");
        // 4. IF(c,t,e) → (t if c else e)
        let result = self.if_pattern.replace_all(&result, "(${2} if ${1} else ${3})");

        result.into_owned()
    }
}

/// Strip a single leading '=' and surrounding whitespace
fn strip_marker(formula: &str) -> &str {
    let trimmed = formula.trim();
    trimmed.strip_prefix('=').unwrap_or(trimmed).trim()
}
