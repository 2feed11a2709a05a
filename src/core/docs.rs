//! Rule-based formula documentation

/// Shown for references whose cell holds no formula
pub const NO_FORMULA: &str = "No formula; the cell holds a constant or input value.";

/// Keyword rules, checked in order; the first keyword found wins
const RULES: &[(&str, &str)] = &[
    ("SUM", "Sums the values in the referenced range."),
    (
        "IF",
        "Returns one of two values depending on whether a condition holds.",
    ),
];

const GENERIC: &str = "Computes a value from arithmetic on the referenced cells and names.";

/// Describe a formula in one sentence.
pub fn describe(formula: Option<&str>) -> String {
    let formula = match formula.map(str::trim) {
        Some(f) if !f.is_empty() && f != "=" => f.to_uppercase(),
        _ => return NO_FORMULA.to_string(),
    };

    RULES
        .iter()
        .find(|(keyword, _)| formula.contains(keyword))
        .map(|(_, text)| *text)
        .unwrap_or(GENERIC)
        .to_string()
}
