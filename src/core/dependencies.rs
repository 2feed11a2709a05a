//! Dependency inference between named references
//!
//! A reference depends on another when the other's name occurs anywhere in
//! its formula text, compared case-insensitively. This is a lexical match,
//! not a parse: a name that happens to be a substring of an unrelated token
//! (`A` inside `BALANCE`) still counts.

use crate::types::{DependencyMap, References};

/// Map every reference to the other references its formula mentions.
///
/// References without a formula map to an empty list. A reference never
/// lists itself. Cycles are representable; each formula is scanned once.
pub fn resolve_dependencies(references: &References) -> DependencyMap {
    let upper_names: Vec<(&String, String)> = references
        .keys()
        .map(|name| (name, name.to_uppercase()))
        .collect();

    references
        .iter()
        .map(|(name, reference)| {
            let deps = match reference.formula_text() {
                Some(formula) => {
                    let formula = formula.to_uppercase();
                    upper_names
                        .iter()
                        .filter(|(other, upper)| {
                            *other != name && formula.contains(upper.as_str())
                        })
                        .map(|(other, _)| (*other).clone())
                        .collect()
                }
                None => Vec::new(),
            };
            (name.clone(), deps)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NamedReference;
    use pretty_assertions::assert_eq;

    fn refs(entries: &[(&str, Option<&str>)]) -> References {
        entries
            .iter()
            .map(|(name, formula)| {
                let mut reference = NamedReference::new("Sheet1", "$A$1");
                reference.formula = formula.map(str::to_string);
                (name.to_string(), reference)
            })
            .collect()
    }

    #[test]
    fn test_revenue_depends_on_sales() {
        let deps = resolve_dependencies(&refs(&[
            ("Revenue", Some("=SUM(Sales)")),
            ("Sales", None),
        ]));
        assert_eq!(deps["Revenue"], vec!["Sales".to_string()]);
        assert!(deps["Sales"].is_empty());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let deps = resolve_dependencies(&refs(&[
            ("Total", Some("=subtotal_a + TAXRATE")),
            ("Subtotal_A", None),
            ("TaxRate", None),
        ]));
        assert_eq!(
            deps["Total"],
            vec!["Subtotal_A".to_string(), "TaxRate".to_string()]
        );
    }

    #[test]
    fn test_never_depends_on_itself() {
        let deps = resolve_dependencies(&refs(&[("Loop", Some("=Loop+1"))]));
        assert!(deps["Loop"].is_empty());
    }

    #[test]
    fn test_substring_false_positive_is_kept() {
        let deps = resolve_dependencies(&refs(&[
            ("Closing", Some("=BALANCE*2")),
            ("A", None),
        ]));
        assert_eq!(deps["Closing"], vec!["A".to_string()]);
    }

    #[test]
    fn test_mutual_dependency_is_representable() {
        let deps = resolve_dependencies(&refs(&[
            ("Alpha", Some("=Beta+1")),
            ("Beta", Some("=Alpha-1")),
        ]));
        assert_eq!(deps["Alpha"], vec!["Beta".to_string()]);
        assert_eq!(deps["Beta"], vec!["Alpha".to_string()]);
    }

    #[test]
    fn test_empty_formula_has_no_dependencies() {
        let deps = resolve_dependencies(&refs(&[("Blank", Some("")), ("Other", None)]));
        assert!(deps["Blank"].is_empty());
    }

    #[test]
    fn test_one_entry_per_reference() {
        let input = refs(&[("A", Some("=B")), ("B", Some("=C")), ("C", None)]);
        let deps = resolve_dependencies(&input);
        assert_eq!(deps.len(), input.len());
        for names in deps.values() {
            assert!(names.iter().all(|n| input.contains_key(n)));
        }
    }
}
