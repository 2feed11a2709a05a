//! Defined-name definition text
//!
//! A definition such as `'Q1 Data'!$A$1:$A$9,Summary!$B$2` lists one or more
//! sheet-qualified areas. Anything else (constants, formulas, `#REF!`) has no
//! destinations.

use super::Destination;

/// True when the definition points into another workbook (`[1]Sheet1!A1`)
pub fn is_external_definition(definition: &str) -> bool {
    let bytes = definition.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'[' {
            let digits = bytes[i + 1..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count();
            if digits > 0 && bytes.get(i + 1 + digits) == Some(&b']') {
                return true;
            }
        }
        i += 1;
    }
    false
}

/// Split a definition into its (sheet, address) destinations.
///
/// Returns an empty list unless every comma-separated area is a
/// sheet-qualified cell, range, column span or row span.
pub fn parse_destinations(definition: &str) -> Vec<Destination> {
    let text = definition.trim();
    let text = text.strip_prefix('=').unwrap_or(text).trim();
    let text = match text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => inner,
        None => text,
    };
    if text.is_empty() {
        return Vec::new();
    }

    let mut destinations = Vec::new();
    for area in split_areas(text) {
        match parse_area(area.trim()) {
            Some(dest) => destinations.push(dest),
            None => return Vec::new(),
        }
    }
    destinations
}

/// Split on commas that are not inside a quoted sheet name
fn split_areas(text: &str) -> Vec<&str> {
    let mut areas = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match ch {
            '\'' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                areas.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    areas.push(&text[start..]);
    areas
}

fn parse_area(area: &str) -> Option<Destination> {
    let (sheet, cells) = if let Some(quoted) = area.strip_prefix('\'') {
        let close = closing_quote(quoted)?;
        let cells = quoted[close + 1..].strip_prefix('!')?;
        (quoted[..close].replace("''", "'"), cells)
    } else {
        let (sheet, cells) = area.rsplit_once('!')?;
        if sheet.is_empty() || sheet.contains(['(', ')', ' ', '"']) {
            return None;
        }
        (sheet.to_string(), cells)
    };

    if sheet.is_empty() || !is_area(cells) {
        return None;
    }
    Some(Destination::new(sheet, cells))
}

/// Index of the quote ending a quoted sheet name (`''` is an escaped quote)
fn closing_quote(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}

/// `A1`, `$A$1:$B$9`, `A:C` or `1:3`
fn is_area(cells: &str) -> bool {
    let mut parts = cells.split(':');
    let first = parts.next().unwrap_or_default();
    match (parts.next(), parts.next()) {
        (None, _) => is_cell(first),
        (Some(second), None) => {
            (is_cell(first) && is_cell(second))
                || (is_column(first) && is_column(second))
                || (is_row(first) && is_row(second))
        }
        _ => false,
    }
}

fn is_cell(part: &str) -> bool {
    let part = part.strip_prefix('$').unwrap_or(part);
    let letters = part.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    if letters == 0 || letters > 3 {
        return false;
    }
    is_row(&part[letters..])
}

fn is_column(part: &str) -> bool {
    let part = part.strip_prefix('$').unwrap_or(part);
    (1..=3).contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_row(part: &str) -> bool {
    let part = part.strip_prefix('$').unwrap_or(part);
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cell_destination() {
        assert_eq!(
            parse_destinations("Sheet1!$B$1"),
            vec![Destination::new("Sheet1", "$B$1")]
        );
    }

    #[test]
    fn test_quoted_sheet_name() {
        assert_eq!(
            parse_destinations("'Q1 Data'!$A$1:$A$9"),
            vec![Destination::new("Q1 Data", "$A$1:$A$9")]
        );
        assert_eq!(
            parse_destinations("'Bob''s Sheet'!C3"),
            vec![Destination::new("Bob's Sheet", "C3")]
        );
    }

    #[test]
    fn test_multiple_areas() {
        assert_eq!(
            parse_destinations("Sheet1!$A$1,'Other, Sheet'!$B$2"),
            vec![
                Destination::new("Sheet1", "$A$1"),
                Destination::new("Other, Sheet", "$B$2"),
            ]
        );
    }

    #[test]
    fn test_column_and_row_spans() {
        assert_eq!(
            parse_destinations("Data!$A:$C"),
            vec![Destination::new("Data", "$A:$C")]
        );
        assert_eq!(
            parse_destinations("Data!$1:$3"),
            vec![Destination::new("Data", "$1:$3")]
        );
    }

    #[test]
    fn test_non_range_definitions_have_no_destinations() {
        assert!(parse_destinations("0.0725").is_empty());
        assert!(parse_destinations("#REF!").is_empty());
        assert!(parse_destinations("Sheet1!#REF!").is_empty());
        assert!(parse_destinations("SUM(Sheet1!A1:A3)").is_empty());
        assert!(parse_destinations("\"text\"").is_empty());
        assert!(parse_destinations("").is_empty());
    }

    #[test]
    fn test_external_definition() {
        assert!(is_external_definition("[1]Sheet1!$A$1"));
        assert!(is_external_definition("'[12]Other Book'!$B$2"));
        assert!(!is_external_definition("Sheet1!$A$1"));
        assert!(!is_external_definition("Table1[Column]"));
        assert!(!is_external_definition("[]Sheet1!A1"));
    }
}
