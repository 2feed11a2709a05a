//! A1-style cell addresses

use crate::error::{RangeGraphError, RangeGraphResult};
use std::fmt;

/// Zero-based cell coordinates parsed from an A1 address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    pub col: u32,
}

/// Last column Excel allows (XFD)
const MAX_COL: u32 = 16_384;
const MAX_ROW: u32 = 1_048_576;

impl CellAddress {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a single-cell address such as `B2`, `$B$2` or `Sheet1!$B$2`.
    ///
    /// Ranges (`A1:A3`) are rejected: they do not name a single cell.
    pub fn parse(address: &str) -> RangeGraphResult<Self> {
        let cell = strip_sheet(address).trim();
        let fail = |reason: &str| RangeGraphError::InvalidAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        };

        if cell.contains(':') {
            return Err(fail("range does not name a single cell"));
        }

        let cell = cell.replace('$', "");
        let split = cell
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| fail("missing row number"))?;
        let (letters, digits) = cell.split_at(split);

        if letters.is_empty()
            || letters.len() > 3
            || !letters.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(fail("invalid column"));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(fail("invalid row"));
        }

        let col = letters
            .chars()
            .fold(0u32, |acc, c| acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1));
        let row: u32 = digits.parse().map_err(|_| fail("invalid row"))?;

        if col == 0 || col > MAX_COL || row == 0 || row > MAX_ROW {
            return Err(fail("address outside the sheet"));
        }

        Ok(Self {
            row: row - 1,
            col: col - 1,
        })
    }

    /// Convert column index to letters (0→A, 25→Z, 26→AA)
    pub fn column_letters(col: u32) -> String {
        let mut result = String::new();
        let mut num = col;

        loop {
            let remainder = num % 26;
            result.insert(0, (b'A' + remainder as u8) as char);
            if num < 26 {
                break;
            }
            num = num / 26 - 1;
        }

        result
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_letters(self.col), self.row + 1)
    }
}

/// Drop everything up to the last `!`
pub(crate) fn strip_sheet(address: &str) -> &str {
    address.rsplit('!').next().unwrap_or(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_absolute() {
        assert_eq!(CellAddress::parse("A1").unwrap(), CellAddress::new(0, 0));
        assert_eq!(CellAddress::parse("$B$2").unwrap(), CellAddress::new(1, 1));
        assert_eq!(CellAddress::parse("aa10").unwrap(), CellAddress::new(9, 26));
    }

    #[test]
    fn test_parse_strips_sheet_qualifier() {
        assert_eq!(
            CellAddress::parse("Sheet1!$C$3").unwrap(),
            CellAddress::new(2, 2)
        );
        assert_eq!(
            CellAddress::parse("'My Sheet'!D4").unwrap(),
            CellAddress::new(3, 3)
        );
    }

    #[test]
    fn test_parse_rejects_ranges() {
        assert!(CellAddress::parse("A1:A3").is_err());
        assert!(CellAddress::parse("Sheet1!$A$1:$B$2").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("12").is_err());
        assert!(CellAddress::parse("ABCD1").is_err());
        assert!(CellAddress::parse("A0").is_err());
        assert!(CellAddress::parse("A1B").is_err());
        assert!(CellAddress::parse("#REF!").is_err());
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(CellAddress::column_letters(0), "A");
        assert_eq!(CellAddress::column_letters(25), "Z");
        assert_eq!(CellAddress::column_letters(26), "AA");
        assert_eq!(CellAddress::column_letters(702), "AAA");
    }

    #[test]
    fn test_display() {
        assert_eq!(CellAddress::new(4, 1).to_string(), "B5");
    }
}
