// src/invoice/definitions.rs
// Core value types shared by the workflow, the engine boundary and the UI.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Column names the correction domain relies on. Everything else in a table
/// is treated as opaque, data-driven columns.
pub mod columns {
    pub const ITEM_CODE: &str = "Šifra artikla";
    pub const ITEM_NAME: &str = "Naziv artikla";
    pub const BARCODE: &str = "Bar kod";
    pub const TOTAL_PRICE: &str = "Ukupna cena";
    pub const RETAIL_PRICE: &str = "Cena MP";

    pub const CATALOG_CODE: &str = "sifra";
    pub const CATALOG_NAME: &str = "naziv";
    pub const CATALOG_BARCODE: &str = "barkod";
}

/// A row maps header name to cell text. Absent key reads as empty string.
pub type Row = HashMap<String, String>;

/// Rectangular dataset with ordered, unique headers. Row order is
/// significant: the row index is the stable identity used by diffs and
/// exception items.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Cell text at (row, header). Missing row or key reads as "".
    pub fn cell(&self, row: usize, header: &str) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(header))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Writes a cell value. Out-of-range row indices are ignored; the row
    /// index comes from an exception item and must have been produced
    /// against this table.
    pub fn set_cell(&mut self, row: usize, header: &str, value: String) {
        if let Some(r) = self.rows.get_mut(row) {
            r.insert(header.to_string(), value);
        }
    }

    /// Looks up the first row whose `key_header` cell equals `key` and
    /// returns its `value_header` cell.
    pub fn lookup(&self, key_header: &str, key: &str, value_header: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.get(key_header).map(String::as_str) == Some(key))
            .and_then(|r| r.get(value_header))
            .map(String::as_str)
    }
}

/// Address of a single changed cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoordinate {
    pub row: usize,
    pub col: String,
}

/// Sparse set of changed-cell coordinates used for highlighting.
#[derive(Debug, Clone, Default)]
pub struct DiffSet {
    cells: HashSet<(usize, String)>,
}

impl DiffSet {
    pub fn from_coordinates(coords: &[CellCoordinate]) -> Self {
        Self {
            cells: coords
                .iter()
                .map(|c| (c.row, c.col.clone()))
                .collect(),
        }
    }

    pub fn contains(&self, row: usize, col: &str) -> bool {
        self.cells.contains(&(row, col.to_string()))
    }

    pub fn insert(&mut self, row: usize, col: &str) {
        self.cells.insert((row, col.to_string()));
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

/// Row flagged because it still lacks a barcode after the automated pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingBarcodeItem {
    pub row: usize,
    pub code: String,
    pub name: String,
}

/// Row whose name collides with another catalog entry under the matching key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateNameItem {
    pub row: usize,
    pub code: String,
    pub name: String,
    pub catalog_code: String,
}

/// Row whose total/retail price ratio exceeds the configured threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAnomalyItem {
    pub row: usize,
    pub code: String,
    pub name: String,
    pub total_price: f64,
    pub retail_price: f64,
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn absent_cell_reads_as_empty() {
        let mut table = Table::new(vec!["A".into(), "B".into()]);
        table.rows.push(row(&[("A", "1")]));
        assert_eq!(table.cell(0, "A"), "1");
        assert_eq!(table.cell(0, "B"), "");
        assert_eq!(table.cell(5, "A"), "");
    }

    #[test]
    fn set_cell_ignores_out_of_range_rows() {
        let mut table = Table::new(vec!["A".into()]);
        table.rows.push(row(&[("A", "1")]));
        table.set_cell(3, "A", "x".into());
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(0, "A"), "1");
    }

    #[test]
    fn lookup_finds_first_matching_row() {
        let mut table = Table::new(vec!["sifra".into(), "barkod".into()]);
        table.rows.push(row(&[("sifra", "100"), ("barkod", "111")]));
        table.rows.push(row(&[("sifra", "200"), ("barkod", "222")]));
        table.rows.push(row(&[("sifra", "200"), ("barkod", "333")]));
        assert_eq!(table.lookup("sifra", "200", "barkod"), Some("222"));
        assert_eq!(table.lookup("sifra", "999", "barkod"), None);
    }

    #[test]
    fn diff_set_membership() {
        let coords = vec![
            CellCoordinate {
                row: 0,
                col: "Bar kod".into(),
            },
            CellCoordinate {
                row: 2,
                col: "Naziv artikla".into(),
            },
        ];
        let mut diff = DiffSet::from_coordinates(&coords);
        assert!(diff.contains(0, "Bar kod"));
        assert!(!diff.contains(0, "Naziv artikla"));
        diff.insert(1, "Cena MP");
        assert!(diff.contains(1, "Cena MP"));
        assert_eq!(diff.len(), 3);
    }
}
