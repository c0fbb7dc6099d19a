// src/ui/grid/filter.rs
// Case-insensitive substring filter over every cell of a table. Results are
// original row indices so highlighting and diffs stay aligned with the
// unfiltered table.

use crate::invoice::definitions::Table;

/// Cached filter result, recomputed only when the query or the table's row
/// count changes. Owners call `invalidate` when the table content itself is
/// replaced.
#[derive(Debug, Clone, Default)]
pub struct FilterCache {
    key: Option<(String, usize)>,
    indices: Vec<usize>,
}

impl FilterCache {
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// Original indices of the rows matching `query`, in table order.
    pub fn rows(&mut self, table: &Table, query: &str) -> &[usize] {
        let needle = query.trim().to_lowercase();
        let key = (needle.clone(), table.row_count());
        if self.key.as_ref() != Some(&key) {
            self.indices = matching_rows(table, &needle);
            self.key = Some(key);
        }
        &self.indices
    }
}

fn matching_rows(table: &Table, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return (0..table.row_count()).collect();
    }
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            table.headers.iter().any(|header| {
                row.get(header)
                    .is_some_and(|value| value.to_lowercase().contains(needle))
            })
        })
        .map(|(index, _)| index)
        .collect()
}

/// Whether one cell matches the active query, for match styling.
pub fn cell_matches(value: &str, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    !needle.is_empty() && value.to_lowercase().contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::definitions::columns;
    use std::collections::HashMap;

    fn table() -> Table {
        let mut table = Table::new(vec![
            columns::ITEM_CODE.to_string(),
            columns::ITEM_NAME.to_string(),
        ]);
        for (code, name) in [("100", "Mleko 1l"), ("200", "Hleb beli"), ("300", "MLEKO 2l")] {
            let mut row = HashMap::new();
            row.insert(columns::ITEM_CODE.to_string(), code.to_string());
            row.insert(columns::ITEM_NAME.to_string(), name.to_string());
            table.rows.push(row);
        }
        table
    }

    #[test]
    fn empty_query_keeps_all_rows() {
        let mut cache = FilterCache::default();
        assert_eq!(cache.rows(&table(), ""), &[0, 1, 2]);
        assert_eq!(cache.rows(&table(), "   "), &[0, 1, 2]);
    }

    #[test]
    fn filter_is_case_insensitive_and_keeps_original_indices() {
        let mut cache = FilterCache::default();
        assert_eq!(cache.rows(&table(), "mleko"), &[0, 2]);
        assert_eq!(cache.rows(&table(), "HLEB"), &[1]);
    }

    #[test]
    fn filter_searches_every_column() {
        let mut cache = FilterCache::default();
        assert_eq!(cache.rows(&table(), "200"), &[1]);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let mut table = table();
        let mut cache = FilterCache::default();
        assert_eq!(cache.rows(&table, "pavlaka"), &[] as &[usize]);
        table.rows[1].insert(columns::ITEM_NAME.to_string(), "Pavlaka 20%".to_string());
        // Same query and row count: the stale result is served until
        // invalidated.
        assert_eq!(cache.rows(&table, "pavlaka"), &[] as &[usize]);
        cache.invalidate();
        assert_eq!(cache.rows(&table, "pavlaka"), &[1]);
    }

    #[test]
    fn cell_match_styling_helper() {
        assert!(cell_matches("Mleko 1l", "mLeKo"));
        assert!(!cell_matches("Mleko 1l", "hleb"));
        assert!(!cell_matches("Mleko 1l", ""));
    }
}
