// src/ui/grid/widths.rs
// Column widths are keyed by header name so they survive reloads of a table
// with the same schema.

use std::collections::HashMap;

pub const DEFAULT_COLUMN_WIDTH: f32 = 120.0;
pub const MIN_COLUMN_WIDTH: f32 = 40.0;

#[derive(Debug, Clone, Default)]
pub struct ColumnWidths {
    map: HashMap<String, f32>,
}

impl ColumnWidths {
    pub fn get(&self, header: &str) -> f32 {
        self.map.get(header).copied().unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// Applies a drag delta to one column, clamped to the minimum width.
    pub fn resize(&mut self, header: &str, delta: f32) {
        let width = self.get(header) + delta;
        self.map
            .insert(header.to_string(), width.max(MIN_COLUMN_WIDTH));
    }
}
