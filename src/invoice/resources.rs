// src/invoice/resources.rs
use bevy::prelude::*;
use std::collections::HashMap;

use super::definitions::{DiffSet, Table};

/// An operator-loaded table plus the display name it was loaded under.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub display_name: String,
}

/// The loaded reference catalog and its metadata, as shown in settings.
#[derive(Debug, Clone)]
pub struct CatalogTable {
    pub table: Table,
    pub display_name: String,
    /// RFC 3339 timestamp of when the catalog was loaded or restored.
    pub loaded_at: String,
}

/// All tables of the current session: the operator's invoice, the reference
/// catalog, and the corrected preview with its diff and export text.
#[derive(Resource, Debug, Default)]
pub struct WorkspaceData {
    pub invoice: Option<LoadedTable>,
    pub catalog: Option<CatalogTable>,
    pub preview: Option<Table>,
    pub diff: DiffSet,
    pub export_text: String,
    /// True while a correction call is in flight; the Apply control is
    /// disabled for the duration to prevent re-entrant invocation.
    pub processing: bool,
}

impl WorkspaceData {
    /// Replaces the invoice and drops every result derived from the
    /// previous one.
    pub fn load_invoice(&mut self, table: Table, display_name: String) {
        self.invoice = Some(LoadedTable {
            table,
            display_name,
        });
        self.preview = None;
        self.diff.clear();
        self.export_text.clear();
    }

    pub fn invoice_identifier(&self) -> Option<&str> {
        self.invoice.as_ref().map(|i| i.display_name.as_str())
    }

    /// Publishes a finished review as the visible result.
    pub fn publish_result(&mut self, table: Table, diff: DiffSet, export_text: String) {
        self.preview = Some(table);
        self.diff = diff;
        self.export_text = export_text;
    }
}

/// Per-invoice memory of manually entered barcodes, keyed by the invoice's
/// display filename. Grows for the session; never evicted, so re-loading
/// the same invoice can reuse prior entries.
#[derive(Resource, Debug, Default)]
pub struct BarcodeCache {
    entries: HashMap<String, HashMap<usize, String>>,
}

impl BarcodeCache {
    /// Additive union: rows cached earlier but absent from this submission
    /// are kept.
    pub fn merge(&mut self, invoice_id: &str, applied: &[(usize, String)]) {
        if applied.is_empty() {
            return;
        }
        let per_invoice = self.entries.entry(invoice_id.to_string()).or_default();
        for (row, barcode) in applied {
            per_invoice.insert(*row, barcode.clone());
        }
    }

    pub fn get(&self, invoice_id: &str) -> Option<&HashMap<usize, String>> {
        self.entries.get(invoice_id).filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct SessionLogEntry {
    pub timestamp: String,
    pub message: String,
    pub is_error: bool,
}

/// Append-only trail of operator-facing outcomes. Failures land here as
/// entries rather than interrupting the workflow with dialogs.
#[derive(Resource, Debug, Default)]
pub struct SessionLog {
    pub entries: Vec<SessionLogEntry>,
}

impl SessionLog {
    pub fn push(&mut self, message: String, is_error: bool) {
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        self.entries.push(SessionLogEntry {
            timestamp,
            message,
            is_error,
        });
    }
}
