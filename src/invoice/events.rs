// src/invoice/events.rs
use bevy::prelude::Event;
use std::collections::HashMap;
use std::path::PathBuf;

use super::engine::{CorrectionOperations, CorrectionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Invoice,
    Catalog,
}

/// User asked to pick a file for the given table slot. Handled by the io
/// systems, which run the file dialog off the main thread.
#[derive(Event, Debug, Clone)]
pub struct RequestOpenTableDialog {
    pub kind: TableKind,
}

/// A file dialog completed with a chosen path.
#[derive(Event, Debug, Clone)]
pub struct TableFileChosen {
    pub kind: TableKind,
    pub path: PathBuf,
}

/// User clicked Apply in the operations panel.
#[derive(Event, Debug, Clone)]
pub struct RequestRunCorrection {
    pub operations: CorrectionOperations,
}

/// Outcome of the external correction call, posted back from the
/// background task.
#[derive(Event, Debug)]
pub struct CorrectionTaskResult {
    pub result: Result<CorrectionOutcome, String>,
    /// Whether the catalog back-fill of missing barcodes was requested.
    pub auto_fetch: bool,
}

/// Operator submitted the current review stage's inputs.
#[derive(Event, Debug, Clone)]
pub struct StageSubmission {
    pub inputs: HashMap<usize, String>,
}

/// Operator skipped (or dismissed) the current review stage.
#[derive(Event, Debug, Clone)]
pub struct StageSkipped;

/// Operator chose to reuse the barcodes cached for the current invoice.
#[derive(Event, Debug, Clone)]
pub struct UsePreviousBarcodes;

/// User asked to export the corrected table.
#[derive(Event, Debug, Clone)]
pub struct RequestExportDialog;

#[derive(Event, Debug, Clone)]
pub struct ExportPathChosen {
    pub path: PathBuf,
}

/// One operator-facing line for the append-only session log.
#[derive(Event, Debug, Clone)]
pub struct SessionLogEvent {
    pub message: String,
    pub is_error: bool,
}

impl SessionLogEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}
