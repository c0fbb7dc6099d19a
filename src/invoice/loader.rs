// src/invoice/loader.rs
// Loader boundary: turns an operator-chosen file into a (Table, display
// name) pair. Spreadsheet parsing proper is an external concern; the
// shipped loader reads the app-native JSON table format.

use std::fs;
use std::path::Path;
use thiserror::Error;

use super::definitions::Table;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read '{0}': {1}")]
    Io(String, String),
    #[error("'{0}' is not a valid table file: {1}")]
    Parse(String, String),
}

pub trait TableLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<(Table, String), LoadError>;
}

#[derive(bevy::prelude::Resource, Clone)]
pub struct TableLoaderHandle(pub std::sync::Arc<dyn TableLoader>);

#[derive(Debug, Default)]
pub struct JsonTableLoader;

impl TableLoader for JsonTableLoader {
    fn load(&self, path: &Path) -> Result<(Table, String), LoadError> {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let raw = fs::read_to_string(path)
            .map_err(|e| LoadError::Io(display_name.clone(), e.to_string()))?;
        let table: Table = serde_json::from_str(&raw)
            .map_err(|e| LoadError::Parse(display_name.clone(), e.to_string()))?;
        Ok((table, display_name))
    }
}
