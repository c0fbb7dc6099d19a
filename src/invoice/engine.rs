// src/invoice/engine.rs
// Correction Invocation Boundary: the correction rules themselves live in an
// external engine reachable only through a single request/response call.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

use super::definitions::{
    CellCoordinate, DuplicateNameItem, MissingBarcodeItem, PriceAnomalyItem, Table,
};

/// Named operation flags forwarded to the engine. What each operation does
/// is the engine's business; the client only toggles them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionOperations {
    pub update_names: bool,
    pub format_price_4_dec: bool,
    pub format_col_and_mp_price_2_dec: bool,
    pub remove_duplicate_barcodes: bool,
    pub auto_update_bar_kod: bool,
    pub detect_duplicate_names: bool,
    pub swap_commas_to_dots: bool,
    pub auto_update_price: bool,
}

impl CorrectionOperations {
    pub fn any_enabled(&self) -> bool {
        self.update_names
            || self.format_price_4_dec
            || self.format_col_and_mp_price_2_dec
            || self.remove_duplicate_barcodes
            || self.auto_update_bar_kod
            || self.detect_duplicate_names
            || self.swap_commas_to_dots
            || self.auto_update_price
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionRequest {
    pub table: Table,
    pub operations: CorrectionOperations,
    pub price_threshold_percent: u8,
}

/// Structured result of one automated correction pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionOutcome {
    pub table: Table,
    pub changed_cells: Vec<CellCoordinate>,
    #[serde(default)]
    pub missing_barcodes: Vec<MissingBarcodeItem>,
    #[serde(default)]
    pub duplicate_names: Vec<DuplicateNameItem>,
    #[serde(default)]
    pub price_anomalies: Vec<PriceAnomalyItem>,
    #[serde(default)]
    pub export_str: String,
    #[serde(default)]
    pub applied_cell_count: usize,
}

#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("failed to start correction engine '{0}': {1}")]
    Spawn(String, String),
    #[error("correction engine I/O error: {0}")]
    Io(String),
    #[error("correction engine returned invalid response: {0}")]
    InvalidResponse(String),
    #[error("correction engine exited with failure: {0}")]
    EngineFailure(String),
}

/// Seam to the external rule engine. The whole call is opaque: one request
/// in, one structured outcome out, no partial application on failure.
pub trait CorrectionEngine: Send + Sync {
    fn apply(&self, request: &CorrectionRequest) -> Result<CorrectionOutcome, EngineError>;
}

/// Shared handle to whichever engine implementation the app was wired with.
#[derive(Resource, Clone)]
pub struct CorrectionEngineHandle(pub std::sync::Arc<dyn CorrectionEngine>);

/// Engine reached as a child process: request JSON on stdin, response JSON
/// on stdout, human-readable failure on stderr.
pub struct SubprocessEngine {
    program: PathBuf,
}

impl SubprocessEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl CorrectionEngine for SubprocessEngine {
    fn apply(&self, request: &CorrectionRequest) -> Result<CorrectionOutcome, EngineError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                EngineError::Spawn(self.program.display().to_string(), e.to_string())
            })?;

        // Feed stdin from its own thread while wait_with_output drains
        // stdout; an engine that fills its stdout pipe before consuming the
        // request would otherwise deadlock against us.
        let stdin = child.stdin.take();
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&payload)?;
            }
            Ok(())
        });

        let output = child
            .wait_with_output()
            .map_err(|e| EngineError::Io(e.to_string()))?;
        let write_result = writer
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer thread panicked")));

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(EngineError::EngineFailure(if stderr.is_empty() {
                format!("exit status {}", output.status)
            } else {
                stderr
            }));
        }

        match serde_json::from_slice(&output.stdout) {
            Ok(outcome) => Ok(outcome),
            Err(parse_err) => {
                // A write failure (engine closed stdin early) explains a
                // garbled response better than the parse error does.
                write_result.map_err(|e| EngineError::Io(e.to_string()))?;
                Err(EngineError::InvalidResponse(parse_err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_any_enabled() {
        let mut ops = CorrectionOperations::default();
        assert!(!ops.any_enabled());
        ops.swap_commas_to_dots = true;
        assert!(ops.any_enabled());
    }

    #[cfg(unix)]
    #[test]
    fn chatty_engine_does_not_deadlock_the_pipe_pair() {
        use std::os::unix::fs::PermissionsExt;

        // An engine that floods stdout past the pipe buffer before reading
        // its stdin. If we wrote stdin synchronously, both sides would
        // block forever on full pipes.
        let dir = std::env::temp_dir().join(format!(
            "fakturnik-engine-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let script = dir.join("chatty-engine.sh");
        std::fs::write(&script, "#!/bin/sh\nhead -c 262144 /dev/zero\ncat > /dev/null\n")
            .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        // A request well past the pipe buffer size.
        let mut table = Table::new(vec!["A".to_string()]);
        for i in 0..20_000 {
            let mut row = std::collections::HashMap::new();
            row.insert("A".to_string(), format!("row {i}"));
            table.rows.push(row);
        }
        let request = CorrectionRequest {
            table,
            operations: CorrectionOperations::default(),
            price_threshold_percent: 5,
        };

        let result = SubprocessEngine::new(&script).apply(&request);
        std::fs::remove_dir_all(&dir).ok();

        // The call must return; the zero-filled stdout is not valid JSON.
        assert!(matches!(result, Err(EngineError::InvalidResponse(_))));
    }

    #[test]
    fn outcome_deserializes_with_missing_optional_lists() {
        // Engines predating duplicate-name detection omit the newer lists.
        let json = r#"{
            "table": { "headers": ["A"], "rows": [{"A": "1"}] },
            "changedCells": [{"row": 0, "col": "A"}]
        }"#;
        let outcome: CorrectionOutcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.table.row_count(), 1);
        assert_eq!(outcome.changed_cells.len(), 1);
        assert!(outcome.missing_barcodes.is_empty());
        assert!(outcome.duplicate_names.is_empty());
        assert!(outcome.price_anomalies.is_empty());
        assert_eq!(outcome.export_str, "");
    }
}
