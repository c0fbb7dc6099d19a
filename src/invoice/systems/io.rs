// src/invoice/systems/io.rs
// File dialogs run on background tasks so the UI never blocks; all disk
// writes in this module are the export file and the catalog snapshot.

use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::invoice::definitions::Table;
use crate::invoice::events::{
    ExportPathChosen, RequestExportDialog, RequestOpenTableDialog, SessionLogEvent,
    TableFileChosen, TableKind,
};
use crate::invoice::loader::TableLoaderHandle;
use crate::invoice::resources::{CatalogTable, WorkspaceData};
use crate::invoice::review::ReviewWorkflow;
use crate::settings;

/// On-disk form of the cached catalog, restored at startup.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub table: Table,
    pub display_name: String,
    pub loaded_at: String,
}

pub fn handle_open_table_dialog(
    mut events: EventReader<RequestOpenTableDialog>,
    runtime: Res<TokioTasksRuntime>,
) {
    for event in events.read() {
        let kind = event.kind;
        runtime.spawn_background_task(move |mut ctx| async move {
            let picked = rfd::FileDialog::new()
                .add_filter("Table files", &["json"])
                .pick_file();
            if let Some(path) = picked {
                ctx.run_on_main_thread(move |ctx_main| {
                    ctx_main.world.send_event(TableFileChosen { kind, path });
                })
                .await;
            }
        });
    }
}

pub fn handle_table_file_chosen(
    mut events: EventReader<TableFileChosen>,
    loader: Res<TableLoaderHandle>,
    mut workspace: ResMut<WorkspaceData>,
    mut workflow: ResMut<ReviewWorkflow>,
    mut log_writer: EventWriter<SessionLogEvent>,
) {
    for event in events.read() {
        let (table, display_name) = match loader.0.load(&event.path) {
            Ok(loaded) => loaded,
            Err(e) => {
                log_writer.write(SessionLogEvent::error(e.to_string()));
                continue;
            }
        };
        match event.kind {
            TableKind::Invoice => {
                log_writer.write(SessionLogEvent::info(format!(
                    "Loaded invoice '{}' ({} rows, {} columns).",
                    display_name,
                    table.row_count(),
                    table.headers.len()
                )));
                workspace.load_invoice(table, display_name);
                workflow.reset();
            }
            TableKind::Catalog => {
                let loaded_at = chrono::Local::now().to_rfc3339();
                log_writer.write(SessionLogEvent::info(format!(
                    "Loaded catalog '{}' ({} items).",
                    display_name,
                    table.row_count()
                )));
                let snapshot = CatalogSnapshot {
                    table: table.clone(),
                    display_name: display_name.clone(),
                    loaded_at: loaded_at.clone(),
                };
                if let Err(e) = settings::io::save_catalog_snapshot(&snapshot) {
                    log_writer.write(SessionLogEvent::error(format!(
                        "Could not persist the catalog snapshot: {}",
                        e
                    )));
                }
                workspace.catalog = Some(CatalogTable {
                    table,
                    display_name,
                    loaded_at,
                });
            }
        }
    }
}

/// Startup: restore the catalog cached by a previous session, if any.
pub fn restore_catalog_snapshot(
    mut workspace: ResMut<WorkspaceData>,
    mut log_writer: EventWriter<SessionLogEvent>,
) {
    match settings::io::load_catalog_snapshot::<CatalogSnapshot>() {
        Ok(Some(snapshot)) => {
            log_writer.write(SessionLogEvent::info(format!(
                "Restored catalog '{}' from the previous session.",
                snapshot.display_name
            )));
            workspace.catalog = Some(CatalogTable {
                table: snapshot.table,
                display_name: snapshot.display_name,
                loaded_at: snapshot.loaded_at,
            });
        }
        Ok(None) => {}
        Err(e) => {
            log_writer.write(SessionLogEvent::error(format!(
                "Could not restore the cached catalog: {}",
                e
            )));
        }
    }
}

pub fn handle_export_dialog(
    mut events: EventReader<RequestExportDialog>,
    workspace: Res<WorkspaceData>,
    runtime: Res<TokioTasksRuntime>,
    mut log_writer: EventWriter<SessionLogEvent>,
) {
    for _ in events.read() {
        if workspace.export_text.is_empty() {
            log_writer.write(SessionLogEvent::error("Nothing to export yet."));
            continue;
        }
        runtime.spawn_background_task(move |mut ctx| async move {
            let picked = rfd::FileDialog::new()
                .add_filter("Data file", &["dat"])
                .set_file_name("output.dat")
                .save_file();
            if let Some(path) = picked {
                ctx.run_on_main_thread(move |ctx_main| {
                    ctx_main.world.send_event(ExportPathChosen { path });
                })
                .await;
            }
        });
    }
}

pub fn handle_export_path_chosen(
    mut events: EventReader<ExportPathChosen>,
    workspace: Res<WorkspaceData>,
    mut log_writer: EventWriter<SessionLogEvent>,
) {
    for event in events.read() {
        match fs::write(&event.path, &workspace.export_text) {
            Ok(()) => {
                log_writer.write(SessionLogEvent::info(format!(
                    "Exported to '{}'.",
                    event.path.display()
                )));
            }
            Err(e) => {
                log_writer.write(SessionLogEvent::error(format!(
                    "Export to '{}' failed: {}",
                    event.path.display(),
                    e
                )));
            }
        }
    }
}
