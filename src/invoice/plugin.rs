// src/invoice/plugin.rs
use bevy::prelude::*;
use std::sync::Arc;

use super::engine::{CorrectionEngineHandle, SubprocessEngine};
use super::events::{
    CorrectionTaskResult, ExportPathChosen, RequestExportDialog, RequestOpenTableDialog,
    RequestRunCorrection, SessionLogEvent, StageSkipped, StageSubmission, TableFileChosen,
    UsePreviousBarcodes,
};
use super::loader::{JsonTableLoader, TableLoaderHandle};
use super::resources::{BarcodeCache, SessionLog, WorkspaceData};
use super::review::ReviewWorkflow;
use super::systems;
use crate::settings::AppSettings;

/// Ordered phases of one frame: read operator intent, mutate workflow and
/// workspace state, then touch the filesystem.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum InvoiceSystemSet {
    UserInput,
    ApplyChanges,
    FileOperations,
}

pub struct InvoicePlugin;

impl Plugin for InvoicePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorkspaceData>()
            .init_resource::<BarcodeCache>()
            .init_resource::<SessionLog>()
            .init_resource::<ReviewWorkflow>()
            .add_event::<RequestOpenTableDialog>()
            .add_event::<TableFileChosen>()
            .add_event::<RequestRunCorrection>()
            .add_event::<CorrectionTaskResult>()
            .add_event::<StageSubmission>()
            .add_event::<StageSkipped>()
            .add_event::<UsePreviousBarcodes>()
            .add_event::<RequestExportDialog>()
            .add_event::<ExportPathChosen>()
            .add_event::<SessionLogEvent>()
            .configure_sets(
                Update,
                (
                    InvoiceSystemSet::UserInput,
                    InvoiceSystemSet::ApplyChanges,
                    InvoiceSystemSet::FileOperations,
                )
                    .chain(),
            )
            .add_systems(
                Startup,
                (setup_collaborators, systems::io::restore_catalog_snapshot).chain(),
            )
            .add_systems(
                Update,
                (
                    systems::correction::handle_run_correction,
                    systems::io::handle_open_table_dialog,
                    systems::io::handle_export_dialog,
                )
                    .in_set(InvoiceSystemSet::UserInput),
            )
            .add_systems(
                Update,
                (
                    systems::correction::handle_correction_result,
                    systems::review::handle_stage_submission,
                    systems::review::handle_stage_skip,
                    systems::review::handle_use_previous_barcodes,
                    systems::handle_session_log_events,
                )
                    .in_set(InvoiceSystemSet::ApplyChanges),
            )
            .add_systems(
                Update,
                (
                    systems::io::handle_table_file_chosen,
                    systems::io::handle_export_path_chosen,
                )
                    .in_set(InvoiceSystemSet::FileOperations),
            );
        info!("InvoicePlugin initialized.");
    }
}

/// Builds the engine and loader seams from the stored settings.
fn setup_collaborators(mut commands: Commands, settings: Res<AppSettings>) {
    commands.insert_resource(CorrectionEngineHandle(Arc::new(SubprocessEngine::new(
        &settings.engine_program,
    ))));
    commands.insert_resource(TableLoaderHandle(Arc::new(JsonTableLoader)));
}
