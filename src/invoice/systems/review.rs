// src/invoice/systems/review.rs
// Bridges operator actions from the stage popups into the ReviewWorkflow
// state machine and publishes finished results to the workspace.

use bevy::prelude::*;

use crate::invoice::events::{SessionLogEvent, StageSkipped, StageSubmission, UsePreviousBarcodes};
use crate::invoice::resources::{BarcodeCache, WorkspaceData};
use crate::invoice::review::{ReviewStage, ReviewUpdate, ReviewWorkflow};

fn stage_label(stage: ReviewStage) -> &'static str {
    match stage {
        ReviewStage::Idle => "idle",
        ReviewStage::AwaitingBarcodes => "barcode",
        ReviewStage::AwaitingNames => "name",
        ReviewStage::AwaitingPrices => "price",
    }
}

/// Publishes a finished review or notes the stage hand-off in the log.
pub(super) fn apply_review_update(
    update: ReviewUpdate,
    workspace: &mut WorkspaceData,
    log_writer: &mut EventWriter<SessionLogEvent>,
) {
    match update {
        ReviewUpdate::Finished(result) => {
            let changed = result.diff.len();
            workspace.publish_result(result.table, result.diff, result.export_text);
            log_writer.write(SessionLogEvent::info(format!(
                "Review complete. {} cell(s) differ from the loaded invoice.",
                changed
            )));
        }
        ReviewUpdate::StageEntered(stage) => {
            log_writer.write(SessionLogEvent::info(format!(
                "Awaiting {} review.",
                stage_label(stage)
            )));
        }
    }
}

pub fn handle_stage_submission(
    mut events: EventReader<StageSubmission>,
    mut workflow: ResMut<ReviewWorkflow>,
    mut workspace: ResMut<WorkspaceData>,
    mut cache: ResMut<BarcodeCache>,
    mut log_writer: EventWriter<SessionLogEvent>,
) {
    for event in events.read() {
        let stage = workflow.stage();
        let Some(outcome) = workflow.submit_stage(&event.inputs) else {
            continue;
        };
        if !outcome.applied_barcodes.is_empty() {
            if let Some(invoice_id) = workspace.invoice_identifier() {
                cache.merge(invoice_id, &outcome.applied_barcodes);
            }
        }
        log_writer.write(SessionLogEvent::info(format!(
            "Applied {} {} entr{}.",
            outcome.applied,
            stage_label(stage),
            if outcome.applied == 1 { "y" } else { "ies" }
        )));
        apply_review_update(outcome.update, &mut workspace, &mut log_writer);
    }
}

pub fn handle_stage_skip(
    mut events: EventReader<StageSkipped>,
    mut workflow: ResMut<ReviewWorkflow>,
    mut workspace: ResMut<WorkspaceData>,
    mut log_writer: EventWriter<SessionLogEvent>,
) {
    for _ in events.read() {
        let stage = workflow.stage();
        let Some(update) = workflow.skip_stage() else {
            continue;
        };
        log_writer.write(SessionLogEvent::info(format!(
            "Skipped the {} stage.",
            stage_label(stage)
        )));
        apply_review_update(update, &mut workspace, &mut log_writer);
    }
}

pub fn handle_use_previous_barcodes(
    mut events: EventReader<UsePreviousBarcodes>,
    mut workflow: ResMut<ReviewWorkflow>,
    mut workspace: ResMut<WorkspaceData>,
    cache: Res<BarcodeCache>,
    mut log_writer: EventWriter<SessionLogEvent>,
) {
    for _ in events.read() {
        let Some(cached) = workspace
            .invoice_identifier()
            .and_then(|id| cache.get(id))
            .cloned()
        else {
            log_writer.write(SessionLogEvent::error(
                "No previously entered barcodes for this invoice.",
            ));
            continue;
        };
        let Some(outcome) = workflow.use_cached_barcodes(&cached) else {
            continue;
        };
        log_writer.write(SessionLogEvent::info(format!(
            "Reused {} cached barcode(s).",
            outcome.applied
        )));
        apply_review_update(outcome.update, &mut workspace, &mut log_writer);
    }
}
