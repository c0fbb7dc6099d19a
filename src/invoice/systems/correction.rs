// src/invoice/systems/correction.rs
// Runs the external correction engine off the main thread and routes its
// outcome into the review workflow.

use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;

use crate::invoice::engine::{CorrectionEngineHandle, CorrectionRequest};
use crate::invoice::events::{CorrectionTaskResult, RequestRunCorrection, SessionLogEvent};
use crate::invoice::resources::WorkspaceData;
use crate::invoice::review::{AutoFetchOutcome, ReviewWorkflow};
use crate::settings::AppSettings;

use super::review::apply_review_update;

pub fn handle_run_correction(
    mut events: EventReader<RequestRunCorrection>,
    mut workspace: ResMut<WorkspaceData>,
    settings: Res<AppSettings>,
    engine: Res<CorrectionEngineHandle>,
    runtime: Res<TokioTasksRuntime>,
    mut log_writer: EventWriter<SessionLogEvent>,
) {
    for event in events.read() {
        if workspace.processing {
            warn!("Correction requested while another run is in flight; ignoring.");
            continue;
        }
        let Some(invoice) = workspace.invoice.as_ref() else {
            log_writer.write(SessionLogEvent::error("No invoice table loaded."));
            continue;
        };
        if !event.operations.any_enabled() {
            log_writer.write(SessionLogEvent::error("No operations selected."));
            continue;
        }

        let request = CorrectionRequest {
            table: invoice.table.clone(),
            operations: event.operations,
            price_threshold_percent: settings.price_threshold_percent,
        };
        let auto_fetch = event.operations.auto_update_bar_kod;
        let engine = engine.0.clone();

        workspace.processing = true;
        log_writer.write(SessionLogEvent::info("Running correction..."));

        runtime.spawn_background_task(move |mut ctx| async move {
            let result = engine.apply(&request).map_err(|e| e.to_string());
            ctx.run_on_main_thread(move |ctx_main| {
                ctx_main
                    .world
                    .send_event(CorrectionTaskResult { result, auto_fetch });
            })
            .await;
        });
    }
}

pub fn handle_correction_result(
    mut events: EventReader<CorrectionTaskResult>,
    mut workflow: ResMut<ReviewWorkflow>,
    mut workspace: ResMut<WorkspaceData>,
    mut log_writer: EventWriter<SessionLogEvent>,
) {
    for event in events.read() {
        workspace.processing = false;
        match &event.result {
            Err(message) => {
                log_writer.write(SessionLogEvent::error(format!(
                    "Correction failed: {}",
                    message
                )));
            }
            Ok(outcome) => {
                log_writer.write(SessionLogEvent::info(format!(
                    "Correction pass changed {} cell(s).",
                    outcome.applied_cell_count
                )));
                let (update, fetch) = {
                    let catalog = workspace.catalog.as_ref().map(|c| &c.table);
                    workflow.begin_review(outcome.clone(), event.auto_fetch, catalog)
                };
                match fetch {
                    AutoFetchOutcome::NotAttempted => {}
                    AutoFetchOutcome::AllResolved(count) => {
                        log_writer.write(SessionLogEvent::info(format!(
                            "Filled all {} missing barcode(s) from the catalog.",
                            count
                        )));
                    }
                    AutoFetchOutcome::PartiallyResolved { resolved, remaining } => {
                        log_writer.write(SessionLogEvent::info(format!(
                            "Filled {} barcode(s) from the catalog; {} still missing.",
                            resolved, remaining
                        )));
                    }
                }
                apply_review_update(update, &mut workspace, &mut log_writer);
            }
        }
    }
}
