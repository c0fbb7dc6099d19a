// src/ui/mod.rs
use bevy::prelude::*;
use bevy_egui::{egui, EguiContextPass, EguiContexts};

pub mod grid;
pub mod panels;
pub mod popups;
pub mod state;

use crate::invoice::events::{
    RequestExportDialog, RequestOpenTableDialog, RequestRunCorrection, SessionLogEvent,
    StageSkipped, StageSubmission, UsePreviousBarcodes,
};
use crate::invoice::resources::{BarcodeCache, SessionLog, WorkspaceData};
use crate::invoice::review::ReviewWorkflow;
use crate::settings::{AppSettings, ThemeSetting};

use panels::{
    log_tab::show_log_tab, main_view::show_main_view, operations_tab::show_operations_tab,
    settings_tab::show_settings_tab,
};
use popups::{show_barcode_popup, show_name_popup, show_price_popup};
use state::{BottomTab, ReviewUiState};

/// Plugin for the reconciliation front-end.
pub struct ReviewUiPlugin;

impl Plugin for ReviewUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ReviewUiState>()
            .add_systems(EguiContextPass, review_ui);
        info!("ReviewUiPlugin initialized.");
    }
}

#[allow(clippy::too_many_arguments)]
pub fn review_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<ReviewUiState>,
    workspace: Res<WorkspaceData>,
    workflow: Res<ReviewWorkflow>,
    cache: Res<BarcodeCache>,
    session_log: Res<SessionLog>,
    mut settings: ResMut<AppSettings>,
    mut open_writer: EventWriter<RequestOpenTableDialog>,
    mut run_writer: EventWriter<RequestRunCorrection>,
    mut submission_writer: EventWriter<StageSubmission>,
    mut skip_writer: EventWriter<StageSkipped>,
    mut previous_writer: EventWriter<UsePreviousBarcodes>,
    mut export_writer: EventWriter<RequestExportDialog>,
    mut log_writer: EventWriter<SessionLogEvent>,
) {
    let ctx = contexts.ctx_mut();

    if !state.operations_seeded {
        state.session_operations = settings.default_operations;
        state.operations_seeded = true;
    }

    if state.applied_theme != Some(settings.theme) {
        ctx.set_visuals(match settings.theme {
            ThemeSetting::Dark => egui::Visuals::dark(),
            ThemeSetting::Light => egui::Visuals::light(),
        });
        state.applied_theme = Some(settings.theme);
    }

    if workspace.is_changed() {
        state.invalidate_filters();
    }
    state.sync_stage(workflow.stage());

    let has_cached_barcodes = workspace
        .invoice_identifier()
        .and_then(|id| cache.get(id))
        .is_some();
    show_barcode_popup(
        ctx,
        &mut state,
        &workflow,
        has_cached_barcodes,
        &mut submission_writer,
        &mut skip_writer,
        &mut previous_writer,
    );
    show_name_popup(
        ctx,
        &mut state,
        &workflow,
        &mut submission_writer,
        &mut skip_writer,
    );
    show_price_popup(
        ctx,
        &mut state,
        &workflow,
        settings.price_threshold_percent,
        &mut submission_writer,
        &mut skip_writer,
    );

    egui::TopBottomPanel::bottom("bottom_panel")
        .resizable(true)
        .default_height(190.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut state.bottom_tab, BottomTab::Operations, "Operations");
                ui.selectable_value(&mut state.bottom_tab, BottomTab::Settings, "Settings");
                ui.selectable_value(&mut state.bottom_tab, BottomTab::Log, "Log");
            });
            ui.separator();
            match state.bottom_tab {
                BottomTab::Operations => show_operations_tab(
                    ui,
                    &mut state,
                    &workspace,
                    &mut run_writer,
                    &mut export_writer,
                ),
                BottomTab::Settings => show_settings_tab(
                    ui,
                    &mut state,
                    &mut settings,
                    &workspace,
                    &mut log_writer,
                ),
                BottomTab::Log => show_log_tab(ui, &session_log),
            }
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        show_main_view(ui, &mut state, &workspace, &mut open_writer);
    });
}
