// src/ui/popups/name_popup.rs
use bevy::prelude::*;
use bevy_egui::egui;
use egui_extras::{Column, TableBuilder};

use crate::invoice::events::{StageSkipped, StageSubmission};
use crate::invoice::review::{ReviewStage, ReviewWorkflow};
use crate::ui::state::ReviewUiState;

pub fn show_name_popup(
    ctx: &egui::Context,
    state: &mut ReviewUiState,
    workflow: &ReviewWorkflow,
    submission_writer: &mut EventWriter<StageSubmission>,
    skip_writer: &mut EventWriter<StageSkipped>,
) {
    if workflow.stage() != ReviewStage::AwaitingNames {
        return;
    }

    let items = workflow.duplicate_names();
    let mut apply = false;
    let mut skip_all = false;
    // Closing the window without submitting counts as skipping the stage.
    let mut window_open = true;

    egui::Window::new("Duplicate Names")
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut window_open)
        .show(ctx, |ui| {
            ui.label(format!(
                "{} item(s) share a name with a different catalog article. Enter a distinct name or leave blank to keep the current one.",
                items.len()
            ));
            ui.separator();

            egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .column(Column::auto())
                    .column(Column::remainder().at_least(160.0))
                    .column(Column::auto())
                    .column(Column::exact(200.0))
                    .header(20.0, |mut header| {
                        header.col(|ui| {
                            ui.strong("Code");
                        });
                        header.col(|ui| {
                            ui.strong("Current name");
                        });
                        header.col(|ui| {
                            ui.strong("Conflicts with");
                        });
                        header.col(|ui| {
                            ui.strong("New name");
                        });
                    })
                    .body(|mut body| {
                        for item in items {
                            body.row(24.0, |mut row| {
                                row.col(|ui| {
                                    ui.label(&item.code);
                                });
                                row.col(|ui| {
                                    ui.label(&item.name);
                                });
                                row.col(|ui| {
                                    ui.label(&item.catalog_code);
                                });
                                row.col(|ui| {
                                    let buffer =
                                        state.stage_inputs.entry(item.row).or_default();
                                    ui.add(
                                        egui::TextEdit::singleline(buffer)
                                            .desired_width(f32::INFINITY),
                                    );
                                });
                            });
                        }
                    });
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Apply").clicked() {
                    apply = true;
                }
                if ui.button("Skip All").clicked() {
                    skip_all = true;
                }
            });
        });

    if apply {
        submission_writer.write(StageSubmission {
            inputs: state.stage_inputs.clone(),
        });
    }
    if skip_all || !window_open {
        skip_writer.write(StageSkipped);
    }
}
