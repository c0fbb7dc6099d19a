// src/ui/popups/barcode_popup.rs
use bevy::prelude::*;
use bevy_egui::egui;
use egui_extras::{Column, TableBuilder};

use crate::invoice::events::{StageSkipped, StageSubmission, UsePreviousBarcodes};
use crate::invoice::review::{ReviewStage, ReviewWorkflow};
use crate::ui::state::ReviewUiState;

pub fn show_barcode_popup(
    ctx: &egui::Context,
    state: &mut ReviewUiState,
    workflow: &ReviewWorkflow,
    has_cached_barcodes: bool,
    submission_writer: &mut EventWriter<StageSubmission>,
    skip_writer: &mut EventWriter<StageSkipped>,
    previous_writer: &mut EventWriter<UsePreviousBarcodes>,
) {
    if workflow.stage() != ReviewStage::AwaitingBarcodes {
        return;
    }

    // Offer the per-invoice cache first; "Enter new" suppresses the prompt
    // for the rest of this review.
    if has_cached_barcodes && !state.previous_prompt_dismissed {
        let mut use_previous = false;
        let mut enter_new = false;
        egui::Window::new("Previously Entered Barcodes")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Barcodes were entered for this invoice before.");
                ui.label("Reuse them?");
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Use previous").clicked() {
                        use_previous = true;
                    }
                    if ui.button("Enter new").clicked() {
                        enter_new = true;
                    }
                });
            });
        if use_previous {
            previous_writer.write(UsePreviousBarcodes);
        }
        if enter_new {
            state.previous_prompt_dismissed = true;
        }
        return;
    }

    let items = workflow.missing_barcodes();
    let mut apply = false;
    let mut skip_all = false;
    // Closing the window without submitting counts as skipping the stage.
    let mut window_open = true;

    egui::Window::new("Missing Barcodes")
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut window_open)
        .show(ctx, |ui| {
            ui.label(format!(
                "{} item(s) have no barcode. Leave a field blank to keep the row unresolved.",
                items.len()
            ));
            ui.separator();

            egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .column(Column::auto())
                    .column(Column::remainder().at_least(160.0))
                    .column(Column::exact(140.0))
                    .header(20.0, |mut header| {
                        header.col(|ui| {
                            ui.strong("Code");
                        });
                        header.col(|ui| {
                            ui.strong("Name");
                        });
                        header.col(|ui| {
                            ui.strong("Barcode");
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
