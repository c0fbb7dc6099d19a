// src/ui/popups/price_popup.rs
use bevy::prelude::*;
use bevy_egui::egui;
use egui_extras::{Column, TableBuilder};

use crate::invoice::events::{StageSkipped, StageSubmission};
use crate::invoice::review::{ReviewStage, ReviewWorkflow};
use crate::ui::state::ReviewUiState;

/// Ratio the entered price would produce, recomputed live as the operator
/// types. `None` while the field does not hold a positive number.
fn recomputed_percentage(total_price: f64, input: &str) -> Option<f64> {
    let price: f64 = input.trim().parse().ok()?;
    if price > 0.0 {
        Some(total_price / price * 100.0)
    } else {
        None
    }
}

pub fn show_price_popup(
    ctx: &egui::Context,
    state: &mut ReviewUiState,
    workflow: &ReviewWorkflow,
    threshold_percent: u8,
    submission_writer: &mut EventWriter<StageSubmission>,
    skip_writer: &mut EventWriter<StageSkipped>,
) {
    if workflow.stage() != ReviewStage::AwaitingPrices {
        return;
    }

    let items = workflow.price_anomalies();
    let threshold = threshold_percent as f64;
    let mut apply = false;
    let mut skip_all = false;
    // Closing the window without submitting counts as skipping the stage.
    let mut window_open = true;

    egui::Window::new("Price Anomalies")
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut window_open)
        .show(ctx, |ui| {
            ui.label(format!(
                "{} item(s) exceed the {}% total/retail threshold. Enter a new retail price or leave blank to keep the current one.",
                items.len(),
                threshold_percent
            ));
            ui.separator();

            egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .column(Column::auto())
                    .column(Column::remainder().at_least(140.0))
                    .column(Column::auto())
                    .column(Column::auto())
                    .column(Column::auto())
                    .column(Column::exact(110.0))
                    .column(Column::auto())
                    .header(20.0, |mut header| {
                        for title in [
                            "Code", "Name", "Total", "Retail", "Ratio", "New price", "New ratio",
                        ] {
                            header.col(|ui| {
                                ui.strong(title);
                            });
                        }
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
                                    ui.label(format!("{:.2}", item.total_price));
                                });
                                row.col(|ui| {
                                    ui.label(format!("{:.2}", item.retail_price));
                                });
                                row.col(|ui| {
                                    ui.label(format!("{:.2}%", item.percentage));
                                });
                                row.col(|ui| {
                                    let buffer =
                                        state.stage_inputs.entry(item.row).or_default();
                                    ui.add(
                                        egui::TextEdit::singleline(buffer)
                                            .desired_width(f32::INFINITY),
                                    );
                                });
                                row.col(|ui| {
                                    let input = state
                                        .stage_inputs
                                        .get(&item.row)
                                        .map(String::as_str)
                                        .unwrap_or("");
                                    match recomputed_percentage(item.total_price, input) {
                                        Some(pct) if pct <= threshold => {
                                            ui.colored_label(
                                                egui::Color32::from_rgb(80, 180, 80),
                                                format!("{:.2}%", pct),
                                            );
                                        }
                                        Some(pct) => {
                                            ui.colored_label(
                                                egui::Color32::from_rgb(220, 80, 80),
                                                format!("{:.2}% (still high)", pct),
                                            );
                                        }
                                        None => {
                                            ui.weak("-");
                                        }
                                    }
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
