// src/ui/panels/settings_tab.rs
use bevy::prelude::*;
use bevy_egui::egui;

use crate::invoice::events::SessionLogEvent;
use crate::invoice::resources::WorkspaceData;
use crate::settings::{self, AppSettings, ThemeSetting};
use crate::ui::state::{LeftPaneTab, ReviewUiState};

pub fn show_settings_tab(
    ui: &mut egui::Ui,
    state: &mut ReviewUiState,
    settings: &mut AppSettings,
    workspace: &WorkspaceData,
    log_writer: &mut EventWriter<SessionLogEvent>,
) {
    match &workspace.catalog {
        Some(catalog) => {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "Catalog: {} ({} rows, {} columns, loaded {})",
                    catalog.display_name,
                    catalog.table.row_count(),
                    catalog.table.headers.len(),
                    catalog.loaded_at
                ));
                if ui.button("View").clicked() {
                    state.left_tab = LeftPaneTab::Catalog;
                }
            });
        }
        None => {
            ui.weak("Catalog: none loaded.");
        }
    }
    ui.separator();

    ui.label("Default operations (pre-ticked on startup):");
    let defaults = &mut settings.default_operations;
    ui.horizontal_wrapped(|ui| {
        ui.checkbox(&mut defaults.swap_commas_to_dots, "Swap commas to dots");
        ui.checkbox(&mut defaults.format_price_4_dec, "4-decimal prices");
        ui.checkbox(&mut defaults.format_col_and_mp_price_2_dec, "2-decimal totals");
        ui.checkbox(&mut defaults.remove_duplicate_barcodes, "Remove duplicate barcodes");
        ui.checkbox(&mut defaults.update_names, "Update names");
        ui.checkbox(&mut defaults.auto_update_bar_kod, "Fill barcodes");
        ui.checkbox(&mut defaults.detect_duplicate_names, "Detect duplicate names");
        ui.checkbox(&mut defaults.auto_update_price, "Flag price anomalies");
    });
    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Price anomaly threshold:");
        let mut threshold = settings.price_threshold_percent as i64;
        ui.add(
            egui::DragValue::new(&mut threshold)
                .range(0..=100)
                .suffix("%"),
        );
        settings.price_threshold_percent = AppSettings::clamp_threshold(threshold);
    });

    ui.horizontal(|ui| {
        ui.label("Theme:");
        ui.selectable_value(&mut settings.theme, ThemeSetting::Dark, "Dark");
        ui.selectable_value(&mut settings.theme, ThemeSetting::Light, "Light");
    });

    ui.horizontal(|ui| {
        ui.label("Correction engine:");
        ui.add(egui::TextEdit::singleline(&mut settings.engine_program).desired_width(240.0));
    });

    ui.separator();
    if ui.button("Save Settings").clicked() {
        match settings::io::save_settings(settings) {
            Ok(()) => {
                log_writer.write(SessionLogEvent::info("Settings saved."));
            }
            Err(e) => {
                log_writer.write(SessionLogEvent::error(format!(
                    "Could not save settings: {}",
                    e
                )));
            }
        }
    }
}
