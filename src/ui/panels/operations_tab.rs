// src/ui/panels/operations_tab.rs
use bevy::prelude::*;
use bevy_egui::egui;

use crate::invoice::events::{RequestExportDialog, RequestRunCorrection};
use crate::invoice::resources::WorkspaceData;
use crate::ui::state::ReviewUiState;

pub fn show_operations_tab(
    ui: &mut egui::Ui,
    state: &mut ReviewUiState,
    workspace: &WorkspaceData,
    run_writer: &mut EventWriter<RequestRunCorrection>,
    export_writer: &mut EventWriter<RequestExportDialog>,
) {
    let has_catalog = workspace.catalog.is_some();
    let ops = &mut state.session_operations;

    ui.columns(2, |columns| {
        let ui = &mut columns[0];
        ui.checkbox(&mut ops.swap_commas_to_dots, "Swap commas to dots");
        ui.checkbox(&mut ops.format_price_4_dec, "Format prices to 4 decimals");
        ui.checkbox(
            &mut ops.format_col_and_mp_price_2_dec,
            "Format totals and retail prices to 2 decimals",
        );
        ui.checkbox(&mut ops.remove_duplicate_barcodes, "Remove duplicate barcodes");

        // These need catalog rows to compare against.
        let ui = &mut columns[1];
        ui.add_enabled(
            has_catalog,
            egui::Checkbox::new(&mut ops.update_names, "Update names from catalog"),
        );
        ui.add_enabled(
            has_catalog,
            egui::Checkbox::new(
                &mut ops.auto_update_bar_kod,
                "Fill missing barcodes from catalog",
            ),
        );
        ui.add_enabled(
            has_catalog,
            egui::Checkbox::new(&mut ops.detect_duplicate_names, "Detect duplicate names"),
        );
        ui.add_enabled(
            has_catalog,
            egui::Checkbox::new(&mut ops.auto_update_price, "Flag price anomalies"),
        );
    });
    if !has_catalog {
        ui.weak("Catalog-based operations are disabled until a catalog is loaded.");
    }

    ui.separator();
    ui.horizontal(|ui| {
        let can_run = workspace.invoice.is_some()
            && !workspace.processing
            && state.session_operations.any_enabled();
        if ui
            .add_enabled(can_run, egui::Button::new("Apply"))
            .clicked()
        {
            run_writer.write(RequestRunCorrection {
                operations: state.session_operations,
            });
        }
        if ui
            .add_enabled(
                !workspace.export_text.is_empty(),
                egui::Button::new("Save As..."),
            )
            .clicked()
        {
            export_writer.write(RequestExportDialog);
        }
    });
}
