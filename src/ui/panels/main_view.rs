// src/ui/panels/main_view.rs
// The central split view: loaded tables on the left, the corrected result
// on the right, with per-pane search, zoom and column state. Holding Ctrl
// while scrolling mirrors the movement onto the opposite pane.

use bevy::prelude::*;
use bevy_egui::egui;

use crate::invoice::events::{RequestOpenTableDialog, TableKind};
use crate::invoice::resources::WorkspaceData;
use crate::ui::grid::scroll_sync::{pane_delta, synced_offset};
use crate::ui::grid::view::show_grid;
use crate::ui::state::{GridPaneState, LeftPaneTab, ReviewUiState, RightPaneTab};

pub fn show_main_view(
    ui: &mut egui::Ui,
    state: &mut ReviewUiState,
    workspace: &WorkspaceData,
    open_writer: &mut EventWriter<RequestOpenTableDialog>,
) {
    ui.horizontal(|ui| {
        if ui.button("Load Invoice...").clicked() {
            open_writer.write(RequestOpenTableDialog {
                kind: TableKind::Invoice,
            });
        }
        if ui.button("Load Catalog...").clicked() {
            open_writer.write(RequestOpenTableDialog {
                kind: TableKind::Catalog,
            });
        }
        if let Some(invoice) = &workspace.invoice {
            ui.separator();
            ui.label(&invoice.display_name);
        }
        if workspace.processing {
            ui.separator();
            ui.spinner();
            ui.weak("Running correction...");
        }
    });
    ui.separator();

    let invoice_scroll_before = state.invoice_pane.scroll;
    let preview_scroll_before = state.preview_pane.scroll;

    ui.columns(2, |columns| {
        left_pane(&mut columns[0], state, workspace);
        right_pane(&mut columns[1], state, workspace);
    });

    // Scroll sync applies only to the invoice/preview pairing; the catalog
    // and export tabs have no row correspondence.
    let sync_held = ui.input(|i| i.modifiers.ctrl || i.modifiers.command);
    let sync_active = sync_held
        && state.left_tab == LeftPaneTab::Invoice
        && state.right_tab == RightPaneTab::Preview;

    // Deltas count only operator scrolling: a pane that just applied a
    // mirrored jump reports zero, otherwise the jump would echo back and
    // forth between the panes.
    let invoice_delta = pane_delta(
        state.invoice_pane.jumped,
        invoice_scroll_before,
        state.invoice_pane.scroll,
    );
    let preview_delta = pane_delta(
        state.preview_pane.jumped,
        preview_scroll_before,
        state.preview_pane.scroll,
    );
    if let Some(target) = synced_offset(sync_active, invoice_delta, state.preview_pane.scroll) {
        state.preview_pane.pending_scroll = Some(target);
    } else if let Some(target) =
        synced_offset(sync_active, preview_delta, state.invoice_pane.scroll)
    {
        state.invoice_pane.pending_scroll = Some(target);
    }
}

fn pane_controls(ui: &mut egui::Ui, pane: &mut GridPaneState) {
    ui.horizontal(|ui| {
        ui.label("Search:");
        ui.add(egui::TextEdit::singleline(&mut pane.search).desired_width(140.0));
        ui.separator();
        if ui.button("-").clicked() {
            pane.zoom_out();
        }
        ui.label(format!("{}%", pane.zoom_percent()));
        if ui.button("+").clicked() {
            pane.zoom_in();
        }
    });
}

fn left_pane(ui: &mut egui::Ui, state: &mut ReviewUiState, workspace: &WorkspaceData) {
    ui.horizontal(|ui| {
        ui.selectable_value(&mut state.left_tab, LeftPaneTab::Invoice, "Invoice");
        ui.selectable_value(&mut state.left_tab, LeftPaneTab::Catalog, "Catalog");
    });
    match state.left_tab {
        LeftPaneTab::Invoice => {
            pane_controls(ui, &mut state.invoice_pane);
            match &workspace.invoice {
                Some(invoice) => {
                    show_grid(
                        ui,
                        "invoice",
                        &invoice.table,
                        None,
                        None,
                        &mut state.invoice_pane,
                    );
                }
                None => {
                    ui.add_space(24.0);
                    ui.weak("Load an invoice to begin.");
                }
            }
        }
        LeftPaneTab::Catalog => {
            pane_controls(ui, &mut state.catalog_pane);
            match &workspace.catalog {
                Some(catalog) => {
                    show_grid(
                        ui,
                        "catalog",
                        &catalog.table,
                        None,
                        None,
                        &mut state.catalog_pane,
                    );
                }
                None => {
                    ui.add_space(24.0);
                    ui.weak("No catalog loaded.");
                }
            }
        }
    }
}

fn right_pane(ui: &mut egui::Ui, state: &mut ReviewUiState, workspace: &WorkspaceData) {
    ui.horizontal(|ui| {
        ui.selectable_value(&mut state.right_tab, RightPaneTab::Preview, "Preview");
        ui.selectable_value(&mut state.right_tab, RightPaneTab::Export, "Export");
    });
    match state.right_tab {
        RightPaneTab::Preview => {
            pane_controls(ui, &mut state.preview_pane);
            match &workspace.preview {
                Some(preview) => {
                    let baseline = workspace.invoice.as_ref().map(|i| &i.table);
                    show_grid(
                        ui,
                        "preview",
                        preview,
                        baseline,
                        Some(&workspace.diff),
                        &mut state.preview_pane,
                    );
                }
                None => {
                    ui.add_space(24.0);
                    ui.weak("Run a correction to see the result here.");
                }
            }
        }
        RightPaneTab::Export => {
            if workspace.export_text.is_empty() {
                ui.add_space(24.0);
                ui.weak("No export text yet.");
            } else {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut workspace.export_text.as_str())
                                .desired_width(f32::INFINITY)
                                .font(egui::TextStyle::Monospace),
                        );
                    });
            }
        }
    }
}
