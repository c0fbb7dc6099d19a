// src/ui/grid/view.rs
// Windowed grid rendering. Only the rows inside the viewport (plus a small
// overscan band) are laid out each frame, so tables with tens of thousands
// of rows stay responsive. The header row is pinned: it scrolls
// horizontally with the body but never vertically.

use bevy_egui::egui::{self, Align2, Color32, CursorIcon, FontId, Sense, Stroke, vec2};

use crate::invoice::definitions::{DiffSet, Table};

use super::super::state::GridPaneState;
use super::filter::cell_matches;

const OVERSCAN_ROWS: usize = 3;
const ROW_NUMBER_WIDTH: f32 = 36.0;
const RESIZE_HANDLE_WIDTH: f32 = 6.0;
const BASE_FONT_SIZE: f32 = 13.0;
const BASE_ROW_HEIGHT: f32 = 22.0;
const CELL_PADDING: f32 = 4.0;

/// What the grid reports back to its caller after a frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridResponse {
    pub scroll: egui::Vec2,
}

/// Renders one table into the given `ui`. `baseline` and `diff` drive the
/// changed-cell highlighting of the corrected preview: highlighted cells
/// show a before/after tooltip against the baseline table.
pub fn show_grid(
    ui: &mut egui::Ui,
    id_salt: &str,
    table: &Table,
    baseline: Option<&Table>,
    diff: Option<&DiffSet>,
    pane: &mut GridPaneState,
) -> GridResponse {
    if table.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.weak("No table loaded.");
        });
        return GridResponse::default();
    }

    let zoom = pane.zoom_factor();
    let font = FontId::proportional(BASE_FONT_SIZE * zoom);
    let row_height = BASE_ROW_HEIGHT * zoom;

    let visible_rows: Vec<usize> = pane.filter.rows(table, &pane.search).to_vec();
    let query = pane.search.clone();
    let pending = pane.pending_scroll.take();
    pane.jumped = pending.is_some();

    let headers = table.headers.clone();
    let column_widths: Vec<f32> = headers.iter().map(|h| pane.widths.get(h) * zoom).collect();
    let total_width: f32 = ROW_NUMBER_WIDTH
        + column_widths.iter().sum::<f32>()
        + RESIZE_HANDLE_WIDTH * headers.len() as f32;

    let mut outer = egui::ScrollArea::horizontal()
        .id_salt((id_salt, "columns"))
        .auto_shrink([false, false]);
    if let Some(target) = pending {
        outer = outer.scroll_offset(vec2(target.x, 0.0));
    }

    let outer_output = outer.show(ui, |ui| {
        draw_header(ui, id_salt, &headers, &column_widths, row_height, &font, zoom, pane);

        let mut inner = egui::ScrollArea::vertical()
            .id_salt((id_salt, "rows"))
            .auto_shrink([false, false]);
        if let Some(target) = pending {
            inner = inner.vertical_scroll_offset(target.y);
        }

        inner.show_viewport(ui, |ui, viewport| {
            let total_height = (visible_rows.len() as f32 * row_height).max(row_height);
            ui.set_height(total_height);
            ui.set_width(total_width);

            if visible_rows.is_empty() {
                ui.painter().text(
                    ui.min_rect().left_top() + vec2(CELL_PADDING, row_height / 2.0),
                    Align2::LEFT_CENTER,
                    if query.trim().is_empty() {
                        "Table has no rows."
                    } else {
                        "No rows match the search."
                    },
                    font.clone(),
                    ui.visuals().weak_text_color(),
                );
                return;
            }

            let first = (viewport.min.y / row_height).floor().max(0.0) as usize;
            let first = first.saturating_sub(OVERSCAN_ROWS);
            let last = ((viewport.max.y / row_height).ceil() as usize + OVERSCAN_ROWS)
                .min(visible_rows.len());

            let top = ui.min_rect().top();
            let left = ui.min_rect().left();

            for slot in first..last {
                let row_index = visible_rows[slot];
                let y = top + slot as f32 * row_height;
                draw_row(
                    ui,
                    id_salt,
                    table,
                    baseline,
                    diff,
                    row_index,
                    &headers,
                    &column_widths,
                    egui::pos2(left, y),
                    row_height,
                    &font,
                    &query,
                );
            }
        })
    });

    let scroll = vec2(
        outer_output.state.offset.x,
        outer_output.inner.state.offset.y,
    );
    pane.scroll = scroll;
    GridResponse { scroll }
}

#[allow(clippy::too_many_arguments)]
fn draw_header(
    ui: &mut egui::Ui,
    id_salt: &str,
    headers: &[String],
    column_widths: &[f32],
    row_height: f32,
    font: &FontId,
    zoom: f32,
    pane: &mut GridPaneState,
) {
    let total_width: f32 = ROW_NUMBER_WIDTH
        + column_widths.iter().sum::<f32>()
        + RESIZE_HANDLE_WIDTH * headers.len() as f32;
    let (rect, _) = ui.allocate_exact_size(vec2(total_width, row_height), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, ui.visuals().faint_bg_color);

    painter.text(
        egui::pos2(rect.left() + CELL_PADDING, rect.center().y),
        Align2::LEFT_CENTER,
        "#",
        font.clone(),
        ui.visuals().weak_text_color(),
    );

    let mut x = rect.left() + ROW_NUMBER_WIDTH;
    for (header, width) in headers.iter().zip(column_widths) {
        let cell = egui::Rect::from_min_size(egui::pos2(x, rect.top()), vec2(*width, row_height));
        painter.with_clip_rect(cell).text(
            egui::pos2(cell.left() + CELL_PADDING, cell.center().y),
            Align2::LEFT_CENTER,
            header,
            font.clone(),
            ui.visuals().strong_text_color(),
        );
        x += width;

        // Drag handle on the column's right edge.
        let handle = egui::Rect::from_min_size(
            egui::pos2(x, rect.top()),
            vec2(RESIZE_HANDLE_WIDTH, row_height),
        );
        let response = ui
            .interact(
                handle,
                ui.id().with((id_salt, "resize", header)),
                Sense::drag(),
            )
            .on_hover_cursor(CursorIcon::ResizeHorizontal);
        if response.dragged() {
            pane.widths.resize(header, response.drag_delta().x / zoom);
        }
        painter.vline(
            handle.center().x,
            rect.y_range(),
            Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
        );
        x += RESIZE_HANDLE_WIDTH;
    }
    painter.hline(
        rect.x_range(),
        rect.bottom(),
        Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_row(
    ui: &mut egui::Ui,
    id_salt: &str,
    table: &Table,
    baseline: Option<&Table>,
    diff: Option<&DiffSet>,
    row_index: usize,
    headers: &[String],
    column_widths: &[f32],
    origin: egui::Pos2,
    row_height: f32,
    font: &FontId,
    query: &str,
) {
    let painter = ui.painter();
    painter.text(
        egui::pos2(origin.x + CELL_PADDING, origin.y + row_height / 2.0),
        Align2::LEFT_CENTER,
        (row_index + 1).to_string(),
        font.clone(),
        ui.visuals().weak_text_color(),
    );

    let mut x = origin.x + ROW_NUMBER_WIDTH;
    for (header, width) in headers.iter().zip(column_widths) {
        let cell = egui::Rect::from_min_size(egui::pos2(x, origin.y), vec2(*width, row_height));
        let value = table.cell(row_index, header);
        let changed = diff.is_some_and(|d| d.contains(row_index, header));

        if changed {
            painter.rect_filled(
                cell,
                0.0,
                Color32::from_rgba_unmultiplied(255, 190, 60, 36),
            );
        }

        let text_color = match cell_text_style(changed, cell_matches(value, query)) {
            CellTextStyle::SearchMatch => ui.visuals().hyperlink_color,
            CellTextStyle::Changed => ui.visuals().warn_fg_color,
            CellTextStyle::Plain => ui.visuals().text_color(),
        };
        painter.with_clip_rect(cell).text(
            egui::pos2(cell.left() + CELL_PADDING, cell.center().y),
            Align2::LEFT_CENTER,
            value,
            font.clone(),
            text_color,
        );

        if changed {
            let response = ui.interact(
                cell,
                ui.id().with((id_salt, "cell", row_index, header)),
                Sense::hover(),
            );
            if response.hovered() {
                let before = baseline.map(|b| b.cell(row_index, header)).unwrap_or("");
                response.on_hover_text(format!(
                    "Before: {}\nAfter: {}",
                    display_value(before),
                    display_value(value)
                ));
            }
        }

        x += width + RESIZE_HANDLE_WIDTH;
    }
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(empty)"
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellTextStyle {
    SearchMatch,
    Changed,
    Plain,
}

/// A search match is marked regardless of whether the cell is diffed; a
/// diffed cell keeps its background fill either way, so both markings stay
/// visible on the same cell.
fn cell_text_style(changed: bool, is_match: bool) -> CellTextStyle {
    if is_match {
        CellTextStyle::SearchMatch
    } else if changed {
        CellTextStyle::Changed
    } else {
        CellTextStyle::Plain
    }
}
