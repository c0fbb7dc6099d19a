// src/ui/state.rs
// All per-frame UI state lives here so the render systems stay stateless.

use bevy::prelude::Resource;
use bevy_egui::egui;
use std::collections::HashMap;

use crate::invoice::review::ReviewStage;
use crate::settings::ThemeSetting;

use super::grid::filter::FilterCache;
use super::grid::widths::ColumnWidths;

pub const ZOOM_MIN_PERCENT: u32 = 40;
pub const ZOOM_MAX_PERCENT: u32 = 200;
pub const ZOOM_STEP_PERCENT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeftPaneTab {
    #[default]
    Invoice,
    Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RightPaneTab {
    #[default]
    Preview,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BottomTab {
    #[default]
    Operations,
    Settings,
    Log,
}

/// View state of one grid pane: its search box, zoom level, column widths
/// and scroll position.
#[derive(Debug, Clone, Default)]
pub struct GridPaneState {
    pub search: String,
    pub widths: ColumnWidths,
    pub filter: FilterCache,
    pub scroll: egui::Vec2,
    /// Set to jump the pane to an offset on the next frame, e.g. from the
    /// scroll-sync of the opposite pane.
    pub pending_scroll: Option<egui::Vec2>,
    /// True when the last rendered frame applied a `pending_scroll` jump;
    /// such movement is programmatic, not the operator scrolling.
    pub jumped: bool,
    zoom_percent: u32,
}

impl GridPaneState {
    pub fn new() -> Self {
        Self {
            zoom_percent: 100,
            ..Default::default()
        }
    }

    pub fn zoom_percent(&self) -> u32 {
        self.zoom_percent.clamp(ZOOM_MIN_PERCENT, ZOOM_MAX_PERCENT)
    }

    pub fn zoom_factor(&self) -> f32 {
        self.zoom_percent() as f32 / 100.0
    }

    pub fn zoom_in(&mut self) {
        self.zoom_percent =
            (self.zoom_percent() + ZOOM_STEP_PERCENT).min(ZOOM_MAX_PERCENT);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_percent = self
            .zoom_percent()
            .saturating_sub(ZOOM_STEP_PERCENT)
            .max(ZOOM_MIN_PERCENT);
    }
}

#[derive(Resource, Debug)]
pub struct ReviewUiState {
    pub left_tab: LeftPaneTab,
    pub right_tab: RightPaneTab,
    pub bottom_tab: BottomTab,

    pub invoice_pane: GridPaneState,
    pub catalog_pane: GridPaneState,
    pub preview_pane: GridPaneState,

    /// Per-row text buffers for the active review stage popup, keyed by
    /// original row index. Cleared on every stage hand-off.
    pub stage_inputs: HashMap<usize, String>,
    pub last_stage: ReviewStage,
    /// True once the operator chose "enter new" over the cached barcodes,
    /// so the prompt does not reappear within the same review.
    pub previous_prompt_dismissed: bool,

    /// The session's operation checkboxes, seeded from the stored defaults
    /// on the first frame.
    pub session_operations: crate::invoice::engine::CorrectionOperations,
    pub operations_seeded: bool,

    pub applied_theme: Option<ThemeSetting>,
}

impl Default for ReviewUiState {
    fn default() -> Self {
        Self {
            left_tab: LeftPaneTab::default(),
            right_tab: RightPaneTab::default(),
            bottom_tab: BottomTab::default(),
            invoice_pane: GridPaneState::new(),
            catalog_pane: GridPaneState::new(),
            preview_pane: GridPaneState::new(),
            stage_inputs: HashMap::new(),
            last_stage: ReviewStage::Idle,
            previous_prompt_dismissed: false,
            session_operations: Default::default(),
            operations_seeded: false,
            applied_theme: None,
        }
    }
}

impl ReviewUiState {
    /// Drops cached filter results; called whenever the underlying tables
    /// may have changed.
    pub fn invalidate_filters(&mut self) {
        self.invoice_pane.filter.invalidate();
        self.catalog_pane.filter.invalidate();
        self.preview_pane.filter.invalidate();
    }

    /// Resets the stage input buffers when the workflow hands off to a new
    /// stage.
    pub fn sync_stage(&mut self, stage: ReviewStage) {
        if self.last_stage != stage {
            self.stage_inputs.clear();
            self.previous_prompt_dismissed = false;
            self.last_stage = stage;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_steps_stay_inside_range() {
        let mut pane = GridPaneState::new();
        assert_eq!(pane.zoom_percent(), 100);
        for _ in 0..10 {
            pane.zoom_in();
        }
        assert_eq!(pane.zoom_percent(), ZOOM_MAX_PERCENT);
        for _ in 0..20 {
            pane.zoom_out();
        }
        assert_eq!(pane.zoom_percent(), ZOOM_MIN_PERCENT);
    }

    #[test]
    fn stage_change_clears_input_buffers() {
        let mut state = ReviewUiState::default();
        state.stage_inputs.insert(3, "123".into());
        state.previous_prompt_dismissed = true;
        state.sync_stage(ReviewStage::AwaitingBarcodes);
        assert!(state.stage_inputs.is_empty());
        assert!(!state.previous_prompt_dismissed);

        // Same stage again: buffers survive the frame.
        state.stage_inputs.insert(3, "456".into());
        state.sync_stage(ReviewStage::AwaitingBarcodes);
        assert_eq!(state.stage_inputs[&3], "456");
    }
}
