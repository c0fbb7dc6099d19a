// src/ui/grid/scroll_sync.rs
// Mirrors scroll movement from one grid pane onto the other while the sync
// modifier is held. Pure offset math so it tests without a UI.

use bevy_egui::egui;

/// Movement a pane contributed this frame. A pane that just applied a
/// mirrored jump reports no movement, so the jump cannot echo back to the
/// pane that originated it.
pub fn pane_delta(jumped: bool, before: egui::Vec2, after: egui::Vec2) -> egui::Vec2 {
    if jumped {
        egui::Vec2::ZERO
    } else {
        after - before
    }
}

/// Offset the target pane should jump to, given how far the source pane
/// moved this frame. `None` means the target is left alone.
pub fn synced_offset(
    enabled: bool,
    source_delta: egui::Vec2,
    target: egui::Vec2,
) -> Option<egui::Vec2> {
    if !enabled || source_delta == egui::Vec2::ZERO {
        return None;
    }
    Some((target + source_delta).max(egui::Vec2::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_egui::egui::vec2;

    #[test]
    fn disabled_sync_leaves_target_alone() {
        assert_eq!(synced_offset(false, vec2(10.0, 5.0), vec2(0.0, 0.0)), None);
    }

    #[test]
    fn unmoved_source_leaves_target_alone() {
        assert_eq!(synced_offset(true, vec2(0.0, 0.0), vec2(40.0, 40.0)), None);
    }

    #[test]
    fn delta_is_applied_to_the_target_offset() {
        assert_eq!(
            synced_offset(true, vec2(0.0, 30.0), vec2(10.0, 100.0)),
            Some(vec2(10.0, 130.0))
        );
    }

    #[test]
    fn synced_offset_never_goes_negative() {
        assert_eq!(
            synced_offset(true, vec2(-50.0, -50.0), vec2(10.0, 20.0)),
            Some(vec2(0.0, 0.0))
        );
    }

    #[test]
    fn user_scroll_delta_passes_through() {
        assert_eq!(
            pane_delta(false, vec2(0.0, 100.0), vec2(0.0, 130.0)),
            vec2(0.0, 30.0)
        );
    }

    #[test]
    fn mirrored_jump_produces_no_counter_sync() {
        // Frame 1: the user scrolls the source pane by 30 with the
        // modifier held, so the target is told to jump.
        let source_delta = pane_delta(false, vec2(0.0, 90.0), vec2(0.0, 120.0));
        let target = synced_offset(true, source_delta, vec2(0.0, 120.0)).unwrap();
        assert_eq!(target, vec2(0.0, 150.0));

        // Frame 2: the target applied that jump programmatically. Its
        // movement must read as zero, and with the user's hand still, the
        // source pane stays exactly where it was. Without this, the two
        // panes keep drifting by 30 px a frame for as long as the
        // modifier is held.
        let echo = pane_delta(true, vec2(0.0, 120.0), target);
        assert_eq!(echo, egui::Vec2::ZERO);
        assert_eq!(synced_offset(true, echo, vec2(0.0, 120.0)), None);
    }
}
