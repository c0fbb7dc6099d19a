// src/ui/panels/log_tab.rs
use bevy_egui::egui;

use crate::invoice::resources::SessionLog;

pub fn show_log_tab(ui: &mut egui::Ui, log: &SessionLog) {
    if log.entries.is_empty() {
        ui.weak("Nothing logged yet.");
        return;
    }
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for entry in &log.entries {
                let color = if entry.is_error {
                    egui::Color32::from_rgb(220, 80, 80)
                } else {
                    ui.visuals().text_color()
                };
                ui.colored_label(color, format!("[{}] {}", entry.timestamp, entry.message));
            }
        });
}
