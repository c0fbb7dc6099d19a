// src/invoice/systems/mod.rs
pub mod correction;
pub mod io;
pub mod review;

use bevy::prelude::*;

use super::events::SessionLogEvent;
use super::resources::SessionLog;

/// Appends operator-facing outcomes to the session log and mirrors them to
/// the tracing output.
pub fn handle_session_log_events(
    mut events: EventReader<SessionLogEvent>,
    mut log: ResMut<SessionLog>,
) {
    for event in events.read() {
        if event.is_error {
            warn!("{}", event.message);
        } else {
            info!("{}", event.message);
        }
        log.push(event.message.clone(), event.is_error);
    }
}
