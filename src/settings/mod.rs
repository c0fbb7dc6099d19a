pub mod io;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::invoice::engine::CorrectionOperations;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeSetting {
    Dark,
    Light,
}

impl Default for ThemeSetting {
    fn default() -> Self {
        ThemeSetting::Dark
    }
}

/// Operator preferences with a single owner; every mutation flows through
/// this resource and persistence happens only via `settings::io`.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Operation checkboxes pre-ticked when the app starts.
    pub default_operations: CorrectionOperations,
    /// Total/retail ratio above which a price counts as anomalous.
    pub price_threshold_percent: u8,
    pub theme: ThemeSetting,
    /// Program name or path of the external correction engine.
    pub engine_program: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_operations: CorrectionOperations::default(),
            price_threshold_percent: 67,
            theme: ThemeSetting::default(),
            engine_program: "korektor-engine".to_string(),
        }
    }
}

impl AppSettings {
    pub fn clamp_threshold(value: i64) -> u8 {
        value.clamp(0, 100) as u8
    }
}
