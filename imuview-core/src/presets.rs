//! Built-in preset targets offered to the user.

use serde::Serialize;

use crate::state::Orientation;

/// A named target orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NamedPreset {
    pub name: &'static str,
    pub target: Orientation,
}

const fn preset(name: &'static str, x: f64, y: f64, z: f64) -> NamedPreset {
    NamedPreset {
        name,
        target: Orientation { x, y, z },
    }
}

/// Presets in menu order
pub static PRESETS: [NamedPreset; 6] = [
    preset("Preset 1", 17.2, 1.7, -75.0),
    preset("Preset 2", -31.4, -13.3, 60.0),
    preset("Preset 3", -22.5, -2.9, -170.0),
    preset("Preset 4", -7.0, 43.7, 15.0),
    preset("Preset 5", -44.0, 31.9, 180.0),
    preset("Preset 6", 2.6, 12.2, -110.0),
];

/// Look up a preset by zero-based menu index
pub fn preset_by_index(index: usize) -> Option<&'static NamedPreset> {
    PRESETS.get(index)
}
