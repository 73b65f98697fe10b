use crate::color::filter::ColorAdjustment;

/// A named, constant [`ColorAdjustment`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub adjustment: ColorAdjustment,
}

const fn preset(
    name: &'static str,
    brightness: f64,
    contrast: f64,
    saturation: f64,
    grayscale: f64,
    sepia: f64,
) -> Preset {
    Preset {
        name,
        adjustment: ColorAdjustment {
            brightness,
            contrast,
            saturation,
            grayscale,
            sepia,
        },
    }
}

/// Built-in looks offered by the editor.
pub const PRESETS: [Preset; 8] = [
    preset("Normal", 100.0, 100.0, 100.0, 0.0, 0.0),
    preset("Vivid", 115.0, 115.0, 140.0, 0.0, 0.0),
    preset("Vintage", 110.0, 85.0, 80.0, 0.0, 40.0),
    preset("Noir", 100.0, 130.0, 0.0, 100.0, 0.0),
    preset("Cinematic", 95.0, 125.0, 110.0, 0.0, 0.0),
    preset("Sepia", 105.0, 100.0, 100.0, 0.0, 100.0),
    preset("Warm", 105.0, 100.0, 110.0, 0.0, 20.0),
    preset("Cold", 100.0, 110.0, 80.0, 0.0, 0.0),
];

/// Case-insensitive lookup in [`PRESETS`].
pub fn preset_by_name(name: &str) -> Option<&'static Preset> {
    let name = name.trim();
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

impl ColorAdjustment {
    /// Overwrite all five fields with the preset's values.
    pub fn apply_preset(&mut self, preset: &Preset) {
        *self = preset.adjustment;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/presets.rs"]
mod tests;
