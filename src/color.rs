use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Metric;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    generate_palette_from(n, 0.0)
}

/// Same as [`generate_palette`], starting the hue wheel at `offset` degrees.
fn generate_palette_from(n: usize, offset: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (offset + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Fixed colour per metric, offset from the continent hues.
pub fn metric_color(metric: Metric) -> Color32 {
    let palette = generate_palette_from(Metric::ORDER.len(), 200.0);
    let idx = Metric::ORDER
        .iter()
        .position(|m| *m == metric)
        .unwrap_or_default();
    palette[idx]
}

// ---------------------------------------------------------------------------
// Color mapping: continent → Color32
// ---------------------------------------------------------------------------

/// Maps every continent of the dataset to a distinct colour. Built from the
/// full continent set so colours stay put while the selection changes.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new(continents: &BTreeSet<String>) -> Self {
        let palette = generate_palette(continents.len());
        let mapping = continents.iter().cloned().zip(palette).collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a continent; unknown names are grey.
    pub fn color_for(&self, continent: &str) -> Color32 {
        self.mapping
            .get(continent)
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}
