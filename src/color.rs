use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Diagnosis;

// ---------------------------------------------------------------------------
// Diagnosis colours
// ---------------------------------------------------------------------------

const MALIGNANT_HUE: f32 = 0.0;
const BENIGN_HUE: f32 = 120.0;

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Red for malignant, green for benign.
pub fn diagnosis_color(diagnosis: Diagnosis) -> Color32 {
    match diagnosis {
        Diagnosis::Malignant => hsl_to_color32(MALIGNANT_HUE, 0.75, 0.5),
        Diagnosis::Benign => hsl_to_color32(BENIGN_HUE, 0.6, 0.4),
    }
}

/// Colour for a `Prediction` cell of an uploaded table; unknown labels are grey.
pub fn label_color(label: &str) -> Color32 {
    Diagnosis::parse(label)
        .map(diagnosis_color)
        .unwrap_or(Color32::GRAY)
}
