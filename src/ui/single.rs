use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::diagnosis_color;
use crate::data::fields::FIELD_SPECS;
use crate::error::{GateError, ScoreError};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Single patient form
// ---------------------------------------------------------------------------

pub fn single_patient_view(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Single Patient Prediction");
    ui.label("Enter the tumor measurements and press Predict.");
    ui.add_space(8.0);

    egui::Grid::new("single_patient_form")
        .num_columns(3)
        .spacing([16.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            for (value, spec) in state.single.record.features.iter_mut().zip(&FIELD_SPECS) {
                ui.label(spec.label);
                // steps scale with the field's range: 0.01 for [0, 1], 25 for [0, 2500]
                let speed = (spec.max - spec.min) / 100.0;
                ui.add(egui::DragValue::new(value).speed(speed).max_decimals(4));

                let range = format!("[{}, {}]", spec.min, spec.max);
                if spec.contains(*value) {
                    ui.weak(range);
                } else {
                    ui.colored_label(Color32::RED, format!("{range} out of range"));
                }
                ui.end_row();
            }
        });

    ui.add_space(8.0);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Predict").clicked() {
            state.submit_single();
        }
        if ui.button("Reset").clicked() {
            state.reset_single();
        }
    });
    ui.add_space(8.0);

    match &state.single.outcome {
        Some(Ok(prediction)) => {
            let text = RichText::new(prediction.to_string())
                .size(18.0)
                .strong()
                .color(diagnosis_color(prediction.diagnosis));
            ui.label(text);
        }
        Some(Err(ScoreError::Gate(GateError::InvalidFields(fields)))) => {
            ui.colored_label(Color32::RED, "Invalid input values! Check the ranges.");
            for field in fields {
                ui.colored_label(Color32::RED, format!("• {field}"));
            }
        }
        Some(Err(e)) => {
            ui.colored_label(Color32::RED, format!("Error: {e}"));
        }
        None => {}
    }
}
