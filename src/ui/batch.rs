use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::label_color;
use crate::data::fields::feature_names;
use crate::data::model::{CONFIDENCE_COLUMN, PREDICTION_COLUMN};
use crate::state::AppState;
use crate::ui::panels::{open_batch_dialog, save_predictions_dialog};

// ---------------------------------------------------------------------------
// Batch prediction (table upload)
// ---------------------------------------------------------------------------

pub fn batch_view(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Batch Prediction (CSV Upload)");
    ui.label("Upload a CSV with the following columns:");
    ui.monospace(feature_names().join(", "));
    ui.add_space(6.0);

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Choose CSV file…").clicked() {
            open_batch_dialog(state);
        }
        if state.batch.is_some() && ui.button("Download Predictions CSV").clicked() {
            save_predictions_dialog(state);
        }
    });

    if let Some(err) = &state.batch_error {
        ui.colored_label(Color32::RED, err);
    }

    if let Some((malignant, benign)) = state.batch_summary() {
        ui.label(format!("{malignant} malignant, {benign} benign"));
    }

    let Some(view) = &state.batch else {
        return;
    };
    ui.label(RichText::new(view.source.display().to_string()).weak());
    ui.separator();

    let highlighted: Vec<bool> = view
        .headers
        .iter()
        .map(|h| h == PREDICTION_COLUMN || h == CONFIDENCE_COLUMN)
        .collect();
    let prediction_idx = view.headers.iter().position(|h| h == PREDICTION_COLUMN);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(70.0), view.headers.len())
        .header(20.0, |mut header| {
            for name in &view.headers {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, view.rows.len(), |mut row| {
                let cells = &view.rows[row.index()];
                let fill = prediction_idx
                    .and_then(|idx| cells.get(idx))
                    .map(|label| label_color(label));
                for (cell, &hl) in cells.iter().zip(&highlighted) {
                    row.col(|ui: &mut Ui| match fill {
                        Some(color) if hl => {
                            ui.label(
                                RichText::new(cell)
                                    .color(Color32::WHITE)
                                    .background_color(color),
                            );
                        }
                        _ => {
                            ui.label(cell);
                        }
                    });
                }
            });
        });
}
