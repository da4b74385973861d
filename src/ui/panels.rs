use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::export::DEFAULT_EXPORT_NAME;
use crate::data::fields::FIELD_SPECS;
use crate::state::{AppState, Mode};

// ---------------------------------------------------------------------------
// Left side panel – navigation
// ---------------------------------------------------------------------------

/// Render the left navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Menu");
    ui.separator();

    for mode in Mode::ALL {
        ui.selectable_value(&mut state.mode, mode, mode.title());
    }

    ui.add_space(8.0);
    ui.separator();

    egui::CollapsingHeader::new(RichText::new("Accepted ranges").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("ranges_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for spec in &FIELD_SPECS {
                        ui.label(spec.name);
                        ui.label(format!("{} – {}", spec.min, spec.max));
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open patient table…").clicked() {
                state.mode = Mode::BatchPatients;
                open_batch_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open scored table…").clicked() {
                state.mode = Mode::Analytics;
                open_analytics_dialog(state);
                ui.close_menu();
            }
            let can_export = state.batch.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export predictions…"))
                .clicked()
            {
                save_predictions_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new("🏥 Hospital Breast Cancer Dashboard").strong());
        ui.separator();
        ui.label(format!("Model: {}", state.classifier_description()));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

const TABLE_EXTENSIONS: [&str; 4] = ["csv", "parquet", "pq", "json"];

fn table_dialog(title: &str) -> rfd::FileDialog {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &TABLE_EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
}

pub fn open_batch_dialog(state: &mut AppState) {
    if let Some(path) = table_dialog("Open patient table").pick_file() {
        state.open_batch(&path);
    }
}

pub fn open_analytics_dialog(state: &mut AppState) {
    if let Some(path) = table_dialog("Open scored table").pick_file() {
        state.open_analytics(&path);
    }
}

pub fn save_predictions_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save predictions")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_predictions(&path);
    }
}
