use eframe::egui;

use crate::state::{AppState, Mode};
use crate::ui::{batch, panels, plot, single};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TumorDashApp {
    pub state: AppState,
}

impl TumorDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for TumorDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: navigation ----
        egui::SidePanel::left("menu_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active mode ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.mode {
            Mode::SinglePatient => single::single_patient_view(ui, &mut self.state),
            Mode::BatchPatients => batch::batch_view(ui, &mut self.state),
            Mode::Analytics => plot::analytics_view(ui, &mut self.state),
        });
    }
}
