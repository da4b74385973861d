mod app;
mod classifier;
mod color;
mod config;
mod data;
mod error;
mod scoring;
mod state;
mod ui;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use eframe::egui;

use app::TumorDashApp;
use classifier::{Classifier, LogisticModel};
use config::{Command, Config};
use data::export::save_csv;
use data::loader::load_file;
use data::model::{BatchTable, Diagnosis};
use state::AppState;

fn main() -> Result<()> {
    let config = Config::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let model = LogisticModel::load(&config.model)
        .with_context(|| format!("loading model artifact {}", config.model.display()))?;
    log::info!("Loaded {}", model.describe());

    match config.command {
        Some(Command::Score { input, output }) => score_to_file(&model, &input, &output),
        None => run_dashboard(Box::new(model)),
    }
}

/// Headless batch scoring: the same pipeline as the Batch Patients view.
fn score_to_file(model: &dyn Classifier, input: &Path, output: &Path) -> Result<()> {
    let raw = load_file(input).with_context(|| format!("reading {}", input.display()))?;
    let table = BatchTable::from_raw(raw)?;
    if table.is_empty() {
        bail!("{} has no patient rows", input.display());
    }
    let scored = scoring::score_table(model, table)?;
    save_csv(&scored, output).with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Scored {} patients ({} malignant, {} benign) → {}",
        scored.table.len(),
        scored.count(Diagnosis::Malignant),
        scored.count(Diagnosis::Benign),
        output.display()
    );
    Ok(())
}

fn run_dashboard(classifier: Box<dyn Classifier>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let state = AppState::new(classifier);
    eframe::run_native(
        "Hospital Breast Cancer Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(TumorDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard exited with error: {e}"))
}
