use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::classifier::Classifier;
use crate::data::export::save_csv;
use crate::data::loader::load_file;
use crate::data::model::{
    AnalyticsTable, BatchTable, Diagnosis, PatientRecord, Prediction, ScatterPoint, ScoredBatch,
    CONFIDENCE_COLUMN,
};
use crate::data::stats::{histogram, kde_curve, value_counts, Histogram, ValueCount};
use crate::error::{IngestError, ScoreError};
use crate::scoring::{score_record, score_table};

/// Histogram bins in the confidence chart.
pub const CONFIDENCE_BINS: usize = 10;
/// Sample positions of the density curve.
const KDE_POINTS: usize = 200;

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    SinglePatient,
    BatchPatients,
    Analytics,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::SinglePatient, Mode::BatchPatients, Mode::Analytics];

    pub fn title(self) -> &'static str {
        match self {
            Mode::SinglePatient => "Single Patient",
            Mode::BatchPatients => "Batch Patients",
            Mode::Analytics => "Analytics",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-mode views
// ---------------------------------------------------------------------------

/// Single-patient form values and the outcome of the last submit.
#[derive(Debug)]
pub struct SingleForm {
    pub record: PatientRecord,
    pub outcome: Option<Result<Prediction, ScoreError>>,
}

impl Default for SingleForm {
    fn default() -> Self {
        Self {
            record: PatientRecord::defaults(),
            outcome: None,
        }
    }
}

/// A scored batch plus the cells shown in the table.
pub struct BatchView {
    pub source: PathBuf,
    pub scored: ScoredBatch,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl BatchView {
    /// Confidence is shown rounded to two decimals; the export keeps
    /// full precision.
    fn new(source: PathBuf, scored: ScoredBatch) -> Self {
        let headers = scored.output_headers();
        let conf_idx = headers.iter().position(|h| h == CONFIDENCE_COLUMN);
        let rows = scored
            .output_rows()
            .into_iter()
            .zip(&scored.predictions)
            .map(|(mut row, prediction)| {
                if let Some(idx) = conf_idx {
                    row[idx] = format!("{:.2}", prediction.confidence_pct);
                }
                row
            })
            .collect();
        Self {
            source,
            headers,
            rows,
            scored,
        }
    }
}

/// Chart data derived from an uploaded scored table.
pub struct AnalyticsView {
    pub source: PathBuf,
    pub counts: Vec<ValueCount>,
    pub histogram: Option<Histogram>,
    pub density: Vec<[f64; 2]>,
    pub scatter: Option<Vec<ScatterPoint>>,
}

impl AnalyticsView {
    fn new(source: PathBuf, table: AnalyticsTable) -> Self {
        let histogram = histogram(&table.confidences, CONFIDENCE_BINS);
        let density = histogram
            .as_ref()
            .map(|h| {
                let scale = h.total() as f64 * h.bin_width();
                kde_curve(&table.confidences, scale, KDE_POINTS)
            })
            .unwrap_or_default();
        Self {
            source,
            counts: value_counts(&table.labels),
            histogram,
            density,
            scatter: table.scatter,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, read-only afterwards.
    classifier: Box<dyn Classifier>,

    pub mode: Mode,

    pub single: SingleForm,

    pub batch: Option<BatchView>,
    pub batch_error: Option<String>,

    pub analytics: Option<AnalyticsView>,
    pub analytics_error: Option<String>,
    /// The last analytics upload lacked the result columns.
    pub analytics_missing_columns: bool,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self {
            classifier,
            mode: Mode::default(),
            single: SingleForm::default(),
            batch: None,
            batch_error: None,
            analytics: None,
            analytics_error: None,
            analytics_missing_columns: false,
            status_message: None,
        }
    }

    pub fn classifier_description(&self) -> String {
        self.classifier.describe()
    }

    /// Validate the form values and, if they pass, score them.
    pub fn submit_single(&mut self) {
        let outcome = score_record(self.classifier.as_ref(), self.single.record);
        if let Err(e) = &outcome {
            log::warn!("single patient rejected: {e}");
        }
        self.single.outcome = Some(outcome);
    }

    pub fn reset_single(&mut self) {
        self.single = SingleForm::default();
    }

    /// Load, validate and score a patient table.
    pub fn open_batch(&mut self, path: &Path) {
        match self.score_file(path) {
            Ok(scored) => {
                log::info!("Scored {} patients from {}", scored.table.len(), path.display());
                self.batch = Some(BatchView::new(path.to_path_buf(), scored));
                self.batch_error = None;
            }
            Err(e) => {
                log::error!("Batch prediction failed: {e:#}");
                self.batch = None;
                self.batch_error = Some(format!("{e:#}"));
            }
        }
    }

    fn score_file(&self, path: &Path) -> Result<ScoredBatch> {
        let raw = load_file(path).with_context(|| format!("reading {}", path.display()))?;
        let table = BatchTable::from_raw(raw)?;
        Ok(score_table(self.classifier.as_ref(), table)?)
    }

    /// Load a previously scored table for the charts.
    pub fn open_analytics(&mut self, path: &Path) {
        let loaded = load_file(path)
            .with_context(|| format!("reading {}", path.display()))
            .and_then(|raw| Ok(AnalyticsTable::from_raw(&raw)?));
        match loaded {
            Ok(table) => {
                log::info!(
                    "Loaded {} predictions for analytics from {}",
                    table.labels.len(),
                    path.display()
                );
                self.analytics = Some(AnalyticsView::new(path.to_path_buf(), table));
                self.analytics_error = None;
                self.analytics_missing_columns = false;
            }
            Err(e) => {
                log::error!("Analytics load failed: {e:#}");
                self.analytics = None;
                self.analytics_missing_columns = matches!(
                    e.downcast_ref::<IngestError>(),
                    Some(IngestError::MissingColumns(_))
                );
                self.analytics_error = Some(format!("{e:#}"));
            }
        }
    }

    /// Write the current batch results as CSV.
    pub fn export_predictions(&mut self, path: &Path) {
        let result = match &self.batch {
            Some(view) => save_csv(&view.scored, path)
                .with_context(|| format!("writing {}", path.display())),
            None => Err(anyhow::anyhow!("no scored batch to export")),
        };
        self.status_message = Some(match result {
            Ok(()) => {
                log::info!("Exported predictions to {}", path.display());
                format!("Saved {}", path.display())
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                format!("Error: {e:#}")
            }
        });
    }

    pub fn batch_summary(&self) -> Option<(usize, usize)> {
        self.batch.as_ref().map(|view| {
            (
                view.scored.count(Diagnosis::Malignant),
                view.scored.count(Diagnosis::Benign),
            )
        })
    }
}
