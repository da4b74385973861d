//! Validate → classify → annotate.
//!
//! The classifier only ever sees data that went through the range gate:
//! the scoring functions take [`ValidatedRecord`] / [`ValidatedBatch`],
//! which only the gate can build.

use crate::classifier::Classifier;
use crate::data::fields::{gate_batch, gate_record, ValidatedBatch, ValidatedRecord};
use crate::data::model::{
    BatchTable, Diagnosis, FeatureVector, PatientRecord, Prediction, ScoredBatch,
};
use crate::error::ScoreError;

// ---------------------------------------------------------------------------
// Result annotation
// ---------------------------------------------------------------------------

/// Turn a label and its probability row into a category plus the
/// percentage confidence of that category.
pub fn annotate(label: u8, proba: &[f64; 2]) -> Prediction {
    let diagnosis = Diagnosis::from_label(label);
    let confidence_pct = (proba[diagnosis.class_index()] * 100.0).clamp(0.0, 100.0);
    Prediction {
        diagnosis,
        confidence_pct,
    }
}

/// One classifier call for the whole matrix, then per-row annotation.
fn classify(model: &dyn Classifier, features: &[FeatureVector]) -> Result<Vec<Prediction>, ScoreError> {
    let labels = model.predict(features);
    let probabilities = model.predict_proba(features);
    if labels.len() != features.len() || probabilities.len() != features.len() {
        return Err(ScoreError::OutputShape {
            rows: features.len(),
            labels: labels.len(),
            probabilities: probabilities.len(),
        });
    }
    Ok(labels
        .iter()
        .zip(&probabilities)
        .map(|(&label, proba)| annotate(label, proba))
        .collect())
}

// ---------------------------------------------------------------------------
// Validated entry points
// ---------------------------------------------------------------------------

pub fn score_validated_record(
    model: &dyn Classifier,
    record: &ValidatedRecord,
) -> Result<Prediction, ScoreError> {
    let predictions = classify(model, std::slice::from_ref(record.features()))?;
    predictions.into_iter().next().ok_or(ScoreError::OutputShape {
        rows: 1,
        labels: 0,
        probabilities: 0,
    })
}

pub fn score_validated_batch(
    model: &dyn Classifier,
    batch: ValidatedBatch,
) -> Result<ScoredBatch, ScoreError> {
    let predictions = classify(model, &batch.table().feature_matrix())?;
    Ok(ScoredBatch {
        table: batch.into_table(),
        predictions,
    })
}

// ---------------------------------------------------------------------------
// Gate + score
// ---------------------------------------------------------------------------

pub fn score_record(model: &dyn Classifier, record: PatientRecord) -> Result<Prediction, ScoreError> {
    let validated = gate_record(record)?;
    let prediction = score_validated_record(model, &validated)?;
    log::info!("single patient scored: {prediction}");
    Ok(prediction)
}

/// Any invalid row rejects the whole table.
pub fn score_table(model: &dyn Classifier, table: BatchTable) -> Result<ScoredBatch, ScoreError> {
    let rows = table.len();
    let validated = gate_batch(table).inspect_err(|e| log::warn!("batch rejected: {e}"))?;
    let scored = score_validated_batch(model, validated)?;
    log::info!(
        "scored {rows} patients: {} malignant, {} benign",
        scored.count(Diagnosis::Malignant),
        scored.count(Diagnosis::Benign)
    );
    Ok(scored)
}
