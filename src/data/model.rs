use std::fmt;

use crate::error::IngestError;

use super::fields::{locate_columns, FEATURE_COUNT, FIELD_SPECS};

/// Result columns appended to a scored table.
pub const PREDICTION_COLUMN: &str = "Prediction";
pub const CONFIDENCE_COLUMN: &str = "Confidence (%)";

pub const RADIUS_MEAN_COLUMN: &str = "radius_mean";
pub const RADIUS_WORST_COLUMN: &str = "radius_worst";

/// Feature values in [`FIELD_SPECS`] order.
pub type FeatureVector = [f64; FEATURE_COUNT];

// ---------------------------------------------------------------------------
// Diagnosis / Prediction
// ---------------------------------------------------------------------------

/// Class predicted by the model. Label 1 is malignant, anything else benign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl Diagnosis {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Diagnosis::Malignant
        } else {
            Diagnosis::Benign
        }
    }

    /// Index of this class in a probability vector.
    pub fn class_index(self) -> usize {
        match self {
            Diagnosis::Benign => 0,
            Diagnosis::Malignant => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Diagnosis::Benign => "Benign",
            Diagnosis::Malignant => "Malignant",
        }
    }

    /// Exact match on the exported labels.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Benign" => Some(Diagnosis::Benign),
            "Malignant" => Some(Diagnosis::Malignant),
            _ => None,
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Annotated classifier output for one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub diagnosis: Diagnosis,
    /// Probability of the predicted class, in percent, unrounded.
    pub confidence_pct: f64,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Prediction: {} ({:.2}% confidence)",
            self.diagnosis, self.confidence_pct
        )
    }
}

// ---------------------------------------------------------------------------
// PatientRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatientRecord {
    pub features: FeatureVector,
}

impl PatientRecord {
    pub fn new(features: FeatureVector) -> Self {
        Self { features }
    }

    /// The single-patient form's starting values.
    pub fn defaults() -> Self {
        Self::new(FIELD_SPECS.map(|f| f.default))
    }
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self::defaults()
    }
}

// ---------------------------------------------------------------------------
// RawTable – a loaded file before interpretation
// ---------------------------------------------------------------------------

/// Header plus text cells, whatever the source format was.
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Empty cells become NaN so they fail range validation instead of
/// aborting the upload.
fn parse_number(cell: &str, row: usize, column: &str) -> Result<f64, IngestError> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|_| IngestError::NotNumeric {
        row,
        column: column.to_string(),
        value: cell.to_string(),
    })
}

// ---------------------------------------------------------------------------
// BatchTable – patients to score
// ---------------------------------------------------------------------------

/// Uploaded patient table. `rows` keeps every original cell so extra
/// columns survive into the export.
#[derive(Debug, Clone)]
pub struct BatchTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub records: Vec<PatientRecord>,
}

impl BatchTable {
    /// Check the feature columns, then parse every feature cell.
    pub fn from_raw(raw: RawTable) -> Result<Self, IngestError> {
        let indices = locate_columns(&raw.headers, &FIELD_SPECS)?;

        let mut records = Vec::with_capacity(raw.rows.len());
        for (row_no, cells) in raw.rows.iter().enumerate() {
            let mut features = [0.0; FEATURE_COUNT];
            for ((slot, &col), spec) in features.iter_mut().zip(&indices).zip(&FIELD_SPECS) {
                let cell = cells.get(col).map(String::as_str).unwrap_or("");
                *slot = parse_number(cell, row_no, spec.name)?;
            }
            records.push(PatientRecord::new(features));
        }

        Ok(BatchTable {
            headers: raw.headers,
            rows: raw.rows,
            records,
        })
    }

    pub fn feature_matrix(&self) -> Vec<FeatureVector> {
        self.records.iter().map(|r| r.features).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ScoredBatch – patients plus results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ScoredBatch {
    pub table: BatchTable,
    /// One per row of `table`.
    pub predictions: Vec<Prediction>,
}

impl ScoredBatch {
    /// Original headers with `Prediction` and `Confidence (%)` appended.
    /// Columns already present (a re-uploaded export) keep their position.
    pub fn output_headers(&self) -> Vec<String> {
        self.output_layout().0
    }

    /// Cells for every row, with the result columns filled in.
    pub fn output_rows(&self) -> Vec<Vec<String>> {
        let (headers, pred_idx, conf_idx) = self.output_layout();
        self.table
            .rows
            .iter()
            .zip(&self.predictions)
            .map(|(cells, prediction)| {
                let mut row = cells.clone();
                row.resize(headers.len(), String::new());
                row[pred_idx] = prediction.diagnosis.to_string();
                row[conf_idx] = prediction.confidence_pct.to_string();
                row
            })
            .collect()
    }

    pub fn count(&self, diagnosis: Diagnosis) -> usize {
        self.predictions
            .iter()
            .filter(|p| p.diagnosis == diagnosis)
            .count()
    }

    fn output_layout(&self) -> (Vec<String>, usize, usize) {
        let mut headers = self.table.headers.clone();
        let pred_idx = column_or_append(&mut headers, PREDICTION_COLUMN);
        let conf_idx = column_or_append(&mut headers, CONFIDENCE_COLUMN);
        (headers, pred_idx, conf_idx)
    }
}

fn column_or_append(headers: &mut Vec<String>, name: &str) -> usize {
    match headers.iter().position(|h| h == name) {
        Some(idx) => idx,
        None => {
            headers.push(name.to_string());
            headers.len() - 1
        }
    }
}

// ---------------------------------------------------------------------------
// AnalyticsTable – a previously scored table
// ---------------------------------------------------------------------------

/// One scatter-plot point.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub radius_mean: f64,
    pub radius_worst: f64,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsTable {
    /// Non-empty `Prediction` cells.
    pub labels: Vec<String>,
    /// Non-empty `Confidence (%)` cells.
    pub confidences: Vec<f64>,
    /// `None` when the radius columns are absent.
    pub scatter: Option<Vec<ScatterPoint>>,
}

impl AnalyticsTable {
    pub fn from_raw(raw: &RawTable) -> Result<Self, IngestError> {
        let pred_idx = raw.column_index(PREDICTION_COLUMN);
        let conf_idx = raw.column_index(CONFIDENCE_COLUMN);
        let (Some(pred_idx), Some(conf_idx)) = (pred_idx, conf_idx) else {
            let missing = [(PREDICTION_COLUMN, pred_idx), (CONFIDENCE_COLUMN, conf_idx)]
                .into_iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            return Err(IngestError::MissingColumns(missing));
        };

        let mut table = AnalyticsTable::default();
        for (row_no, cells) in raw.rows.iter().enumerate() {
            let label = cells[pred_idx].trim();
            if !label.is_empty() {
                table.labels.push(label.to_string());
            }
            let confidence = parse_number(&cells[conf_idx], row_no, CONFIDENCE_COLUMN)?;
            if !confidence.is_nan() {
                table.confidences.push(confidence);
            }
        }

        let radius_cols = (
            raw.column_index(RADIUS_MEAN_COLUMN),
            raw.column_index(RADIUS_WORST_COLUMN),
        );
        if let (Some(mean_idx), Some(worst_idx)) = radius_cols {
            let mut points = Vec::with_capacity(raw.len());
            for (row_no, cells) in raw.rows.iter().enumerate() {
                let x = parse_number(&cells[mean_idx], row_no, RADIUS_MEAN_COLUMN)?;
                let y = parse_number(&cells[worst_idx], row_no, RADIUS_WORST_COLUMN)?;
                if x.is_nan() || y.is_nan() {
                    continue;
                }
                points.push(ScatterPoint {
                    radius_mean: x,
                    radius_worst: y,
                    label: cells[pred_idx].trim().to_string(),
                });
            }
            table.scatter = Some(points);
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fields::feature_names;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    fn feature_raw(extra: Option<&str>) -> RawTable {
        let mut headers: Vec<&str> = feature_names();
        let mut row = vec!["14.2", "20.1", "90", "650", "0.1", "0.05", "16", "110", "800", "0.07"];
        if let Some(name) = extra {
            headers.push(name);
            row.push("x");
        }
        raw(&headers, &[row.as_slice()])
    }

    #[test]
    fn diagnosis_from_label() {
        assert_eq!(Diagnosis::from_label(1), Diagnosis::Malignant);
        assert_eq!(Diagnosis::from_label(0), Diagnosis::Benign);
        assert_eq!(Diagnosis::parse("Malignant"), Some(Diagnosis::Malignant));
        assert_eq!(Diagnosis::parse("malignant"), None);
    }

    #[test]
    fn prediction_display_rounds_to_two_decimals() {
        let p = Prediction {
            diagnosis: Diagnosis::Malignant,
            confidence_pct: 97.12345,
        };
        assert_eq!(p.to_string(), "Prediction: Malignant (97.12% confidence)");
    }

    #[test]
    fn batch_from_raw_parses_features_in_field_order() {
        let table = BatchTable::from_raw(feature_raw(Some("patient_id"))).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].features[0], 14.2);
        assert_eq!(table.records[0].features[9], 0.07);
        assert_eq!(table.headers.last().map(String::as_str), Some("patient_id"));
    }

    #[test]
    fn batch_missing_area_worst_is_rejected() {
        let mut table = feature_raw(None);
        let idx = table.column_index("area_worst").unwrap();
        table.headers.remove(idx);
        for row in &mut table.rows {
            // a non-numeric cell would fail parsing, proving no row was read
            row[0] = "not a number".into();
            row.remove(idx);
        }
        match BatchTable::from_raw(table) {
            Err(IngestError::MissingColumns(cols)) => assert_eq!(cols, vec!["area_worst"]),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn empty_cell_becomes_nan_and_text_is_rejected() {
        let mut table = feature_raw(None);
        table.rows[0][2] = String::new();
        let parsed = BatchTable::from_raw(table.clone()).unwrap();
        assert!(parsed.records[0].features[2].is_nan());

        table.rows[0][2] = "ninety".into();
        match BatchTable::from_raw(table) {
            Err(IngestError::NotNumeric { row, column, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "perimeter_mean");
            }
            other => panic!("expected non-numeric error, got {other:?}"),
        }
    }

    #[test]
    fn scored_output_appends_result_columns() {
        let table = BatchTable::from_raw(feature_raw(Some("patient_id"))).unwrap();
        let scored = ScoredBatch {
            table,
            predictions: vec![Prediction {
                diagnosis: Diagnosis::Benign,
                confidence_pct: 88.5,
            }],
        };
        let headers = scored.output_headers();
        assert_eq!(headers.len(), FEATURE_COUNT + 3);
        assert_eq!(headers[FEATURE_COUNT + 1], PREDICTION_COLUMN);
        assert_eq!(headers[FEATURE_COUNT + 2], CONFIDENCE_COLUMN);
        let rows = scored.output_rows();
        assert_eq!(rows[0][FEATURE_COUNT], "x");
        assert_eq!(rows[0][FEATURE_COUNT + 1], "Benign");
        assert_eq!(rows[0][FEATURE_COUNT + 2], "88.5");
        assert_eq!(scored.count(Diagnosis::Benign), 1);
        assert_eq!(scored.count(Diagnosis::Malignant), 0);
    }

    #[test]
    fn rescoring_replaces_existing_result_columns() {
        let mut raw_table = feature_raw(Some(PREDICTION_COLUMN));
        raw_table.headers.push(CONFIDENCE_COLUMN.into());
        raw_table.rows[0].push("12".into());
        let scored = ScoredBatch {
            table: BatchTable::from_raw(raw_table).unwrap(),
            predictions: vec![Prediction {
                diagnosis: Diagnosis::Malignant,
                confidence_pct: 91.0,
            }],
        };
        let headers = scored.output_headers();
        assert_eq!(headers.len(), FEATURE_COUNT + 2);
        let rows = scored.output_rows();
        assert_eq!(rows[0][FEATURE_COUNT], "Malignant");
        assert_eq!(rows[0][FEATURE_COUNT + 1], "91");
    }

    #[test]
    fn analytics_requires_result_columns() {
        let table = raw(&["radius_mean", "Prediction"], &[&["14", "Benign"]]);
        match AnalyticsTable::from_raw(&table) {
            Err(IngestError::MissingColumns(cols)) => assert_eq!(cols, vec![CONFIDENCE_COLUMN]),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn analytics_collects_labels_confidences_and_points() {
        let table = raw(
            &["radius_mean", "radius_worst", "Prediction", "Confidence (%)"],
            &[
                &["14", "16", "Benign", "91.5"],
                &["20", "23", "Malignant", "99"],
                &["", "13", "Benign", ""],
            ],
        );
        let analytics = AnalyticsTable::from_raw(&table).unwrap();
        assert_eq!(analytics.labels, vec!["Benign", "Malignant", "Benign"]);
        assert_eq!(analytics.confidences, vec![91.5, 99.0]);
        let points = analytics.scatter.unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].label, "Malignant");
        assert_eq!(points[1].radius_worst, 23.0);
    }

    #[test]
    fn analytics_without_radius_columns_has_no_scatter() {
        let table = raw(&["Prediction", "Confidence (%)"], &[&["Benign", "70"]]);
        let analytics = AnalyticsTable::from_raw(&table).unwrap();
        assert!(analytics.scatter.is_none());
    }
}
