use std::collections::BTreeSet;

use crate::error::{GateError, IngestError};

use super::model::{BatchTable, FeatureVector, PatientRecord};

/// Number of model features, fixed by the trained artifact.
pub const FEATURE_COUNT: usize = 10;

// ---------------------------------------------------------------------------
// Field specification
// ---------------------------------------------------------------------------

/// One model input: column name, display label, inclusive range and the
/// value used to pre-fill the single-patient form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl FieldSpec {
    pub fn contains(&self, value: f64) -> bool {
        validate(value, self.min, self.max)
    }
}

/// The model's feature order. Column lookups, the form and the feature
/// matrix all follow this order.
pub const FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    field("radius_mean", "Radius Mean", 50.0, 14.0),
    field("texture_mean", "Texture Mean", 40.0, 20.0),
    field("perimeter_mean", "Perimeter Mean", 200.0, 90.0),
    field("area_mean", "Area Mean", 2500.0, 650.0),
    field("concavity_mean", "Concavity Mean", 1.0, 0.1),
    field("concave_points_mean", "Concave Points Mean", 0.5, 0.05),
    field("radius_worst", "Radius Worst", 50.0, 16.0),
    field("perimeter_worst", "Perimeter Worst", 200.0, 110.0),
    field("area_worst", "Area Worst", 2500.0, 800.0),
    field("concave_points_worst", "Concave Points Worst", 0.5, 0.07),
];

const fn field(name: &'static str, label: &'static str, max: f64, default: f64) -> FieldSpec {
    FieldSpec {
        name,
        label,
        min: 0.0,
        max,
        default,
    }
}

pub fn feature_names() -> Vec<&'static str> {
    FIELD_SPECS.iter().map(|f| f.name).collect()
}

// ---------------------------------------------------------------------------
// Range checks
// ---------------------------------------------------------------------------

/// Inclusive on both ends. NaN never passes.
pub fn validate(value: f64, min: f64, max: f64) -> bool {
    min <= value && value <= max
}

pub fn validate_record(record: &PatientRecord, specs: &[FieldSpec; FEATURE_COUNT]) -> bool {
    record
        .features
        .iter()
        .zip(specs)
        .all(|(&value, spec)| spec.contains(value))
}

/// Fields of `record` that fall outside their range, in field order.
pub fn out_of_range_fields<'a>(
    record: &PatientRecord,
    specs: &'a [FieldSpec; FEATURE_COUNT],
) -> Vec<&'a FieldSpec> {
    record
        .features
        .iter()
        .zip(specs)
        .filter(|&(&value, spec)| !spec.contains(value))
        .map(|(_, spec)| spec)
        .collect()
}

/// First failing field of an invalid batch row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowViolation {
    pub row: usize,
    pub field: &'static str,
    pub value: f64,
}

/// One entry per invalid row; scanning a row stops at its first failure.
pub fn first_violations(table: &BatchTable, specs: &[FieldSpec; FEATURE_COUNT]) -> Vec<RowViolation> {
    table
        .records
        .iter()
        .enumerate()
        .filter_map(|(row, record)| {
            record
                .features
                .iter()
                .zip(specs)
                .find(|&(&value, spec)| !spec.contains(value))
                .map(|(&value, spec)| RowViolation {
                    row,
                    field: spec.name,
                    value,
                })
        })
        .collect()
}

/// Indices of rows with at least one out-of-range value.
pub fn validate_batch(table: &BatchTable, specs: &[FieldSpec; FEATURE_COUNT]) -> BTreeSet<usize> {
    first_violations(table, specs)
        .into_iter()
        .map(|v| v.row)
        .collect()
}

/// Locate every feature column in `headers`.  All missing columns are
/// reported together; extra columns are ignored.
pub fn locate_columns(
    headers: &[String],
    specs: &[FieldSpec; FEATURE_COUNT],
) -> Result<[usize; FEATURE_COUNT], IngestError> {
    let mut indices = [0usize; FEATURE_COUNT];
    let mut missing = Vec::new();

    for (slot, spec) in indices.iter_mut().zip(specs) {
        match headers.iter().position(|h| h == spec.name) {
            Some(idx) => *slot = idx,
            None => missing.push(spec.name.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(IngestError::MissingColumns(missing))
    }
}

// ---------------------------------------------------------------------------
// Gate: only validated data can be scored
// ---------------------------------------------------------------------------

/// A record whose every field passed the range check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRecord(PatientRecord);

impl ValidatedRecord {
    pub fn features(&self) -> &FeatureVector {
        &self.0.features
    }
}

/// A batch table in which every row passed the range check.
#[derive(Debug, Clone)]
pub struct ValidatedBatch(BatchTable);

impl ValidatedBatch {
    pub fn table(&self) -> &BatchTable {
        &self.0
    }

    pub fn into_table(self) -> BatchTable {
        self.0
    }
}

pub fn gate_record(record: PatientRecord) -> Result<ValidatedRecord, GateError> {
    if validate_record(&record, &FIELD_SPECS) {
        return Ok(ValidatedRecord(record));
    }
    let labels = out_of_range_fields(&record, &FIELD_SPECS)
        .into_iter()
        .map(|spec| spec.label)
        .collect();
    Err(GateError::InvalidFields(labels))
}

pub fn gate_batch(table: BatchTable) -> Result<ValidatedBatch, GateError> {
    let invalid = validate_batch(&table, &FIELD_SPECS);
    if invalid.is_empty() {
        return Ok(ValidatedBatch(table));
    }
    for v in first_violations(&table, &FIELD_SPECS) {
        log::debug!("row {}: {} = {} is out of range", v.row, v.field, v.value);
    }
    Err(GateError::InvalidRows(invalid.into_iter().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RawTable;

    fn default_record() -> PatientRecord {
        PatientRecord::new([14.0, 20.0, 90.0, 650.0, 0.1, 0.05, 16.0, 110.0, 800.0, 0.07])
    }

    fn table_of(records: &[PatientRecord]) -> BatchTable {
        let headers: Vec<String> = feature_names().into_iter().map(String::from).collect();
        let rows = records
            .iter()
            .map(|r| r.features.iter().map(|v| v.to_string()).collect())
            .collect();
        BatchTable::from_raw(RawTable { headers, rows }).unwrap()
    }

    #[test]
    fn validate_is_inclusive_at_both_bounds() {
        assert!(validate(0.0, 0.0, 1.0));
        assert!(validate(1.0, 0.0, 1.0));
        assert!(validate(0.5, 0.0, 1.0));
        assert!(!validate(-0.0001, 0.0, 1.0));
        assert!(!validate(1.0001, 0.0, 1.0));
        assert!(!validate(f64::NAN, 0.0, 1.0));
    }

    #[test]
    fn validate_matches_comparison_over_a_grid() {
        for lo in [-2.0, 0.0, 0.5] {
            for hi in [0.5, 1.0, 3.0] {
                for v in [-3.0, -2.0, 0.0, 0.25, 0.5, 1.0, 2.9, 3.0, 3.1] {
                    assert_eq!(validate(v, lo, hi), lo <= v && v <= hi, "v={v} lo={lo} hi={hi}");
                }
            }
        }
    }

    #[test]
    fn default_record_is_in_range() {
        assert!(validate_record(&default_record(), &FIELD_SPECS));
        assert!(out_of_range_fields(&default_record(), &FIELD_SPECS).is_empty());
        let defaults = PatientRecord::new(FIELD_SPECS.map(|f| f.default));
        assert_eq!(defaults, default_record());
    }

    #[test]
    fn single_out_of_range_field_fails_record() {
        for idx in 0..FEATURE_COUNT {
            let mut record = default_record();
            record.features[idx] = FIELD_SPECS[idx].max + 1.0;
            assert!(!validate_record(&record, &FIELD_SPECS), "field {idx}");
            let failing = out_of_range_fields(&record, &FIELD_SPECS);
            assert_eq!(failing.len(), 1);
            assert_eq!(failing[0].name, FIELD_SPECS[idx].name);
        }
    }

    #[test]
    fn texture_over_forty_is_rejected_by_gate() {
        let mut record = default_record();
        record.features[1] = 45.0;
        assert_eq!(
            gate_record(record),
            Err(GateError::InvalidFields(vec!["Texture Mean"]))
        );
    }

    #[test]
    fn batch_reports_exactly_the_invalid_rows() {
        let good = default_record();
        let mut bad_area = default_record();
        bad_area.features[3] = 3000.0;
        let mut bad_twice = default_record();
        bad_twice.features[0] = -1.0;
        bad_twice.features[9] = 0.9;

        let table = table_of(&[good, bad_area, good, bad_twice, good]);
        let invalid = validate_batch(&table, &FIELD_SPECS);
        assert_eq!(invalid.into_iter().collect::<Vec<_>>(), vec![1, 3]);

        let violations = first_violations(&table, &FIELD_SPECS);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[1].field, "radius_mean");
        assert_eq!(violations[1].value, -1.0);

        match gate_batch(table) {
            Err(GateError::InvalidRows(rows)) => assert_eq!(rows, vec![1, 3]),
            other => panic!("expected invalid rows, got {other:?}"),
        }
    }

    #[test]
    fn locate_columns_reports_all_missing() {
        let headers: Vec<String> = feature_names()
            .into_iter()
            .filter(|n| *n != "area_worst" && *n != "radius_mean")
            .map(String::from)
            .collect();
        match locate_columns(&headers, &FIELD_SPECS) {
            Err(IngestError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["radius_mean".to_string(), "area_worst".to_string()]);
            }
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn locate_columns_ignores_extra_and_order() {
        let mut headers: Vec<String> = vec!["patient_id".into()];
        headers.extend(feature_names().into_iter().rev().map(String::from));
        let indices = locate_columns(&headers, &FIELD_SPECS).unwrap();
        assert_eq!(indices[0], FEATURE_COUNT);
        assert_eq!(indices[FEATURE_COUNT - 1], 1);
    }
}
