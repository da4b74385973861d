use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

const FEATURES: [&str; 10] = [
    "radius_mean",
    "texture_mean",
    "perimeter_mean",
    "area_mean",
    "concavity_mean",
    "concave_points_mean",
    "radius_worst",
    "perimeter_worst",
    "area_worst",
    "concave_points_worst",
];

/// Upper bounds accepted by the dashboard (lower bound is 0).
const MAX: [f64; 10] = [50.0, 40.0, 200.0, 2500.0, 1.0, 0.5, 50.0, 200.0, 2500.0, 0.5];

/// The four hand-written demo patients.
const DEMO_PATIENTS: [[f64; 10]; 4] = [
    [14.2, 20.1, 90.0, 650.0, 0.1, 0.05, 16.0, 110.0, 800.0, 0.07],
    [17.5, 25.0, 110.0, 900.0, 0.2, 0.08, 19.0, 130.0, 1100.0, 0.09],
    [12.0, 15.0, 75.0, 450.0, 0.05, 0.02, 13.0, 90.0, 600.0, 0.03],
    [20.0, 30.0, 130.0, 1400.0, 0.3, 0.12, 23.0, 160.0, 1800.0, 0.15],
];

/// (mean, std) per feature for synthetic benign / malignant patients.
const BENIGN_PROFILE: [(f64, f64); 10] = [
    (12.15, 1.78),
    (17.9, 4.0),
    (78.1, 11.8),
    (463.0, 134.0),
    (0.046, 0.043),
    (0.026, 0.016),
    (13.4, 1.98),
    (87.0, 13.5),
    (558.0, 164.0),
    (0.074, 0.036),
];
const MALIGNANT_PROFILE: [(f64, f64); 10] = [
    (17.46, 3.2),
    (21.6, 3.8),
    (115.4, 21.9),
    (978.0, 368.0),
    (0.161, 0.075),
    (0.088, 0.034),
    (21.1, 4.3),
    (141.4, 29.5),
    (1422.0, 598.0),
    (0.182, 0.046),
];

const SYNTHETIC_PATIENTS: usize = 46;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn synthetic_patient(profile: &[(f64, f64); 10], rng: &mut SimpleRng) -> [f64; 10] {
    let mut row = [0.0; 10];
    for ((slot, &(mean, std)), &max) in row.iter_mut().zip(profile).zip(&MAX) {
        let v = rng.gauss(mean, std).clamp(0.0, max);
        // four decimals, like the measurements in the public dataset
        *slot = (v * 1e4).round() / 1e4;
    }
    row
}

fn write_csv(path: &str, ids: &[String], rows: &[[f64; 10]]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    let mut header = vec!["patient_id"];
    header.extend(FEATURES);
    writer.write_record(&header).expect("Failed to write header");
    for (id, row) in ids.iter().zip(rows) {
        let mut record = vec![id.clone()];
        record.extend(row.iter().map(|v| v.to_string()));
        writer.write_record(&record).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(path: &str, ids: &[String], rows: &[[f64; 10]]) {
    let mut fields = vec![Field::new("patient_id", DataType::Utf8, false)];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
        ids.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    ))];
    for (col, name) in FEATURES.iter().enumerate() {
        fields.push(Field::new(*name, DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(
            rows.iter().map(|r| r[col]).collect::<Vec<_>>(),
        )));
    }
    let schema = Arc::new(Schema::new(fields));

    let batch = RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

/// Illustrative standardised logistic regression in the dashboard's
/// artifact format. The coefficients are hand-picked, not trained.
fn write_model(path: &str) {
    let model = json!({
        "feature_names": FEATURES,
        "scaler": {
            "mean": [14.13, 19.29, 91.97, 654.9, 0.0888, 0.0489, 16.27, 107.26, 880.6, 0.1146],
            "scale": [3.52, 4.30, 24.3, 351.9, 0.0797, 0.0388, 4.83, 33.6, 569.4, 0.0657],
        },
        "coefficients": [0.45, 0.55, 0.40, 0.45, 0.80, 0.95, 0.90, 0.75, 0.85, 1.05],
        "intercept": -0.45,
    });
    let text = serde_json::to_string_pretty(&model).expect("Failed to serialise model");
    std::fs::write(path, text).expect("Failed to write model file");
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut rows: Vec<[f64; 10]> = DEMO_PATIENTS.to_vec();
    for i in 0..SYNTHETIC_PATIENTS {
        let profile = if i % 3 == 0 {
            &MALIGNANT_PROFILE
        } else {
            &BENIGN_PROFILE
        };
        rows.push(synthetic_patient(profile, &mut rng));
    }
    let ids: Vec<String> = (1..=rows.len()).map(|i| format!("P{i:03}")).collect();

    write_csv("sample_patients.csv", &ids, &rows);
    write_parquet("sample_patients.parquet", &ids, &rows);
    write_model("breast_cancer_model.json");

    println!(
        "Wrote {} patients to sample_patients.csv / sample_patients.parquet and a demo model to breast_cancer_model.json",
        rows.len()
    );
}
