use std::io::Write;
use std::path::Path;

use crate::error::IngestError;

use super::model::ScoredBatch;

/// Default file name offered by the save dialog and the `score` command.
pub const DEFAULT_EXPORT_NAME: &str = "predictions.csv";

/// Write the scored table as CSV: original columns, then the results.
pub fn write_csv<W: Write>(scored: &ScoredBatch, writer: W) -> Result<(), IngestError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(scored.output_headers())?;
    for row in scored.output_rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_csv(scored: &ScoredBatch, path: &Path) -> Result<(), IngestError> {
    let file = std::fs::File::create(path)?;
    write_csv(scored, file)
}
