/// Data layer: field ranges, tables, loading, export and statistics.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (text cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  BatchTable   │  feature columns located + parsed
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  fields   │  range gate → ValidatedBatch / invalid row indices
///   └──────────┘
///        │  (scoring)
///        ▼
///   ┌──────────────┐
///   │  ScoredBatch  │ → export (.csv) → AnalyticsTable → stats
///   └──────────────┘
/// ```

pub mod export;
pub mod fields;
pub mod loader;
pub mod model;
pub mod stats;
