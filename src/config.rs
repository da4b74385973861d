use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::export::DEFAULT_EXPORT_NAME;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Trained model artifact (JSON)
    #[arg(long, env = "TUMOR_DASH_MODEL", default_value = "breast_cancer_model.json")]
    pub model: PathBuf,

    /// Log filter, e.g. `info` or `tumor_dash=debug` (RUST_LOG takes precedence)
    #[arg(long, env = "TUMOR_DASH_LOG", default_value = "info")]
    pub log_level: String,

    /// Without a sub-command the dashboard window opens
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Score a patient table without opening a window
    Score {
        /// Patient table (.csv, .parquet or .json)
        input: PathBuf,

        /// Where to write the scored CSV
        #[arg(short, long, default_value = DEFAULT_EXPORT_NAME)]
        output: PathBuf,
    },
}
