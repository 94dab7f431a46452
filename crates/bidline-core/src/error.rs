use crate::model::Region;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    #[error("PDF text extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: apt install poppler-utils (Linux) or brew install poppler (macOS)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to load catalog from {path}: {reason}")]
    CatalogLoad { path: PathBuf, reason: String },

    #[error("invalid catalog: {0}")]
    CatalogInvalid(String),

    #[error("missing price for item '{item}' in region {region}{variant}")]
    MissingPrice {
        item: String,
        region: Region,
        /// Pre-formatted variant context, e.g. " (finish=ColorPlus)".
        variant: String,
    },

    #[error("no assembly named '{0}' in catalog")]
    UnknownAssembly(String),

    #[error("estimate computation failed: {0}")]
    Compute(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
