use crate::error::EstimateError;
use crate::extraction::TextExtractor;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

/// Extracts the text layer with poppler's `pdftotext -layout`, which keeps
/// label/value columns on the same line. Scanned reports without a text
/// layer produce empty output.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    /// Whether the `pdftotext` binary is on PATH.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .is_ok()
    }
}

impl TextExtractor for PdftotextExtractor {
    fn extract_text(&self, path: &Path, max_pages: u32) -> Result<String, EstimateError> {
        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg(max_pages.to_string())
            .arg(path)
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    EstimateError::PdftotextNotFound
                } else {
                    EstimateError::Extraction(e.to_string())
                }
            })?;

        if !output.status.success() {
            return Err(EstimateError::PdftotextFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn backend_name(&self) -> &'static str {
        "pdftotext"
    }
}
