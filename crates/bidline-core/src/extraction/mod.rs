//! PDF text extraction backends.
//!
//! Extraction is behind a trait so tests and the desktop shell can inject a
//! fake backend; production uses `pdftotext` from poppler.

mod pdftotext;

pub use pdftotext::PdftotextExtractor;

use crate::error::EstimateError;
use std::path::Path;

/// Maximum pages pulled from a report PDF. Measurement totals live in the
/// first few pages; deep appendix pages only add noise.
pub const DEFAULT_MAX_PAGES: u32 = 6;

pub trait TextExtractor {
    /// Extract the text layer of the first `max_pages` pages.
    fn extract_text(&self, path: &Path, max_pages: u32) -> Result<String, EstimateError>;

    /// Short name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Tries each backend in order, returning the first non-empty text. Yields
/// an empty string when every backend fails, so downstream parsing degrades
/// to a warning-flagged report instead of aborting.
pub struct ExtractorChain {
    backends: Vec<Box<dyn TextExtractor>>,
}

impl ExtractorChain {
    pub fn new(backends: Vec<Box<dyn TextExtractor>>) -> ExtractorChain {
        ExtractorChain { backends }
    }

    pub fn extract_text(&self, path: &Path, max_pages: u32) -> String {
        for backend in &self.backends {
            match backend.extract_text(path, max_pages) {
                Ok(text) if !text.trim().is_empty() => return text,
                Ok(_) => {
                    tracing::warn!(
                        backend = backend.backend_name(),
                        path = %path.display(),
                        "extractor returned empty text"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        backend = backend.backend_name(),
                        path = %path.display(),
                        %err,
                        "extractor failed"
                    );
                }
            }
        }
        String::new()
    }
}

impl Default for ExtractorChain {
    fn default() -> ExtractorChain {
        ExtractorChain::new(vec![Box::new(PdftotextExtractor)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingExtractor;

    impl TextExtractor for FailingExtractor {
        fn extract_text(&self, _path: &Path, _max_pages: u32) -> Result<String, EstimateError> {
            Err(EstimateError::Extraction("boom".into()))
        }

        fn backend_name(&self) -> &'static str {
            "failing"
        }
    }

    struct FixedExtractor(&'static str);

    impl TextExtractor for FixedExtractor {
        fn extract_text(&self, _path: &Path, _max_pages: u32) -> Result<String, EstimateError> {
            Ok(self.0.to_string())
        }

        fn backend_name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_chain_falls_through_to_working_backend() {
        let chain = ExtractorChain::new(vec![
            Box::new(FailingExtractor),
            Box::new(FixedExtractor("Facades 2150 SF")),
        ]);
        assert_eq!(
            chain.extract_text(Path::new("report.pdf"), DEFAULT_MAX_PAGES),
            "Facades 2150 SF"
        );
    }

    #[test]
    fn test_chain_empty_when_all_fail() {
        let chain = ExtractorChain::new(vec![Box::new(FailingExtractor)]);
        assert_eq!(chain.extract_text(Path::new("report.pdf"), 6), "");
    }

    #[test]
    fn test_empty_text_skipped() {
        let chain = ExtractorChain::new(vec![
            Box::new(FixedExtractor("   ")),
            Box::new(FixedExtractor("real text")),
        ]);
        assert_eq!(chain.extract_text(Path::new("report.pdf"), 6), "real text");
    }
}
