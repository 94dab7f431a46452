//! Heuristic text parsing for measurement-report exports.
//!
//! Input is the text layer of a PDF (or a plain-text fixture); output is a
//! [`ParsedReport`]. Parsing is best-effort by design: vendors move labels
//! around between report tiers, so every metric falls back through weaker
//! patterns and missing values come back zero with warning flags rather
//! than errors.

mod identity;
mod totals;
pub mod values;

pub use identity::{best_zip, parse_identity};
pub use totals::parse_totals;

use crate::model::ParsedReport;

/// Split text into trimmed, non-empty lines for positional scanning.
pub fn normalized_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Parse one report's text into identity and measurement totals.
///
/// Never fails. Empty or unrecognizable text yields a default report with
/// `parse_warning` set.
pub fn parse(text: &str) -> ParsedReport {
    let lines = normalized_lines(text);
    ParsedReport {
        identity: parse_identity(&lines, text),
        totals: parse_totals(&lines, text),
    }
}
