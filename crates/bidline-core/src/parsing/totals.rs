use crate::model::MeasuredTotals;
use crate::parsing::values;
use regex::Regex;
use std::sync::LazyLock;

/// Header synonyms per metric. Reports from different vendors and report
/// tiers label the same totals differently; matching is substring-based on
/// lowercased lines.
const FACADE_LABELS: &[&str] = &["facades", "total siding", "wall area", "siding area"];
const TRIM_LABELS: &[&str] = &[
    "trim / siding",
    "trim touching siding",
    "trim area",
    "siding & trim only",
];
const EAVE_LABELS: &[&str] = &["eave fascia", "eaves fascia", "eaves"];
const RAKE_LABELS: &[&str] = &["rake fascia", "rakes fascia", "rakes"];
const OPENING_LABELS: &[&str] = &[
    "total perimeter",
    "openings perimeter",
    "perimeter of openings",
    "opening perimeter",
];
const OC_LABELS: &[&str] = &["outside corners", "outside corner"];
const IC_LABELS: &[&str] = &["inside corners", "inside corner"];

/// How far past a header we scan before giving up on its value.
const BLOCK_LOOKAHEAD: usize = 40;

/// Bare numbers are only trusted inside a plausible physical range.
const BARE_MIN: f64 = 1.0;
const BARE_MAX: f64 = 5000.0;

static OC_LOOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bOC\s*:?[\s]*([\d,]+(?:\.\d+)?)").unwrap());
static IC_LOOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bIC\s*:?[\s]*([\d,]+(?:\.\d+)?)").unwrap());

fn matches_any(line_lower: &str, labels: &[&str]) -> bool {
    labels.iter().any(|l| line_lower.contains(l))
}

fn is_known_label(line_lower: &str) -> bool {
    matches_any(line_lower, FACADE_LABELS)
        || matches_any(line_lower, TRIM_LABELS)
        || matches_any(line_lower, EAVE_LABELS)
        || matches_any(line_lower, RAKE_LABELS)
        || matches_any(line_lower, OPENING_LABELS)
        || matches_any(line_lower, OC_LABELS)
        || matches_any(line_lower, IC_LABELS)
}

fn find_header(lines: &[String], labels: &[&str]) -> Option<usize> {
    lines
        .iter()
        .position(|l| matches_any(&l.to_lowercase(), labels))
}

/// A header's value block runs until the next known label or the lookahead
/// limit. The header line itself is part of the block (label and value often
/// share a line in layout-preserved text).
fn block_range(lines: &[String], start: usize) -> std::ops::Range<usize> {
    let end = (start + 1..lines.len().min(start + 1 + BLOCK_LOOKAHEAD))
        .find(|&i| is_known_label(&lines[i].to_lowercase()))
        .unwrap_or_else(|| lines.len().min(start + 1 + BLOCK_LOOKAHEAD));
    start..end
}

/// Scan a block for an area. Unit-suffixed values win over bare numbers.
fn scan_area(lines: &[String], labels: &[&str]) -> f64 {
    let Some(start) = find_header(lines, labels) else {
        return 0.0;
    };
    let range = block_range(lines, start);
    for i in range.clone() {
        if let Some(v) = values::area_with_unit(&lines[i]) {
            return v;
        }
    }
    for i in range {
        let tail = if i == start {
            strip_label(&lines[i], labels)
        } else {
            lines[i].clone()
        };
        if let Some(v) = values::bare_number(&tail) {
            if (BARE_MIN..=BARE_MAX).contains(&v) {
                return v;
            }
        }
    }
    0.0
}

/// Scan a block for a length. Feet-inches tokens win, then unit-suffixed
/// values, then a range-bounded bare number.
fn scan_len(lines: &[String], labels: &[&str]) -> f64 {
    let Some(start) = find_header(lines, labels) else {
        return 0.0;
    };
    let range = block_range(lines, start);
    for i in range.clone() {
        if let Some(v) = values::feet_inches(&lines[i]) {
            return v;
        }
    }
    for i in range.clone() {
        if let Some(v) = values::length_with_unit(&lines[i]) {
            return v;
        }
    }
    for i in range {
        let tail = if i == start {
            strip_label(&lines[i], labels)
        } else {
            lines[i].clone()
        };
        if let Some(v) = values::bare_number(&tail) {
            if (BARE_MIN..=BARE_MAX).contains(&v) {
                return v;
            }
        }
    }
    0.0
}

/// Cut the label text off a combined "label  value" line so the remainder
/// can be treated as a bare value.
fn strip_label(line: &str, labels: &[&str]) -> String {
    let lower = line.to_lowercase();
    for label in labels {
        if let Some(pos) = lower.find(label) {
            return line[pos + label.len()..].to_string();
        }
    }
    line.to_string()
}

/// Extract measurement totals from normalized report lines. Missing metrics
/// come back zero with warning flags set; this never fails.
pub fn parse_totals(lines: &[String], raw_text: &str) -> MeasuredTotals {
    let mut totals = MeasuredTotals {
        facade_sf: scan_area(lines, FACADE_LABELS),
        trim_sf: scan_area(lines, TRIM_LABELS),
        eave_fascia_lf: scan_len(lines, EAVE_LABELS),
        rake_fascia_lf: scan_len(lines, RAKE_LABELS),
        openings_perimeter_lf: scan_len(lines, OPENING_LABELS),
        outside_corners_lf: scan_len(lines, OC_LABELS),
        inside_corners_lf: scan_len(lines, IC_LABELS),
        ..MeasuredTotals::default()
    };

    let lower = raw_text.to_lowercase();
    totals.corners_referenced = lower.contains("corner");

    // Some layouts compress corners into "OC: 96 IC: 40" style tails.
    if totals.outside_corners_lf == 0.0 {
        if let Some(caps) = OC_LOOSE.captures(raw_text) {
            totals.outside_corners_lf = values::num(&caps[1]);
        }
    }
    if totals.inside_corners_lf == 0.0 {
        if let Some(caps) = IC_LOOSE.captures(raw_text) {
            totals.inside_corners_lf = values::num(&caps[1]);
        }
    }

    totals.corner_warning = totals.corners_referenced
        && totals.outside_corners_lf == 0.0
        && totals.inside_corners_lf == 0.0;
    totals.parse_warning = totals.facade_sf == 0.0 && totals.trim_sf == 0.0;

    totals
}
