use regex::Regex;
use std::sync::LazyLock;

static FT_IN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\d+)'\s*(\d{1,2})\s*(?:"|in\b)"#).unwrap());
static LEN_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([\d,]+(?:\.\d+)?)\s*(?:lf|linear\s*feet|ft|feet)\b").unwrap()
});
static AREA_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([\d,]+(?:\.\d+)?)\s*(?:sf|sq\s*ft|sq\s*feet|square\s*feet|ft²|ft2)\b")
        .unwrap()
});
static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([\d,]+(?:\.\d+)?)\s*$").unwrap());
static ANY_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d,]+(?:\.\d+)?)").unwrap());

/// Parse a number token, tolerating thousands separators. Returns 0.0 on
/// garbage; value scanning treats zero as "not found".
pub fn num(s: &str) -> f64 {
    s.replace(',', "").trim().parse().unwrap_or(0.0)
}

/// Extract a feet-inches token like `113'6"` or `12' 6"` as decimal feet.
pub fn feet_inches(line: &str) -> Option<f64> {
    let caps = FT_IN.captures(line)?;
    let ft: f64 = caps[1].parse().ok()?;
    let inch: f64 = caps[2].parse().ok()?;
    Some(ft + inch / 12.0)
}

/// Extract a length with an explicit unit suffix (LF/ft/feet).
pub fn length_with_unit(line: &str) -> Option<f64> {
    let caps = LEN_WITH_UNIT.captures(line)?;
    let v = num(&caps[1]);
    (v > 0.0).then_some(v)
}

/// Extract an area with an explicit unit suffix (SF/sq ft/ft²).
pub fn area_with_unit(line: &str) -> Option<f64> {
    let caps = AREA_WITH_UNIT.captures(line)?;
    let v = num(&caps[1]);
    (v > 0.0).then_some(v)
}

/// A line that is nothing but a number. Used as the last-resort fallback for
/// reports that only carry units in a column header.
pub fn bare_number(line: &str) -> Option<f64> {
    let caps = BARE_NUMBER.captures(line)?;
    let v = num(&caps[1]);
    (v > 0.0).then_some(v)
}

/// Loose length parse for short label tails like `96 LF`, `12' 6"`, or `96`.
/// Best-effort; returns 0.0 when nothing parses.
pub fn parse_len_loose(s: &str) -> f64 {
    if let Some(v) = feet_inches(s) {
        return v;
    }
    if let Some(v) = length_with_unit(s) {
        return v;
    }
    ANY_NUMBER
        .captures(s)
        .map(|caps| num(&caps[1]))
        .unwrap_or(0.0)
}
