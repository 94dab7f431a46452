use crate::model::CustomerIdentity;
use regex::Regex;
use std::sync::LazyLock;

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{5})(?:-\d{4})?\b").unwrap());
static CITY_ST_ZIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z .'-]+),\s*([A-Z]{2})\s+(\d{5})(?:-\d{4})?\s*$").unwrap()
});
static STREET_RE: LazyLock<Regex> = LazyLock::new(|| {
    let suffix = "ST|STREET|AVE|AVENUE|RD|ROAD|DR|DRIVE|LN|LANE|CT|COURT|CIR|CIRCLE|WAY|PKWY|\
                  PARKWAY|BLVD|HIGHWAY|HWY|TRL|TRAIL|TER|TERRACE|PL|PLACE|LOOP";
    Regex::new(&format!(
        r"(?i)^\s*\d{{1,6}}\s+[A-Za-z0-9 .#'-]+(?:\b(?:{suffix})\.?)\s*(?:#\s*\w+|\bUNIT\b\s*\w+|\bAPT\b\s*\w+)?\s*$"
    ))
    .unwrap()
});
static MEAS_HDR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:complete|pro(?:\s+premium)?)\s+measurements\b").unwrap()
});
static MODEL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bMODEL\s*ID\s*:\s*\d+").unwrap());
static PROP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPROPERTY\s*ID\s*:\s*\d+").unwrap());
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{1,2}\s+(?:JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|SEPT|OCT|NOV|DEC)\s+\d{4}\b")
        .unwrap()
});

const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

/// Extract customer identity from normalized report lines.
///
/// Scan order: anchored measurement-report header (street + city on the two
/// lines after it), then a city/state/ZIP match anywhere in the first ~120
/// lines with an upward street search, then loose fallbacks. Missing fields
/// stay empty; this never fails.
pub fn parse_identity(lines: &[String], raw_text: &str) -> CustomerIdentity {
    let mut name = String::new();
    let mut street = String::new();
    let mut city_state_zip = String::new();

    // Anchored scan: report title, then street and "City, ST ZIP" right after.
    for i in 0..lines.len().min(40) {
        if MEAS_HDR.is_match(&lines[i]) {
            if i + 2 < lines.len()
                && STREET_RE.is_match(&lines[i + 1])
                && CITY_ST_ZIP_RE.is_match(&lines[i + 2])
            {
                street = lines[i + 1].clone();
                city_state_zip = lines[i + 2].clone();
            }
            break;
        }
    }

    // Fallback: first city/state/ZIP anywhere near the top, street above it.
    if city_state_zip.is_empty() {
        let mut city_idx = None;
        for (i, line) in lines.iter().take(120).enumerate() {
            if let Some(caps) = CITY_ST_ZIP_RE.captures(line) {
                city_state_zip = format!("{}, {} {}", &caps[1], &caps[2], &caps[3]);
                city_idx = Some(i);
                break;
            }
        }
        if let Some(ci) = city_idx {
            for j in (ci.saturating_sub(5)..ci).rev() {
                if STREET_RE.is_match(&lines[j]) {
                    street = lines[j].clone();
                    break;
                }
            }
        }
    }

    // Name: a plausible line shortly after a Property ID / Model ID marker.
    'outer: for (i, line) in lines.iter().enumerate() {
        if MODEL_ID.is_match(line) || PROP_ID.is_match(line) {
            for cand in lines.iter().skip(i + 1).take(5) {
                let cand = cand.trim();
                if cand.is_empty()
                    || MODEL_ID.is_match(cand)
                    || PROP_ID.is_match(cand)
                    || DATE_RE.is_match(cand)
                    || CITY_ST_ZIP_RE.is_match(cand)
                    || STREET_RE.is_match(cand)
                {
                    continue;
                }
                name = cand.to_string();
                break 'outer;
            }
        }
    }

    // Name fallback: the line directly above the street address.
    if name.is_empty() && !street.is_empty() {
        if let Some(sidx) = lines.iter().position(|l| *l == street) {
            if sidx > 0 {
                let cand = lines[sidx - 1].trim();
                if !cand.is_empty() && !MEAS_HDR.is_match(cand) && !CITY_ST_ZIP_RE.is_match(cand) {
                    name = cand.to_string();
                }
            }
        }
    }

    if street.is_empty() {
        for line in lines.iter().take(160) {
            if STREET_RE.is_match(line) {
                street = line.clone();
                break;
            }
        }
    }

    let zip = best_zip(raw_text, &city_state_zip);

    CustomerIdentity {
        name: smart_title(&name),
        street,
        city_state_zip,
        zip,
    }
}

/// Pick the most trustworthy ZIP: a ZIP on a line carrying a two-letter state
/// token beats the city-line ZIP beats the first ZIP anywhere. Filters out
/// phone/order numbers that happen to contain five digits.
pub fn best_zip(text: &str, city_state_zip_hint: &str) -> String {
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let padded = format!(" {} ", line.to_uppercase());
        if US_STATES.iter().any(|st| padded.contains(&format!(" {st} "))) {
            if let Some(caps) = ZIP_RE.captures(line) {
                return caps[1].to_string();
            }
        }
    }
    if let Some(caps) = ZIP_RE.captures(city_state_zip_hint) {
        return caps[1].to_string();
    }
    ZIP_RE
        .captures(text)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Title-case an all-caps name; leave mixed case alone.
fn smart_title(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() || s.len() > 80 || s.chars().any(|c| c.is_lowercase()) {
        return s.to_string();
    }
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::normalized_lines;

    #[test]
    fn test_anchored_identity() {
        let text = "Complete Measurements\n1420 Birch Hollow Dr\nLoveland, CO 80537\n";
        let lines = normalized_lines(text);
        let id = parse_identity(&lines, text);
        assert_eq!(id.street, "1420 Birch Hollow Dr");
        assert_eq!(id.city_state_zip, "Loveland, CO 80537");
        assert_eq!(id.zip, "80537");
    }

    #[test]
    fn test_name_after_property_id() {
        let text = "Property ID: 4471823\n14 SEP 2024\nMARCUS WEBB\n1420 Birch Hollow Dr\nLoveland, CO 80537\n";
        let lines = normalized_lines(text);
        let id = parse_identity(&lines, text);
        assert_eq!(id.name, "Marcus Webb");
        assert_eq!(id.street, "1420 Birch Hollow Dr");
    }

    #[test]
    fn test_city_fallback_with_street_above() {
        let text = "Some cover page\nnoise line\n88 Quartz Way\nGolden, CO 80401\nmore noise\n";
        let lines = normalized_lines(text);
        let id = parse_identity(&lines, text);
        assert_eq!(id.street, "88 Quartz Way");
        assert_eq!(id.city_state_zip, "Golden, CO 80401");
    }

    #[test]
    fn test_best_zip_prefers_state_lines() {
        // The order number carries five digits but no state token.
        let text = "Order 55521 confirmation\nphone 303-555-0102\nGolden, CO 80401";
        assert_eq!(best_zip(text, ""), "80401");
    }

    #[test]
    fn test_best_zip_falls_back_to_first() {
        assert_eq!(best_zip("ref 80537 somewhere", ""), "80537");
        assert_eq!(best_zip("nothing here", ""), "");
    }

    #[test]
    fn test_smart_title() {
        assert_eq!(smart_title("MARCUS WEBB"), "Marcus Webb");
        assert_eq!(smart_title("Marcus Webb"), "Marcus Webb");
    }
}
