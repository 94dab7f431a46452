use crate::model::Region;

/// ZIP prefixes that map to non-Metro regions. Three-digit prefixes cover
/// the mountain corridor and the northern front range.
const MOUNTAIN_PREFIXES: &[&str] = &["804", "816"];
const NORTH_CO_PREFIXES: &[&str] = &["805", "806"];

/// Resolve the service region: an explicit hint wins, then the ZIP prefix,
/// then Metro.
pub fn resolve(hint: Option<&str>, zip: &str) -> Region {
    if let Some(h) = hint {
        if let Some(region) = Region::from_str_loose(h) {
            return region;
        }
    }
    from_zip(zip)
}

pub fn from_zip(zip: &str) -> Region {
    let zip = zip.trim();
    if let Some(prefix) = zip.get(..3) {
        if MOUNTAIN_PREFIXES.contains(&prefix) {
            return Region::Mountains;
        }
        if NORTH_CO_PREFIXES.contains(&prefix) {
            return Region::NorthCo;
        }
    }
    Region::Metro
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_prefixes() {
        assert_eq!(from_zip("80401"), Region::Mountains);
        assert_eq!(from_zip("81601"), Region::Mountains);
        assert_eq!(from_zip("80537"), Region::NorthCo);
        assert_eq!(from_zip("80634"), Region::NorthCo);
        assert_eq!(from_zip("80210"), Region::Metro);
        assert_eq!(from_zip(""), Region::Metro);
    }

    #[test]
    fn test_hint_wins_over_zip() {
        assert_eq!(resolve(Some("noco"), "80401"), Region::NorthCo);
        assert_eq!(resolve(Some("unknown place"), "80401"), Region::Mountains);
        assert_eq!(resolve(None, "80210"), Region::Metro);
    }
}
