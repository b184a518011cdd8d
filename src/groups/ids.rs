/// Identity helpers shared by every membership and leadership check.
///
/// Institutional IDs arrive from forms, spreadsheets and legacy rows with
/// stray whitespace. Every comparison in the crate goes through
/// [`normalize_id`] so the validator and the classifier agree on who is who.

/// Course identifier as issued by the course catalog.
pub type CourseId = i64;

/// Canonical form of an institutional ID: surrounding whitespace removed,
/// case preserved.
pub fn normalize_id(id: &str) -> &str {
    id.trim()
}

/// Case-sensitive equality after normalization.
pub fn ids_equal(a: &str, b: &str) -> bool {
    normalize_id(a) == normalize_id(b)
}

/// True when the id is empty after normalization.
pub fn is_blank(id: &str) -> bool {
    normalize_id(id).is_empty()
}

/// Normalize an optional id, mapping blank values to `None`.
pub fn normalize_opt(id: Option<&str>) -> Option<&str> {
    id.map(normalize_id).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_but_keeps_case() {
        assert_eq!(normalize_id("  22-1234-567\t"), "22-1234-567");
        assert_eq!(normalize_id("Ab"), "Ab");
    }

    #[test]
    fn test_ids_equal_is_case_sensitive() {
        assert!(ids_equal(" S1", "S1 "));
        assert!(!ids_equal("s1", "S1"));
    }

    #[test]
    fn test_normalize_opt_drops_blank() {
        assert_eq!(normalize_opt(Some("   ")), None);
        assert_eq!(normalize_opt(None), None);
        assert_eq!(normalize_opt(Some(" U1 ")), Some("U1"));
        assert!(is_blank("\n"));
    }
}
