//! Marital-status code resolution
//!
//! The status label is derived from the numeric code on every write. The
//! mapping is a partial override: unknown codes leave the caller-supplied
//! label untouched rather than erroring.

/// The closed set of known status codes and their labels.
///
/// Single source of truth, referenced by the resolver and by tests.
pub const STATUS_LABELS: [(i64, &str); 4] = [
    (1, "Single"),
    (2, "Married (Registered)"),
    (3, "Divorced/Widowed"),
    (4, "Deceased"),
];

/// Resolve a status code to its label.
///
/// Returns the fixed label for the four known codes. For any other code the
/// `current` label is returned unchanged, so an unrecognized status is a
/// silent no-op, not an error.
pub fn resolve_status(code: i64, current: Option<String>) -> Option<String> {
    STATUS_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| (*label).to_string())
        .or(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_map_to_fixed_labels() {
        assert_eq!(resolve_status(1, None), Some("Single".to_string()));
        assert_eq!(
            resolve_status(2, None),
            Some("Married (Registered)".to_string())
        );
        assert_eq!(
            resolve_status(3, None),
            Some("Divorced/Widowed".to_string())
        );
        assert_eq!(resolve_status(4, None), Some("Deceased".to_string()));
    }

    #[test]
    fn test_known_code_overrides_supplied_label() {
        assert_eq!(
            resolve_status(1, Some("whatever".to_string())),
            Some("Single".to_string())
        );
    }

    #[test]
    fn test_unknown_code_keeps_supplied_label() {
        assert_eq!(
            resolve_status(0, Some("Prior".to_string())),
            Some("Prior".to_string())
        );
        assert_eq!(
            resolve_status(99, Some("Prior".to_string())),
            Some("Prior".to_string())
        );
        assert_eq!(resolve_status(-1, None), None);
    }
}
