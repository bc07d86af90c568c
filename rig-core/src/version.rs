/// Version injected at build time through `RIG_BUILD_VERSION`, or `dev`.
pub const VERSION: &str = match option_env!("RIG_BUILD_VERSION") {
    Some(v) => v,
    None => DEV_VERSION,
};

pub const DEV_VERSION: &str = "dev";

pub fn is_dev(version: &str) -> bool {
    version == DEV_VERSION
}

/// Pad a dotted version so that plain string comparison orders it numerically.
/// `v2025.1.3` becomes `2025.0001.0003`.
fn normalize(version: &str) -> String {
    version
        .trim_start_matches('v')
        .split('.')
        .map(|segment| format!("{segment:0>4}"))
        .collect::<Vec<_>>()
        .join(".")
}

/// Whether `latest` is a newer release than `current`. Development builds
/// never consider themselves outdated.
pub fn is_newer(current: &str, latest: &str) -> bool {
    if is_dev(current) {
        return false;
    }
    normalize(latest) > normalize(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_segments_compare_correctly() {
        assert!(is_newer("2025.1.3", "2025.1.10"));
        assert!(!is_newer("2025.1.10", "2025.1.3"));
    }

    #[test]
    fn test_leading_v_ignored() {
        assert!(is_newer("v1.2.0", "v1.10.0"));
        assert!(is_newer("1.2.0", "v1.2.1"));
        assert!(!is_newer("v1.2.1", "1.2.1"));
    }

    #[test]
    fn test_equal_is_not_newer() {
        assert!(!is_newer("2025.2.1", "2025.2.1"));
    }

    #[test]
    fn test_dev_never_outdated() {
        for latest in ["0.0.1", "9999.99.99", "v2030.1.1", ""] {
            assert!(!is_newer("dev", latest));
        }
    }

    #[test]
    fn test_normalize_pads_segments() {
        assert_eq!(normalize("v2025.1.3"), "2025.0001.0003");
        assert_eq!(normalize("12345.6"), "12345.0006");
    }
}
