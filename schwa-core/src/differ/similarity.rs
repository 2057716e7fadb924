//! Character-level text similarity.

use similar::TextDiff;

/// Similarity of two texts in `0.0..=1.0`: twice the number of matching
/// characters over the total character count of both.
///
/// Identical texts, including two empty ones, score exactly `1.0`.
pub fn ratio(a: &str, b: &str) -> f32 {
    if a == b {
        return 1.0;
    }
    TextDiff::from_chars(a, b).ratio()
}

/// Whether two spans differ enough to count as modified under `threshold`.
///
/// Byte-identical spans never do. At a threshold of `1.0` any difference
/// does, without relying on float rounding of the ratio.
pub fn is_modified(a: &str, b: &str, threshold: f32) -> (bool, f32) {
    if a == b {
        return (false, 1.0);
    }
    let score = ratio(a, b);
    (threshold >= 1.0 || score < threshold, score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_is_one() {
        assert_eq!(ratio("login() { }", "login() { }"), 1.0);
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn test_disjoint_is_zero() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // 3 shared characters out of 4 + 4.
        let score = ratio("abcd", "abce");
        assert!((score - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_is_modified_threshold() {
        assert_eq!(is_modified("same", "same", 1.0), (false, 1.0));

        let (modified, score) = is_modified("abcd", "abce", 1.0);
        assert!(modified);
        assert!(score < 1.0);

        let (modified, _) = is_modified("abcd", "abce", 0.5);
        assert!(!modified);

        let (modified, _) = is_modified("abc", "xyz", 0.5);
        assert!(modified);
    }

    #[test]
    fn test_whitespace_counts() {
        let (modified, _) = is_modified("f() {\n}", "f() {\n  }", 1.0);
        assert!(modified);
    }
}
