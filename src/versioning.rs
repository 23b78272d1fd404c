/*============================================================
  Synavera Project: Syn-Get
  Module: synget_core::versioning
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Order package version identifiers by dotted-numeric
    comparison, newest first.

  Security / Safety Notes:
    Pure computation; no I/O performed in this module.

  Dependencies:
    None beyond std.

  Operational Scope:
    Used by the version lister before any handler sees the
    upstream directory names.

  Revision History:
    2026-10-17 COD  Replaced vercmp shell-out with in-process
                    dotted-numeric comparison.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic ordering for reproducible responses
    - Stable sort for equal versions
============================================================*/

use std::cmp::Ordering;

/// Compare two dotted version strings segment by segment.
///
/// Missing segments count as zero, so `1.2` and `1.2.0` are equal. A segment
/// is read from its leading digits; a segment without any reads as zero.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left: Vec<u64> = a.split('.').map(segment_value).collect();
    let right: Vec<u64> = b.split('.').map(segment_value).collect();
    let len = left.len().max(right.len());

    for idx in 0..len {
        let lhs = left.get(idx).copied().unwrap_or(0);
        let rhs = right.get(idx).copied().unwrap_or(0);
        match lhs.cmp(&rhs) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Sort versions newest first. Equal versions keep their upstream order.
pub fn sort_descending(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(b, a));
}

fn segment_value(segment: &str) -> u64 {
    let digits: &str = {
        let trimmed = segment.trim_start();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_versions_are_equal() {
        assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.2.0.0", "1.2"), Ordering::Equal);
    }

    #[test]
    fn first_differing_segment_decides() {
        assert_eq!(compare_versions("2.0.0", "1.9.0"), Ordering::Greater);
        assert_eq!(compare_versions("0.38.0", "0.40.0"), Ordering::Less);
        assert_eq!(compare_versions("1.10", "1.9"), Ordering::Greater);
    }

    #[test]
    fn descending_sort_puts_newest_first() {
        let mut versions: Vec<String> = ["1.9.0", "2.0.0", "0.38.0", "1.10.1"]
            .iter()
            .map(|v| v.to_string())
            .collect();
        sort_descending(&mut versions);
        assert_eq!(versions, vec!["2.0.0", "1.10.1", "1.9.0", "0.38.0"]);
    }

    #[test]
    fn equal_versions_keep_upstream_order() {
        let mut versions = vec!["1.2".to_string(), "1.2.0".to_string(), "3".to_string()];
        sort_descending(&mut versions);
        assert_eq!(versions, vec!["3", "1.2", "1.2.0"]);
    }

    #[test]
    fn non_numeric_segments_read_leading_digits() {
        assert_eq!(compare_versions("1.2rc1", "1.2"), Ordering::Equal);
        assert_eq!(compare_versions("1.x", "1.0"), Ordering::Equal);
    }
}
