//! Prefix matching for option-group membership
//!
//! Plan codes encode family + variant, e.g. `NM01` is variant 01 of family
//! `NM`. A widget claims rows by family prefix, but a naive `starts_with`
//! would also claim codes of a longer alphabetic family (`NMX` for prefix
//! `NM`). The rule here accepts a prefix only when the next character is
//! absent or non-alphabetic, so numeric variant suffixes match and sibling
//! families do not.

/// True iff `code` belongs to the family named by `prefix`.
///
/// - `matches_prefix("NM", "NM")` → true (exact)
/// - `matches_prefix("NM01", "NM")` → true (numeric variant)
/// - `matches_prefix("NMX", "NM")` → false (alphabetic suffix = other family)
#[must_use]
pub fn matches_prefix(code: &str, prefix: &str) -> bool {
    if code.is_empty() || prefix.is_empty() {
        return false;
    }
    if code == prefix {
        return true;
    }
    let Some(rest) = code.strip_prefix(prefix) else {
        return false;
    };
    match rest.chars().next() {
        None => true,
        Some(next) => !next.is_ascii_alphabetic(),
    }
}

/// True iff any prefix in the group matches `code`.
#[must_use]
pub fn group_matches<S: AsRef<str>>(code: &str, prefixes: &[S]) -> bool {
    prefixes.iter().any(|p| matches_prefix(code, p.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_match() {
        assert!(matches_prefix("NM", "NM"));
    }

    #[test]
    fn numeric_variant_matches() {
        assert!(matches_prefix("NM01", "NM"));
        assert!(matches_prefix("T2", "T"));
    }

    #[test]
    fn non_letter_separator_matches() {
        assert!(matches_prefix("NM-01", "NM"));
        assert!(matches_prefix("NM_X", "NM"));
    }

    #[test]
    fn alphabetic_suffix_rejected() {
        assert!(!matches_prefix("NMX", "NM"));
        assert!(!matches_prefix("NM01S", "NM01"));
        assert!(matches_prefix("NM01S", "NM01S"));
    }

    #[test]
    fn unrelated_code_rejected() {
        assert!(!matches_prefix("CD01", "NM"));
    }

    #[test]
    fn empty_inputs_rejected() {
        assert!(!matches_prefix("", "NM"));
        assert!(!matches_prefix("NM", ""));
        assert!(!matches_prefix("", ""));
    }

    #[test]
    fn group_any_prefix_wins() {
        let prefixes = ["DT", "DF"];
        assert!(group_matches("DF02", &prefixes));
        assert!(!group_matches("TV01", &prefixes));
    }

    #[test]
    fn group_empty_is_miss() {
        let prefixes: [&str; 0] = [];
        assert!(!group_matches("NM01", &prefixes));
    }

    proptest! {
        /// For any prefix and suffix, membership depends only on whether
        /// the first character after the prefix is alphabetic.
        #[test]
        fn suffix_decides_membership(
            prefix in "[A-Z]{1,4}",
            suffix in "[A-Za-z0-9]{0,4}",
        ) {
            let code = format!("{prefix}{suffix}");
            let expected = match suffix.chars().next() {
                None => true,
                Some(c) => !c.is_ascii_alphabetic(),
            };
            prop_assert_eq!(matches_prefix(&code, &prefix), expected);
        }
    }
}
