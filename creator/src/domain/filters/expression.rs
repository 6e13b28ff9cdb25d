//! Filter key extraction
//!
//! Finds the filter keys (`f0`, `f1`, ...) mentioned in a filter logic
//! expression. Grammar is not checked here, see [`super::parser`].

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::core::constants::FILTER_KEY_PATTERN;

fn filter_key_regex() -> &'static Regex {
    static RE_FILTER_KEY: OnceLock<Regex> = OnceLock::new();
    RE_FILTER_KEY.get_or_init(|| Regex::new(FILTER_KEY_PATTERN).expect("Invalid regex"))
}

/// Collect every filter key matched in the expression, duplicates collapsed
pub fn extract_referenced_ids(expression: &str) -> BTreeSet<String> {
    filter_key_regex()
        .find_iter(expression)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn nested_expression() {
        assert_eq!(
            extract_referenced_ids("f0 or (f1 and not f2)"),
            set(&["f0", "f1", "f2"])
        );
    }

    #[test]
    fn single_key() {
        assert_eq!(extract_referenced_ids("f0"), set(&["f0"]));
    }

    #[test]
    fn empty_expression() {
        assert!(extract_referenced_ids("").is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(
            extract_referenced_ids("(f1 and f3) or (f1 and not f3)"),
            set(&["f1", "f3"])
        );
    }

    #[test]
    fn multi_digit_keys() {
        assert_eq!(extract_referenced_ids("f10 or f2"), set(&["f10", "f2"]));
    }

    #[test]
    fn unbalanced_input_still_extracts() {
        assert_eq!(extract_referenced_ids("((f4 and"), set(&["f4"]));
    }
}
