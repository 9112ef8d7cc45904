//! Configuration name validation
//!
//! Names are relative paths below a bucket (`my.app.Config`,
//! `my.app.Config/nested`). Anything that could escape the bucket is rejected
//! before a lookup touches the resource tree.

use crate::{Error, Result};

/// Check whether a configuration name is valid.
pub fn is_valid_config_name(name: &str) -> bool {
    invalid_reason(name).is_none()
}

/// Validate a configuration name.
///
/// # Errors
///
/// Returns [`Error::InvalidConfigName`] if the name is blank, absolute, or
/// contains an empty, `.` or `..` segment.
pub fn ensure_valid_config_name(name: &str) -> Result<()> {
    match invalid_reason(name) {
        None => Ok(()),
        Some(reason) => Err(Error::InvalidConfigName {
            name: name.to_string(),
            reason,
        }),
    }
}

const SEPARATORS: [char; 2] = ['/', '\\'];

fn invalid_reason(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        return Some("name is blank");
    }
    if name.starts_with(SEPARATORS) {
        return Some("absolute names are not allowed");
    }
    // Resource paths treat a backslash as a separator too
    for segment in name.split(SEPARATORS) {
        match segment {
            "" => return Some("empty path segment"),
            "." | ".." => return Some("relative path segment"),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("my.app.Config")]
    #[case("my.app.Config/nested")]
    #[case("my.app.Config/item1/nested")]
    #[case("sling:configs.dev")]
    fn test_valid_names(#[case] name: &str) {
        assert!(is_valid_config_name(name));
        assert!(ensure_valid_config_name(name).is_ok());
    }

    #[rstest]
    #[case("", "name is blank")]
    #[case("   ", "name is blank")]
    #[case("/conf/global", "absolute names are not allowed")]
    #[case("../secret", "relative path segment")]
    #[case("a/../../b", "relative path segment")]
    #[case("a/./b", "relative path segment")]
    #[case("a//b", "empty path segment")]
    #[case("a/", "empty path segment")]
    #[case("\\conf\\global", "absolute names are not allowed")]
    #[case("..\\x", "relative path segment")]
    #[case("a\\..\\b", "relative path segment")]
    #[case("..\\..\\..\\apps\\secret", "relative path segment")]
    #[case("a\\\\b", "empty path segment")]
    fn test_invalid_names(#[case] name: &str, #[case] expected: &str) {
        match ensure_valid_config_name(name) {
            Err(Error::InvalidConfigName { reason, .. }) => assert_eq!(reason, expected),
            other => panic!("expected invalid name error, got {other:?}"),
        }
    }
}
