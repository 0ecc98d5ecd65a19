//! Token cleanup and validation applied before a configuration value is trusted.

use regex::Regex;

use crate::error::Result;

/// Keys and values: letters, digits and `= - _ . ~ "`.
pub const DEFAULT_VALUE_PATTERN: &str = r#"^[A-Za-z0-9=\-_.~"]*$"#;
/// Flags: letters, digits and `- _ .`.
pub const DEFAULT_FLAG_PATTERN: &str = r"^[A-Za-z0-9\-_.]*$";

fn is_space(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// Remove leading and trailing ASCII whitespace in place.
pub fn trim(s: &mut String) {
    let end = s.trim_end_matches(is_space).len();
    s.truncate(end);
    let start = s.len() - s.trim_start_matches(is_space).len();
    s.drain(..start);
}

/// Remove one layer of matching single or double quotes in place.
pub fn strip_quotes(s: &mut String) {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return;
    }
    let first = bytes[0];
    if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
        s.pop();
        s.remove(0);
    }
}

/// Validation patterns for option keys/values and for flags.
#[derive(Debug, Clone)]
pub struct StringNormalizer {
    value: Regex,
    flag: Regex,
}

impl Default for StringNormalizer {
    fn default() -> Self {
        Self {
            value: Regex::new(DEFAULT_VALUE_PATTERN).expect("default value pattern compiles"),
            flag: Regex::new(DEFAULT_FLAG_PATTERN).expect("default flag pattern compiles"),
        }
    }
}

impl StringNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a normalizer from custom patterns.
    ///
    /// Patterns are used as given: anchor them with `^...$` to require a full match.
    pub fn with_patterns(value_pattern: &str, flag_pattern: &str) -> Result<Self> {
        Ok(Self {
            value: Regex::new(value_pattern)?,
            flag: Regex::new(flag_pattern)?,
        })
    }

    pub fn matches_value(&self, s: &str) -> bool {
        self.value.is_match(s)
    }

    pub fn matches_flag(&self, s: &str) -> bool {
        self.flag.is_match(s)
    }

    /// Trim, strip one layer of quotes, then validate against the value pattern.
    ///
    /// The string is normalized in place even when it turns out to be unsafe.
    pub fn check_and_normalize(&self, s: &mut String) -> bool {
        trim(s);
        strip_quotes(s);
        self.matches_value(s)
    }
}
