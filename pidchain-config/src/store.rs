use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::error::{ConfigError, Result};

/// How far a store has progressed through its load pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Empty,
    /// Command-line tokens have been parsed, no INI file yet
    CommandLineLoaded,
    /// An INI load was attempted; no further INI may be loaded
    FullyLoaded,
}

/// Parsed options, flags and restricted entries.
///
/// Populated by [`crate::ConfigLoader`], read through the accessors below.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    options: BTreeMap<String, String>,
    flags: BTreeSet<String>,
    restricted: BTreeMap<String, String>,
    rejected_flags: BTreeSet<String>,
    allow_restricted: bool,
    state: LoadState,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose restricted entries can be read via [`Self::get_restricted_string`].
    pub fn with_restricted_access() -> Self {
        Self {
            allow_restricted: true,
            ..Self::default()
        }
    }

    pub fn allows_restricted(&self) -> bool {
        self.allow_restricted
    }

    pub fn load_state(&self) -> LoadState {
        self.state
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn get_string(&self, key: &str) -> Result<&str> {
        self.options
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            })
    }

    pub fn get_restricted_string(&self, key: &str) -> Result<&str> {
        if !self.allow_restricted {
            return Err(ConfigError::AccessDenied {
                key: key.to_string(),
            });
        }
        self.restricted
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            })
    }

    pub fn get_i32(&self, key: &str) -> Result<i32> {
        self.get_number(key, "32-bit integer")
    }

    pub fn get_i64(&self, key: &str) -> Result<i64> {
        self.get_number(key, "64-bit integer")
    }

    pub fn get_f32(&self, key: &str) -> Result<f32> {
        self.get_number(key, "float")
    }

    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.get_number(key, "double")
    }

    fn get_number<T: FromStr>(&self, key: &str, expected: &'static str) -> Result<T> {
        let value = self.get_string(key)?;
        value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::NotANumber {
                key: key.to_string(),
                value: value.to_string(),
                expected,
            })
    }

    /// Number of validated keys from the command line and the INI file combined
    pub fn key_count(&self) -> usize {
        self.options.len()
    }

    pub fn flag_count(&self) -> usize {
        self.flags.len()
    }

    pub fn restricted_count(&self) -> usize {
        self.restricted.len()
    }

    pub fn list_keys(&self) -> Vec<String> {
        self.options.keys().cloned().collect()
    }

    /// Keys of the restricted bucket; listing is allowed even without restricted access.
    pub fn list_restricted_keys(&self) -> Vec<String> {
        self.restricted.keys().cloned().collect()
    }

    pub fn list_flags(&self) -> Vec<String> {
        self.flags.iter().cloned().collect()
    }

    /// Flags dropped because they did not match the flag pattern
    pub fn list_rejected_flags(&self) -> Vec<String> {
        self.rejected_flags.iter().cloned().collect()
    }

    // Mutators used by the loader.

    pub(crate) fn contains_any(&self, key: &str) -> bool {
        self.options.contains_key(key) || self.restricted.contains_key(key)
    }

    /// Returns true if the key was not present before.
    pub(crate) fn set_option(&mut self, key: String, value: String) -> bool {
        self.restricted.remove(&key);
        self.options.insert(key, value).is_none()
    }

    pub(crate) fn set_restricted(&mut self, key: String, value: String) {
        self.options.remove(&key);
        self.restricted.insert(key, value);
    }

    pub(crate) fn insert_flag(&mut self, flag: String) {
        self.flags.insert(flag);
    }

    pub(crate) fn reject_flag(&mut self, flag: String) {
        self.rejected_flags.insert(flag);
    }

    pub(crate) fn set_state(&mut self, state: LoadState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(pairs: &[(&str, &str)]) -> ConfigStore {
        let mut store = ConfigStore::new();
        for (k, v) in pairs {
            store.set_option(k.to_string(), v.to_string());
        }
        store
    }

    #[test]
    fn test_get_string() {
        let store = store_with(&[("name", "value")]);
        assert_eq!(store.get_string("name").unwrap(), "value");
        assert!(matches!(
            store.get_string("missing"),
            Err(ConfigError::KeyNotFound { key }) if key == "missing"
        ));
    }

    #[test]
    fn test_numeric_getters() {
        let store = store_with(&[
            ("int", "42"),
            ("neg", "-7"),
            ("big", "9000000000"),
            ("float", "2.5"),
            ("padded", " 12 "),
            ("word", "twelve"),
        ]);

        assert_eq!(store.get_i32("int").unwrap(), 42);
        assert_eq!(store.get_i32("neg").unwrap(), -7);
        assert_eq!(store.get_i64("big").unwrap(), 9_000_000_000);
        assert_eq!(store.get_f64("float").unwrap(), 2.5);
        assert_eq!(store.get_f32("float").unwrap(), 2.5f32);
        assert_eq!(store.get_i32("padded").unwrap(), 12);

        // out of range for i32
        assert!(matches!(
            store.get_i32("big"),
            Err(ConfigError::NotANumber { .. })
        ));
        assert!(matches!(
            store.get_i64("float"),
            Err(ConfigError::NotANumber { .. })
        ));
        assert!(matches!(
            store.get_f64("word"),
            Err(ConfigError::NotANumber { .. })
        ));
        assert!(matches!(
            store.get_i64("absent"),
            Err(ConfigError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_restricted_access_denied_regardless_of_key() {
        let mut store = ConfigStore::new();
        store.set_restricted("secret".to_string(), "a b".to_string());

        assert!(matches!(
            store.get_restricted_string("secret"),
            Err(ConfigError::AccessDenied { .. })
        ));
        assert!(matches!(
            store.get_restricted_string("nothing"),
            Err(ConfigError::AccessDenied { .. })
        ));
        assert_eq!(store.list_restricted_keys(), vec!["secret".to_string()]);
    }

    #[test]
    fn test_restricted_access_allowed() {
        let mut store = ConfigStore::with_restricted_access();
        store.set_restricted("secret".to_string(), "a b".to_string());

        assert_eq!(store.get_restricted_string("secret").unwrap(), "a b");
        assert!(matches!(
            store.get_restricted_string("nothing"),
            Err(ConfigError::KeyNotFound { .. })
        ));
        assert!(!store.has_key("secret"));
    }

    #[test]
    fn test_key_lives_in_one_bucket() {
        let mut store = ConfigStore::with_restricted_access();
        assert!(store.set_option("k".to_string(), "v".to_string()));
        store.set_restricted("k".to_string(), "bad value".to_string());
        assert!(!store.has_key("k"));
        assert_eq!(store.restricted_count(), 1);

        assert!(store.set_option("k".to_string(), "good".to_string()));
        assert_eq!(store.get_string("k").unwrap(), "good");
        assert_eq!(store.restricted_count(), 0);
        assert_eq!(store.key_count(), 1);
    }

    #[test]
    fn test_counts_and_listing() {
        let mut store = store_with(&[("b", "2"), ("a", "1")]);
        assert!(!store.set_option("a".to_string(), "3".to_string()));
        store.insert_flag("x".to_string());
        store.insert_flag("x".to_string());
        store.insert_flag("w".to_string());

        assert_eq!(store.key_count(), 2);
        assert_eq!(store.flag_count(), 2);
        assert_eq!(store.list_flags(), vec!["w".to_string(), "x".to_string()]);
        let mut keys = store.list_keys();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.get_string("a").unwrap(), "3");
    }
}
