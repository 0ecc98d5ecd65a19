//! Populates a [`ConfigStore`] from command-line tokens and an INI file.
//!
//! Precedence on key collision: INI values win over command-line values,
//! whichever source is loaded first. Command-line keys are first-wins, so a
//! later command-line pass never replaces an INI value, while an INI pass
//! overwrites whatever the command line registered.

use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};
use crate::normalize::{self, StringNormalizer};
use crate::store::{ConfigStore, LoadState};

/// Counters reported by a single INI load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IniSummary {
    /// Keys inserted for the first time
    pub options: usize,
    /// Assignments that failed validation
    pub restricted: usize,
    pub flags: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    normalizer: StringNormalizer,
    allow_writable: bool,
    verbose: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(normalizer: StringNormalizer) -> Self {
        Self {
            normalizer,
            ..Self::default()
        }
    }

    /// Accept INI files the invoking process could write to.
    pub fn allow_writable(mut self, allow: bool) -> Self {
        self.allow_writable = allow;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Parse `-key=value` options and `-flag` flags.
    ///
    /// Every token is examined, so callers should drop the program name
    /// first. Tokens not starting with `-` are ignored.
    pub fn load_args<I, S>(&self, store: &mut ConfigStore, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            let token = token.as_ref();
            if !token.starts_with('-') {
                debug!("Ignoring positional argument '{}'", token);
                continue;
            }
            let body = token.trim_start_matches('-');

            match body.split_once('=') {
                None => {
                    self.register_flag(store, body.to_string());
                }
                Some((key, _)) if key.is_empty() => {
                    debug!("Ignoring option without a key: '{}'", token);
                }
                Some((key, value)) => {
                    if store.contains_any(key) {
                        debug!("Duplicate option '{}' ignored", key);
                        continue;
                    }
                    store.set_option(key.to_string(), value.to_string());
                }
            }
        }

        if store.load_state() == LoadState::Empty {
            store.set_state(LoadState::CommandLineLoaded);
        }
    }

    /// Load an INI file into `store`.
    ///
    /// A store accepts a single INI load attempt; the latch is set before the
    /// file is checked, so a failed attempt also prevents later loads.
    pub fn load_ini<P: AsRef<Path>>(&self, store: &mut ConfigStore, path: P) -> Result<IniSummary> {
        let path = path.as_ref();
        if store.load_state() == LoadState::FullyLoaded {
            return Err(ConfigError::AlreadyLoaded {
                path: path.to_path_buf(),
            });
        }
        store.set_state(LoadState::FullyLoaded);

        let metadata = fs::metadata(path).map_err(|_| ConfigError::FileAccess {
            path: path.to_path_buf(),
            reason: "does not exist",
        })?;
        if !metadata.is_file() {
            return Err(ConfigError::FileAccess {
                path: path.to_path_buf(),
                reason: "is not a regular file",
            });
        }

        // Opening for write without truncate leaves the file untouched.
        if !self.allow_writable && OpenOptions::new().write(true).open(path).is_ok() {
            return Err(ConfigError::Security {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let summary = self.parse_ini(store, &content);
        if self.verbose {
            info!(
                "Loaded {}: {} options, {} restricted, {} flags",
                path.display(),
                summary.options,
                summary.restricted,
                summary.flags
            );
        }
        Ok(summary)
    }

    fn parse_ini(&self, store: &mut ConfigStore, content: &str) -> IniSummary {
        let mut summary = IniSummary::default();
        let mut section = String::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim_start();
            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with(';')
                || line.starts_with("//")
            {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header.split(']').next().unwrap_or_default().trim();
                section = if name.is_empty() {
                    String::new()
                } else {
                    format!("{name}.")
                };
                continue;
            }

            let Some((raw_key, raw_value)) = line.split_once('=') else {
                if self.register_flag(store, line.trim_end().to_string()) {
                    summary.flags += 1;
                }
                continue;
            };

            let mut key = raw_key.to_string();
            let key_ok = self.normalizer.check_and_normalize(&mut key);
            if key.is_empty() {
                debug!("line {}: assignment without a key skipped", index + 1);
                continue;
            }
            let key = format!("{section}{key}");
            let key_ok = key_ok && self.normalizer.matches_value(&key);

            let mut value = raw_value.to_string();
            let value_ok = self.normalizer.check_and_normalize(&mut value);

            if key_ok && value_ok {
                if store.set_option(key, value) {
                    summary.options += 1;
                }
            } else {
                if self.verbose {
                    warn!("line {}: '{}' failed validation, restricted", index + 1, key);
                }
                store.set_restricted(key, value);
                summary.restricted += 1;
            }
        }

        summary
    }

    /// Returns true if the flag was accepted.
    fn register_flag(&self, store: &mut ConfigStore, mut flag: String) -> bool {
        normalize::trim(&mut flag);
        if flag.is_empty() {
            return false;
        }
        if !self.normalizer.matches_flag(&flag) {
            if self.verbose {
                warn!("Flag '{}' does not match the flag pattern, ignored", flag);
            }
            store.reject_flag(flag);
            return false;
        }
        store.insert_flag(flag);
        true
    }
}
