//! Configuration for pidchain
//!
//! Options come from `-key=value` command-line tokens and from an optional
//! INI file. INI keys and values are validated; entries that fail validation
//! are kept in a restricted bucket that is only readable when the store was
//! created with restricted access.

pub mod error;
pub mod loader;
pub mod normalize;
pub mod store;

pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, IniSummary};
pub use normalize::StringNormalizer;
pub use store::{ConfigStore, LoadState};

/// Parse command-line tokens into a fresh store with the default loader.
pub fn from_args<I, S>(tokens: I) -> ConfigStore
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut store = ConfigStore::new();
    ConfigLoader::new().load_args(&mut store, tokens);
    store
}
