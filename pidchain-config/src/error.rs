use std::path::PathBuf;

/// Errors raised while loading or reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The key does not exist: {key}")]
    KeyNotFound { key: String },

    #[error("NaN: value '{value}' of key '{key}' is not a valid {expected}")]
    NotANumber {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("restricted access is disabled, enable it to read restricted key '{key}'")]
    AccessDenied { key: String },

    #[error("an INI file has already been loaded, refusing to load '{}'", path.display())]
    AlreadyLoaded { path: PathBuf },

    #[error("config file '{}' {reason}", path.display())]
    FileAccess { path: PathBuf, reason: &'static str },

    #[error("config file '{}' should not be writeable by the executor", path.display())]
    Security { path: PathBuf },

    #[error("invalid validation pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
