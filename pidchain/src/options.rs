use std::path::PathBuf;

use anyhow::{anyhow, Result};
use pidchain_config::ConfigStore;
use pidchain_process::WalkMode;

pub const DEFAULT_DELIMITER: &str = " <- ";
pub const PREFIX: &str = "process chain is : ";

/// Settings the driver reads out of the merged [`ConfigStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub pid: Option<u32>,
    pub delimiter: String,
    pub mode: WalkMode,
    pub reverse: bool,
    pub suppress_prefix: bool,
    pub help: bool,
}

/// Settings read from the command line before any INI file is loaded.
///
/// These are never taken from the INI file, which is only opened after
/// logging is set up.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bootstrap {
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl Bootstrap {
    pub fn from_store(store: &ConfigStore) -> Self {
        Self {
            verbose: store.has_flag("verbose") || store.has_flag("v"),
            log_file: optional_path(store, "log-file"),
            config: optional_path(store, "config"),
        }
    }
}

impl RunOptions {
    pub fn from_store(store: &ConfigStore) -> Result<Self> {
        let pid = if store.has_key("pid") {
            let raw = store.get_i64("pid")?;
            let pid = u32::try_from(raw).map_err(|_| anyhow!("invalid pid {raw}"))?;
            Some(pid)
        } else {
            None
        };

        let delimiter = if store.has_key("d") {
            store.get_string("d")?.to_string()
        } else {
            DEFAULT_DELIMITER.to_string()
        };

        let mode = if store.has_flag("n") {
            WalkMode::Names
        } else {
            WalkMode::Ids
        };

        Ok(Self {
            pid,
            delimiter,
            mode,
            reverse: store.has_flag("r"),
            suppress_prefix: store.has_flag("s"),
            help: store.has_flag("help") || store.has_flag("h"),
        })
    }
}

fn optional_path(store: &ConfigStore, key: &str) -> Option<PathBuf> {
    store.get_string(key).ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pidchain_config::ConfigLoader;

    fn options(tokens: &[&str]) -> Result<RunOptions> {
        RunOptions::from_store(&pidchain_config::from_args(tokens))
    }

    #[test]
    fn test_defaults() {
        let opts = options(&[]).unwrap();
        assert_eq!(opts.pid, None);
        assert_eq!(opts.delimiter, DEFAULT_DELIMITER);
        assert_eq!(opts.mode, WalkMode::Ids);
        assert!(!opts.reverse && !opts.suppress_prefix && !opts.help);
    }

    #[test]
    fn test_all_switches() {
        let opts = options(&[
            "-pid=3648",
            "-d=, ",
            "-n",
            "-r",
            "-s",
            "-h",
        ])
        .unwrap();

        assert_eq!(opts.pid, Some(3648));
        assert_eq!(opts.delimiter, ", ");
        assert_eq!(opts.mode, WalkMode::Names);
        assert!(opts.reverse && opts.suppress_prefix && opts.help);
    }

    #[test]
    fn test_bootstrap() {
        let store = pidchain_config::from_args([
            "-verbose",
            "-config=/etc/pidchain.ini",
            "-log-file=/tmp/pidchain.log",
            "-pid=not-checked-here",
        ]);
        let boot = Bootstrap::from_store(&store);

        assert!(boot.verbose);
        assert_eq!(boot.config, Some(PathBuf::from("/etc/pidchain.ini")));
        assert_eq!(boot.log_file, Some(PathBuf::from("/tmp/pidchain.log")));
        assert_eq!(
            Bootstrap::from_store(&ConfigStore::new()),
            Bootstrap::default()
        );
        assert!(Bootstrap::from_store(&pidchain_config::from_args(["-v"])).verbose);
    }

    #[test]
    fn test_bootstrap_ignores_ini() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"v\nlog-file=/tmp/other.log\n").unwrap();

        let mut store = pidchain_config::from_args(["-pid=1"]);
        let boot = Bootstrap::from_store(&store);
        ConfigLoader::new()
            .allow_writable(true)
            .load_ini(&mut store, file.path())
            .unwrap();

        // taken before the INI merge, so INI entries cannot reach it
        assert!(!boot.verbose);
        assert_eq!(boot.log_file, None);
        assert!(store.has_flag("v"));
    }

    #[test]
    fn test_invalid_pid() {
        assert!(options(&["-pid=abc"]).is_err());
        assert!(options(&["-pid=-5"]).is_err());
        assert!(options(&["-pid=99999999999"]).is_err());
    }
}
