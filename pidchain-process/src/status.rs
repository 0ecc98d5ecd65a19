//! Parser for the line-oriented `/proc/PID/status` record

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parent pid as found in a status record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentPid {
    /// No `PPid:` line before the record ended
    Missing,
    /// `PPid:` present but not a non-negative integer
    Invalid(String),
    Pid(u32),
}

/// The fields of a status record the ancestry walker needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub name: Option<String>,
    pub ppid: ParentPid,
}

impl StatusRecord {
    /// Read the record at `path`.
    ///
    /// Returns `None` if the path is missing, not a regular file, or cannot
    /// be opened.
    pub fn read(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        let file = File::open(path).ok()?;
        Some(Self::from_reader(BufReader::new(file)))
    }

    pub fn parse(content: &str) -> Self {
        Self::from_reader(content.as_bytes())
    }

    /// Scan lines until both `Name:` and `PPid:` are seen.
    ///
    /// Scanning stops early on a malformed `PPid:` value; a read error ends
    /// the record like end of input does. Lines are decoded lossily since
    /// `Name:` may carry arbitrary bytes.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Self {
        let mut name = None;
        let mut ppid = ParentPid::Missing;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = String::from_utf8_lossy(&buf);
            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match field.trim() {
                "Name" if name.is_none() => name = Some(value.to_string()),
                "PPid" => {
                    ppid = match value.parse::<u32>() {
                        Ok(pid) => ParentPid::Pid(pid),
                        Err(_) => ParentPid::Invalid(value.to_string()),
                    };
                    if matches!(ppid, ParentPid::Invalid(_)) {
                        break;
                    }
                }
                _ => {}
            }

            if name.is_some() && ppid != ParentPid::Missing {
                break;
            }
        }

        Self { name, ppid }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASH_STATUS: &str = "Name:\tbash\n\
        Umask:\t0022\n\
        State:\tS (sleeping)\n\
        Tgid:\t4242\n\
        Ngid:\t0\n\
        Pid:\t4242\n\
        PPid:\t4100\n\
        TracerPid:\t0\n";

    #[test]
    fn test_parse_real_layout() {
        let record = StatusRecord::parse(BASH_STATUS);
        assert_eq!(record.name.as_deref(), Some("bash"));
        assert_eq!(record.ppid, ParentPid::Pid(4100));
    }

    #[test]
    fn test_tracer_pid_is_not_parent() {
        let record = StatusRecord::parse("Name:\tx\nTracerPid:\t77\n");
        assert_eq!(record.ppid, ParentPid::Missing);
    }

    #[test]
    fn test_name_with_spaces_and_colon() {
        let record = StatusRecord::parse("Name:\tWeb Content: 1\nPPid:\t1\n");
        assert_eq!(record.name.as_deref(), Some("Web Content: 1"));
    }

    #[test]
    fn test_malformed_parent() {
        let record = StatusRecord::parse("Name:\tx\nPPid:\tabc\n");
        assert_eq!(record.ppid, ParentPid::Invalid("abc".to_string()));

        let record = StatusRecord::parse("PPid:\t-1\nName:\tlate\n");
        assert_eq!(record.ppid, ParentPid::Invalid("-1".to_string()));
        // scanning stopped at the bad PPid line
        assert_eq!(record.name, None);
    }

    #[test]
    fn test_non_utf8_name_does_not_hide_parent() {
        let record = StatusRecord::from_reader(&b"Name:\tbad\xff\xfename\nPPid:\t10\n"[..]);
        assert_eq!(record.name.as_deref(), Some("bad\u{FFFD}\u{FFFD}name"));
        assert_eq!(record.ppid, ParentPid::Pid(10));
    }

    #[test]
    fn test_empty_record() {
        let record = StatusRecord::parse("");
        assert_eq!(record.name, None);
        assert_eq!(record.ppid, ParentPid::Missing);
    }

    #[test]
    fn test_read_missing_path() {
        assert!(StatusRecord::read(Path::new("/nonexistent/status")).is_none());
    }
}
