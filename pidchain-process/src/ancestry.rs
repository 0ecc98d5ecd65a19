use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::status::{ParentPid, StatusRecord};

pub const DEFAULT_PROC_ROOT: &str = "/proc";
/// Upper bound on records read in one walk
pub const DEFAULT_MAX_DEPTH: usize = 4096;

/// One node of an ancestry chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AncestorRecord {
    Pid(u32),
    Name(String),
}

impl fmt::Display for AncestorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AncestorRecord::Pid(pid) => write!(f, "{pid}"),
            AncestorRecord::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkMode {
    #[default]
    Ids,
    Names,
}

/// Ordered ancestry, nearest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestryChain {
    records: Vec<AncestorRecord>,
}

impl AncestryChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: AncestorRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[AncestorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Root first
    pub fn reversed(mut self) -> Self {
        self.records.reverse();
        self
    }

    pub fn join(&self, delimiter: &str) -> String {
        self.records
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(delimiter)
    }
}

impl FromIterator<AncestorRecord> for AncestryChain {
    fn from_iter<I: IntoIterator<Item = AncestorRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// A status record visited during a walk
#[derive(Debug, Clone)]
struct Step {
    name: Option<String>,
    parent: Option<u32>,
}

/// Follows `PPid:` links through per-process status records.
///
/// Missing or malformed records end the walk; they are never errors.
#[derive(Debug, Clone)]
pub struct AncestryWalker {
    proc_root: PathBuf,
    max_depth: usize,
    verbose: bool,
}

impl Default for AncestryWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl AncestryWalker {
    pub fn new() -> Self {
        Self::with_proc_root(DEFAULT_PROC_ROOT)
    }

    /// Read status records from `<root>/<pid>/status` instead of `/proc`.
    pub fn with_proc_root<P: AsRef<Path>>(root: P) -> Self {
        Self {
            proc_root: root.as_ref().to_path_buf(),
            max_depth: DEFAULT_MAX_DEPTH,
            verbose: false,
        }
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Log why a walk stopped early.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn status_path(&self, pid: u32) -> PathBuf {
        self.proc_root.join(pid.to_string()).join("status")
    }

    /// True if `pid` has a readable status record.
    pub fn exists(&self, pid: u32) -> bool {
        std::fs::metadata(self.status_path(pid)).is_ok_and(|m| m.is_file())
    }

    pub fn read_status(&self, pid: u32) -> Option<StatusRecord> {
        StatusRecord::read(&self.status_path(pid))
    }

    /// Parent ids of `start`, nearest first, ending with `0` when the walk
    /// reaches the root of the process tree.
    pub fn walk_ids(&self, start: u32) -> Vec<u32> {
        self.steps(start).iter().filter_map(|s| s.parent).collect()
    }

    /// Names of `start` and each of its ancestors, nearest first.
    pub fn walk_names(&self, start: u32) -> Vec<String> {
        self.steps(start).into_iter().filter_map(|s| s.name).collect()
    }

    pub fn walk(&self, start: u32, mode: WalkMode) -> AncestryChain {
        match mode {
            WalkMode::Ids => self
                .walk_ids(start)
                .into_iter()
                .map(AncestorRecord::Pid)
                .collect(),
            WalkMode::Names => self
                .walk_names(start)
                .into_iter()
                .map(AncestorRecord::Name)
                .collect(),
        }
    }

    fn steps(&self, start: u32) -> Vec<Step> {
        let mut steps = Vec::new();
        let mut visited = HashSet::new();
        let mut pid = start;

        loop {
            if steps.len() >= self.max_depth {
                if self.verbose {
                    tracing::warn!(
                        "Ancestry walk from {} stopped after {} records",
                        start,
                        self.max_depth
                    );
                }
                break;
            }
            visited.insert(pid);

            let Some(record) = self.read_status(pid) else {
                tracing::debug!("No status record for pid {}", pid);
                break;
            };

            let parent = match record.ppid {
                ParentPid::Pid(parent) => Some(parent),
                ParentPid::Invalid(ref raw) => {
                    if self.verbose {
                        tracing::warn!("Unparsable PPid '{}' in status of pid {}", raw, pid);
                    }
                    None
                }
                ParentPid::Missing => {
                    if self.verbose {
                        tracing::warn!("No PPid field in status of pid {}", pid);
                    }
                    None
                }
            };

            let revisit = parent.filter(|p| visited.contains(p));
            if let Some(p) = revisit {
                if self.verbose {
                    tracing::warn!("Parent cycle detected: pid {} points back to {}", pid, p);
                }
            }
            let parent = if revisit.is_some() { None } else { parent };

            steps.push(Step {
                name: record.name,
                parent,
            });

            match parent {
                Some(0) | None => break,
                Some(next) => pid = next,
            }
        }

        steps
    }
}
