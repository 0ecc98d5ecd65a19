//! Process ancestry through `/proc/PID/status`
//!
//! The walker reads the `Name:` and `PPid:` fields of each status record and
//! follows parent links until the root of the process tree, a missing
//! record, a malformed parent field, a cycle, or the depth limit.

pub mod ancestry;
pub mod status;

pub use ancestry::{
    AncestorRecord, AncestryChain, AncestryWalker, WalkMode, DEFAULT_MAX_DEPTH, DEFAULT_PROC_ROOT,
};
pub use status::{ParentPid, StatusRecord};
