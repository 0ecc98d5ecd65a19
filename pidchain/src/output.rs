use pidchain_process::{AncestorRecord, AncestryChain, AncestryWalker, WalkMode};

use crate::options::{RunOptions, PREFIX};

/// The chain to print: in id mode the start pid followed by its ancestors,
/// in name mode the names of the start process and its ancestors.
pub fn build_chain(walker: &AncestryWalker, pid: u32, mode: WalkMode) -> AncestryChain {
    match mode {
        WalkMode::Ids => std::iter::once(pid)
            .chain(walker.walk_ids(pid))
            .map(AncestorRecord::Pid)
            .collect(),
        WalkMode::Names => walker.walk(pid, WalkMode::Names),
    }
}

pub fn render(chain: AncestryChain, opts: &RunOptions) -> String {
    let chain = if opts.reverse { chain.reversed() } else { chain };
    let body = chain.join(&opts.delimiter);
    if opts.suppress_prefix {
        body
    } else {
        format!("{PREFIX}{body}")
    }
}
