//! Descendant tracking from a snapshot of parent links.

use crate::model::Pid;
use crate::procfs::ProcSource;
use std::collections::{BTreeSet, HashMap};
use tracing::trace;

/// parent pid -> direct children, as seen in one scan
pub type ChildMap = HashMap<Pid, Vec<Pid>>;

/// Read every visible process's parent once and index children by parent.
///
/// A process that exits between the pid listing and its stat read is
/// dropped from this scan.
pub fn scan_children<S: ProcSource + ?Sized>(source: &S) -> ChildMap {
    let pids = source.list_pids().unwrap_or_else(|e| {
        trace!(error = %e, "pid listing failed");
        Vec::new()
    });

    let mut children = ChildMap::new();
    for pid in pids {
        match source.parent_of(pid) {
            Ok(Some(ppid)) => children.entry(ppid).or_default().push(pid),
            Ok(None) => {}
            Err(e) => trace!(pid, error = %e, "parent unreadable"),
        }
    }
    children
}

/// All pids reachable from `root` over child edges, `root` included.
///
/// Worklist over an immutable adjacency snapshot; the `insert` check keeps
/// it finite even if recycled pids produce a cycle in the links.
pub fn descendants_of(children: &ChildMap, root: Pid) -> BTreeSet<Pid> {
    let mut accepted = BTreeSet::from([root]);
    let mut worklist = vec![root];

    while let Some(pid) = worklist.pop() {
        for &child in children.get(&pid).into_iter().flatten() {
            if accepted.insert(child) {
                worklist.push(child);
            }
        }
    }
    accepted
}

/// Fresh scan + traversal in one go.
pub fn collect_descendants<S: ProcSource + ?Sized>(source: &S, root: Pid) -> BTreeSet<Pid> {
    descendants_of(&scan_children(source), root)
}
