//! Pure merge of local and remote goal sets.
//!
//! Precedence, highest first: a local record with a pending push, then a
//! local record the remote has never seen, then the remote record. A pending
//! local write is never overwritten by a possibly-stale remote read. The
//! policy is coarse: whole records win, not fields, so a title renamed on
//! another device loses to a local pending amount change.

use std::collections::{HashMap, HashSet};

use crate::goals::Goal;
use crate::sync::SyncStatus;

/// Merges the two goal sets for one owner, deduplicated by id and sorted by
/// `created_at` descending. Records taken from the remote carry the local
/// sync flag when a local copy existed, otherwise they are already synced by
/// definition.
pub fn merge_goals(local: Vec<Goal>, remote: Vec<Goal>) -> Vec<Goal> {
    let local_flags: HashMap<&str, SyncStatus> = local
        .iter()
        .map(|g| (g.id.as_str(), g.sync_status))
        .collect();
    let remote_ids: HashSet<&str> = remote.iter().map(|g| g.id.as_str()).collect();

    let mut merged: Vec<Goal> = Vec::with_capacity(local.len() + remote.len());
    let mut seen: HashSet<String> = HashSet::new();

    for goal in local.iter().filter(|g| g.sync_status.is_pending()) {
        if seen.insert(goal.id.clone()) {
            merged.push(goal.clone());
        }
    }
    for goal in local.iter().filter(|g| !remote_ids.contains(g.id.as_str())) {
        if seen.insert(goal.id.clone()) {
            merged.push(goal.clone());
        }
    }
    for goal in remote {
        if seen.insert(goal.id.clone()) {
            let flag = local_flags
                .get(goal.id.as_str())
                .copied()
                .unwrap_or(SyncStatus::Synced);
            let mut taken = goal;
            taken.sync_status = flag;
            merged.push(taken);
        }
    }

    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    merged
}
