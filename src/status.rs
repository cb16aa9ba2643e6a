use crate::model::{ReadinessStatus, SystemNode};

/// Derived readiness for a whole subtree, computed from every test asset the
/// subtree contains.
///
/// The check order is load-bearing: the all-deferred test runs on the raw
/// statuses before deferred work is folded into "available", so a subtree
/// whose only work is deferred reports `Deferred` rather than `Available`.
pub fn compute_rollup_status(node: &SystemNode) -> ReadinessStatus {
    let mut assets = Vec::new();
    node.collect_assets(&mut assets);

    if assets.is_empty() {
        return ReadinessStatus::Deferred;
    }

    if assets
        .iter()
        .all(|a| a.status == ReadinessStatus::Deferred)
    {
        return ReadinessStatus::Deferred;
    }

    // Deferred work does not block readiness: fold it into Available before
    // the uniformity checks.
    let normalized: Vec<ReadinessStatus> = assets
        .iter()
        .map(|a| match a.status {
            ReadinessStatus::Deferred => ReadinessStatus::Available,
            other => other,
        })
        .collect();

    if normalized.iter().all(|s| *s == ReadinessStatus::Available) {
        return ReadinessStatus::Available;
    }
    if normalized.iter().all(|s| *s == ReadinessStatus::NotMade) {
        return ReadinessStatus::NotMade;
    }

    ReadinessStatus::InProgress
}
