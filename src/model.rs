use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Readiness of a test asset, and the derived rollup value for a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadinessStatus {
    Available,
    InProgress,
    NotMade,
    Deferred,
}

impl ReadinessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::InProgress => "IN_PROGRESS",
            Self::NotMade => "NOT_MADE",
            Self::Deferred => "DEFERRED",
        }
    }
}

/// A unit of test work owned by a single system.
///
/// `depends_on` references asset ids within the same system; the relation is
/// expected to be acyclic and is validated during workflow layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestAsset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: ReadinessStatus,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

/// A node in the system hierarchy. The subsystem graph is a tree: single
/// parent, no cycles, no stored back-pointers. Parent lookup is path search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    /// Intrinsic status, used only as display fallback when the subtree has
    /// no assets; rollup is always computed (see `status`).
    pub status: ReadinessStatus,
    #[serde(default)]
    pub test_assets: Vec<TestAsset>,
    #[serde(default)]
    pub subsystems: Vec<SystemNode>,
}

impl SystemNode {
    /// Depth-first lookup by id, including self.
    pub fn find(&self, id: &str) -> Option<&SystemNode> {
        if self.id == id {
            return Some(self);
        }
        for sub in &self.subsystems {
            if let Some(found) = sub.find(id) {
                return Some(found);
            }
        }
        None
    }

    /// Ids on the path from this node down to (but excluding) `target_id`.
    /// Empty when `target_id` is this node or not present in the subtree.
    pub fn parent_path(&self, target_id: &str) -> Vec<String> {
        fn walk(node: &SystemNode, target: &str, trail: &mut Vec<String>) -> bool {
            if node.id == target {
                return true;
            }
            trail.push(node.id.clone());
            for sub in &node.subsystems {
                if walk(sub, target, trail) {
                    return true;
                }
            }
            trail.pop();
            false
        }
        let mut trail = Vec::new();
        if walk(self, target_id, &mut trail) {
            trail
        } else {
            Vec::new()
        }
    }

    /// Every system id in the subtree, including self.
    pub fn all_ids(&self) -> HashSet<String> {
        let mut ids = HashSet::new();
        fn collect(node: &SystemNode, ids: &mut HashSet<String>) {
            ids.insert(node.id.clone());
            for sub in &node.subsystems {
                collect(sub, ids);
            }
        }
        collect(self, &mut ids);
        ids
    }

    /// Every test asset in the subtree, including this node's own, in
    /// traversal order.
    pub fn collect_assets<'a>(&'a self, out: &mut Vec<&'a TestAsset>) {
        out.extend(self.test_assets.iter());
        for sub in &self.subsystems {
            sub.collect_assets(out);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub root: SystemNode,
}

/// Selection and search state supplied by the host UI. The layout engines
/// only consume it to mark highlight/dim flags; search itself lives upstream.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub selected_system: Option<String>,
    pub selected_asset: Option<String>,
    pub query: String,
    pub status_filters: HashSet<ReadinessStatus>,
}

impl SelectionState {
    /// Queries shorter than two characters never match (mirrors the search
    /// box behaviour: single keystrokes do not light up the canvas).
    fn query_matches(&self, id: &str, name: &str) -> bool {
        if self.query.len() < 2 {
            return false;
        }
        let needle = self.query.to_lowercase();
        id.to_lowercase().contains(&needle) || name.to_lowercase().contains(&needle)
    }

    pub fn system_matches(&self, node: &SystemNode) -> bool {
        self.query_matches(&node.id, &node.name)
    }

    pub fn asset_matches(&self, asset: &TestAsset) -> bool {
        self.query_matches(&asset.id, &asset.name)
    }

    /// Whether an asset survives the active status filters. No filters means
    /// everything passes; non-passing cards are dimmed, not removed.
    pub fn asset_passes_filters(&self, asset: &TestAsset) -> bool {
        self.status_filters.is_empty() || self.status_filters.contains(&asset.status)
    }
}

/// Navigation intents resolved from canvas hits; the host owns the actual
/// selection transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    ToParent,
    ToSubsystem(String),
    SelectSystem(String),
    SelectAsset(String),
}
