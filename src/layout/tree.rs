//! Architecture view layout: recursive placement of the system tree on the
//! virtual canvas. Each subtree is allocated a vertical band proportional to
//! its visible leaf count, children stack inside the parent's band and the
//! parent sits centered on the span of its children.

use std::collections::HashSet;

use crate::config::ArchitectureConfig;
use crate::model::{SelectionState, SystemNode};
use crate::status::compute_rollup_status;

use super::routing::{ConnectorPath, EdgeEmphasis, edge_id};
use super::types::{PlacedSystem, TreeEdge, TreeLayout};

/// Leaves of the *visible* tree: a collapsed or childless node counts as one
/// regardless of how much lives underneath it.
fn visible_leaf_count(node: &SystemNode, expanded: &HashSet<String>) -> usize {
    if !expanded.contains(&node.id) || node.subsystems.is_empty() {
        return 1;
    }
    node.subsystems
        .iter()
        .map(|sub| visible_leaf_count(sub, expanded))
        .sum()
}

struct TreeWalk<'a> {
    expanded: &'a HashSet<String>,
    selection: &'a SelectionState,
    config: &'a ArchitectureConfig,
    nodes: Vec<PlacedSystem>,
    edges: Vec<TreeEdge>,
    visited: HashSet<String>,
}

impl TreeWalk<'_> {
    fn place(&mut self, node: &SystemNode, x: f32, y: f32, depth: usize) {
        // Ids are unique by construction; a repeat means malformed input,
        // skip rather than loop.
        if !self.visited.insert(node.id.clone()) {
            return;
        }

        let is_expanded = self.expanded.contains(&node.id);
        self.nodes.push(PlacedSystem {
            id: node.id.clone(),
            name: node.name.clone(),
            x,
            y,
            width: self.config.node_width,
            height: self.config.node_height,
            depth,
            status: compute_rollup_status(node),
            expanded: is_expanded,
            subsystem_count: node.subsystems.len(),
            selected: self.selection.selected_system.as_deref() == Some(node.id.as_str()),
            search_match: self.selection.system_matches(node),
        });

        if !is_expanded || node.subsystems.is_empty() {
            return;
        }

        let step = self.config.vertical_step();
        let child_x = x - self.config.horizontal_step;
        let total_leaves = visible_leaf_count(node, self.expanded);
        let mut cursor = -((total_leaves as f32 - 1.0) * step) / 2.0;

        for sub in &node.subsystems {
            let sub_leaves = visible_leaf_count(sub, self.expanded);
            // Center the child on its own band, then advance past the band.
            let child_y = y + cursor + (sub_leaves as f32 - 1.0) * step / 2.0;
            cursor += sub_leaves as f32 * step;

            let inset = self.config.connector_inset;
            let start = (x + inset, y + self.config.node_height / 2.0);
            let end = (
                child_x + self.config.node_width - inset,
                child_y + self.config.node_height / 2.0,
            );
            let selected = self.selection.selected_system.as_deref();
            let emphasis = if selected == Some(node.id.as_str())
                || selected == Some(sub.id.as_str())
            {
                EdgeEmphasis::Highlighted
            } else {
                EdgeEmphasis::Normal
            };
            self.edges.push(TreeEdge {
                id: edge_id(&node.id, &sub.id),
                parent: node.id.clone(),
                child: sub.id.clone(),
                path: ConnectorPath::between(start, end),
                emphasis,
            });

            self.place(sub, child_x, child_y, depth + 1);
        }
    }
}

pub fn compute_architecture_layout(
    root: &SystemNode,
    expanded: &HashSet<String>,
    selection: &SelectionState,
    config: &ArchitectureConfig,
) -> TreeLayout {
    let mut walk = TreeWalk {
        expanded,
        selection,
        config,
        nodes: Vec::new(),
        edges: Vec::new(),
        visited: HashSet::new(),
    };
    walk.place(root, config.root_x, config.root_y, 0);
    TreeLayout {
        nodes: walk.nodes,
        edges: walk.edges,
        canvas_size: config.canvas_size,
    }
}
