use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Navigation, ReadinessStatus};

use super::routing::{ConnectorPath, EdgeEmphasis};

/// Axis-aligned rectangle in virtual-canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A system card placed by the architecture layout.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedSystem {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    /// Rollup status over the node's whole subtree.
    pub status: ReadinessStatus,
    pub expanded: bool,
    pub subsystem_count: usize,
    pub selected: bool,
    pub search_match: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeEdge {
    pub id: String,
    pub parent: String,
    pub child: String,
    pub path: ConnectorPath,
    pub emphasis: EdgeEmphasis,
}

/// Architecture view render model: a flat list of placed cards plus
/// parent-to-child connectors. Pure data, rebuilt from scratch on every
/// relevant input change.
#[derive(Debug, Clone, Serialize)]
pub struct TreeLayout {
    pub nodes: Vec<PlacedSystem>,
    pub edges: Vec<TreeEdge>,
    pub canvas_size: f32,
}

impl TreeLayout {
    /// Immutable id-to-position map for centering and selection-follow.
    pub fn positions(&self) -> BTreeMap<String, (f32, f32)> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), (node.x, node.y)))
            .collect()
    }

    /// Tight bounds over every placed card; a root-card-sized rect at the
    /// origin when the layout is somehow empty.
    pub fn content_bounds(&self) -> Rect {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for node in &self.nodes {
            min_x = min_x.min(node.x);
            min_y = min_y.min(node.y);
            max_x = max_x.max(node.x + node.width);
            max_y = max_y.max(node.y + node.height);
        }
        if min_x == f32::MAX {
            return Rect::new(0.0, 0.0, 1.0, 1.0);
        }
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// A test-asset card placed by the workflow layout.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedAsset {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub status: ReadinessStatus,
    /// Topological depth in the dependency DAG; 0 for entry assets.
    pub rank: usize,
    /// Has no dependencies; connected from the begin terminal.
    pub entry: bool,
    /// Referenced by no other asset; connected to the end terminal.
    pub exit: bool,
    pub selected: bool,
    /// Fails the active status filters or text query; rendered muted.
    pub dimmed: bool,
}

impl PlacedAsset {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalKind {
    Begin,
    End,
    Subsystem,
}

/// A synthetic begin/end/subsystem-link node; not backed by a TestAsset.
#[derive(Debug, Clone, Serialize)]
pub struct Terminal {
    pub kind: TerminalKind,
    /// Subsystem id for `Subsystem` terminals, the owning system id for
    /// `End` (it doubles as go-to-parent), none for `Begin`.
    pub system: Option<String>,
    pub label: String,
    pub rect: Rect,
}

impl Terminal {
    /// What clicking this terminal means. The begin terminal is inert.
    pub fn navigation(&self) -> Option<Navigation> {
        match self.kind {
            TerminalKind::Begin => None,
            TerminalKind::End => Some(Navigation::ToParent),
            TerminalKind::Subsystem => {
                self.system.clone().map(Navigation::ToSubsystem)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowEdgeKind {
    SubsystemToBegin,
    BeginToAsset,
    Dependency,
    AssetToEnd,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowEdge {
    pub id: String,
    pub kind: WorkflowEdgeKind,
    pub from: String,
    pub to: String,
    pub path: ConnectorPath,
    pub emphasis: EdgeEmphasis,
}

/// Workflow view render model: ranked asset cards, synthetic terminals and
/// every connector, plus the bounds fit-to-view should frame.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowLayout {
    pub cards: Vec<PlacedAsset>,
    pub terminals: Vec<Terminal>,
    pub edges: Vec<WorkflowEdge>,
    pub canvas_size: f32,
    bounds: Rect,
}

impl WorkflowLayout {
    pub(super) fn new(
        cards: Vec<PlacedAsset>,
        terminals: Vec<Terminal>,
        edges: Vec<WorkflowEdge>,
        canvas_size: f32,
        bounds: Rect,
    ) -> Self {
        Self {
            cards,
            terminals,
            edges,
            canvas_size,
            bounds,
        }
    }

    pub fn positions(&self) -> BTreeMap<String, (f32, f32)> {
        self.cards
            .iter()
            .map(|card| (card.id.clone(), (card.x, card.y)))
            .collect()
    }

    /// Bounds covering cards, terminals and label headroom. Always finite,
    /// even with zero assets (the terminals alone span a valid rect).
    pub fn content_bounds(&self) -> Rect {
        self.bounds
    }
}
