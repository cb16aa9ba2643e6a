//! Pure layout engines for the two canvas views. Both take the data model,
//! the host's selection state and a geometry config, and return plain render
//! models; nothing here touches viewport or scroll state.

mod error;
mod routing;
mod tree;
mod types;
mod workflow;

pub use error::LayoutError;
pub use routing::{ConnectorPath, EdgeEmphasis, edge_id};
pub use tree::compute_architecture_layout;
pub use types::{
    PlacedAsset, PlacedSystem, Rect, Terminal, TerminalKind, TreeEdge, TreeLayout, WorkflowEdge,
    WorkflowEdgeKind, WorkflowLayout,
};
pub use workflow::compute_workflow_layout;
