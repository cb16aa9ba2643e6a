use crate::layout::{TreeLayout, WorkflowLayout};
use crate::layout::{EdgeEmphasis, Rect};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// JSON snapshot of a computed layout, for debugging and golden tests.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub view: String,
    pub title: String,
    pub canvas_size: f32,
    pub bounds: Rect,
    pub nodes: Vec<NodeDump>,
    pub terminals: Vec<TerminalDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TerminalDump {
    pub kind: String,
    pub system: Option<String>,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub from: String,
    pub to: String,
    pub kind: String,
    pub path: String,
    pub highlighted: bool,
}

impl LayoutDump {
    pub fn from_architecture(layout: &TreeLayout, title: &str) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                name: node.name.clone(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                status: node.status.as_str().to_string(),
                depth: Some(node.depth),
                expanded: Some(node.expanded),
                rank: None,
                entry: None,
                exit: None,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                from: edge.parent.clone(),
                to: edge.child.clone(),
                kind: "hierarchy".to_string(),
                path: edge.path.to_svg(),
                highlighted: edge.emphasis == EdgeEmphasis::Highlighted,
            })
            .collect();

        LayoutDump {
            view: "architecture".to_string(),
            title: title.to_string(),
            canvas_size: layout.canvas_size,
            bounds: layout.content_bounds(),
            nodes,
            terminals: Vec::new(),
            edges,
        }
    }

    pub fn from_workflow(layout: &WorkflowLayout, title: &str) -> Self {
        let nodes = layout
            .cards
            .iter()
            .map(|card| NodeDump {
                id: card.id.clone(),
                name: card.name.clone(),
                x: card.x,
                y: card.y,
                width: card.width,
                height: card.height,
                status: card.status.as_str().to_string(),
                depth: None,
                expanded: None,
                rank: Some(card.rank),
                entry: Some(card.entry),
                exit: Some(card.exit),
            })
            .collect();

        let terminals = layout
            .terminals
            .iter()
            .map(|terminal| TerminalDump {
                kind: format!("{:?}", terminal.kind).to_lowercase(),
                system: terminal.system.clone(),
                label: terminal.label.clone(),
                x: terminal.rect.x,
                y: terminal.rect.y,
                size: terminal.rect.width,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
                kind: format!("{:?}", edge.kind),
                path: edge.path.to_svg(),
                highlighted: edge.emphasis == EdgeEmphasis::Highlighted,
            })
            .collect();

        LayoutDump {
            view: "workflow".to_string(),
            title: title.to_string(),
            canvas_size: layout.canvas_size,
            bounds: layout.content_bounds(),
            nodes,
            terminals,
            edges,
        }
    }
}

/// Write the dump as pretty JSON to `path`, or stdout when no path is given.
pub fn write_layout_dump(path: Option<&Path>, dump: &LayoutDump) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, dump)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, dump)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}
