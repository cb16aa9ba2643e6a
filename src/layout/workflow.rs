//! Workflow view layout: test assets of a single system arranged as a
//! left-to-right dependency DAG. Assets are ranked by longest dependency
//! chain, each rank forms a vertically packed column, and synthetic begin/end
//! terminals bracket the extreme columns.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::WorkflowConfig;
use crate::model::{SelectionState, SystemNode, TestAsset};

use super::error::LayoutError;
use super::routing::{ConnectorPath, EdgeEmphasis, edge_id};
use super::types::{
    PlacedAsset, Rect, Terminal, TerminalKind, WorkflowEdge, WorkflowEdgeKind, WorkflowLayout,
};

const BEGIN_ID: &str = "__begin";
const END_ID: &str = "__end";

/// Longest-chain rank per asset. Dependencies that name no asset of this
/// system are skipped, so an asset whose references are all dangling ranks
/// as an entry.
fn compute_ranks(assets: &[&TestAsset]) -> Result<HashMap<String, usize>, LayoutError> {
    let by_id: HashMap<&str, &TestAsset> =
        assets.iter().map(|a| (a.id.as_str(), *a)).collect();
    let mut ranks: HashMap<String, usize> = HashMap::new();
    let mut visiting: HashSet<String> = HashSet::new();

    fn rank_of(
        id: &str,
        by_id: &HashMap<&str, &TestAsset>,
        ranks: &mut HashMap<String, usize>,
        visiting: &mut HashSet<String>,
    ) -> Result<usize, LayoutError> {
        if let Some(rank) = ranks.get(id) {
            return Ok(*rank);
        }
        if !visiting.insert(id.to_string()) {
            return Err(LayoutError::CyclicDependency { asset: id.to_string() });
        }
        let asset = by_id[id];
        let mut rank = 0;
        for dep in &asset.depends_on {
            if by_id.contains_key(dep.as_str()) {
                rank = rank.max(rank_of(dep, by_id, ranks, visiting)? + 1);
            }
        }
        visiting.remove(id);
        ranks.insert(id.to_string(), rank);
        Ok(rank)
    }

    for asset in assets {
        rank_of(&asset.id, &by_id, &mut ranks, &mut visiting)?;
    }
    Ok(ranks)
}

pub fn compute_workflow_layout(
    system: &SystemNode,
    selection: &SelectionState,
    config: &WorkflowConfig,
) -> Result<WorkflowLayout, LayoutError> {
    let assets: Vec<&TestAsset> = system.test_assets.iter().collect();
    let ranks = compute_ranks(&assets)?;
    let center = config.center();

    // Group into columns, preserving declaration order inside each rank.
    let max_rank = ranks.values().copied().max().unwrap_or(0);
    let mut columns: Vec<Vec<&TestAsset>> = vec![Vec::new(); max_rank + 1];
    for asset in &assets {
        columns[ranks[&asset.id]].push(asset);
    }

    let referenced: HashSet<&str> = assets
        .iter()
        .flat_map(|a| a.depends_on.iter().map(String::as_str))
        .collect();

    let pitch = config.card_height + config.card_gap;
    let total_width = (max_rank as f32 + 1.0) * config.card_width
        + max_rank as f32 * (config.horizontal_spacing / 2.0);
    let start_x = center - total_width / 2.0;

    let mut cards: Vec<PlacedAsset> = Vec::with_capacity(assets.len());
    for (rank, column) in columns.iter().enumerate() {
        let col_x = start_x + rank as f32 * config.column_pitch();
        let col_height = column.len() as f32 * pitch - config.card_gap;
        let col_start_y = center - col_height / 2.0;
        for (idx, asset) in column.iter().enumerate() {
            let selected = selection.selected_asset.as_deref() == Some(asset.id.as_str());
            let visible = selection.asset_passes_filters(asset)
                && (selection.query.len() < 2 || selection.asset_matches(asset));
            cards.push(PlacedAsset {
                id: asset.id.clone(),
                name: asset.name.clone(),
                x: col_x,
                y: col_start_y + idx as f32 * pitch,
                width: config.card_width,
                height: config.card_height,
                status: asset.status,
                rank,
                entry: rank == 0,
                exit: !referenced.contains(asset.id.as_str()),
                selected,
                dimmed: !visible && !selected,
            });
        }
    }

    // With no assets both extremes collapse to a single virtual column on
    // the canvas center, so the terminals still bracket something.
    let fallback_col = center - config.card_width / 2.0;
    let first_col_x = cards
        .iter()
        .map(|c| c.x)
        .fold(f32::MAX, f32::min)
        .min(fallback_col);
    let last_col_x = cards
        .iter()
        .map(|c| c.x)
        .fold(fallback_col, f32::max);

    let outset = config.horizontal_spacing / 1.5;
    let begin_x = first_col_x - outset;
    let end_x = last_col_x + config.card_width + outset - config.terminal_size;
    let terminal_y = center - config.terminal_size / 2.0;

    let mut terminals = vec![
        Terminal {
            kind: TerminalKind::Begin,
            system: None,
            label: "Begin".to_string(),
            rect: Rect::new(begin_x, terminal_y, config.terminal_size, config.terminal_size),
        },
        Terminal {
            kind: TerminalKind::End,
            system: Some(system.id.clone()),
            label: "End".to_string(),
            rect: Rect::new(end_x, terminal_y, config.terminal_size, config.terminal_size),
        },
    ];

    let subsystems_x = begin_x - outset;
    let sub_pitch = config.terminal_size + config.subsystem_gap;
    let total_subsystems_height =
        system.subsystems.len() as f32 * sub_pitch - config.subsystem_gap;
    let sub_start_y = center - total_subsystems_height / 2.0;
    for (idx, sub) in system.subsystems.iter().enumerate() {
        terminals.push(Terminal {
            kind: TerminalKind::Subsystem,
            system: Some(sub.id.clone()),
            label: sub.name.clone(),
            rect: Rect::new(
                subsystems_x,
                sub_start_y + idx as f32 * sub_pitch,
                config.terminal_size,
                config.terminal_size,
            ),
        });
    }

    let mut edges: Vec<WorkflowEdge> = Vec::new();
    let gap = config.line_gap;
    let positions: BTreeMap<&str, &PlacedAsset> =
        cards.iter().map(|c| (c.id.as_str(), c)).collect();
    let deps_by_id: HashMap<&str, &[String]> = assets
        .iter()
        .map(|a| (a.id.as_str(), a.depends_on.as_slice()))
        .collect();
    let selected = selection.selected_asset.as_deref();

    for (idx, sub) in system.subsystems.iter().enumerate() {
        let sub_y = sub_start_y + idx as f32 * sub_pitch + config.terminal_size / 2.0;
        edges.push(WorkflowEdge {
            id: edge_id(&sub.id, BEGIN_ID),
            kind: WorkflowEdgeKind::SubsystemToBegin,
            from: sub.id.clone(),
            to: BEGIN_ID.to_string(),
            path: ConnectorPath::between(
                (subsystems_x + config.terminal_size, sub_y),
                (begin_x - gap, center),
            ),
            emphasis: EdgeEmphasis::Normal,
        });
    }

    for card in &cards {
        let (cx, cy) = card.center();
        if card.entry {
            edges.push(WorkflowEdge {
                id: edge_id(BEGIN_ID, &card.id),
                kind: WorkflowEdgeKind::BeginToAsset,
                from: BEGIN_ID.to_string(),
                to: card.id.clone(),
                path: ConnectorPath::between(
                    (begin_x + config.terminal_size + gap, center),
                    (card.x - gap, cy),
                ),
                emphasis: EdgeEmphasis::Normal,
            });
        }
        for dep in deps_by_id[card.id.as_str()] {
            let Some(from) = positions.get(dep.as_str()) else {
                continue;
            };
            let emphasis = if selected == Some(card.id.as_str())
                || selected == Some(from.id.as_str())
            {
                EdgeEmphasis::Highlighted
            } else {
                EdgeEmphasis::Normal
            };
            edges.push(WorkflowEdge {
                id: edge_id(&from.id, &card.id),
                kind: WorkflowEdgeKind::Dependency,
                from: from.id.clone(),
                to: card.id.clone(),
                path: ConnectorPath::between(
                    (from.x + config.card_width + gap, from.center().1),
                    (card.x - gap, cy),
                ),
                emphasis,
            });
        }
        if card.exit {
            let emphasis = if selected == Some(card.id.as_str()) {
                EdgeEmphasis::Highlighted
            } else {
                EdgeEmphasis::Normal
            };
            edges.push(WorkflowEdge {
                id: edge_id(&card.id, END_ID),
                kind: WorkflowEdgeKind::AssetToEnd,
                from: card.id.clone(),
                to: END_ID.to_string(),
                path: ConnectorPath::between(
                    (cx + config.card_width / 2.0 + gap, cy),
                    (end_x - gap, center),
                ),
                emphasis,
            });
        }
    }

    let has_subsystems = !system.subsystems.is_empty();
    let left = if has_subsystems { subsystems_x } else { begin_x };
    let right = end_x + config.terminal_size;
    let terminal_top = center - config.terminal_size / 2.0;
    let terminal_bottom = center + config.terminal_size / 2.0;
    let top = {
        let sub_top = if has_subsystems { sub_start_y } else { terminal_top };
        let card_top = cards.iter().map(|c| c.y).fold(terminal_top, f32::min);
        sub_top.min(card_top)
    };
    let bottom = {
        // Subsystem terminals carry a label underneath, hence the headroom.
        let sub_bottom = if has_subsystems {
            sub_start_y + total_subsystems_height + config.subsystem_gap
        } else {
            terminal_bottom + config.subsystem_gap
        };
        let card_bottom = cards
            .iter()
            .map(|c| c.y + c.height)
            .fold(terminal_bottom, f32::max);
        sub_bottom.max(card_bottom)
    };
    let bounds = Rect::new(left, top, right - left, bottom - top);

    Ok(WorkflowLayout::new(
        cards,
        terminals,
        edges,
        config.canvas_size,
        bounds,
    ))
}
