use std::path::Path;

use serde::{Deserialize, Serialize};

/// Zoom/pan/fit tuning for one viewport instance. Each view owns its own
/// copy; the two views deliberately differ in zoom floor and initial zoom.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub initial_zoom: f32,
    /// Absolute step for the +/- HUD buttons.
    pub zoom_step: f32,
    /// Padding applied around content bounds during fit-to-view.
    pub fit_padding: f32,
    /// Fit never zooms in past this, even when content is tiny.
    pub fit_max_zoom: f32,
    /// Fit skips the zoom transition when the computed zoom is this close to
    /// the current one, scrolling directly instead.
    pub zoom_epsilon: f32,
    /// Pointer travel (px) before an armed press becomes a drag.
    pub drag_threshold: f32,
    /// Base for wheel zoom: factor = base ^ (delta / 100).
    pub wheel_base: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 3.0,
            initial_zoom: 1.0,
            zoom_step: 0.1,
            fit_padding: 120.0,
            fit_max_zoom: 1.0,
            zoom_epsilon: 0.01,
            drag_threshold: 5.0,
            wheel_base: 1.1,
        }
    }
}

/// Geometry of the architecture (system tree) canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchitectureConfig {
    pub canvas_size: f32,
    pub root_x: f32,
    pub root_y: f32,
    pub node_width: f32,
    pub node_height: f32,
    /// Horizontal distance between a parent's origin and its children's
    /// origins; children sit to the left of the parent.
    pub horizontal_step: f32,
    /// Clear vertical gap between sibling cards; the center-to-center pitch
    /// is `node_height + vertical_gap`.
    pub vertical_gap: f32,
    /// Connectors start/end slightly inside the card edge to avoid visual
    /// gaps at the border.
    pub connector_inset: f32,
    pub viewport: ViewportConfig,
}

impl Default for ArchitectureConfig {
    fn default() -> Self {
        Self {
            canvas_size: 12000.0,
            root_x: 8000.0,
            root_y: 6000.0,
            node_width: 240.0,
            node_height: 160.0,
            horizontal_step: 480.0,
            vertical_gap: 120.0,
            connector_inset: 4.0,
            viewport: ViewportConfig {
                min_zoom: 0.2,
                initial_zoom: 0.8,
                ..ViewportConfig::default()
            },
        }
    }
}

impl ArchitectureConfig {
    /// Center-to-center vertical pitch between sibling bands.
    pub fn vertical_step(&self) -> f32 {
        self.node_height + self.vertical_gap
    }
}

/// Geometry of the test-workflow (dependency DAG) canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub canvas_size: f32,
    pub card_width: f32,
    pub card_height: f32,
    pub terminal_size: f32,
    /// Base horizontal spacing unit; the column pitch is
    /// `card_width + horizontal_spacing / 2`, and terminals sit
    /// `horizontal_spacing / 1.5` outside the extreme columns.
    pub horizontal_spacing: f32,
    /// Clear vertical gap between cards in a column.
    pub card_gap: f32,
    /// Gap between a card/terminal border and the connector endpoint.
    pub line_gap: f32,
    /// Vertical clearance between stacked subsystem terminals, also used as
    /// label headroom below terminals when computing fit bounds.
    pub subsystem_gap: f32,
    pub viewport: ViewportConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            canvas_size: 5000.0,
            card_width: 320.0,
            card_height: 125.0,
            terminal_size: 120.0,
            horizontal_spacing: 500.0,
            card_gap: 50.0,
            line_gap: 6.0,
            subsystem_gap: 100.0,
            viewport: ViewportConfig {
                initial_zoom: 0.85,
                ..ViewportConfig::default()
            },
        }
    }
}

impl WorkflowConfig {
    /// Fixed virtual-canvas center both axes are packed around.
    pub fn center(&self) -> f32 {
        self.canvas_size / 2.0
    }

    pub fn column_pitch(&self) -> f32 {
        self.card_width + self.horizontal_spacing / 2.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub architecture: ArchitectureConfig,
    pub workflow: WorkflowConfig,
}

/// Load a config overlay from a JSON file; absent path means defaults.
/// Every section defaults independently, so files only need to carry the
/// keys they override.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_differ_per_view() {
        let config = Config::default();
        assert_eq!(config.architecture.viewport.initial_zoom, 0.8);
        assert_eq!(config.architecture.viewport.min_zoom, 0.2);
        assert_eq!(config.workflow.viewport.initial_zoom, 0.85);
        assert_eq!(config.workflow.viewport.min_zoom, 0.1);
    }

    #[test]
    fn vertical_step_includes_card_height() {
        let config = ArchitectureConfig::default();
        assert_eq!(config.vertical_step(), 280.0);
    }

    #[test]
    fn partial_overlay_keeps_defaults() {
        let parsed: Config =
            serde_json::from_str(r#"{"workflow": {"card_width": 400.0}}"#).unwrap();
        assert_eq!(parsed.workflow.card_width, 400.0);
        assert_eq!(parsed.workflow.card_height, 125.0);
        assert_eq!(parsed.architecture.node_width, 240.0);
    }
}
