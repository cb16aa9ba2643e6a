//! Connector geometry shared by both canvas views: cubic curves whose
//! control points are pulled horizontally toward each other, giving an
//! S-curve for vertically offset endpoints and a near-straight run for
//! aligned ones.

use serde::Serialize;

/// Fraction of the horizontal distance each control point is offset from its
/// endpoint. 0.5 puts both control points on the midline.
const CONTROL_FRACTION: f32 = 0.5;

/// Visual state of an edge; affects stroke styling only, never geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeEmphasis {
    Normal,
    Highlighted,
}

/// Stable edge identity for diffing/animation across layout recomputes.
pub fn edge_id(from: &str, to: &str) -> String {
    format!("{from}->{to}")
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectorPath {
    pub start: (f32, f32),
    pub c1: (f32, f32),
    pub c2: (f32, f32),
    pub end: (f32, f32),
}

impl ConnectorPath {
    pub fn between(start: (f32, f32), end: (f32, f32)) -> Self {
        let pull = (end.0 - start.0) * CONTROL_FRACTION;
        Self {
            start,
            c1: (start.0 + pull, start.1),
            c2: (end.0 - pull, end.1),
            end,
        }
    }

    /// SVG path data for the curve.
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.0,
            self.start.1,
            self.c1.0,
            self.c1.1,
            self.c2.0,
            self.c2.1,
            self.end.0,
            self.end.1
        )
    }

    /// Arrowhead triangle at the target end, oriented along the terminal
    /// tangent (end minus second control point). Returns [tip, base_a, base_b].
    pub fn arrowhead(&self, length: f32, width: f32) -> [(f32, f32); 3] {
        let mut dx = self.end.0 - self.c2.0;
        let mut dy = self.end.1 - self.c2.1;
        let norm = (dx * dx + dy * dy).sqrt();
        if norm > f32::EPSILON {
            dx /= norm;
            dy /= norm;
        } else {
            // Degenerate curve: point the arrow along +x.
            dx = 1.0;
            dy = 0.0;
        }
        let base_x = self.end.0 - dx * length;
        let base_y = self.end.1 - dy * length;
        let half = width / 2.0;
        // Perpendicular to the tangent.
        let px = -dy;
        let py = dx;
        [
            self.end,
            (base_x + px * half, base_y + py * half),
            (base_x - px * half, base_y - py * half),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_sit_on_the_midline() {
        let path = ConnectorPath::between((0.0, 0.0), (100.0, 40.0));
        assert_eq!(path.c1, (50.0, 0.0));
        assert_eq!(path.c2, (50.0, 40.0));
        assert_eq!(path.start, (0.0, 0.0));
        assert_eq!(path.end, (100.0, 40.0));
    }

    #[test]
    fn aligned_endpoints_give_flat_controls() {
        let path = ConnectorPath::between((10.0, 25.0), (90.0, 25.0));
        assert_eq!(path.c1.1, 25.0);
        assert_eq!(path.c2.1, 25.0);
    }

    #[test]
    fn leftward_edges_mirror_the_pull() {
        // Architecture connectors run right-to-left (parent to child).
        let path = ConnectorPath::between((100.0, 0.0), (0.0, 60.0));
        assert_eq!(path.c1, (50.0, 0.0));
        assert_eq!(path.c2, (50.0, 60.0));
    }

    #[test]
    fn svg_path_is_a_single_cubic() {
        let path = ConnectorPath::between((0.0, 0.0), (10.0, 0.0));
        let svg = path.to_svg();
        assert!(svg.starts_with("M 0 0 C "));
        assert_eq!(svg.matches('C').count(), 1);
    }

    #[test]
    fn arrowhead_points_along_horizontal_approach() {
        let path = ConnectorPath::between((0.0, 0.0), (100.0, 0.0));
        let [tip, a, b] = path.arrowhead(10.0, 7.0);
        assert_eq!(tip, (100.0, 0.0));
        assert_eq!(a.0, 90.0);
        assert_eq!(b.0, 90.0);
        assert!((a.1 - b.1).abs() - 7.0 < 1e-5);
    }

    #[test]
    fn edge_id_is_order_sensitive() {
        assert_eq!(edge_id("a", "b"), "a->b");
        assert_ne!(edge_id("a", "b"), edge_id("b", "a"));
    }
}
