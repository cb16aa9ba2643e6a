//! Viewport state machine shared by both canvas views: zoom clamped to a
//! configured range, focal-point-preserving rescale, staged fit-to-view and
//! a pan gesture that distinguishes clicks from drags.
//!
//! The controller is host-agnostic. It never scrolls anything itself; scroll
//! targets come back as [`ScrollTo`] values for the host to apply, and the
//! host reports the applied scroll offset back via [`ViewportController::set_scroll`].

use serde::Serialize;

use crate::config::ViewportConfig;
use crate::layout::Rect;

/// Scroll request for the host, in scaled (zoom-applied) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollTo {
    pub x: f32,
    pub y: f32,
    pub smooth: bool,
}

/// Why the zoom value changed, decided at the moment of the change and
/// consumed by the next [`ViewportController::settle`].
#[derive(Debug, Clone, Copy, PartialEq)]
enum PendingZoom {
    /// Wheel or HUD button: keep the world point currently under the
    /// viewport center fixed.
    User,
    /// Fit or centering flow: scroll so `target` lands on the viewport
    /// center at the new zoom.
    Programmatic { target: (f32, f32), smooth: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    /// Pointer is down but travel is under the drag threshold; release now
    /// is a click.
    Armed {
        origin: (f32, f32),
        scroll_origin: (f32, f32),
    },
    Dragging {
        origin: (f32, f32),
        scroll_origin: (f32, f32),
    },
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    zoom: f32,
    /// Zoom at the last settle; the focal-point math needs the value the
    /// current scroll offset was computed under.
    prev_zoom: f32,
    scroll: (f32, f32),
    viewport: (f32, f32),
    pending: Option<PendingZoom>,
    drag: DragState,
}

impl ViewportController {
    pub fn new(config: ViewportConfig) -> Self {
        let zoom = config.initial_zoom.clamp(config.min_zoom, config.max_zoom);
        Self {
            config,
            zoom,
            prev_zoom: zoom,
            scroll: (0.0, 0.0),
            viewport: (0.0, 0.0),
            pending: None,
            drag: DragState::Idle,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn scroll(&self) -> (f32, f32) {
        self.scroll
    }

    /// Host feedback after it applied a scroll (or the user scrolled
    /// natively).
    pub fn set_scroll(&mut self, x: f32, y: f32) {
        self.scroll = (x, y);
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
    }

    fn set_zoom(&mut self, zoom: f32, pending: PendingZoom) {
        let clamped = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        if clamped != self.zoom {
            self.zoom = clamped;
            self.pending = Some(pending);
        }
    }

    /// Multiplicative zoom, e.g. from a pinch gesture.
    pub fn zoom_by(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor, PendingZoom::User);
    }

    /// Ctrl/cmd-wheel zoom; `delta` is the wheel delta with up positive.
    pub fn wheel_zoom(&mut self, delta: f32) {
        self.zoom_by(self.config.wheel_base.powf(delta / 100.0));
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.config.zoom_step, PendingZoom::User);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.config.zoom_step, PendingZoom::User);
    }

    /// Resolve a zoom change into the scroll that keeps the view coherent.
    /// Call after every zoom mutation, once the host has re-rendered at the
    /// new scale. No-op when the zoom did not actually change.
    pub fn settle(&mut self) -> Option<ScrollTo> {
        if self.zoom == self.prev_zoom {
            self.pending = None;
            return None;
        }
        let (vw, vh) = self.viewport;
        let target = match self.pending.take() {
            Some(PendingZoom::Programmatic { target, smooth }) => ScrollTo {
                x: target.0 * self.zoom - vw / 2.0,
                y: target.1 * self.zoom - vh / 2.0,
                smooth,
            },
            // User zoom: re-center on the world point that was under the
            // viewport center at the previous zoom.
            Some(PendingZoom::User) | None => {
                let world_x = (self.scroll.0 + vw / 2.0) / self.prev_zoom;
                let world_y = (self.scroll.1 + vh / 2.0) / self.prev_zoom;
                ScrollTo {
                    x: world_x * self.zoom - vw / 2.0,
                    y: world_y * self.zoom - vh / 2.0,
                    smooth: false,
                }
            }
        };
        self.prev_zoom = self.zoom;
        self.scroll = (target.x, target.y);
        Some(target)
    }

    /// Frame `bounds` with the configured padding, never zooming in past
    /// `fit_max_zoom`. Returns an immediate scroll when the zoom barely
    /// changes; otherwise stages the center for the next [`settle`].
    ///
    /// A no-op before the viewport has been measured.
    ///
    /// [`settle`]: ViewportController::settle
    pub fn fit_to_view(&mut self, bounds: Rect, smooth: bool) -> Option<ScrollTo> {
        let (vw, vh) = self.viewport;
        if vw <= 0.0 || vh <= 0.0 {
            return None;
        }
        let padding = self.config.fit_padding;
        let zoom_x = vw / (bounds.width + padding * 2.0);
        let zoom_y = vh / (bounds.height + padding * 2.0);
        let new_zoom = zoom_x
            .min(zoom_y)
            .min(self.config.fit_max_zoom)
            .clamp(self.config.min_zoom, self.config.max_zoom);
        let center = bounds.center();

        if (new_zoom - self.zoom).abs() < self.config.zoom_epsilon {
            // Close enough: skip the rescale and scroll straight there.
            let target = ScrollTo {
                x: center.0 * self.zoom - vw / 2.0,
                y: center.1 * self.zoom - vh / 2.0,
                smooth,
            };
            self.scroll = (target.x, target.y);
            return Some(target);
        }
        self.set_zoom(
            new_zoom,
            PendingZoom::Programmatic {
                target: center,
                smooth,
            },
        );
        None
    }

    /// Scroll so `point` (world coordinates) lands on the viewport center at
    /// the current zoom.
    pub fn center_on(&mut self, point: (f32, f32), smooth: bool) -> ScrollTo {
        let (vw, vh) = self.viewport;
        let target = ScrollTo {
            x: point.0 * self.zoom - vw / 2.0,
            y: point.1 * self.zoom - vh / 2.0,
            smooth,
        };
        self.scroll = (target.x, target.y);
        target
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.drag = DragState::Armed {
            origin: (x, y),
            scroll_origin: self.scroll,
        };
    }

    /// Advance the pan gesture. Returns the new scroll offset once the
    /// gesture has crossed the drag threshold; under it, the press is still
    /// a potential click and nothing moves.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        let (origin, scroll_origin) = match self.drag {
            DragState::Idle => return None,
            DragState::Armed { origin, scroll_origin }
            | DragState::Dragging { origin, scroll_origin } => (origin, scroll_origin),
        };
        let dx = x - origin.0;
        let dy = y - origin.1;
        if let DragState::Armed { .. } = self.drag {
            if dx.abs() <= self.config.drag_threshold && dy.abs() <= self.config.drag_threshold {
                return None;
            }
            self.drag = DragState::Dragging { origin, scroll_origin };
        }
        self.scroll = (scroll_origin.0 - dx, scroll_origin.1 - dy);
        Some(self.scroll)
    }

    /// End the gesture. `true` means the press never became a drag and the
    /// host should treat it as a click.
    pub fn pointer_up(&mut self) -> bool {
        let was_click = matches!(self.drag, DragState::Armed { .. });
        self.drag = DragState::Idle;
        was_click
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ViewportController {
        let mut vc = ViewportController::new(ViewportConfig::default());
        vc.set_viewport_size(800.0, 600.0);
        vc
    }

    #[test]
    fn initial_zoom_is_clamped() {
        let config = ViewportConfig {
            initial_zoom: 9.0,
            ..ViewportConfig::default()
        };
        let vc = ViewportController::new(config);
        assert_eq!(vc.zoom(), 3.0);
    }

    #[test]
    fn zoom_respects_range() {
        let mut vc = controller();
        vc.zoom_by(100.0);
        assert_eq!(vc.zoom(), 3.0);
        vc.zoom_by(0.0001);
        assert_eq!(vc.zoom(), 0.1);
    }

    #[test]
    fn wheel_zoom_is_exponential_in_delta() {
        let mut vc = controller();
        let before = vc.zoom();
        vc.wheel_zoom(100.0);
        assert!((vc.zoom() - before * 1.1).abs() < 1e-5);
        vc.settle();
        vc.wheel_zoom(-100.0);
        assert!((vc.zoom() - before).abs() < 1e-5);
    }

    #[test]
    fn hud_buttons_step_additively() {
        let mut vc = controller();
        vc.zoom_in();
        assert!((vc.zoom() - 1.1).abs() < 1e-5);
        vc.settle();
        vc.zoom_out();
        vc.settle();
        vc.zoom_out();
        assert!((vc.zoom() - 0.9).abs() < 1e-5);
        assert_eq!(vc.zoom_percent(), 90);
    }

    #[test]
    fn user_zoom_preserves_the_focal_point() {
        let mut vc = controller();
        // Center the viewport on world point (1000, 500) at zoom 1.
        vc.set_scroll(1000.0 - 400.0, 500.0 - 300.0);
        vc.zoom_by(2.0);
        let scroll = vc.settle().unwrap();
        // Same world point under the center at zoom 2.
        assert_eq!(scroll.x, 1000.0 * 2.0 - 400.0);
        assert_eq!(scroll.y, 500.0 * 2.0 - 300.0);
        assert!(!scroll.smooth);
    }

    #[test]
    fn settle_without_zoom_change_is_a_no_op() {
        let mut vc = controller();
        assert_eq!(vc.settle(), None);
        vc.zoom_by(1.0);
        assert_eq!(vc.settle(), None);
    }

    #[test]
    fn fit_stages_the_target_until_settle() {
        let mut vc = controller();
        let bounds = Rect::new(0.0, 0.0, 4000.0, 2000.0);
        assert_eq!(vc.fit_to_view(bounds, true), None);
        // 800 / (4000 + 240) limits tighter than 600 / (2000 + 240).
        let expected = 800.0 / 4240.0;
        assert!((vc.zoom() - expected).abs() < 1e-5);
        let scroll = vc.settle().unwrap();
        assert!(scroll.smooth);
        assert!((scroll.x - (2000.0 * expected - 400.0)).abs() < 1e-3);
        assert!((scroll.y - (1000.0 * expected - 300.0)).abs() < 1e-3);
    }

    #[test]
    fn fit_never_zooms_in_past_the_cap() {
        let mut vc = controller();
        vc.zoom_out();
        vc.zoom_out();
        vc.settle();
        // Tiny content would fit at a huge zoom; the cap holds it at 1.0.
        vc.fit_to_view(Rect::new(0.0, 0.0, 10.0, 10.0), false);
        assert_eq!(vc.zoom(), 1.0);
    }

    #[test]
    fn near_equal_zoom_scrolls_directly() {
        let mut vc = controller();
        // Pick bounds whose fit zoom is exactly the current zoom's cap.
        let bounds = Rect::new(100.0, 200.0, 4000.0, 2000.0);
        vc.fit_to_view(bounds, true);
        vc.settle();
        let zoom = vc.zoom();
        // Refitting the same bounds changes nothing, so the second call
        // returns an immediate scroll at the unchanged zoom.
        let scroll = vc.fit_to_view(bounds, false).unwrap();
        assert_eq!(vc.zoom(), zoom);
        let center = bounds.center();
        assert!((scroll.x - (center.0 * zoom - 400.0)).abs() < 1e-3);
        assert!(!scroll.smooth);
        assert_eq!(vc.settle(), None);
    }

    #[test]
    fn fit_before_measurement_does_nothing() {
        let mut vc = ViewportController::new(ViewportConfig::default());
        assert_eq!(vc.fit_to_view(Rect::new(0.0, 0.0, 100.0, 100.0), true), None);
        assert_eq!(vc.zoom(), 1.0);
        assert_eq!(vc.settle(), None);
    }

    #[test]
    fn center_on_uses_current_zoom() {
        let mut vc = controller();
        vc.zoom_by(0.5);
        vc.settle();
        let scroll = vc.center_on((2500.0, 2500.0), true);
        assert_eq!(scroll.x, 2500.0 * 0.5 - 400.0);
        assert_eq!(scroll.y, 2500.0 * 0.5 - 300.0);
        assert!(scroll.smooth);
        assert_eq!(vc.scroll(), (scroll.x, scroll.y));
    }

    #[test]
    fn small_pointer_travel_is_a_click() {
        let mut vc = controller();
        vc.set_scroll(100.0, 100.0);
        vc.pointer_down(10.0, 10.0);
        assert_eq!(vc.pointer_move(13.0, 12.0), None);
        assert!(!vc.is_panning());
        assert!(vc.pointer_up());
        assert_eq!(vc.scroll(), (100.0, 100.0));
    }

    #[test]
    fn crossing_the_threshold_pans_from_the_origin() {
        let mut vc = controller();
        vc.set_scroll(100.0, 100.0);
        vc.pointer_down(10.0, 10.0);
        let scroll = vc.pointer_move(30.0, 10.0).unwrap();
        assert!(vc.is_panning());
        // Scroll moves opposite the pointer, anchored at the press.
        assert_eq!(scroll, (80.0, 100.0));
        let scroll = vc.pointer_move(10.0, 40.0).unwrap();
        assert_eq!(scroll, (100.0, 70.0));
        assert!(!vc.pointer_up());
        assert!(!vc.is_panning());
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut vc = controller();
        assert_eq!(vc.pointer_move(500.0, 500.0), None);
        assert!(!vc.is_panning());
    }
}
