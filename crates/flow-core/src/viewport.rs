//! Pan/zoom transform between screen space and content space.
//!
//! `screen = content * zoom + pan`. Zoom is unclamped; keeping it positive
//! is up to the caller.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// The canvas view transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Content origin's position on screen, in pixels.
    pub pan: Vec2,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(pan: Vec2, zoom: f64) -> Self {
        Self { pan, zoom }
    }

    pub fn screen_to_content(&self, screen: Point) -> Point {
        ((screen - self.pan.to_point()) / self.zoom).to_point()
    }

    pub fn content_to_screen(&self, content: Point) -> Point {
        (content.to_vec2() * self.zoom + self.pan).to_point()
    }

    /// Map a content-space box to screen space.
    pub fn content_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.content_to_screen(rect.origin()),
            self.content_to_screen(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Scale by `factor` around a screen-space anchor. The content point
    /// under the anchor stays under it.
    pub fn apply_zoom(&mut self, anchor: Point, factor: f64) {
        let a = anchor.to_vec2();
        self.pan = a - (a - self.pan) * factor;
        self.zoom *= factor;
    }

    pub fn apply_pan(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    /// Convert a screen-space distance to content units.
    pub fn screen_delta_to_content(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn identity_by_default() {
        let vp = Viewport::default();
        let p = Point::new(12.0, -3.0);
        assert_eq!(vp.screen_to_content(p), p);
        assert_eq!(vp.content_to_screen(p), p);
    }

    #[test]
    fn screen_to_content_formula() {
        let vp = Viewport::new(Vec2::new(20.0, 10.0), 2.0);
        assert!(close(
            vp.screen_to_content(Point::new(120.0, 50.0)),
            Point::new(50.0, 20.0)
        ));
        assert!(close(
            vp.content_to_screen(Point::new(50.0, 20.0)),
            Point::new(120.0, 50.0)
        ));
    }

    #[test]
    fn wheel_zoom_scenario() {
        let mut vp = Viewport::default();
        vp.apply_zoom(Point::new(100.0, 100.0), 1.1);
        assert!((vp.zoom - 1.1).abs() < EPS);
        assert!((vp.pan.x + 10.0).abs() < EPS);
        assert!((vp.pan.y + 10.0).abs() < EPS);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let anchors = [(0.0, 0.0), (100.0, 100.0), (-40.0, 333.0), (812.5, 17.25)];
        let factors = [1.1, 1.0 / 1.1, 0.5, 3.0, 0.01];
        for (ax, ay) in anchors {
            for f in factors {
                let mut vp = Viewport::new(Vec2::new(37.0, -12.0), 1.7);
                let anchor = Point::new(ax, ay);
                let before = vp.screen_to_content(anchor);
                vp.apply_zoom(anchor, f);
                let after = vp.screen_to_content(anchor);
                assert!(
                    (before.x - after.x).abs() < 1e-6 && (before.y - after.y).abs() < 1e-6,
                    "anchor {anchor:?} factor {f}: {before:?} != {after:?}"
                );
            }
        }
    }

    #[test]
    fn pan_adds_delta() {
        let mut vp = Viewport::default();
        vp.apply_pan(Vec2::new(5.0, -7.0));
        vp.apply_pan(Vec2::new(1.0, 1.0));
        assert_eq!(vp.pan, Vec2::new(6.0, -6.0));
    }

    #[test]
    fn content_rect_maps_through_zoom() {
        let vp = Viewport::new(Vec2::new(10.0, 10.0), 2.0);
        let r = vp.content_rect_to_screen(Rect::new(0.0, 0.0, 150.0, 50.0));
        assert_eq!(r, Rect::new(10.0, 10.0, 310.0, 110.0));
    }
}
