//! Edge curve resolution.
//!
//! Each edge is drawn as a cubic Bézier leaving its source anchor
//! horizontally to the right and entering its target anchor horizontally
//! from the left. Anchors come from the `LayoutProbe` in content space, so
//! curves do not change with pan or zoom.

use crate::id::EntityId;
use crate::layout::LayoutProbe;
use crate::model::{Edge, EntityStore};
use crate::viewport::Viewport;
use kurbo::{BezPath, CubicBez, Point, Vec2};

/// Horizontal control-point distance from each anchor.
pub const DEFAULT_TANGENT: f64 = 100.0;

/// Computes connector curves from node/port layout.
#[derive(Debug, Clone, Copy)]
pub struct EdgeGeometry {
    pub tangent: f64,
}

impl Default for EdgeGeometry {
    fn default() -> Self {
        Self {
            tangent: DEFAULT_TANGENT,
        }
    }
}

impl EdgeGeometry {
    pub fn new(tangent: f64) -> Self {
        Self { tangent }
    }

    /// Curve between two content-space anchors.
    pub fn curve_between(&self, start: Point, end: Point) -> CubicBez {
        let t = Vec2::new(self.tangent, 0.0);
        CubicBez::new(start, start + t, end - t, end)
    }

    /// Curve for a persistent edge, or `None` if any endpoint is missing.
    pub fn resolve_edge<P: LayoutProbe + ?Sized>(
        &self,
        store: &EntityStore,
        probe: &P,
        edge: &Edge,
    ) -> Option<CubicBez> {
        let start = probe.anchor(store, edge.source_node, edge.source_port)?;
        let end = probe.anchor(store, edge.target_node, edge.target_port)?;
        Some(self.curve_between(start, end))
    }

    /// Curve for an in-progress connection whose target follows the pointer.
    pub fn resolve_pending<P: LayoutProbe + ?Sized>(
        &self,
        store: &EntityStore,
        probe: &P,
        source: (EntityId, EntityId),
        pointer: Point,
        viewport: &Viewport,
    ) -> Option<CubicBez> {
        let start = probe.anchor(store, source.0, source.1)?;
        Some(self.curve_between(start, viewport.screen_to_content(pointer)))
    }

    /// Recompute every edge's curve in place. Edges with an unresolvable
    /// endpoint keep whatever curve they had. Returns how many were updated.
    pub fn resolve_all<P: LayoutProbe + ?Sized>(&self, store: &mut EntityStore, probe: &P) -> usize {
        let resolved: Vec<(EntityId, CubicBez)> = store
            .edges()
            .filter_map(|edge| {
                let curve = self.resolve_edge(store, probe, edge);
                if curve.is_none() {
                    log::trace!("edge {} has a dangling endpoint, keeping last curve", edge.id);
                }
                curve.map(|c| (edge.id, c))
            })
            .collect();

        let count = resolved.len();
        for (id, curve) in resolved {
            if let Some(edge) = store.edge_mut(id) {
                edge.curve = Some(curve);
            }
        }
        count
    }
}

/// SVG path data for a curve: `M x1,y1 C c1x,c1y c2x,c2y x2,y2`.
pub fn svg_path(curve: &CubicBez) -> String {
    let mut path = BezPath::new();
    path.move_to(curve.p0);
    path.curve_to(curve.p1, curve.p2, curve.p3);
    path.to_svg()
}
