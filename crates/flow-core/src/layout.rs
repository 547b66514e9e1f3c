//! Layout queries: where entities sit in content space.
//!
//! The engine never measures anything itself. It asks a `LayoutProbe` for
//! node boxes and port boxes, so an embedder can answer from whatever
//! actually got rendered (text-fitted node sizes, CSS-placed ports, ...).
//! `ModelLayout` answers straight from the model fields and is what the
//! editor uses unless told otherwise.

use crate::id::EntityId;
use crate::model::EntityStore;
use kurbo::{Point, Rect};

/// Source of current content-space layout for entities.
pub trait LayoutProbe {
    /// Bounding box of a node, or `None` if it does not exist.
    fn node_box(&self, store: &EntityStore, node: EntityId) -> Option<Rect>;

    /// Bounding box of `port` on `node`. `None` if either is missing or the
    /// port belongs to some other node.
    fn port_box(&self, store: &EntityStore, node: EntityId, port: EntityId) -> Option<Rect>;

    /// The point an edge attaches to: the center of the port box.
    fn anchor(&self, store: &EntityStore, node: EntityId, port: EntityId) -> Option<Point> {
        self.port_box(store, node, port).map(|r| r.center())
    }
}

/// Layout taken directly from node positions/sizes and port offsets/sizes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelLayout;

impl LayoutProbe for ModelLayout {
    fn node_box(&self, store: &EntityStore, node: EntityId) -> Option<Rect> {
        store
            .node(node)
            .map(|n| Rect::from_origin_size(n.position, n.size))
    }

    fn port_box(&self, store: &EntityStore, node: EntityId, port: EntityId) -> Option<Rect> {
        let n = store.node(node)?;
        let p = store.port(port)?;
        if p.node != node {
            return None;
        }
        Some(Rect::from_origin_size(n.position + p.offset, p.size))
    }
}

/// Inclusive point-in-box test (edges count as inside).
pub fn box_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Half-open AABB overlap: boxes that only touch along an edge do not
/// intersect.
pub fn boxes_intersect(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}
