//! Hit testing: point → entity lookup.
//!
//! Walks nodes in reverse store order (last painted = topmost). A node's
//! ports are tested before its body because ports usually straddle the
//! node border.

use flow_core::layout::{LayoutProbe, box_contains, boxes_intersect};
use flow_core::{EntityId, EntityStore, Viewport};
use kurbo::{Point, Rect};

/// What a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Node(EntityId),
    Port { node: EntityId, port: EntityId },
}

impl HitTarget {
    /// The node hit, directly or through one of its ports.
    pub fn node(&self) -> EntityId {
        match *self {
            HitTarget::Node(node) | HitTarget::Port { node, .. } => node,
        }
    }
}

/// Find the topmost port or node at a content-space point.
/// Returns `None` for background.
pub fn hit_test<P: LayoutProbe + ?Sized>(
    store: &EntityStore,
    probe: &P,
    point: Point,
) -> Option<HitTarget> {
    for node in store.nodes().rev() {
        for port in node.ports.iter().rev() {
            if let Some(b) = probe.port_box(store, node.id, *port)
                && box_contains(b, point)
            {
                return Some(HitTarget::Port {
                    node: node.id,
                    port: *port,
                });
            }
        }
        if let Some(b) = probe.node_box(store, node.id)
            && box_contains(b, point)
        {
            return Some(HitTarget::Node(node.id));
        }
    }
    None
}

/// Ids of all nodes whose screen-space box intersects `rect` (screen
/// space). Used for marquee selection.
pub fn hit_test_rect<P: LayoutProbe + ?Sized>(
    store: &EntityStore,
    probe: &P,
    viewport: &Viewport,
    rect: Rect,
) -> Vec<EntityId> {
    store
        .nodes()
        .filter(|node| {
            probe
                .node_box(store, node.id)
                .map(|b| boxes_intersect(rect, viewport.content_rect_to_screen(b)))
                .unwrap_or(false)
        })
        .map(|node| node.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::{ModelLayout, Node, Port, Vec2};
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> EntityId {
        EntityId::intern(s)
    }

    fn store() -> EntityStore {
        let mut store = EntityStore::new();
        store.add_node(Node::new(id("hit-a"), Point::new(0.0, 0.0)));
        store.add_port(Port::new(id("hit-a-out"), id("hit-a"), Vec2::new(145.0, 20.0)));
        store.add_node(Node::new(id("hit-b"), Point::new(100.0, 0.0)));
        store.add_node(Node::new(id("hit-c"), Point::new(400.0, 400.0)));
        store
    }

    #[test]
    fn topmost_node_wins() {
        let s = store();
        // (120, 10) is inside both a and b; b was added later.
        assert_eq!(
            hit_test(&s, &ModelLayout, Point::new(120.0, 10.0)),
            Some(HitTarget::Node(id("hit-b")))
        );
        assert_eq!(
            hit_test(&s, &ModelLayout, Point::new(10.0, 10.0)),
            Some(HitTarget::Node(id("hit-a")))
        );
    }

    #[test]
    fn port_hit_reports_owner() {
        let mut s = EntityStore::new();
        s.add_node(Node::new(id("hit-p"), Point::new(0.0, 0.0)));
        s.add_port(Port::new(id("hit-p-out"), id("hit-p"), Vec2::new(145.0, 20.0)));
        let hit = hit_test(&s, &ModelLayout, Point::new(150.0, 25.0)).unwrap();
        assert_eq!(
            hit,
            HitTarget::Port {
                node: id("hit-p"),
                port: id("hit-p-out")
            }
        );
        assert_eq!(hit.node(), id("hit-p"));
    }

    #[test]
    fn background_misses() {
        assert_eq!(hit_test(&store(), &ModelLayout, Point::new(350.0, 300.0)), None);
    }

    #[test]
    fn rect_uses_screen_space() {
        let s = store();
        let vp = Viewport::new(Vec2::new(0.0, 0.0), 0.5);
        // c sits at screen (200, 200)..(275, 225) at half zoom.
        let hits = hit_test_rect(&s, &ModelLayout, &vp, Rect::new(190.0, 190.0, 210.0, 210.0));
        assert_eq!(hits, vec![id("hit-c")]);
        let none = hit_test_rect(&s, &ModelLayout, &vp, Rect::new(390.0, 390.0, 410.0, 410.0));
        assert!(none.is_empty());
    }
}
