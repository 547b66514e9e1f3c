//! Render instructions handed to whatever draws the canvas.
//!
//! The engine does not draw. Once per frame it describes what should be on
//! screen: the view transform for the content layer, one curve per edge,
//! the in-progress connection and marquee if any, and per-entity flags.

use flow_core::{CubicBez, EntityId, EntityStore, Viewport, svg_path};
use kurbo::Rect;

/// One edge's curve in content space.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeInstruction {
    pub id: EntityId,
    pub curve: CubicBez,
    /// The same curve as SVG path data.
    pub path: String,
}

/// Selection and highlight state of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityFlags {
    pub id: EntityId,
    pub selected: bool,
    pub highlighted: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    /// Edges that have a resolved curve. Edges never resolved are omitted.
    pub edges: Vec<EdgeInstruction>,
    /// The connection being dragged, if any.
    pub pending_edge: Option<CubicBez>,
    /// Marquee rectangle in screen space, if one is open.
    pub marquee: Option<Rect>,
    pub flags: Vec<EntityFlags>,
}

impl RenderFrame {
    /// Describe the current store contents.
    pub fn build(
        store: &EntityStore,
        viewport: Viewport,
        pending_edge: Option<CubicBez>,
        marquee: Option<Rect>,
    ) -> Self {
        let edges = store
            .edges()
            .filter_map(|e| {
                e.curve.map(|curve| EdgeInstruction {
                    id: e.id,
                    curve,
                    path: svg_path(&curve),
                })
            })
            .collect();

        let flags = store
            .iter()
            .map(|entity| EntityFlags {
                id: entity.id(),
                selected: entity.is_selected(),
                highlighted: entity.as_node().is_some_and(|n| n.highlighted),
            })
            .collect();

        Self {
            viewport,
            edges,
            pending_edge,
            marquee,
            flags,
        }
    }

    pub fn flags_of(&self, id: EntityId) -> Option<EntityFlags> {
        self.flags.iter().find(|f| f.id == id).copied()
    }
}

/// Receives frames. Implemented by the embedding UI layer.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::{Edge, EdgeGeometry, ModelLayout, Node, Point, Port, Vec2};

    fn id(s: &str) -> EntityId {
        EntityId::intern(s)
    }

    #[test]
    fn frame_lists_resolved_edges_and_flags() {
        let mut store = EntityStore::new();
        store.add_node(Node::new(id("frame-a"), Point::new(0.0, 0.0)));
        store.add_port(Port::new(id("frame-a-out"), id("frame-a"), Vec2::new(145.0, 20.0)));
        store.add_node(Node::new(id("frame-b"), Point::new(300.0, 0.0)));
        store.add_port(Port::new(id("frame-b-in"), id("frame-b"), Vec2::new(-5.0, 20.0)));
        store.add_edge(Edge::new(
            id("frame-e"),
            (id("frame-a"), id("frame-a-out")),
            (id("frame-b"), id("frame-b-in")),
        ));
        store.add_edge(Edge::new(
            id("frame-dangling"),
            (id("frame-a"), id("frame-a-out")),
            (id("frame-gone"), id("frame-gone-in")),
        ));
        EdgeGeometry::default().resolve_all(&mut store, &ModelLayout);
        store.node_mut(id("frame-b")).unwrap().highlighted = true;
        store.edge_mut(id("frame-e")).unwrap().selected = true;

        let frame = RenderFrame::build(&store, Viewport::default(), None, None);
        assert_eq!(frame.edges.len(), 1);
        assert_eq!(frame.edges[0].id, id("frame-e"));
        assert!(frame.edges[0].path.starts_with('M'));
        assert!(frame.flags_of(id("frame-b")).unwrap().highlighted);
        assert!(frame.flags_of(id("frame-e")).unwrap().selected);
        assert!(!frame.flags_of(id("frame-a")).unwrap().selected);
    }

    struct Recorder(Vec<usize>);

    impl Renderer for Recorder {
        fn render(&mut self, frame: &RenderFrame) {
            self.0.push(frame.edges.len());
        }
    }

    #[test]
    fn renderer_receives_frame() {
        let frame = RenderFrame::build(&EntityStore::new(), Viewport::default(), None, None);
        let mut r = Recorder(Vec::new());
        r.render(&frame);
        assert_eq!(r.0, vec![0]);
    }
}
