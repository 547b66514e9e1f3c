//! Selection over the entity store.
//!
//! Selection lives on the entities themselves (`selected` flag); this is
//! a short-lived view that applies the selection rules to a store.

use flow_core::layout::LayoutProbe;
use flow_core::model::{Entity, EntityStore};
use flow_core::{EntityId, Viewport};
use flow_render::hit_test_rect;
use kurbo::Rect;
use std::collections::HashSet;

/// Selection operations on a borrowed store.
pub struct SelectionIndex<'a> {
    store: &'a mut EntityStore,
}

impl<'a> SelectionIndex<'a> {
    pub fn new(store: &'a mut EntityStore) -> Self {
        Self { store }
    }

    /// Ids of every selected entity, in store order.
    pub fn selected(&self) -> Vec<EntityId> {
        self.store.selected_ids()
    }

    pub fn is_selected(&self, id: EntityId) -> bool {
        self.store.get(id).is_some_and(Entity::is_selected)
    }

    /// Deselect everything, then select `id`. An unknown id leaves the
    /// selection empty.
    pub fn select_exclusive(&mut self, id: EntityId) {
        self.clear_all();
        if let Some(entity) = self.store.get_mut(id) {
            entity.set_selected(true);
        }
    }

    /// Flip one entity's selection. Returns the new state.
    pub fn toggle(&mut self, id: EntityId) -> bool {
        match self.store.get_mut(id) {
            Some(entity) => {
                let selected = !entity.is_selected();
                entity.set_selected(selected);
                selected
            }
            None => false,
        }
    }

    /// Select every node whose screen box intersects `rect` (screen space).
    /// Non-additive mode also deselects the nodes outside it. Edges are
    /// never touched.
    pub fn select_rect<P: LayoutProbe + ?Sized>(
        &mut self,
        rect: Rect,
        additive: bool,
        viewport: &Viewport,
        probe: &P,
    ) {
        let hits: HashSet<EntityId> = hit_test_rect(&*self.store, probe, viewport, rect)
            .into_iter()
            .collect();
        for node in self.store.nodes_mut() {
            if hits.contains(&node.id) {
                node.selected = true;
            } else if !additive {
                node.selected = false;
            }
        }
    }

    pub fn clear_all(&mut self) {
        for entity in self.store.iter_mut() {
            entity.set_selected(false);
        }
    }

    /// Select every node and edge.
    pub fn select_all(&mut self) {
        for entity in self.store.iter_mut() {
            if matches!(entity, Entity::Node(_) | Entity::Edge(_)) {
                entity.set_selected(true);
            }
        }
    }

    /// Remove every selected node (with its ports) and every selected
    /// edge. Edges attached to removed nodes are kept.
    pub fn delete_selected(&mut self) -> Vec<Entity> {
        let doomed: Vec<EntityId> = self
            .store
            .iter()
            .filter(|e| e.is_selected() && matches!(e, Entity::Node(_) | Entity::Edge(_)))
            .map(Entity::id)
            .collect();
        if doomed.is_empty() {
            return Vec::new();
        }
        let removed = self.store.remove_many(&doomed);
        log::debug!("deleted {} entities", removed.len());
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::{Edge, ModelLayout, Node, Point, Port, Vec2};
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> EntityId {
        EntityId::intern(s)
    }

    fn store() -> EntityStore {
        let mut store = EntityStore::new();
        store.add_node(Node::new(id("sel-a"), Point::new(0.0, 0.0)));
        store.add_port(Port::new(id("sel-a-out"), id("sel-a"), Vec2::new(145.0, 20.0)));
        store.add_node(Node::new(id("sel-b"), Point::new(300.0, 0.0)));
        store.add_port(Port::new(id("sel-b-in"), id("sel-b"), Vec2::new(-5.0, 20.0)));
        store.add_node(Node::new(id("sel-c"), Point::new(0.0, 300.0)));
        store.add_edge(Edge::new(
            id("sel-e"),
            (id("sel-a"), id("sel-a-out")),
            (id("sel-b"), id("sel-b-in")),
        ));
        store
    }

    #[test]
    fn select_exclusive_leaves_one() {
        let mut store = store();
        let mut sel = SelectionIndex::new(&mut store);
        sel.toggle(id("sel-a"));
        sel.toggle(id("sel-e"));
        sel.select_exclusive(id("sel-b"));
        assert_eq!(sel.selected(), vec![id("sel-b")]);
    }

    #[test]
    fn toggle_twice_restores() {
        let mut store = store();
        let mut sel = SelectionIndex::new(&mut store);
        assert!(sel.toggle(id("sel-c")));
        assert!(!sel.toggle(id("sel-c")));
        assert!(sel.selected().is_empty());
    }

    #[test]
    fn select_rect_ignores_edges() {
        let mut store = store();
        let mut sel = SelectionIndex::new(&mut store);
        sel.toggle(id("sel-e"));
        sel.toggle(id("sel-c"));
        // Covers a and b only.
        let rect = Rect::new(-10.0, -10.0, 500.0, 100.0);
        sel.select_rect(rect, false, &Viewport::default(), &ModelLayout);
        assert_eq!(sel.selected(), vec![id("sel-a"), id("sel-b"), id("sel-e")]);
    }

    #[test]
    fn select_rect_additive_keeps_outside_nodes() {
        let mut store = store();
        let mut sel = SelectionIndex::new(&mut store);
        sel.toggle(id("sel-c"));
        let rect = Rect::new(-10.0, -10.0, 20.0, 20.0);
        sel.select_rect(rect, true, &Viewport::default(), &ModelLayout);
        assert!(sel.is_selected(id("sel-a")));
        assert!(sel.is_selected(id("sel-c")));
        assert!(!sel.is_selected(id("sel-b")));
    }

    #[test]
    fn select_rect_uses_screen_space() {
        let mut store = store();
        let mut sel = SelectionIndex::new(&mut store);
        // At zoom 2, node c spans screen y 600..700.
        let viewport = Viewport::new(Vec2::ZERO, 2.0);
        sel.select_rect(Rect::new(0.0, 550.0, 50.0, 610.0), false, &viewport, &ModelLayout);
        assert_eq!(sel.selected(), vec![id("sel-c")]);
    }

    #[test]
    fn delete_selected_keeps_dangling_edges() {
        let mut store = store();
        {
            let mut sel = SelectionIndex::new(&mut store);
            sel.toggle(id("sel-a"));
            let removed = sel.delete_selected();
            assert_eq!(removed.len(), 2);
        }
        assert!(!store.contains(id("sel-a")));
        assert!(!store.contains(id("sel-a-out")));
        assert!(store.contains(id("sel-e")));
    }

    #[test]
    fn select_all_skips_ports() {
        let mut store = store();
        let mut sel = SelectionIndex::new(&mut store);
        sel.select_all();
        assert_eq!(
            sel.selected(),
            vec![id("sel-a"), id("sel-b"), id("sel-c"), id("sel-e")]
        );
    }
}
