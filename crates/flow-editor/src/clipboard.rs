//! Copy, cut, and paste of graph fragments.
//!
//! The buffer holds owned copies of entities, so later edits to the
//! originals do not affect what gets pasted. Editors on one thread share a
//! buffer by default (`Clipboard::shared`), which lets a fragment copied in
//! one editor be pasted into another. The handle is `!Send` on purpose:
//! the buffer is confined to the thread that created it.

use crate::selection::SelectionIndex;
use flow_core::id::EntityId;
use flow_core::model::{Entity, EntityStore};
use kurbo::{Point, Vec2};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Copied entities: nodes (each followed by its ports), then edges.
#[derive(Debug, Clone, Default)]
pub struct ClipboardBuffer {
    entities: Vec<Entity>,
}

impl ClipboardBuffer {
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

thread_local! {
    static SHARED: Clipboard = Clipboard::new();
}

/// Handle to a clipboard buffer. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    buffer: Rc<RefCell<ClipboardBuffer>>,
}

impl Clipboard {
    /// A private buffer not shared with other editors.
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer shared by every editor on this thread.
    pub fn shared() -> Self {
        SHARED.with(Clone::clone)
    }

    pub fn len(&self) -> usize {
        self.buffer.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().is_empty()
    }

    /// A copy of the current buffer contents.
    pub fn contents(&self) -> ClipboardBuffer {
        self.buffer.borrow().clone()
    }

    /// Replace the buffer with the selected nodes (plus their ports) and
    /// selected edges. Returns how many entities were copied. An empty
    /// selection empties the buffer.
    pub fn copy(&self, store: &EntityStore) -> usize {
        let mut entities = Vec::new();
        for node in store.nodes().filter(|n| n.selected) {
            let mut node = node.clone();
            node.selected = false;
            node.highlighted = false;
            let ports: Vec<Entity> = store
                .ports_of(node.id)
                .into_iter()
                .map(|p| {
                    let mut port = p.clone();
                    port.selected = false;
                    Entity::Port(port)
                })
                .collect();
            entities.push(Entity::Node(node));
            entities.extend(ports);
        }
        for edge in store.edges().filter(|e| e.selected) {
            let mut edge = edge.clone();
            edge.selected = false;
            edge.curve = None;
            entities.push(Entity::Edge(edge));
        }

        let count = entities.len();
        self.buffer.borrow_mut().entities = entities;
        log::debug!("copied {count} entities");
        count
    }

    /// Copy the selection, then delete it from `store`.
    pub fn cut(&self, store: &mut EntityStore) -> usize {
        let count = self.copy(store);
        SelectionIndex::new(store).delete_selected();
        count
    }

    /// Insert the buffer into `store` with fresh ids, laid out so the
    /// group's top-left corner lands on `target` (content space). The
    /// previous selection is cleared and the pasted nodes and edges become
    /// the selection. Returns the new ids.
    ///
    /// Edge endpoints whose nodes were copied along with the edge follow
    /// the new copies; other endpoints keep their original references.
    pub fn paste(&self, store: &mut EntityStore, target: Point) -> Vec<EntityId> {
        let buffer = self.buffer.borrow();
        if buffer.is_empty() {
            return Vec::new();
        }

        let origin = buffer
            .entities
            .iter()
            .filter_map(Entity::as_node)
            .map(|n| n.position)
            .reduce(|a, b| Point::new(a.x.min(b.x), a.y.min(b.y)));
        let shift = origin.map(|o| target - o).unwrap_or(Vec2::ZERO);

        let mut remap: HashMap<EntityId, EntityId> = HashMap::new();
        let mut issued: HashSet<EntityId> = HashSet::new();
        for entity in &buffer.entities {
            let prefix = match entity {
                Entity::Node(_) => "node",
                Entity::Port(_) => "port",
                Entity::Edge(_) => "edge",
            };
            let new = EntityId::fresh(prefix, |candidate| {
                store.contains(candidate) || issued.contains(&candidate)
            });
            issued.insert(new);
            remap.insert(entity.id(), new);
        }
        let mapped = |id: EntityId| remap.get(&id).copied().unwrap_or(id);

        SelectionIndex::new(store).clear_all();

        let mut pasted = Vec::with_capacity(buffer.len());
        for entity in &buffer.entities {
            let mut entity = entity.clone();
            match &mut entity {
                Entity::Node(node) => {
                    node.id = mapped(node.id);
                    node.position += shift;
                    for port in node.ports.iter_mut() {
                        *port = mapped(*port);
                    }
                }
                Entity::Port(port) => {
                    port.id = mapped(port.id);
                    port.node = mapped(port.node);
                }
                Entity::Edge(edge) => {
                    edge.id = mapped(edge.id);
                    edge.source_node = mapped(edge.source_node);
                    edge.source_port = mapped(edge.source_port);
                    edge.target_node = mapped(edge.target_node);
                    edge.target_port = mapped(edge.target_port);
                }
            }
            // Ports are never selectable on their own.
            if !matches!(entity, Entity::Port(_)) {
                entity.set_selected(true);
            }
            pasted.push(entity.id());
            store.insert(entity);
        }

        log::debug!("pasted {} entities at {target:?}", pasted.len());
        pasted
    }
}
