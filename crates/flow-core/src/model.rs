//! Entity data model for node-graph documents.
//!
//! A document is an ordered collection of three entity kinds: nodes
//! (positioned boxes with a label), ports (anchors owned by exactly one
//! node), and edges (connections from one node's port to another's).
//! Entities are keyed by `EntityId` in an `EntityStore` that keeps
//! insertion order, which doubles as paint order (last = topmost).
//!
//! Edges reference nodes and ports by id only. Removing a node does not
//! touch edges that point at it. A dangling edge is a legal state and the
//! geometry resolver skips it.

use crate::id::EntityId;
use kurbo::{CubicBez, Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Default node box size in content units.
pub const DEFAULT_NODE_SIZE: Size = Size::new(150.0, 50.0);

/// Default port box size in content units.
pub const DEFAULT_PORT_SIZE: Size = Size::new(10.0, 10.0);

/// Label given to nodes created without one.
pub const DEFAULT_NODE_LABEL: &str = "Node";

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A positioned box in content space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: EntityId,
    /// Top-left corner in content space.
    pub position: Point,
    pub size: Size,
    pub label: String,
    /// Owned ports, in display order.
    pub ports: SmallVec<[EntityId; 4]>,
    #[serde(skip)]
    pub selected: bool,
    /// Candidate-target highlight shown while a connection is dragged.
    #[serde(skip)]
    pub highlighted: bool,
}

impl Node {
    pub fn new(id: EntityId, position: Point) -> Self {
        Self {
            id,
            position,
            size: DEFAULT_NODE_SIZE,
            label: DEFAULT_NODE_LABEL.to_string(),
            ports: SmallVec::new(),
            selected: false,
            highlighted: false,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

// ─── Ports ───────────────────────────────────────────────────────────────

/// A connection anchor owned by a single node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: EntityId,
    /// Owning node.
    pub node: EntityId,
    /// Offset of the port's top-left corner from the node's top-left corner.
    pub offset: Vec2,
    pub size: Size,
    pub label: Option<String>,
    #[serde(skip)]
    pub selected: bool,
}

impl Port {
    pub fn new(id: EntityId, node: EntityId, offset: Vec2) -> Self {
        Self {
            id,
            node,
            offset,
            size: DEFAULT_PORT_SIZE,
            label: None,
            selected: false,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

/// A persistent connection from a source port to a target port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EntityId,
    pub source_node: EntityId,
    pub source_port: EntityId,
    pub target_node: EntityId,
    pub target_port: EntityId,
    /// Last resolved curve. Kept as-is while an endpoint cannot be resolved.
    #[serde(skip)]
    pub curve: Option<CubicBez>,
    #[serde(skip)]
    pub selected: bool,
}

impl Edge {
    pub fn new(
        id: EntityId,
        (source_node, source_port): (EntityId, EntityId),
        (target_node, target_port): (EntityId, EntityId),
    ) -> Self {
        Self {
            id,
            source_node,
            source_port,
            target_node,
            target_port,
            curve: None,
            selected: false,
        }
    }

    /// True when both ends sit on the same node. Such edges are never committed.
    pub fn is_self_loop(&self) -> bool {
        self.source_node == self.target_node
    }

    /// True if either endpoint refers to `node`.
    pub fn touches(&self, node: EntityId) -> bool {
        self.source_node == node || self.target_node == node
    }
}

// ─── Entities ────────────────────────────────────────────────────────────

/// Any record held by the entity store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Node(Node),
    Port(Port),
    Edge(Edge),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Node(n) => n.id,
            Entity::Port(p) => p.id,
            Entity::Edge(e) => e.id,
        }
    }

    pub fn is_selected(&self) -> bool {
        match self {
            Entity::Node(n) => n.selected,
            Entity::Port(p) => p.selected,
            Entity::Edge(e) => e.selected,
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        match self {
            Entity::Node(n) => n.selected = selected,
            Entity::Port(p) => p.selected = selected,
            Entity::Edge(e) => e.selected = selected,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Entity::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_port(&self) -> Option<&Port> {
        match self {
            Entity::Port(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Entity::Edge(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Node> for Entity {
    fn from(node: Node) -> Self {
        Entity::Node(node)
    }
}

impl From<Port> for Entity {
    fn from(port: Port) -> Self {
        Entity::Port(port)
    }
}

impl From<Edge> for Entity {
    fn from(edge: Edge) -> Self {
        Entity::Edge(edge)
    }
}

// ─── Entity Store ────────────────────────────────────────────────────────

/// Ordered, id-indexed collection of entities.
///
/// Ids are assumed unique. Inserting an entity whose id already exists
/// replaces the previous record in place.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    /// Index from EntityId → position in `entities`.
    index: HashMap<EntityId, usize>,
}

impl EntityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from entities in order.
    pub fn from_entities(entities: Vec<Entity>) -> Self {
        let mut store = Self {
            entities,
            index: HashMap::new(),
        };
        store.rebuild_index();
        store
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index.get(&id).copied().map(|i| &mut self.entities[i])
    }

    pub fn node(&self, id: EntityId) -> Option<&Node> {
        self.get(id).and_then(Entity::as_node)
    }

    pub fn node_mut(&mut self, id: EntityId) -> Option<&mut Node> {
        match self.get_mut(id) {
            Some(Entity::Node(n)) => Some(n),
            _ => None,
        }
    }

    pub fn port(&self, id: EntityId) -> Option<&Port> {
        self.get(id).and_then(Entity::as_port)
    }

    pub fn port_mut(&mut self, id: EntityId) -> Option<&mut Port> {
        match self.get_mut(id) {
            Some(Entity::Port(p)) => Some(p),
            _ => None,
        }
    }

    pub fn edge(&self, id: EntityId) -> Option<&Edge> {
        self.get(id).and_then(Entity::as_edge)
    }

    pub fn edge_mut(&mut self, id: EntityId) -> Option<&mut Edge> {
        match self.get_mut(id) {
            Some(Entity::Edge(e)) => Some(e),
            _ => None,
        }
    }

    /// Nodes in paint order (first = bottom).
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.entities.iter().filter_map(Entity::as_node)
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.entities.iter_mut().filter_map(|e| match e {
            Entity::Node(n) => Some(n),
            _ => None,
        })
    }

    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.entities.iter().filter_map(Entity::as_port)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.entities.iter().filter_map(Entity::as_edge)
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.entities.iter_mut().filter_map(|e| match e {
            Entity::Edge(edge) => Some(edge),
            _ => None,
        })
    }

    /// Ports owned by `node`, in the node's port order.
    pub fn ports_of(&self, node: EntityId) -> Vec<&Port> {
        self.node(node)
            .map(|n| n.ports.iter().filter_map(|p| self.port(*p)).collect())
            .unwrap_or_default()
    }

    /// Ids of all selected entities, in store order.
    pub fn selected_ids(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.is_selected())
            .map(Entity::id)
            .collect()
    }

    /// Insert (or replace) an entity. Ports are linked into their owner's
    /// port list when the owner is present.
    pub fn insert(&mut self, entity: Entity) {
        if let Entity::Port(port) = &entity {
            let (port_id, owner) = (port.id, port.node);
            if let Some(node) = self.node_mut(owner)
                && !node.ports.contains(&port_id)
            {
                node.ports.push(port_id);
            }
        }
        let id = entity.id();
        match self.index.get(&id) {
            Some(&i) => self.entities[i] = entity,
            None => {
                self.index.insert(id, self.entities.len());
                self.entities.push(entity);
            }
        }
    }

    pub fn add_node(&mut self, node: Node) {
        self.insert(Entity::Node(node));
    }

    /// Attach a port to its owning node (appended to the node's port list).
    pub fn add_port(&mut self, port: Port) {
        self.insert(Entity::Port(port));
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.insert(Entity::Edge(edge));
    }

    /// Remove one entity. Removing a node also removes the ports it owns;
    /// edges referencing it are left in place.
    pub fn remove(&mut self, id: EntityId) -> Vec<Entity> {
        self.remove_many(&[id])
    }

    /// Remove several entities in one pass, returning what was removed in
    /// store order.
    pub fn remove_many(&mut self, ids: &[EntityId]) -> Vec<Entity> {
        let mut doomed: HashSet<EntityId> = ids.iter().copied().collect();
        for id in ids {
            if let Some(node) = self.node(*id) {
                doomed.extend(node.ports.iter().copied());
            }
        }
        // Orphan ports of a removed node are owned by it even if the node's
        // list is stale.
        for port in self.ports() {
            if doomed.contains(&port.node) {
                doomed.insert(port.id);
            }
        }
        if !doomed.iter().any(|id| self.contains(*id)) {
            return Vec::new();
        }

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entities.len());
        for entity in self.entities.drain(..) {
            if doomed.contains(&entity.id()) {
                removed.push(entity);
            } else {
                kept.push(entity);
            }
        }
        self.entities = kept;
        for node in self.nodes_mut() {
            node.ports.retain(|p| !doomed.contains(p));
        }
        self.rebuild_index();
        removed
    }

    /// Rebuild the id → position index from scratch.
    pub fn rebuild_index(&mut self) {
        self.index = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id(), i))
            .collect();
    }
}
