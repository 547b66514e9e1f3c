//! Structural graph edits.
//!
//! Everything that changes graph content outside of selection goes through
//! a `GraphMutation`: gestures emit them, and embedders use them to build
//! graphs programmatically.

use flow_core::id::EntityId;
use flow_core::model::*;
use kurbo::{Point, Size};

/// A single edit to the entity store.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphMutation {
    AddNode {
        node: Box<Node>,
    },
    /// Attach a port to an existing node.
    AddPort {
        port: Box<Port>,
    },
    /// Add an edge. Edges from a node to itself are rejected.
    AddEdge {
        edge: Box<Edge>,
    },
    /// Remove any entity. Removing a node also removes its ports; edges
    /// that referenced it stay and become dangling.
    RemoveEntity {
        id: EntityId,
    },
    MoveNode {
        id: EntityId,
        position: Point,
    },
    ResizeNode {
        id: EntityId,
        size: Size,
    },
    /// Set a node's label or a port's hover label.
    SetLabel {
        id: EntityId,
        label: String,
    },
}

impl GraphMutation {
    pub fn add_node(node: Node) -> Self {
        Self::AddNode {
            node: Box::new(node),
        }
    }

    pub fn add_port(port: Port) -> Self {
        Self::AddPort {
            port: Box::new(port),
        }
    }

    pub fn add_edge(edge: Edge) -> Self {
        Self::AddEdge {
            edge: Box::new(edge),
        }
    }

    /// Apply to `store`. Returns `false` when the mutation was rejected or
    /// had nothing to act on.
    pub fn apply(self, store: &mut EntityStore) -> bool {
        match self {
            GraphMutation::AddNode { node } => {
                store.add_node(*node);
                true
            }
            GraphMutation::AddPort { port } => {
                if store.node(port.node).is_none() {
                    log::debug!("port {} rejected: no node {}", port.id, port.node);
                    return false;
                }
                store.add_port(*port);
                true
            }
            GraphMutation::AddEdge { edge } => {
                if edge.is_self_loop() {
                    log::debug!("edge {} rejected: self-loop on {}", edge.id, edge.source_node);
                    return false;
                }
                store.add_edge(*edge);
                true
            }
            GraphMutation::RemoveEntity { id } => !store.remove(id).is_empty(),
            GraphMutation::MoveNode { id, position } => match store.node_mut(id) {
                Some(node) if node.position != position => {
                    node.position = position;
                    true
                }
                _ => false,
            },
            GraphMutation::ResizeNode { id, size } => match store.node_mut(id) {
                Some(node) => {
                    node.size = size;
                    true
                }
                None => false,
            },
            GraphMutation::SetLabel { id, label } => {
                if let Some(node) = store.node_mut(id) {
                    node.label = label;
                    true
                } else if let Some(port) = store.port_mut(id) {
                    port.label = Some(label);
                    true
                } else {
                    false
                }
            }
        }
    }
}
