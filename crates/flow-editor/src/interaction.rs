//! Interaction state machine.
//!
//! Decides what each input event means. The canvas is in exactly one
//! gesture mode at a time (`InteractionState`); a node drag runs alongside
//! as its own sub-mode. Whichever gesture starts on a pointer holds that
//! pointer until it is released or leaves the surface.
//!
//! Selection and highlight changes are applied to the store directly.
//! Structural changes (a committed edge, a moved node) are returned as
//! `GraphMutation`s for the editor to apply and record.

use crate::input::{InputEvent, Modifiers, PointerId, PointerTarget};
use crate::mutation::GraphMutation;
use crate::selection::SelectionIndex;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use flow_core::layout::LayoutProbe;
use flow_core::model::{Edge, EntityStore};
use flow_core::{EntityId, Viewport};
use flow_render::{HitTarget, hit_test};
use kurbo::{Point, Rect, Vec2};
use std::collections::HashSet;

/// Canvas-level gesture mode.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    Panning {
        pointer: PointerId,
        initial_pan: Vec2,
        initial_pointer: Point,
    },
    /// Marquee selection. `baseline` holds the nodes selected when an
    /// additive marquee opened; it is empty otherwise.
    Selecting {
        pointer: PointerId,
        origin: Point,
        current: Point,
        additive: bool,
        baseline: HashSet<EntityId>,
    },
    /// Connect-drag from a source port. `cursor` is the floating end of
    /// the temporary edge, in screen space.
    Connecting {
        pointer: PointerId,
        source_node: EntityId,
        source_port: EntityId,
        cursor: Point,
        highlighted: Option<EntityId>,
    },
}

/// A node following the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeDrag {
    pub pointer: PointerId,
    pub node: EntityId,
    pub initial_position: Point,
    pub initial_pointer: Point,
    pub moved: bool,
}

/// What one event produced, for the editor to act on.
#[derive(Debug, Default)]
pub struct Response {
    pub mutations: Vec<GraphMutation>,
    pub command: Option<ShortcutAction>,
    /// Something visible changed (selection, highlight, viewport, or the
    /// temporary edge).
    pub redraw: bool,
    /// A node drag that moved something has finished.
    pub drag_finished: bool,
}

impl Response {
    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }
}

pub struct InteractionMachine {
    state: InteractionState,
    drag: Option<NodeDrag>,
    viewport: Viewport,
    zoom_step: f64,
    last_pointer: Option<Point>,
}

impl InteractionMachine {
    pub fn new(zoom_step: f64) -> Self {
        Self {
            state: InteractionState::Idle,
            drag: None,
            viewport: Viewport::default(),
            zoom_step,
            last_pointer: None,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn node_drag(&self) -> Option<&NodeDrag> {
        self.drag.as_ref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Last pointer position seen, in screen space.
    pub fn last_pointer(&self) -> Option<Point> {
        self.last_pointer
    }

    /// The pointer currently captured by a gesture, if any.
    pub fn capture(&self) -> Option<PointerId> {
        match &self.state {
            InteractionState::Panning { pointer, .. }
            | InteractionState::Selecting { pointer, .. }
            | InteractionState::Connecting { pointer, .. } => Some(*pointer),
            InteractionState::Idle => self.drag.map(|d| d.pointer),
        }
    }

    /// Source and floating end of the temporary edge, while connecting.
    pub fn pending_connection(&self) -> Option<((EntityId, EntityId), Point)> {
        match &self.state {
            InteractionState::Connecting {
                source_node,
                source_port,
                cursor,
                ..
            } => Some(((*source_node, *source_port), *cursor)),
            _ => None,
        }
    }

    /// The marquee rectangle in screen space, while selecting.
    pub fn marquee(&self) -> Option<Rect> {
        match &self.state {
            InteractionState::Selecting { origin, current, .. } => {
                Some(Rect::from_points(*origin, *current))
            }
            _ => None,
        }
    }

    /// Handle one input event.
    pub fn handle<P: LayoutProbe + ?Sized>(
        &mut self,
        event: &InputEvent,
        store: &mut EntityStore,
        probe: &P,
    ) -> Response {
        log::trace!("event {event:?} in {:?}", self.state);
        match event {
            InputEvent::PointerDown {
                pointer,
                position,
                modifiers,
                target,
            } => {
                self.last_pointer = Some(*position);
                self.pointer_down(*pointer, *position, *modifiers, *target, store)
            }
            InputEvent::ConnectStart {
                node,
                port,
                pointer,
                position,
            } => {
                self.last_pointer = Some(*position);
                self.begin_connect(*pointer, *node, *port, *position, store)
            }
            InputEvent::PointerMove {
                pointer, position, ..
            } => {
                self.last_pointer = Some(*position);
                self.pointer_move(*pointer, *position, store, probe)
            }
            InputEvent::PointerUp {
                pointer, position, ..
            } => {
                self.last_pointer = Some(*position);
                self.release(*pointer, Some(*position), store, probe)
            }
            InputEvent::PointerLeave { pointer } => self.release(*pointer, None, store, probe),
            InputEvent::Wheel { position, delta_y } => {
                self.last_pointer = Some(*position);
                self.wheel(*position, *delta_y, store)
            }
            InputEvent::Key { key, modifiers } => self.key(key, *modifiers),
        }
    }

    /// Drop any gesture in progress without committing it.
    pub fn reset(&mut self, store: &mut EntityStore) {
        if let InteractionState::Connecting {
            highlighted: Some(node),
            ..
        } = self.state
            && let Some(n) = store.node_mut(node)
        {
            n.highlighted = false;
        }
        self.state = InteractionState::Idle;
        self.drag = None;
    }

    // ─── Pointer down ────────────────────────────────────────────────────

    fn pointer_down(
        &mut self,
        pointer: PointerId,
        position: Point,
        modifiers: Modifiers,
        target: PointerTarget,
        store: &mut EntityStore,
    ) -> Response {
        if let Some(held) = self.capture() {
            log::trace!("pointer {pointer} down ignored, pointer {held} is captured");
            return Response::default();
        }

        match target {
            PointerTarget::Background if modifiers.shift => {
                let additive = modifiers.command();
                let baseline = if additive {
                    store.nodes().filter(|n| n.selected).map(|n| n.id).collect()
                } else {
                    HashSet::new()
                };
                log::trace!("Idle -> Selecting (additive: {additive})");
                self.state = InteractionState::Selecting {
                    pointer,
                    origin: position,
                    current: position,
                    additive,
                    baseline,
                };
                Response::redraw()
            }
            PointerTarget::Background => {
                log::trace!("Idle -> Panning");
                self.state = InteractionState::Panning {
                    pointer,
                    initial_pan: self.viewport.pan,
                    initial_pointer: position,
                };
                Response::default()
            }
            PointerTarget::Port { node, port } => {
                self.begin_connect(pointer, node, port, position, store)
            }
            PointerTarget::Node(id) => {
                let Some(node) = store.node(id) else {
                    return Response::default();
                };
                let initial_position = node.position;
                if !modifiers.shift {
                    for other in store.nodes_mut().filter(|n| n.id != id) {
                        other.selected = false;
                    }
                }
                SelectionIndex::new(store).toggle(id);
                log::trace!("drag start on {id}");
                self.drag = Some(NodeDrag {
                    pointer,
                    node: id,
                    initial_position,
                    initial_pointer: position,
                    moved: false,
                });
                Response::redraw()
            }
            PointerTarget::Edge(id) => {
                let mut selection = SelectionIndex::new(store);
                if modifiers.shift {
                    selection.toggle(id);
                } else {
                    selection.select_exclusive(id);
                }
                Response::redraw()
            }
        }
    }

    fn begin_connect(
        &mut self,
        pointer: PointerId,
        node: EntityId,
        port: EntityId,
        position: Point,
        store: &EntityStore,
    ) -> Response {
        if self.capture().is_some() {
            return Response::default();
        }
        if store.port(port).is_none_or(|p| p.node != node) {
            log::trace!("connect from unknown port {port} on {node} ignored");
            return Response::default();
        }
        log::trace!("Idle -> Connecting from {node}/{port}");
        self.state = InteractionState::Connecting {
            pointer,
            source_node: node,
            source_port: port,
            cursor: position,
            highlighted: None,
        };
        Response::redraw()
    }

    // ─── Pointer move ────────────────────────────────────────────────────

    fn pointer_move<P: LayoutProbe + ?Sized>(
        &mut self,
        pointer: PointerId,
        position: Point,
        store: &mut EntityStore,
        probe: &P,
    ) -> Response {
        let mut response = Response::default();

        if let Some(drag) = self.drag.as_mut()
            && drag.pointer == pointer
        {
            let delta = self
                .viewport
                .screen_delta_to_content(position - drag.initial_pointer);
            drag.moved = true;
            response.mutations.push(GraphMutation::MoveNode {
                id: drag.node,
                position: drag.initial_position + delta,
            });
        }

        let viewport = self.viewport;
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::Panning {
                pointer: held,
                initial_pan,
                initial_pointer,
            } if *held == pointer => {
                self.viewport
                    .set_pan(*initial_pan + (position - *initial_pointer));
                response.redraw = true;
            }
            InteractionState::Selecting {
                pointer: held,
                origin,
                current,
                additive,
                baseline,
            } if *held == pointer => {
                *current = position;
                let rect = Rect::from_points(*origin, position);
                if *additive {
                    for node in store.nodes_mut() {
                        node.selected = baseline.contains(&node.id);
                    }
                }
                SelectionIndex::new(store).select_rect(rect, *additive, &viewport, probe);
                response.redraw = true;
            }
            InteractionState::Connecting {
                pointer: held,
                source_node,
                cursor,
                highlighted,
                ..
            } if *held == pointer => {
                *cursor = position;
                let source = *source_node;
                let candidate = hit_test(store, probe, viewport.screen_to_content(position))
                    .map(|hit| hit.node())
                    .filter(|node| *node != source);
                if candidate != *highlighted {
                    if let Some(old) = (*highlighted).and_then(|id| store.node_mut(id)) {
                        old.highlighted = false;
                    }
                    if let Some(new) = candidate.and_then(|id| store.node_mut(id)) {
                        new.highlighted = true;
                    }
                    *highlighted = candidate;
                }
                response.redraw = true;
            }
            _ => {}
        }
        response
    }

    // ─── Release ─────────────────────────────────────────────────────────

    /// Pointer up (`position` set) or leave (`None`). Both end every
    /// gesture on `pointer`; only an up over a port can commit an edge.
    fn release<P: LayoutProbe + ?Sized>(
        &mut self,
        pointer: PointerId,
        position: Option<Point>,
        store: &mut EntityStore,
        probe: &P,
    ) -> Response {
        let mut response = Response::default();

        if let Some(drag) = self.drag
            && drag.pointer == pointer
        {
            log::trace!("drag end on {}", drag.node);
            self.drag = None;
            response.drag_finished = drag.moved;
        }

        if self.capture_of_state() != Some(pointer) {
            return response;
        }
        let state = std::mem::replace(&mut self.state, InteractionState::Idle);
        response.redraw = true;
        match state {
            InteractionState::Connecting {
                source_node,
                source_port,
                highlighted,
                ..
            } => {
                if let Some(n) = highlighted.and_then(|id| store.node_mut(id)) {
                    n.highlighted = false;
                }
                let target = match position {
                    Some(p) => hit_test(store, probe, self.viewport.screen_to_content(p)),
                    None => None,
                };
                match target {
                    Some(HitTarget::Port { node, port }) if node != source_node => {
                        let id = EntityId::fresh("edge", |candidate| store.contains(candidate));
                        log::debug!("connect {source_node}/{source_port} -> {node}/{port} as {id}");
                        response.mutations.push(GraphMutation::add_edge(Edge::new(
                            id,
                            (source_node, source_port),
                            (node, port),
                        )));
                    }
                    _ => log::trace!("connection from {source_node} dropped"),
                }
            }
            other => log::trace!("{other:?} -> Idle"),
        }
        response
    }

    fn capture_of_state(&self) -> Option<PointerId> {
        match &self.state {
            InteractionState::Idle => None,
            _ => self.capture(),
        }
    }

    // ─── Wheel and keys ──────────────────────────────────────────────────

    fn wheel(&mut self, position: Point, delta_y: f64, store: &EntityStore) -> Response {
        let factor = if delta_y < 0.0 {
            self.zoom_step
        } else if delta_y > 0.0 {
            1.0 / self.zoom_step
        } else {
            return Response::default();
        };
        self.viewport.apply_zoom(position, factor);
        log::trace!("zoom x{factor} at {position:?} -> {:?}", self.viewport);

        // Gestures in flight continue from the new transform.
        if let InteractionState::Panning {
            initial_pan,
            initial_pointer,
            ..
        } = &mut self.state
        {
            *initial_pan = self.viewport.pan;
            *initial_pointer = position;
        }
        if let Some(drag) = self.drag.as_mut()
            && let Some(node) = store.node(drag.node)
        {
            drag.initial_position = node.position;
            drag.initial_pointer = position;
        }
        Response::redraw()
    }

    fn key(&mut self, key: &str, modifiers: Modifiers) -> Response {
        if !matches!(self.state, InteractionState::Idle) || self.drag.is_some() {
            log::trace!("key {key:?} ignored during {:?}", self.state);
            return Response::default();
        }
        Response {
            command: ShortcutMap::resolve(key, modifiers),
            ..Response::default()
        }
    }
}
