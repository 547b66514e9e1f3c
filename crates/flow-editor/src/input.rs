//! Input abstraction layer.
//!
//! Normalizes pointer, wheel, and keyboard events from the embedding UI
//! into a single `InputEvent` enum. Positions are always screen space.

use flow_core::EntityId;
use kurbo::Point;

/// Identifies one pointer (mouse, a finger, a pen) across a gesture.
pub type PointerId = u32;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// The element the UI reports under the pointer at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Background,
    Node(EntityId),
    Port { node: EntityId, port: EntityId },
    Edge(EntityId),
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        pointer: PointerId,
        position: Point,
        modifiers: Modifiers,
        target: PointerTarget,
    },
    PointerMove {
        pointer: PointerId,
        position: Point,
        modifiers: Modifiers,
    },
    PointerUp {
        pointer: PointerId,
        position: Point,
        modifiers: Modifiers,
    },
    /// The pointer left the tracked surface.
    PointerLeave { pointer: PointerId },
    /// Wheel scroll. Negative `delta_y` zooms in.
    Wheel { position: Point, delta_y: f64 },
    Key { key: String, modifiers: Modifiers },
    /// A port asked to start a connection (raised by the port element).
    ConnectStart {
        node: EntityId,
        port: EntityId,
        pointer: PointerId,
        position: Point,
    },
}

impl InputEvent {
    pub fn pointer_down(position: Point, modifiers: Modifiers, target: PointerTarget) -> Self {
        Self::PointerDown {
            pointer: 0,
            position,
            modifiers,
            target,
        }
    }

    pub fn pointer_move(position: Point) -> Self {
        Self::PointerMove {
            pointer: 0,
            position,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(position: Point) -> Self {
        Self::PointerUp {
            pointer: 0,
            position,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn wheel(position: Point, delta_y: f64) -> Self {
        Self::Wheel { position, delta_y }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Screen position, if this event carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { position, .. }
            | Self::PointerMove { position, .. }
            | Self::PointerUp { position, .. }
            | Self::Wheel { position, .. }
            | Self::ConnectStart { position, .. } => Some(*position),
            Self::PointerLeave { .. } | Self::Key { .. } => None,
        }
    }
}
