pub mod geometry;
pub mod id;
pub mod layout;
pub mod model;
pub mod snapshot;
pub mod viewport;

pub use geometry::{EdgeGeometry, svg_path};
pub use id::EntityId;
pub use layout::{LayoutProbe, ModelLayout};
pub use model::*;
pub use snapshot::Snapshot;
pub use viewport::Viewport;

// Re-export kurbo geometry so downstream crates share one version.
pub use kurbo::{CubicBez, Point, Rect, Size, Vec2};
