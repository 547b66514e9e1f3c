//! Editor configuration.

use flow_core::geometry::DEFAULT_TANGENT;
use flow_core::model::{DEFAULT_NODE_LABEL, DEFAULT_NODE_SIZE, DEFAULT_PORT_SIZE};
use kurbo::Size;

/// Wheel zoom factor per notch (zooming out divides by it).
pub const DEFAULT_ZOOM_STEP: f64 = 1.1;

/// Tunables for a `FlowEditor`.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Size given to nodes created through the editor.
    pub node_size: Size,
    pub port_size: Size,
    pub node_label: String,
    /// Horizontal control-point distance for edge curves.
    pub curve_tangent: f64,
    pub zoom_step: f64,
    /// Maximum number of history entries kept. `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            node_size: DEFAULT_NODE_SIZE,
            port_size: DEFAULT_PORT_SIZE,
            node_label: DEFAULT_NODE_LABEL.to_string(),
            curve_tangent: DEFAULT_TANGENT,
            zoom_step: DEFAULT_ZOOM_STEP,
            history_limit: None,
        }
    }
}
