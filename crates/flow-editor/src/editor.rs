//! The editor surface: one graph, its view, and everything that edits it.
//!
//! `FlowEditor` routes input through the interaction state machine, applies
//! the structural mutations it produces, and keeps derived state current.
//! Every batch of mutations is followed by exactly one geometry recompute
//! and one history record (deduplicated, and held back while a node drag
//! is in progress so the whole drag becomes one entry).

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::history::HistoryManager;
use crate::input::InputEvent;
use crate::interaction::{InteractionMachine, InteractionState};
use crate::mutation::GraphMutation;
use crate::selection::SelectionIndex;
use crate::shortcuts::ShortcutAction;
use flow_core::layout::{LayoutProbe, ModelLayout};
use flow_core::model::{EntityStore, Node, Port};
use flow_core::{EdgeGeometry, EntityId, Viewport};
use flow_render::{RenderFrame, Renderer};
use kurbo::{Point, Vec2};

pub struct FlowEditor<P: LayoutProbe = ModelLayout> {
    store: EntityStore,
    probe: P,
    geometry: EdgeGeometry,
    interaction: InteractionMachine,
    history: HistoryManager,
    clipboard: Clipboard,
    config: EditorConfig,
}

impl FlowEditor<ModelLayout> {
    /// An empty editor with default settings.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self::with_probe(config, ModelLayout)
    }
}

impl Default for FlowEditor<ModelLayout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: LayoutProbe> FlowEditor<P> {
    /// An empty editor whose layout comes from `probe`.
    pub fn with_probe(config: EditorConfig, probe: P) -> Self {
        Self::from_store(EntityStore::new(), config, probe)
    }

    /// An editor over existing content. The content becomes the first
    /// history entry, so undo never goes past it.
    pub fn from_store(mut store: EntityStore, config: EditorConfig, probe: P) -> Self {
        let geometry = EdgeGeometry::new(config.curve_tangent);
        geometry.resolve_all(&mut store, &probe);
        let history = HistoryManager::new(&store, config.history_limit);
        Self {
            store,
            probe,
            geometry,
            interaction: InteractionMachine::new(config.zoom_step),
            history,
            clipboard: Clipboard::shared(),
            config,
        }
    }

    /// Use `clipboard` instead of the thread-wide shared one.
    pub fn with_clipboard(mut self, clipboard: Clipboard) -> Self {
        self.clipboard = clipboard;
        self
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn viewport(&self) -> &Viewport {
        self.interaction.viewport()
    }

    pub fn state(&self) -> &InteractionState {
        self.interaction.state()
    }

    pub fn interaction(&self) -> &InteractionMachine {
        &self.interaction
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Selection operations on the live store. Selection changes are not
    /// recorded in history.
    pub fn selection(&mut self) -> SelectionIndex<'_> {
        SelectionIndex::new(&mut self.store)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        *self.interaction.viewport_mut() = viewport;
    }

    /// Pan by a screen-space offset.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.interaction.viewport_mut().apply_pan(delta);
    }

    /// Zoom by `factor` around a screen-space anchor.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        self.interaction.viewport_mut().apply_zoom(anchor, factor);
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Handle one input event. Returns `true` if anything visible changed.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        let response = self
            .interaction
            .handle(event, &mut self.store, &self.probe);
        let mut redraw = response.redraw;

        if !response.mutations.is_empty() {
            let record = self.interaction.node_drag().is_none();
            redraw |= self.apply_batch(response.mutations, record);
        }
        if response.drag_finished {
            self.record();
        }
        if let Some(action) = response.command {
            redraw |= self.dispatch(action);
        }
        redraw
    }

    /// Run a shortcut action. Returns `true` if anything changed.
    pub fn dispatch(&mut self, action: ShortcutAction) -> bool {
        log::trace!("dispatch {action:?}");
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::SelectAll => {
                self.selection().select_all();
                true
            }
            ShortcutAction::Copy => {
                self.copy();
                false
            }
            ShortcutAction::Cut => self.cut(),
            ShortcutAction::Paste => self.paste(),
        }
    }

    // ─── Structural edits ────────────────────────────────────────────────

    /// Apply one mutation as its own batch.
    pub fn apply(&mut self, mutation: GraphMutation) -> bool {
        self.apply_batch(vec![mutation], true)
    }

    /// Apply several mutations as one batch (one history entry).
    pub fn apply_all(&mut self, mutations: Vec<GraphMutation>) -> bool {
        self.apply_batch(mutations, true)
    }

    /// Add a node with the configured default size and label.
    pub fn create_node(&mut self, position: Point) -> EntityId {
        let id = EntityId::fresh("node", |candidate| self.store.contains(candidate));
        let node = Node::new(id, position)
            .with_size(self.config.node_size)
            .with_label(self.config.node_label.clone());
        self.apply(GraphMutation::add_node(node));
        id
    }

    /// Add a port of the configured default size to `node`.
    pub fn create_port(&mut self, node: EntityId, offset: Vec2) -> Option<EntityId> {
        self.store.node(node)?;
        let id = EntityId::fresh("port", |candidate| self.store.contains(candidate));
        let port = Port::new(id, node, offset).with_size(self.config.port_size);
        self.apply(GraphMutation::add_port(port)).then_some(id)
    }

    /// Remove every selected node and edge. Edges attached to removed
    /// nodes stay.
    pub fn delete_selected(&mut self) -> bool {
        if SelectionIndex::new(&mut self.store)
            .delete_selected()
            .is_empty()
        {
            return false;
        }
        self.flush(true);
        true
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    pub fn copy(&mut self) -> usize {
        self.clipboard.copy(&self.store)
    }

    pub fn cut(&mut self) -> bool {
        if self.clipboard.cut(&mut self.store) == 0 {
            return false;
        }
        self.flush(true);
        true
    }

    /// Paste at the last pointer position (or the content origin when no
    /// pointer has been seen).
    pub fn paste(&mut self) -> bool {
        let target = self
            .interaction
            .last_pointer()
            .map(|p| self.viewport().screen_to_content(p))
            .unwrap_or(Point::ZERO);
        self.paste_at(target)
    }

    /// Paste with the group's top-left corner at `target` (content space).
    pub fn paste_at(&mut self, target: Point) -> bool {
        if self.clipboard.paste(&mut self.store, target).is_empty() {
            return false;
        }
        self.flush(true);
        true
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.store) {
            return false;
        }
        self.after_restore();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.store) {
            return false;
        }
        self.after_restore();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Describe the current canvas for a renderer.
    pub fn frame(&self) -> RenderFrame {
        let viewport = *self.viewport();
        let pending = self
            .interaction
            .pending_connection()
            .and_then(|(source, cursor)| {
                self.geometry
                    .resolve_pending(&self.store, &self.probe, source, cursor, &viewport)
            });
        RenderFrame::build(&self.store, viewport, pending, self.interaction.marquee())
    }

    pub fn render(&self, renderer: &mut impl Renderer) {
        renderer.render(&self.frame());
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn apply_batch(&mut self, mutations: Vec<GraphMutation>, record: bool) -> bool {
        let mut changed = false;
        for mutation in mutations {
            changed |= mutation.apply(&mut self.store);
        }
        if changed {
            self.flush(record);
        }
        changed
    }

    /// Recompute geometry and, when `record` is set, record history.
    fn flush(&mut self, record: bool) {
        let resolved = self.geometry.resolve_all(&mut self.store, &self.probe);
        log::trace!("resolved {resolved} edge curves");
        if record {
            self.record();
        }
    }

    fn record(&mut self) {
        if self.history.snapshot(&self.store) {
            log::debug!(
                "history entry {} of {}",
                self.history.index(),
                self.history.len()
            );
        }
    }

    /// A restore replaced the store. Gestures referring to the old content
    /// are dropped.
    fn after_restore(&mut self) {
        self.interaction.reset(&mut self.store);
        self.flush(false);
        log::debug!(
            "restored history entry {} of {}",
            self.history.index(),
            self.history.len()
        );
    }
}
