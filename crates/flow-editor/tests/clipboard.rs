//! Integration tests: copy, cut, and paste through the editor
//! (flow-editor).

use flow_core::{EntityId, EntityStore, Node, Point, Port, Vec2};
use flow_editor::{
    Clipboard, EditorConfig, FlowEditor, InputEvent, Modifiers, PointerTarget,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn id(s: &str) -> EntityId {
    EntityId::intern(s)
}

fn graph() -> EntityStore {
    let mut store = EntityStore::new();
    store.add_node(Node::new(id("cb-a"), Point::new(100.0, 100.0)));
    store.add_port(Port::new(id("cb-a-out"), id("cb-a"), Vec2::new(145.0, 20.0)));
    store.add_node(Node::new(id("cb-b"), Point::new(400.0, 150.0)));
    store.add_port(Port::new(id("cb-b-in"), id("cb-b"), Vec2::new(-5.0, 20.0)));
    store
}

fn editor_with(clipboard: Clipboard) -> FlowEditor {
    init_logging();
    FlowEditor::from_store(graph(), EditorConfig::default(), flow_core::ModelLayout)
        .with_clipboard(clipboard)
}

fn connect(editor: &mut FlowEditor) {
    editor.handle(&InputEvent::ConnectStart {
        node: id("cb-a"),
        port: id("cb-a-out"),
        pointer: 0,
        position: Point::new(250.0, 125.0),
    });
    editor.handle(&InputEvent::pointer_up(Point::new(400.0, 175.0)));
    assert_eq!(editor.store().edges().count(), 1);
}

// ─── Paste ───────────────────────────────────────────────────────────────

#[test]
fn pasted_ids_are_fresh() {
    let mut editor = editor_with(Clipboard::new());
    connect(&mut editor);
    editor.handle(&InputEvent::key("a", Modifiers::CTRL));
    editor.handle(&InputEvent::key("c", Modifiers::CTRL));

    let original: HashSet<EntityId> = editor.store().iter().map(|e| e.id()).collect();
    assert!(editor.paste_at(Point::new(0.0, 400.0)));
    assert!(editor.paste_at(Point::new(0.0, 800.0)));

    let all: Vec<EntityId> = editor.store().iter().map(|e| e.id()).collect();
    let unique: HashSet<EntityId> = all.iter().copied().collect();
    assert_eq!(all.len(), unique.len(), "every id is unique");
    assert_eq!(all.len(), original.len() * 3);
    assert!(original.is_subset(&unique));
}

#[test]
fn paste_lands_at_pointer_and_selects_copies() {
    let mut editor = editor_with(Clipboard::new());
    editor.selection().toggle(id("cb-a"));
    editor.selection().toggle(id("cb-b"));
    editor.handle(&InputEvent::key("c", Modifiers::CTRL));

    editor.handle(&InputEvent::pointer_move(Point::new(500.0, 500.0)));
    editor.handle(&InputEvent::key("v", Modifiers::CTRL));

    let selected = editor.store().selected_ids();
    assert!(!selected.contains(&id("cb-a")));
    let positions: Vec<Point> = selected
        .iter()
        .filter_map(|i| editor.store().node(*i))
        .map(|n| n.position)
        .collect();
    assert_eq!(
        positions,
        vec![Point::new(500.0, 500.0), Point::new(800.0, 550.0)]
    );
}

#[test]
fn paste_target_accounts_for_viewport() {
    let mut editor = editor_with(Clipboard::new());
    editor.selection().toggle(id("cb-a"));
    editor.copy();

    editor.handle(&InputEvent::wheel(Point::new(0.0, 0.0), -1.0));
    editor.handle(&InputEvent::pointer_move(Point::new(110.0, 220.0)));
    editor.paste();

    let pasted = editor.store().selected_ids()[0];
    let position = editor.store().node(pasted).unwrap().position;
    assert!((position.x - 100.0).abs() < 1e-9);
    assert!((position.y - 200.0).abs() < 1e-9);
}

#[test]
fn pasted_edge_connects_pasted_nodes() {
    let mut editor = editor_with(Clipboard::new());
    connect(&mut editor);
    editor.selection().select_all();
    editor.copy();
    editor.paste_at(Point::new(100.0, 600.0));

    let pasted: HashSet<EntityId> = editor.store().selected_ids().into_iter().collect();
    let edge = editor
        .store()
        .edges()
        .find(|e| pasted.contains(&e.id))
        .expect("pasted edge");
    assert!(pasted.contains(&edge.source_node));
    assert!(pasted.contains(&edge.target_node));
    assert_eq!(edge.curve.map(|c| c.p0), Some(Point::new(250.0, 625.0)));
}

#[test]
fn paste_is_one_history_entry() {
    let mut editor = editor_with(Clipboard::new());
    editor.selection().select_all();
    editor.copy();
    let before = editor.history().len();
    editor.paste_at(Point::ZERO);
    assert_eq!(editor.history().len(), before + 1);

    editor.undo();
    assert_eq!(editor.store().len(), graph().len());
}

#[test]
fn paste_with_empty_clipboard_is_a_no_op() {
    let mut editor = editor_with(Clipboard::new());
    let before = editor.history().len();
    assert!(!editor.paste());
    assert_eq!(editor.store().len(), graph().len());
    assert_eq!(editor.history().len(), before);
}

#[test]
fn pasted_ports_stay_unselected() {
    let mut editor = editor_with(Clipboard::new());
    editor.selection().toggle(id("cb-a"));
    editor.copy();
    let pasted = editor.clipboard().len();
    assert!(editor.paste_at(Point::new(0.0, 400.0)));
    assert_eq!(editor.store().selected_ids().len(), pasted - 1);
    assert!(editor.store().ports().all(|p| !p.selected));

    editor.handle(&InputEvent::pointer_down(
        Point::new(450.0, 175.0),
        Modifiers::NONE,
        PointerTarget::Node(id("cb-b")),
    ));
    editor.handle(&InputEvent::pointer_up(Point::new(450.0, 175.0)));
    assert_eq!(editor.store().selected_ids(), vec![id("cb-b")]);

    let shift = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
    editor.handle(&InputEvent::pointer_down(
        Point::new(1000.0, 1000.0),
        shift,
        PointerTarget::Background,
    ));
    editor.handle(&InputEvent::pointer_move(Point::new(1010.0, 1010.0)));
    editor.handle(&InputEvent::pointer_up(Point::new(1010.0, 1010.0)));
    assert!(editor.store().selected_ids().is_empty());

    let frame = editor.frame();
    let flagged: Vec<EntityId> = frame
        .flags
        .iter()
        .filter(|f| f.selected && editor.store().port(f.id).is_some())
        .map(|f| f.id)
        .collect();
    assert!(flagged.is_empty(), "ports flagged selected: {flagged:?}");
}

// ─── Cut ─────────────────────────────────────────────────────────────────

#[test]
fn cut_then_paste_restores_content() {
    let mut editor = editor_with(Clipboard::new());
    editor.handle(&InputEvent::pointer_down(
        Point::new(150.0, 125.0),
        Modifiers::NONE,
        PointerTarget::Node(id("cb-a")),
    ));
    editor.handle(&InputEvent::pointer_up(Point::new(150.0, 125.0)));
    editor.handle(&InputEvent::key("x", Modifiers::CTRL));
    assert!(editor.store().node(id("cb-a")).is_none());
    assert!(editor.store().port(id("cb-a-out")).is_none());

    editor.paste_at(Point::new(100.0, 100.0));
    assert_eq!(editor.store().nodes().count(), 2);
    assert_eq!(editor.store().ports().count(), 2);
}

// ─── Sharing ─────────────────────────────────────────────────────────────

#[test]
fn editors_share_the_thread_clipboard() {
    init_logging();
    let mut source = FlowEditor::from_store(graph(), EditorConfig::default(), flow_core::ModelLayout);
    let mut target = FlowEditor::new();

    source.selection().toggle(id("cb-b"));
    source.copy();
    assert!(target.paste_at(Point::new(10.0, 10.0)));
    assert_eq!(target.store().nodes().count(), 1);
    assert_eq!(target.store().ports().count(), 1);
}

#[test]
fn private_clipboards_are_isolated() {
    let mut source = editor_with(Clipboard::new());
    let mut target = FlowEditor::new().with_clipboard(Clipboard::new());

    source.selection().select_all();
    source.copy();
    assert!(!target.paste());
}
