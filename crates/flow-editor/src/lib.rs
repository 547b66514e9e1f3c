pub mod clipboard;
pub mod config;
pub mod editor;
pub mod history;
pub mod input;
pub mod interaction;
pub mod mutation;
pub mod selection;
pub mod shortcuts;

pub use clipboard::{Clipboard, ClipboardBuffer};
pub use config::EditorConfig;
pub use editor::FlowEditor;
pub use history::HistoryManager;
pub use input::{InputEvent, Modifiers, PointerId, PointerTarget};
pub use interaction::{InteractionMachine, InteractionState, NodeDrag, Response};
pub use mutation::GraphMutation;
pub use selection::SelectionIndex;
pub use shortcuts::{ShortcutAction, ShortcutMap};
