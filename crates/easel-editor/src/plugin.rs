//! Collaborator hooks.
//!
//! Optional behaviors (text editing, color picking, …) are composed onto the
//! editor as an ordered list of plugins invoked at fixed extension points.
//! Hooks read the editor freely but mutate it only through the
//! [`EditorAction`] commands they return; the editor applies them centrally,
//! so active-node consistency never depends on plugin discipline.

use crate::editor::Editor;
use crate::input::{KeyInput, Modifiers};
use easel_core::{CanvasNode, Color, NodeId, TextLines};
use easel_render::Surface;
use kurbo::Point;

/// A mutation a plugin asks the editor to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    RemoveNode { id: NodeId },
    SetActive { id: Option<NodeId> },
    /// Replace a text node's line buffer (invalidates its measured width).
    SetTextLines { id: NodeId, lines: TextLines },
    SetTextColor { id: NodeId, color: Color },
    /// Reserve minimum space on a text node (placeholder measurement).
    ReserveTextMin {
        id: NodeId,
        min_width: f64,
        min_lines: usize,
    },
    /// No state change, but the host should redraw.
    RequestRender,
}

/// Outcome of a capture-phase pointer hook.
#[derive(Debug, Clone, Default)]
pub struct PointerReply {
    /// True stops dispatch: no later plugin and no default hit-testing runs.
    pub consumed: bool,
    pub actions: Vec<EditorAction>,
}

impl PointerReply {
    /// Not interested; let dispatch continue.
    pub fn pass() -> Self {
        Self::default()
    }

    /// Swallow the event, applying `actions`.
    pub fn consume(actions: Vec<EditorAction>) -> Self {
        Self {
            consumed: true,
            actions,
        }
    }
}

/// An optional behavior composed onto the editor. All hooks have default
/// no-op implementations; implement only what the behavior needs.
pub trait EditorPlugin {
    fn name(&self) -> &'static str;

    /// A node was added (it is already the active node).
    fn on_node_added(&mut self, _node: &CanvasNode, _editor: &Editor) -> Vec<EditorAction> {
        Vec::new()
    }

    /// A node was removed from the collection.
    fn on_node_removed(&mut self, _id: NodeId) {}

    /// Capture-priority pointer-down, before default hit-testing.
    fn on_pointer_down(&mut self, _p: Point, _mods: Modifiers, _editor: &Editor) -> PointerReply {
        PointerReply::pass()
    }

    /// Keyboard input. `Some(actions)` consumes the key (the editor's
    /// default bindings are skipped); `None` passes it on.
    fn on_key(
        &mut self,
        _key: KeyInput,
        _mods: Modifiers,
        _editor: &Editor,
    ) -> Option<Vec<EditorAction>> {
        None
    }

    /// Clipboard paste. Same consumption contract as [`Self::on_key`].
    fn on_paste(&mut self, _text: &str, _editor: &Editor) -> Option<Vec<EditorAction>> {
        None
    }

    /// Called once per frame after base content is drawn, before selection
    /// chrome. Returned actions apply before the chrome draws.
    fn on_render(&mut self, _surface: &mut dyn Surface, _editor: &Editor) -> Vec<EditorAction> {
        Vec::new()
    }

    /// Fixed-period blink tick. Returns true if the frame needs a redraw.
    fn on_blink_tick(&mut self) -> bool {
        false
    }

    /// Whether the host should keep the blink timer running. Checked after
    /// every event; must flip to false as soon as editing ends.
    fn wants_blink_timer(&self) -> bool {
        false
    }
}
