//! Per-node gesture state machine.
//!
//! A drag session records its anchor once at pointer-down and applies every
//! later pointer-move against that fixed anchor: translation is the only
//! incremental case (pointer delta since the previous move), rotate and
//! resize recompute from gesture start so rounding never accumulates.
//! Pointer-up unconditionally returns to `Idle`. The delete handle never
//! enters a drag session; removal happens at pointer-down.

use easel_core::{CanvasNode, HandleKind, ResizeAnchor, RotateAnchor};
use kurbo::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAnchor {
    /// Last observed pointer position; deltas apply incrementally.
    Translate { last: Point },
    Rotate(RotateAnchor),
    Resize(ResizeAnchor),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        handle: HandleKind,
        anchor: GestureAnchor,
    },
}

impl Gesture {
    /// Start a drag on `handle`, recording the node's anchor state.
    /// `HandleKind::Delete` has no drag phase and stays `Idle`.
    pub fn begin(node: &CanvasNode, handle: HandleKind, p: Point) -> Self {
        let anchor = match handle {
            HandleKind::Translate => GestureAnchor::Translate { last: p },
            HandleKind::Rotate => GestureAnchor::Rotate(node.begin_rotate(p)),
            HandleKind::Resize => GestureAnchor::Resize(node.begin_resize(p)),
            HandleKind::Delete => return Self::Idle,
        };
        log::debug!("drag start {handle:?} on {}", node.id);
        Self::Dragging { handle, anchor }
    }

    /// Apply a pointer-move to the dragged node. Returns true if the node
    /// was mutated.
    pub fn update(&mut self, node: &mut CanvasNode, p: Point) -> bool {
        match self {
            Self::Idle => false,
            Self::Dragging { anchor, .. } => {
                match anchor {
                    GestureAnchor::Translate { last } => {
                        node.move_by(p.x - last.x, p.y - last.y);
                        *last = p;
                    }
                    GestureAnchor::Rotate(anchor) => node.update_rotate(*anchor, p),
                    GestureAnchor::Resize(anchor) => node.update_resize(*anchor, p),
                }
                true
            }
        }
    }

    /// Pointer-up: back to idle, wherever the pointer is.
    pub fn end(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}
