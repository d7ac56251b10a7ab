//! The composition root: node collection, active node, event routing.
//!
//! All mutation happens synchronously inside the event methods; the editor
//! is single-threaded and run-to-completion, so a hit-test and the mutation
//! it triggers always observe the same state. The render loop contract is
//! pull-based: `render` returns whether another frame is wanted (a node is
//! selected), and the host re-schedules.

use crate::gesture::Gesture;
use crate::input::{KeyInput, Modifiers};
use crate::plugin::{EditorAction, EditorPlugin};
use easel_core::{
    CanvasNode, CursorStyle, HandleKind, ImageId, NodeId, NodeKind, handle_at,
};
use easel_render::{HandleIcons, Surface, chrome, hit, paint};
use kurbo::{Point, Rect};
use std::mem;

/// A decoded image drawn cover-fit behind all nodes.
#[derive(Debug, Clone, Copy)]
struct BackgroundImage {
    image: ImageId,
    natural_width: f64,
    natural_height: f64,
}

/// Result of a pointer-move: whether to redraw, and a cursor change to push
/// to the host (reported only on transitions, so redundant style writes
/// never happen).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerMove {
    pub needs_render: bool,
    pub cursor_change: Option<CursorStyle>,
}

pub struct Editor {
    nodes: Vec<CanvasNode>,
    active: Option<NodeId>,
    gesture: Gesture,
    plugins: Vec<Box<dyn EditorPlugin>>,
    width: f64,
    height: f64,
    /// Handle kinds shown and hit-tested, in priority order.
    active_handles: Vec<HandleKind>,
    handle_icons: HandleIcons,
    background: Option<BackgroundImage>,
    placeholder: Option<BackgroundImage>,
    /// True until the first node is added or a background is set.
    show_placeholder: bool,
    cursor: CursorStyle,
}

impl Editor {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            nodes: Vec::new(),
            active: None,
            gesture: Gesture::Idle,
            plugins: Vec::new(),
            width,
            height,
            active_handles: HandleKind::ALL.to_vec(),
            handle_icons: HandleIcons::default(),
            background: None,
            placeholder: None,
            show_placeholder: false,
            cursor: CursorStyle::Default,
        }
    }

    /// Register a collaborator. Plugins run in installation order.
    pub fn install(&mut self, plugin: Box<dyn EditorPlugin>) {
        log::debug!("install plugin {}", plugin.name());
        self.plugins.push(plugin);
    }

    // ─── Collection access ───────────────────────────────────────────────

    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut CanvasNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn active_node(&self) -> Option<&CanvasNode> {
        self.active.and_then(|id| self.node(id))
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Restrict (or reorder) the shown handle kinds.
    pub fn set_active_handles(&mut self, handles: Vec<HandleKind>) {
        self.active_handles = handles;
    }

    /// Register an icon image drawn inside a handle's circle.
    pub fn set_handle_icon(&mut self, kind: HandleKind, image: ImageId) {
        self.handle_icons.set(kind, image);
    }

    // ─── Node lifecycle ──────────────────────────────────────────────────

    /// Add a node: it becomes the active node and plugins are notified.
    pub fn add_node(&mut self, node: CanvasNode) -> NodeId {
        let id = node.id;
        self.nodes.push(node);
        self.show_placeholder = false;
        self.active = Some(id);

        let mut plugins = mem::take(&mut self.plugins);
        let mut pending = Vec::new();
        for plugin in &mut plugins {
            // The node was just pushed; the lookup cannot fail.
            if let Some(node) = self.node(id) {
                pending.extend(plugin.on_node_added(node, self));
            }
        }
        self.plugins = plugins;
        self.apply_all(pending);
        id
    }

    /// Add a text node centered on the canvas.
    pub fn add_text(&mut self, text: &str) -> NodeId {
        self.add_node(CanvasNode::text(text, self.width / 2.0, self.height / 2.0))
    }

    /// Add an image node centered on the canvas. Pass the natural size for
    /// an already-decoded image; `None` defers scale-to-fit until
    /// [`Editor::image_decoded`] reports completion.
    pub fn add_image(&mut self, image: ImageId, natural_size: Option<(f64, f64)>) -> NodeId {
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let node = match natural_size {
            Some((w, h)) => CanvasNode::image(image, w, h, cx, cy, self.width, self.height),
            None => CanvasNode::image_pending(image, cx, cy),
        };
        self.add_node(node)
    }

    /// Decode-completion signal for `image`: every pending node backed by it
    /// learns its natural size and gets its deferred scale-to-fit.
    pub fn image_decoded(&mut self, image: ImageId, natural_width: f64, natural_height: f64) {
        let (vw, vh) = (self.width, self.height);
        for node in &mut self.nodes {
            if let NodeKind::Image(content) = &node.kind
                && content.image == image
                && !content.loaded
            {
                node.image_decoded(natural_width, natural_height, vw, vh);
            }
        }
    }

    /// Remove a node. Removing an id that is not present is a no-op;
    /// removing the active node deselects it and cancels any drag.
    pub fn remove_node(&mut self, id: NodeId) {
        let Some(pos) = self.nodes.iter().position(|n| n.id == id) else {
            return;
        };
        self.nodes.remove(pos);
        if self.active == Some(id) {
            self.active = None;
            self.gesture.end();
        }
        for plugin in &mut self.plugins {
            plugin.on_node_removed(id);
        }
        log::debug!("removed node {id}");
    }

    /// Clear the canvas back to its initial state.
    pub fn reset(&mut self) {
        let ids: Vec<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        for id in ids {
            self.remove_node(id);
        }
        self.background = None;
        self.show_placeholder = self.placeholder.is_some();
    }

    // ─── Background layer ────────────────────────────────────────────────

    pub fn set_background_image(&mut self, image: ImageId, natural_width: f64, natural_height: f64) {
        self.background = Some(BackgroundImage {
            image,
            natural_width,
            natural_height,
        });
        self.show_placeholder = false;
    }

    pub fn set_placeholder_image(&mut self, image: ImageId, natural_width: f64, natural_height: f64) {
        self.placeholder = Some(BackgroundImage {
            image,
            natural_width,
            natural_height,
        });
        self.show_placeholder = true;
    }

    // ─── Pointer routing ─────────────────────────────────────────────────

    /// Pointer-down. Returns true when a redraw is needed.
    ///
    /// Dispatch order: capture-phase plugins → handles of the active node →
    /// topmost node under the pointer (select, or clear on a miss). Clicking
    /// a node's interior selects but never drags it; translation only goes
    /// through the translate handle.
    pub fn on_pointer_down(&mut self, p: Point, mods: Modifiers) -> bool {
        let mut plugins = mem::take(&mut self.plugins);
        let mut pending = Vec::new();
        let mut consumed = false;
        for plugin in &mut plugins {
            let reply = plugin.on_pointer_down(p, mods, self);
            pending.extend(reply.actions);
            if reply.consumed {
                consumed = true;
                break;
            }
        }
        self.plugins = plugins;
        let mut changed = self.apply_all(pending);
        if consumed {
            return true;
        }

        // Handles of the active node win over everything below them.
        let handle_hit = self.active.and_then(|id| {
            self.node(id).and_then(|node| {
                handle_at(&node.selection_bounds(), p, &self.active_handles)
                    .map(|handle| (id, handle))
            })
        });
        if let Some((id, handle)) = handle_hit {
            if handle == HandleKind::Delete {
                // No drag phase: the node goes away at pointer-down.
                self.remove_node(id);
            } else {
                let gesture = self.node(id).map(|node| Gesture::begin(node, handle, p));
                if let Some(gesture) = gesture {
                    self.gesture = gesture;
                }
            }
            return true;
        }

        // Otherwise select whatever is on top under the pointer.
        let hit = hit::topmost_node_at(&self.nodes, p);
        changed |= hit != self.active;
        self.active = hit;
        changed
    }

    /// Pointer-move: feeds an in-flight drag, otherwise updates hover
    /// cursor feedback.
    pub fn on_pointer_move(&mut self, p: Point, _mods: Modifiers) -> PointerMove {
        if self.gesture.is_dragging() {
            if let Some(id) = self.active {
                let Self { nodes, gesture, .. } = self;
                if let Some(node) = nodes.iter_mut().find(|n| n.id == id) {
                    let needs_render = gesture.update(node, p);
                    return PointerMove {
                        needs_render,
                        cursor_change: None,
                    };
                }
            }
        }

        let hover = self.active_node().and_then(|node| {
            handle_at(&node.selection_bounds(), p, &self.active_handles)
        });
        let cursor = hover.map_or(CursorStyle::Default, |handle| handle.config().cursor);
        let cursor_change = (cursor != self.cursor).then(|| {
            self.cursor = cursor;
            cursor
        });
        PointerMove {
            needs_render: false,
            cursor_change,
        }
    }

    /// Pointer-up: unconditionally ends any drag, wherever the pointer is.
    pub fn on_pointer_up(&mut self) {
        self.gesture.end();
    }

    // ─── Keyboard routing ────────────────────────────────────────────────

    /// Key-down. Plugins get the key first; the editor's own binding
    /// (`Delete` removes the active node) only fires when no plugin
    /// consumed it. Returns true when a redraw is needed.
    pub fn on_key(&mut self, key: KeyInput, mods: Modifiers) -> bool {
        let mut plugins = mem::take(&mut self.plugins);
        let mut outcome = None;
        for plugin in &mut plugins {
            if let Some(actions) = plugin.on_key(key, mods, self) {
                outcome = Some(actions);
                break;
            }
        }
        self.plugins = plugins;

        if let Some(actions) = outcome {
            self.apply_all(actions);
            return true;
        }

        if key == KeyInput::Delete
            && let Some(id) = self.active
        {
            self.remove_node(id);
            return true;
        }
        false
    }

    /// Clipboard paste, routed like a key event (no editor default).
    pub fn on_paste(&mut self, text: &str) -> bool {
        let mut plugins = mem::take(&mut self.plugins);
        let mut outcome = None;
        for plugin in &mut plugins {
            if let Some(actions) = plugin.on_paste(text, self) {
                outcome = Some(actions);
                break;
            }
        }
        self.plugins = plugins;

        match outcome {
            Some(actions) => {
                self.apply_all(actions);
                true
            }
            None => false,
        }
    }

    // ─── Blink timer ─────────────────────────────────────────────────────

    /// Fixed-period tick from the host's blink timer. Returns true when a
    /// redraw is needed.
    pub fn blink_tick(&mut self) -> bool {
        let mut redraw = false;
        for plugin in &mut self.plugins {
            redraw |= plugin.on_blink_tick();
        }
        redraw
    }

    /// Whether the host should keep a blink interval running. Check after
    /// every event so the timer stops as soon as editing ends (or the
    /// edited node is removed).
    pub fn wants_blink_timer(&self) -> bool {
        self.plugins.iter().any(|p| p.wants_blink_timer())
    }

    // ─── Render loop ─────────────────────────────────────────────────────

    /// Draw one frame: background, nodes, plugin overlays, then selection
    /// chrome. Returns true while a node is selected, the signal for the
    /// host to schedule the next frame.
    pub fn render(&mut self, surface: &mut dyn Surface) -> bool {
        self.render_frame(surface, true);
        self.active.is_some()
    }

    /// Render for export: deselect, then draw without selection chrome. The
    /// host hands the surface to its encoder afterwards.
    pub fn render_for_export(&mut self, surface: &mut dyn Surface) {
        self.active = None;
        self.gesture.end();
        self.render_frame(surface, false);
    }

    fn render_frame(&mut self, surface: &mut dyn Surface, with_chrome: bool) {
        surface.clear(Rect::new(0.0, 0.0, self.width, self.height));

        let background = if self.show_placeholder {
            self.placeholder
        } else {
            self.background
        };
        if let Some(bg) = background {
            paint::draw_cover_image(surface, bg.image, bg.natural_width, bg.natural_height);
        }

        paint::draw_nodes(surface, &mut self.nodes);

        // Plugin overlays; their actions apply before the chrome draws so
        // the selection box picks up e.g. freshly reserved placeholder size.
        let mut plugins = mem::take(&mut self.plugins);
        let mut pending = Vec::new();
        for plugin in &mut plugins {
            pending.extend(plugin.on_render(surface, self));
        }
        self.plugins = plugins;
        self.apply_all(pending);

        if with_chrome
            && let Some(node) = self.active_node()
        {
            chrome::draw_transformer(surface, node, &self.active_handles, &self.handle_icons);
        }
    }

    // ─── Actions ─────────────────────────────────────────────────────────

    /// Apply one plugin action. Returns true if editor state changed.
    pub fn apply(&mut self, action: EditorAction) -> bool {
        match action {
            EditorAction::RemoveNode { id } => {
                let existed = self.node(id).is_some();
                self.remove_node(id);
                existed
            }
            EditorAction::SetActive { id } => {
                let changed = self.active != id;
                self.active = id;
                if changed {
                    self.gesture.end();
                }
                changed
            }
            EditorAction::SetTextLines { id, lines } => {
                match self.node_mut(id).and_then(CanvasNode::as_text_mut) {
                    Some(text) => {
                        text.lines = lines;
                        text.measured_width = 0.0;
                        true
                    }
                    None => false,
                }
            }
            EditorAction::SetTextColor { id, color } => {
                match self.node_mut(id).and_then(CanvasNode::as_text_mut) {
                    Some(text) => {
                        let changed = text.color != color;
                        text.color = color;
                        changed
                    }
                    None => false,
                }
            }
            EditorAction::ReserveTextMin {
                id,
                min_width,
                min_lines,
            } => match self.node_mut(id).and_then(CanvasNode::as_text_mut) {
                Some(text) => {
                    let changed = text.min_width != min_width || text.min_lines != min_lines;
                    text.min_width = min_width;
                    text.min_lines = min_lines;
                    changed
                }
                None => false,
            },
            EditorAction::RequestRender => true,
        }
    }

    /// Apply a batch; true if any action changed state.
    pub fn apply_all(&mut self, actions: Vec<EditorAction>) -> bool {
        let mut changed = false;
        for action in actions {
            changed |= self.apply(action);
        }
        changed
    }
}
