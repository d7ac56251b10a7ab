//! In-place text editing for text nodes.
//!
//! Owns the edit session: which node has focus, the `(line, col)` caret, and
//! the caret blink phase. The line buffer itself stays on the node: every
//! keystroke reads it, applies a caret operation, and hands the result back
//! as a `SetTextLines` action.
//!
//! Commit policy: plain `Enter` commits (exits edit mode); `Shift+Enter` or
//! `Ctrl+Enter` inserts a line break. While a session is active the plugin
//! consumes every key it understands, so the editor's own `Delete` binding
//! cannot remove the node mid-edit.
//!
//! Editing starts when a text node is added (new nodes are born empty and
//! focused) or when a pointer-down lands on a text node; it stops on a
//! pointer-down that misses all text nodes, on plain `Enter`, or when the
//! edited node is removed.

use crate::editor::Editor;
use crate::input::{KeyInput, Modifiers};
use crate::plugin::{EditorAction, EditorPlugin, PointerReply};
use easel_core::caret::{self, Caret};
use easel_core::{CanvasNode, Color, NodeId, TextLines};
use easel_render::Surface;
use kurbo::{Point, Rect};

const BLINK_CARET_WIDTH: f64 = 2.0;

struct EditSession {
    node: NodeId,
    caret: Caret,
    caret_visible: bool,
}

pub struct TextEditPlugin {
    placeholder_text: String,
    placeholder_color: Color,
    session: Option<EditSession>,
}

impl TextEditPlugin {
    pub fn new() -> Self {
        Self {
            placeholder_text: "Type your text\nhere".into(),
            placeholder_color: Color::from_hex("#818181").unwrap_or(Color::BLACK),
            session: None,
        }
    }

    pub fn with_placeholder(placeholder: &str) -> Self {
        Self {
            placeholder_text: placeholder.into(),
            ..Self::new()
        }
    }

    fn start_editing(&mut self, node: &CanvasNode) {
        let Some(text) = node.as_text() else { return };
        let caret = if text.is_empty() {
            Caret::default()
        } else {
            Caret::at_end(&text.lines)
        };
        log::debug!("start editing {}", node.id);
        self.session = Some(EditSession {
            node: node.id,
            caret,
            caret_visible: true,
        });
    }

    fn stop_editing(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// The edited node's lines, or `None` (dropping a stale session) if the
    /// node is gone or no longer text.
    fn session_lines(&mut self, editor: &Editor) -> Option<TextLines> {
        let id = self.session.as_ref()?.node;
        match editor.node(id).and_then(CanvasNode::as_text) {
            Some(text) => Some(text.lines.clone()),
            None => {
                self.session = None;
                None
            }
        }
    }

    /// Unscaled width/line-count of the placeholder in `font`, used to keep
    /// an empty node's selection box from collapsing.
    fn placeholder_min(
        &self,
        surface: &mut dyn Surface,
        font: &easel_core::FontSpec,
    ) -> (f64, usize) {
        let mut width: f64 = 0.0;
        let mut lines = 0;
        for line in self.placeholder_text.split('\n') {
            width = width.max(surface.measure_text(line, font, font.size));
            lines += 1;
        }
        (width, lines)
    }
}

impl Default for TextEditPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorPlugin for TextEditPlugin {
    fn name(&self) -> &'static str {
        "text-edit"
    }

    fn on_node_added(&mut self, node: &CanvasNode, _editor: &Editor) -> Vec<EditorAction> {
        // New text nodes start focused for immediate typing.
        if node.is_text() {
            self.start_editing(node);
        }
        Vec::new()
    }

    fn on_node_removed(&mut self, id: NodeId) {
        if self.session.as_ref().is_some_and(|s| s.node == id) {
            self.session = None;
        }
    }

    fn on_pointer_down(&mut self, p: Point, _mods: Modifiers, editor: &Editor) -> PointerReply {
        let hit = editor
            .nodes()
            .iter()
            .rev()
            .filter(|node| node.is_text())
            .find(|node| node.contains(p));

        let changed = match hit {
            // Clicking a text node (re)starts its session, caret at the end.
            Some(node) => {
                self.start_editing(node);
                true
            }
            None => self.stop_editing(),
        };

        if changed {
            PointerReply {
                consumed: false,
                actions: vec![EditorAction::RequestRender],
            }
        } else {
            PointerReply::pass()
        }
    }

    fn on_key(
        &mut self,
        key: KeyInput,
        mods: Modifiers,
        editor: &Editor,
    ) -> Option<Vec<EditorAction>> {
        self.session.as_ref()?;
        let mut lines = self.session_lines(editor)?;
        let session = self.session.as_mut()?;
        session.caret.clamp(&lines);
        let id = session.node;

        // Typing resets the blink phase so the caret is visible where it
        // just moved.
        session.caret_visible = true;

        match key {
            KeyInput::Enter if mods.shift || mods.ctrl => {
                caret::insert_line_break(&mut lines, &mut session.caret);
                Some(vec![EditorAction::SetTextLines { id, lines }])
            }
            KeyInput::Enter => {
                self.stop_editing();
                Some(vec![EditorAction::RequestRender])
            }
            KeyInput::Backspace => {
                caret::backspace(&mut lines, &mut session.caret);
                Some(vec![EditorAction::SetTextLines { id, lines }])
            }
            KeyInput::Char(ch) => {
                caret::insert_char(&mut lines, &mut session.caret, ch);
                Some(vec![EditorAction::SetTextLines { id, lines }])
            }
            KeyInput::ArrowLeft => {
                caret::move_left(&lines, &mut session.caret);
                Some(vec![EditorAction::RequestRender])
            }
            KeyInput::ArrowRight => {
                caret::move_right(&lines, &mut session.caret);
                Some(vec![EditorAction::RequestRender])
            }
            KeyInput::ArrowUp => {
                caret::move_up(&lines, &mut session.caret);
                Some(vec![EditorAction::RequestRender])
            }
            KeyInput::ArrowDown => {
                caret::move_down(&lines, &mut session.caret);
                Some(vec![EditorAction::RequestRender])
            }
            // Swallowed while editing so the editor's node-delete binding
            // cannot fire mid-edit.
            KeyInput::Delete => Some(Vec::new()),
        }
    }

    fn on_paste(&mut self, text: &str, editor: &Editor) -> Option<Vec<EditorAction>> {
        self.session.as_ref()?;
        let mut lines = self.session_lines(editor)?;
        let session = self.session.as_mut()?;
        session.caret.clamp(&lines);
        session.caret_visible = true;
        caret::insert_text(&mut lines, &mut session.caret, text);
        Some(vec![EditorAction::SetTextLines {
            id: session.node,
            lines,
        }])
    }

    fn on_render(&mut self, surface: &mut dyn Surface, editor: &Editor) -> Vec<EditorAction> {
        let mut actions = Vec::new();
        let session = self.session.as_ref();

        for node in editor.nodes() {
            let Some(text) = node.as_text() else { continue };
            let editing_this = session.is_some_and(|s| s.node == node.id);

            // Keep the reserved placeholder size current for empty nodes and
            // the node being edited.
            if text.is_empty() || editing_this {
                let (min_width, min_lines) = self.placeholder_min(surface, &text.font);
                if text.min_width != min_width || text.min_lines != min_lines {
                    actions.push(EditorAction::ReserveTextMin {
                        id: node.id,
                        min_width,
                        min_lines,
                    });
                }
            }

            let scaled_size = text.font.size * node.scale_y;
            let actual_width = text.measured_width.max(text.min_width * node.scale_y);
            let actual_height = text.lines.len() as f64 * scaled_size;
            let cx = node.x + actual_width / 2.0;
            let cy = node.y + actual_height / 2.0;

            surface.save();
            surface.translate(cx, cy);
            surface.rotate(node.rotation);
            surface.translate(-actual_width / 2.0, -actual_height / 2.0);

            // Empty buffer: show the placeholder instead, centered like
            // rendered lines are.
            if text.is_empty() {
                for (i, line) in self.placeholder_text.split('\n').enumerate() {
                    let line_width = surface.measure_text(line, &text.font, scaled_size);
                    surface.fill_text(
                        line,
                        Point::new((actual_width - line_width) / 2.0, i as f64 * scaled_size),
                        &text.font,
                        scaled_size,
                        self.placeholder_color,
                    );
                }
            }

            // Caret, on the blink's visible phase only.
            if editing_this && session.is_some_and(|s| s.caret_visible) {
                let caret = session.map(|s| s.caret).unwrap_or_default();
                let line = text.lines.get(caret.line).map_or("", String::as_str);
                let prefix: String = line.chars().take(caret.col).collect();
                let typed_width = surface.measure_text(&prefix, &text.font, scaled_size);
                let full_width = surface.measure_text(line, &text.font, scaled_size);
                let caret_x = (actual_width - full_width) / 2.0 + typed_width;
                let caret_y = caret.line as f64 * scaled_size;
                let color = if text.is_empty() { Color::BLACK } else { text.color };
                surface.fill_rect(
                    Rect::new(
                        caret_x,
                        caret_y,
                        caret_x + BLINK_CARET_WIDTH,
                        caret_y + scaled_size * 0.8,
                    ),
                    color,
                );
            }

            surface.restore();
        }

        actions
    }

    fn on_blink_tick(&mut self) -> bool {
        match &mut self.session {
            Some(session) => {
                session.caret_visible = !session.caret_visible;
                true
            }
            None => false,
        }
    }

    fn wants_blink_timer(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn caret_of(plugin: &TextEditPlugin) -> Caret {
        plugin.session.as_ref().map(|s| s.caret).unwrap()
    }

    fn drive_key(
        plugin: &mut TextEditPlugin,
        editor: &mut Editor,
        key: KeyInput,
        mods: Modifiers,
    ) {
        if let Some(actions) = plugin.on_key(key, mods, editor) {
            editor.apply_all(actions);
        }
    }

    fn lines_of(editor: &Editor, id: NodeId) -> Vec<String> {
        editor
            .node(id)
            .and_then(CanvasNode::as_text)
            .map(|t| t.lines.to_vec())
            .unwrap()
    }

    #[test]
    fn typing_enter_backspace_scenario() {
        let mut editor = Editor::new(800.0, 600.0);
        let mut plugin = TextEditPlugin::new();

        let id = editor.add_text("");
        plugin.start_editing(editor.node(id).unwrap());
        assert_eq!(caret_of(&plugin), Caret::new(0, 0));

        drive_key(&mut plugin, &mut editor, KeyInput::Char('H'), Modifiers::NONE);
        drive_key(&mut plugin, &mut editor, KeyInput::Char('i'), Modifiers::NONE);
        assert_eq!(lines_of(&editor, id), vec!["Hi".to_owned()]);
        assert_eq!(caret_of(&plugin), Caret::new(0, 2));

        drive_key(&mut plugin, &mut editor, KeyInput::Enter, Modifiers::SHIFT);
        assert_eq!(lines_of(&editor, id), vec!["Hi".to_owned(), String::new()]);
        assert_eq!(caret_of(&plugin), Caret::new(1, 0));

        drive_key(&mut plugin, &mut editor, KeyInput::Backspace, Modifiers::NONE);
        assert_eq!(lines_of(&editor, id), vec!["Hi".to_owned()]);
        assert_eq!(caret_of(&plugin), Caret::new(0, 2));
    }

    #[test]
    fn plain_enter_commits() {
        let mut editor = Editor::new(800.0, 600.0);
        let mut plugin = TextEditPlugin::new();
        let id = editor.add_text("done");
        plugin.start_editing(editor.node(id).unwrap());

        drive_key(&mut plugin, &mut editor, KeyInput::Enter, Modifiers::NONE);
        assert!(plugin.session.is_none());
        assert!(!plugin.wants_blink_timer());
        // buffer untouched by the commit
        assert_eq!(lines_of(&editor, id), vec!["done".to_owned()]);
    }

    #[test]
    fn editing_starts_at_end_of_existing_text() {
        let mut editor = Editor::new(800.0, 600.0);
        let mut plugin = TextEditPlugin::new();
        let id = editor.add_text("ab\ncde");
        plugin.start_editing(editor.node(id).unwrap());
        assert_eq!(caret_of(&plugin), Caret::new(1, 3));
    }

    #[test]
    fn arrows_move_without_mutating() {
        let mut editor = Editor::new(800.0, 600.0);
        let mut plugin = TextEditPlugin::new();
        let id = editor.add_text("ab\ncd");
        plugin.start_editing(editor.node(id).unwrap());

        drive_key(&mut plugin, &mut editor, KeyInput::ArrowUp, Modifiers::NONE);
        assert_eq!(caret_of(&plugin), Caret::new(0, 2));
        drive_key(&mut plugin, &mut editor, KeyInput::ArrowLeft, Modifiers::NONE);
        assert_eq!(caret_of(&plugin), Caret::new(0, 1));
        assert_eq!(lines_of(&editor, id), vec!["ab".to_owned(), "cd".to_owned()]);
    }

    #[test]
    fn paste_splits_lines_at_caret() {
        let mut editor = Editor::new(800.0, 600.0);
        let mut plugin = TextEditPlugin::new();
        let id = editor.add_text("xy");
        plugin.start_editing(editor.node(id).unwrap());
        // caret at end (0,2)

        if let Some(actions) = plugin.on_paste("1\n2", &editor) {
            editor.apply_all(actions);
        }
        assert_eq!(lines_of(&editor, id), vec!["xy1".to_owned(), "2".to_owned()]);
        assert_eq!(caret_of(&plugin), Caret::new(1, 1));
    }

    #[test]
    fn delete_key_is_swallowed_while_editing() {
        let mut editor = Editor::new(800.0, 600.0);
        let mut plugin = TextEditPlugin::new();
        let id = editor.add_text("keep");
        plugin.start_editing(editor.node(id).unwrap());

        let reply = plugin.on_key(KeyInput::Delete, Modifiers::NONE, &editor);
        assert_eq!(reply, Some(Vec::new()));
        assert!(editor.node(id).is_some());
    }

    #[test]
    fn removing_the_edited_node_ends_the_session() {
        let mut editor = Editor::new(800.0, 600.0);
        let mut plugin = TextEditPlugin::new();
        let id = editor.add_text("bye");
        plugin.start_editing(editor.node(id).unwrap());
        assert!(plugin.wants_blink_timer());

        plugin.on_node_removed(id);
        assert!(!plugin.wants_blink_timer());
    }

    #[test]
    fn blink_toggles_only_while_editing() {
        let mut editor = Editor::new(800.0, 600.0);
        let mut plugin = TextEditPlugin::new();
        assert!(!plugin.on_blink_tick());

        let id = editor.add_text("x");
        plugin.start_editing(editor.node(id).unwrap());
        assert!(plugin.on_blink_tick());
        assert!(!plugin.session.as_ref().unwrap().caret_visible);
        assert!(plugin.on_blink_tick());
        assert!(plugin.session.as_ref().unwrap().caret_visible);
    }
}
