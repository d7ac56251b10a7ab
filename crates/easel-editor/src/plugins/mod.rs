//! Bundled collaborators: text editing and color picking.
//!
//! Both are optional (the base editor works without them) and both talk to
//! the editor exclusively through [`crate::plugin::EditorAction`]s.

pub mod color_picker;
pub mod text_edit;

pub use color_picker::ColorPickerPlugin;
pub use text_edit::TextEditPlugin;
