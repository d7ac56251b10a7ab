pub mod editor;
pub mod gesture;
pub mod input;
pub mod plugin;
pub mod plugins;

pub use editor::{Editor, PointerMove};
pub use gesture::Gesture;
pub use input::{KeyInput, Modifiers};
pub use plugin::{EditorAction, EditorPlugin, PointerReply};
