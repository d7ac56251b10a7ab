pub mod caret;
pub mod geom;
pub mod handles;
pub mod id;
pub mod model;

pub use caret::Caret;
pub use geom::{Bounds, rotate_about, to_local};
pub use handles::{HandleConfig, HandleKind, handle_at};
pub use id::NodeId;
pub use model::*;

// Re-export kurbo's point type so downstream crates don't need a direct
// dependency just to pass positions around.
pub use kurbo::Point;
