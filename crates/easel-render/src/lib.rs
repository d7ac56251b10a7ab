pub mod chrome;
pub mod hit;
pub mod paint;
pub mod surface;

pub use chrome::{HandleIcons, draw_transformer};
pub use hit::topmost_node_at;
pub use paint::{cover_rect, draw_cover_image, draw_node};
pub use surface::Surface;
