//! Tile addressing: XYZ coordinates and the URL templates that carry them.

mod coord;
mod template;

pub use coord::{TileCoord, MAX_ZOOM};
pub use template::{TemplateError, TileUrlTemplate, DEFAULT_TILE_TEMPLATE};
