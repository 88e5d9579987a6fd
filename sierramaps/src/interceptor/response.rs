//! Host-facing tile response.

/// MIME type reported for every cached tile.
pub const TILE_MIME_TYPE: &str = "image/png";

/// Encoding reported alongside the tile bytes.
pub const TILE_ENCODING: &str = "UTF-8";

/// A resolved tile, shaped for a renderer's resource-loading hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileResponse {
    pub mime_type: &'static str,
    pub encoding: &'static str,
    pub data: Vec<u8>,
}

impl TileResponse {
    /// Wrap PNG bytes.
    pub fn png(data: Vec<u8>) -> Self {
        Self {
            mime_type: TILE_MIME_TYPE,
            encoding: TILE_ENCODING,
            data,
        }
    }
}
