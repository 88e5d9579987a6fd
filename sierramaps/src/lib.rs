//! SierraMaps - Offline raster map tiles
//!
//! This library serves map tiles from a local disk cache, fetching each tile
//! over HTTPS the first time it is requested and persisting it under a
//! filesystem-safe key derived from its URL.
//!
//! # Example
//!
//! ```ignore
//! use sierramaps::interceptor::TileInterceptor;
//! use sierramaps::provider::ReqwestClient;
//!
//! let interceptor = TileInterceptor::new(cache_root, ReqwestClient::new()?);
//! let png = interceptor.resolve("https://sierramapstiles.onrender.com/tiles/1/2/3")?;
//! ```

pub mod cache;
pub mod config;
pub mod executor;
pub mod interceptor;
pub mod logging;
pub mod provider;
pub mod tile;
