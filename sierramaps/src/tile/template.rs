//! Tile URL templates.
//!
//! A template is a URL containing the placeholders `{x}`, `{y}` and `{z}`,
//! for example `https://sierramapstiles.onrender.com/tiles/{x}/{y}/{z}`.
//! The same template builds URLs from coordinates and parses coordinates
//! back out of URLs.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use thiserror::Error;

use super::coord::TileCoord;

/// Default public tile server template.
pub const DEFAULT_TILE_TEMPLATE: &str = "https://sierramapstiles.onrender.com/tiles/{x}/{y}/{z}";

const PLACEHOLDERS: [&str; 3] = ["{x}", "{y}", "{z}"];

/// Error building a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A placeholder is absent or appears more than once.
    #[error("Template must contain {placeholder} exactly once: {template}")]
    Placeholder {
        placeholder: &'static str,
        template: String,
    },
}

/// A validated tile URL template.
#[derive(Debug, Clone)]
pub struct TileUrlTemplate {
    template: String,
    pattern: Regex,
}

impl TileUrlTemplate {
    /// Validate `template` and compile its matcher.
    pub fn new(template: impl Into<String>) -> Result<Self, TemplateError> {
        let template = template.into();

        for placeholder in PLACEHOLDERS {
            if template.matches(placeholder).count() != 1 {
                return Err(TemplateError::Placeholder {
                    placeholder,
                    template,
                });
            }
        }

        // Escape the literal parts, then open up the placeholders as
        // named digit groups. A trailing query string is tolerated.
        let escaped = regex::escape(&template)
            .replace(r"\{x\}", r"(?P<x>\d+)")
            .replace(r"\{y\}", r"(?P<y>\d+)")
            .replace(r"\{z\}", r"(?P<z>\d+)");
        let pattern = Regex::new(&format!(r"^{}/?(?:\?.*)?$", escaped))
            .expect("escaped template is a valid regex");

        Ok(Self { template, pattern })
    }

    /// The raw template string.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Build the URL for a tile.
    pub fn url_for(&self, tile: &TileCoord) -> String {
        self.template
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
            .replace("{z}", &tile.z.to_string())
    }

    /// Extract the tile coordinates from a URL built from this template.
    ///
    /// Returns `None` for URLs that do not match or whose numbers overflow.
    pub fn parse(&self, url: &str) -> Option<TileCoord> {
        let captures = self.pattern.captures(url)?;
        let x = captures.name("x")?.as_str().parse().ok()?;
        let y = captures.name("y")?.as_str().parse().ok()?;
        let z = captures.name("z")?.as_str().parse().ok()?;
        Some(TileCoord::new(x, y, z))
    }
}

impl Default for TileUrlTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_TEMPLATE).expect("default template is valid")
    }
}

impl FromStr for TileUrlTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for TileUrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
