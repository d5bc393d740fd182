//! Board configuration.

use crate::diagram::TOKEN_HIT_RADIUS;
use crate::gesture::DegenerateLinePolicy;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Board configuration. Missing fields take their defaults when loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Radius around a token's position that starts a drag.
    pub hit_radius: f64,
    pub degenerate_lines: DegenerateLinePolicy,
    /// Initial active line color, as RGBA channels in [0, 1].
    pub default_line_color: [f32; 4],
    /// Seed new and reset boards with the default formation.
    pub starting_formation: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            hit_radius: TOKEN_HIT_RADIUS,
            degenerate_lines: DegenerateLinePolicy::Commit,
            default_line_color: Color::BLACK.components,
            starting_formation: false,
        }
    }
}

impl BoardConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn line_color(&self) -> Color {
        Color::new(self.default_line_color)
    }
}
