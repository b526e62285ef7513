use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// An RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    /// Parse a CSS color string (named colors, `#rrggbb`, `rgb(...)`, etc).
    pub fn from_css(color: &str) -> Result<Self, csscolorparser::ParseColorError> {
        let c = csscolorparser::parse(color)?;
        Ok(Self([c.r as f32, c.g as f32, c.b as f32, c.a as f32]))
    }

    /// Hex form consumed by host legend/label components.
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.0;
        format!(
            "#{:02x}{:02x}{:02x}",
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8
        )
    }
}

impl Hash for Rgba {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0
            .iter()
            .for_each(|v| OrderedFloat::from(*v).hash(state));
    }
}
