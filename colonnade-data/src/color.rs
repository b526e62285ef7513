use colonnade_common::{color::Rgba, value::DataValue};
use indexmap::IndexMap;

/// Default categorical palette, in assignment order.
pub const DEFAULT_PALETTE: [Rgba; 10] = [
    Rgba::new(0.004, 0.722, 0.667, 1.0),
    Rgba::new(0.216, 0.275, 0.333, 1.0),
    Rgba::new(0.984, 0.392, 0.161, 1.0),
    Rgba::new(0.851, 0.318, 0.475, 1.0),
    Rgba::new(0.455, 0.337, 0.631, 1.0),
    Rgba::new(0.000, 0.537, 0.655, 1.0),
    Rgba::new(0.847, 0.604, 0.055, 1.0),
    Rgba::new(0.537, 0.420, 0.247, 1.0),
    Rgba::new(0.867, 0.529, 0.604, 1.0),
    Rgba::new(0.471, 0.541, 0.180, 1.0),
];

/// Deterministic color assignment for series and dynamic-series groups.
///
/// `group_color` maintains one color scale per grouping key, so repeated
/// conversions over the same grouping hand the same group the same color.
/// The scale store is owned by the caller and injected per conversion;
/// there is no module-level state.
pub trait ColorAssigner {
    /// Color for a flat series index.
    fn color_by_index(&self, index: usize) -> Rgba;

    /// Color for a group value under the stable scale identified by
    /// `scale_key`.
    fn group_color(&mut self, scale_key: &str, value: &DataValue) -> Rgba;
}

/// Palette-backed assigner with an explicit keyed scale store.
#[derive(Debug, Clone)]
pub struct PaletteColorAssigner {
    palette: Vec<Rgba>,
    scales: IndexMap<String, IndexMap<DataValue, Rgba>>,
}

impl Default for PaletteColorAssigner {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.to_vec())
    }
}

impl PaletteColorAssigner {
    pub fn new(palette: Vec<Rgba>) -> Self {
        Self {
            palette,
            scales: IndexMap::new(),
        }
    }
}

impl ColorAssigner for PaletteColorAssigner {
    fn color_by_index(&self, index: usize) -> Rgba {
        self.palette[index % self.palette.len()]
    }

    fn group_color(&mut self, scale_key: &str, value: &DataValue) -> Rgba {
        let scale = self.scales.entry(scale_key.to_string()).or_default();
        if let Some(color) = scale.get(value) {
            return *color;
        }
        let color = self.palette[scale.len() % self.palette.len()];
        scale.insert(value.clone(), color);
        color
    }
}
