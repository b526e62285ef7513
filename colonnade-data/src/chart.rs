use colonnade_common::{color::Rgba, value::DataValue};
use serde::{Deserialize, Serialize};

use crate::schema::ColumnSchema;
use crate::selection::SelectionId;

/// One display-name/value pair of a data point's tooltip, in display
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipEntry {
    pub label: String,
    pub value: String,
}

impl TooltipEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Glyph drawn for a legend entry. The column chart family always uses
/// the box glyph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegendIcon {
    #[default]
    Box,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub icon: LegendIcon,
    pub color: Rgba,
    pub label: String,
    pub identity: SelectionId,
    pub selected: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendData {
    /// Present for dynamic series: the display name of the original,
    /// un-pivoted measure.
    pub title: Option<String>,
    pub entries: Vec<LegendEntry>,
    pub grouped: bool,
}

/// Data-label settings resolved for a series.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSettings {
    pub fill: Option<Rgba>,
    pub format: Option<String>,
}

/// One mark of the chart: a (category, series) cell, or one half of a
/// highlight-expanded pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDataPoint {
    pub category_value: DataValue,
    pub category_index: usize,
    pub series_index: usize,

    /// Plotted value; `None` for missing input, never `NaN`.
    pub value: Option<f64>,
    /// The highlighted sub-value carried by this cell, when any.
    pub highlight: Option<f64>,
    /// Whether this point is the highlight half of an expanded pair.
    pub is_highlight: bool,

    pub value_absolute: f64,
    /// Stack boundary on this point's own sign side.
    pub position: f64,

    /// Pre-normalization value/position/absolute, kept for reference in
    /// 100% mode. Identical to the plotted fields otherwise.
    pub original_value: Option<f64>,
    pub original_position: f64,
    pub original_value_absolute: f64,

    pub color: Rgba,
    pub selected: bool,
    pub identity: SelectionId,
    pub key: String,
    pub tooltip: Vec<TooltipEntry>,

    pub label_fill: Option<Rgba>,
    pub label_format: Option<String>,
}

/// One plotted series: a measure column, or one dynamic-series group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSeries {
    pub key: String,
    pub index: usize,
    pub label: String,
    pub identity: SelectionId,
    pub color: Rgba,
    pub labels: LabelSettings,
    pub data: Vec<ColumnDataPoint>,
}

/// The converter's output: everything the rendering, legend, axis, and
/// layout layers consume.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartData {
    pub series: Vec<ColumnSeries>,
    pub legend: LegendData,

    /// Category values by category index (a single null for the implicit
    /// category).
    pub categories: Vec<DataValue>,
    pub category_schema: Option<ColumnSchema>,

    pub has_highlights: bool,
    pub has_selection: bool,
    pub has_dynamic_series: bool,
    pub is_multi_measure: bool,
    pub scalar_category_axis: bool,

    /// Caller-requested category thickness, forwarded to the layout
    /// planner.
    pub category_thickness_hint: Option<f64>,
}

impl Default for ColumnSeries {
    fn default() -> Self {
        Self {
            key: String::new(),
            index: 0,
            label: String::new(),
            identity: SelectionId::default(),
            color: Rgba::new(0.0, 0.0, 0.0, 1.0),
            labels: LabelSettings::default(),
            data: Vec::new(),
        }
    }
}
