use colonnade_common::value::DataValue;
use serde::{Deserialize, Serialize};
use strum::VariantNames;

/// Semantic type of a column, used to pick the category-axis regime.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, VariantNames,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ColumnDataType {
    #[default]
    Text,
    Numeric,
    DateTime,
    Bool,
}

impl ColumnDataType {
    /// Whether values of this type live on a continuous (scalar) axis.
    pub fn is_scalar(&self) -> bool {
        matches!(self, ColumnDataType::Numeric | ColumnDataType::DateTime)
    }
}

/// Declared semantic roles of a column in the visual's field wells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleSet {
    pub y: bool,
    pub gradient: bool,
    pub series: bool,
    pub category: bool,
}

/// Classification of a column computed once from its role set, so the
/// gradient-exclusion rule is applied identically during series, point,
/// and tooltip construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPurpose {
    /// Plotted as a series of data points.
    PlottedMeasure,
    /// Color-intensity input only; never a series, tooltip-only.
    GradientOnly,
    /// Defines dynamic-series membership.
    SeriesDefining,
    /// Category axis input.
    Categorical,
}

impl RoleSet {
    pub fn y() -> Self {
        Self {
            y: true,
            ..Default::default()
        }
    }

    pub fn gradient() -> Self {
        Self {
            gradient: true,
            ..Default::default()
        }
    }

    pub fn purpose(&self, is_measure: bool) -> ColumnPurpose {
        if self.gradient && !self.y {
            ColumnPurpose::GradientOnly
        } else if self.y || is_measure {
            ColumnPurpose::PlottedMeasure
        } else if self.series {
            ColumnPurpose::SeriesDefining
        } else {
            ColumnPurpose::Categorical
        }
    }
}

/// Explicit styling attached to a column by the host.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnStyle {
    /// Explicit fill color (CSS string) for the column's series.
    pub fill: Option<String>,
    /// Label text color (CSS string).
    pub label_color: Option<String>,
}

/// Metadata describing one column of the tabular view.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnSchema {
    /// Display name as delivered by the host; may legitimately be null or
    /// a boolean, which the placeholder rule turns into "(Blank)"/"False".
    pub display_name: DataValue,
    pub query_name: Option<String>,
    pub data_type: ColumnDataType,
    pub format: Option<String>,
    pub is_measure: bool,
    pub roles: RoleSet,
    pub style: Option<ColumnStyle>,
}

impl ColumnSchema {
    /// A measure column with the given display name.
    pub fn measure(name: &str) -> Self {
        Self {
            display_name: name.into(),
            query_name: Some(name.to_string()),
            data_type: ColumnDataType::Numeric,
            is_measure: true,
            roles: RoleSet::y(),
            ..Default::default()
        }
    }

    /// A category column with the given display name and type.
    pub fn category(name: &str, data_type: ColumnDataType) -> Self {
        Self {
            display_name: name.into(),
            query_name: Some(name.to_string()),
            data_type,
            roles: RoleSet {
                category: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn with_roles(mut self, roles: RoleSet) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_fill(mut self, fill: &str) -> Self {
        let mut style = self.style.take().unwrap_or_default();
        style.fill = Some(fill.to_string());
        self.style = Some(style);
        self
    }

    /// Display label with the placeholder rule applied.
    pub fn label(&self) -> String {
        self.display_name.label()
    }

    pub fn purpose(&self) -> ColumnPurpose {
        self.roles.purpose(self.is_measure)
    }
}
