use colonnade_common::value::DataValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::ColumnSchema;
use crate::selection::RowIdentity;

/// The category column of a view: one value per row plus optional per-row
/// identities and style overrides, all parallel arrays.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryColumn {
    pub schema: ColumnSchema,
    pub values: Vec<DataValue>,
    pub identities: Option<Vec<RowIdentity>>,
    /// Per-row explicit fill overrides (CSS strings).
    pub fills: Option<Vec<Option<String>>>,
}

impl CategoryColumn {
    pub fn new(schema: ColumnSchema, values: Vec<DataValue>) -> Self {
        Self {
            schema,
            values,
            ..Default::default()
        }
    }

    pub fn with_identities(mut self, identities: Vec<RowIdentity>) -> Self {
        self.identities = Some(identities);
        self
    }

    pub fn with_fills(mut self, fills: Vec<Option<String>>) -> Self {
        self.fills = Some(fills);
        self
    }

    pub fn identity(&self, row: usize) -> Option<&RowIdentity> {
        self.identities.as_ref().and_then(|ids| ids.get(row))
    }

    pub fn fill(&self, row: usize) -> Option<&str> {
        self.fills
            .as_ref()
            .and_then(|fills| fills.get(row))
            .and_then(|fill| fill.as_deref())
    }
}

/// The dynamic-series group one value column was pivoted out of.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesGroup {
    pub value: DataValue,
    pub identity: RowIdentity,
    /// Explicit fill override (CSS string) for this group.
    pub fill: Option<String>,
}

impl SeriesGroup {
    pub fn new(value: impl Into<DataValue>, identity: impl Into<RowIdentity>) -> Self {
        Self {
            value: value.into(),
            identity: identity.into(),
            fill: None,
        }
    }

    pub fn with_fill(mut self, fill: &str) -> Self {
        self.fill = Some(fill.to_string());
        self
    }
}

/// One measure column: a nullable value per row, an optional parallel
/// highlight array, and optional aggregate hints.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueColumn {
    pub schema: ColumnSchema,
    pub values: Vec<Option<f64>>,
    pub highlights: Option<Vec<Option<f64>>>,
    pub group: Option<SeriesGroup>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub subtotal: Option<f64>,
}

impl ValueColumn {
    pub fn new(schema: ColumnSchema, values: Vec<Option<f64>>) -> Self {
        Self {
            schema,
            values,
            ..Default::default()
        }
    }

    pub fn with_highlights(mut self, highlights: Vec<Option<f64>>) -> Self {
        self.highlights = Some(highlights);
        self
    }

    pub fn with_group(mut self, group: SeriesGroup) -> Self {
        self.group = Some(group);
        self
    }
}

/// Declaration that the value columns were pivoted out of a grouping
/// expression: the group-by column plus the original, un-pivoted measure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesGrouping {
    pub group_schema: ColumnSchema,
    pub source_schema: ColumnSchema,
}

/// The value-column set of a view, optionally dynamically grouped.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueColumns {
    pub columns: Vec<ValueColumn>,
    pub grouping: Option<SeriesGrouping>,
}

impl ValueColumns {
    /// Columns bucketed by dynamic-series group identity, in first-seen
    /// order. Columns without a group are skipped.
    pub fn grouped(&self) -> Vec<(&SeriesGroup, Vec<&ValueColumn>)> {
        let mut groups: IndexMap<&RowIdentity, (&SeriesGroup, Vec<&ValueColumn>)> =
            IndexMap::new();
        for column in &self.columns {
            if let Some(group) = &column.group {
                groups
                    .entry(&group.identity)
                    .or_insert_with(|| (group, Vec::new()))
                    .1
                    .push(column);
            }
        }
        groups.into_values().collect()
    }
}

/// A categorical data view: zero-or-one category column and one-or-more
/// value columns. The converter's sole data input; never mutated.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoricalView {
    pub category: Option<CategoryColumn>,
    pub values: ValueColumns,
}

impl CategoricalView {
    pub fn new(category: Option<CategoryColumn>, columns: Vec<ValueColumn>) -> Self {
        Self {
            category,
            values: ValueColumns {
                columns,
                grouping: None,
            },
        }
    }

    pub fn with_grouping(mut self, grouping: SeriesGrouping) -> Self {
        self.values.grouping = Some(grouping);
        self
    }

    /// Number of category rows; the implicit single category when the
    /// category column is absent.
    pub fn row_count(&self) -> usize {
        match &self.category {
            Some(category) => category.values.len(),
            None => self
                .values
                .columns
                .iter()
                .map(|c| c.values.len())
                .max()
                .unwrap_or(0),
        }
    }
}
