use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opaque stable identity assigned by the host to one row or one
/// dynamic-series group. Round-trips through the host's selection service
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowIdentity(pub String);

impl From<&str> for RowIdentity {
    fn from(value: &str) -> Self {
        RowIdentity(value.to_string())
    }
}

impl From<String> for RowIdentity {
    fn from(value: String) -> Self {
        RowIdentity(value)
    }
}

/// Stable identity of a data point, series, or legend entry, assembled
/// from the category row identity, the measure query name, and the
/// dynamic-series group identity.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionId {
    pub category: Option<RowIdentity>,
    pub series: Option<RowIdentity>,
    pub measure: Option<String>,
}

impl SelectionId {
    pub fn for_measure(measure: impl Into<String>) -> Self {
        Self {
            measure: Some(measure.into()),
            ..Default::default()
        }
    }

    pub fn for_series(series: impl Into<RowIdentity>) -> Self {
        Self {
            series: Some(series.into()),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<RowIdentity>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_measure(mut self, measure: impl Into<String>) -> Self {
        self.measure = Some(measure.into());
        self
    }

    /// Deterministic string key. Two ids built from the same
    /// (category, series, measure) triple always produce the same key.
    pub fn key(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(category) = &self.category {
            parts.push(format!("c={}", category.0));
        }
        if let Some(series) = &self.series {
            parts.push(format!("s={}", series.0));
        }
        if let Some(measure) = &self.measure {
            parts.push(format!("m={}", measure));
        }
        parts.join(";")
    }

    /// The measure-only projection of this identity, used for the looser
    /// selection match on measure-scoped selections.
    pub fn measure_only(&self) -> Option<SelectionId> {
        self.measure.as_ref().map(|m| SelectionId::for_measure(m.clone()))
    }
}

/// The set of currently-selected identities, owned by the host's
/// selection service. Read-only here: the converter marks matches, it
/// never mutates the set.
#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    keys: HashSet<String>,
}

impl SelectionState {
    pub fn from_ids<'a>(ids: impl IntoIterator<Item = &'a SelectionId>) -> Self {
        Self {
            keys: ids.into_iter().map(SelectionId::key).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// A point or series matches when its full key is selected, or when a
    /// measure-scoped selection covers its measure.
    pub fn contains(&self, id: &SelectionId) -> bool {
        if self.keys.contains(&id.key()) {
            return true;
        }
        id.measure_only()
            .is_some_and(|m| m != *id && self.keys.contains(&m.key()))
    }
}
