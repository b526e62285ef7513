use colonnade_common::{color::Rgba, value::DataValue};

use crate::chart::{
    ChartData, ColumnDataPoint, ColumnSeries, LabelSettings, LegendData, LegendEntry, LegendIcon,
    TooltipEntry,
};
use crate::color::ColorAssigner;
use crate::error::ColonnadeDataError;
use crate::formatter::ValueFormatter;
use crate::schema::ColumnPurpose;
use crate::selection::{SelectionId, SelectionState};
use crate::view::{CategoricalView, CategoryColumn, SeriesGroup, SeriesGrouping, ValueColumn};

/// Tooltip display name attached to the highlighted half of an expanded
/// point.
pub const HIGHLIGHT_DISPLAY_NAME: &str = "Highlighted";

/// Caller-side knobs of a conversion.
#[derive(Debug, Default, Clone)]
pub struct ConvertOptions<'a> {
    /// Normalize each value to its share of the category's summed
    /// absolute values.
    pub is_100_pct: bool,
    /// Metadata-level color applied uniformly to every series without an
    /// explicit fill.
    pub default_color: Option<Rgba>,
    /// Format string used for measures that carry none of their own.
    pub shared_format: Option<String>,
    /// Requested per-category thickness, forwarded to the layout planner.
    pub category_thickness_hint: Option<f64>,
    /// Currently-selected identities from the host's selection service.
    pub selection: Option<&'a SelectionState>,
}

impl<'a> ConvertOptions<'a> {
    pub fn hundred_percent(mut self) -> Self {
        self.is_100_pct = true;
        self
    }

    pub fn with_default_color(mut self, color: Rgba) -> Self {
        self.default_color = Some(color);
        self
    }

    pub fn with_selection(mut self, selection: &'a SelectionState) -> Self {
        self.selection = Some(selection);
        self
    }
}

/// One series to be built: a measure column (static) or the plotted
/// column of one dynamic-series group.
struct SeriesDef<'a> {
    label: String,
    identity: SelectionId,
    color: Rgba,
    column: &'a ValueColumn,
    group: Option<&'a SeriesGroup>,
}

/// Two-sided running stack for one category: non-negative values
/// accumulate upward from zero, negative values downward.
#[derive(Debug, Default, Clone, Copy)]
struct StackSide {
    positive: f64,
    negative: f64,
}

impl StackSide {
    /// Accumulate one contribution and return the point's stack position:
    /// the inclusive non-negative total, or the negative-side boundary the
    /// point hangs from.
    fn push(&mut self, contribution: f64) -> f64 {
        if contribution < 0.0 {
            let boundary = self.negative;
            self.negative += contribution;
            boundary
        } else {
            self.positive += contribution;
            self.positive
        }
    }
}

/// Convert a categorical view into chart-ready series data.
///
/// Missing and non-finite values degrade per the chart's rules rather
/// than failing: `NaN` becomes a null point, infinities are clamped to
/// the largest representable magnitude. Only structurally impossible
/// views (mismatched parallel arrays) return an error.
pub fn convert(
    view: &CategoricalView,
    colors: &mut dyn ColorAssigner,
    formatter: &dyn ValueFormatter,
    options: &ConvertOptions,
) -> Result<ChartData, ColonnadeDataError> {
    let category = view.category.as_ref();
    let row_count = view.row_count();
    validate(view, row_count)?;

    let has_dynamic_series =
        view.values.grouping.is_some() && view.values.columns.iter().any(|c| c.group.is_some());
    let grouping = view.values.grouping.as_ref().filter(|_| has_dynamic_series);

    let defs = match grouping {
        Some(grouping) => dynamic_series_defs(view, grouping, colors, formatter, options)?,
        None => static_series_defs(view, colors, options)?,
    };

    let gradient_columns: Vec<&ValueColumn> = view
        .values
        .columns
        .iter()
        .filter(|c| c.schema.purpose() == ColumnPurpose::GradientOnly)
        .collect();

    // Category and series drawn from the same column: off-diagonal cells
    // are synthesized null points that keep only the category tooltip.
    let is_cross_join = match (category, grouping) {
        (Some(category), Some(grouping)) => {
            category.schema.query_name.is_some()
                && category.schema.query_name == grouping.group_schema.query_name
        }
        _ => false,
    };

    let selection = options.selection.filter(|s| !s.is_empty());
    let legend = build_legend(&defs, grouping, selection);
    let is_multi_measure = !has_dynamic_series && defs.len() > 1;
    let has_highlights = defs.iter().any(|d| d.column.highlights.is_some());
    let scalar_category_axis =
        category.map(|c| c.schema.data_type.is_scalar()).unwrap_or(false);

    if row_count == 0 {
        let has_selection = legend.entries.iter().any(|e| e.selected);
        return Ok(ChartData {
            series: Vec::new(),
            legend,
            categories: Vec::new(),
            category_schema: category.map(|c| c.schema.clone()),
            has_highlights: false,
            has_selection,
            has_dynamic_series,
            is_multi_measure,
            scalar_category_axis,
            category_thickness_hint: options.category_thickness_hint,
        });
    }

    // 100% mode normalizes against the summed absolute full values at
    // each category; a zero-sum category yields zero shares throughout.
    let category_totals: Vec<f64> = if options.is_100_pct {
        let mut totals = vec![0.0; row_count];
        for def in &defs {
            for (row, total) in totals.iter_mut().enumerate() {
                if let Some(v) = clamp_non_finite(def.column.values.get(row).copied().flatten()) {
                    *total += v.abs();
                }
            }
        }
        totals
    } else {
        Vec::new()
    };

    let mut base = vec![StackSide::default(); row_count];
    let mut base_original = vec![StackSide::default(); row_count];
    let mut highlight_layer = vec![StackSide::default(); row_count];
    let mut highlight_original = vec![StackSide::default(); row_count];

    let mut series = Vec::with_capacity(defs.len());
    let mut any_point_selected = false;

    for (series_index, def) in defs.iter().enumerate() {
        let expanded = def.column.highlights.is_some();
        let mut data = Vec::with_capacity(row_count * if expanded { 2 } else { 1 });
        let labels = series_label_settings(def)?;

        for row in 0..row_count {
            let value = clamp_non_finite(def.column.values.get(row).copied().flatten());
            let highlight = clamp_non_finite(
                def.column
                    .highlights
                    .as_ref()
                    .and_then(|h| h.get(row).copied().flatten()),
            );

            let (plot_value, plot_highlight) = if options.is_100_pct {
                let total = category_totals[row];
                (
                    value.map(|v| share(v, total)),
                    highlight.map(|v| share(v, total)),
                )
            } else {
                (value, highlight)
            };

            let position = base[row].push(plot_value.unwrap_or(0.0));
            let original_position = if options.is_100_pct {
                base_original[row].push(value.unwrap_or(0.0))
            } else {
                position
            };

            let category_value = category
                .map(|c| c.values[row].clone())
                .unwrap_or(DataValue::Null);
            let identity = point_identity(category, row, def);
            let selected = selection.is_some_and(|s| s.contains(&identity));
            any_point_selected |= selected;
            let color = point_color(def, category, row, !has_dynamic_series && defs.len() == 1)?;

            let tooltip = build_tooltip(TooltipInputs {
                category,
                row,
                def,
                grouping,
                gradient_columns: &gradient_columns,
                full_value: value,
                highlight_entry: None,
                shared_format: options.shared_format.as_deref(),
                formatter,
                is_cross_join,
            });

            data.push(ColumnDataPoint {
                category_value: category_value.clone(),
                category_index: row,
                series_index,
                value: plot_value,
                highlight: plot_highlight,
                is_highlight: false,
                value_absolute: plot_value.unwrap_or(0.0).abs(),
                position,
                original_value: value,
                original_position,
                original_value_absolute: value.unwrap_or(0.0).abs(),
                color,
                selected,
                key: identity.key(),
                identity: identity.clone(),
                tooltip,
                label_fill: labels.fill,
                label_format: labels.format.clone(),
            });

            if expanded {
                let position = highlight_layer[row].push(plot_highlight.unwrap_or(0.0));
                let original_position = if options.is_100_pct {
                    highlight_original[row].push(highlight.unwrap_or(0.0))
                } else {
                    position
                };
                let tooltip = build_tooltip(TooltipInputs {
                    category,
                    row,
                    def,
                    grouping,
                    gradient_columns: &gradient_columns,
                    full_value: value,
                    highlight_entry: highlight,
                    shared_format: options.shared_format.as_deref(),
                    formatter,
                    is_cross_join,
                });

                data.push(ColumnDataPoint {
                    category_value,
                    category_index: row,
                    series_index,
                    value: plot_highlight,
                    highlight: plot_highlight,
                    is_highlight: true,
                    value_absolute: plot_highlight.unwrap_or(0.0).abs(),
                    position,
                    original_value: highlight,
                    original_position,
                    original_value_absolute: highlight.unwrap_or(0.0).abs(),
                    color,
                    selected,
                    key: format!("{};highlight", identity.key()),
                    identity,
                    tooltip,
                    label_fill: labels.fill,
                    label_format: labels.format.clone(),
                });
            }
        }

        series.push(ColumnSeries {
            key: def.identity.key(),
            index: series_index,
            label: def.label.clone(),
            identity: def.identity.clone(),
            color: def.color,
            labels,
            data,
        });
    }

    let has_selection = any_point_selected || legend.entries.iter().any(|e| e.selected);
    let categories = category
        .map(|c| c.values.clone())
        .unwrap_or_else(|| vec![DataValue::Null; row_count]);

    Ok(ChartData {
        series,
        legend,
        categories,
        category_schema: category.map(|c| c.schema.clone()),
        has_highlights,
        has_selection,
        has_dynamic_series,
        is_multi_measure,
        scalar_category_axis,
        category_thickness_hint: options.category_thickness_hint,
    })
}

fn validate(view: &CategoricalView, row_count: usize) -> Result<(), ColonnadeDataError> {
    if let Some(category) = &view.category {
        if let Some(identities) = &category.identities {
            if identities.len() != category.values.len() {
                return Err(ColonnadeDataError::IdentityLengthMismatch {
                    identity_len: identities.len(),
                    value_len: category.values.len(),
                });
            }
        }
    }
    for column in &view.values.columns {
        if view.category.is_some() && column.values.len() != row_count {
            return Err(ColonnadeDataError::ValueLengthMismatch {
                column: column.schema.label(),
                value_len: column.values.len(),
                category_len: row_count,
            });
        }
        if let Some(highlights) = &column.highlights {
            if highlights.len() != column.values.len() {
                return Err(ColonnadeDataError::HighlightLengthMismatch {
                    column: column.schema.label(),
                    highlight_len: highlights.len(),
                    value_len: column.values.len(),
                });
            }
        }
    }
    Ok(())
}

/// Missing values stay missing, `NaN` becomes missing, and infinities
/// clamp to the largest representable magnitude so downstream stacking
/// and domain math never see a non-finite number.
fn clamp_non_finite(value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if v.is_nan() => None,
        Some(v) if v == f64::INFINITY => Some(f64::MAX),
        Some(v) if v == f64::NEG_INFINITY => Some(f64::MIN),
        other => other,
    }
}

fn share(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        value / total
    }
}

fn static_series_defs<'a>(
    view: &'a CategoricalView,
    colors: &mut dyn ColorAssigner,
    options: &ConvertOptions,
) -> Result<Vec<SeriesDef<'a>>, ColonnadeDataError> {
    let mut defs = Vec::new();
    let plotted = view
        .values
        .columns
        .iter()
        .filter(|c| c.schema.purpose() == ColumnPurpose::PlottedMeasure);
    for (index, column) in plotted.enumerate() {
        let label = column.schema.label();
        let measure = column
            .schema
            .query_name
            .clone()
            .unwrap_or_else(|| label.clone());
        let color = match column.schema.style.as_ref().and_then(|s| s.fill.as_deref()) {
            Some(fill) => Rgba::from_css(fill)?,
            None => match options.default_color {
                Some(color) => color,
                None => colors.color_by_index(index),
            },
        };
        defs.push(SeriesDef {
            label,
            identity: SelectionId::for_measure(measure),
            color,
            column,
            group: None,
        });
    }
    Ok(defs)
}

fn dynamic_series_defs<'a>(
    view: &'a CategoricalView,
    grouping: &SeriesGrouping,
    colors: &mut dyn ColorAssigner,
    formatter: &dyn ValueFormatter,
    options: &ConvertOptions,
) -> Result<Vec<SeriesDef<'a>>, ColonnadeDataError> {
    let scale_key = grouping
        .group_schema
        .query_name
        .clone()
        .unwrap_or_else(|| grouping.group_schema.label());
    let mut defs = Vec::new();
    for (group, columns) in view.values.grouped() {
        // One series per distinct group; the group's first plotted column
        // carries it.
        let Some(column) = columns
            .into_iter()
            .find(|c| c.schema.purpose() == ColumnPurpose::PlottedMeasure)
        else {
            continue;
        };
        let label = formatter.format_value(&group.value, grouping.group_schema.format.as_deref());
        let color = match group.fill.as_deref() {
            Some(fill) => Rgba::from_css(fill)?,
            None => match options.default_color {
                Some(color) => color,
                None => colors.group_color(&scale_key, &group.value),
            },
        };
        defs.push(SeriesDef {
            label,
            identity: SelectionId::for_series(group.identity.clone()),
            color,
            column,
            group: Some(group),
        });
    }
    Ok(defs)
}

fn point_identity(
    category: Option<&CategoryColumn>,
    row: usize,
    def: &SeriesDef,
) -> SelectionId {
    let mut id = def.identity.clone();
    if let Some(identity) = category.and_then(|c| c.identity(row)) {
        id.category = Some(identity.clone());
    }
    if id.measure.is_none() {
        id.measure = def.column.schema.query_name.clone();
    }
    id
}

/// Per-category fill overrides apply only in the single-measure,
/// non-grouped case; everything else inherits the series color.
fn point_color(
    def: &SeriesDef,
    category: Option<&CategoryColumn>,
    row: usize,
    single_static_measure: bool,
) -> Result<Rgba, ColonnadeDataError> {
    if single_static_measure {
        if let Some(fill) = category.and_then(|c| c.fill(row)) {
            return Ok(Rgba::from_css(fill)?);
        }
    }
    Ok(def.color)
}

fn series_label_settings(def: &SeriesDef) -> Result<LabelSettings, ColonnadeDataError> {
    let fill = match def
        .column
        .schema
        .style
        .as_ref()
        .and_then(|s| s.label_color.as_deref())
    {
        Some(color) => Some(Rgba::from_css(color)?),
        None => None,
    };
    Ok(LabelSettings {
        fill,
        format: def.column.schema.format.clone(),
    })
}

struct TooltipInputs<'a> {
    category: Option<&'a CategoryColumn>,
    row: usize,
    def: &'a SeriesDef<'a>,
    grouping: Option<&'a SeriesGrouping>,
    gradient_columns: &'a [&'a ValueColumn],
    /// The cell's full (pre-normalization, clamped) value.
    full_value: Option<f64>,
    /// Set on the highlight half when the highlight is non-null,
    /// including a legitimate zero.
    highlight_entry: Option<f64>,
    shared_format: Option<&'a str>,
    formatter: &'a dyn ValueFormatter,
    is_cross_join: bool,
}

fn build_tooltip(inputs: TooltipInputs) -> Vec<TooltipEntry> {
    let mut entries = Vec::new();

    if let Some(category) = inputs.category {
        entries.push(TooltipEntry::new(
            category.schema.label(),
            inputs.formatter.format_value(
                &category.values[inputs.row],
                category.schema.format.as_deref(),
            ),
        ));
    }

    // Synthesized off-diagonal cells of a self-cross-join keep only the
    // category entry.
    if inputs.is_cross_join && inputs.full_value.is_none() {
        return entries;
    }

    if let (Some(grouping), Some(_)) = (inputs.grouping, inputs.def.group) {
        entries.push(TooltipEntry::new(
            grouping.group_schema.label(),
            inputs.def.label.clone(),
        ));
    }

    let measure_format = inputs
        .def
        .column
        .schema
        .format
        .as_deref()
        .or(inputs.shared_format);
    if let Some(value) = inputs.full_value {
        entries.push(TooltipEntry::new(
            inputs.def.column.schema.label(),
            inputs.formatter.format_number(value, measure_format),
        ));
    }

    for column in inputs.gradient_columns {
        if let Some(Some(v)) = column.values.get(inputs.row) {
            entries.push(TooltipEntry::new(
                column.schema.label(),
                inputs
                    .formatter
                    .format_number(*v, column.schema.format.as_deref()),
            ));
        }
    }

    if let Some(highlight) = inputs.highlight_entry {
        entries.push(TooltipEntry::new(
            HIGHLIGHT_DISPLAY_NAME,
            inputs.formatter.format_number(highlight, measure_format),
        ));
    }

    entries
}

fn build_legend(
    defs: &[SeriesDef],
    grouping: Option<&SeriesGrouping>,
    selection: Option<&SelectionState>,
) -> LegendData {
    let entries = defs
        .iter()
        .map(|def| LegendEntry {
            icon: LegendIcon::Box,
            color: def.color,
            label: def.label.clone(),
            identity: def.identity.clone(),
            selected: selection.is_some_and(|s| s.contains(&def.identity)),
        })
        .collect();
    LegendData {
        title: grouping.map(|g| g.source_schema.label()),
        entries,
        grouped: grouping.is_some(),
    }
}
