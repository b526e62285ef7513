use colonnade_data::chart::ChartData;
use indexmap::IndexMap;
use itertools::Itertools;

use crate::error::ColonnadeScaleError;

/// Smallest drawable per-category thickness on an ordinal axis.
pub const MIN_ORDINAL_RECT_THICKNESS: f64 = 20.0;
/// Smallest drawable per-category thickness on a scalar axis.
pub const MIN_SCALAR_RECT_THICKNESS: f64 = 2.0;
/// Largest per-category thickness.
pub const MAX_RECT_THICKNESS: f64 = 180.0;

/// Outer padding reserved at the axis ends, as a ratio of one category's
/// thickness.
pub const OUTER_PADDING_RATIO: f64 = 0.4;
/// Outer padding for a single category.
pub const SINGLE_CATEGORY_OUTER_PADDING_RATIO: f64 = 1.4;
/// Outer padding once the category count reaches the dense threshold.
pub const DENSE_OUTER_PADDING_RATIO: f64 = 0.5;
/// Raw category count at which the ordinal axis switches to dense
/// padding.
pub const DENSE_CATEGORY_THRESHOLD: usize = 50;

/// Hard cap on categories rendered in one view.
pub const MAX_CATEGORIES_PER_VIEW: usize = 1000;

/// Inputs to the layout decision.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Plot-area extent along the category axis, in pixels.
    pub available_width: f64,
    /// Number of categories in the data, before any truncation.
    pub category_count: usize,
    /// Category-axis domain for scalar axes (numeric values or millisecond
    /// timestamps). Derived from the data when absent.
    pub domain: Option<(f64, f64)>,
    pub is_scalar: bool,
    /// Whether an ordinal axis may drop categories to keep the thickness
    /// floor; when false the floor wins and the view overflows.
    pub trim_on_overflow: bool,
    /// Caller-forced thickness; bypasses the derived thickness.
    pub forced_thickness: Option<f64>,
}

impl LayoutOptions {
    pub fn new(available_width: f64, category_count: usize) -> Self {
        Self {
            available_width,
            category_count,
            domain: None,
            is_scalar: false,
            trim_on_overflow: true,
            forced_thickness: None,
        }
    }

    pub fn scalar(mut self) -> Self {
        self.is_scalar = true;
        self
    }

    pub fn with_domain(mut self, min: f64, max: f64) -> Self {
        self.domain = Some((min, max));
        self
    }
}

/// The planned category geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLayout {
    /// Categories that fit the view; at most the input count.
    pub category_count: usize,
    /// Pixel extent allotted to one category.
    pub category_thickness: f64,
    pub outer_padding_ratio: f64,
    pub is_scalar: bool,
}

/// Decide how many categories fit the available width, how thick each
/// category's mark is, and the outer padding ratio.
///
/// Ordinal axes divide the width per category; scalar (numeric/temporal)
/// axes derive thickness from the smallest adjacent gap between category
/// positions so unevenly clustered values do not collide. Either way a
/// too-small thickness triggers down-sampling of the category count.
pub fn category_layout(
    data: &ChartData,
    options: &LayoutOptions,
) -> Result<CategoryLayout, ColonnadeScaleError> {
    if options.available_width <= 0.0 {
        return Err(ColonnadeScaleError::NonPositiveWidth(
            options.available_width,
        ));
    }

    let raw_count = options.category_count.min(MAX_CATEGORIES_PER_VIEW);
    if raw_count == 0 {
        return Ok(CategoryLayout {
            category_count: 0,
            category_thickness: MIN_ORDINAL_RECT_THICKNESS,
            outer_padding_ratio: OUTER_PADDING_RATIO,
            is_scalar: options.is_scalar,
        });
    }

    let outer = outer_padding_ratio(raw_count, options.is_scalar);
    let forced = options.forced_thickness.or(data.category_thickness_hint);

    if options.is_scalar {
        Ok(scalar_layout(data, raw_count, outer, forced, options))
    } else {
        Ok(ordinal_layout(raw_count, outer, forced, options))
    }
}

/// The padding table: a lone category gets generous padding, dense views
/// get the dense ratio, everything else (and every scalar axis) the
/// standard one. Keyed by the raw, pre-truncation count.
fn outer_padding_ratio(raw_count: usize, is_scalar: bool) -> f64 {
    if raw_count == 1 {
        SINGLE_CATEGORY_OUTER_PADDING_RATIO
    } else if is_scalar {
        OUTER_PADDING_RATIO
    } else if raw_count >= DENSE_CATEGORY_THRESHOLD {
        DENSE_OUTER_PADDING_RATIO
    } else {
        OUTER_PADDING_RATIO
    }
}

/// Categories that fit the width at the given thickness, leaving room for
/// the outer padding on both ends. Tolerates division noise so an exact
/// fit is not floored away.
fn fitting_count(width: f64, thickness: f64, outer: f64) -> usize {
    ((width / thickness - 2.0 * outer + 1e-9).floor().max(1.0)) as usize
}

fn ordinal_layout(
    raw_count: usize,
    outer: f64,
    forced: Option<f64>,
    options: &LayoutOptions,
) -> CategoryLayout {
    let width = options.available_width;

    if let Some(forced) = forced {
        let thickness = forced.clamp(MIN_ORDINAL_RECT_THICKNESS, MAX_RECT_THICKNESS);
        return CategoryLayout {
            category_count: raw_count.min(fitting_count(width, thickness, outer)),
            category_thickness: thickness,
            outer_padding_ratio: outer,
            is_scalar: false,
        };
    }

    let mut count = raw_count;
    let mut thickness = width / (count as f64 + 2.0 * outer);
    if thickness < MIN_ORDINAL_RECT_THICKNESS && options.trim_on_overflow {
        count = count.min(fitting_count(width, MIN_ORDINAL_RECT_THICKNESS, outer));
        thickness = width / (count as f64 + 2.0 * outer);
    }
    let thickness = thickness.clamp(MIN_ORDINAL_RECT_THICKNESS, MAX_RECT_THICKNESS);

    CategoryLayout {
        category_count: count,
        category_thickness: thickness,
        outer_padding_ratio: outer,
        is_scalar: false,
    }
}

fn scalar_layout(
    data: &ChartData,
    raw_count: usize,
    outer: f64,
    forced: Option<f64>,
    options: &LayoutOptions,
) -> CategoryLayout {
    let width = options.available_width;
    let positions = scalar_positions(data);

    let count_based = width / (raw_count as f64 + 2.0 * outer);
    let gap_based = min_adjacent_gap(&positions).and_then(|gap| {
        let (domain_min, domain_max) = options.domain.or_else(|| {
            Some((*positions.first()?, *positions.last()?))
        })?;
        let span = domain_max - domain_min;
        (span > 0.0).then(|| width * (gap / span))
    });

    let thickness = match forced {
        Some(forced) => forced,
        None => gap_based.map_or(count_based, |g| g.min(count_based)),
    };
    let thickness = thickness.clamp(MIN_SCALAR_RECT_THICKNESS, MAX_RECT_THICKNESS);

    CategoryLayout {
        category_count: raw_count.min(fitting_count(width, thickness, outer)),
        category_thickness: thickness,
        outer_padding_ratio: outer,
        is_scalar: true,
    }
}

/// Sorted, distinct axis positions of the data's categories.
///
/// Points are de-duplicated by category index first, so highlight
/// expansion (two points per category) cannot artificially halve the
/// perceived interval.
fn scalar_positions(data: &ChartData) -> Vec<f64> {
    let mut by_index: IndexMap<usize, f64> = IndexMap::new();
    for series in &data.series {
        for point in &series.data {
            if let Some(position) = point.category_value.as_f64() {
                by_index.entry(point.category_index).or_insert(position);
            }
        }
    }

    let mut positions: Vec<f64> = if by_index.is_empty() {
        data.categories.iter().filter_map(|v| v.as_f64()).collect()
    } else {
        by_index.into_values().collect()
    };

    positions.sort_by(f64::total_cmp);
    positions.dedup_by(|a, b| a == b);
    positions
}

fn min_adjacent_gap(positions: &[f64]) -> Option<f64> {
    positions
        .iter()
        .tuple_windows()
        .map(|(a, b)| b - a)
        .fold(None, |acc: Option<f64>, gap| {
            Some(acc.map_or(gap, |m| m.min(gap)))
        })
}
