use colonnade_data::chart::ColumnSeries;

/// Tolerance for snapping 100%-stacked extremes to ±1.
///
/// Share accumulation can overshoot ±1 by a floating-point hair
/// (`0.75 + 0.25000001`); an extreme within this tolerance reports
/// exactly ±1, while one genuinely beyond it is preserved.
pub const HUNDRED_PERCENT_TOLERANCE: f64 = 1e-4;

/// Value-axis domain bounds for a stacked series set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
}

/// Two-sided running totals for one category of one layer.
#[derive(Debug, Default, Clone, Copy)]
struct StackTotals {
    positive: f64,
    negative: f64,
}

/// Compute the min/max value domain across all categories of a stacked
/// series set.
///
/// Operates purely on each point's stored `value`, so it can be invoked
/// standalone against synthetic series. Points are accumulated per
/// category in series order, non-negative and negative sides separately;
/// highlight-expanded points stack in their own layer so expansion never
/// double-counts a category. The zero baseline is always inside the
/// domain.
pub fn calc_value_domain(series: &[ColumnSeries], is_100_pct: bool) -> ValueDomain {
    let category_count = series
        .iter()
        .flat_map(|s| s.data.iter().map(|p| p.category_index + 1))
        .max()
        .unwrap_or(0);

    let mut base = vec![StackTotals::default(); category_count];
    let mut highlight = vec![StackTotals::default(); category_count];
    let mut min = 0.0_f64;
    let mut max = 0.0_f64;

    for s in series {
        for point in &s.data {
            let totals = if point.is_highlight {
                &mut highlight[point.category_index]
            } else {
                &mut base[point.category_index]
            };
            let value = point.value.unwrap_or(0.0);
            if value < 0.0 {
                totals.negative += value;
                min = min.min(totals.negative);
            } else {
                totals.positive += value;
                max = max.max(totals.positive);
            }
        }
    }

    if is_100_pct {
        if max > 1.0 && max - 1.0 <= HUNDRED_PERCENT_TOLERANCE {
            max = 1.0;
        }
        if min < -1.0 && -1.0 - min <= HUNDRED_PERCENT_TOLERANCE {
            min = -1.0;
        }
    }

    ValueDomain { min, max }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colonnade_data::chart::ColumnDataPoint;
    use colonnade_common::{color::Rgba, value::DataValue};
    use colonnade_data::selection::SelectionId;

    fn series_from_values(index: usize, values: &[Option<f64>]) -> ColumnSeries {
        let data = values
            .iter()
            .enumerate()
            .map(|(category_index, value)| ColumnDataPoint {
                category_value: DataValue::Number(category_index as f64),
                category_index,
                series_index: index,
                value: *value,
                highlight: None,
                is_highlight: false,
                value_absolute: value.unwrap_or(0.0).abs(),
                position: 0.0,
                original_value: *value,
                original_position: 0.0,
                original_value_absolute: value.unwrap_or(0.0).abs(),
                color: Rgba::new(0.0, 0.0, 0.0, 1.0),
                selected: false,
                identity: SelectionId::default(),
                key: format!("{}:{}", index, category_index),
                tooltip: Vec::new(),
                label_fill: None,
                label_format: None,
            })
            .collect();
        ColumnSeries {
            index,
            data,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_series_domain() {
        let series = vec![series_from_values(0, &[Some(100.0), Some(200.0)])];
        let domain = calc_value_domain(&series, false);
        assert_eq!(domain, ValueDomain { min: 0.0, max: 200.0 });
    }

    #[test]
    fn test_sign_split_domain() {
        let series = vec![series_from_values(0, &[Some(100.0), Some(-200.0)])];
        let domain = calc_value_domain(&series, false);
        assert_eq!(domain, ValueDomain { min: -200.0, max: 100.0 });
    }

    #[test]
    fn test_all_null_series_collapses_to_zero() {
        let series = vec![series_from_values(0, &[None, None, None])];
        let domain = calc_value_domain(&series, false);
        assert_eq!(domain, ValueDomain { min: 0.0, max: 0.0 });
    }

    #[test]
    fn test_hundred_percent_overshoot_clamps() {
        let series = vec![
            series_from_values(0, &[Some(0.5)]),
            series_from_values(1, &[Some(0.500001)]),
        ];
        let domain = calc_value_domain(&series, true);
        assert_eq!(domain.max, 1.0);

        let series = vec![
            series_from_values(0, &[Some(-0.75)]),
            series_from_values(1, &[Some(-0.25000001)]),
        ];
        let domain = calc_value_domain(&series, true);
        assert_eq!(domain.min, -1.0);
    }

    #[test]
    fn test_hundred_percent_genuine_excess_is_preserved() {
        let series = vec![
            series_from_values(0, &[Some(0.8)]),
            series_from_values(1, &[Some(0.4)]),
        ];
        let domain = calc_value_domain(&series, true);
        assert!((domain.max - 1.2).abs() < 1e-12);
    }
}
