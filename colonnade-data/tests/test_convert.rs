use colonnade_common::{color::Rgba, value::DataValue};
use colonnade_data::chart::ChartData;
use colonnade_data::color::{ColorAssigner, PaletteColorAssigner, DEFAULT_PALETTE};
use colonnade_data::convert::{convert, ConvertOptions};
use colonnade_data::error::ColonnadeDataError;
use colonnade_data::formatter::DefaultFormatter;
use colonnade_data::schema::{ColumnDataType, ColumnSchema, RoleSet};
use colonnade_data::view::{CategoricalView, CategoryColumn, ValueColumn};

fn year_category(years: &[i32]) -> CategoryColumn {
    CategoryColumn::new(
        ColumnSchema::category("Year", ColumnDataType::Numeric),
        years.iter().map(|y| DataValue::from(*y)).collect(),
    )
}

fn run(view: &CategoricalView) -> ChartData {
    run_with_options(view, &ConvertOptions::default())
}

fn run_with_options(view: &CategoricalView, options: &ConvertOptions) -> ChartData {
    let mut colors = PaletteColorAssigner::default();
    convert(view, &mut colors, &DefaultFormatter, options).unwrap()
}

#[test]
fn test_single_measure_positions() {
    let view = CategoricalView::new(
        Some(year_category(&[2011, 2012])),
        vec![ValueColumn::new(
            ColumnSchema::measure("Sales"),
            vec![Some(100.0), Some(200.0)],
        )],
    );

    let data = run(&view);
    assert_eq!(data.series.len(), 1);

    let points = &data.series[0].data;
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].value, Some(100.0));
    assert_eq!(points[1].value, Some(200.0));
    assert_eq!(points[0].position, 100.0);
    assert_eq!(points[1].position, 200.0);
    assert_eq!(points[0].category_index, 0);
    assert_eq!(points[1].category_index, 1);
    assert_eq!(points[0].category_value, DataValue::from(2011));

    assert!(!data.is_multi_measure);
    assert!(!data.has_dynamic_series);
    assert!(!data.has_highlights);
    assert!(data.scalar_category_axis);
}

#[test]
fn test_negative_values_stack_downward() {
    let view = CategoricalView::new(
        Some(year_category(&[2011, 2012])),
        vec![ValueColumn::new(
            ColumnSchema::measure("Sales"),
            vec![Some(100.0), Some(-200.0)],
        )],
    );

    let data = run(&view);
    let points = &data.series[0].data;
    assert_eq!(points[0].position, 100.0);
    assert_eq!(points[1].position, 0.0);
    assert_eq!(points[0].value_absolute, 100.0);
    assert_eq!(points[1].value_absolute, 200.0);
}

#[test]
fn test_two_series_stack_in_column_order() {
    let view = CategoricalView::new(
        Some(year_category(&[2011, 2012])),
        vec![
            ValueColumn::new(ColumnSchema::measure("Sales"), vec![Some(100.0), Some(200.0)]),
            ValueColumn::new(ColumnSchema::measure("Profit"), vec![Some(60.0), Some(-50.0)]),
        ],
    );

    let data = run(&view);
    assert_eq!(data.series.len(), 2);
    assert!(data.is_multi_measure);

    assert_eq!(data.series[0].label, "Sales");
    assert_eq!(data.series[1].label, "Profit");
    assert_eq!(data.series[0].data[0].position, 100.0);
    assert_eq!(data.series[1].data[0].position, 160.0);
    // The negative second-series value hangs from the zero boundary.
    assert_eq!(data.series[1].data[1].position, 0.0);
}

#[test]
fn test_null_values_become_zero_height_points() {
    let view = CategoricalView::new(
        Some(year_category(&[2011, 2012, 2013])),
        vec![ValueColumn::new(
            ColumnSchema::measure("Sales"),
            vec![None, None, None],
        )],
    );

    let data = run(&view);
    let points = &data.series[0].data;
    assert_eq!(points.len(), 3);
    for point in points {
        assert_eq!(point.value, None);
        assert_eq!(point.position, 0.0);
        assert_eq!(point.value_absolute, 0.0);
        // No measure entry in the tooltip, only the category.
        assert_eq!(point.tooltip.len(), 1);
        assert_eq!(point.tooltip[0].label, "Year");
    }
}

#[test]
fn test_nan_treated_as_missing() {
    let view = CategoricalView::new(
        Some(year_category(&[2011, 2012])),
        vec![ValueColumn::new(
            ColumnSchema::measure("Sales"),
            vec![Some(f64::NAN), Some(50.0)],
        )],
    );

    let data = run(&view);
    let points = &data.series[0].data;
    assert_eq!(points[0].value, None);
    assert_eq!(points[0].position, 0.0);
    assert_eq!(points[1].value, Some(50.0));
}

#[test]
fn test_infinity_clamps_to_max_magnitude() {
    let view = CategoricalView::new(
        Some(year_category(&[2011, 2012])),
        vec![ValueColumn::new(
            ColumnSchema::measure("Sales"),
            vec![Some(f64::INFINITY), Some(f64::NEG_INFINITY)],
        )],
    );

    let data = run(&view);
    let points = &data.series[0].data;
    assert_eq!(points[0].value, Some(f64::MAX));
    assert_eq!(points[0].position, f64::MAX);
    assert_eq!(points[1].value, Some(f64::MIN));
    // The clamped magnitude is what gets formatted.
    assert!(points[0].tooltip.iter().any(|e| e.label == "Sales"));
}

#[test]
fn test_placeholder_series_names() {
    let view = CategoricalView::new(
        Some(year_category(&[2011])),
        vec![
            ValueColumn::new(
                ColumnSchema {
                    is_measure: true,
                    roles: RoleSet::y(),
                    ..Default::default()
                },
                vec![Some(1.0)],
            ),
            ValueColumn::new(
                ColumnSchema {
                    display_name: false.into(),
                    is_measure: true,
                    roles: RoleSet::y(),
                    ..Default::default()
                },
                vec![Some(2.0)],
            ),
        ],
    );

    let data = run(&view);
    assert_eq!(data.series[0].label, "(Blank)");
    assert_eq!(data.series[1].label, "False");
    assert_eq!(data.legend.entries[0].label, "(Blank)");
    assert_eq!(data.legend.entries[1].label, "False");
}

#[test]
fn test_no_category_uses_implicit_null_category() {
    let view = CategoricalView::new(
        None,
        vec![ValueColumn::new(ColumnSchema::measure("Total"), vec![Some(500.0)])],
    );

    let data = run(&view);
    assert_eq!(data.series.len(), 1);
    let point = &data.series[0].data[0];
    assert_eq!(point.category_index, 0);
    assert_eq!(point.category_value, DataValue::Null);
    // Identity is measure-only.
    assert_eq!(point.identity.category, None);
    assert_eq!(point.identity.measure.as_deref(), Some("Total"));
    assert!(!data.scalar_category_axis);
    // Tooltip has no category entry.
    assert_eq!(point.tooltip.len(), 1);
    assert_eq!(point.tooltip[0].label, "Total");
}

#[test]
fn test_empty_view_keeps_legend_only() {
    let view = CategoricalView::new(
        Some(year_category(&[])),
        vec![ValueColumn::new(ColumnSchema::measure("Sales"), vec![])],
    );

    let data = run(&view);
    assert!(data.series.is_empty());
    assert_eq!(data.legend.entries.len(), 1);
    assert_eq!(data.legend.entries[0].label, "Sales");
}

#[test]
fn test_tooltip_order_and_formatting() {
    let view = CategoricalView::new(
        Some(year_category(&[2011])),
        vec![ValueColumn::new(
            ColumnSchema::measure("Sales").with_format("$,.0f"),
            vec![Some(1234.5)],
        )],
    );

    let data = run(&view);
    let tooltip = &data.series[0].data[0].tooltip;
    assert_eq!(tooltip.len(), 2);
    assert_eq!((tooltip[0].label.as_str(), tooltip[0].value.as_str()), ("Year", "2011"));
    assert_eq!((tooltip[1].label.as_str(), tooltip[1].value.as_str()), ("Sales", "$1,235"));
}

#[test]
fn test_gradient_only_column_feeds_tooltip_not_series() {
    let view = CategoricalView::new(
        Some(year_category(&[2011, 2012])),
        vec![
            ValueColumn::new(ColumnSchema::measure("Sales"), vec![Some(10.0), Some(20.0)]),
            ValueColumn::new(
                ColumnSchema {
                    display_name: "Intensity".into(),
                    query_name: Some("Intensity".to_string()),
                    is_measure: true,
                    roles: RoleSet::gradient(),
                    ..Default::default()
                },
                vec![Some(0.3), None],
            ),
        ],
    );

    let data = run(&view);
    // The gradient column never becomes a series.
    assert_eq!(data.series.len(), 1);
    assert!(!data.is_multi_measure);
    assert_eq!(data.legend.entries.len(), 1);

    let tooltip = &data.series[0].data[0].tooltip;
    assert_eq!(tooltip.len(), 3);
    assert_eq!(tooltip[2].label, "Intensity");
    // Null gradient rows contribute no entry.
    assert_eq!(data.series[0].data[1].tooltip.len(), 2);
}

#[test]
fn test_category_fill_override_beats_series_color() {
    let view = CategoricalView::new(
        Some(
            year_category(&[2011, 2012])
                .with_fills(vec![Some("red".to_string()), None]),
        ),
        vec![ValueColumn::new(ColumnSchema::measure("Sales"), vec![Some(1.0), Some(2.0)])],
    );

    let data = run(&view);
    let points = &data.series[0].data;
    assert_eq!(points[0].color, Rgba::from_css("red").unwrap());
    assert_eq!(points[1].color, DEFAULT_PALETTE[0]);
}

#[test]
fn test_measure_fill_and_default_color_precedence() {
    let columns = vec![
        ValueColumn::new(
            ColumnSchema::measure("Sales").with_fill("#112233"),
            vec![Some(1.0)],
        ),
        ValueColumn::new(ColumnSchema::measure("Profit"), vec![Some(2.0)]),
    ];
    let view = CategoricalView::new(Some(year_category(&[2011])), columns);

    let default_color = Rgba::from_css("#808080").unwrap();
    let options = ConvertOptions::default().with_default_color(default_color);
    let data = run_with_options(&view, &options);

    // Explicit fill wins; the default color covers the rest uniformly.
    assert_eq!(data.series[0].color, Rgba::from_css("#112233").unwrap());
    assert_eq!(data.series[1].color, default_color);
}

#[test]
fn test_invalid_fill_color_is_an_error() {
    let view = CategoricalView::new(
        Some(year_category(&[2011])),
        vec![ValueColumn::new(
            ColumnSchema::measure("Sales").with_fill("#nope"),
            vec![Some(1.0)],
        )],
    );

    let mut colors = PaletteColorAssigner::default();
    let result = convert(&view, &mut colors, &DefaultFormatter, &ConvertOptions::default());
    assert!(matches!(result, Err(ColonnadeDataError::InvalidColor(_))));
}

#[test]
fn test_mismatched_highlight_length_is_an_error() {
    let view = CategoricalView::new(
        Some(year_category(&[2011, 2012])),
        vec![ValueColumn::new(
            ColumnSchema::measure("Sales"),
            vec![Some(1.0), Some(2.0)],
        )
        .with_highlights(vec![Some(1.0)])],
    );

    let mut colors = PaletteColorAssigner::default();
    let result = convert(&view, &mut colors, &DefaultFormatter, &ConvertOptions::default());
    assert!(matches!(
        result,
        Err(ColonnadeDataError::HighlightLengthMismatch { .. })
    ));
}

#[test]
fn test_series_colors_follow_palette_order() {
    let view = CategoricalView::new(
        Some(year_category(&[2011])),
        vec![
            ValueColumn::new(ColumnSchema::measure("A"), vec![Some(1.0)]),
            ValueColumn::new(ColumnSchema::measure("B"), vec![Some(2.0)]),
            ValueColumn::new(ColumnSchema::measure("C"), vec![Some(3.0)]),
        ],
    );

    let data = run(&view);
    let assigner = PaletteColorAssigner::default();
    for (i, series) in data.series.iter().enumerate() {
        assert_eq!(series.color, assigner.color_by_index(i));
    }
}

#[test]
fn test_conversion_is_reentrant() {
    let view = CategoricalView::new(
        Some(year_category(&[2011, 2012])),
        vec![ValueColumn::new(
            ColumnSchema::measure("Sales"),
            vec![Some(100.0), Some(200.0)],
        )],
    );

    let mut colors = PaletteColorAssigner::default();
    let first = convert(&view, &mut colors, &DefaultFormatter, &ConvertOptions::default()).unwrap();
    let second = convert(&view, &mut colors, &DefaultFormatter, &ConvertOptions::default()).unwrap();
    assert_eq!(first, second);
}
