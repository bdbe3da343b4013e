use approx::assert_relative_eq;
use chart_axis::axis::{AxisCollection, AxisKind, AxisUserOptions, TickKey};
use chart_axis::chart::{Chart, ChartOptions};
use chart_axis::core::{PlotArea, Viewport};
use chart_axis::error::Diagnostic;
use chart_axis::render::NullRenderer;
use chart_axis::series::SeriesData;

fn chart() -> Chart<NullRenderer> {
    let options = ChartOptions::new(Viewport::new(600, 400))
        .with_plot_area(PlotArea::new(50.0, 20.0, 500.0, 300.0));
    Chart::new(NullRenderer::default(), options).expect("chart init")
}

fn log_y(min_padding: f64) -> AxisUserOptions {
    AxisUserOptions {
        min_padding: Some(min_padding),
        max_padding: Some(min_padding),
        ..AxisUserOptions::new(AxisKind::Logarithmic)
    }
}

#[test]
fn wide_log_range_ticks_on_decades() {
    let mut chart = chart();
    let x = chart
        .add_axis(AxisCollection::X, AxisUserOptions::default())
        .expect("x axis");
    let y = chart.add_axis(AxisCollection::Y, log_y(0.0)).expect("y axis");
    chart
        .add_series(Box::new(SeriesData::from_values("s", [1.0, 1000.0])), x, y)
        .expect("series");
    chart.redraw();

    let axis = chart.axis(y).expect("y axis");
    assert_eq!(axis.tick_positions(), &[0.0, 1.0, 2.0, 3.0]);
    assert_eq!(axis.tick_interval(), 1.0);

    let extremes = axis.get_extremes();
    assert_eq!(extremes.min, Some(1.0));
    assert_eq!(extremes.max, Some(1000.0));

    let labels: Vec<String> = axis
        .tick_positions()
        .iter()
        .map(|position| {
            axis.tick(TickKey::major(*position))
                .and_then(|tick| tick.label())
                .map(|label| label.text.clone())
                .expect("label")
        })
        .collect();
    assert_eq!(labels, vec!["1", "10", "100", "1k"]);
}

#[test]
fn log_translation_maps_decades_evenly() {
    let mut chart = chart();
    let x = chart
        .add_axis(AxisCollection::X, AxisUserOptions::default())
        .expect("x axis");
    let y = chart.add_axis(AxisCollection::Y, log_y(0.0)).expect("y axis");
    chart
        .add_series(Box::new(SeriesData::from_values("s", [1.0, 1000.0])), x, y)
        .expect("series");
    chart.redraw();

    let axis = chart.axis(y).expect("y axis");
    assert_relative_eq!(axis.to_pixels(1.0, false), 320.0, epsilon = 1e-9);
    assert_relative_eq!(axis.to_pixels(10.0, false), 220.0, epsilon = 1e-9);
    assert_relative_eq!(axis.to_pixels(1000.0, false), 20.0, epsilon = 1e-9);
    assert_relative_eq!(axis.to_value(120.0, false), 100.0, max_relative = 1e-12);
    assert_relative_eq!(axis.val2lin(100.0), 2.0, epsilon = 1e-12);
    assert_relative_eq!(axis.lin2val(2.0), 100.0, max_relative = 1e-12);
}

#[test]
fn non_positive_data_is_reported_and_excluded() {
    let mut chart = chart();
    let x = chart
        .add_axis(AxisCollection::X, AxisUserOptions::default())
        .expect("x axis");
    let y = chart.add_axis(AxisCollection::Y, log_y(0.05)).expect("y axis");
    chart
        .add_series(
            Box::new(SeriesData::from_values("s", [-5.0, 10.0, 100.0])),
            x,
            y,
        )
        .expect("series");
    chart.redraw();

    let axis = chart.axis(y).expect("y axis");
    assert_eq!(axis.get_extremes().data_min, Some(10.0));
    assert_eq!(axis.get_extremes().data_max, Some(100.0));
    match axis.diagnostics() {
        [Diagnostic::NonPositiveLogValue { axis: id, value }] => {
            assert_eq!(*id, y);
            assert_eq!(*value, -5.0);
        }
        other => panic!("unexpected diagnostics: {other:?}"),
    }
    assert_eq!(axis.diagnostics()[0].code(), 10);
    assert!(axis.get_extremes().min.expect("min") > 0.0);
}

#[test]
fn non_positive_configured_min_falls_back_to_one() {
    let mut chart = chart();
    let y = chart
        .add_axis(
            AxisCollection::Y,
            AxisUserOptions {
                min: Some(-1.0),
                max: Some(100.0),
                ..AxisUserOptions::new(AxisKind::Logarithmic)
            },
        )
        .expect("y axis");
    chart.redraw();

    let axis = chart.axis(y).expect("y axis");
    assert_eq!(axis.get_extremes().min, Some(1.0));
    assert!(
        axis.diagnostics()
            .iter()
            .any(|diagnostic| diagnostic.code() == 10)
    );
    assert!(axis.tick_positions().iter().all(|tick| tick.is_finite()));
}

#[test]
fn medium_log_range_uses_intermediate_multiples() {
    let mut chart = chart();
    let y = chart
        .add_axis(
            AxisCollection::Y,
            AxisUserOptions {
                min: Some(1.0),
                max: Some(100.0),
                ..AxisUserOptions::new(AxisKind::Logarithmic)
            },
        )
        .expect("y axis");
    chart.redraw();

    let axis = chart.axis(y).expect("y axis");
    let real: Vec<f64> = axis
        .tick_positions()
        .iter()
        .map(|position| (axis.lin2val(*position) * 1e6).round() / 1e6)
        .collect();
    assert_eq!(real[..4], [1.0, 2.0, 4.0, 10.0]);
    for pair in axis.tick_positions().windows(2) {
        assert!(pair[0] < pair[1]);
    }
}
