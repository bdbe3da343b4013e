use chart_axis::axis::{AxisCollection, AxisKind, AxisUserOptions};
use chart_axis::chart::{Chart, ChartOptions};
use chart_axis::core::{PlotArea, Viewport};
use chart_axis::error::Diagnostic;
use chart_axis::render::NullRenderer;
use chart_axis::series::SeriesData;
use chart_axis::AxisId;

fn chart() -> Chart<NullRenderer> {
    let options = ChartOptions::new(Viewport::new(600, 400))
        .with_plot_area(PlotArea::new(50.0, 20.0, 500.0, 300.0));
    Chart::new(NullRenderer::default(), options).expect("chart init")
}

fn linked(parent: AxisId) -> AxisUserOptions {
    AxisUserOptions {
        linked_to: Some(parent),
        ..AxisUserOptions::default()
    }
}

#[test]
fn linked_axis_mirrors_parent_extremes_and_interval() {
    let mut chart = chart();
    // The child is added first so resolution order has to put the parent ahead.
    let child = chart
        .add_axis(AxisCollection::X, linked(AxisId(1)))
        .expect("child");
    let parent = chart
        .add_axis(AxisCollection::X, AxisUserOptions::default())
        .expect("parent");
    assert_eq!(parent, AxisId(1));
    let y = chart
        .add_axis(AxisCollection::Y, AxisUserOptions::default())
        .expect("y axis");
    chart
        .add_series(
            Box::new(SeriesData::from_values("s", (0..10).map(f64::from))),
            parent,
            y,
        )
        .expect("series");
    chart.redraw();

    let parent_axis = chart.axis(parent).expect("parent");
    let child_axis = chart.axis(child).expect("child");
    assert_eq!(child_axis.linked_parent(), Some(parent));
    assert_eq!(child_axis.min(), parent_axis.min());
    assert_eq!(child_axis.max(), parent_axis.max());
    assert_eq!(child_axis.tick_interval(), parent_axis.tick_interval());
    assert!(child_axis.diagnostics().is_empty());
}

#[test]
fn linked_axis_follows_parent_zoom() {
    let mut chart = chart();
    let parent = chart
        .add_axis(AxisCollection::X, AxisUserOptions::default())
        .expect("parent");
    let child = chart.add_axis(AxisCollection::X, linked(parent)).expect("child");
    let y = chart
        .add_axis(AxisCollection::Y, AxisUserOptions::default())
        .expect("y axis");
    chart
        .add_series(
            Box::new(SeriesData::from_values("s", (0..10).map(f64::from))),
            parent,
            y,
        )
        .expect("series");
    chart.redraw();
    chart
        .set_extremes(parent, Some(2.0), Some(8.0), true)
        .expect("set extremes");

    let child_axis = chart.axis(child).expect("child");
    assert_eq!(child_axis.min(), Some(2.0));
    assert_eq!(child_axis.max(), Some(8.0));
}

#[test]
fn kind_mismatch_is_reported_and_ignored() {
    let mut chart = chart();
    let parent = chart
        .add_axis(AxisCollection::X, AxisUserOptions::new(AxisKind::Datetime))
        .expect("parent");
    let child = chart.add_axis(AxisCollection::X, linked(parent)).expect("child");
    chart.redraw();

    let child_axis = chart.axis(child).expect("child");
    assert_eq!(child_axis.linked_parent(), None);
    match child_axis.diagnostics() {
        [diagnostic @ Diagnostic::LinkedAxisKindMismatch { .. }] => {
            assert_eq!(diagnostic.code(), 11);
            assert_eq!(diagnostic.axis(), child);
        }
        other => panic!("unexpected diagnostics: {other:?}"),
    }
    assert_eq!(child_axis.tick_positions(), &[0.0]);
}

#[test]
fn missing_and_self_links_are_reported() {
    let mut chart = chart();
    let dangling = chart
        .add_axis(AxisCollection::Y, linked(AxisId(42)))
        .expect("dangling");
    let itself = chart.add_axis(AxisCollection::Y, linked(AxisId(1))).expect("self");
    assert_eq!(itself, AxisId(1));
    chart.redraw();

    for id in [dangling, itself] {
        let axis = chart.axis(id).expect("axis");
        assert!(
            matches!(axis.diagnostics(), [Diagnostic::LinkedAxisMissing { .. }]),
            "axis {id}: {:?}",
            axis.diagnostics()
        );
        assert_eq!(axis.diagnostics()[0].code(), 18);
    }
    assert_eq!(chart.diagnostics().len(), 2);
}
