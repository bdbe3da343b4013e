use std::cell::RefCell;
use std::rc::Rc;

use chart_axis::axis::{AxisCollection, AxisExtremes, AxisUserOptions};
use chart_axis::chart::{
    Chart, ChartOptions, ExtremesIntent, ExtremesInterceptor, ExtremesOutcome, ExtremesTrigger,
};
use chart_axis::core::{PlotArea, Viewport};
use chart_axis::error::ChartError;
use chart_axis::render::NullRenderer;
use chart_axis::series::{SeriesData, SeriesSource};
use chart_axis::AxisId;

type ProcessLog = Rc<RefCell<Vec<(bool, f64, f64)>>>;

/// Series that records every `process_data` call into a shared log.
#[derive(Debug)]
struct RecordingSeries {
    x: Vec<f64>,
    y: Vec<f64>,
    log: ProcessLog,
}

impl SeriesSource for RecordingSeries {
    fn name(&self) -> &str {
        "recording"
    }

    fn x_data(&self) -> &[f64] {
        &self.x
    }

    fn y_data(&self) -> &[f64] {
        &self.y
    }

    fn process_data(&mut self, force: bool, x_min: f64, x_max: f64) {
        self.log.borrow_mut().push((force, x_min, x_max));
    }
}

struct ClampMin {
    floor: f64,
    seen: Rc<RefCell<Vec<ExtremesTrigger>>>,
}

impl ExtremesInterceptor for ClampMin {
    fn id(&self) -> &str {
        "clamp-min"
    }

    fn intercept(&mut self, intent: &mut ExtremesIntent, _current: AxisExtremes) {
        self.seen.borrow_mut().push(intent.trigger);
        intent.min = intent.min.map(|min| min.max(self.floor));
    }
}

struct Veto;

impl ExtremesInterceptor for Veto {
    fn id(&self) -> &str {
        "veto"
    }

    fn intercept(&mut self, intent: &mut ExtremesIntent, _current: AxisExtremes) {
        intent.cancel();
    }
}

struct Named(&'static str);

impl ExtremesInterceptor for Named {
    fn id(&self) -> &str {
        self.0
    }

    fn intercept(&mut self, _intent: &mut ExtremesIntent, _current: AxisExtremes) {}
}

fn chart() -> (Chart<NullRenderer>, AxisId, AxisId) {
    let options = ChartOptions::new(Viewport::new(600, 400))
        .with_plot_area(PlotArea::new(50.0, 20.0, 500.0, 300.0));
    let mut chart = Chart::new(NullRenderer::default(), options).expect("chart init");
    let x = chart
        .add_axis(AxisCollection::X, AxisUserOptions::default())
        .expect("x axis");
    let y = chart
        .add_axis(AxisCollection::Y, AxisUserOptions::default())
        .expect("y axis");
    let values: Vec<f64> = (0..10).map(|index| f64::from(index) * 10.0).collect();
    chart
        .add_series(Box::new(SeriesData::from_values("s", values)), x, y)
        .expect("series");
    chart.redraw();
    (chart, x, y)
}

#[test]
fn set_extremes_pins_the_axis_and_rescopes_y_data() {
    let (mut chart, x, y) = chart();
    let outcome = chart
        .set_extremes(x, Some(2.0), Some(8.0), true)
        .expect("set extremes");
    assert_eq!(
        outcome,
        ExtremesOutcome::Applied {
            min: Some(2.0),
            max: Some(8.0)
        }
    );

    let extremes = chart.axis(x).expect("x axis").get_extremes();
    assert_eq!(extremes.min, Some(2.0));
    assert_eq!(extremes.max, Some(8.0));
    assert_eq!(extremes.user_min, Some(2.0));
    assert_eq!(extremes.data_min, Some(0.0));

    // Points in the window plus one neighbour past each edge.
    let y_extremes = chart.axis(y).expect("y axis").get_extremes();
    assert_eq!(y_extremes.data_min, Some(10.0));
    assert_eq!(y_extremes.data_max, Some(90.0));
}

#[test]
fn releasing_extremes_restores_data_driven_scale() {
    let (mut chart, x, _) = chart();
    let before = chart.axis(x).expect("x axis").get_extremes();
    chart
        .set_extremes(x, Some(2.0), Some(8.0), true)
        .expect("set extremes");
    chart.set_extremes(x, None, None, true).expect("release");

    let after = chart.axis(x).expect("x axis").get_extremes();
    assert_eq!(after.min, before.min);
    assert_eq!(after.max, before.max);
    assert_eq!(after.user_min, None);
}

#[test]
fn deferred_redraw_keeps_the_old_scale_until_redraw() {
    let (mut chart, x, _) = chart();
    let before = chart.axis(x).expect("x axis").max();
    chart
        .set_extremes(x, Some(2.0), Some(8.0), false)
        .expect("set extremes");
    assert_eq!(chart.axis(x).expect("x axis").max(), before);
    chart.redraw();
    assert_eq!(chart.axis(x).expect("x axis").max(), Some(8.0));
}

#[test]
fn zoom_past_the_data_releases_that_side() {
    let (mut chart, x, _) = chart();
    let outcome = chart.zoom(x, Some(-5.0), Some(6.0)).expect("zoom");
    assert_eq!(
        outcome,
        ExtremesOutcome::Applied {
            min: None,
            max: Some(6.0)
        }
    );
    let extremes = chart.axis(x).expect("x axis").get_extremes();
    assert_eq!(extremes.user_min, None);
    assert_eq!(extremes.user_max, Some(6.0));

    chart.zoom(x, None, Some(20.0)).expect("zoom out");
    assert_eq!(chart.axis(x).expect("x axis").get_extremes().user_max, None);
}

#[test]
fn invalid_extremes_are_rejected() {
    let (mut chart, x, _) = chart();
    assert!(matches!(
        chart.set_extremes(x, Some(5.0), Some(1.0), true),
        Err(ChartError::InvalidData(_))
    ));
    assert!(matches!(
        chart.set_extremes(x, Some(f64::NAN), None, true),
        Err(ChartError::InvalidData(_))
    ));
    assert!(matches!(
        chart.set_extremes(AxisId(99), Some(1.0), Some(2.0), true),
        Err(ChartError::UnknownAxis(AxisId(99)))
    ));
}

#[test]
fn interceptors_rewrite_and_veto_in_order() {
    let (mut chart, x, _) = chart();
    let seen = Rc::new(RefCell::new(Vec::new()));
    chart
        .register_extremes_interceptor(Box::new(ClampMin {
            floor: 3.0,
            seen: Rc::clone(&seen),
        }))
        .expect("register clamp");

    let outcome = chart
        .set_extremes(x, Some(1.0), Some(9.0), true)
        .expect("set extremes");
    assert_eq!(
        outcome,
        ExtremesOutcome::Applied {
            min: Some(3.0),
            max: Some(9.0)
        }
    );
    assert_eq!(chart.axis(x).expect("x axis").min(), Some(3.0));

    chart
        .register_extremes_interceptor(Box::new(Veto))
        .expect("register veto");
    let outcome = chart
        .zoom(x, Some(4.0), Some(9.0))
        .expect("zoom");
    assert_eq!(outcome, ExtremesOutcome::Cancelled);
    assert_eq!(chart.axis(x).expect("x axis").min(), Some(3.0));
    assert_eq!(
        *seen.borrow(),
        vec![ExtremesTrigger::SetExtremes, ExtremesTrigger::Zoom]
    );

    assert!(chart.unregister_extremes_interceptor("veto"));
    assert!(!chart.unregister_extremes_interceptor("veto"));
    assert_eq!(chart.interceptor_count(), 1);
}

#[test]
fn interceptor_ids_must_be_unique_and_non_empty() {
    let (mut chart, _, _) = chart();
    chart
        .register_extremes_interceptor(Box::new(Named("a")))
        .expect("first");
    assert!(chart.register_extremes_interceptor(Box::new(Named("a"))).is_err());
    assert!(chart.register_extremes_interceptor(Box::new(Named(""))).is_err());
    assert_eq!(chart.interceptor_count(), 1);
}

#[test]
fn series_process_data_after_extremes_settle() {
    let options = ChartOptions::new(Viewport::new(600, 400))
        .with_plot_area(PlotArea::new(50.0, 20.0, 500.0, 300.0));
    let mut chart = Chart::new(NullRenderer::default(), options).expect("chart init");
    let x = chart
        .add_axis(
            AxisCollection::X,
            AxisUserOptions {
                min: Some(0.0),
                max: Some(10.0),
                ..AxisUserOptions::default()
            },
        )
        .expect("x axis");
    let y = chart
        .add_axis(AxisCollection::Y, AxisUserOptions::default())
        .expect("y axis");
    let log = ProcessLog::default();
    chart
        .add_series(
            Box::new(RecordingSeries {
                x: vec![0.0, 5.0, 10.0],
                y: vec![1.0, 2.0, 3.0],
                log: Rc::clone(&log),
            }),
            x,
            y,
        )
        .expect("series");

    chart.redraw();
    chart.redraw();
    chart
        .set_extremes(x, Some(2.0), Some(8.0), true)
        .expect("set extremes");

    assert_eq!(
        *log.borrow(),
        vec![(true, 0.0, 10.0), (false, 0.0, 10.0), (true, 2.0, 8.0)]
    );
}

#[test]
fn series_must_attach_to_matching_collections() {
    let (mut chart, x, y) = chart();
    assert!(
        chart
            .add_series(Box::new(SeriesData::from_values("s", [1.0])), y, x)
            .is_err()
    );
    assert_eq!(chart.series_count(), 1);
}
