use std::time::{Duration, Instant};

use chart_axis::axis::{AxisCollection, AxisUserOptions, PlotBandOptions, PlotLineOptions};
use chart_axis::chart::{Chart, ChartOptions};
use chart_axis::core::{PlotArea, Viewport};
use chart_axis::render::{
    Color, LinePrimitive, NullRenderer, RectPrimitive, RenderFrame, Renderer, TextHAlign,
    TextPrimitive,
};
use chart_axis::AxisId;

fn pinned(min: f64, max: f64) -> AxisUserOptions {
    AxisUserOptions {
        min: Some(min),
        max: Some(max),
        ..AxisUserOptions::default()
    }
}

fn chart() -> (Chart<NullRenderer>, AxisId, AxisId) {
    let options = ChartOptions::new(Viewport::new(600, 400))
        .with_plot_area(PlotArea::new(50.0, 20.0, 500.0, 300.0));
    let mut chart = Chart::new(NullRenderer::default(), options).expect("chart init");
    let x = chart
        .add_axis(AxisCollection::X, pinned(0.0, 10.0))
        .expect("x axis");
    let y = chart
        .add_axis(AxisCollection::Y, pinned(0.0, 100.0))
        .expect("y axis");
    chart
        .add_plot_band(y, PlotBandOptions::new(20.0, 40.0))
        .expect("band");
    chart
        .add_plot_line(y, PlotLineOptions::new(50.0))
        .expect("line");
    (chart, x, y)
}

#[test]
fn frame_holds_bands_gridlines_marks_and_labels() {
    let (mut chart, _, _) = chart();
    chart.redraw();
    let frame = chart.build_render_frame();

    // Five y gridlines, six x tick marks, one plot line.
    assert_eq!(frame.rects.len(), 1);
    assert_eq!(frame.lines.len(), 12);
    assert_eq!(frame.texts.len(), 11);
    assert!(frame.validate().is_ok());

    let texts: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    for expected in ["0", "25", "100", "2", "10"] {
        assert!(texts.contains(&expected), "missing label {expected}");
    }
}

#[test]
fn render_hands_the_frame_to_the_backend() {
    let (mut chart, _, _) = chart();
    chart.redraw();
    chart.render().expect("render");
    chart.render().expect("render");

    let renderer = chart.renderer();
    assert_eq!(renderer.frames_rendered, 2);
    assert_eq!(renderer.last_rect_count, 1);
    assert_eq!(renderer.last_line_count, 12);
    assert_eq!(renderer.last_text_count, 11);
}

#[test]
fn fading_ticks_are_left_out_of_the_frame() {
    let (mut chart, _, y) = chart();
    let t0 = Instant::now();
    chart.redraw_at(t0);
    chart
        .axis_mut(y)
        .expect("y axis")
        .update(pinned(0.0, 200.0))
        .expect("update");
    chart.redraw_at(t0 + Duration::from_millis(100));

    let frame = chart.build_render_frame();
    let texts: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert!(!texts.contains(&"25"));
    assert!(texts.contains(&"150"));
    assert_eq!(frame.lines.len(), 12);
}

#[test]
fn empty_chart_renders_nothing() {
    let options = ChartOptions::new(Viewport::new(600, 400));
    let mut chart = Chart::new(NullRenderer::default(), options).expect("chart init");
    chart.redraw();
    assert!(chart.build_render_frame().is_empty());
    chart.render().expect("render");
}

#[test]
fn resize_moves_the_axes() {
    let (mut chart, x, _) = chart();
    chart
        .resize(Viewport::new(800, 600), PlotArea::new(100.0, 20.0, 600.0, 500.0))
        .expect("resize");
    chart.redraw();
    let axis = chart.axis(x).expect("x axis");
    assert_eq!(axis.to_pixels(0.0, false), 100.0);
    assert_eq!(axis.to_pixels(10.0, false), 700.0);
    assert!(
        chart
            .resize(Viewport::new(800, 600), PlotArea::new(0.0, 0.0, 0.0, 10.0))
            .is_err()
    );
}

#[test]
fn hand_built_frame_is_validated_by_the_backend() {
    let black = Color::rgb(0.0, 0.0, 0.0);
    let frame = RenderFrame::new(Viewport::new(200, 100))
        .with_rect(RectPrimitive::new(10.0, 10.0, 50.0, 20.0, black))
        .with_line(LinePrimitive::new(0.0, 0.5, 200.0, 0.5, 1.0, black))
        .with_text(TextPrimitive::new("42", 20.0, 40.0, 11.0, black, TextHAlign::Left));
    assert!(!frame.is_empty());

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("valid frame");
    assert_eq!(renderer.last_rect_count, 1);
    assert_eq!(renderer.last_line_count, 1);
    assert_eq!(renderer.last_text_count, 1);

    let broken = frame.with_line(LinePrimitive::new(f64::NAN, 0.0, 1.0, 1.0, 1.0, black));
    assert!(renderer.render(&broken).is_err());
    assert_eq!(renderer.frames_rendered, 1);
}
