use chart_axis::axis::{AxisCollection, AxisKind, AxisUserOptions};
use chart_axis::chart::{Chart, ChartOptions};
use chart_axis::core::datetime::{DAY, NormalizedTimeInterval, TimeUnit, time_ticks};
use chart_axis::core::log_ticks::{LogTickRequest, log_tick_positions};
use chart_axis::core::numeric::{linear_tick_positions, magnitude, normalize_tick_interval};
use chart_axis::core::{TimeZoneMode, Viewport};
use chart_axis::render::NullRenderer;
use chart_axis::series::SeriesData;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_normalize_and_place_linear_ticks(c: &mut Criterion) {
    c.bench_function("linear_ticks_normalize_and_place", |b| {
        b.iter(|| {
            let raw = black_box(1_234.5);
            let interval = normalize_tick_interval(raw, None, magnitude(raw), true);
            let _ = linear_tick_positions(interval, black_box(-9_876.0), black_box(54_321.0));
        })
    });
}

fn bench_log_ticks_intermediate(c: &mut Criterion) {
    let request = LogTickRequest {
        interval: 0.2,
        min: 0.0,
        max: 6.0,
        minor: false,
        interval_option: None,
        tick_pixel_interval: 72.0,
        axis_len: 800.0,
        major_tick_count: 0,
        minor_auto_interval: None,
    };

    c.bench_function("log_ticks_intermediate", |b| {
        b.iter(|| {
            let _ = log_tick_positions(black_box(&request));
        })
    });
}

fn bench_time_ticks_fixed_offset_year(c: &mut Criterion) {
    let interval = NormalizedTimeInterval {
        unit: TimeUnit::Day,
        count: 1.0,
    };

    c.bench_function("time_ticks_fixed_offset_year", |b| {
        b.iter(|| {
            let _ = time_ticks(
                black_box(interval),
                black_box(0.0),
                black_box(365.0 * DAY),
                1,
                TimeZoneMode::FixedOffsetMinutes { minutes: 330 },
            );
        })
    });
}

fn bench_chart_redraw_10k(c: &mut Criterion) {
    let options = ChartOptions::new(Viewport::new(1600, 900));
    let mut chart = Chart::new(NullRenderer::default(), options).expect("chart init");
    let x = chart
        .add_axis(AxisCollection::X, AxisUserOptions::new(AxisKind::Datetime))
        .expect("x axis");
    let y = chart
        .add_axis(AxisCollection::Y, AxisUserOptions::default())
        .expect("y axis");
    let points: Vec<(f64, f64)> = (0..10_000)
        .map(|i| {
            let t = f64::from(i);
            (t * 60_000.0, 100.0 + (t * 0.01).sin() * 25.0)
        })
        .collect();
    chart
        .add_series(Box::new(SeriesData::new("minutes", points)), x, y)
        .expect("series");

    c.bench_function("chart_redraw_10k", |b| {
        b.iter(|| {
            chart.redraw();
            let _ = black_box(chart.build_render_frame());
        })
    });
}

criterion_group!(
    benches,
    bench_normalize_and_place_linear_ticks,
    bench_log_ticks_intermediate,
    bench_time_ticks_fixed_offset_year,
    bench_chart_redraw_10k
);
criterion_main!(benches);
