use chart_axis::axis::{AxisCollection, AxisKind, AxisUserOptions, TickKey};
use chart_axis::chart::{Chart, ChartOptions};
use chart_axis::core::datetime::{
    DAY, HOUR, NormalizedTimeInterval, TimeUnit, normalize_time_tick_interval,
    time_ticks_in_zone,
};
use chart_axis::core::{PlotArea, TimeZoneMode, Viewport};
use chart_axis::render::NullRenderer;
use chrono::{
    FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};

const JAN_1_2024: f64 = 1_704_067_200_000.0;
const FEB_1_2024: f64 = 1_706_745_600_000.0;
const JAN_1_2025: f64 = 1_735_689_600_000.0;

fn chart() -> Chart<NullRenderer> {
    let options = ChartOptions::new(Viewport::new(600, 400))
        .with_plot_area(PlotArea::new(50.0, 20.0, 500.0, 300.0));
    Chart::new(NullRenderer::default(), options).expect("chart init")
}

fn label_text(chart: &Chart<NullRenderer>, axis: chart_axis::AxisId, position: f64) -> String {
    chart
        .axis(axis)
        .expect("axis")
        .tick(TickKey::major(position))
        .and_then(|tick| tick.label())
        .map(|label| label.text.clone())
        .expect("tick label")
}

/// Central European rules for spring 2024: +01:00 until 2024-03-31T01:00Z,
/// +02:00 after; local 02:00..03:00 on that day does not exist.
#[derive(Debug, Clone, Copy)]
struct SpringForward;

impl SpringForward {
    fn switch_utc() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 31)
            .and_then(|date| date.and_hms_opt(1, 0, 0))
            .expect("valid switch instant")
    }

    fn winter() -> FixedOffset {
        FixedOffset::east_opt(3_600).expect("valid offset")
    }

    fn summer() -> FixedOffset {
        FixedOffset::east_opt(7_200).expect("valid offset")
    }
}

impl TimeZone for SpringForward {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        SpringForward
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        let gap_start = Self::switch_utc() + chrono::Duration::hours(1);
        let gap_end = Self::switch_utc() + chrono::Duration::hours(2);
        if *local < gap_start {
            LocalResult::Single(Self::winter())
        } else if *local < gap_end {
            LocalResult::None
        } else {
            LocalResult::Single(Self::summer())
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        if *utc < Self::switch_utc() {
            Self::winter()
        } else {
            Self::summer()
        }
    }
}

#[test]
fn hourly_ticks_mark_day_boundaries() {
    let mut chart = chart();
    let x = chart
        .add_axis(
            AxisCollection::X,
            AxisUserOptions {
                min: Some(0.0),
                max: Some(DAY),
                tick_interval: Some(HOUR),
                ..AxisUserOptions::new(AxisKind::Datetime)
            },
        )
        .expect("x axis");
    chart.redraw();

    let axis = chart.axis(x).expect("x axis");
    let ticks = axis.tick_positions();
    assert_eq!(ticks.len(), 25);
    for pair in ticks.windows(2) {
        assert_eq!(pair[1] - pair[0], HOUR);
    }

    let info = axis.time_info().expect("time info");
    assert_eq!(info.unit, Some(TimeUnit::Hour));
    assert!(info.is_day_boundary(0.0));
    assert!(info.is_day_boundary(DAY));
    assert!(!info.is_day_boundary(HOUR));

    assert_eq!(label_text(&chart, x, 0.0), "1. Jan");
    assert_eq!(label_text(&chart, x, HOUR), "01:00");
    assert_eq!(label_text(&chart, x, DAY), "2. Jan");
}

#[test]
fn monthly_ticks_follow_the_calendar() {
    let mut chart = chart();
    let x = chart
        .add_axis(
            AxisCollection::X,
            AxisUserOptions {
                min: Some(JAN_1_2024),
                max: Some(JAN_1_2025),
                tick_interval: Some(30.0 * DAY),
                ..AxisUserOptions::new(AxisKind::Datetime)
            },
        )
        .expect("x axis");
    chart.redraw();

    let axis = chart.axis(x).expect("x axis");
    let ticks = axis.tick_positions();
    assert_eq!(ticks.len(), 13);
    assert_eq!(ticks[0], JAN_1_2024);
    assert_eq!(ticks[1], FEB_1_2024);
    assert_eq!(ticks[12], JAN_1_2025);
    assert_eq!(axis.time_info().and_then(|info| info.unit), Some(TimeUnit::Month));
    assert_eq!(label_text(&chart, x, FEB_1_2024), "Feb '24");
}

#[test]
fn fixed_offset_zone_floors_to_local_midnight() {
    let options = ChartOptions::new(Viewport::new(600, 400))
        .with_plot_area(PlotArea::new(50.0, 20.0, 500.0, 300.0))
        .with_time_zone(TimeZoneMode::FixedOffsetMinutes { minutes: 120 });
    let mut chart = Chart::new(NullRenderer::default(), options).expect("chart init");
    let x = chart
        .add_axis(
            AxisCollection::X,
            AxisUserOptions {
                min: Some(0.0),
                max: Some(3.0 * DAY),
                tick_interval: Some(DAY),
                ..AxisUserOptions::new(AxisKind::Datetime)
            },
        )
        .expect("x axis");
    chart.redraw();

    // Local midnight at +02:00 is 22:00 UTC the day before; the floored
    // tick before `min` and the one past `max` are trimmed.
    let axis = chart.axis(x).expect("x axis");
    assert_eq!(
        axis.tick_positions(),
        &[DAY - 2.0 * HOUR, 2.0 * DAY - 2.0 * HOUR, 3.0 * DAY - 2.0 * HOUR]
    );
}

#[test]
fn calendar_days_survive_daylight_saving_shift() {
    let zone = SpringForward;
    let local_midnight = |day: u32, month: u32| {
        zone.with_ymd_and_hms(2024, month, day, 0, 0, 0)
            .single()
            .expect("unambiguous midnight")
            .timestamp_millis() as f64
    };
    let interval = NormalizedTimeInterval {
        unit: TimeUnit::Day,
        count: 1.0,
    };
    let ticks = time_ticks_in_zone(
        &zone,
        interval,
        local_midnight(29, 3),
        local_midnight(2, 4),
        1,
        true,
    );

    let gaps: Vec<f64> = ticks
        .positions
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / HOUR)
        .collect();
    assert_eq!(ticks.positions.len(), 5);
    assert_eq!(gaps, vec![24.0, 24.0, 23.0, 24.0]);
    for position in &ticks.positions {
        let local = zone
            .timestamp_millis_opt(*position as i64)
            .single()
            .expect("valid instant");
        assert_eq!(local.naive_local().time(), NaiveTime::MIN);
    }
}

#[test]
fn utc_day_ticks_step_by_fixed_length() {
    let interval = NormalizedTimeInterval {
        unit: TimeUnit::Day,
        count: 2.0,
    };
    let ticks = time_ticks_in_zone(&Utc, interval, 0.5 * DAY, 6.5 * DAY, 1, false);
    assert_eq!(ticks.positions, vec![0.0, 2.0 * DAY, 4.0 * DAY, 6.0 * DAY, 8.0 * DAY]);
    assert_eq!(ticks.info.total_range, 2.0 * DAY);
}

#[test]
fn long_ranges_pick_whole_years() {
    let picked = normalize_time_tick_interval(400.0 * DAY, None);
    assert_eq!(picked.unit, TimeUnit::Year);
    assert_eq!(picked.count, 1.0);

    let picked = normalize_time_tick_interval(30.0 * DAY, None);
    assert_eq!(picked.unit, TimeUnit::Month);
    assert_eq!(picked.count, 1.0);
}
