//! Calendar-aware tick intervals and positions for datetime axes.
//!
//! Axis values are milliseconds since the Unix epoch. Tick generation floors
//! the minimum to a unit-aligned boundary in the configured zone and steps
//! forward with calendar arithmetic for months and years, and for days and
//! weeks outside UTC so daylight-saving shifts keep ticks on local midnight.

use std::collections::BTreeMap;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime,
    NaiveTime, Offset, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};

use crate::core::numeric::{magnitude, normalize_tick_interval};

pub const MILLISECOND: f64 = 1.0;
pub const SECOND: f64 = 1_000.0;
pub const MINUTE: f64 = 60_000.0;
pub const HOUR: f64 = 3_600_000.0;
pub const DAY: f64 = 24.0 * HOUR;
pub const WEEK: f64 = 7.0 * DAY;
pub const MONTH: f64 = 31.0 * DAY;
pub const YEAR: f64 = 31_556_952_000.0;

/// Upper bound on positions produced by one time tick pass.
pub const MAX_TIME_TICKS: usize = 10_000;

/// Calendar granularity of a datetime tick run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Nominal length used for interval selection; months and years are
    /// stepped on the calendar, not by this length.
    #[must_use]
    pub const fn millis(self) -> f64 {
        match self {
            Self::Millisecond => MILLISECOND,
            Self::Second => SECOND,
            Self::Minute => MINUTE,
            Self::Hour => HOUR,
            Self::Day => DAY,
            Self::Week => WEEK,
            Self::Month => MONTH,
            Self::Year => YEAR,
        }
    }
}

/// One row of the unit escalation table (`units` option).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeUnitRule {
    pub unit: TimeUnit,
    /// `None` means any "nice" multiple (years only in the default table).
    #[serde(default)]
    pub multiples: Option<Vec<f64>>,
}

impl TimeUnitRule {
    #[must_use]
    pub fn new(unit: TimeUnit, multiples: &[f64]) -> Self {
        Self {
            unit,
            multiples: Some(multiples.to_vec()),
        }
    }
}

#[must_use]
pub fn default_time_units() -> Vec<TimeUnitRule> {
    vec![
        TimeUnitRule::new(
            TimeUnit::Millisecond,
            &[1.0, 2.0, 5.0, 10.0, 20.0, 25.0, 50.0, 100.0, 200.0, 500.0],
        ),
        TimeUnitRule::new(TimeUnit::Second, &[1.0, 2.0, 5.0, 10.0, 15.0, 30.0]),
        TimeUnitRule::new(TimeUnit::Minute, &[1.0, 2.0, 5.0, 10.0, 15.0, 30.0]),
        TimeUnitRule::new(TimeUnit::Hour, &[1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 12.0]),
        TimeUnitRule::new(TimeUnit::Day, &[1.0, 2.0]),
        TimeUnitRule::new(TimeUnit::Week, &[1.0, 2.0]),
        TimeUnitRule::new(TimeUnit::Month, &[1.0, 2.0, 3.0, 4.0, 6.0]),
        TimeUnitRule {
            unit: TimeUnit::Year,
            multiples: None,
        },
    ]
}

/// A unit plus how many of it separate two ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTimeInterval {
    pub unit: TimeUnit,
    pub count: f64,
}

impl NormalizedTimeInterval {
    #[must_use]
    pub fn unit_range(self) -> f64 {
        self.unit.millis()
    }

    #[must_use]
    pub fn total_range(self) -> f64 {
        self.unit.millis() * self.count
    }
}

/// Picks the smallest unit/multiple pair that covers `tick_interval`.
///
/// Each unit wins when the request does not exceed the midpoint between its
/// largest multiple and the next unit. Years only use 1, 2 or 5 below five
/// years and decade-scaled multiples above, so 2.5 years never appears.
#[must_use]
pub fn normalize_time_tick_interval(
    tick_interval: f64,
    units: Option<&[TimeUnitRule]>,
) -> NormalizedTimeInterval {
    let default_units;
    let units = match units {
        Some(units) if !units.is_empty() => units,
        _ => {
            default_units = default_time_units();
            default_units.as_slice()
        }
    };

    let mut selected = &units[units.len() - 1];
    for (index, rule) in units.iter().enumerate() {
        selected = rule;
        let Some(next) = units.get(index + 1) else {
            break;
        };
        let largest = rule
            .multiples
            .as_ref()
            .and_then(|multiples| multiples.last().copied())
            .unwrap_or(1.0);
        let less_than = (rule.unit.millis() * largest + next.unit.millis()) / 2.0;
        if tick_interval <= less_than {
            break;
        }
    }

    let unit_range = selected.unit.millis();
    let mut multiples = selected.multiples.clone();
    if selected.unit == TimeUnit::Year && tick_interval < 5.0 * unit_range {
        multiples = Some(vec![1.0, 2.0, 5.0]);
    }

    let ratio = tick_interval / unit_range;
    let count_magnitude = if selected.unit == TimeUnit::Year {
        magnitude(ratio).max(1.0)
    } else {
        1.0
    };
    let count = normalize_tick_interval(ratio, multiples.as_deref(), count_magnitude, true);

    NormalizedTimeInterval {
        unit: selected.unit,
        count: count.round().max(1.0),
    }
}

/// Zone in which calendar boundaries are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimeZoneMode {
    #[default]
    Utc,
    FixedOffsetMinutes {
        minutes: i16,
    },
    /// The host's local zone, including its daylight-saving rules.
    Local,
}

impl TimeZoneMode {
    #[must_use]
    pub fn is_utc(self) -> bool {
        matches!(self, Self::Utc)
    }

    fn fixed_offset(minutes: i16) -> FixedOffset {
        FixedOffset::east_opt(i32::from(minutes) * 60).unwrap_or_else(|| Utc.fix())
    }
}

/// Metadata describing a generated time tick run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeTickInfo {
    pub unit: Option<TimeUnit>,
    pub count: f64,
    pub total_range: f64,
    /// Ticks that also land on a coarser boundary, keyed by epoch millis.
    pub higher_ranks: BTreeMap<i64, TimeUnit>,
}

impl TimeTickInfo {
    #[must_use]
    pub fn higher_rank(&self, value: f64) -> Option<TimeUnit> {
        self.higher_ranks.get(&(value.round() as i64)).copied()
    }

    #[must_use]
    pub fn is_day_boundary(&self, value: f64) -> bool {
        self.higher_rank(value) == Some(TimeUnit::Day)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeTicks {
    pub positions: Vec<f64>,
    pub info: TimeTickInfo,
}

/// Generates time ticks for `[min, max]` in the given zone mode.
///
/// `start_of_week` counts days from Sunday (`1` = Monday).
#[must_use]
pub fn time_ticks(
    interval: NormalizedTimeInterval,
    min: f64,
    max: f64,
    start_of_week: u8,
    zone: TimeZoneMode,
) -> TimeTicks {
    match zone {
        TimeZoneMode::Utc => time_ticks_in_zone(&Utc, interval, min, max, start_of_week, false),
        TimeZoneMode::FixedOffsetMinutes { minutes } => time_ticks_in_zone(
            &TimeZoneMode::fixed_offset(minutes),
            interval,
            min,
            max,
            start_of_week,
            true,
        ),
        TimeZoneMode::Local => {
            time_ticks_in_zone(&Local, interval, min, max, start_of_week, true)
        }
    }
}

/// Generates time ticks in an arbitrary `chrono` zone.
///
/// With `calendar_days` set, day and week steps are re-derived from calendar
/// fields instead of adding fixed millisecond deltas.
#[must_use]
pub fn time_ticks_in_zone<Tz: TimeZone>(
    tz: &Tz,
    interval: NormalizedTimeInterval,
    min: f64,
    max: f64,
    start_of_week: u8,
    calendar_days: bool,
) -> TimeTicks {
    let unit = interval.unit;
    let unit_range = unit.millis();
    let count = interval.count.max(1.0);
    let count_int = count as u32;
    let mut info = TimeTickInfo {
        unit: Some(unit),
        count,
        total_range: unit_range * count,
        higher_ranks: BTreeMap::new(),
    };

    if !min.is_finite() || !max.is_finite() {
        return TimeTicks {
            positions: Vec::new(),
            info,
        };
    }

    let Some(start) = tz.timestamp_millis_opt(min.floor() as i64).earliest() else {
        return TimeTicks {
            positions: vec![min],
            info,
        };
    };
    let floored = floor_to_unit(start.naive_local(), unit, count_int, start_of_week);
    let Some(start_ms) = local_to_millis(tz, floored) else {
        return TimeTicks {
            positions: vec![min],
            info,
        };
    };

    let base_year = floored.year();
    let base_month0 = floored.month0() as i32;
    let base_date = floored.date();
    let step = i64::from(count_int);

    let mut positions = Vec::new();
    let mut time = start_ms;
    let mut index: i64 = 1;
    while time < max && positions.len() < MAX_TIME_TICKS {
        positions.push(time);
        let next = match unit {
            TimeUnit::Year => {
                calendar_millis(tz, base_year + (index * step) as i32, 0, 1)
            }
            TimeUnit::Month => {
                let months = base_month0 as i64 + index * step;
                let year = base_year + months.div_euclid(12) as i32;
                calendar_millis(tz, year, months.rem_euclid(12) as u32, 1)
            }
            TimeUnit::Day | TimeUnit::Week if calendar_days => {
                let days = index * step * if unit == TimeUnit::Week { 7 } else { 1 };
                base_date
                    .checked_add_signed(Duration::days(days))
                    .and_then(|date| local_to_millis(tz, date.and_time(NaiveTime::MIN)))
            }
            _ => Some(time + unit_range * count),
        };
        let Some(next) = next else {
            break;
        };
        time = next;
        index += 1;
    }
    positions.push(time);

    if unit_range <= HOUR {
        for value in &positions {
            if is_local_midnight(tz, *value) {
                info.higher_ranks.insert(value.round() as i64, TimeUnit::Day);
            }
        }
    }

    TimeTicks { positions, info }
}

/// Formats an epoch-millisecond value with a `chrono` strftime pattern.
#[must_use]
pub fn format_time(value: f64, pattern: &str, zone: TimeZoneMode) -> String {
    let millis = value.round() as i64;
    match zone {
        TimeZoneMode::Utc => format_in_zone(&Utc, millis, pattern),
        TimeZoneMode::FixedOffsetMinutes { minutes } => {
            format_in_zone(&TimeZoneMode::fixed_offset(minutes), millis, pattern)
        }
        TimeZoneMode::Local => format_in_zone(&Local, millis, pattern),
    }
}

fn format_in_zone<Tz: TimeZone>(tz: &Tz, millis: i64, pattern: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match tz.timestamp_millis_opt(millis).earliest() {
        Some(dt) => dt.format(pattern).to_string(),
        None => millis.to_string(),
    }
}

fn floor_to_unit(
    local: NaiveDateTime,
    unit: TimeUnit,
    count: u32,
    start_of_week: u8,
) -> NaiveDateTime {
    let range = unit.millis();
    let count = count.max(1);
    let floor_by = |value: u32| count * (value / count);

    let (mut hour, mut minute, mut second, mut milli) = (
        local.hour(),
        local.minute(),
        local.second(),
        local.nanosecond() / 1_000_000,
    );
    let (mut year, mut month0, mut day) = (local.year(), local.month0(), local.day());

    if range >= SECOND {
        milli = 0;
        second = if range >= MINUTE { 0 } else { floor_by(second) };
    } else {
        milli = floor_by(milli);
    }
    if range >= MINUTE {
        minute = if range >= HOUR { 0 } else { floor_by(minute) };
    }
    if range >= HOUR {
        hour = if range >= DAY { 0 } else { floor_by(hour) };
    }
    if range >= DAY && unit != TimeUnit::Week {
        day = if range >= MONTH {
            1
        } else {
            1 + count * ((day - 1) / count)
        };
    }
    if range >= MONTH {
        month0 = if range >= YEAR { 0 } else { floor_by(month0) };
    }
    if range >= YEAR {
        year -= year.rem_euclid(count as i32);
    }

    let mut date = NaiveDate::from_ymd_opt(year, month0 + 1, day).unwrap_or(local.date());
    if unit == TimeUnit::Week {
        let from_sunday = date.weekday().num_days_from_sunday();
        let back = (from_sunday + 7 - u32::from(start_of_week % 7)) % 7;
        date = date - Duration::days(i64::from(back));
    }
    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, milli).unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}

fn calendar_millis<Tz: TimeZone>(tz: &Tz, year: i32, month0: u32, day: u32) -> Option<f64> {
    let date = NaiveDate::from_ymd_opt(year, month0 + 1, day)?;
    local_to_millis(tz, date.and_time(NaiveTime::MIN))
}

fn local_to_millis<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<f64> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.timestamp_millis() as f64),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.timestamp_millis() as f64),
        // Skipped by a forward DST jump: the first valid instant after it.
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|dt: DateTime<Tz>| dt.timestamp_millis() as f64),
    }
}

fn is_local_midnight<Tz: TimeZone>(tz: &Tz, value: f64) -> bool {
    tz.timestamp_millis_opt(value.round() as i64)
        .earliest()
        .map(|dt| dt.naive_local().time() == NaiveTime::MIN)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{
        DAY, HOUR, MINUTE, NormalizedTimeInterval, TimeUnit, TimeZoneMode,
        normalize_time_tick_interval, time_ticks,
    };

    #[test]
    fn normalizer_picks_unit_by_midpoint_breakpoints() {
        let picked = normalize_time_tick_interval(50.0 * MINUTE, None);
        assert_eq!(picked.unit, TimeUnit::Hour);
        assert_eq!(picked.count, 1.0);

        let picked = normalize_time_tick_interval(4.0 * MINUTE, None);
        assert_eq!(picked.unit, TimeUnit::Minute);
        assert_eq!(picked.count, 5.0);

        let picked = normalize_time_tick_interval(9.0 * HOUR, None);
        assert_eq!(picked.unit, TimeUnit::Hour);
        assert_eq!(picked.count, 8.0);
    }

    #[test]
    fn normalizer_never_returns_two_and_a_half_years() {
        for years in [1.2, 2.2, 2.5, 2.8, 3.6, 4.4] {
            let picked = normalize_time_tick_interval(years * super::YEAR, None);
            assert_eq!(picked.unit, TimeUnit::Year);
            assert!([1.0, 2.0, 5.0].contains(&picked.count), "{years} -> {picked:?}");
        }
    }

    #[test]
    fn utc_minute_ticks_floor_to_count() {
        let interval = NormalizedTimeInterval {
            unit: TimeUnit::Minute,
            count: 15.0,
        };
        let ticks = time_ticks(interval, 7.0 * MINUTE, 50.0 * MINUTE, 1, TimeZoneMode::Utc);
        assert_eq!(
            ticks.positions,
            vec![0.0, 15.0 * MINUTE, 30.0 * MINUTE, 45.0 * MINUTE, 60.0 * MINUTE]
        );
        assert!(ticks.info.is_day_boundary(0.0));
    }

    #[test]
    fn week_ticks_start_on_configured_weekday() {
        // 1970-01-01 was a Thursday; the Monday before is 1969-12-29.
        let interval = NormalizedTimeInterval {
            unit: TimeUnit::Week,
            count: 1.0,
        };
        let ticks = time_ticks(interval, 0.0, 10.0 * DAY, 1, TimeZoneMode::Utc);
        assert_eq!(ticks.positions[0], -3.0 * DAY);
        assert_eq!(ticks.positions[1], 4.0 * DAY);
    }
}
