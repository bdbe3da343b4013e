use std::sync::Arc;

use tracing::debug;

use crate::axis::extremes::SeriesView;
use crate::axis::{Axis, AxisKind, LinkedParent, MinorTickInterval};
use crate::core::datetime::{normalize_time_tick_interval, time_ticks};
use crate::core::log_ticks::{LogTickRequest, log_tick_positions};
use crate::core::numeric::{
    correct_float, linear_tick_positions, log2lin, magnitude, normalize_tick_interval,
};
use crate::error::Diagnostic;

/// Arguments handed to a tick positioner callback, in real units.
#[derive(Debug, Clone, Copy)]
pub struct TickPositionerContext<'a> {
    pub kind: AxisKind,
    pub min: f64,
    pub max: f64,
    pub tick_interval: f64,
    /// Positions the axis generated on its own.
    pub generated: &'a [f64],
}

/// Replaces generated tick positions; `None` keeps them.
pub type TickPositionerFn =
    Arc<dyn Fn(&TickPositionerContext<'_>) -> Option<Vec<f64>> + Send + Sync>;

/// Padding added around a single tick so `min < max` holds.
const SINGLE_TICK_PAD: f64 = 0.001;
const LARGE_SINGLE_TICK_PAD: f64 = 1.0;
/// Magnitudes above this get the larger pad.
const LARGE_MAGNITUDE: f64 = 1e12;

impl Axis {
    /// Validates the configured link against the parent found by the chart.
    ///
    /// Missing parents and parents of another kind are reported and the
    /// axis falls back to its own extremes.
    pub(crate) fn resolve_link(&mut self, parent: Option<LinkedParent>) -> Option<LinkedParent> {
        let parent_id = self.options.linked_to?;
        match parent {
            None => {
                self.report(Diagnostic::LinkedAxisMissing {
                    axis: self.id(),
                    parent: parent_id,
                });
                None
            }
            Some(parent) if parent.kind != self.kind() => {
                self.report(Diagnostic::LinkedAxisKindMismatch {
                    axis: self.id(),
                    parent: parent_id,
                });
                None
            }
            Some(parent) => Some(parent),
        }
    }

    /// Resolves `min`/`max`, the tick interval and the tick positions.
    pub(crate) fn set_tick_positions(
        &mut self,
        views: &[SeriesView<'_>],
        linked: Option<&LinkedParent>,
    ) {
        let is_log = self.options.is_log();
        let is_datetime = self.options.is_datetime();
        let has_categories = self.options.categories.is_some();
        let len = self.len();
        let tick_pixel_interval = self.options.tick_pixel_interval;
        let tick_interval_option = self.options.tick_interval;

        self.state.old_min = self.state.min;
        self.state.old_max = self.state.max;
        self.state.time_info = None;
        self.state.minor_auto_interval = None;
        self.state.linked_parent = linked.map(|parent| parent.id);

        let (mut min, mut max) = self.initial_extremes(linked);

        // Linearize, then widen to the minimum range.
        if is_log {
            (min, max) = self.sanitize_log_extremes(min, max);
            min = correct_float(log2lin(min));
            max = correct_float(log2lin(max));
        }
        if max < min {
            max = min;
        }
        self.state.min = Some(min);
        self.state.max = Some(max);
        self.adjust_for_min_range();
        let (mut min, mut max) = (
            self.state.min.unwrap_or(min),
            self.state.max.unwrap_or(max),
        );

        if !has_categories && !self.stacks.uses_percentage() && linked.is_none() {
            let length = max - min;
            if length != 0.0 {
                let data_below_zero = |value: Option<f64>| value.is_some_and(|v| v < 0.0);
                let data_above_zero = |value: Option<f64>| value.is_some_and(|v| v > 0.0);
                if self.options.min.is_none()
                    && self.state.user_min.is_none()
                    && self.options.min_padding != 0.0
                    && (data_below_zero(self.state.data_min) || !self.state.ignore_min_padding)
                {
                    min -= length * self.options.min_padding;
                }
                if self.options.max.is_none()
                    && self.state.user_max.is_none()
                    && self.options.max_padding != 0.0
                    && (data_above_zero(self.state.data_max) || !self.state.ignore_max_padding)
                {
                    max += length * self.options.max_padding;
                }
            }
        }

        if let Some(floor) = self.options.floor {
            min = min.max(self.val2lin(floor));
        }
        if let Some(ceiling) = self.options.ceiling {
            max = max.min(self.val2lin(ceiling));
        }
        if max < min {
            max = min;
        }

        let mut keep_two_ticks_only = false;
        let mut tick_interval = if min == max {
            1.0
        } else if let Some(parent) = linked.filter(|parent| {
            tick_interval_option.is_none() && parent.tick_pixel_interval == tick_pixel_interval
        }) {
            parent.tick_interval
        } else {
            let mut interval = tick_interval_option.unwrap_or(if has_categories {
                1.0
            } else {
                (max - min) * tick_pixel_interval / len.max(tick_pixel_interval)
            });
            if tick_interval_option.is_none()
                && len < tick_pixel_interval
                && !is_log
                && !has_categories
                && self.options.start_on_tick
                && self.options.end_on_tick
            {
                keep_two_ticks_only = true;
                interval /= self.options.squished_interval_divisor;
            }
            interval
        };

        self.state.min = Some(min);
        self.state.max = Some(max);
        self.set_axis_translation(views, linked, true);

        if self.state.point_range > 0.0 {
            tick_interval = tick_interval.max(self.state.point_range);
        }
        if tick_interval_option.is_none() {
            if let Some(floor) = self.options.min_tick_interval {
                tick_interval = tick_interval.max(floor);
            }
        }
        if !is_datetime && !is_log && tick_interval_option.is_none() {
            tick_interval = normalize_tick_interval(
                tick_interval,
                None,
                magnitude(tick_interval),
                self.options.allow_decimals,
            );
        }
        if !tick_interval.is_finite() || tick_interval <= 0.0 {
            tick_interval = 1.0;
        }

        let mut positions = match self.explicit_tick_positions() {
            Some(explicit) => explicit,
            None => {
                let (generated, interval) = self.generate_positions(tick_interval, min, max);
                tick_interval = interval;
                let mut generated = self.apply_positioner(generated, tick_interval, min, max);
                if keep_two_ticks_only && generated.len() > 2 {
                    let last = generated[generated.len() - 1];
                    generated.truncate(1);
                    generated.push(last);
                }
                generated
            }
        };

        let mut trimmed_away = false;
        if linked.is_none() && !positions.is_empty() {
            let rounded_min = positions[0];
            let rounded_max = positions[positions.len() - 1];
            let min_point_offset = self.state.min_point_offset;

            if self.options.start_on_tick && self.state.user_min.is_none() {
                min = rounded_min;
            } else if min - min_point_offset > rounded_min {
                positions.remove(0);
            }
            if self.options.end_on_tick && self.state.user_max.is_none() {
                max = rounded_max;
            } else if positions
                .last()
                .is_some_and(|last| max + min_point_offset < *last)
            {
                positions.pop();
            }
            trimmed_away = positions.is_empty();
        }
        if positions.is_empty() {
            positions.push(correct_float((min + max) / 2.0));
        }
        if linked.is_none() && positions.len() == 1 && !trimmed_away {
            let pad = if magnitude(max.abs()) > LARGE_MAGNITUDE {
                LARGE_SINGLE_TICK_PAD
            } else {
                SINGLE_TICK_PAD
            };
            min -= pad;
            max += pad;
        }

        self.state.min = Some(min);
        self.state.max = Some(max);
        // Snapping and padding moved the extremes; rescale to the final span.
        self.set_axis_translation(views, linked, false);
        self.state.tick_interval = tick_interval;
        self.state.tick_positions = positions;
        self.state.minor_tick_interval = match self.options.minor_tick_interval {
            Some(MinorTickInterval::Auto) => Some(tick_interval / 5.0),
            Some(MinorTickInterval::Value(step)) => Some(step),
            None => None,
        };
        self.state.minor_tick_positions = self.minor_positions(min, max);

        debug!(
            axis = %self.id(),
            kind = ?self.kind(),
            min,
            max,
            tick_interval,
            tick_count = self.state.tick_positions.len(),
            "axis scale resolved"
        );
    }

    /// Starting extremes in real units, before padding.
    fn initial_extremes(&mut self, linked: Option<&LinkedParent>) -> (f64, f64) {
        let (mut min, max) = match linked {
            Some(parent) => (
                parent.extremes.min.or(parent.extremes.data_min),
                parent.extremes.max.or(parent.extremes.data_max),
            ),
            None => (
                self.state.user_min.or(self.options.min).or(self.state.data_min),
                self.state.user_max.or(self.options.max).or(self.state.data_max),
            ),
        };

        if linked.is_none() && !self.state.range_applied {
            if let (Some(range), Some(top)) = (self.options.range, max) {
                let bottom = min.map_or(top - range, |current| current.max(top - range));
                self.state.user_min = Some(bottom);
                self.state.user_max = Some(top);
                min = Some(bottom);
            }
            self.state.range_applied = true;
        }

        let empty = if self.options.is_log() { 1.0 } else { 0.0 };
        match (min, max) {
            (Some(min), Some(max)) => (min, max),
            (Some(only), None) | (None, Some(only)) => (only, only),
            (None, None) => (empty, empty),
        }
    }

    /// Replaces non-positive extremes on a logarithmic axis.
    fn sanitize_log_extremes(&mut self, mut min: f64, mut max: f64) -> (f64, f64) {
        let positive = |value: Option<f64>| value.filter(|v| *v > 0.0);
        if min <= 0.0 {
            self.report(Diagnostic::NonPositiveLogValue {
                axis: self.id(),
                value: min,
            });
            min = positive(self.state.data_min).unwrap_or(1.0);
        }
        if max <= 0.0 {
            self.report(Diagnostic::NonPositiveLogValue {
                axis: self.id(),
                value: max,
            });
            max = positive(self.state.data_max).unwrap_or(min * 10.0);
        }
        if max < min {
            max = min;
        }
        (min, max)
    }

    /// Configured `tickPositions`, linearized, sorted and deduplicated.
    fn explicit_tick_positions(&self) -> Option<Vec<f64>> {
        let explicit = self.options.tick_positions.as_ref()?;
        let positions = self.sanitize_positions(explicit.iter().copied());
        (!positions.is_empty()).then_some(positions)
    }

    fn sanitize_positions(&self, values: impl Iterator<Item = f64>) -> Vec<f64> {
        let mut positions: Vec<f64> = values
            .filter(|value| value.is_finite() && (!self.options.is_log() || *value > 0.0))
            .map(|value| correct_float(self.val2lin(value)))
            .collect();
        positions.sort_by(f64::total_cmp);
        positions.dedup();
        positions
    }

    /// Runs the normalizer for the axis kind; returns positions and the
    /// interval they were built with.
    fn generate_positions(&mut self, tick_interval: f64, min: f64, max: f64) -> (Vec<f64>, f64) {
        let ratio = (max - min) / tick_interval;
        let limit = (2.0 * self.len()).max(200.0);
        if ratio > limit {
            self.report(Diagnostic::TooManyTicks {
                axis: self.id(),
                ratio,
            });
            let span = max - min;
            let mut fallback = vec![min, max];
            fallback.dedup();
            return (fallback, if span > 0.0 { span } else { 1.0 });
        }

        match self.kind() {
            AxisKind::Datetime => {
                let normalized =
                    normalize_time_tick_interval(tick_interval, self.options.units.as_deref());
                let ticks = time_ticks(
                    normalized,
                    min,
                    max,
                    self.options.start_of_week,
                    self.time_zone,
                );
                self.state.time_info = Some(ticks.info);
                (ticks.positions, normalized.total_range())
            }
            AxisKind::Logarithmic => {
                let ticks = log_tick_positions(&LogTickRequest {
                    interval: tick_interval,
                    min,
                    max,
                    minor: false,
                    interval_option: self.options.tick_interval,
                    tick_pixel_interval: self.options.tick_pixel_interval,
                    axis_len: self.len(),
                    major_tick_count: 0,
                    minor_auto_interval: None,
                });
                self.state.minor_auto_interval = ticks.minor_auto_interval;
                (ticks.positions, ticks.interval)
            }
            AxisKind::Linear | AxisKind::Category => {
                (linear_tick_positions(tick_interval, min, max), tick_interval)
            }
        }
    }

    fn apply_positioner(&self, generated: Vec<f64>, tick_interval: f64, min: f64, max: f64) -> Vec<f64> {
        let Some(positioner) = &self.tick_positioner else {
            return generated;
        };
        let real: Vec<f64> = generated.iter().map(|value| self.lin2val(*value)).collect();
        let context = TickPositionerContext {
            kind: self.kind(),
            min: self.lin2val(min),
            max: self.lin2val(max),
            tick_interval,
            generated: &real,
        };
        match positioner(&context) {
            Some(custom) => {
                let positions = self.sanitize_positions(custom.into_iter());
                if positions.is_empty() {
                    generated
                } else {
                    positions
                }
            }
            None => generated,
        }
    }

    fn minor_positions(&self, min: f64, max: f64) -> Vec<f64> {
        let Some(minor) = self.state.minor_tick_interval.filter(|step| *step > 0.0) else {
            return Vec::new();
        };
        let majors = &self.state.tick_positions;
        if majors.is_empty() {
            return Vec::new();
        }

        let mut positions = if self.options.is_datetime()
            && self.options.minor_tick_interval == Some(MinorTickInterval::Auto)
        {
            let normalized =
                normalize_time_tick_interval(minor, self.options.units.as_deref());
            let mut positions = time_ticks(
                normalized,
                min,
                max,
                self.options.start_of_week,
                self.time_zone,
            )
            .positions;
            if positions.first().is_some_and(|first| *first < min) {
                positions.remove(0);
            }
            positions
        } else if self.options.is_log() {
            let interval_option = match self.options.minor_tick_interval {
                Some(MinorTickInterval::Value(step)) => Some(step),
                _ => None,
            };
            majors
                .windows(2)
                .flat_map(|pair| {
                    log_tick_positions(&LogTickRequest {
                        interval: minor,
                        min: pair[0],
                        max: pair[1],
                        minor: true,
                        interval_option,
                        tick_pixel_interval: self.options.tick_pixel_interval,
                        axis_len: self.len(),
                        major_tick_count: majors.len(),
                        minor_auto_interval: self.state.minor_auto_interval,
                    })
                    .positions
                })
                .collect()
        } else {
            if (max - min) / minor > (10.0 * self.len()).max(1_000.0) {
                return Vec::new();
            }
            let mut positions = Vec::new();
            let mut pos = correct_float(min + (majors[0] - min) % minor);
            while pos <= max {
                positions.push(pos);
                let next = correct_float(pos + minor);
                if next <= pos {
                    break;
                }
                pos = next;
            }
            positions
        };

        positions.retain(|value| *value >= min && *value <= max);
        positions.sort_by(f64::total_cmp);
        positions.dedup();
        positions
    }
}
