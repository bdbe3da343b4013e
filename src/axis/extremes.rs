use serde::{Deserialize, Serialize};

use crate::axis::{Axis, AxisCollection, AxisId, AxisKind};
use crate::core::numeric::correct_float;
use crate::core::{StackSeries, Stacks};
use crate::error::Diagnostic;
use crate::series::{SeriesSource, finite_extremes};

/// Extremes in real units, as reported to chart and series code.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisExtremes {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub data_min: Option<f64>,
    pub data_max: Option<f64>,
    pub user_min: Option<f64>,
    pub user_max: Option<f64>,
}

/// What a linked axis reads from its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkedParent {
    pub id: AxisId,
    pub kind: AxisKind,
    pub extremes: AxisExtremes,
    pub tick_interval: f64,
    pub tick_pixel_interval: f64,
    pub min_point_offset: f64,
    pub point_range_padding: f64,
}

/// A series attached to the axis being resolved.
#[derive(Clone, Copy)]
pub(crate) struct SeriesView<'a> {
    pub(crate) index: usize,
    pub(crate) source: &'a dyn SeriesSource,
    /// User-pinned extremes of the series' x axis, for y extremes.
    pub(crate) x_window: Option<(f64, f64)>,
}

impl Axis {
    /// `{min, max, dataMin, dataMax, userMin, userMax}` in real units.
    #[must_use]
    pub fn get_extremes(&self) -> AxisExtremes {
        let real = |value: Option<f64>| {
            value.map(|lin| {
                if self.options.is_log() {
                    correct_float(self.lin2val(lin))
                } else {
                    lin
                }
            })
        };
        AxisExtremes {
            min: real(self.state.min),
            max: real(self.state.max),
            data_min: self.state.data_min,
            data_max: self.state.data_max,
            user_min: self.state.user_min,
            user_max: self.state.user_max,
        }
    }

    #[must_use]
    pub fn linked_parent_view(&self) -> LinkedParent {
        LinkedParent {
            id: self.id(),
            kind: self.kind(),
            extremes: self.get_extremes(),
            tick_interval: self.state.tick_interval,
            tick_pixel_interval: self.options.tick_pixel_interval,
            min_point_offset: self.state.min_point_offset,
            point_range_padding: self.state.point_range_padding,
        }
    }

    pub(crate) fn set_user_extremes(&mut self, min: Option<f64>, max: Option<f64>) {
        self.state.user_min = min;
        self.state.user_max = max;
        self.state.range_applied = true;
    }

    /// Rebuilds the stacks of a value axis from its stacking series.
    pub(crate) fn build_stacks(&mut self, views: &[SeriesView<'_>], ignore_hidden: bool) {
        if self.collection() != AxisCollection::Y {
            self.stacks = Stacks::default();
            return;
        }
        let inputs: Vec<StackSeries<'_>> = views
            .iter()
            .filter(|view| view.source.is_visible() || !ignore_hidden)
            .filter_map(|view| {
                let mode = view.source.stacking()?;
                Some(StackSeries {
                    series_index: view.index,
                    group: view.source.stack_group(),
                    mode,
                    threshold: view.source.threshold().unwrap_or(0.0),
                    negative_stacks: view.source.negative_stacks(),
                    x_data: view.source.x_data(),
                    y_data: view.source.y_data(),
                })
            })
            .collect();
        self.stacks = Stacks::build(&inputs, self.options.reversed_stacks);
    }

    /// Folds attached series into `dataMin`/`dataMax`.
    ///
    /// Value axes also pull their extremes onto a series threshold when all
    /// data lies on one side of it, and skip padding on that side.
    pub(crate) fn get_series_extremes(&mut self, views: &[SeriesView<'_>], ignore_hidden: bool) {
        let is_log = self.options.is_log();
        let horizontal = self.is_horizontal();
        {
            let state = &mut self.state;
            state.has_visible_series = false;
            state.data_min = None;
            state.data_max = None;
            state.ignore_min_padding = false;
            state.ignore_max_padding = false;
            state.closest_data_gap = None;
        }

        for view in views {
            if ignore_hidden && !view.source.is_visible() {
                continue;
            }
            self.state.has_visible_series = true;

            let raw = if horizontal {
                view.source.x_data()
            } else {
                view.source.y_data()
            };
            if is_log {
                if let Some(value) = raw.iter().copied().find(|v| v.is_finite() && *v <= 0.0) {
                    self.report(Diagnostic::NonPositiveLogValue {
                        axis: self.id(),
                        value,
                    });
                }
            }

            let extremes = if horizontal {
                if let Some(gap) = view.source.closest_point_range() {
                    self.state.closest_data_gap =
                        Some(self.state.closest_data_gap.map_or(gap, |closest| closest.min(gap)));
                }
                finite_extremes(raw, is_log)
            } else if view.source.stacking().is_some() {
                self.stacks.series_extremes(view.index)
            } else {
                view.source.y_extremes(view.x_window, is_log)
            };

            let state = &mut self.state;
            if let Some((low, high)) = extremes {
                state.data_min = Some(state.data_min.map_or(low, |min| min.min(low)));
                state.data_max = Some(state.data_max.map_or(high, |max| max.max(high)));
            }

            if horizontal {
                continue;
            }
            let threshold = view
                .source
                .threshold()
                .filter(|threshold| !is_log || *threshold > 0.0);
            if let (Some(threshold), Some(data_min), Some(data_max)) =
                (threshold, state.data_min, state.data_max)
            {
                if data_min >= threshold {
                    state.data_min = Some(threshold);
                    state.ignore_min_padding = true;
                } else if data_max < threshold {
                    state.data_max = Some(threshold);
                    state.ignore_max_padding = true;
                }
            }
        }
    }

    /// Widens `[min, max]` to the minimum range around its midpoint.
    ///
    /// X axes without configured extremes derive the range from five times
    /// the closest data gap, capped by the data span. One pass is enough:
    /// the only correction re-centres `min` after `max` hit a bound.
    pub(crate) fn adjust_for_min_range(&mut self) {
        let (Some(mut min), Some(mut max)) = (self.state.min, self.state.max) else {
            return;
        };
        let options_min = self.options.min.map(|value| self.val2lin(value));
        let options_max = self.options.max.map(|value| self.val2lin(value));
        let data_min = self.state.data_min.map(|value| self.val2lin(value));
        let data_max = self.state.data_max.map(|value| self.val2lin(value));

        self.state.min_range = if self.options.min_range.is_some() {
            self.options.min_range
        } else if self.is_horizontal()
            && !self.options.is_log()
            && self.options.min.is_none()
            && self.options.max.is_none()
        {
            match (self.state.closest_data_gap, data_min, data_max) {
                (Some(gap), Some(low), Some(high)) => Some((gap * 5.0).min(high - low)),
                _ => None,
            }
        } else {
            None
        };

        let Some(min_range) = self.state.min_range else {
            return;
        };
        let space_available = matches!(
            (data_min, data_max),
            (Some(low), Some(high)) if high - low >= min_range
        );

        if max - min < min_range {
            let zoom_offset = (min_range - max + min) / 2.0;
            let mut min_args = vec![min - zoom_offset, options_min.unwrap_or(min - zoom_offset)];
            if space_available {
                min_args.extend(data_min);
            }
            min = fold_max(&min_args);

            let mut max_args = vec![min + min_range, options_max.unwrap_or(min + min_range)];
            if space_available {
                max_args.extend(data_max);
            }
            max = fold_min(&max_args);

            if max - min < min_range {
                min_args[0] = max - min_range;
                min_args[1] = options_min.unwrap_or(max - min_range);
                min = fold_max(&min_args);
            }
        }

        self.state.min = Some(min);
        self.state.max = Some(max);
    }
}

fn fold_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn fold_min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}
