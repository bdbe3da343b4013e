//! The boundary between axes and series.
//!
//! Axes only read series data: extremes, raw x/y arrays for range
//! heuristics, stacking and placement hints. Cropping and grouping stay on
//! the series side and run through [`SeriesSource::process_data`] once the
//! axes have settled their extremes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::StackingMode;

/// Where a point sits inside its x slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointPlacement {
    On,
    Between,
    /// Offset as a fraction of the point range, `-0.5..=0.5`.
    Fraction(f64),
}

impl PointPlacement {
    /// Offset in point-range units applied by the axis translation.
    #[must_use]
    pub fn offset(self) -> f64 {
        match self {
            Self::On => 0.0,
            Self::Between => 0.5,
            Self::Fraction(value) => value,
        }
    }
}

/// Data a series exposes to the axes it is attached to.
pub trait SeriesSource: fmt::Debug {
    fn name(&self) -> &str;

    fn x_data(&self) -> &[f64];

    fn y_data(&self) -> &[f64];

    fn is_visible(&self) -> bool {
        true
    }

    /// `(dataMin, dataMax)` of the y values.
    ///
    /// With an `x_window`, only points inside it (plus the neighbour just
    /// outside each edge) count. With `positive_only` set, values that
    /// cannot be shown on a logarithmic axis are skipped.
    fn y_extremes(&self, x_window: Option<(f64, f64)>, positive_only: bool) -> Option<(f64, f64)> {
        let Some((x_min, x_max)) = x_window else {
            return finite_extremes(self.y_data(), positive_only);
        };
        let x = self.x_data();
        let visible: Vec<f64> = self
            .y_data()
            .iter()
            .enumerate()
            .filter(|(index, _)| {
                let Some(&here) = x.get(*index) else {
                    return false;
                };
                let next = x.get(index + 1).copied().unwrap_or(here);
                let previous = index
                    .checked_sub(1)
                    .and_then(|before| x.get(before).copied())
                    .unwrap_or(here);
                next >= x_min && previous <= x_max
            })
            .map(|(_, value)| *value)
            .collect();
        finite_extremes(&visible, positive_only)
    }

    /// Baseline the series is drawn from, such as zero for columns.
    fn threshold(&self) -> Option<f64> {
        None
    }

    fn stacking(&self) -> Option<StackingMode> {
        None
    }

    fn stack_group(&self) -> &str {
        ""
    }

    /// Whether values below the threshold stack separately.
    fn negative_stacks(&self) -> bool {
        false
    }

    /// Width of one point's slot in axis units.
    fn point_range(&self) -> f64 {
        0.0
    }

    fn point_placement(&self) -> Option<PointPlacement> {
        None
    }

    /// Smallest positive gap between consecutive x values.
    fn closest_point_range(&self) -> Option<f64> {
        closest_gap(self.x_data())
    }

    /// Called once per redraw after all axis extremes are fixed.
    fn process_data(&mut self, _force: bool, _x_min: f64, _x_max: f64) {}
}

/// Min and max over the finite values of `values`.
#[must_use]
pub fn finite_extremes(values: &[f64], positive_only: bool) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite() && (!positive_only || *value > 0.0))
        .fold(None, |acc, value| match acc {
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
            None => Some((value, value)),
        })
}

/// Smallest positive distance between consecutive values.
#[must_use]
pub fn closest_gap(values: &[f64]) -> Option<f64> {
    values
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .filter(|gap| gap.is_finite() && *gap > 0.0)
        .fold(None, |acc: Option<f64>, gap| {
            Some(acc.map_or(gap, |closest| closest.min(gap)))
        })
}

/// In-memory series used by hosts without their own data pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    name: String,
    x: Vec<f64>,
    y: Vec<f64>,
    visible: bool,
    threshold: Option<f64>,
    stacking: Option<StackingMode>,
    stack_group: String,
    negative_stacks: bool,
    point_range: f64,
    point_placement: Option<PointPlacement>,
    last_process: Option<(bool, f64, f64)>,
}

impl SeriesData {
    #[must_use]
    pub fn new(name: impl Into<String>, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (x, y) = points.into_iter().unzip();
        Self {
            name: name.into(),
            x,
            y,
            visible: true,
            threshold: None,
            stacking: None,
            stack_group: String::new(),
            negative_stacks: false,
            point_range: 0.0,
            point_placement: None,
            last_process: None,
        }
    }

    /// Series whose x values are the indexes `0, 1, 2, ..`.
    #[must_use]
    pub fn from_values(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(
            name,
            values
                .into_iter()
                .enumerate()
                .map(|(index, value)| (index as f64, value)),
        )
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_stacking(mut self, mode: StackingMode) -> Self {
        self.stacking = Some(mode);
        self
    }

    #[must_use]
    pub fn with_stack_group(mut self, group: impl Into<String>) -> Self {
        self.stack_group = group.into();
        self
    }

    #[must_use]
    pub fn with_negative_stacks(mut self, enabled: bool) -> Self {
        self.negative_stacks = enabled;
        self
    }

    #[must_use]
    pub fn with_point_range(mut self, point_range: f64) -> Self {
        self.point_range = point_range;
        self
    }

    #[must_use]
    pub fn with_point_placement(mut self, placement: PointPlacement) -> Self {
        self.point_placement = Some(placement);
        self
    }

    /// `(force, x_min, x_max)` of the latest `process_data` call.
    #[must_use]
    pub fn last_process(&self) -> Option<(bool, f64, f64)> {
        self.last_process
    }
}

impl SeriesSource for SeriesData {
    fn name(&self) -> &str {
        &self.name
    }

    fn x_data(&self) -> &[f64] {
        &self.x
    }

    fn y_data(&self) -> &[f64] {
        &self.y
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    fn stacking(&self) -> Option<StackingMode> {
        self.stacking
    }

    fn stack_group(&self) -> &str {
        &self.stack_group
    }

    fn negative_stacks(&self) -> bool {
        self.negative_stacks
    }

    fn point_range(&self) -> f64 {
        self.point_range
    }

    fn point_placement(&self) -> Option<PointPlacement> {
        self.point_placement
    }

    fn process_data(&mut self, force: bool, x_min: f64, x_max: f64) {
        self.last_process = Some((force, x_min, x_max));
    }
}

#[cfg(test)]
mod tests {
    use super::{SeriesData, SeriesSource, closest_gap, finite_extremes};

    #[test]
    fn extremes_skip_non_finite_and_optionally_non_positive() {
        let values = [3.0, f64::NAN, -2.0, 0.0, 8.0];
        assert_eq!(finite_extremes(&values, false), Some((-2.0, 8.0)));
        assert_eq!(finite_extremes(&values, true), Some((3.0, 8.0)));
        assert_eq!(finite_extremes(&[], false), None);
    }

    #[test]
    fn closest_gap_ignores_duplicates() {
        assert_eq!(closest_gap(&[0.0, 10.0, 10.0, 13.0, 20.0]), Some(3.0));
        assert_eq!(closest_gap(&[5.0]), None);
    }

    #[test]
    fn y_extremes_follow_the_x_window() {
        let series = SeriesData::from_values("s", [1.0, 9.0, 4.0, 2.0, 7.0]);
        assert_eq!(series.y_extremes(None, false), Some((1.0, 9.0)));
        // Index 1 and 4 are the neighbours just outside [2, 3].
        assert_eq!(series.y_extremes(Some((2.0, 3.0)), false), Some((2.0, 9.0)));
    }

    #[test]
    fn from_values_uses_index_as_x() {
        let series = SeriesData::from_values("s", [4.0, 5.0]);
        assert_eq!(series.x_data(), &[0.0, 1.0]);
        assert_eq!(series.closest_point_range(), Some(1.0));
    }

    #[test]
    fn process_data_keeps_only_the_latest_window() {
        let mut series = SeriesData::from_values("s", [4.0, 5.0]);
        assert_eq!(series.last_process(), None);
        series.process_data(true, 0.0, 10.0);
        series.process_data(false, 2.0, 8.0);
        assert_eq!(series.last_process(), Some((false, 2.0, 8.0)));
    }
}
