//! Stack accumulators for stacked value axes.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::numeric::correct_float;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StackingMode {
    #[default]
    Normal,
    Percent,
}

/// Stacks are split by group name and by sign relative to the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StackKey {
    pub group: String,
    pub negative: bool,
}

impl StackKey {
    #[must_use]
    pub fn new(group: impl Into<String>, negative: bool) -> Self {
        Self {
            group: group.into(),
            negative,
        }
    }
}

/// Accumulator for one x value of one stack.
#[derive(Debug, Clone, PartialEq)]
pub struct StackItem {
    pub x: f64,
    pub is_negative: bool,
    /// Sum of values, or of magnitudes when percent stacking.
    pub total: f64,
    /// Running top of the stack.
    pub cum: Option<f64>,
    points: IndexMap<(usize, usize), [f64; 2]>,
}

impl StackItem {
    fn new(x: f64, is_negative: bool) -> Self {
        Self {
            x,
            is_negative,
            total: 0.0,
            cum: None,
            points: IndexMap::new(),
        }
    }

    /// `[bottom, top]` of one point, keyed by `(series_index, point_index)`.
    #[must_use]
    pub fn point(&self, series_index: usize, point_index: usize) -> Option<[f64; 2]> {
        self.points.get(&(series_index, point_index)).copied()
    }

    /// Stacked intervals in accumulation order.
    pub fn points(&self) -> impl Iterator<Item = (&(usize, usize), &[f64; 2])> {
        self.points.iter()
    }
}

/// One series' contribution to a stacking pass.
#[derive(Debug, Clone, Copy)]
pub struct StackSeries<'a> {
    pub series_index: usize,
    pub group: &'a str,
    pub mode: StackingMode,
    pub threshold: f64,
    /// Values below `threshold` go to a separate negative stack.
    pub negative_stacks: bool,
    pub x_data: &'a [f64],
    pub y_data: &'a [f64],
}

type StackCell = (StackKey, OrderedFloat<f64>);

/// All stacks of one value axis, rebuilt from scratch on every pass.
#[derive(Debug, Clone, Default)]
pub struct Stacks {
    items: BTreeMap<StackKey, BTreeMap<OrderedFloat<f64>, StackItem>>,
    stacked: BTreeMap<usize, Vec<Option<[f64; 2]>>>,
    use_percentage: bool,
}

impl Stacks {
    /// Accumulates `series` bottom-up.
    ///
    /// With `reversed_stacks` the last series sits at the bottom of the stack.
    #[must_use]
    pub fn build(series: &[StackSeries<'_>], reversed_stacks: bool) -> Self {
        let mut stacks = Self::default();
        let mut cells: BTreeMap<usize, Vec<Option<StackCell>>> = BTreeMap::new();

        let order: Vec<&StackSeries<'_>> = if reversed_stacks {
            series.iter().rev().collect()
        } else {
            series.iter().collect()
        };
        for entry in order {
            let placed = stacks.accumulate(entry);
            cells.insert(entry.series_index, placed);
        }

        if stacks.use_percentage {
            for entry in series
                .iter()
                .filter(|entry| entry.mode == StackingMode::Percent)
            {
                if let Some(placed) = cells.get(&entry.series_index) {
                    stacks.apply_percent(entry.series_index, placed);
                }
            }
        }
        stacks
    }

    fn accumulate(&mut self, series: &StackSeries<'_>) -> Vec<Option<StackCell>> {
        if series.mode == StackingMode::Percent {
            self.use_percentage = true;
        }
        let mut placed = Vec::with_capacity(series.y_data.len());
        let mut intervals = Vec::with_capacity(series.y_data.len());

        for (point_index, (&x, &y)) in series.x_data.iter().zip(series.y_data).enumerate() {
            if !x.is_finite() || !y.is_finite() {
                placed.push(None);
                intervals.push(None);
                continue;
            }
            let is_negative = series.negative_stacks && y < series.threshold;
            let key = StackKey::new(series.group, is_negative);
            let cell = OrderedFloat(x);

            let opposite_total = self
                .items
                .get(&StackKey::new(series.group, !is_negative))
                .and_then(|by_x| by_x.get(&cell))
                .map(|item| item.total);

            let item = self
                .items
                .entry(key.clone())
                .or_default()
                .entry(cell)
                .or_insert_with(|| StackItem::new(x, is_negative));

            let bottom = item.cum.unwrap_or(series.threshold);
            let top = correct_float(bottom + y);
            item.cum = Some(top);

            let mut shared_total = None;
            if series.mode == StackingMode::Percent {
                match opposite_total {
                    Some(other) if series.negative_stacks => {
                        let total = other.max(item.total) + y.abs();
                        item.total = total;
                        shared_total = Some(total);
                    }
                    _ => item.total = correct_float(item.total + y.abs()),
                }
            } else {
                item.total = correct_float(item.total + y);
            }
            item.points
                .insert((series.series_index, point_index), [bottom, top]);

            if let Some(total) = shared_total {
                if let Some(other) = self
                    .items
                    .get_mut(&StackKey::new(series.group, !is_negative))
                    .and_then(|by_x| by_x.get_mut(&cell))
                {
                    other.total = total;
                }
            }

            placed.push(Some((key, cell)));
            intervals.push(Some([bottom, top]));
        }

        self.stacked.insert(series.series_index, intervals);
        placed
    }

    fn apply_percent(&mut self, series_index: usize, placed: &[Option<StackCell>]) {
        for (point_index, cell) in placed.iter().enumerate() {
            let Some((key, x)) = cell else {
                continue;
            };
            let Some(item) = self.items.get_mut(key).and_then(|by_x| by_x.get_mut(x)) else {
                continue;
            };
            let factor = if item.total != 0.0 {
                100.0 / item.total
            } else {
                0.0
            };
            let Some(interval) = item.points.get_mut(&(series_index, point_index)) else {
                continue;
            };
            interval[0] = correct_float(interval[0] * factor);
            interval[1] = correct_float(interval[1] * factor);
            let scaled = *interval;
            if let Some(slot) = self
                .stacked
                .get_mut(&series_index)
                .and_then(|intervals| intervals.get_mut(point_index))
            {
                *slot = Some(scaled);
            }
        }
    }

    #[must_use]
    pub fn item(&self, group: &str, negative: bool, x: f64) -> Option<&StackItem> {
        self.items
            .get(&StackKey::new(group, negative))
            .and_then(|by_x| by_x.get(&OrderedFloat(x)))
    }

    /// Stacked `[bottom, top]` of one point after all passes.
    #[must_use]
    pub fn stacked_interval(&self, series_index: usize, point_index: usize) -> Option<[f64; 2]> {
        self.stacked
            .get(&series_index)
            .and_then(|intervals| intervals.get(point_index).copied().flatten())
    }

    /// Lowest bottom and highest top over one series' stacked points.
    #[must_use]
    pub fn series_extremes(&self, series_index: usize) -> Option<(f64, f64)> {
        self.stacked
            .get(&series_index)?
            .iter()
            .flatten()
            .fold(None, |acc, [bottom, top]| {
                let low = bottom.min(*top);
                let high = bottom.max(*top);
                Some(match acc {
                    Some((min, max)) => (f64::min(min, low), f64::max(max, high)),
                    None => (low, high),
                })
            })
    }

    #[must_use]
    pub fn uses_percentage(&self) -> bool {
        self.use_percentage
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{StackSeries, Stacks, StackingMode};

    fn series<'a>(index: usize, x: &'a [f64], y: &'a [f64]) -> StackSeries<'a> {
        StackSeries {
            series_index: index,
            group: "",
            mode: StackingMode::Normal,
            threshold: 0.0,
            negative_stacks: true,
            x_data: x,
            y_data: y,
        }
    }

    #[test]
    fn reversed_stacks_put_last_series_at_bottom() {
        let x = [0.0, 1.0];
        let stacks = Stacks::build(&[series(0, &x, &[1.0, 2.0]), series(1, &x, &[3.0, 4.0])], true);
        assert_eq!(stacks.stacked_interval(1, 0), Some([0.0, 3.0]));
        assert_eq!(stacks.stacked_interval(0, 0), Some([3.0, 4.0]));
        assert_eq!(stacks.item("", false, 1.0).map(|item| item.total), Some(6.0));
    }

    #[test]
    fn negative_values_use_their_own_stack() {
        let x = [0.0];
        let stacks = Stacks::build(&[series(0, &x, &[2.0]), series(1, &x, &[-3.0])], false);
        assert_eq!(stacks.stacked_interval(1, 0), Some([0.0, -3.0]));
        assert_eq!(stacks.series_extremes(1), Some((-3.0, 0.0)));
    }
}
