//! Cross-axis tick alignment.
//!
//! Axes of the same collection sharing a position and length agree on one
//! tick count so their gridlines coincide. Shorter runs are extended past
//! `max` and the scale is compressed so the extended run still fits.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::axis::{Axis, AxisCollection};
use crate::core::numeric::correct_float;

/// Groups axes whose gridlines are expected to line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickAmountKey {
    pub collection: AxisCollection,
    pub pos: OrderedFloat<f64>,
    pub len: OrderedFloat<f64>,
}

/// Largest tick count seen per alignment group during one redraw.
#[derive(Debug, Clone, Default)]
pub struct TickAmountRegistry {
    amounts: BTreeMap<TickAmountKey, usize>,
}

impl TickAmountRegistry {
    pub fn clear(&mut self) {
        self.amounts.clear();
    }

    /// Raises the group's target to `amount` when it is larger.
    pub fn record(&mut self, key: TickAmountKey, amount: usize) {
        let entry = self.amounts.entry(key).or_insert(0);
        *entry = (*entry).max(amount);
    }

    #[must_use]
    pub fn target(&self, key: &TickAmountKey) -> Option<usize> {
        self.amounts.get(key).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

impl Axis {
    #[must_use]
    pub fn tick_amount_key(&self) -> TickAmountKey {
        TickAmountKey {
            collection: self.collection(),
            pos: OrderedFloat(self.pos()),
            len: OrderedFloat(self.len()),
        }
    }

    /// Tick count the axis was last aligned to, if any.
    #[must_use]
    pub fn tick_amount(&self) -> Option<usize> {
        self.state.tick_amount
    }

    fn takes_part_in_alignment(&self, chart_align: bool) -> bool {
        chart_align
            && self.options.align_ticks
            && !self.options.is_datetime()
            && self.options.categories.is_none()
            && self.state.linked_parent.is_none()
            && self.options.linked_to.is_none()
    }

    pub(crate) fn record_tick_amount(&self, registry: &mut TickAmountRegistry, chart_align: bool) {
        if self.takes_part_in_alignment(chart_align) && !self.state.tick_positions.is_empty() {
            registry.record(self.tick_amount_key(), self.state.tick_positions.len());
        }
    }

    /// Pads the tick run up to the group's target count.
    pub(crate) fn adjust_tick_amount(&mut self, registry: &TickAmountRegistry, chart_align: bool) {
        if !self.takes_part_in_alignment(chart_align) {
            self.state.tick_amount = None;
            return;
        }
        let Some(target) = registry.target(&self.tick_amount_key()) else {
            return;
        };
        let calculated = self.state.tick_positions.len();
        let interval = self.state.tick_interval;
        self.state.tick_amount = Some(target);
        if calculated == 0 || calculated >= target || interval <= 0.0 {
            return;
        }

        while self.state.tick_positions.len() < target {
            let Some(last) = self.state.tick_positions.last().copied() else {
                break;
            };
            self.state.tick_positions.push(correct_float(last + interval));
        }
        if target > 1 {
            self.state.trans_a *= (calculated as f64 - 1.0) / (target as f64 - 1.0);
        }
        self.state.max = self.state.tick_positions.last().copied();
        self.state.min_pixel_padding = self.state.trans_a * self.state.min_point_offset;

        debug!(
            axis = %self.id(),
            from = calculated,
            to = target,
            max = ?self.state.max,
            "tick amount aligned"
        );
    }
}
