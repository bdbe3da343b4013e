use std::time::{Duration, Instant};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::axis::{Axis, TranslateOptions};
use crate::render::{Color, LinePrimitive, TextHAlign, crisp_line};

const GRID_LINE_COLOR: Color = Color::rgb(0.85, 0.85, 0.85);
const MINOR_GRID_LINE_COLOR: Color = Color::rgb(0.93, 0.93, 0.93);
const TICK_MARK_COLOR: Color = Color::rgb(0.75, 0.75, 0.8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TickKind {
    Major,
    Minor,
    /// Label-less tick closing the slot before the first category.
    CategoryEdge,
}

/// Identity of a tick: its kind and linearized position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickKey {
    pub kind: TickKind,
    pub position: OrderedFloat<f64>,
}

impl TickKey {
    #[must_use]
    pub fn major(position: f64) -> Self {
        Self {
            kind: TickKind::Major,
            position: OrderedFloat(position),
        }
    }

    #[must_use]
    pub fn minor(position: f64) -> Self {
        Self {
            kind: TickKind::Minor,
            position: OrderedFloat(position),
        }
    }

    #[must_use]
    pub fn category_edge(position: f64) -> Self {
        Self {
            kind: TickKind::CategoryEdge,
            position: OrderedFloat(position),
        }
    }
}

/// Laid-out label of a major tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size_px: f64,
    pub align: TextHAlign,
    pub stagger_line: usize,
    pub visible: bool,
}

impl TickLabel {
    /// Left edge of the measured box.
    #[must_use]
    pub fn left(&self) -> f64 {
        match self.align {
            TextHAlign::Left => self.x,
            TextHAlign::Center => self.x - self.width / 2.0,
            TextHAlign::Right => self.x - self.width,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left() + self.width
    }
}

/// One tick and the drawing objects it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    position: f64,
    kind: TickKind,
    pub(crate) is_first: bool,
    pub(crate) is_last: bool,
    pub(crate) is_active: bool,
    pub(crate) is_new: bool,
    pub(crate) gridline: Option<LinePrimitive>,
    pub(crate) mark: Option<LinePrimitive>,
    pub(crate) label: Option<TickLabel>,
}

impl Tick {
    fn new(key: TickKey) -> Self {
        Self {
            position: key.position.into_inner(),
            kind: key.kind,
            is_first: false,
            is_last: false,
            is_active: true,
            is_new: true,
            gridline: None,
            mark: None,
            label: None,
        }
    }

    /// Axis value in linearized units.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[must_use]
    pub fn kind(&self) -> TickKind {
        self.kind
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.is_first
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.is_last
    }

    /// `false` while the tick fades out before destruction.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Created during the last redraw rather than carried over.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    #[must_use]
    pub fn gridline(&self) -> Option<&LinePrimitive> {
        self.gridline.as_ref()
    }

    #[must_use]
    pub fn mark(&self) -> Option<&LinePrimitive> {
        self.mark.as_ref()
    }

    #[must_use]
    pub fn label(&self) -> Option<&TickLabel> {
        self.label.as_ref()
    }
}

impl Axis {
    /// Creates, reactivates and retires ticks for the current positions.
    ///
    /// Retired ticks stay owned (inactive) until `fade` elapses; a position
    /// that comes back before then cancels its pending removal.
    pub(crate) fn sync_ticks(&mut self, now: Instant, fade: Duration) {
        for key in self.tick_removals.take_due(now) {
            if self.ticks.get(&key).is_some_and(|tick| !tick.is_active) {
                self.ticks.shift_remove(&key);
                trace!(axis = %self.id(), position = key.position.into_inner(), kind = ?key.kind, "tick destroyed");
            }
        }

        let mut wanted: Vec<TickKey> = self
            .state
            .tick_positions
            .iter()
            .map(|position| TickKey::major(*position))
            .collect();
        wanted.extend(
            self.state
                .minor_tick_positions
                .iter()
                .map(|position| TickKey::minor(*position)),
        );
        if self.options.tickmark_offset() > 0.0 && self.state.min == Some(0.0) {
            wanted.push(TickKey::category_edge(-1.0));
        }

        for tick in self.ticks.values_mut() {
            tick.is_new = false;
        }
        for key in &wanted {
            match self.ticks.get_mut(key) {
                Some(tick) if !tick.is_active => {
                    tick.is_active = true;
                    self.tick_removals.cancel(key);
                    trace!(axis = %self.id, position = key.position.into_inner(), kind = ?key.kind, "tick reactivated");
                }
                Some(_) => {}
                None => {
                    self.ticks.insert(*key, Tick::new(*key));
                    trace!(axis = %self.id, position = key.position.into_inner(), kind = ?key.kind, "tick created");
                }
            }
        }

        let retired: Vec<TickKey> = self
            .ticks
            .iter()
            .filter(|(key, tick)| tick.is_active && !wanted.contains(*key))
            .map(|(key, _)| *key)
            .collect();
        for key in retired {
            if fade.is_zero() {
                self.ticks.shift_remove(&key);
                trace!(axis = %self.id, position = key.position.into_inner(), kind = ?key.kind, "tick destroyed");
                continue;
            }
            if let Some(tick) = self.ticks.get_mut(&key) {
                tick.is_active = false;
                self.tick_removals.schedule(key, now, fade);
                trace!(axis = %self.id, position = key.position.into_inner(), kind = ?key.kind, "tick removal scheduled");
            }
        }

        self.ticks.sort_keys();
        self.place_ticks();
    }

    /// Pixel position of a linearized value along the axis, chart coordinates.
    pub(crate) fn tick_pixel(&self, position: f64) -> f64 {
        self.pos()
            + self.translate(
                position,
                TranslateOptions::forward().with_canvas(!self.is_horizontal()),
            )
    }

    /// Pixel coordinate of the axis line across the axis direction.
    pub(crate) fn axis_line_offset(&self) -> f64 {
        let plot = self.plot_area;
        match (self.is_horizontal(), self.options.opposite) {
            (true, false) => plot.bottom(),
            (true, true) => plot.top,
            (false, false) => plot.left,
            (false, true) => plot.right(),
        }
    }

    fn place_ticks(&mut self) {
        let offset = self.options.tickmark_offset();
        let plot = self.plot_area;
        let horizontal = self.is_horizontal();
        let line = self.axis_line_offset();
        let outward = if self.options.opposite { -1.0 } else { 1.0 };
        let last_index = self.state.tick_positions.len().saturating_sub(1);

        let geometry: Vec<(TickKey, Option<LinePrimitive>, Option<LinePrimitive>, bool, bool)> = self
            .ticks
            .iter()
            .filter(|(_, tick)| tick.is_active)
            .map(|(key, tick)| {
                let major_like = tick.kind != TickKind::Minor;
                let pixel = self.tick_pixel(tick.position + if major_like { offset } else { 0.0 });
                let (grid_width, mark_length, mark_width, grid_color) = if major_like {
                    (
                        self.options.grid_line_width,
                        self.options.tick_length,
                        self.options.tick_width,
                        GRID_LINE_COLOR,
                    )
                } else {
                    (
                        self.options.minor_grid_line_width,
                        self.options.minor_tick_length,
                        0.0,
                        MINOR_GRID_LINE_COLOR,
                    )
                };
                let draws_grid = grid_width > 0.0
                    && (major_like || self.options.minor_tick_interval.is_some());
                let gridline = draws_grid.then(|| {
                    crisp_line(if horizontal {
                        LinePrimitive::new(pixel, plot.top, pixel, plot.bottom(), grid_width, grid_color)
                    } else {
                        LinePrimitive::new(plot.left, pixel, plot.right(), pixel, grid_width, grid_color)
                    })
                });
                let mark = (mark_width > 0.0 && mark_length > 0.0).then(|| {
                    let end = if horizontal {
                        line + outward * mark_length
                    } else {
                        line - outward * mark_length
                    };
                    crisp_line(if horizontal {
                        LinePrimitive::new(pixel, line, pixel, end, mark_width, TICK_MARK_COLOR)
                    } else {
                        LinePrimitive::new(end, pixel, line, pixel, mark_width, TICK_MARK_COLOR)
                    })
                });
                let index = self
                    .state
                    .tick_positions
                    .iter()
                    .position(|value| *value == tick.position);
                let is_first = tick.kind == TickKind::Major && index == Some(0);
                let is_last = tick.kind == TickKind::Major && index == Some(last_index);
                (*key, gridline, mark, is_first, is_last)
            })
            .collect();

        for (key, gridline, mark, is_first, is_last) in geometry {
            if let Some(tick) = self.ticks.get_mut(&key) {
                tick.gridline = gridline;
                tick.mark = mark;
                tick.is_first = is_first;
                tick.is_last = is_last;
            }
        }
    }
}
