use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::axis::{Axis, AxisId, AxisKind, LabelOverflow, TickKey, TickLabel};
use crate::core::TimeUnit;
use crate::core::datetime::{format_time, normalize_time_tick_interval};
use crate::core::numeric::correct_float;
use crate::render::{TextHAlign, TextSize};

const NUMERIC_SYMBOLS: [&str; 6] = ["k", "M", "G", "T", "P", "E"];

/// Values at or above this magnitude are grouped with the thousands separator.
const GROUPING_THRESHOLD: f64 = 10_000.0;

/// What a label formatter gets to look at for one major tick.
#[derive(Debug, Clone, Copy)]
pub struct LabelContext<'a> {
    pub axis: AxisId,
    pub kind: AxisKind,
    /// Real value of the tick.
    pub value: f64,
    /// Category name when the axis has one at this position.
    pub category: Option<&'a str>,
    pub is_first: bool,
    pub is_last: bool,
    /// Tick interval in axis units.
    pub tick_interval: f64,
    /// Unit whose label format applies on datetime axes.
    pub time_unit: Option<TimeUnit>,
    /// The text the axis would show without a formatter.
    pub default_text: &'a str,
}

pub type LabelFormatterFn = Arc<dyn Fn(&LabelContext<'_>) -> String + Send + Sync>;

/// Formats `value` with `decimals` fixed places, or its shortest form when
/// `None`, grouping the integer part with `thousands_separator`.
///
/// ```
/// use chart_axis::axis::format_number;
///
/// assert_eq!(format_number(12_345.678, Some(0), " "), "12 346");
/// assert_eq!(format_number(0.1 + 0.2, None, ""), "0.3");
/// ```
#[must_use]
pub fn format_number(value: f64, decimals: Option<u32>, thousands_separator: &str) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let value = correct_float(value);
    let Ok(mut decimal) = Decimal::from_str(&value.to_string()) else {
        return value.to_string();
    };
    if let Some(places) = decimals {
        decimal = decimal.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    }
    let text = decimal.normalize().to_string();

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push_str(thousands_separator);
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

impl Axis {
    /// Text of the major tick at linearized `position`.
    pub(crate) fn format_label(&self, position: f64, is_first: bool, is_last: bool) -> String {
        let value = if self.options.is_log() {
            correct_float(self.lin2val(position))
        } else {
            position
        };
        let category = self
            .options
            .categories
            .as_ref()
            .filter(|_| position >= 0.0 && position.fract() == 0.0)
            .and_then(|categories| categories.get(position as usize))
            .map(String::as_str);
        let time_unit = self.options.is_datetime().then(|| {
            self.state
                .time_info
                .as_ref()
                .and_then(|info| info.higher_rank(value).or(info.unit))
                .unwrap_or_else(|| {
                    normalize_time_tick_interval(
                        self.state.tick_interval,
                        self.options.units.as_deref(),
                    )
                    .unit
                })
        });

        let default_text = match (category, time_unit) {
            (Some(name), _) => name.to_owned(),
            (None, Some(unit)) => self.format_date_label(value, unit),
            (None, None) => self.format_numeric_label(value),
        };
        let text = match &self.options.labels.format {
            Some(template) => template.replace("{value}", &default_text),
            None => default_text,
        };

        match &self.label_formatter {
            Some(formatter) => formatter(&LabelContext {
                axis: self.id(),
                kind: self.kind(),
                value,
                category,
                is_first,
                is_last,
                tick_interval: self.state.tick_interval,
                time_unit,
                default_text: &text,
            }),
            None => text,
        }
    }

    fn format_date_label(&self, value: f64, unit: TimeUnit) -> String {
        let formats = &self.options.date_time_label_formats;
        let pattern = formats
            .get(&unit)
            .or_else(|| formats.range(unit..).next().map(|(_, pattern)| pattern))
            .map_or("%Y-%m-%d %H:%M:%S", String::as_str);
        format_time(value, pattern, self.time_zone)
    }

    /// Abbreviates large magnitudes with `k`, `M`, `G`... once the tick
    /// interval (or the value itself on log axes) reaches a thousand.
    fn format_numeric_label(&self, value: f64) -> String {
        let separator = self.options.labels.thousands_separator.as_str();
        let detector = if self.options.is_log() {
            value
        } else {
            self.state.tick_interval
        };
        for (index, symbol) in NUMERIC_SYMBOLS.iter().enumerate().rev() {
            let multiplier = 1000_f64.powi(index as i32 + 1);
            if detector >= multiplier {
                return format!(
                    "{}{symbol}",
                    format_number(value / multiplier, None, separator)
                );
            }
        }
        if value.abs() >= GROUPING_THRESHOLD {
            format_number(value, Some(0), separator)
        } else {
            format_number(value, None, "")
        }
    }

    /// Formats, measures and places every major tick label, then resolves
    /// collisions by staggering, justifying the edge labels and finally
    /// hiding what still overlaps.
    pub(crate) fn layout_labels(&mut self, measure: &dyn Fn(&str, f64) -> TextSize) {
        let positions = self.state.tick_positions.clone();
        if !self.options.labels.enabled {
            for tick in self.ticks.values_mut() {
                tick.label = None;
            }
            self.state.stagger_lines = 1;
            return;
        }

        let horizontal = self.is_horizontal();
        let opposite = self.options.opposite;
        let font = self.options.labels.font_size_px;
        let distance = self.options.labels.distance;
        let step = self.options.labels.step.unwrap_or(1).max(1);
        let line = self.axis_line_offset();
        let last_index = positions.len().saturating_sub(1);

        let mut laid: Vec<TickLabel> = positions
            .iter()
            .enumerate()
            .map(|(index, position)| {
                let is_first = index == 0;
                let is_last = index == last_index;
                let text = self.format_label(*position, is_first, is_last);
                let size = measure(&text, font);
                let pixel = self.tick_pixel(*position);
                let (x, y, align) = match (horizontal, opposite) {
                    (true, false) => (pixel, line + distance + font, TextHAlign::Center),
                    (true, true) => (pixel, line - distance, TextHAlign::Center),
                    (false, false) => (line - distance, pixel + font * 0.3, TextHAlign::Right),
                    (false, true) => (line + distance, pixel + font * 0.3, TextHAlign::Left),
                };
                let hidden = index % step != 0
                    || (is_first && !self.options.show_first_label)
                    || (is_last && !self.options.show_last_label)
                    || text.is_empty();
                TickLabel {
                    text,
                    x,
                    y,
                    width: size.width,
                    height: size.height,
                    font_size_px: font,
                    align,
                    stagger_line: 0,
                    visible: !hidden,
                }
            })
            .collect();

        let lines = if horizontal {
            self.options
                .labels
                .stagger_lines
                .unwrap_or_else(|| auto_stagger_lines(&laid, self.options.labels.max_stagger_lines))
                .max(1)
        } else {
            1
        };
        for (index, label) in laid.iter_mut().enumerate() {
            label.stagger_line = index % lines;
            let shift = label.stagger_line as f64 * label.height;
            label.y += if opposite { -shift } else { shift };
        }

        if horizontal {
            if self.options.labels.overflow == LabelOverflow::Justify {
                self.justify_edge_labels(&mut laid, lines);
            }
            hide_overlaps(&mut laid, lines);
        }

        for (position, label) in positions.iter().zip(laid) {
            if let Some(tick) = self.ticks.get_mut(&TickKey::major(*position)) {
                tick.label = Some(label);
            }
        }
        self.state.stagger_lines = lines;
    }

    /// Pulls the outermost labels back inside the plot edges, hiding them
    /// when that makes them collide with the nearest visible label on the
    /// same line.
    fn justify_edge_labels(&self, laid: &mut [TickLabel], lines: usize) {
        let count = laid.len();
        if count == 0 {
            return;
        }
        let reversed = self.options.reversed;
        let plot_left = self.plot_area.left;
        let plot_right = self.plot_area.right();
        let (left_index, right_index) = if reversed { (count - 1, 0) } else { (0, count - 1) };
        let nearest_visible =
            |laid: &[TickLabel], from: usize, toward_right: bool| -> Option<usize> {
                let mut index = from;
                loop {
                    index = if toward_right != reversed {
                        Some(index + lines).filter(|next| *next < count)?
                    } else {
                        index.checked_sub(lines)?
                    };
                    if laid[index].visible {
                        return Some(index);
                    }
                }
            };

        if laid[left_index].visible && laid[left_index].left() < plot_left {
            laid[left_index].x += plot_left - laid[left_index].left();
            let collides = nearest_visible(&*laid, left_index, true)
                .is_some_and(|neighbour| laid[left_index].right() > laid[neighbour].left());
            if collides {
                laid[left_index].visible = false;
            }
        }
        if laid[right_index].visible && laid[right_index].right() > plot_right {
            laid[right_index].x -= laid[right_index].right() - plot_right;
            let collides = nearest_visible(&*laid, right_index, false)
                .is_some_and(|neighbour| laid[right_index].left() < laid[neighbour].right());
            if collides {
                laid[right_index].visible = false;
            }
        }
    }
}

/// Indices of `laid` ordered left to right on screen.
fn screen_order(laid: &[TickLabel]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..laid.len()).collect();
    order.sort_by(|a, b| laid[*a].x.total_cmp(&laid[*b].x));
    order
}

fn overlaps_with_lines(laid: &[TickLabel], order: &[usize], lines: usize) -> bool {
    let mut last_right = vec![f64::NEG_INFINITY; lines];
    for index in order {
        let label = &laid[*index];
        if !label.visible {
            continue;
        }
        let line = index % lines;
        if label.left() < last_right[line] {
            return true;
        }
        last_right[line] = label.right();
    }
    false
}

/// Smallest line count, up to `max_lines`, that separates every label.
fn auto_stagger_lines(laid: &[TickLabel], max_lines: usize) -> usize {
    let order = screen_order(laid);
    let max_lines = max_lines.max(1);
    let mut lines = 1;
    while lines < max_lines && overlaps_with_lines(laid, &order, lines) {
        lines += 1;
    }
    lines
}

fn hide_overlaps(laid: &mut [TickLabel], lines: usize) {
    let mut last_right = vec![f64::NEG_INFINITY; lines];
    for index in screen_order(laid) {
        let label = &mut laid[index];
        if !label.visible {
            continue;
        }
        let line = label.stagger_line.min(lines - 1);
        if label.left() < last_right[line] {
            label.visible = false;
        } else {
            last_right[line] = label.right();
        }
    }
}
