//! Axis configuration: user-facing optional keys and the resolved options.
//!
//! Resolution order is fixed: built-in defaults, then per-collection and
//! per-kind defaults, then whatever the user set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::axis::{AxisCollection, AxisId};
use crate::core::datetime::TimeUnitRule;
use crate::core::TimeUnit;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisKind {
    #[default]
    Linear,
    Logarithmic,
    Datetime,
    Category,
}

/// `minorTickInterval`: either `"auto"` or a fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MinorTickIntervalRepr", into = "MinorTickIntervalRepr")]
pub enum MinorTickInterval {
    Auto,
    Value(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MinorTickIntervalRepr {
    Number(f64),
    Keyword(String),
}

impl TryFrom<MinorTickIntervalRepr> for MinorTickInterval {
    type Error = String;

    fn try_from(value: MinorTickIntervalRepr) -> Result<Self, Self::Error> {
        match value {
            MinorTickIntervalRepr::Number(step) if step.is_finite() && step > 0.0 => {
                Ok(Self::Value(step))
            }
            MinorTickIntervalRepr::Number(step) => {
                Err(format!("minorTickInterval must be > 0, got {step}"))
            }
            MinorTickIntervalRepr::Keyword(keyword) if keyword == "auto" => Ok(Self::Auto),
            MinorTickIntervalRepr::Keyword(keyword) => Err(format!(
                "minorTickInterval must be \"auto\" or a number, got \"{keyword}\""
            )),
        }
    }
}

impl From<MinorTickInterval> for MinorTickIntervalRepr {
    fn from(value: MinorTickInterval) -> Self {
        match value {
            MinorTickInterval::Auto => Self::Keyword("auto".to_owned()),
            MinorTickInterval::Value(step) => Self::Number(step),
        }
    }
}

/// Whether category ticks sit on the category or between two categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TickmarkPlacement {
    #[default]
    On,
    Between,
}

/// What happens to a label that spills over the plot edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelOverflow {
    /// Shift the first and last labels inward, hide them if that collides.
    #[default]
    Justify,
    Allow,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelUserOptions {
    pub enabled: Option<bool>,
    pub format: Option<String>,
    pub step: Option<usize>,
    pub stagger_lines: Option<usize>,
    pub max_stagger_lines: Option<usize>,
    pub overflow: Option<LabelOverflow>,
    pub font_size_px: Option<f64>,
    pub distance: Option<f64>,
    pub thousands_separator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelOptions {
    pub enabled: bool,
    /// Template where `{value}` is replaced by the formatted value.
    pub format: Option<String>,
    /// Show every n-th label only.
    pub step: Option<usize>,
    /// Fixed number of label lines; disables the automatic search.
    pub stagger_lines: Option<usize>,
    pub max_stagger_lines: usize,
    pub overflow: LabelOverflow,
    pub font_size_px: f64,
    /// Gap between the axis line and the labels.
    pub distance: f64,
    pub thousands_separator: String,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            format: None,
            step: None,
            stagger_lines: None,
            max_stagger_lines: 5,
            overflow: LabelOverflow::Justify,
            font_size_px: 11.0,
            distance: 8.0,
            thousands_separator: " ".to_owned(),
        }
    }
}

impl LabelOptions {
    fn apply(&mut self, user: &LabelUserOptions) {
        set_if(&mut self.enabled, user.enabled);
        if user.format.is_some() {
            self.format.clone_from(&user.format);
        }
        if user.step.is_some() {
            self.step = user.step;
        }
        if user.stagger_lines.is_some() {
            self.stagger_lines = user.stagger_lines;
        }
        set_if(&mut self.max_stagger_lines, user.max_stagger_lines);
        set_if(&mut self.overflow, user.overflow);
        set_if(&mut self.font_size_px, user.font_size_px);
        set_if(&mut self.distance, user.distance);
        if let Some(separator) = &user.thousands_separator {
            self.thousands_separator.clone_from(separator);
        }
    }
}

/// Optional text drawn next to a plot line or inside a plot band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotLabelOptions {
    pub text: String,
    #[serde(default = "default_plot_label_font_size")]
    pub font_size_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotLineOptions {
    #[serde(default)]
    pub id: Option<String>,
    pub value: f64,
    #[serde(default = "default_plot_line_width")]
    pub width: f64,
    #[serde(default = "default_plot_line_color")]
    pub color: Color,
    #[serde(default)]
    pub label: Option<PlotLabelOptions>,
}

impl PlotLineOptions {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            id: None,
            value,
            width: default_plot_line_width(),
            color: default_plot_line_color(),
            label: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_label(mut self, text: impl Into<String>) -> Self {
        self.label = Some(PlotLabelOptions {
            text: text.into(),
            font_size_px: default_plot_label_font_size(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotBandOptions {
    #[serde(default)]
    pub id: Option<String>,
    pub from: f64,
    pub to: f64,
    #[serde(default = "default_plot_band_color")]
    pub color: Color,
    #[serde(default)]
    pub label: Option<PlotLabelOptions>,
}

impl PlotBandOptions {
    #[must_use]
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            id: None,
            from,
            to,
            color: default_plot_band_color(),
            label: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, text: impl Into<String>) -> Self {
        self.label = Some(PlotLabelOptions {
            text: text.into(),
            font_size_px: default_plot_label_font_size(),
        });
        self
    }
}

/// Axis options as written by the user; every key is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisUserOptions {
    #[serde(rename = "type")]
    pub kind: Option<AxisKind>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub tick_interval: Option<f64>,
    pub minor_tick_interval: Option<MinorTickInterval>,
    pub start_on_tick: Option<bool>,
    pub end_on_tick: Option<bool>,
    pub min_padding: Option<f64>,
    pub max_padding: Option<f64>,
    pub reversed: Option<bool>,
    pub opposite: Option<bool>,
    pub categories: Option<Vec<String>>,
    pub min_range: Option<f64>,
    pub tick_pixel_interval: Option<f64>,
    pub allow_decimals: Option<bool>,
    pub units: Option<Vec<TimeUnitRule>>,
    pub floor: Option<f64>,
    pub ceiling: Option<f64>,
    pub min_tick_interval: Option<f64>,
    pub tick_positions: Option<Vec<f64>>,
    pub start_of_week: Option<u8>,
    pub linked_to: Option<AxisId>,
    pub align_ticks: Option<bool>,
    pub range: Option<f64>,
    pub reversed_stacks: Option<bool>,
    pub tickmark_placement: Option<TickmarkPlacement>,
    pub tick_length: Option<f64>,
    pub tick_width: Option<f64>,
    pub minor_tick_length: Option<f64>,
    pub grid_line_width: Option<f64>,
    pub minor_grid_line_width: Option<f64>,
    pub show_first_label: Option<bool>,
    pub show_last_label: Option<bool>,
    pub labels: Option<LabelUserOptions>,
    pub date_time_label_formats: Option<BTreeMap<TimeUnit, String>>,
    pub plot_lines: Option<Vec<PlotLineOptions>>,
    pub plot_bands: Option<Vec<PlotBandOptions>>,
    pub squished_interval_divisor: Option<f64>,
}

impl AxisUserOptions {
    #[must_use]
    pub fn new(kind: AxisKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidOptions(format!("failed to parse axis options: {e}")))
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidOptions(format!("failed to serialize axis options: {e}")))
    }
}

/// Fully resolved axis options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    pub kind: AxisKind,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub tick_interval: Option<f64>,
    pub minor_tick_interval: Option<MinorTickInterval>,
    pub start_on_tick: bool,
    pub end_on_tick: bool,
    pub min_padding: f64,
    pub max_padding: f64,
    pub reversed: bool,
    pub opposite: bool,
    pub categories: Option<Vec<String>>,
    pub min_range: Option<f64>,
    pub tick_pixel_interval: f64,
    pub allow_decimals: bool,
    pub units: Option<Vec<TimeUnitRule>>,
    pub floor: Option<f64>,
    pub ceiling: Option<f64>,
    pub min_tick_interval: Option<f64>,
    pub tick_positions: Option<Vec<f64>>,
    /// Days from Sunday; `1` is Monday.
    pub start_of_week: u8,
    pub linked_to: Option<AxisId>,
    pub align_ticks: bool,
    pub range: Option<f64>,
    pub reversed_stacks: bool,
    pub tickmark_placement: TickmarkPlacement,
    pub tick_length: f64,
    pub tick_width: f64,
    pub minor_tick_length: f64,
    pub grid_line_width: f64,
    pub minor_grid_line_width: f64,
    pub show_first_label: bool,
    pub show_last_label: bool,
    pub labels: LabelOptions,
    pub date_time_label_formats: BTreeMap<TimeUnit, String>,
    pub plot_lines: Vec<PlotLineOptions>,
    pub plot_bands: Vec<PlotBandOptions>,
    pub squished_interval_divisor: f64,
}

impl AxisOptions {
    fn builtin() -> Self {
        Self {
            kind: AxisKind::Linear,
            min: None,
            max: None,
            tick_interval: None,
            minor_tick_interval: None,
            start_on_tick: false,
            end_on_tick: false,
            min_padding: 0.01,
            max_padding: 0.01,
            reversed: false,
            opposite: false,
            categories: None,
            min_range: None,
            tick_pixel_interval: 100.0,
            allow_decimals: true,
            units: None,
            floor: None,
            ceiling: None,
            min_tick_interval: None,
            tick_positions: None,
            start_of_week: 1,
            linked_to: None,
            align_ticks: true,
            range: None,
            reversed_stacks: true,
            tickmark_placement: TickmarkPlacement::On,
            tick_length: 10.0,
            tick_width: 1.0,
            minor_tick_length: 2.0,
            grid_line_width: 0.0,
            minor_grid_line_width: 1.0,
            show_first_label: true,
            show_last_label: true,
            labels: LabelOptions::default(),
            date_time_label_formats: default_date_time_label_formats(),
            plot_lines: Vec::new(),
            plot_bands: Vec::new(),
            squished_interval_divisor: 4.0,
        }
    }

    /// Merges `user` over the defaults of `collection` and the chosen kind.
    pub fn resolve(collection: AxisCollection, user: &AxisUserOptions) -> ChartResult<Self> {
        let mut options = Self::builtin();

        if collection == AxisCollection::Y {
            options.start_on_tick = true;
            options.end_on_tick = true;
            options.min_padding = 0.05;
            options.max_padding = 0.05;
            options.tick_pixel_interval = 72.0;
            options.grid_line_width = 1.0;
            options.tick_width = 0.0;
        }

        options.kind = user.kind.unwrap_or(if user.categories.is_some() {
            AxisKind::Category
        } else {
            AxisKind::Linear
        });
        if options.kind == AxisKind::Category {
            options.tickmark_placement = TickmarkPlacement::Between;
        }

        options.apply(user);
        options.validate()?;
        Ok(options)
    }

    fn apply(&mut self, user: &AxisUserOptions) {
        if user.min.is_some() {
            self.min = user.min;
        }
        if user.max.is_some() {
            self.max = user.max;
        }
        if user.tick_interval.is_some() {
            self.tick_interval = user.tick_interval;
        }
        if user.minor_tick_interval.is_some() {
            self.minor_tick_interval = user.minor_tick_interval;
        }
        set_if(&mut self.start_on_tick, user.start_on_tick);
        set_if(&mut self.end_on_tick, user.end_on_tick);
        set_if(&mut self.min_padding, user.min_padding);
        set_if(&mut self.max_padding, user.max_padding);
        set_if(&mut self.reversed, user.reversed);
        set_if(&mut self.opposite, user.opposite);
        if user.categories.is_some() {
            self.categories.clone_from(&user.categories);
        }
        if user.min_range.is_some() {
            self.min_range = user.min_range;
        }
        set_if(&mut self.tick_pixel_interval, user.tick_pixel_interval);
        set_if(&mut self.allow_decimals, user.allow_decimals);
        if user.units.is_some() {
            self.units.clone_from(&user.units);
        }
        if user.floor.is_some() {
            self.floor = user.floor;
        }
        if user.ceiling.is_some() {
            self.ceiling = user.ceiling;
        }
        if user.min_tick_interval.is_some() {
            self.min_tick_interval = user.min_tick_interval;
        }
        if user.tick_positions.is_some() {
            self.tick_positions.clone_from(&user.tick_positions);
        }
        set_if(&mut self.start_of_week, user.start_of_week);
        if user.linked_to.is_some() {
            self.linked_to = user.linked_to;
        }
        set_if(&mut self.align_ticks, user.align_ticks);
        if user.range.is_some() {
            self.range = user.range;
        }
        set_if(&mut self.reversed_stacks, user.reversed_stacks);
        set_if(&mut self.tickmark_placement, user.tickmark_placement);
        set_if(&mut self.tick_length, user.tick_length);
        set_if(&mut self.tick_width, user.tick_width);
        set_if(&mut self.minor_tick_length, user.minor_tick_length);
        set_if(&mut self.grid_line_width, user.grid_line_width);
        set_if(&mut self.minor_grid_line_width, user.minor_grid_line_width);
        set_if(&mut self.show_first_label, user.show_first_label);
        set_if(&mut self.show_last_label, user.show_last_label);
        if let Some(labels) = &user.labels {
            self.labels.apply(labels);
        }
        if let Some(formats) = &user.date_time_label_formats {
            for (unit, pattern) in formats {
                self.date_time_label_formats.insert(*unit, pattern.clone());
            }
        }
        if let Some(lines) = &user.plot_lines {
            self.plot_lines.clone_from(lines);
        }
        if let Some(bands) = &user.plot_bands {
            self.plot_bands.clone_from(bands);
        }
        set_if(
            &mut self.squished_interval_divisor,
            user.squished_interval_divisor,
        );
    }

    fn validate(&self) -> ChartResult<()> {
        for (name, value) in [
            ("minPadding", self.min_padding),
            ("maxPadding", self.max_padding),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidOptions(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !self.tick_pixel_interval.is_finite() || self.tick_pixel_interval <= 0.0 {
            return Err(ChartError::InvalidOptions(
                "tickPixelInterval must be finite and > 0".to_owned(),
            ));
        }
        if !self.squished_interval_divisor.is_finite() || self.squished_interval_divisor < 1.0 {
            return Err(ChartError::InvalidOptions(
                "squishedIntervalDivisor must be finite and >= 1".to_owned(),
            ));
        }
        for (name, value) in [
            ("tickInterval", self.tick_interval),
            ("minRange", self.min_range),
            ("minTickInterval", self.min_tick_interval),
            ("range", self.range),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ChartError::InvalidOptions(format!(
                        "{name} must be finite and > 0"
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ChartError::InvalidOptions(format!(
                    "min ({min}) must not exceed max ({max})"
                )));
            }
        }
        if self.start_of_week > 6 {
            return Err(ChartError::InvalidOptions(
                "startOfWeek must be in 0..=6".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_log(&self) -> bool {
        self.kind == AxisKind::Logarithmic
    }

    #[must_use]
    pub fn is_datetime(&self) -> bool {
        self.kind == AxisKind::Datetime
    }

    /// Ticks are offset by half a slot when they mark category edges.
    #[must_use]
    pub fn tickmark_offset(&self) -> f64 {
        if self.categories.is_some() && self.tickmark_placement == TickmarkPlacement::Between {
            0.5
        } else {
            0.0
        }
    }
}

fn set_if<T: Clone>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[must_use]
pub fn default_date_time_label_formats() -> BTreeMap<TimeUnit, String> {
    [
        (TimeUnit::Millisecond, "%H:%M:%S%.3f"),
        (TimeUnit::Second, "%H:%M:%S"),
        (TimeUnit::Minute, "%H:%M"),
        (TimeUnit::Hour, "%H:%M"),
        (TimeUnit::Day, "%-d. %b"),
        (TimeUnit::Week, "%-d. %b"),
        (TimeUnit::Month, "%b '%y"),
        (TimeUnit::Year, "%Y"),
    ]
    .into_iter()
    .map(|(unit, pattern)| (unit, pattern.to_owned()))
    .collect()
}

fn default_plot_line_width() -> f64 {
    1.0
}

fn default_plot_line_color() -> Color {
    Color::rgb(0.75, 0.2, 0.2)
}

fn default_plot_band_color() -> Color {
    Color::rgba(0.9, 0.9, 0.7, 0.5)
}

fn default_plot_label_font_size() -> f64 {
    11.0
}
