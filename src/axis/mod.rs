//! The axis aggregate.
//!
//! `Axis` owns its resolved options, scale state, ticks, stacks and plot
//! lines/bands. Its behavior is split by concern across the submodules, each
//! adding an `impl Axis` block: extremes, tick positions, translation, label
//! layout and tick-amount alignment.

mod align;
mod extremes;
mod labels;
mod options;
mod plot_band;
mod tick;
mod tick_positions;
mod translate;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{DeferredTasks, PlotArea, Stacks, TimeTickInfo, TimeZoneMode};
use crate::error::{ChartError, ChartResult, Diagnostic};
use crate::telemetry::report_diagnostic;

pub use align::{TickAmountKey, TickAmountRegistry};
pub use extremes::{AxisExtremes, LinkedParent};
pub(crate) use extremes::SeriesView;
pub use labels::{LabelContext, LabelFormatterFn, format_number};
pub use options::{
    AxisKind, AxisOptions, AxisUserOptions, LabelOptions, LabelOverflow, LabelUserOptions,
    MinorTickInterval, PlotBandOptions, PlotLabelOptions, PlotLineOptions, TickmarkPlacement,
    default_date_time_label_formats,
};
pub use plot_band::{PlotItemGeometry, PlotItemShape, PlotLineOrBand};
pub use tick::{Tick, TickKey, TickKind, TickLabel};
pub use tick_positions::{TickPositionerContext, TickPositionerFn};
pub use translate::TranslateOptions;

/// Chart-scoped axis identifier, handed out by the owning chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisId(pub u32);

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which family an axis belongs to. X axes run horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisCollection {
    X,
    Y,
}

/// Mutable result of the last scale pass.
///
/// `min`, `max`, tick positions and intervals are in linearized units (log10
/// on logarithmic axes); data and user extremes are in real units.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScaleState {
    pub(crate) min: Option<f64>,
    pub(crate) max: Option<f64>,
    pub(crate) old_min: Option<f64>,
    pub(crate) old_max: Option<f64>,
    pub(crate) data_min: Option<f64>,
    pub(crate) data_max: Option<f64>,
    pub(crate) user_min: Option<f64>,
    pub(crate) user_max: Option<f64>,
    pub(crate) range_applied: bool,
    pub(crate) ignore_min_padding: bool,
    pub(crate) ignore_max_padding: bool,
    pub(crate) has_visible_series: bool,
    pub(crate) closest_data_gap: Option<f64>,
    pub(crate) min_range: Option<f64>,
    pub(crate) linked_parent: Option<AxisId>,
    pub(crate) tick_interval: f64,
    pub(crate) minor_tick_interval: Option<f64>,
    pub(crate) minor_auto_interval: Option<f64>,
    pub(crate) tick_positions: Vec<f64>,
    pub(crate) minor_tick_positions: Vec<f64>,
    pub(crate) time_info: Option<TimeTickInfo>,
    pub(crate) point_range: f64,
    pub(crate) min_point_offset: f64,
    pub(crate) point_range_padding: f64,
    pub(crate) closest_point_range: Option<f64>,
    pub(crate) trans_a: f64,
    pub(crate) old_trans_a: f64,
    pub(crate) trans_b: f64,
    pub(crate) min_pixel_padding: f64,
    pub(crate) tick_amount: Option<usize>,
    pub(crate) stagger_lines: usize,
}

/// One axis of a chart.
pub struct Axis {
    id: AxisId,
    collection: AxisCollection,
    user_options: AxisUserOptions,
    pub(crate) options: AxisOptions,
    pub(crate) tick_positioner: Option<TickPositionerFn>,
    pub(crate) label_formatter: Option<LabelFormatterFn>,
    pub(crate) plot_area: PlotArea,
    pub(crate) time_zone: TimeZoneMode,
    pub(crate) state: ScaleState,
    pub(crate) stacks: Stacks,
    pub(crate) ticks: IndexMap<TickKey, Tick>,
    pub(crate) tick_removals: DeferredTasks<TickKey>,
    pub(crate) plot_items: IndexMap<String, PlotLineOrBand>,
    pub(crate) option_plot_items: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl fmt::Debug for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axis")
            .field("id", &self.id)
            .field("collection", &self.collection)
            .field("kind", &self.options.kind)
            .field("min", &self.state.min)
            .field("max", &self.state.max)
            .field("tick_positions", &self.state.tick_positions)
            .field("has_tick_positioner", &self.tick_positioner.is_some())
            .field("has_label_formatter", &self.label_formatter.is_some())
            .finish_non_exhaustive()
    }
}

impl Axis {
    /// Resolves `user` options and builds an axis laid out in `plot_area`.
    pub fn new(
        id: AxisId,
        collection: AxisCollection,
        user: AxisUserOptions,
        plot_area: PlotArea,
    ) -> ChartResult<Self> {
        let options = AxisOptions::resolve(collection, &user)?;
        let mut axis = Self {
            id,
            collection,
            user_options: user,
            options,
            tick_positioner: None,
            label_formatter: None,
            plot_area: plot_area.validate()?,
            time_zone: TimeZoneMode::Utc,
            state: ScaleState::default(),
            stacks: Stacks::default(),
            ticks: IndexMap::new(),
            tick_removals: DeferredTasks::default(),
            plot_items: IndexMap::new(),
            option_plot_items: Vec::new(),
            diagnostics: Vec::new(),
        };
        axis.state.stagger_lines = 1;
        axis.apply_layout();
        axis.seed_plot_items()?;
        Ok(axis)
    }

    #[must_use]
    pub fn id(&self) -> AxisId {
        self.id
    }

    #[must_use]
    pub fn collection(&self) -> AxisCollection {
        self.collection
    }

    #[must_use]
    pub fn kind(&self) -> AxisKind {
        self.options.kind
    }

    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.collection == AxisCollection::X
    }

    #[must_use]
    pub fn options(&self) -> &AxisOptions {
        &self.options
    }

    #[must_use]
    pub fn user_options(&self) -> &AxisUserOptions {
        &self.user_options
    }

    /// Replaces the user options.
    ///
    /// Callbacks, ticks and plot items added at runtime survive; plot items
    /// declared in the old options are replaced by the new declarations.
    pub fn update(&mut self, user: AxisUserOptions) -> ChartResult<()> {
        self.options = AxisOptions::resolve(self.collection, &user)?;
        self.user_options = user;
        self.state.range_applied = false;
        self.seed_plot_items()
    }

    pub fn set_tick_positioner(&mut self, positioner: Option<TickPositionerFn>) {
        self.tick_positioner = positioner;
    }

    pub fn set_label_formatter(&mut self, formatter: Option<LabelFormatterFn>) {
        self.label_formatter = formatter;
    }

    /// Zone used for datetime tick boundaries and labels.
    pub fn set_time_zone(&mut self, zone: TimeZoneMode) {
        self.time_zone = zone;
    }

    #[must_use]
    pub fn time_zone(&self) -> TimeZoneMode {
        self.time_zone
    }

    pub fn set_plot_area(&mut self, plot_area: PlotArea) -> ChartResult<()> {
        self.plot_area = plot_area.validate()?;
        self.apply_layout();
        Ok(())
    }

    fn apply_layout(&mut self) {
        self.state.trans_b = self.pos();
    }

    /// Pixel origin of the axis: plot left for X axes, plot top for Y axes.
    #[must_use]
    pub fn pos(&self) -> f64 {
        if self.is_horizontal() {
            self.plot_area.left
        } else {
            self.plot_area.top
        }
    }

    /// Axis length in pixels.
    #[must_use]
    pub fn len(&self) -> f64 {
        if self.is_horizontal() {
            self.plot_area.width
        } else {
            self.plot_area.height
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.tick_positions.is_empty()
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        self.plot_area
    }

    #[must_use]
    pub fn categories(&self) -> Option<&[String]> {
        self.options.categories.as_deref()
    }

    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.options.reversed
    }

    /// Resolved minimum in linearized units.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.state.min
    }

    /// Resolved maximum in linearized units.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.state.max
    }

    #[must_use]
    pub fn tick_interval(&self) -> f64 {
        self.state.tick_interval
    }

    #[must_use]
    pub fn minor_tick_interval(&self) -> Option<f64> {
        self.state.minor_tick_interval
    }

    /// Major tick positions in linearized units, strictly ascending.
    #[must_use]
    pub fn tick_positions(&self) -> &[f64] {
        &self.state.tick_positions
    }

    #[must_use]
    pub fn minor_tick_positions(&self) -> &[f64] {
        &self.state.minor_tick_positions
    }

    /// Unit metadata of the last datetime tick run.
    #[must_use]
    pub fn time_info(&self) -> Option<&TimeTickInfo> {
        self.state.time_info.as_ref()
    }

    #[must_use]
    pub fn trans_a(&self) -> f64 {
        self.state.trans_a
    }

    #[must_use]
    pub fn trans_b(&self) -> f64 {
        self.state.trans_b
    }

    #[must_use]
    pub fn min_pixel_padding(&self) -> f64 {
        self.state.min_pixel_padding
    }

    #[must_use]
    pub fn point_range(&self) -> f64 {
        self.state.point_range
    }

    #[must_use]
    pub fn min_range(&self) -> Option<f64> {
        self.state.min_range
    }

    #[must_use]
    pub fn stagger_lines(&self) -> usize {
        self.state.stagger_lines
    }

    #[must_use]
    pub fn stacks(&self) -> &Stacks {
        &self.stacks
    }

    #[must_use]
    pub fn has_visible_series(&self) -> bool {
        self.state.has_visible_series
    }

    /// The axis this one is linked to, when the link was honored.
    #[must_use]
    pub fn linked_parent(&self) -> Option<AxisId> {
        self.state.linked_parent
    }

    /// Diagnostics from the last scale pass.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn clear_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        report_diagnostic(&diagnostic);
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    /// Ticks currently owned by the axis, including ones fading out.
    pub fn ticks(&self) -> impl Iterator<Item = &Tick> {
        self.ticks.values()
    }

    #[must_use]
    pub fn tick(&self, key: TickKey) -> Option<&Tick> {
        self.ticks.get(&key)
    }

    /// Whether removal of the tick at `key` is scheduled.
    #[must_use]
    pub fn is_tick_removal_pending(&self, key: TickKey) -> bool {
        self.tick_removals.is_pending(&key)
    }

    pub fn plot_lines_and_bands(&self) -> impl Iterator<Item = &PlotLineOrBand> {
        self.plot_items.values()
    }

    #[must_use]
    pub fn plot_line_or_band(&self, id: &str) -> Option<&PlotLineOrBand> {
        self.plot_items.get(id)
    }

    pub(crate) fn insert_plot_item(&mut self, item: PlotLineOrBand) -> ChartResult<String> {
        let id = item.id().to_owned();
        if self.plot_items.contains_key(&id) {
            return Err(ChartError::InvalidData(format!(
                "plot line or band `{id}` already exists on axis {}",
                self.id
            )));
        }
        self.plot_items.insert(id.clone(), item);
        Ok(id)
    }

    pub(crate) fn remove_plot_item(&mut self, id: &str) -> ChartResult<PlotLineOrBand> {
        self.plot_items
            .shift_remove(id)
            .ok_or_else(|| ChartError::UnknownPlotBandOrLine(id.to_owned()))
    }
}
