//! The chart session: owns axes, series and the per-pass registries, and
//! runs the redraw in its fixed order.

mod extremes_intent;
mod options;
mod snapshot;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tracing::debug;

use crate::axis::{
    Axis, AxisCollection, AxisId, AxisUserOptions, PlotBandOptions, PlotLineOptions,
    PlotLineOrBand, SeriesView, TickAmountRegistry,
};
use crate::core::{PlotArea, Viewport};
use crate::error::{ChartError, ChartResult, Diagnostic};
use crate::render::{Color, LinePrimitive, RenderFrame, Renderer, TextPrimitive};
use crate::series::SeriesSource;

pub use extremes_intent::{ExtremesIntent, ExtremesInterceptor, ExtremesOutcome, ExtremesTrigger};
pub use options::ChartOptions;
pub use snapshot::{
    AxisSnapshot, CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartSnapshot, ChartSnapshotJsonContractV1,
};

const TICK_LABEL_COLOR: Color = Color::rgb(0.3, 0.3, 0.3);

/// Index of a series inside its chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesId(pub usize);

#[derive(Debug)]
struct SeriesEntry {
    source: Box<dyn SeriesSource>,
    x_axis: AxisId,
    y_axis: AxisId,
}

/// Chart session owning every axis and series of one chart.
pub struct Chart<R: Renderer> {
    renderer: R,
    options: ChartOptions,
    axes: IndexMap<AxisId, Axis>,
    series: Vec<SeriesEntry>,
    tick_amounts: TickAmountRegistry,
    interceptors: Vec<Box<dyn ExtremesInterceptor>>,
    next_axis_id: u32,
    next_plot_item_id: u64,
}

impl<R: Renderer> Chart<R> {
    pub fn new(renderer: R, options: ChartOptions) -> ChartResult<Self> {
        Ok(Self {
            renderer,
            options: options.validate()?,
            axes: IndexMap::new(),
            series: Vec::new(),
            tick_amounts: TickAmountRegistry::default(),
            interceptors: Vec::new(),
            next_axis_id: 0,
            next_plot_item_id: 0,
        })
    }

    #[must_use]
    pub fn options(&self) -> ChartOptions {
        self.options
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Resizes the chart; axes take the new plot area on the next redraw.
    pub fn resize(&mut self, viewport: Viewport, plot_area: PlotArea) -> ChartResult<()> {
        let options = ChartOptions {
            viewport,
            plot_area,
            ..self.options
        }
        .validate()?;
        for axis in self.axes.values_mut() {
            axis.set_plot_area(plot_area)?;
        }
        self.options = options;
        Ok(())
    }

    pub fn add_axis(
        &mut self,
        collection: AxisCollection,
        options: AxisUserOptions,
    ) -> ChartResult<AxisId> {
        let id = AxisId(self.next_axis_id);
        let mut axis = Axis::new(id, collection, options, self.options.plot_area)?;
        axis.set_time_zone(self.options.time);
        self.axes.insert(id, axis);
        self.next_axis_id += 1;
        Ok(id)
    }

    pub fn axis(&self, id: AxisId) -> ChartResult<&Axis> {
        self.axes.get(&id).ok_or(ChartError::UnknownAxis(id))
    }

    pub fn axis_mut(&mut self, id: AxisId) -> ChartResult<&mut Axis> {
        self.axes.get_mut(&id).ok_or(ChartError::UnknownAxis(id))
    }

    pub fn axes(&self) -> impl Iterator<Item = &Axis> {
        self.axes.values()
    }

    /// Attaches a series to an X and a Y axis.
    pub fn add_series(
        &mut self,
        source: Box<dyn SeriesSource>,
        x_axis: AxisId,
        y_axis: AxisId,
    ) -> ChartResult<SeriesId> {
        for (id, expected) in [(x_axis, AxisCollection::X), (y_axis, AxisCollection::Y)] {
            let axis = self.axis(id)?;
            if axis.collection() != expected {
                return Err(ChartError::InvalidData(format!(
                    "axis {id} is not a {expected:?} axis"
                )));
            }
        }
        let length_mismatch = source.x_data().len() != source.y_data().len();
        if length_mismatch {
            return Err(ChartError::InvalidData(format!(
                "series `{}` has {} x values but {} y values",
                source.name(),
                source.x_data().len(),
                source.y_data().len()
            )));
        }
        self.series.push(SeriesEntry {
            source,
            x_axis,
            y_axis,
        });
        Ok(SeriesId(self.series.len() - 1))
    }

    #[must_use]
    pub fn series(&self, id: SeriesId) -> Option<&dyn SeriesSource> {
        self.series.get(id.0).map(|entry| entry.source.as_ref())
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn redraw(&mut self) {
        self.redraw_at(Instant::now());
    }

    /// Runs one full scale pass at `now`.
    ///
    /// Stacks and extremes resolve for every axis before any axis places
    /// ticks; linked parents place ticks before their children; tick counts
    /// align only after every axis has its natural count; series see the
    /// final extremes last.
    pub fn redraw_at(&mut self, now: Instant) {
        let align = self.options.align_ticks;
        let ignore_hidden = self.options.ignore_hidden_series;
        let fade = Duration::from_millis(self.options.tick_fade_ms);
        let Self {
            axes,
            series,
            tick_amounts,
            renderer,
            ..
        } = self;

        tick_amounts.clear();
        for axis in axes.values_mut() {
            axis.clear_diagnostics();
        }

        {
            let views = collect_views(axes, series);
            let views_of = |id: &AxisId| views.get(id).map_or(&[][..], Vec::as_slice);

            for (id, axis) in axes.iter_mut() {
                axis.build_stacks(views_of(id), ignore_hidden);
            }
            for collection in [AxisCollection::X, AxisCollection::Y] {
                for (id, axis) in axes
                    .iter_mut()
                    .filter(|(_, axis)| axis.collection() == collection)
                {
                    axis.get_series_extremes(views_of(id), ignore_hidden);
                }
            }
            for id in resolution_order(axes) {
                let parent = axes
                    .get(&id)
                    .and_then(|axis| axis.options.linked_to)
                    .filter(|parent| *parent != id)
                    .and_then(|parent| axes.get(&parent))
                    .map(Axis::linked_parent_view);
                if let Some(axis) = axes.get_mut(&id) {
                    let link = axis.resolve_link(parent);
                    axis.set_tick_positions(views_of(&id), link.as_ref());
                }
            }
        }

        for axis in axes.values() {
            axis.record_tick_amount(tick_amounts, align);
        }
        for axis in axes.values_mut() {
            axis.adjust_tick_amount(tick_amounts, align);
        }

        let measure = |text: &str, font_size_px: f64| renderer.measure_text(text, font_size_px);
        for axis in axes.values_mut() {
            axis.sync_ticks(now, fade);
            axis.layout_labels(&measure);
        }

        for entry in series.iter_mut() {
            let Some(x_axis) = axes.get(&entry.x_axis) else {
                continue;
            };
            let extremes = x_axis.get_extremes();
            if let (Some(min), Some(max)) = (extremes.min, extremes.max) {
                let force = x_axis.state.old_min != x_axis.state.min
                    || x_axis.state.old_max != x_axis.state.max;
                entry.source.process_data(force, min, max);
            }
        }

        debug!(axes = axes.len(), series = series.len(), "chart redrawn");
    }

    pub fn register_extremes_interceptor(
        &mut self,
        interceptor: Box<dyn ExtremesInterceptor>,
    ) -> ChartResult<()> {
        let interceptor_id = interceptor.id().to_owned();
        if interceptor_id.is_empty() {
            return Err(ChartError::InvalidData(
                "interceptor id must not be empty".to_owned(),
            ));
        }
        if self
            .interceptors
            .iter()
            .any(|entry| entry.id() == interceptor_id)
        {
            return Err(ChartError::InvalidData(format!(
                "interceptor with id `{interceptor_id}` is already registered"
            )));
        }
        self.interceptors.push(interceptor);
        Ok(())
    }

    /// Unregisters an interceptor by id. Returns `true` when removed.
    pub fn unregister_extremes_interceptor(&mut self, interceptor_id: &str) -> bool {
        if let Some(position) = self
            .interceptors
            .iter()
            .position(|entry| entry.id() == interceptor_id)
        {
            self.interceptors.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// Pins the axis to `[min, max]` (real values; `None` releases a side)
    /// after the interceptors had their say, then optionally redraws.
    pub fn set_extremes(
        &mut self,
        axis: AxisId,
        min: Option<f64>,
        max: Option<f64>,
        redraw: bool,
    ) -> ChartResult<ExtremesOutcome> {
        self.apply_extremes_intent(
            ExtremesIntent::new(axis, min, max, ExtremesTrigger::SetExtremes),
            redraw,
        )
    }

    /// Zooms to `[min, max]`, releasing either side that reaches past the
    /// data (and past the configured bound), then redraws.
    pub fn zoom(
        &mut self,
        axis: AxisId,
        min: Option<f64>,
        max: Option<f64>,
    ) -> ChartResult<ExtremesOutcome> {
        let target = self.axis(axis)?;
        let extremes = target.get_extremes();
        let options = target.options();
        let min = min.filter(|value| {
            extremes.data_min.is_none_or(|data_min| {
                *value > data_min.min(options.min.unwrap_or(data_min))
            })
        });
        let max = max.filter(|value| {
            extremes.data_max.is_none_or(|data_max| {
                *value < data_max.max(options.max.unwrap_or(data_max))
            })
        });
        self.apply_extremes_intent(
            ExtremesIntent::new(axis, min, max, ExtremesTrigger::Zoom),
            true,
        )
    }

    fn apply_extremes_intent(
        &mut self,
        mut intent: ExtremesIntent,
        redraw: bool,
    ) -> ChartResult<ExtremesOutcome> {
        validate_extremes(intent.min, intent.max)?;
        let current = self.axis(intent.axis)?.get_extremes();
        for interceptor in &mut self.interceptors {
            interceptor.intercept(&mut intent, current);
        }
        if intent.is_cancelled() {
            debug!(axis = %intent.axis, trigger = ?intent.trigger, "extremes change cancelled");
            return Ok(ExtremesOutcome::Cancelled);
        }
        validate_extremes(intent.min, intent.max)?;

        self.axis_mut(intent.axis)?
            .set_user_extremes(intent.min, intent.max);
        debug!(
            axis = %intent.axis,
            min = ?intent.min,
            max = ?intent.max,
            trigger = ?intent.trigger,
            "extremes applied"
        );
        if redraw {
            self.redraw();
        }
        Ok(ExtremesOutcome::Applied {
            min: intent.min,
            max: intent.max,
        })
    }

    /// Adds a plot line; returns its id, generated when the options carry none.
    pub fn add_plot_line(&mut self, axis: AxisId, options: PlotLineOptions) -> ChartResult<String> {
        let id = self.plot_item_id(options.id.as_deref());
        let item = PlotLineOrBand::from_line_options(id, &options)?;
        self.axis_mut(axis)?.insert_plot_item(item)
    }

    pub fn add_plot_band(&mut self, axis: AxisId, options: PlotBandOptions) -> ChartResult<String> {
        let id = self.plot_item_id(options.id.as_deref());
        let item = PlotLineOrBand::from_band_options(id, &options)?;
        self.axis_mut(axis)?.insert_plot_item(item)
    }

    pub fn remove_plot_band_or_line(&mut self, axis: AxisId, id: &str) -> ChartResult<()> {
        self.axis_mut(axis)?.remove_plot_item(id).map(|_| ())
    }

    fn plot_item_id(&mut self, requested: Option<&str>) -> String {
        if let Some(id) = requested {
            return id.to_owned();
        }
        let id = format!("plot-item-{}", self.next_plot_item_id);
        self.next_plot_item_id += 1;
        id
    }

    /// Diagnostics of the last redraw across all axes.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.axes
            .values()
            .flat_map(|axis| axis.diagnostics().iter().cloned())
            .collect()
    }

    /// Materializes bands, gridlines, tick marks, tick labels and plot lines.
    #[must_use]
    pub fn build_render_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.options.viewport);
        for axis in self.axes.values() {
            let plot_items: Vec<_> = axis
                .plot_lines_and_bands()
                .filter_map(|item| item.render(axis))
                .collect();

            for geometry in &plot_items {
                frame.rects.extend(geometry.rect);
            }
            for tick in axis.ticks().filter(|tick| tick.is_active()) {
                let crisp = |line: &LinePrimitive| self.renderer.crisp_line(*line);
                frame.lines.extend(tick.gridline().map(crisp));
                frame.lines.extend(tick.mark().map(crisp));
                if let Some(label) = tick.label().filter(|label| label.visible) {
                    frame.texts.push(TextPrimitive::new(
                        label.text.clone(),
                        label.x,
                        label.y,
                        label.font_size_px,
                        TICK_LABEL_COLOR,
                        label.align,
                    ));
                }
            }
            for geometry in plot_items {
                frame.lines.extend(geometry.line);
                frame.texts.extend(geometry.label);
            }
        }
        frame
    }

    /// Builds the frame and hands it to the renderer.
    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_render_frame();
        self.renderer.render(&frame)
    }

    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            viewport: self.options.viewport,
            plot_area: self.options.plot_area,
            axes: self.axes.values().map(AxisSnapshot::of).collect(),
            diagnostics: self.diagnostics(),
        }
    }

    pub fn snapshot_json_contract_v1_pretty(&self) -> ChartResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}

fn validate_extremes(min: Option<f64>, max: Option<f64>) -> ChartResult<()> {
    if min.is_some_and(|value| !value.is_finite()) || max.is_some_and(|value| !value.is_finite()) {
        return Err(ChartError::InvalidData(
            "extremes must be finite".to_owned(),
        ));
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ChartError::InvalidData(format!(
                "extremes min {min} must not exceed max {max}"
            )));
        }
    }
    Ok(())
}

/// Series views per axis; value axes see the window pinned on their
/// series' X axis.
fn collect_views<'a>(
    axes: &IndexMap<AxisId, Axis>,
    series: &'a [SeriesEntry],
) -> BTreeMap<AxisId, Vec<SeriesView<'a>>> {
    let mut views: BTreeMap<AxisId, Vec<SeriesView<'a>>> = BTreeMap::new();
    for (index, entry) in series.iter().enumerate() {
        let source = entry.source.as_ref();
        views.entry(entry.x_axis).or_default().push(SeriesView {
            index,
            source,
            x_window: None,
        });
        let x_window = axes.get(&entry.x_axis).and_then(|x_axis| {
            let extremes = x_axis.get_extremes();
            match (extremes.user_min, extremes.user_max) {
                (None, None) => None,
                (min, max) => Some((
                    min.unwrap_or(f64::NEG_INFINITY),
                    max.unwrap_or(f64::INFINITY),
                )),
            }
        });
        views.entry(entry.y_axis).or_default().push(SeriesView {
            index,
            source,
            x_window,
        });
    }
    views
}

/// Axis ids with every linked parent ahead of its children. Cycles and
/// dangling links keep insertion order.
fn resolution_order(axes: &IndexMap<AxisId, Axis>) -> Vec<AxisId> {
    let mut order: Vec<AxisId> = Vec::with_capacity(axes.len());
    let mut pending: Vec<AxisId> = axes.keys().copied().collect();
    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|id| {
            let ready = match axes.get(id).and_then(|axis| axis.options.linked_to) {
                None => true,
                Some(parent) => {
                    parent == *id || !axes.contains_key(&parent) || order.contains(&parent)
                }
            };
            if ready {
                order.push(*id);
            }
            !ready
        });
        if pending.len() == before {
            order.append(&mut pending);
        }
    }
    order
}
