use crate::axis::{Axis, PlotBandOptions, PlotLabelOptions, PlotLineOptions};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive, crisp_line};

const PLOT_LABEL_COLOR: Color = Color::rgb(0.4, 0.4, 0.4);
const PLOT_LABEL_INSET: f64 = 4.0;

/// Pixels a translated edge may sit outside the axis before it is dropped.
const EDGE_TOLERANCE: f64 = 1e-6;

/// Geometry of a plot item, in real axis units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlotItemShape {
    Line { value: f64, width: f64 },
    Band { from: f64, to: f64 },
}

/// A line or band attached to an axis value range.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLineOrBand {
    id: String,
    shape: PlotItemShape,
    color: Color,
    label: Option<PlotLabelOptions>,
}

/// Draw commands produced for one plot item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotItemGeometry {
    pub line: Option<LinePrimitive>,
    pub rect: Option<RectPrimitive>,
    pub label: Option<TextPrimitive>,
}

impl PlotLineOrBand {
    pub fn from_line_options(id: impl Into<String>, options: &PlotLineOptions) -> ChartResult<Self> {
        if !options.value.is_finite() {
            return Err(ChartError::InvalidData(
                "plot line value must be finite".to_owned(),
            ));
        }
        if !options.width.is_finite() || options.width < 0.0 {
            return Err(ChartError::InvalidData(
                "plot line width must be finite and >= 0".to_owned(),
            ));
        }
        options.color.validate()?;
        Ok(Self {
            id: id.into(),
            shape: PlotItemShape::Line {
                value: options.value,
                width: options.width,
            },
            color: options.color,
            label: options.label.clone(),
        })
    }

    /// Builds a band; `from` and `to` may come in either order.
    pub fn from_band_options(id: impl Into<String>, options: &PlotBandOptions) -> ChartResult<Self> {
        if !options.from.is_finite() || !options.to.is_finite() {
            return Err(ChartError::InvalidData(
                "plot band edges must be finite".to_owned(),
            ));
        }
        options.color.validate()?;
        Ok(Self {
            id: id.into(),
            shape: PlotItemShape::Band {
                from: options.from.min(options.to),
                to: options.from.max(options.to),
            },
            color: options.color,
            label: options.label.clone(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn shape(&self) -> PlotItemShape {
        self.shape
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn label(&self) -> Option<&PlotLabelOptions> {
        self.label.as_ref()
    }

    /// Geometry against the axis' current scale, or `None` when the item
    /// lies entirely outside the visible range.
    #[must_use]
    pub fn render(&self, axis: &Axis) -> Option<PlotItemGeometry> {
        match self.shape {
            PlotItemShape::Line { value, width } => {
                if width <= 0.0 || (axis.options.is_log() && value <= 0.0) {
                    return None;
                }
                let mut line = axis.plot_line_path(axis.val2lin(value), width)?;
                line.color = self.color;
                let label = self.label.as_ref().map(|label| {
                    let (x, y) = if axis.is_horizontal() {
                        (line.x1 + PLOT_LABEL_INSET, line.y1 + label.font_size_px + PLOT_LABEL_INSET)
                    } else {
                        (line.x1 + PLOT_LABEL_INSET, line.y1 - PLOT_LABEL_INSET)
                    };
                    TextPrimitive::new(
                        label.text.clone(),
                        x,
                        y,
                        label.font_size_px,
                        PLOT_LABEL_COLOR,
                        TextHAlign::Left,
                    )
                });
                Some(PlotItemGeometry {
                    line: Some(line),
                    rect: None,
                    label,
                })
            }
            PlotItemShape::Band { from, to } => {
                if axis.options.is_log() && to <= 0.0 {
                    return None;
                }
                let from = if axis.options.is_log() && from <= 0.0 {
                    f64::MIN_POSITIVE
                } else {
                    from
                };
                let half_point_range = axis.state.point_range / 2.0;
                let min = axis.state.min? - half_point_range;
                let max = axis.state.max? + half_point_range;
                let from = axis.val2lin(from).max(min);
                let to = axis.val2lin(to).min(max);
                if from > to {
                    return None;
                }
                let mut rect = axis.plot_band_path(from, to)?;
                rect.fill_color = self.color;
                let label = self.label.as_ref().map(|label| {
                    let (x, y, align) = if axis.is_horizontal() {
                        (
                            rect.x + rect.width / 2.0,
                            rect.y + label.font_size_px + PLOT_LABEL_INSET,
                            TextHAlign::Center,
                        )
                    } else {
                        (
                            rect.x + PLOT_LABEL_INSET,
                            rect.y + rect.height / 2.0 + label.font_size_px * 0.3,
                            TextHAlign::Left,
                        )
                    };
                    TextPrimitive::new(
                        label.text.clone(),
                        x,
                        y,
                        label.font_size_px,
                        PLOT_LABEL_COLOR,
                        align,
                    )
                });
                Some(PlotItemGeometry {
                    line: None,
                    rect: Some(rect),
                    label,
                })
            }
        }
    }
}

impl Axis {
    /// Chart pixel of a linearized value when it falls within the axis.
    fn plot_pixel(&self, value: f64) -> Option<f64> {
        self.state.min?;
        let pixel = self.tick_pixel(value);
        let start = self.pos();
        let end = start + self.len();
        (pixel >= start - EDGE_TOLERANCE && pixel <= end + EDGE_TOLERANCE).then(|| pixel.round())
    }

    /// Full-span line across the plot at linearized `value`.
    #[must_use]
    pub fn plot_line_path(&self, value: f64, width: f64) -> Option<LinePrimitive> {
        let pixel = self.plot_pixel(value)?;
        let plot = self.plot_area;
        let line = if self.is_horizontal() {
            LinePrimitive::new(pixel, plot.top, pixel, plot.bottom(), width, Color::rgb(0.0, 0.0, 0.0))
        } else {
            LinePrimitive::new(plot.left, pixel, plot.right(), pixel, width, Color::rgb(0.0, 0.0, 0.0))
        };
        Some(crisp_line(line))
    }

    /// Plot-wide rectangle between two linearized values; `None` when
    /// either edge is outside the axis.
    #[must_use]
    pub fn plot_band_path(&self, from: f64, to: f64) -> Option<RectPrimitive> {
        let a = self.plot_pixel(from)?;
        let b = self.plot_pixel(to)?;
        let plot = self.plot_area;
        let (low, high) = (a.min(b), a.max(b));
        let transparent = Color::rgba(0.0, 0.0, 0.0, 0.0);
        Some(if self.is_horizontal() {
            RectPrimitive::new(low, plot.top, high - low, plot.height, transparent)
        } else {
            RectPrimitive::new(plot.left, low, plot.width, high - low, transparent)
        })
    }

    /// Replaces the items declared in the axis options.
    pub(crate) fn seed_plot_items(&mut self) -> ChartResult<()> {
        for id in std::mem::take(&mut self.option_plot_items) {
            self.plot_items.shift_remove(&id);
        }
        let lines = self.options.plot_lines.clone();
        let bands = self.options.plot_bands.clone();
        for (index, options) in lines.iter().enumerate() {
            let id = options
                .id
                .clone()
                .unwrap_or_else(|| format!("plot-line-{}-{index}", self.id().0));
            let id = self.insert_plot_item(PlotLineOrBand::from_line_options(id, options)?)?;
            self.option_plot_items.push(id);
        }
        for (index, options) in bands.iter().enumerate() {
            let id = options
                .id
                .clone()
                .unwrap_or_else(|| format!("plot-band-{}-{index}", self.id().0));
            let id = self.insert_plot_item(PlotLineOrBand::from_band_options(id, options)?)?;
            self.option_plot_items.push(id);
        }
        Ok(())
    }
}
