use crate::axis::extremes::SeriesView;
use crate::axis::{Axis, LinkedParent};
use crate::core::numeric::{lin2log, log2lin};
use crate::series::PointPlacement;

/// Flags of one [`Axis::translate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TranslateOptions {
    /// Pixel to value instead of value to pixel.
    pub backwards: bool,
    /// Top-down canvas orientation, as used by vertical axes.
    pub canvas: bool,
    /// Use the transform from before the last scale pass.
    pub old: bool,
    /// Convert real values through the log transform.
    pub handle_log: bool,
    /// Offset in point ranges, `0.5` centers a point between ticks.
    pub point_placement: Option<f64>,
}

impl TranslateOptions {
    #[must_use]
    pub const fn forward() -> Self {
        Self {
            backwards: false,
            canvas: false,
            old: false,
            handle_log: false,
            point_placement: None,
        }
    }

    #[must_use]
    pub const fn backward() -> Self {
        Self {
            backwards: true,
            ..Self::forward()
        }
    }

    #[must_use]
    pub const fn with_canvas(mut self, canvas: bool) -> Self {
        self.canvas = canvas;
        self
    }

    #[must_use]
    pub const fn with_log(mut self) -> Self {
        self.handle_log = true;
        self
    }

    #[must_use]
    pub const fn with_old(mut self) -> Self {
        self.old = true;
        self
    }

    #[must_use]
    pub const fn with_point_placement(mut self, placement: f64) -> Self {
        self.point_placement = Some(placement);
        self
    }
}

impl Axis {
    /// Real value to linearized axis units.
    #[must_use]
    pub fn val2lin(&self, value: f64) -> f64 {
        if self.options.is_log() {
            log2lin(value)
        } else {
            value
        }
    }

    /// Linearized axis units back to a real value.
    #[must_use]
    pub fn lin2val(&self, value: f64) -> f64 {
        if self.options.is_log() {
            lin2log(value)
        } else {
            value
        }
    }

    /// The single value/pixel primitive; pixels are relative to the axis
    /// origin.
    ///
    /// Forward: `sign * (lin - min) * transA + offset + sign * minPixelPadding`
    /// plus the point placement shift. Backward is its exact inverse
    /// (without placement).
    #[must_use]
    pub fn translate(&self, value: f64, options: TranslateOptions) -> f64 {
        let len = self.len();
        let mut trans_a = if options.old {
            self.state.old_trans_a
        } else {
            self.state.trans_a
        };
        if trans_a == 0.0 {
            trans_a = self.state.trans_a;
        }
        let local_min = if options.old {
            self.state.old_min.or(self.state.min)
        } else {
            self.state.min
        }
        .unwrap_or(0.0);
        let post_translate = options.handle_log && self.options.is_log();

        let mut sign = 1.0;
        let mut offset = 0.0;
        if options.canvas {
            sign = -1.0;
            offset = len;
        }
        if self.options.reversed {
            sign = -sign;
            offset -= sign * len;
        }

        if options.backwards {
            let shifted = value * sign + offset - self.state.min_pixel_padding;
            let lin = if trans_a != 0.0 {
                shifted / trans_a + local_min
            } else {
                local_min
            };
            if post_translate { lin2log(lin) } else { lin }
        } else {
            let lin = if post_translate { log2lin(value) } else { value };
            let placement = options
                .point_placement
                .map_or(0.0, |placement| trans_a * placement * self.state.point_range);
            sign * (lin - local_min) * trans_a
                + offset
                + sign * self.state.min_pixel_padding
                + placement
        }
    }

    /// Real value to pixel; chart coordinates unless `pane_coordinates`.
    #[must_use]
    pub fn to_pixels(&self, value: f64, pane_coordinates: bool) -> f64 {
        let origin = if pane_coordinates { 0.0 } else { self.pos() };
        self.translate(
            value,
            TranslateOptions::forward()
                .with_canvas(!self.is_horizontal())
                .with_log(),
        ) + origin
    }

    /// Pixel to real value; the inverse of [`Axis::to_pixels`].
    #[must_use]
    pub fn to_value(&self, pixel: f64, pane_coordinates: bool) -> f64 {
        let origin = if pane_coordinates { 0.0 } else { self.pos() };
        self.translate(
            pixel - origin,
            TranslateOptions::backward()
                .with_canvas(!self.is_horizontal())
                .with_log(),
        )
    }

    /// Pixel of a series threshold, clamped into the visible range.
    #[must_use]
    pub fn threshold_pixel(&self, threshold: Option<f64>) -> Option<f64> {
        let real_min = self.lin2val(self.state.min?);
        let real_max = self.lin2val(self.state.max?);
        let value = match threshold {
            Some(threshold) if threshold < real_min => real_min,
            Some(threshold) if threshold > real_max => real_max,
            Some(threshold) => threshold,
            None => real_min,
        };
        Some(self.translate(
            value,
            TranslateOptions::forward()
                .with_canvas(!self.is_horizontal())
                .with_log(),
        ))
    }

    /// Derives point range padding and the pixel scale for the current
    /// `[min, max]`.
    pub(crate) fn set_axis_translation(
        &mut self,
        views: &[SeriesView<'_>],
        linked: Option<&LinkedParent>,
        save_old: bool,
    ) {
        let (Some(min), Some(max)) = (self.state.min, self.state.max) else {
            return;
        };
        let range = max - min;
        let has_categories = self.options.categories.is_some();

        if self.is_horizontal() || has_categories {
            let mut point_range: f64 = 0.0;
            let mut min_point_offset: f64 = 0.0;
            let mut point_range_padding: f64 = 0.0;
            let mut closest: Option<f64> = None;

            if let Some(parent) = linked {
                min_point_offset = parent.min_point_offset;
                point_range_padding = parent.point_range_padding;
            } else {
                for view in views {
                    let mut series_range = if has_categories {
                        1.0
                    } else {
                        view.source.point_range()
                    };
                    if series_range > range {
                        series_range = 0.0;
                    }
                    let placement = view.source.point_placement();
                    point_range = point_range.max(series_range);
                    min_point_offset = min_point_offset.max(match placement {
                        Some(PointPlacement::On)
                        | Some(PointPlacement::Between) => 0.0,
                        _ => series_range / 2.0,
                    });
                    point_range_padding = point_range_padding.max(
                        if placement == Some(PointPlacement::On) {
                            0.0
                        } else {
                            series_range
                        },
                    );
                    if let Some(gap) = view.source.closest_point_range() {
                        closest = Some(closest.map_or(gap, |current| current.min(gap)));
                    }
                }
            }

            self.state.min_point_offset = min_point_offset;
            self.state.point_range_padding = point_range_padding;
            self.state.point_range = point_range.min(range);
            self.state.closest_point_range = closest;
        }

        if save_old {
            self.state.old_trans_a = self.state.trans_a;
        }
        let span = range + self.state.point_range_padding;
        let span = if span != 0.0 { span } else { 1.0 };
        self.state.trans_a = self.len() / span;
        self.state.trans_b = self.pos();
        self.state.min_pixel_padding = self.state.trans_a * self.state.min_point_offset;
    }
}
