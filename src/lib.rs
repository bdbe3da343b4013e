//! chart-axis: scale, tick and coordinate engine for 2-D charts.
//!
//! An [`axis::Axis`] turns series data and options into resolved extremes,
//! "nice" tick positions (linear, logarithmic, calendar or categorical),
//! laid-out labels and an invertible value/pixel mapping. A [`chart::Chart`]
//! owns the axes and series of one chart and runs the redraw pass in its
//! fixed order, including cross-axis tick alignment.

pub mod axis;
pub mod chart;
pub mod core;
pub mod error;
pub mod render;
pub mod series;
pub mod telemetry;

pub use axis::{Axis, AxisCollection, AxisExtremes, AxisId, AxisKind, AxisUserOptions};
pub use chart::{Chart, ChartOptions, ExtremesIntent, ExtremesInterceptor, ExtremesTrigger};
pub use error::{ChartError, ChartResult, Diagnostic};
pub use series::{PointPlacement, SeriesData, SeriesSource};
