use serde::{Deserialize, Serialize};

use crate::core::{PlotArea, TimeZoneMode, Viewport};
use crate::error::{ChartError, ChartResult};

/// Space kept around the plot area when none is given.
const DEFAULT_PLOT_MARGIN: f64 = 40.0;

/// Chart-wide options.
///
/// Serializable so hosts can persist a chart setup next to its axis options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub viewport: Viewport,
    pub plot_area: PlotArea,
    #[serde(default = "default_align_ticks")]
    pub align_ticks: bool,
    #[serde(default = "default_ignore_hidden_series")]
    pub ignore_hidden_series: bool,
    #[serde(default)]
    pub time: TimeZoneMode,
    /// How long a retired tick lingers before it is destroyed.
    #[serde(default = "default_tick_fade_ms")]
    pub tick_fade_ms: u64,
}

impl ChartOptions {
    /// Options for a `width` x `height` chart with an inset plot area.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            plot_area: PlotArea::inset(viewport, DEFAULT_PLOT_MARGIN),
            align_ticks: default_align_ticks(),
            ignore_hidden_series: default_ignore_hidden_series(),
            time: TimeZoneMode::default(),
            tick_fade_ms: default_tick_fade_ms(),
        }
    }

    #[must_use]
    pub fn with_plot_area(mut self, plot_area: PlotArea) -> Self {
        self.plot_area = plot_area;
        self
    }

    #[must_use]
    pub fn with_align_ticks(mut self, enabled: bool) -> Self {
        self.align_ticks = enabled;
        self
    }

    #[must_use]
    pub fn with_ignore_hidden_series(mut self, enabled: bool) -> Self {
        self.ignore_hidden_series = enabled;
        self
    }

    #[must_use]
    pub fn with_time_zone(mut self, zone: TimeZoneMode) -> Self {
        self.time = zone;
        self
    }

    #[must_use]
    pub fn with_tick_fade_ms(mut self, millis: u64) -> Self {
        self.tick_fade_ms = millis;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidLayout {
                width: f64::from(self.viewport.width),
                height: f64::from(self.viewport.height),
            });
        }
        self.plot_area.validate()?;
        Ok(self)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidOptions(format!("failed to serialize chart options: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let options: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidOptions(format!("failed to parse chart options: {e}"))
        })?;
        options.validate()
    }
}

fn default_align_ticks() -> bool {
    true
}

fn default_ignore_hidden_series() -> bool {
    true
}

fn default_tick_fade_ms() -> u64 {
    500
}
