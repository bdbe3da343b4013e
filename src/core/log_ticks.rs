//! Tick selection for logarithmic axes.
//!
//! All inputs and outputs are in log space (`log10` of the real value).

use crate::core::numeric::{
    lin2log, linear_tick_positions, log2lin, magnitude, normalize_tick_interval,
};

/// Intervals at or above this value use whole decades.
pub const WHOLE_DECADE_THRESHOLD: f64 = 0.5;

/// Intervals below this value are treated as locally linear.
pub const LINEAR_WINDOW_THRESHOLD: f64 = 0.08;

const COARSE_INTERMEDIATES: [f64; 3] = [1.0, 2.0, 4.0];
const MEDIUM_INTERMEDIATES: [f64; 5] = [1.0, 2.0, 4.0, 6.0, 8.0];
const FINE_INTERMEDIATES: [f64; 9] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];

/// Inputs of one log tick pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogTickRequest {
    /// Requested interval in log space.
    pub interval: f64,
    pub min: f64,
    pub max: f64,
    /// Minor passes run once per major gap and never move the major interval.
    pub minor: bool,
    /// Explicit `tickInterval`/`minorTickInterval` option, in real units.
    pub interval_option: Option<f64>,
    pub tick_pixel_interval: f64,
    pub axis_len: f64,
    /// Number of major ticks, used to size the minor pixel budget.
    pub major_tick_count: usize,
    /// Real-unit minor interval remembered from the last major pass.
    pub minor_auto_interval: Option<f64>,
}

/// Result of one log tick pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LogTicks {
    pub positions: Vec<f64>,
    /// Interval that produced `positions`; real units in the linear window.
    pub interval: f64,
    pub minor_auto_interval: Option<f64>,
}

fn intermediates_for(interval: f64) -> &'static [f64] {
    if interval > 0.3 {
        &COARSE_INTERMEDIATES
    } else if interval > 0.15 {
        &MEDIUM_INTERMEDIATES
    } else {
        &FINE_INTERMEDIATES
    }
}

/// Computes log-space tick positions for `[min, max]`.
#[must_use]
pub fn log_tick_positions(request: &LogTickRequest) -> LogTicks {
    let LogTickRequest {
        interval,
        min,
        max,
        minor,
        ..
    } = *request;

    if interval >= WHOLE_DECADE_THRESHOLD {
        let interval = interval.round();
        return LogTicks {
            positions: linear_tick_positions(interval, min, max),
            interval,
            minor_auto_interval: if minor {
                request.minor_auto_interval
            } else {
                None
            },
        };
    }

    if interval >= LINEAR_WINDOW_THRESHOLD {
        let intermediates = intermediates_for(interval);
        let mut positions = Vec::new();
        let mut last_pos: Option<f64> = None;
        let mut decade = min.floor();
        'decades: while decade < max + 1.0 {
            for multiple in intermediates {
                let pos = log2lin(lin2log(decade) * multiple);
                if let Some(last) = last_pos {
                    if pos > min && (!minor || last <= max) {
                        positions.push(last);
                    }
                    if last > max {
                        break 'decades;
                    }
                }
                last_pos = Some(pos);
            }
            decade += 1.0;
        }
        return LogTicks {
            positions,
            interval,
            minor_auto_interval: if minor {
                request.minor_auto_interval
            } else {
                None
            },
        };
    }

    // Deep inside one decade: tick the real values linearly.
    let real_min = lin2log(min);
    let real_max = lin2log(max);
    let pixel_interval = if minor {
        request.tick_pixel_interval / 5.0
    } else {
        request.tick_pixel_interval
    };
    let total_pixel_length = if minor {
        request.axis_len / request.major_tick_count.max(1) as f64
    } else {
        request.axis_len
    };
    let total_pixel_length = if total_pixel_length > 0.0 {
        total_pixel_length
    } else {
        1.0
    };

    let raw = request
        .interval_option
        .or(request.minor_auto_interval)
        .unwrap_or((real_max - real_min) * pixel_interval / total_pixel_length);
    let real_interval = normalize_tick_interval(raw, None, magnitude(raw), true);
    let positions = linear_tick_positions(real_interval, real_min, real_max)
        .into_iter()
        .filter(|value| *value > 0.0)
        .map(log2lin)
        .collect();

    LogTicks {
        positions,
        interval: real_interval,
        minor_auto_interval: if minor {
            request.minor_auto_interval
        } else {
            Some(real_interval / 5.0)
        },
    }
}
