//! Float hygiene and the linear "nice interval" normalizer.

use smallvec::SmallVec;

/// Multiples allowed for a normalized linear interval.
pub const DEFAULT_MULTIPLES: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Multiples used when decimals are disallowed at unit magnitude.
pub const INTEGER_MULTIPLES: [f64; 4] = [1.0, 2.0, 5.0, 10.0];

/// Rounds away binary noise by keeping 14 significant digits.
///
/// `0.1 + 0.2` becomes `0.3`; values that are already short are unchanged.
#[must_use]
pub fn correct_float(value: f64) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    format!("{value:.13e}").parse::<f64>().unwrap_or(value)
}

/// Returns `10^floor(log10(value))`, or `1.0` for non-positive input.
#[must_use]
pub fn magnitude(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 1.0;
    }
    10_f64.powf(value.log10().floor())
}

/// Linear value to log-space (`log10`).
#[must_use]
pub fn log2lin(value: f64) -> f64 {
    value.ln() / std::f64::consts::LN_10
}

/// Log-space value back to linear (`10^x`).
#[must_use]
pub fn lin2log(value: f64) -> f64 {
    10_f64.powf(value)
}

/// Snaps `interval` to the nearest allowed multiple of `magnitude`.
///
/// With no explicit `multiples` the candidates are `{1, 2, 2.5, 5, 10}`.
/// When decimals are disallowed they shrink to `{1, 2, 5, 10}` at unit
/// magnitude, or to the single multiple `1 / magnitude` (an interval of
/// exactly one) when the magnitude is `0.1` or smaller. A candidate wins as
/// soon as the normalized value does not exceed the midpoint between it and
/// the next candidate.
#[must_use]
pub fn normalize_tick_interval(
    interval: f64,
    multiples: Option<&[f64]>,
    magnitude: f64,
    allow_decimals: bool,
) -> f64 {
    let magnitude = if magnitude.is_finite() && magnitude > 0.0 {
        magnitude
    } else {
        1.0
    };
    let normalized = interval / magnitude;

    let candidates: SmallVec<[f64; 10]> = match multiples {
        Some(explicit) if !explicit.is_empty() => SmallVec::from_slice(explicit),
        _ if !allow_decimals && magnitude == 1.0 => SmallVec::from_slice(&INTEGER_MULTIPLES),
        _ if !allow_decimals && magnitude <= 0.1 => SmallVec::from_slice(&[1.0 / magnitude]),
        _ => SmallVec::from_slice(&DEFAULT_MULTIPLES),
    };

    let mut chosen = candidates[candidates.len() - 1];
    for (index, candidate) in candidates.iter().copied().enumerate() {
        let next = candidates.get(index + 1).copied().unwrap_or(candidate);
        if normalized <= (candidate + next) / 2.0 {
            chosen = candidate;
            break;
        }
    }

    correct_float(chosen * magnitude)
}

/// Equally spaced positions covering `[min, max]`, snapped outward to
/// multiples of `interval`.
///
/// Never returns an empty vector for finite input.
#[must_use]
pub fn linear_tick_positions(interval: f64, min: f64, max: f64) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if !interval.is_finite() || interval <= 0.0 {
        return vec![min];
    }

    let rounded_min = correct_float((min / interval).floor() * interval);
    let rounded_max = correct_float((max / interval).ceil() * interval);

    let mut positions = Vec::new();
    let mut pos = rounded_min;
    let mut last = f64::NAN;
    while pos <= rounded_max {
        positions.push(pos);
        pos = correct_float(pos + interval);
        // Interval below float resolution at this magnitude.
        if pos == last {
            break;
        }
        last = pos;
    }

    if positions.is_empty() {
        positions.push(rounded_min);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::{correct_float, linear_tick_positions, magnitude, normalize_tick_interval};

    #[test]
    fn correct_float_removes_binary_noise() {
        assert_eq!(correct_float(0.1 + 0.2), 0.3);
        assert_eq!(correct_float(-1.0000000000000002), -1.0);
        assert!(correct_float(f64::NAN).is_nan());
    }

    #[test]
    fn magnitude_is_power_of_ten_floor() {
        assert_eq!(magnitude(0.034), 0.01);
        assert_eq!(magnitude(7.0), 1.0);
        assert_eq!(magnitude(12_345.0), 10_000.0);
        assert_eq!(magnitude(-3.0), 1.0);
    }

    #[test]
    fn normalizer_breaks_ties_on_midpoints() {
        assert_eq!(normalize_tick_interval(1.5, None, 1.0, true), 1.0);
        assert_eq!(normalize_tick_interval(1.6, None, 1.0, true), 2.0);
        assert_eq!(normalize_tick_interval(2.3, None, 1.0, true), 2.5);
        assert_eq!(normalize_tick_interval(3.8, None, 1.0, true), 5.0);
        assert_eq!(normalize_tick_interval(7.6, None, 1.0, true), 10.0);
        assert_eq!(normalize_tick_interval(230.0, None, 100.0, true), 250.0);
    }

    #[test]
    fn normalizer_without_decimals_skips_two_and_a_half() {
        assert_eq!(normalize_tick_interval(2.3, None, 1.0, false), 2.0);
        assert_eq!(normalize_tick_interval(0.04, None, 0.01, false), 1.0);
    }

    #[test]
    fn linear_positions_cover_range_on_interval_multiples() {
        let positions = linear_tick_positions(5.0, 3.0, 21.0);
        assert_eq!(positions, vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0]);
    }

    #[test]
    fn linear_positions_survive_degenerate_interval() {
        assert_eq!(linear_tick_positions(0.0, 4.0, 4.0), vec![4.0]);
        assert_eq!(linear_tick_positions(1.0, 4.0, 4.0), vec![4.0]);
    }
}
