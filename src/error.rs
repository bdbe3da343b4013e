use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::axis::AxisId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid layout: width={width}, height={height}")]
    InvalidLayout { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown axis: {0}")]
    UnknownAxis(AxisId),

    #[error("unknown plot band or line: {0}")]
    UnknownPlotBandOrLine(String),

    #[error("invalid axis options: {0}")]
    InvalidOptions(String),
}

/// Non-fatal problem found during a scale pass.
///
/// The axis always finishes the pass in a renderable state; diagnostics only
/// describe what was ignored or replaced on the way.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum Diagnostic {
    #[error("logarithmic axis {axis} ignored non-positive value {value}")]
    NonPositiveLogValue { axis: AxisId, value: f64 },

    #[error("axis {axis} cannot link to axis {parent} of a different type")]
    LinkedAxisKindMismatch { axis: AxisId, parent: AxisId },

    #[error("axis {axis} links to missing axis {parent}")]
    LinkedAxisMissing { axis: AxisId, parent: AxisId },

    #[error("axis {axis} would generate {ratio:.0} ticks; generation aborted")]
    TooManyTicks { axis: AxisId, ratio: f64 },
}

impl Diagnostic {
    /// Stable numeric code for hosts that match on diagnostics.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::NonPositiveLogValue { .. } => 10,
            Self::LinkedAxisKindMismatch { .. } => 11,
            Self::LinkedAxisMissing { .. } => 18,
            Self::TooManyTicks { .. } => 19,
        }
    }

    #[must_use]
    pub fn axis(&self) -> AxisId {
        match self {
            Self::NonPositiveLogValue { axis, .. }
            | Self::LinkedAxisKindMismatch { axis, .. }
            | Self::LinkedAxisMissing { axis, .. }
            | Self::TooManyTicks { axis, .. } => *axis,
        }
    }
}
