use serde::{Deserialize, Serialize};

use crate::axis::{AxisExtremes, AxisId};

/// What asked for new extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtremesTrigger {
    SetExtremes,
    Zoom,
}

/// A pending extremes change, open to inspection and rewriting before it is
/// applied. `None` on either side clears the user pin on that side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremesIntent {
    pub axis: AxisId,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub trigger: ExtremesTrigger,
    cancelled: bool,
}

impl ExtremesIntent {
    #[must_use]
    pub fn new(axis: AxisId, min: Option<f64>, max: Option<f64>, trigger: ExtremesTrigger) -> Self {
        Self {
            axis,
            min,
            max,
            trigger,
            cancelled: false,
        }
    }

    /// Vetoes the change; later interceptors still see the intent.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Observer consulted, in registration order, before extremes change.
pub trait ExtremesInterceptor {
    fn id(&self) -> &str;

    /// May rewrite `intent.min`/`intent.max` or cancel it. `current` holds
    /// the axis extremes before the change.
    fn intercept(&mut self, intent: &mut ExtremesIntent, current: AxisExtremes);
}

/// How an extremes request ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtremesOutcome {
    Applied { min: Option<f64>, max: Option<f64> },
    Cancelled,
}
