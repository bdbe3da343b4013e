use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Outer chart size in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Plot rectangle inside the chart, supplied by the layout phase.
///
/// Horizontal axes take `left`/`width` as their origin and length, vertical
/// axes take `top`/`height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Plot area filling the viewport minus uniform margins.
    #[must_use]
    pub fn inset(viewport: Viewport, margin: f64) -> Self {
        Self::new(
            margin,
            margin,
            (f64::from(viewport.width) - 2.0 * margin).max(1.0),
            (f64::from(viewport.height) - 2.0 * margin).max(1.0),
        )
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    pub fn validate(self) -> ChartResult<Self> {
        let finite = [self.left, self.top, self.width, self.height]
            .iter()
            .all(|value| value.is_finite());
        if !finite || self.width <= 0.0 || self.height <= 0.0 {
            return Err(ChartError::InvalidLayout {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}
