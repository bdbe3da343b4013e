mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive, TextSize, crisp_line,
    estimate_text_size,
};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Axes only need two things from a backend: pixel-aligned lines and
/// measurable text. Everything else arrives as a fully materialized
/// `RenderFrame`.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;

    fn measure_text(&self, text: &str, font_size_px: f64) -> TextSize {
        estimate_text_size(text, font_size_px)
    }

    fn crisp_line(&self, line: LinePrimitive) -> LinePrimitive {
        crisp_line(line)
    }
}
