mod frame;
mod json_lines;
mod null_renderer;
mod primitives;

pub use frame::{DashboardFrame, PANEL_TOOLS, PanelFrame, PanelTool, SeriesFrame};
pub use json_lines::JsonLinesRenderer;
pub use null_renderer::NullRenderer;
pub use primitives::Color;

use crate::error::DashboardResult;

/// Contract implemented by any chart widget backend.
///
/// Backends receive one fully materialized `DashboardFrame` per commit, so
/// they never observe a half-applied refresh.
pub trait Renderer {
    fn render(&mut self, frame: &DashboardFrame) -> DashboardResult<()>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, frame: &DashboardFrame) -> DashboardResult<()> {
        (**self).render(frame)
    }
}
