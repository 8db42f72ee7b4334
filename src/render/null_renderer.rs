use crate::error::DashboardResult;
use crate::render::{DashboardFrame, Renderer};

/// No-op renderer used by tests and headless runs.
///
/// It still validates every frame so tests catch inconsistent panels before
/// a real widget backend sees them.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_generation: u64,
    pub last_panel_count: usize,
    pub last_row_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &DashboardFrame) -> DashboardResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_generation = frame.generation;
        self.last_panel_count = frame.panels.len();
        self.last_row_count = frame
            .panels
            .first()
            .map_or(0, |panel| panel.factors.len());
        Ok(())
    }
}
