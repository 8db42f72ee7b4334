use std::io::Write;

use tracing::trace;

use crate::error::{DashboardError, DashboardResult};
use crate::render::{DashboardFrame, Renderer};

/// Writes each committed frame as one JSON line.
///
/// Lets an out-of-process widget layer follow the dashboard through a pipe.
#[derive(Debug)]
pub struct JsonLinesRenderer<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesRenderer<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, frame: &DashboardFrame) -> DashboardResult<()> {
        frame.validate()?;
        serde_json::to_writer(&mut self.writer, frame)
            .map_err(|e| DashboardError::Render(format!("failed to encode frame: {e}")))?;
        self.writer
            .write_all(b"\n")
            .and_then(|()| self.writer.flush())
            .map_err(|e| DashboardError::Render(format!("failed to write frame: {e}")))?;
        trace!(generation = frame.generation, "wrote frame line");
        Ok(())
    }
}
