use crate::error::TimelineResult;
use crate::render::{Renderer, TimelineFrame};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests catch out-of-grid geometry
/// before a real presentation layer is attached.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_row_count: usize,
    pub last_block_count: usize,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &TimelineFrame) -> TimelineResult<()> {
        frame.validate()?;
        self.last_row_count = frame.rows.len();
        self.last_block_count = frame.block_count();
        self.frames_rendered += 1;
        Ok(())
    }
}
