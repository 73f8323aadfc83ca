mod frame;
mod null_renderer;

pub use frame::TimelineFrame;
pub use null_renderer::NullRenderer;

use crate::error::TimelineResult;

/// Contract implemented by any presentation layer.
///
/// Backends receive a fully materialized, deterministic `TimelineFrame` so
/// drawing code stays isolated from navigation and layout logic.
pub trait Renderer {
    fn render(&mut self, frame: &TimelineFrame) -> TimelineResult<()>;
}
