use crate::{
    foundation::{
        core::{Canvas, FrameIndex},
        error::ScrubResult,
    },
    frames::frame::RasterFrame,
};

/// Synthesizes frames on demand instead of loading them.
///
/// Generators own whatever per-size state they need (textures, caches) and rebuild it in
/// [`FrameGenerator::resize`].
pub trait FrameGenerator: Send + Sync {
    /// Size of the frames currently produced.
    fn canvas(&self) -> Canvas;

    /// Switch to a new output size.
    fn resize(&mut self, canvas: Canvas) -> ScrubResult<()>;

    /// Render frame `index` of a `frame_count`-long sequence at the current size.
    fn generate(&self, index: FrameIndex, frame_count: u64) -> ScrubResult<RasterFrame>;
}

/// Normalized position of `index` in a `frame_count`-long sequence: first frame `0`, last `1`.
pub fn index_progress(index: FrameIndex, frame_count: u64) -> f64 {
    if frame_count <= 1 {
        return 0.0;
    }
    let last = (frame_count - 1) as f64;
    (index.0 as f64 / last).clamp(0.0, 1.0)
}
