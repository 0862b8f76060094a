use std::f64::consts::PI;

use crate::{
    foundation::{
        core::{Affine, Canvas, FrameIndex, Rect, Vec2},
        error::{ScrubError, ScrubResult},
        math::clamp01,
    },
    frames::{
        frame::RasterFrame,
        generator::{FrameGenerator, index_progress},
    },
    paper::{
        fold::{FoldDirection, PaperCanvas, SegmentGeometry},
        texture::PaperTexture,
    },
};

/// Number of vertically stacked segments the page folds in.
pub const SEGMENT_COUNT: usize = 6;
/// Progress delay between consecutive segments.
pub const SEGMENT_STAGGER: f64 = 0.12;
/// Progress window over which one segment goes from flat to fully folded.
pub const SEGMENT_WINDOW: f64 = 0.25;
/// Backdrop behind the page (`#2c2416`).
pub const BACKGROUND_RGBA: [u8; 4] = [0x2c, 0x24, 0x16, 0xff];

const MAX_PAPER_WIDTH: f64 = 800.0;
const MAX_PAPER_HEIGHT: f64 = 1000.0;
const CAST_SHADOW_MIN_DEG: f64 = 20.0;

/// Local fold progress of `segment` at page progress `progress`.
pub fn segment_progress(progress: f64, segment: usize) -> f64 {
    clamp01((progress - segment as f64 * SEGMENT_STAGGER) / SEGMENT_WINDOW)
}

/// Render the whole page at `progress`: six segments folding top to bottom in a cascade.
///
/// `texture` must match `canvas`; rebuild it after a resize.
pub fn render_paper_frame(
    texture: &PaperTexture,
    progress: f64,
    canvas: Canvas,
) -> ScrubResult<RasterFrame> {
    if texture.canvas() != canvas {
        return Err(ScrubError::validation(format!(
            "paper texture is {}x{} but the canvas is {}x{}",
            texture.canvas().width,
            texture.canvas().height,
            canvas.width,
            canvas.height
        )));
    }

    let mut out = PaperCanvas::new(canvas)?;
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    out.fill_rect(Rect::new(0.0, 0.0, w, h), BACKGROUND_RGBA, 1.0);

    let (cx, cy) = (w / 2.0, h / 2.0);
    let paper_w = (w * 0.6).min(MAX_PAPER_WIDTH);
    let paper_h = (h * 0.8).min(MAX_PAPER_HEIGHT);
    let seg_h = paper_h / SEGMENT_COUNT as f64;

    for i in 0..SEGMENT_COUNT {
        let sp = segment_progress(progress, i);
        let fold_angle = sp * 180.0;
        let direction = FoldDirection::for_segment(i);
        let side = if i % 2 == 0 { 1.0 } else { -1.0 };

        let y_offset = (i as f64 - 2.5) * seg_h;
        let x_offset = (sp * PI).sin() * -30.0 * side;
        let scale = 1.0 - sp * 0.1;

        let seg_w = paper_w * scale;
        let seg_hs = seg_h * scale;
        let seg_x = cx - seg_w / 2.0 + x_offset;
        let seg_y = cy + y_offset * scale;

        let light_intensity = 0.8 + (sp * PI).cos() * 0.2;

        let rotation = match direction {
            FoldDirection::DiagonalRight => -fold_angle / 180.0 * PI * 0.3,
            FoldDirection::DiagonalLeft => fold_angle / 180.0 * PI * 0.3,
        };
        let skew = (sp * PI).sin() * 0.2 * side;
        let transform = Affine::translate((seg_x + seg_w / 2.0, seg_y + seg_hs / 2.0))
            * Affine::rotate(rotation)
            * Affine::new([1.0, skew, 0.0, 1.0, 0.0, 0.0])
            * Affine::translate((-seg_w / 2.0, -seg_hs / 2.0));

        out.render_folded_segment(
            texture,
            SegmentGeometry {
                x: 0.0,
                y: 0.0,
                width: seg_w,
                height: seg_hs,
            },
            transform,
            fold_angle,
            direction,
            light_intensity,
        )?;

        if fold_angle > CAST_SHADOW_MIN_DEG {
            let opacity = (fold_angle / 180.0 * 0.4).min(0.4) as f32;
            let under = Rect::new(seg_x, seg_y + seg_hs, seg_x + seg_w, seg_y + seg_hs + 5.0);
            out.fill_rect(under + Vec2::new(10.0, 15.0), [0, 0, 0, 77], opacity * 0.5);
            out.fill_rect(under, [0, 0, 0, 77], opacity);
        }
    }

    out.finish()
}

/// Frame generator for the paper fold: frame `i` of `n` renders progress `i / (n - 1)`.
#[derive(Clone, Debug)]
pub struct PaperFrameGenerator {
    texture: PaperTexture,
    seed: Option<u64>,
}

impl PaperFrameGenerator {
    /// Build the base texture for `canvas`.
    pub fn new(canvas: Canvas, seed: Option<u64>) -> ScrubResult<Self> {
        Ok(Self {
            texture: PaperTexture::build(canvas, seed)?,
            seed,
        })
    }

    /// Current base texture.
    pub fn texture(&self) -> &PaperTexture {
        &self.texture
    }

    /// Render an arbitrary progress value at the current size.
    pub fn render_progress(&self, progress: f64) -> ScrubResult<RasterFrame> {
        render_paper_frame(&self.texture, progress, self.texture.canvas())
    }
}

impl FrameGenerator for PaperFrameGenerator {
    fn canvas(&self) -> Canvas {
        self.texture.canvas()
    }

    fn resize(&mut self, canvas: Canvas) -> ScrubResult<()> {
        tracing::debug!(width = canvas.width, height = canvas.height, "rebuilding paper texture");
        self.texture = PaperTexture::build(canvas, self.seed)?;
        Ok(())
    }

    fn generate(&self, index: FrameIndex, frame_count: u64) -> ScrubResult<RasterFrame> {
        if !index.is_within(frame_count) {
            return Err(ScrubError::IndexOutOfRange {
                index: index.0,
                count: frame_count,
            });
        }
        self.render_progress(index_progress(index, frame_count))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paper/frame.rs"]
mod tests;
