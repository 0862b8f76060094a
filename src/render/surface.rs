use crate::{
    foundation::{
        core::{Affine, Canvas, Rgba8Premul},
        error::ScrubResult,
    },
    frames::frame::RasterFrame,
    render::cpu,
};

/// A 2D drawing surface the renderer paints into.
///
/// This is the only write path to visible pixels; hosts implement it over their own canvas.
pub trait DrawSurface {
    /// Current surface size.
    fn canvas(&self) -> Canvas;

    /// Reallocate the surface at a new size. Contents are undefined until the next paint.
    fn resize(&mut self, canvas: Canvas) -> ScrubResult<()>;

    /// Clear to the surface's background.
    fn clear(&mut self);

    /// Paint `frame` stretched over the whole surface.
    fn draw_frame(&mut self, frame: &RasterFrame) -> ScrubResult<()>;
}

/// CPU surface backed by a `vello_cpu` pixmap.
pub struct PixmapSurface {
    canvas: Canvas,
    clear_rgba: [u8; 4],
    pixmap: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("canvas", &self.canvas)
            .field("clear_rgba", &self.clear_rgba)
            .finish()
    }
}

impl PixmapSurface {
    /// Allocate a surface cleared to straight-alpha `clear_rgba`.
    pub fn new(canvas: Canvas, clear_rgba: [u8; 4]) -> ScrubResult<Self> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        let mut out = Self {
            canvas,
            clear_rgba,
            pixmap: cpu::new_pixmap(canvas)?,
            ctx: None,
        };
        out.clear();
        Ok(out)
    }

    /// Copy the current pixels out as a premultiplied frame.
    pub fn snapshot(&self) -> ScrubResult<RasterFrame> {
        cpu::pixmap_to_frame(&self.pixmap, self.canvas)
    }

    #[cfg(test)]
    fn cached_ctx_size(&self) -> Option<(u16, u16)> {
        self.ctx.as_ref().map(|c| (c.width(), c.height()))
    }
}

impl DrawSurface for PixmapSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn resize(&mut self, canvas: Canvas) -> ScrubResult<()> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        if canvas != self.canvas {
            self.pixmap = cpu::new_pixmap(canvas)?;
            self.canvas = canvas;
        }
        Ok(())
    }

    fn clear(&mut self) {
        let [r, g, b, a] = self.clear_rgba;
        cpu::clear_pixmap(
            &mut self.pixmap,
            Rgba8Premul::from_straight_rgba(r, g, b, a).to_array(),
        );
    }

    fn draw_frame(&mut self, frame: &RasterFrame) -> ScrubResult<()> {
        let (w, h) = self.canvas.to_u16()?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(cpu::color(self.clear_rgba));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));

        let scale = Affine::scale_non_uniform(
            f64::from(self.canvas.width) / f64::from(frame.width),
            f64::from(self.canvas.height) / f64::from(frame.height),
        );
        let drawn = cpu::draw_frame_with(&mut ctx, frame, scale, 1.0);
        if drawn.is_ok() {
            ctx.flush();
            ctx.render_to_pixmap(&mut self.pixmap);
        }
        self.ctx = Some(ctx);
        drawn
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
