use crate::{
    foundation::{
        core::{Canvas, FrameIndex},
        error::{ScrubError, ScrubResult},
    },
    frames::store::FrameStore,
    render::surface::DrawSurface,
};

/// What is currently on the surface. `current_frame == None` means nothing painted yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderState {
    /// Index of the frame last painted.
    pub current_frame: Option<FrameIndex>,
    /// Surface size at the last paint or resize.
    pub canvas: Canvas,
}

/// Paints frames from a [`FrameStore`] onto a [`DrawSurface`], skipping redundant repaints.
#[derive(Debug)]
pub struct CanvasRenderer<S> {
    surface: S,
    state: RenderState,
    initialized: bool,
    paints: u64,
}

impl<S: DrawSurface> CanvasRenderer<S> {
    /// Wrap a surface. Nothing can be painted until [`CanvasRenderer::initialize`].
    pub fn new(surface: S) -> Self {
        let canvas = surface.canvas();
        Self {
            surface,
            state: RenderState {
                current_frame: None,
                canvas,
            },
            initialized: false,
            paints: 0,
        }
    }

    /// Size the surface to the frames of `store`.
    ///
    /// Fails with [`ScrubError::NotReady`] while the store has no frame available.
    pub fn initialize(&mut self, store: &FrameStore) -> ScrubResult<()> {
        let canvas = match store.frame_canvas() {
            Some(canvas) if store.is_ready() => canvas,
            _ => {
                return Err(ScrubError::not_ready(
                    "renderer initialized before any frame is available",
                ));
            }
        };
        self.surface.resize(canvas)?;
        self.surface.clear();
        self.state = RenderState {
            current_frame: None,
            canvas,
        };
        self.initialized = true;
        Ok(())
    }

    /// Paint frame `index` unless it is already on the surface.
    ///
    /// Returns `true` when a paint happened.
    pub fn render_frame(&mut self, index: FrameIndex, store: &FrameStore) -> ScrubResult<bool> {
        if !self.initialized {
            return Err(ScrubError::not_ready("renderer is not initialized"));
        }
        if self.state.current_frame == Some(index) {
            return Ok(false);
        }
        self.paint(index, store)?;
        Ok(true)
    }

    /// Resize the surface and repaint the last frame at the new size.
    ///
    /// Returns `true` when a repaint happened; nothing is painted before the first frame.
    pub fn on_resize(&mut self, canvas: Canvas, store: &FrameStore) -> ScrubResult<bool> {
        self.surface.resize(canvas)?;
        self.state.canvas = canvas;
        match self.state.current_frame {
            Some(index) if self.initialized => {
                self.paint(index, store)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Current render state.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Total number of paints performed.
    pub fn paint_count(&self) -> u64 {
        self.paints
    }

    /// Borrow the surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Give the surface back.
    pub fn into_surface(self) -> S {
        self.surface
    }

    fn paint(&mut self, index: FrameIndex, store: &FrameStore) -> ScrubResult<()> {
        let frame = store.get(index)?;
        self.surface.clear();
        self.surface.draw_frame(&frame)?;
        self.state.current_frame = Some(index);
        self.state.canvas = self.surface.canvas();
        self.paints += 1;
        tracing::trace!(frame = index.0, "painted frame");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
