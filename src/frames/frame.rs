use std::sync::Arc;

use crate::foundation::{
    core::{Canvas, Rgba8Premul},
    error::{ScrubError, ScrubResult},
};

/// One decoded frame in premultiplied RGBA8 form.
///
/// Pixel data sits behind an [`Arc`] and is never mutated after construction, so cloning a frame
/// shares the buffer rather than copying it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl RasterFrame {
    /// Wrap an existing premultiplied buffer, checking its length.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ScrubResult<Self> {
        let canvas = Canvas::new(width, height)?;
        if rgba8_premul.len() != canvas.rgba8_len() {
            return Err(ScrubError::validation(format!(
                "frame byte length {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// A frame filled with one colour.
    pub fn solid(canvas: Canvas, color: Rgba8Premul) -> Self {
        let px = color.to_array();
        let mut data = Vec::with_capacity(canvas.rgba8_len());
        for _ in 0..(canvas.width as usize * canvas.height as usize) {
            data.extend_from_slice(&px);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            rgba8_premul: Arc::new(data),
        }
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Return `true` when both frames share the same pixel buffer allocation.
    pub fn shares_buffer(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rgba8_premul, &other.rgba8_premul)
    }
}
