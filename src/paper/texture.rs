use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    foundation::{
        core::Canvas,
        error::ScrubResult,
        math::blend_channel,
    },
    frames::frame::RasterFrame,
};

/// Base paper colour (`#f5f5dc`).
pub const PAPER_RGB: [u8; 3] = [0xf5, 0xf5, 0xdc];

/// Peak-to-peak fiber noise added to each pixel (`±5`).
const NOISE_SPAN: f64 = 10.0;
const GRAIN_STROKES: usize = 100;
const GRAIN_ALPHA: f64 = 0.02;
const GRAIN_WIDTH: f64 = 0.5;

/// Opaque paper fiber texture sized to one canvas.
///
/// The texture is tied to its pixel dimensions; a resized canvas needs a new texture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaperTexture {
    canvas: Canvas,
    rgba8: Arc<Vec<u8>>,
}

impl PaperTexture {
    /// Build a texture. With `seed` the grain is reproducible, otherwise it is drawn from entropy.
    pub fn build(canvas: Canvas, seed: Option<u64>) -> ScrubResult<Self> {
        match seed {
            Some(seed) => Self::build_with(canvas, &mut StdRng::seed_from_u64(seed)),
            None => Self::build_with(canvas, &mut StdRng::from_entropy()),
        }
    }

    /// Build a texture drawing randomness from `rng`.
    #[tracing::instrument(skip(rng))]
    pub fn build_with<R: Rng + ?Sized>(canvas: Canvas, rng: &mut R) -> ScrubResult<Self> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        let [r, g, b] = PAPER_RGB;
        let mut data = Vec::with_capacity(canvas.rgba8_len());
        for _ in 0..(canvas.width as usize * canvas.height as usize) {
            let noise = (rng.r#gen::<f64>() - 0.5) * NOISE_SPAN;
            let add = |c: u8| (f64::from(c) + noise).round().clamp(0.0, 255.0) as u8;
            data.extend_from_slice(&[add(r), add(g), add(b), 255]);
        }

        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        for _ in 0..GRAIN_STROKES {
            let from = (rng.gen_range(0.0..w), rng.gen_range(0.0..h));
            let to = (rng.gen_range(0.0..w), rng.gen_range(0.0..h));
            stroke_grain(&mut data, canvas, from, to);
        }

        Ok(Self {
            canvas,
            rgba8: Arc::new(data),
        })
    }

    /// Texture size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// RGB at integer pixel `(x, y)`, clamped to the texture bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.canvas.width - 1) as usize;
        let y = y.min(self.canvas.height - 1) as usize;
        let i = (y * self.canvas.width as usize + x) * 4;
        [self.rgba8[i], self.rgba8[i + 1], self.rgba8[i + 2]]
    }

    /// Nearest-neighbour sample at normalized `(u, v)` in `[0, 1]`.
    pub fn sample(&self, u: f64, v: f64) -> [u8; 3] {
        let x = (u.clamp(0.0, 1.0) * f64::from(self.canvas.width)).floor() as u32;
        let y = (v.clamp(0.0, 1.0) * f64::from(self.canvas.height)).floor() as u32;
        self.pixel(x, y)
    }

    /// The texture as an opaque frame.
    pub fn to_frame(&self) -> RasterFrame {
        RasterFrame {
            width: self.canvas.width,
            height: self.canvas.height,
            rgba8_premul: Arc::clone(&self.rgba8),
        }
    }
}

fn stroke_grain(data: &mut [u8], canvas: Canvas, from: (f64, f64), to: (f64, f64)) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
    let alpha = GRAIN_ALPHA * GRAIN_WIDTH;
    for s in 0..=steps {
        let t = s as f64 / steps as f64;
        let x = (from.0 + dx * t).floor();
        let y = (from.1 + dy * t).floor();
        if x < 0.0 || y < 0.0 || x >= f64::from(canvas.width) || y >= f64::from(canvas.height) {
            continue;
        }
        let i = (y as usize * canvas.width as usize + x as usize) * 4;
        for c in &mut data[i..i + 3] {
            *c = blend_channel(*c, 0, alpha);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paper/texture.rs"]
mod tests;
