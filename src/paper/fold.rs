use crate::{
    foundation::{
        core::{Affine, Canvas, Rect},
        error::ScrubResult,
        math::{blend_channel, clamp01},
    },
    frames::frame::RasterFrame,
    paper::texture::{PAPER_RGB, PaperTexture},
    render::cpu,
};

/// Crease line drawn once the fold passes this angle.
pub const CREASE_MIN_DEG: f64 = 5.0;
/// Fold shadow drawn once the fold passes this angle.
pub const SHADOW_MIN_DEG: f64 = 10.0;

const CREASE_ALPHA: f64 = 0.1;
const CREASE_HALF_WIDTH: f64 = 1.0;
const EDGE_HIGHLIGHT_ALPHA: f64 = 0.3;

/// Orientation of a segment's crease.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FoldDirection {
    /// Crease from top-right to bottom-left.
    DiagonalLeft,
    /// Crease from top-left to bottom-right.
    DiagonalRight,
}

impl FoldDirection {
    /// Segments alternate right, left, right, ... from the top.
    pub fn for_segment(segment: usize) -> Self {
        if segment % 2 == 0 {
            Self::DiagonalRight
        } else {
            Self::DiagonalLeft
        }
    }
}

/// Rectangle a segment occupies in its local (pre-transform) space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentGeometry {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Light and shade of one fold angle.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FoldShading {
    base_light: f64,
    shadow_strength: f64,
}

impl FoldShading {
    fn new(fold_angle_deg: f64, light_intensity: f64) -> Self {
        Self {
            base_light: 0.7 + light_intensity * 0.3,
            shadow_strength: fold_angle_deg.to_radians().sin() * 0.4,
        }
    }

    /// Alpha of the paper-coloured multiply gradient at position `t` along it.
    fn light_alpha(self, t: f64) -> f64 {
        let mid = self.base_light - self.shadow_strength * 0.3;
        let end = self.base_light - self.shadow_strength;
        let a = if t <= 0.5 {
            self.base_light + (mid - self.base_light) * (t / 0.5)
        } else {
            mid + (end - mid) * ((t - 0.5) / 0.5)
        };
        clamp01(a)
    }
}

/// Bitmap of one folded segment: texture, fold lighting, crease, fold shadow and edge highlight.
///
/// `fold_angle_deg` runs from `0` (flat) to `180` (fully folded).
pub fn fold_segment_pixels(
    texture: &PaperTexture,
    width: u32,
    height: u32,
    fold_angle_deg: f64,
    direction: FoldDirection,
    light_intensity: f64,
) -> ScrubResult<RasterFrame> {
    let canvas = Canvas::new(width, height)?;
    let (w, h) = (f64::from(width), f64::from(height));
    let shading = FoldShading::new(fold_angle_deg, light_intensity);

    let grad = (w * fold_angle_deg.to_radians().cos(), h);
    let grad_len2 = grad.0 * grad.0 + grad.1 * grad.1;

    let (c0, c1) = match direction {
        FoldDirection::DiagonalRight => ((0.0, 0.0), (w, h)),
        FoldDirection::DiagonalLeft => ((w, 0.0), (0.0, h)),
    };
    let crease = (c1.0 - c0.0, c1.1 - c0.1);
    let crease_len = (crease.0 * crease.0 + crease.1 * crease.1).sqrt();

    let mut data = Vec::with_capacity(canvas.rgba8_len());
    for py in 0..height {
        for px in 0..width {
            let (x, y) = (f64::from(px) + 0.5, f64::from(py) + 0.5);
            let mut rgb = texture.sample(x / w, y / h);

            let t = if grad_len2 > 0.0 {
                clamp01((x * grad.0 + y * grad.1) / grad_len2)
            } else {
                0.0
            };
            let a = shading.light_alpha(t);
            for (c, light) in rgb.iter_mut().zip(PAPER_RGB) {
                let lit = f64::from(*c) * (1.0 - a + a * f64::from(light) / 255.0);
                *c = lit.round().clamp(0.0, 255.0) as u8;
            }

            if fold_angle_deg > CREASE_MIN_DEG && crease_len > 0.0 {
                let dist = ((x - c0.0) * crease.1 - (y - c0.1) * crease.0).abs() / crease_len;
                let coverage = clamp01(CREASE_HALF_WIDTH + 0.5 - dist);
                if coverage > 0.0 {
                    for c in &mut rgb {
                        *c = blend_channel(*c, 0, CREASE_ALPHA * coverage);
                    }
                }
            }

            if fold_angle_deg > SHADOW_MIN_DEG {
                let v = y / h;
                let alpha = shading.shadow_strength * 0.5 * (1.0 - (2.0 * v - 1.0).abs());
                for c in &mut rgb {
                    *c = blend_channel(*c, 0, alpha);
                }
            }

            if px == 0 || py == 0 || px + 1 == width || py + 1 == height {
                for c in &mut rgb {
                    *c = blend_channel(*c, 255, EDGE_HIGHLIGHT_ALPHA);
                }
            }

            data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
    }

    RasterFrame::from_premul_rgba8(width, height, data)
}

/// CPU compositing target for procedural paper frames.
pub struct PaperCanvas {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
}

impl std::fmt::Debug for PaperCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaperCanvas")
            .field("canvas", &self.canvas)
            .finish()
    }
}

impl PaperCanvas {
    /// Start an empty (transparent) canvas.
    pub fn new(canvas: Canvas) -> ScrubResult<Self> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        let (w, h) = canvas.to_u16()?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
        })
    }

    /// Canvas size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Fill an axis-aligned rectangle with straight-alpha `rgba` at `opacity`.
    pub fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4], opacity: f32) {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(cpu::color(rgba));
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx.fill_rect(&cpu::rect_to_cpu(rect));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
    }

    /// Composite `texture` into `geometry`, lit for `fold_angle_deg`, then place it through
    /// `transform`.
    pub fn render_folded_segment(
        &mut self,
        texture: &PaperTexture,
        geometry: SegmentGeometry,
        transform: Affine,
        fold_angle_deg: f64,
        direction: FoldDirection,
        light_intensity: f64,
    ) -> ScrubResult<()> {
        if geometry.width <= 0.0 || geometry.height <= 0.0 {
            return Ok(());
        }
        let w_px = geometry.width.ceil().max(1.0) as u32;
        let h_px = geometry.height.ceil().max(1.0) as u32;
        let pixels = fold_segment_pixels(
            texture,
            w_px,
            h_px,
            fold_angle_deg,
            direction,
            light_intensity,
        )?;

        let place = transform
            * Affine::translate((geometry.x, geometry.y))
            * Affine::scale_non_uniform(
                geometry.width / f64::from(w_px),
                geometry.height / f64::from(h_px),
            );
        cpu::draw_frame_with(&mut self.ctx, &pixels, place, 1.0)
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> ScrubResult<RasterFrame> {
        self.ctx.flush();
        let mut pixmap = cpu::new_pixmap(self.canvas)?;
        self.ctx.render_to_pixmap(&mut pixmap);
        cpu::pixmap_to_frame(&pixmap, self.canvas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paper/fold.rs"]
mod tests;
