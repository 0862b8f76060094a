use std::sync::Arc;

use crate::{
    foundation::{
        core::{Affine, Canvas, Rect},
        error::{ScrubError, ScrubResult},
    },
    frames::frame::RasterFrame,
};

pub(crate) fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

pub(crate) fn new_pixmap(canvas: Canvas) -> ScrubResult<vello_cpu::Pixmap> {
    let (w, h) = canvas.to_u16()?;
    Ok(vello_cpu::Pixmap::new(w, h))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn color(rgba: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ScrubResult<vello_cpu::Pixmap> {
    let (w, h) = Canvas { width, height }.to_u16()?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ScrubError::render("frame byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Image paint sampling `frame` in its own pixel space.
pub(crate) fn frame_paint(frame: &RasterFrame) -> ScrubResult<vello_cpu::Image> {
    let pixmap = premul_bytes_to_pixmap(frame.rgba8_premul.as_slice(), frame.width, frame.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Fill `[0, w] x [0, h]` of `frame` through `transform` with optional opacity.
pub(crate) fn draw_frame_with(
    ctx: &mut vello_cpu::RenderContext,
    frame: &RasterFrame,
    transform: Affine,
    opacity: f32,
) -> ScrubResult<()> {
    let paint = frame_paint(frame)?;
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(frame.width),
        f64::from(frame.height),
    ));
    if opacity < 1.0 {
        ctx.pop_layer();
    }
    Ok(())
}

/// Copy a pixmap out as an owned frame.
pub(crate) fn pixmap_to_frame(pixmap: &vello_cpu::Pixmap, canvas: Canvas) -> ScrubResult<RasterFrame> {
    RasterFrame::from_premul_rgba8(
        canvas.width,
        canvas.height,
        pixmap.data_as_u8_slice().to_vec(),
    )
}
