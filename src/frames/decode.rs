use std::sync::Arc;

use anyhow::Context;

use crate::{
    foundation::{error::ScrubResult, math::premultiply_rgba8_in_place},
    frames::frame::RasterFrame,
};

/// Decode encoded image bytes (JPEG, PNG, ...) and convert to premultiplied RGBA8.
pub fn decode_frame(bytes: &[u8]) -> ScrubResult<RasterFrame> {
    let dyn_img = image::load_from_memory(bytes).context("decode frame image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(RasterFrame {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/frames/decode.rs"]
mod tests;
