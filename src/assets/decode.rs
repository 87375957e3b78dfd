use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::GnxResult;

/// Decoded source artwork in premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub canvas: Canvas,
    /// Row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
}

/// Decode encoded image bytes (JPEG or PNG) and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> GnxResult<DecodedImage> {
    let rgba = image::load_from_memory(bytes)
        .context("decode source artwork")?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    let canvas = Canvas::new(width, height)?;

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        canvas,
        rgba8_premul,
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let alpha = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = scale_by_alpha(*c, alpha);
        }
    }
}

/// `channel * alpha / 255`, rounded to nearest.
fn scale_by_alpha(channel: u8, alpha: u16) -> u8 {
    ((u16::from(channel) * alpha + 127) / 255) as u8
}

/// Flatten premultiplied RGBA8 to RGB8 as if composited over black.
///
/// Premultiplied color channels already equal the over-black result, so alpha is dropped.
pub(crate) fn premul_rgba8_to_rgb8(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        out.extend_from_slice(&px[..3]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
