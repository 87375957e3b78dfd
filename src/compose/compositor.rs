use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::decode::{DecodedImage, decode_image, premul_rgba8_to_rgb8};
use crate::assets::text::TextLayoutEngine;
use crate::compose::wrap::wrap_words;
use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{GnxError, GnxResult};

/// JPEG quality on the encoder's 1-100 scale (0.9 of maximum).
pub const JPEG_QUALITY: u8 = 90;

/// Proportions of the caption relative to the surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionStyle {
    /// Font size as a fraction of surface width.
    pub font_scale: f32,
    /// Maximum line width as a fraction of surface width.
    pub wrap_ratio: f32,
    /// Line height as a multiple of font size.
    pub line_spacing: f32,
    pub color: Rgba8,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_scale: 0.04,
            wrap_ratio: 0.9,
            line_spacing: 1.5,
            color: Rgba8::BLACK,
        }
    }
}

/// One wrapped caption line, anchored at its horizontal center on the alphabetic baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionLine {
    pub text: String,
    pub anchor: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaptionLayout {
    pub font_size_px: f32,
    pub line_height_px: f32,
    pub lines: Vec<CaptionLine>,
}

/// Place a caption on `canvas`.
///
/// The block reserves `lines + 1` line heights above the bottom edge, so the last baseline sits
/// two line heights up.
pub fn layout_caption<F>(
    canvas: Canvas,
    caption: &str,
    style: &CaptionStyle,
    mut measure: F,
) -> GnxResult<CaptionLayout>
where
    F: FnMut(&str, f32) -> GnxResult<f32>,
{
    let width = canvas.width as f32;
    let height = canvas.height as f32;
    let font_size_px = width * style.font_scale;
    let line_height_px = font_size_px * style.line_spacing;

    let texts = wrap_words(caption, width * style.wrap_ratio, |s| {
        measure(s, font_size_px)
    })?;
    let top = height - (texts.len() as f32 + 1.0) * line_height_px;
    let lines = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| CaptionLine {
            text,
            anchor: Point::new(
                f64::from(width) / 2.0,
                f64::from(top + i as f32 * line_height_px),
            ),
        })
        .collect();

    Ok(CaptionLayout {
        font_size_px,
        line_height_px,
        lines,
    })
}

/// Encoded export of one composition.
#[derive(Clone, Debug)]
pub struct RenderedImage {
    pub canvas: Canvas,
    pub jpeg: Vec<u8>,
}

impl RenderedImage {
    pub const CONTENT_TYPE: &'static str = "image/jpeg";
}

/// Draws a caption over source artwork and serializes the result as JPEG.
pub struct Compositor {
    text: TextLayoutEngine,
    style: CaptionStyle,
    quality: u8,
}

impl Compositor {
    pub fn new(font_bytes: Vec<u8>) -> Self {
        Self {
            text: TextLayoutEngine::new(font_bytes),
            style: CaptionStyle::default(),
            quality: JPEG_QUALITY,
        }
    }

    pub fn with_style(mut self, style: CaptionStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn font_bytes(&self) -> &[u8] {
        self.text.font_bytes()
    }

    /// Decode `source`, draw it at native size, overlay `caption`, and encode.
    #[tracing::instrument(skip(self, source), fields(source_len = source.len()))]
    pub fn compose(&mut self, source: &[u8], caption: &str) -> GnxResult<RenderedImage> {
        let image = decode_image(source)?;
        let canvas = image.canvas;
        let layout = {
            let text = &mut self.text;
            layout_caption(canvas, caption, &self.style, |s, size| text.measure(s, size))?
        };
        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            lines = layout.lines.len(),
            "caption laid out"
        );

        let pixels = self.rasterize(&image, &layout)?;
        let jpeg = encode_jpeg(&pixels, canvas, self.quality)?;
        Ok(RenderedImage { canvas, jpeg })
    }

    fn rasterize(&mut self, image: &DecodedImage, layout: &CaptionLayout) -> GnxResult<Vec<u8>> {
        let canvas = image.canvas;
        let (w, h) = (canvas.width_u16(), canvas.height_u16());
        let mut ctx = vello_cpu::RenderContext::new(w, h);

        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, canvas)?;
        ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(canvas.width),
            f64::from(canvas.height),
        ));

        if !layout.lines.is_empty() {
            let font = vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(self.text.font_bytes().to_vec()),
                0,
            );
            let c = self.style.color;
            for line in &layout.lines {
                let shaped = self.text.layout_line(&line.text, layout.font_size_px, c)?;
                let first_baseline = shaped
                    .lines()
                    .next()
                    .map(|l| l.metrics().baseline)
                    .unwrap_or(0.0);
                let x0 = line.anchor.x - f64::from(shaped.width()) / 2.0;
                let y0 = line.anchor.y - f64::from(first_baseline);
                ctx.set_transform(vello_cpu::kurbo::Affine::translate((x0, y0)));

                for parley_line in shaped.lines() {
                    for item in parley_line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let brush = run.style().brush;
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                            brush.r, brush.g, brush.b, brush.a,
                        ));
                        let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(&font)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
            }
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        }

        let mut target = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut target);
        Ok(premul_rgba8_to_rgb8(target.data_as_u8_slice()))
    }
}

fn encode_jpeg(rgb: &[u8], canvas: Canvas, quality: u8) -> GnxResult<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
    encoder
        .encode(
            rgb,
            canvas.width,
            canvas.height,
            image::ExtendedColorType::Rgb8,
        )
        .context("encode jpeg")?;
    Ok(out)
}

fn pixmap_from_premul_bytes(bytes: &[u8], canvas: Canvas) -> GnxResult<vello_cpu::Pixmap> {
    if bytes.len()
        != (canvas.width as usize)
            .saturating_mul(canvas.height as usize)
            .saturating_mul(4)
    {
        return Err(GnxError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        canvas.width_u16(),
        canvas.height_u16(),
        true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
