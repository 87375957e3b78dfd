use std::borrow::Cow;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{GnxError, GnxResult};

/// Stateful helper for building Parley layouts from one caption font.
///
/// The font is registered on first use and the family name cached, so repeated measurements
/// during word wrap do not re-register the face.
pub struct TextLayoutEngine {
    font_bytes: Vec<u8>,
    family_name: Option<String>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
}

impl TextLayoutEngine {
    pub fn new(font_bytes: Vec<u8>) -> Self {
        Self {
            font_bytes,
            family_name: None,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    pub fn font_bytes(&self) -> &[u8] {
        &self.font_bytes
    }

    fn family(&mut self) -> GnxResult<String> {
        if let Some(name) = &self.family_name {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(self.font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| GnxError::render("no font families registered from font bytes"))?;

        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GnxError::render("registered font family has no name"))?
            .to_string();
        self.family_name = Some(name.clone());
        Ok(name)
    }

    /// Shape `text` as a single unbroken line.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: Rgba8,
    ) -> GnxResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(GnxError::validation("font size must be finite and > 0"));
        }
        let family_name = self.family()?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Advance width of `text` at `size_px`, in pixels.
    pub fn measure(&mut self, text: &str, size_px: f32) -> GnxResult<f32> {
        Ok(self.layout_line(text, size_px, Rgba8::BLACK)?.width())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
