use crate::{
    assets::fonts::ResolvedFont,
    foundation::core::Rgba8,
    foundation::error::{BannerError, BannerResult},
};

/// Shaped single-line text, brushed with the color it was laid out with.
pub(crate) type LineLayout = parley::Layout<Rgba8>;

/// Stateful helper for building Parley text layouts from resolved font faces.
///
/// One engine per render: the font and layout contexts are not shared between threads.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape `text` on one unbroken line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
        bold: bool,
        brush: Rgba8,
    ) -> BannerResult<LineLayout> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(BannerError::validation(
                "text size must be finite and > 0",
            ));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.data.as_ref().clone()), None);
        let mut family_name = None;
        for (id, _) in &families {
            let Some(name) = self.font_ctx.collection.family_name(*id) else {
                continue;
            };
            let exact = name.eq_ignore_ascii_case(&font.family);
            if exact || family_name.is_none() {
                family_name = Some(name.to_string());
            }
            if exact {
                break;
            }
        }
        let family_name = family_name
            .ok_or_else(|| BannerError::validation("no font families registered from font bytes"))?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        if bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: LineLayout = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Width and height of the laid-out line box in pixels.
pub(crate) fn line_box(layout: &LineLayout) -> (f64, f64) {
    (f64::from(layout.width()), f64::from(layout.height()))
}

/// Distance from the top of the line box to the visual middle of the glyphs.
///
/// The middle sits half the cap height above the first baseline. Faces without a cap height
/// use the middle of their ascent/descent box, and unreadable faces the middle of the line box.
pub(crate) fn glyph_middle(layout: &LineLayout, font: &ResolvedFont, size_px: f32) -> f64 {
    let (_, box_h) = line_box(layout);
    let Some(line) = layout.lines().next() else {
        return box_h / 2.0;
    };
    let Some(face) = parley::swash::FontRef::from_index(font.data.as_slice(), font.index as usize)
    else {
        return box_h / 2.0;
    };

    let metrics = face.metrics(&[]).scale(size_px);
    let above_baseline = if metrics.cap_height > 0.0 {
        metrics.cap_height / 2.0
    } else {
        (metrics.ascent - metrics.descent) / 2.0
    };
    f64::from(line.metrics().baseline - above_baseline)
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
