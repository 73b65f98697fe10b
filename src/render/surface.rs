use std::sync::Arc;

use crate::{
    assets::{SourceImage, fonts::ResolvedFont},
    foundation::core::{Affine, Point, Rect, Rgba8},
    foundation::error::{BannerError, BannerResult},
    text::layout::LineLayout,
};

/// `vello_cpu` surfaces are addressed with `u16` extents.
pub(crate) fn surface_dims(width: u32, height: u32) -> BannerResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BannerError::render(format!("surface width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BannerError::render(format!("surface height {height} exceeds u16")))?;
    if w == 0 || h == 0 {
        return Err(BannerError::render("surface must be non-empty"));
    }
    Ok((w, h))
}

/// Run `draw` against a fresh transparent surface and return its premultiplied RGBA8 pixels.
pub(crate) fn render_layer(
    width: u32,
    height: u32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext) -> BannerResult<()>,
) -> BannerResult<Vec<u8>> {
    let (w, h) = surface_dims(width, height)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw(&mut ctx)?;
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn font_data(font: &ResolvedFont) -> vello_cpu::peniko::FontData {
    vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(font.data.as_ref().clone()),
        font.index,
    )
}

/// Fill the glyphs of `layout` with its top-left corner at `origin`.
///
/// `color` overrides the layout brush (used for shadows).
pub(crate) fn draw_text_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &LineLayout,
    font: &vello_cpu::peniko::FontData,
    origin: Point,
    color: Option<Rgba8>,
) {
    ctx.set_transform(affine_to_cpu(Affine::translate((origin.x, origin.y))));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = color.unwrap_or(run.style().brush);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let mut x = run.offset();
            let y = run.baseline();
            let glyphs = run.glyphs().map(|g| {
                let glyph = vello_cpu::Glyph {
                    id: g.id,
                    x: x + g.x,
                    y: y - g.y,
                };
                x += g.advance;
                glyph
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

/// Draw `image` stretched into `rect`.
pub(crate) fn draw_image_in_rect(
    ctx: &mut vello_cpu::RenderContext,
    image: &SourceImage,
    rect: Rect,
) -> BannerResult<()> {
    let pixmap =
        image_premul_bytes_to_pixmap(image.rgba8_premul.as_slice(), image.width, image.height)?;
    let (iw, ih) = (f64::from(image.width), f64::from(image.height));
    let transform = Affine::translate((rect.x0, rect.y0))
        * Affine::scale_non_uniform(rect.width() / iw, rect.height() / ih);

    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    });
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
    Ok(())
}

pub(crate) fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> BannerResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(width, height)?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(BannerError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
