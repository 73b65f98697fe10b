use std::sync::Arc;

use crate::assets::SourceImage;
use crate::foundation::error::{BannerError, BannerResult};

// Avoid pathological allocations for absurd watermark sizes.
const MAX_DIM: u32 = 16_384;

/// Rasterize `tree` stretched to exactly `width x height` premultiplied RGBA8 pixels.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> BannerResult<SourceImage> {
    if width == 0 || height == 0 {
        return Err(BannerError::render("svg raster size must be non-zero"));
    }
    if width > MAX_DIM || height > MAX_DIM {
        return Err(BannerError::render(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| BannerError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(SourceImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}
