use std::sync::Arc;

use crate::{
    BannerError, BannerResult,
    assets::{MAX_WATERMARK_BYTES, SourceImage, WatermarkImage},
    foundation::math::premultiply_rgba8_in_place,
};

/// Decode encoded image bytes and convert to premultiplied RGBA8.
#[tracing::instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8]) -> BannerResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| BannerError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(BannerError::decode("decoded image has no pixels"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(SourceImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> BannerResult<Arc<usvg::Tree>> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| BannerError::decode(format!("parse svg tree: {e}")))?;
    let size = tree.size();
    if size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(BannerError::decode("svg has an empty viewport"));
    }
    Ok(Arc::new(tree))
}

/// Decode an uploaded watermark: SVG documents become vector watermarks, everything else goes
/// through the raster decoder.
pub fn decode_watermark(bytes: &[u8]) -> BannerResult<WatermarkImage> {
    if bytes.len() > MAX_WATERMARK_BYTES {
        return Err(BannerError::decode(format!(
            "watermark image is {} bytes, limit is {MAX_WATERMARK_BYTES}",
            bytes.len()
        )));
    }
    if looks_like_svg(bytes) {
        return parse_svg(bytes).map(WatermarkImage::Svg);
    }
    decode_image(bytes).map(WatermarkImage::Raster)
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
