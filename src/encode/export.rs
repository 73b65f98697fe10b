use std::io::Cursor;
use std::time::{SystemTime, UNIX_EPOCH};

use image::ImageEncoder as _;

use crate::{
    encode::{ExportFormat, ExportSpec, ExportedImage},
    foundation::core::Rgba8,
    foundation::error::{BannerError, BannerResult},
    render::{FrameRGBA, composite::flatten_over_rgb8},
};

/// `edited-banner-<unix-millis>.<ext>`.
pub fn suggested_filename(format: ExportFormat, unix_millis: u128) -> String {
    format!("edited-banner-{unix_millis}.{}", format.extension())
}

/// Map `[0, 1]` quality onto the jpeg encoder's 1..=100 scale.
pub fn jpeg_quality(quality: f64) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Map `[0, 1]` quality onto libwebp's lossy 0..=100 scale.
///
/// `None` at full quality, which is encoded losslessly.
pub fn webp_quality(quality: f64) -> Option<f32> {
    let q = quality.clamp(0.0, 1.0);
    (q < 1.0).then(|| (q * 100.0) as f32)
}

/// Serialize `frame` as `spec.format`.
#[tracing::instrument(
    level = "debug",
    skip(frame, jpeg_background),
    fields(width = frame.width, height = frame.height)
)]
pub fn encode_frame(
    frame: &FrameRGBA,
    spec: &ExportSpec,
    jpeg_background: Rgba8,
) -> BannerResult<ExportedImage> {
    if frame.is_empty() {
        return Err(BannerError::encoding("cannot encode an empty frame"));
    }
    if frame.data.len() != crate::render::frame_len(frame.width, frame.height)? {
        return Err(BannerError::encoding(
            "frame.data size mismatch with width*height*4",
        ));
    }
    if !spec.quality.is_finite() {
        return Err(BannerError::encoding("export quality must be finite"));
    }
    let quality = spec.quality.clamp(0.0, 1.0);
    let (width, height) = (frame.width, frame.height);

    let mut bytes = Vec::new();
    match spec.format {
        ExportFormat::Png => {
            let rgba = frame.to_straight_rgba8();
            image::codecs::png::PngEncoder::new(Cursor::new(&mut bytes))
                .write_image(&rgba, width, height, image::ExtendedColorType::Rgba8)
                .map_err(|e| BannerError::encoding(format!("failed to encode png: {e}")))?;
        }
        ExportFormat::Jpeg => {
            let premul = if frame.premultiplied {
                frame.data.clone()
            } else {
                let mut data = frame.data.clone();
                crate::foundation::math::premultiply_rgba8_in_place(&mut data);
                data
            };
            let bg = jpeg_background;
            let rgb = flatten_over_rgb8(&premul, [bg.r, bg.g, bg.b]);
            image::codecs::jpeg::JpegEncoder::new_with_quality(
                Cursor::new(&mut bytes),
                jpeg_quality(quality),
            )
            .write_image(&rgb, width, height, image::ExtendedColorType::Rgb8)
            .map_err(|e| BannerError::encoding(format!("failed to encode jpeg: {e}")))?;
        }
        ExportFormat::Webp => {
            let rgba = frame.to_straight_rgba8();
            match webp_quality(quality) {
                Some(q) => {
                    let encoded = webp::Encoder::from_rgba(&rgba, width, height)
                        .encode_simple(false, q)
                        .map_err(|e| {
                            BannerError::encoding(format!("failed to encode webp: {e:?}"))
                        })?;
                    bytes.extend_from_slice(&encoded);
                }
                None => {
                    image::codecs::webp::WebPEncoder::new_lossless(Cursor::new(&mut bytes))
                        .write_image(&rgba, width, height, image::ExtendedColorType::Rgba8)
                        .map_err(|e| {
                            BannerError::encoding(format!("failed to encode webp: {e}"))
                        })?;
                }
            }
        }
    }

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    tracing::debug!(format = %spec.format, bytes = bytes.len(), quality, "encoded frame");
    Ok(ExportedImage {
        bytes,
        format: spec.format,
        width,
        height,
        filename: suggested_filename(spec.format, millis),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
