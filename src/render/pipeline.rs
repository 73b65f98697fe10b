use std::path::PathBuf;
use std::time::Instant;

use crate::{
    assets::{SourceImage, fonts::FontBook},
    color::filter::apply_color_filter,
    foundation::core::Rgba8,
    foundation::error::{BannerError, BannerResult},
    geometry::crop::{CropRegion, REFERENCE_PREVIEW_WIDTH},
    render::{FrameRGBA, overlay::composite_overlays},
    session::snapshot::EditSnapshot,
};

/// Knobs shared by rendering and encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOpts {
    /// Preview width that pixel-unit parameters are expressed against.
    pub reference_width: f64,
    /// Opaque background that jpeg output is flattened onto.
    pub jpeg_background: Rgba8,
    /// Extra directory of `.ttf`/`.otf`/`.ttc` files to load next to system fonts.
    pub font_dir: Option<PathBuf>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            reference_width: REFERENCE_PREVIEW_WIDTH,
            jpeg_background: Rgba8::BLACK,
            font_dir: None,
        }
    }
}

impl RenderOpts {
    /// Defaults overridden by `BANNERKIT_REFERENCE_WIDTH`, `BANNERKIT_JPEG_BACKGROUND` and
    /// `BANNERKIT_FONT_DIR`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let reference_width = std::env::var("BANNERKIT_REFERENCE_WIDTH")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(defaults.reference_width);
        let jpeg_background = std::env::var("BANNERKIT_JPEG_BACKGROUND")
            .ok()
            .and_then(|v| Rgba8::parse(&v).ok())
            .map(|c| Rgba8 { a: 255, ..c })
            .unwrap_or(defaults.jpeg_background);
        let font_dir = std::env::var_os("BANNERKIT_FONT_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self {
            reference_width,
            jpeg_background,
            font_dir,
        }
    }

    /// System fonts plus anything in `font_dir`.
    pub fn font_book(&self) -> FontBook {
        let mut fonts = FontBook::system();
        if let Some(dir) = &self.font_dir {
            fonts.load_dir(dir);
        }
        fonts
    }
}

/// Copy the crop region out of `source` into a new frame at crop dimensions.
pub fn crop_source(source: &SourceImage, region: &CropRegion) -> BannerResult<FrameRGBA> {
    let rect = region.to_pixels(source.width, source.height)?;
    let src_row = (source.width as usize) * 4;
    let row = (rect.width as usize) * 4;
    if source.rgba8_premul.len() != src_row * source.height as usize {
        return Err(BannerError::render("source byte length mismatch"));
    }

    let mut data = Vec::with_capacity(row * rect.height as usize);
    for y in rect.y..rect.y + rect.height {
        let start = (y as usize) * src_row + (rect.x as usize) * 4;
        data.extend_from_slice(&source.rgba8_premul[start..start + row]);
    }
    Ok(FrameRGBA {
        width: rect.width,
        height: rect.height,
        data,
        premultiplied: true,
    })
}

/// Run crop, color filter and overlays for one export.
///
/// The crop is validated before anything is drawn.
#[tracing::instrument(
    level = "debug",
    skip(source, snapshot, fonts, opts),
    fields(source_w = source.width, source_h = source.height)
)]
pub fn render_edit(
    source: &SourceImage,
    snapshot: &EditSnapshot,
    fonts: &FontBook,
    opts: &RenderOpts,
) -> BannerResult<FrameRGBA> {
    let region = snapshot
        .crop
        .ok_or_else(|| BannerError::invalid_crop("no crop region set"))?;
    region.validate(source.width, source.height)?;

    let t0 = Instant::now();
    let base = crop_source(source, &region)?;
    let filtered = apply_color_filter(&base, &snapshot.color);
    let out = if snapshot.has_overlays() {
        composite_overlays(
            &filtered,
            snapshot.text.as_ref(),
            &snapshot.watermark,
            fonts,
            opts.reference_width,
        )?
    } else {
        filtered
    };
    tracing::debug!(
        width = out.width,
        height = out.height,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "rendered edit"
    );
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
