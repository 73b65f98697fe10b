use std::sync::Arc;

pub(crate) mod decode;
pub(crate) mod fonts;
pub(crate) mod svg_raster;

/// Largest watermark upload accepted by the decoder (5 MiB).
pub const MAX_WATERMARK_BYTES: usize = 5 * 1024 * 1024;

/// Decoded raster image: premultiplied RGBA8, row-major, tightly packed.
///
/// Pixels are shared behind an `Arc`; the image is immutable once decoded.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decoded watermark artwork.
#[derive(Clone, Debug)]
pub enum WatermarkImage {
    /// Bitmap watermark (png, jpeg, webp, ...).
    Raster(SourceImage),
    /// Vector watermark, rasterized at its final size when drawn.
    Svg(Arc<usvg::Tree>),
}

impl WatermarkImage {
    /// Intrinsic size in pixels.
    pub fn size(&self) -> (f64, f64) {
        match self {
            Self::Raster(img) => (f64::from(img.width), f64::from(img.height)),
            Self::Svg(tree) => (
                f64::from(tree.size().width()),
                f64::from(tree.size().height()),
            ),
        }
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        let (w, h) = self.size();
        w / h
    }
}
