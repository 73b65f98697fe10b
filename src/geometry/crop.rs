use crate::foundation::core::Vec2;
use crate::foundation::error::{BannerError, BannerResult};

/// Width of the interactive preview that preview-relative quantities are expressed against.
pub const REFERENCE_PREVIEW_WIDTH: f64 = 600.0;

/// Crop box of the interactive preview, in preview pixels.
///
/// Its aspect ratio is the aspect ratio of every region the mapper produces.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropViewport {
    pub width: f64,
    pub height: f64,
}

impl Default for CropViewport {
    fn default() -> Self {
        Self::with_aspect(REFERENCE_PREVIEW_WIDTH, 4.0 / 3.0)
    }
}

impl CropViewport {
    pub fn with_aspect(width: f64, aspect: f64) -> Self {
        Self {
            width,
            height: width / aspect,
        }
    }

    pub fn aspect(self) -> f64 {
        self.width / self.height
    }

    fn validate(self) -> BannerResult<()> {
        let ok = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        if !ok {
            return Err(BannerError::invalid_crop(format!(
                "crop viewport must be finite and non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Axis-aligned crop rectangle in source-pixel units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer source rectangle actually sampled when drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Region from an explicit pixel rectangle; rejects empty or out-of-bounds rectangles.
    pub fn from_pixels(
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        source_width: u32,
        source_height: u32,
    ) -> BannerResult<Self> {
        let region = Self {
            x: f64::from(x),
            y: f64::from(y),
            width: f64::from(width),
            height: f64::from(height),
        };
        region.validate(source_width, source_height)?;
        Ok(region)
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Check `width>0`, `height>0` and containment in a `source_width x source_height` image.
    pub fn validate(&self, source_width: u32, source_height: u32) -> BannerResult<()> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(BannerError::invalid_crop("crop region must be finite"));
        }
        if source_width == 0 || source_height == 0 {
            return Err(BannerError::invalid_crop("source image is empty"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(BannerError::invalid_crop(format!(
                "crop region is empty ({}x{})",
                self.width, self.height
            )));
        }
        // Tolerate float noise from the pan clamp.
        const EPS: f64 = 1e-6;
        if self.x < -EPS
            || self.y < -EPS
            || self.x + self.width > f64::from(source_width) + EPS
            || self.y + self.height > f64::from(source_height) + EPS
        {
            return Err(BannerError::invalid_crop(format!(
                "crop region {}x{}+{}+{} exceeds source {}x{}",
                self.width, self.height, self.x, self.y, source_width, source_height
            )));
        }
        Ok(())
    }

    /// Snap to whole pixels, staying inside the source.
    pub fn to_pixels(&self, source_width: u32, source_height: u32) -> BannerResult<PixelRect> {
        self.validate(source_width, source_height)?;

        let width = (self.width.round() as u32).clamp(1, source_width);
        let height = (self.height.round() as u32).clamp(1, source_height);
        let x = (self.x.round().max(0.0) as u32).min(source_width - width);
        let y = (self.y.round().max(0.0) as u32).min(source_height - height);
        Ok(PixelRect {
            x,
            y,
            width,
            height,
        })
    }
}

/// Map preview pan/zoom state onto a source-pixel crop region.
///
/// At `zoom == 1` the result is the largest region with the viewport's aspect ratio, centered in
/// the source. Higher zoom shrinks it by `1 / zoom` around the panned center. A positive pan moves
/// the image right/down under the crop box, so the region moves left/up. Zoom below 1 is raised
/// to 1 and pan is clamped so the region never leaves the source.
#[tracing::instrument(level = "debug")]
pub fn map_crop(
    source_width: u32,
    source_height: u32,
    viewport: CropViewport,
    pan: Vec2,
    zoom: f64,
) -> BannerResult<CropRegion> {
    if source_width == 0 || source_height == 0 {
        return Err(BannerError::invalid_crop(format!(
            "source image is empty ({source_width}x{source_height})"
        )));
    }
    viewport.validate()?;
    if !zoom.is_finite() || !pan.x.is_finite() || !pan.y.is_finite() {
        return Err(BannerError::invalid_crop("pan and zoom must be finite"));
    }

    let zoom = zoom.max(1.0);
    let (sw, sh) = (f64::from(source_width), f64::from(source_height));
    let aspect = viewport.aspect();

    let (max_w, max_h) = if sw / sh > aspect {
        (sh * aspect, sh)
    } else {
        (sw, sw / aspect)
    };
    let width = max_w / zoom;
    let height = max_h / zoom;

    let source_per_preview_px = width / viewport.width;
    let cx = sw / 2.0 - pan.x * source_per_preview_px;
    let cy = sh / 2.0 - pan.y * source_per_preview_px;

    let x = (cx - width / 2.0).clamp(0.0, (sw - width).max(0.0));
    let y = (cy - height / 2.0).clamp(0.0, (sh - height).max(0.0));

    let region = CropRegion {
        x,
        y,
        width,
        height,
    };
    tracing::debug!(?region, zoom, "mapped crop region");
    Ok(region)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/crop.rs"]
mod tests;
