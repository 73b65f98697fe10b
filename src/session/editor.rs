use crate::{
    assets::{
        SourceImage, WatermarkImage,
        decode::{decode_image, decode_watermark},
        fonts::FontBook,
    },
    color::{filter::ColorAdjustment, presets::preset_by_name},
    encode::{ExportSpec, ExportedImage, export::encode_frame},
    foundation::core::{Rgba8, Vec2},
    foundation::error::{BannerError, BannerResult},
    geometry::crop::{CropRegion, CropViewport, map_crop},
    render::{
        overlay::{TextLayer, WatermarkLayer, WatermarkStyle},
        pipeline::{RenderOpts, render_edit},
    },
    session::snapshot::EditSnapshot,
};

/// Which watermark the snapshot renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    #[default]
    None,
    Text,
    Image,
}

/// Mutable editing state for one source image.
///
/// Both watermark kinds keep their data while the other is selected; only `watermark_kind`
/// decides what gets rendered.
#[derive(Clone, Debug)]
pub struct EditSession {
    source: SourceImage,
    viewport: CropViewport,
    pan: Vec2,
    zoom: f64,
    crop: Option<CropRegion>,
    pub color: ColorAdjustment,
    pub text: TextLayer,
    watermark_kind: WatermarkKind,
    pub watermark_text: String,
    pub watermark_color: Rgba8,
    pub watermark_style: WatermarkStyle,
    watermark_image: Option<WatermarkImage>,
    pub export: ExportSpec,
}

impl EditSession {
    /// Fresh session with every control at its default and the crop at the maximal centered
    /// region.
    pub fn new(source: SourceImage) -> BannerResult<Self> {
        let viewport = CropViewport::default();
        let crop = map_crop(source.width, source.height, viewport, Vec2::ZERO, 1.0)?;
        Ok(Self {
            source,
            viewport,
            pan: Vec2::ZERO,
            zoom: 1.0,
            crop: Some(crop),
            color: ColorAdjustment::default(),
            text: TextLayer::default(),
            watermark_kind: WatermarkKind::None,
            watermark_text: "© Brand".to_string(),
            watermark_color: Rgba8::WHITE,
            watermark_style: WatermarkStyle::default(),
            watermark_image: None,
            export: ExportSpec::default(),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> BannerResult<Self> {
        Self::new(decode_image(bytes)?)
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn crop(&self) -> Option<CropRegion> {
        self.crop
    }

    pub fn pan_zoom(&self) -> (Vec2, f64) {
        (self.pan, self.zoom)
    }

    /// Change the preview crop box; the current pan and zoom are re-mapped against it.
    pub fn set_viewport(&mut self, viewport: CropViewport) -> BannerResult<CropRegion> {
        let crop = map_crop(
            self.source.width,
            self.source.height,
            viewport,
            self.pan,
            self.zoom,
        )?;
        self.viewport = viewport;
        self.crop = Some(crop);
        Ok(crop)
    }

    /// Record a pan/zoom gesture. On error the previous crop is kept.
    pub fn set_pan_zoom(&mut self, pan: Vec2, zoom: f64) -> BannerResult<CropRegion> {
        let crop = map_crop(self.source.width, self.source.height, self.viewport, pan, zoom)?;
        self.pan = pan;
        self.zoom = zoom.max(1.0);
        self.crop = Some(crop);
        Ok(crop)
    }

    /// Use an explicit pixel rectangle instead of pan/zoom.
    pub fn set_crop_pixels(&mut self, x: u32, y: u32, width: u32, height: u32) -> BannerResult<()> {
        let crop = CropRegion::from_pixels(
            x,
            y,
            width,
            height,
            self.source.width,
            self.source.height,
        )?;
        self.crop = Some(crop);
        Ok(())
    }

    pub fn clear_crop(&mut self) {
        self.crop = None;
    }

    pub fn apply_preset(&mut self, name: &str) -> BannerResult<()> {
        let preset = preset_by_name(name)
            .ok_or_else(|| BannerError::validation(format!("unknown preset '{name}'")))?;
        self.color.apply_preset(preset);
        Ok(())
    }

    pub fn watermark_kind(&self) -> WatermarkKind {
        self.watermark_kind
    }

    /// Select the rendered watermark. `Image` requires a decoded image.
    pub fn set_watermark_kind(&mut self, kind: WatermarkKind) -> BannerResult<()> {
        if kind == WatermarkKind::Image && self.watermark_image.is_none() {
            return Err(BannerError::validation(
                "image watermark selected without an image",
            ));
        }
        self.watermark_kind = kind;
        Ok(())
    }

    pub fn watermark_image(&self) -> Option<&WatermarkImage> {
        self.watermark_image.as_ref()
    }

    /// Decode and store an uploaded watermark. On error the session is unchanged.
    pub fn set_watermark_image_bytes(&mut self, bytes: &[u8]) -> BannerResult<()> {
        let image = decode_watermark(bytes)?;
        self.watermark_image = Some(image);
        Ok(())
    }

    pub fn set_watermark_image(&mut self, image: WatermarkImage) {
        self.watermark_image = Some(image);
    }

    /// Drop the stored image; an active image watermark falls back to none.
    pub fn clear_watermark_image(&mut self) {
        self.watermark_image = None;
        if self.watermark_kind == WatermarkKind::Image {
            self.watermark_kind = WatermarkKind::None;
        }
    }

    pub fn snapshot(&self) -> EditSnapshot {
        let watermark = match self.watermark_kind {
            WatermarkKind::None => WatermarkLayer::None,
            WatermarkKind::Text => WatermarkLayer::Text {
                text: self.watermark_text.clone(),
                color: self.watermark_color,
                style: self.watermark_style,
            },
            WatermarkKind::Image => match &self.watermark_image {
                Some(image) => WatermarkLayer::Image {
                    image: image.clone(),
                    style: self.watermark_style,
                },
                None => WatermarkLayer::None,
            },
        };
        EditSnapshot {
            crop: self.crop,
            color: self.color,
            text: self.text.is_visible().then(|| self.text.clone()),
            watermark,
            export: self.export,
        }
    }

    /// Render the current state and encode it with the session's export settings.
    pub fn export(&self, fonts: &FontBook, opts: &RenderOpts) -> BannerResult<ExportedImage> {
        let snapshot = self.snapshot();
        let frame = render_edit(&self.source, &snapshot, fonts, opts)?;
        encode_frame(&frame, &snapshot.export, opts.jpeg_background)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
