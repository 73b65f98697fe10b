use std::path::{Path, PathBuf};

use crate::{
    assets::SourceImage,
    color::filter::ColorAdjustment,
    encode::ExportSpec,
    foundation::core::{Rgba8, Vec2},
    foundation::error::{BannerError, BannerResult},
    render::overlay::{TextLayer, WatermarkStyle},
    session::editor::{EditSession, WatermarkKind},
};

/// How the document picks its crop.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum CropSpec {
    Pixels {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    PanZoom {
        #[serde(default)]
        pan_x: f64,
        #[serde(default)]
        pan_y: f64,
        #[serde(default = "one")]
        zoom: f64,
    },
}

fn one() -> f64 {
    1.0
}

impl Default for CropSpec {
    fn default() -> Self {
        Self::PanZoom {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkSpec {
    pub kind: WatermarkKind,
    pub text: String,
    pub color: Rgba8,
    /// Image file relative to the document.
    pub image: Option<String>,
    pub style: WatermarkStyle,
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            kind: WatermarkKind::None,
            text: "© Brand".to_string(),
            color: Rgba8::WHITE,
            image: None,
            style: WatermarkStyle::default(),
        }
    }
}

/// A whole edit as stored on disk.
///
/// ```json
/// {
///   "crop": { "pan_zoom": { "pan_x": 0, "pan_y": 0, "zoom": 1.5 } },
///   "preset": "Vivid",
///   "text": { "content": "SALE", "pixel_size": 64 },
///   "watermark": { "kind": "image", "image": "logo.png" },
///   "export": { "format": "jpeg", "quality": 0.8 }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditDocument {
    pub crop: CropSpec,
    /// Applied after `color`, overwriting it.
    pub preset: Option<String>,
    pub color: ColorAdjustment,
    pub text: TextLayer,
    pub watermark: WatermarkSpec,
    pub export: ExportSpec,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl EditDocument {
    pub fn from_json_str(s: &str) -> BannerResult<Self> {
        serde_json::from_str(s).map_err(|e| BannerError::serde(e.to_string()))
    }

    /// Read a document; relative watermark paths resolve against its directory.
    pub fn from_path(path: &Path) -> BannerResult<Self> {
        use anyhow::Context as _;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read edit document '{}'", path.display()))?;
        let mut doc = Self::from_json_str(&text)?;
        doc.base_dir = path.parent().map(Path::to_path_buf);
        Ok(doc)
    }

    pub fn to_json_pretty(&self) -> BannerResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BannerError::serde(e.to_string()))
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Build an editing session for `source` in the state this document describes.
    #[tracing::instrument(level = "debug", skip(self, source))]
    pub fn prepare(&self, source: SourceImage) -> BannerResult<EditSession> {
        let mut session = EditSession::new(source)?;

        match self.crop {
            CropSpec::Pixels {
                x,
                y,
                width,
                height,
            } => session.set_crop_pixels(x, y, width, height)?,
            CropSpec::PanZoom { pan_x, pan_y, zoom } => {
                session.set_pan_zoom(Vec2::new(pan_x, pan_y), zoom)?;
            }
        }

        session.color = self.color;
        if let Some(name) = &self.preset {
            session.apply_preset(name)?;
        }
        session.text = self.text.clone();

        session.watermark_text = self.watermark.text.clone();
        session.watermark_color = self.watermark.color;
        session.watermark_style = self.watermark.style;
        if let Some(rel) = &self.watermark.image {
            let path = self.resolve_asset(rel)?;
            let bytes = read_asset(&path)?;
            session.set_watermark_image_bytes(&bytes)?;
        }
        session.set_watermark_kind(self.watermark.kind)?;

        session.export = self.export;
        Ok(session)
    }

    fn resolve_asset(&self, rel: &str) -> BannerResult<PathBuf> {
        let norm = normalize_rel_path(rel)?;
        Ok(match &self.base_dir {
            Some(dir) => dir.join(norm),
            None => PathBuf::from(norm),
        })
    }
}

fn read_asset(path: &Path) -> BannerResult<Vec<u8>> {
    use anyhow::Context as _;

    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read watermark image '{}'", path.display()))?;
    Ok(bytes)
}

/// Normalize and validate document-relative asset paths.
///
/// The result uses `/` separators and drops `.` segments; absolute paths and `..` are rejected.
pub fn normalize_rel_path(source: &str) -> BannerResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(BannerError::validation("asset path must be non-empty"));
    }
    let has_drive = s.as_bytes().get(1) == Some(&b':');
    if s.starts_with('/') || has_drive {
        return Err(BannerError::validation("asset paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(BannerError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }
    if out.is_empty() {
        return Err(BannerError::validation(
            "asset path must contain a file name",
        ));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/session/document.rs"]
mod tests;
