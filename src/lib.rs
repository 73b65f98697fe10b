//! bannerkit turns a source image plus a set of editor parameters into a finished banner.
//!
//! The pipeline runs four stages in order, each a pure function of the previous buffer and its
//! parameters:
//!
//! - crop: preview pan/zoom (or an explicit rectangle) mapped to a source region ([`map_crop`])
//! - color: brightness, contrast, saturation, grayscale and sepia folded into one matrix
//! - overlays: one text layer, then at most one text or image watermark
//! - encode: png, jpeg or webp ([`encode_frame`])
//!
//! Most callers drive it through an [`EditSession`] or an [`EditDocument`].
#![forbid(unsafe_code)]

mod assets;
mod color;
mod encode;
mod foundation;
mod geometry;
mod render;
mod session;
mod text;

pub use crate::assets::decode::{decode_image, decode_watermark, parse_svg};
pub use crate::assets::fonts::{FONT_CHOICES, FontBook, FontChoice, ResolvedFont, font_stack_for};
pub use crate::assets::svg_raster::rasterize_svg;
pub use crate::assets::{MAX_WATERMARK_BYTES, SourceImage, WatermarkImage};
pub use crate::foundation::core::{Affine, PercentPoint, Point, Rect, Rgba8, Size, Vec2};
pub use crate::foundation::error::{BannerError, BannerResult};

pub use crate::color::filter::{ColorAdjustment, ColorMatrix, apply_color_filter};
pub use crate::color::presets::{PRESETS, Preset, preset_by_name};
pub use crate::encode::export::{encode_frame, jpeg_quality, suggested_filename, webp_quality};
pub use crate::encode::{ExportFormat, ExportSpec, ExportedImage};
pub use crate::geometry::crop::{
    CropRegion, CropViewport, PixelRect, REFERENCE_PREVIEW_WIDTH, map_crop,
};
pub use crate::render::FrameRGBA;
pub use crate::render::overlay::{
    SizeUnit, TextAlign, TextLayer, TextShadow, WATERMARK_FONT_STACK, WatermarkLayer,
    WatermarkStyle, resolve_watermark_size, scale_factor, text_layer_bounds, text_origin,
    watermark_image_rect,
};
pub use crate::render::pipeline::{RenderOpts, crop_source, render_edit};
pub use crate::session::document::{CropSpec, EditDocument, WatermarkSpec, normalize_rel_path};
pub use crate::session::editor::{EditSession, WatermarkKind};
pub use crate::session::snapshot::EditSnapshot;
