use crate::{
    assets::{
        WatermarkImage,
        fonts::{FONT_CHOICES, FontBook},
        svg_raster::rasterize_svg,
    },
    foundation::core::{PercentPoint, Point, Rect, Rgba8, Vec2},
    foundation::error::BannerResult,
    render::{
        FrameRGBA,
        blur::{blur_covered_in_place, shadow_kernel},
        composite::over_in_place,
        surface::{draw_image_in_rect, draw_text_layout, font_data, render_layer},
    },
    text::layout::{LineLayout, TextLayoutEngine, glyph_middle, line_box},
};

/// Font stack used for text watermarks.
pub const WATERMARK_FONT_STACK: &str = "sans-serif";

const WATERMARK_SHADOW: Rgba8 = Rgba8::new(0, 0, 0, 128);

/// Horizontal anchor of the text box relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Drop shadow of the main text, in preview pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextShadow {
    pub color: Rgba8,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for TextShadow {
    fn default() -> Self {
        Self {
            color: Rgba8::BLACK,
            blur: 4.0,
            offset_x: 2.0,
            offset_y: 2.0,
        }
    }
}

/// The single headline text layer.
///
/// `pixel_size` and the shadow are preview-relative and get multiplied by the scale factor;
/// `position` is a percentage of the output.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextLayer {
    pub content: String,
    /// CSS font stack, or a name from [`FONT_CHOICES`].
    pub font_family: String,
    pub pixel_size: f64,
    pub color: Rgba8,
    pub align: TextAlign,
    pub position: PercentPoint,
    pub shadow: TextShadow,
}

impl Default for TextLayer {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_family: FONT_CHOICES[0].stack.to_string(),
            pixel_size: 48.0,
            color: Rgba8::WHITE,
            align: TextAlign::Center,
            position: PercentPoint::CENTER,
            shadow: TextShadow::default(),
        }
    }
}

impl TextLayer {
    pub fn is_visible(&self) -> bool {
        !self.content.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    /// Percent of the output width.
    #[default]
    Percent,
    /// Preview pixels, multiplied by the scale factor.
    Pixel,
}

/// Placement shared by text and image watermarks.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WatermarkStyle {
    /// Percent, 0 to 100.
    pub opacity: f64,
    pub size: f64,
    pub unit: SizeUnit,
    pub position: PercentPoint,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            opacity: 80.0,
            size: 20.0,
            unit: SizeUnit::Percent,
            position: PercentPoint::new(90.0, 90.0),
        }
    }
}

impl WatermarkStyle {
    /// Opacity as a 0..=1 alpha multiplier.
    pub fn alpha(&self) -> f32 {
        if !self.opacity.is_finite() {
            return 0.0;
        }
        (self.opacity / 100.0).clamp(0.0, 1.0) as f32
    }
}

/// The watermark actually rendered: at most one kind at a time.
#[derive(Clone, Debug, Default)]
pub enum WatermarkLayer {
    #[default]
    None,
    Text {
        text: String,
        color: Rgba8,
        style: WatermarkStyle,
    },
    Image {
        image: WatermarkImage,
        style: WatermarkStyle,
    },
}

/// Preview-to-output multiplier for pixel-unit quantities.
pub fn scale_factor(output_width: u32, reference_width: f64) -> f64 {
    if !reference_width.is_finite() || reference_width <= 0.0 {
        return 1.0;
    }
    f64::from(output_width) / reference_width
}

/// Top-left corner of a text box `box_w` wide anchored at `anchor`.
///
/// `middle` is the distance from the box top to the glyphs' visual middle, which lands on
/// `anchor.y`.
pub fn text_origin(anchor: Point, box_w: f64, middle: f64, align: TextAlign) -> Point {
    let x = match align {
        TextAlign::Left => anchor.x,
        TextAlign::Center => anchor.x - box_w / 2.0,
        TextAlign::Right => anchor.x - box_w,
    };
    Point::new(x, anchor.y - middle)
}

/// Watermark font size, or image width, in output pixels.
pub fn resolve_watermark_size(style: &WatermarkStyle, output_width: u32, scale: f64) -> f64 {
    let size = match style.unit {
        SizeUnit::Percent => style.size / 100.0 * f64::from(output_width),
        SizeUnit::Pixel => style.size * scale,
    };
    if size.is_finite() { size.max(0.0) } else { 0.0 }
}

/// Output rectangle of an image watermark with the given intrinsic aspect (width / height).
pub fn watermark_image_rect(
    style: &WatermarkStyle,
    aspect: f64,
    output_width: u32,
    output_height: u32,
    scale: f64,
) -> Rect {
    let width = resolve_watermark_size(style, output_width, scale);
    let height = if aspect.is_finite() && aspect > 0.0 {
        width / aspect
    } else {
        0.0
    };
    Rect::from_center_size(
        style.position.resolve(output_width, output_height),
        (width, height),
    )
}

/// Bounds of the main text box on an `output_width x output_height` frame, if the layer is
/// visible.
pub fn text_layer_bounds(
    layer: &TextLayer,
    fonts: &FontBook,
    output_width: u32,
    output_height: u32,
    reference_width: f64,
) -> BannerResult<Option<Rect>> {
    if !layer.is_visible() {
        return Ok(None);
    }
    let scale = scale_factor(output_width, reference_width);
    let mut engine = TextLayoutEngine::new();
    let placed = place_text(&mut engine, layer, fonts, output_width, output_height, scale)?;
    let (w, h) = line_box(&placed.layout);
    Ok(Some(Rect::from_origin_size(placed.origin, (w, h))))
}

struct PlacedText {
    layout: LineLayout,
    font: vello_cpu::peniko::FontData,
    origin: Point,
}

struct Shadow {
    color: Rgba8,
    blur: f64,
    offset: Vec2,
}

impl Shadow {
    fn is_drawn(&self) -> bool {
        !self.color.is_transparent()
            && (self.blur > 0.0 || self.offset.x != 0.0 || self.offset.y != 0.0)
    }
}

fn place_text(
    engine: &mut TextLayoutEngine,
    layer: &TextLayer,
    fonts: &FontBook,
    output_width: u32,
    output_height: u32,
    scale: f64,
) -> BannerResult<PlacedText> {
    let font = fonts.resolve(&layer.font_family, true)?;
    let size = (layer.pixel_size * scale) as f32;
    let layout = engine.layout_line(&layer.content, &font, size, true, layer.color)?;
    let (w, _) = line_box(&layout);
    let origin = text_origin(
        layer.position.resolve(output_width, output_height),
        w,
        glyph_middle(&layout, &font, size),
        layer.align,
    );
    Ok(PlacedText {
        layout,
        font: font_data(&font),
        origin,
    })
}

/// Draw the (blurred) shadow, then the glyphs, over `frame`, each at `opacity`.
fn paint_text(
    frame: &mut FrameRGBA,
    placed: &PlacedText,
    shadow: &Shadow,
    opacity: f32,
) -> BannerResult<()> {
    let (width, height) = (frame.width, frame.height);
    if shadow.is_drawn() {
        let mut layer = render_layer(width, height, |ctx| {
            draw_text_layout(
                ctx,
                &placed.layout,
                &placed.font,
                placed.origin + shadow.offset,
                Some(shadow.color),
            );
            Ok(())
        })?;
        if let Some((radius, sigma)) = shadow_kernel(shadow.blur) {
            blur_covered_in_place(&mut layer, width, height, radius, sigma)?;
        }
        over_in_place(&mut frame.data, &layer, opacity)?;
    }

    let glyphs = render_layer(width, height, |ctx| {
        draw_text_layout(ctx, &placed.layout, &placed.font, placed.origin, None);
        Ok(())
    })?;
    over_in_place(&mut frame.data, &glyphs, opacity)
}

#[tracing::instrument(level = "debug", skip(engine, frame, layer, fonts), fields(len = layer.content.len()))]
fn draw_text_layer(
    engine: &mut TextLayoutEngine,
    frame: &mut FrameRGBA,
    layer: &TextLayer,
    fonts: &FontBook,
    scale: f64,
) -> BannerResult<()> {
    let (w, h) = (frame.width, frame.height);
    let placed = place_text(engine, layer, fonts, w, h, scale)?;
    let shadow = Shadow {
        color: layer.shadow.color,
        blur: layer.shadow.blur * scale,
        offset: Vec2::new(layer.shadow.offset_x * scale, layer.shadow.offset_y * scale),
    };
    paint_text(frame, &placed, &shadow, 1.0)
}

#[tracing::instrument(level = "debug", skip(engine, frame, watermark, fonts))]
fn draw_watermark(
    engine: &mut TextLayoutEngine,
    frame: &mut FrameRGBA,
    watermark: &WatermarkLayer,
    fonts: &FontBook,
    scale: f64,
) -> BannerResult<()> {
    let (w, h) = (frame.width, frame.height);
    match watermark {
        WatermarkLayer::None => Ok(()),
        WatermarkLayer::Text { text, color, style } => {
            let size = resolve_watermark_size(style, w, scale);
            if text.is_empty() || size <= 0.0 {
                return Ok(());
            }
            let font = fonts.resolve(WATERMARK_FONT_STACK, false)?;
            let layout = engine.layout_line(text, &font, size as f32, false, *color)?;
            let (bw, _) = line_box(&layout);
            let middle = glyph_middle(&layout, &font, size as f32);
            let placed = PlacedText {
                origin: text_origin(style.position.resolve(w, h), bw, middle, TextAlign::Center),
                layout,
                font: font_data(&font),
            };
            let shadow = Shadow {
                color: WATERMARK_SHADOW,
                blur: 2.0 * scale,
                offset: Vec2::ZERO,
            };
            paint_text(frame, &placed, &shadow, style.alpha())
        }
        WatermarkLayer::Image { image, style } => {
            let rect = watermark_image_rect(style, image.aspect_ratio(), w, h, scale);
            if rect.width() < 0.5 || rect.height() < 0.5 {
                tracing::debug!(?rect, "watermark too small to draw");
                return Ok(());
            }
            let painted = match image {
                WatermarkImage::Raster(img) => {
                    render_layer(w, h, |ctx| draw_image_in_rect(ctx, img, rect))?
                }
                WatermarkImage::Svg(tree) => {
                    let raster = rasterize_svg(
                        tree,
                        rect.width().round().max(1.0) as u32,
                        rect.height().round().max(1.0) as u32,
                    )?;
                    render_layer(w, h, |ctx| draw_image_in_rect(ctx, &raster, rect))?
                }
            };
            over_in_place(&mut frame.data, &painted, style.alpha())
        }
    }
}

/// Draw the text layer, then the watermark, over a copy of `base`.
pub(crate) fn composite_overlays(
    base: &FrameRGBA,
    text: Option<&TextLayer>,
    watermark: &WatermarkLayer,
    fonts: &FontBook,
    reference_width: f64,
) -> BannerResult<FrameRGBA> {
    let mut out = base.clone();
    let scale = scale_factor(out.width, reference_width);
    let mut engine = TextLayoutEngine::new();

    if let Some(layer) = text.filter(|t| t.is_visible()) {
        draw_text_layer(&mut engine, &mut out, layer, fonts, scale)?;
    }
    draw_watermark(&mut engine, &mut out, watermark, fonts, scale)?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
