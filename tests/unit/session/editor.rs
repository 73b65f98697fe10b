use std::io::Cursor;
use std::sync::Arc;

use super::*;
use crate::color::presets::PRESETS;

fn source(w: u32, h: u32) -> SourceImage {
    SourceImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new([40u8, 80, 120, 255].repeat((w * h) as usize)),
    }
}

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([255, 0, 0, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn new_session_starts_with_defaults_and_maximal_crop() {
    let session = EditSession::new(source(1600, 900)).unwrap();
    let crop = session.crop().unwrap();
    assert_eq!(crop.height, 900.0);
    assert!((crop.width - 1200.0).abs() < 1e-9);
    assert!((crop.x - 200.0).abs() < 1e-9);
    assert!(session.color.is_identity());
    assert_eq!(session.text.pixel_size, 48.0);
    assert_eq!(session.watermark_kind(), WatermarkKind::None);
    assert_eq!(session.watermark_text, "© Brand");
    assert_eq!(session.export, ExportSpec::default());
}

#[test]
fn pan_zoom_updates_crop_and_errors_keep_previous() {
    let mut session = EditSession::new(source(1200, 900)).unwrap();
    let zoomed = session.set_pan_zoom(Vec2::ZERO, 2.0).unwrap();
    assert_eq!((zoomed.width, zoomed.height), (600.0, 450.0));
    assert!(session.set_pan_zoom(Vec2::new(f64::NAN, 0.0), 2.0).is_err());
    assert_eq!(session.crop(), Some(zoomed));
    assert_eq!(session.pan_zoom(), (Vec2::ZERO, 2.0));
}

#[test]
fn preset_overwrites_all_fields() {
    let mut session = EditSession::new(source(40, 30)).unwrap();
    session.color.brightness = 12.0;
    session.color.sepia = 99.0;
    session.apply_preset("noir").unwrap();
    assert_eq!(session.color, PRESETS[3].adjustment);
    assert!(matches!(
        session.apply_preset("nope"),
        Err(BannerError::Validation(_))
    ));
    assert_eq!(session.color, PRESETS[3].adjustment);
}

#[test]
fn image_kind_requires_image_data() {
    let mut session = EditSession::new(source(40, 30)).unwrap();
    assert!(session.set_watermark_kind(WatermarkKind::Image).is_err());
    assert_eq!(session.watermark_kind(), WatermarkKind::None);

    session.set_watermark_image_bytes(&png_bytes(4, 2)).unwrap();
    session.set_watermark_kind(WatermarkKind::Image).unwrap();
    assert!(matches!(
        session.snapshot().watermark,
        WatermarkLayer::Image { .. }
    ));

    session.clear_watermark_image();
    assert_eq!(session.watermark_kind(), WatermarkKind::None);
}

#[test]
fn switching_kinds_keeps_both_payloads() {
    let mut session = EditSession::new(source(40, 30)).unwrap();
    session.watermark_text = "ACME".to_string();
    session.set_watermark_image_bytes(&png_bytes(2, 2)).unwrap();

    session.set_watermark_kind(WatermarkKind::Image).unwrap();
    session.set_watermark_kind(WatermarkKind::Text).unwrap();
    match session.snapshot().watermark {
        WatermarkLayer::Text { text, .. } => assert_eq!(text, "ACME"),
        other => panic!("expected text watermark, got {other:?}"),
    }
    assert!(session.watermark_image().is_some());
}

#[test]
fn viewport_change_remaps_current_pan_zoom() {
    let mut session = EditSession::new(source(1600, 1200)).unwrap();
    session.set_pan_zoom(Vec2::ZERO, 2.0).unwrap();

    let wide = session
        .set_viewport(CropViewport::with_aspect(600.0, 16.0 / 9.0))
        .unwrap();
    assert!((wide.width / wide.height - 16.0 / 9.0).abs() < 1e-9);
    assert!((wide.width - 800.0).abs() < 1e-9);
    assert_eq!(session.crop(), Some(wide));
    assert_eq!(session.pan_zoom(), (Vec2::ZERO, 2.0));

    let err = session
        .set_viewport(CropViewport {
            width: 0.0,
            height: 450.0,
        })
        .unwrap_err();
    assert!(matches!(err, BannerError::InvalidCrop(_)));
    assert_eq!(session.crop(), Some(wide));
}

#[test]
fn decoded_watermark_can_be_handed_over_directly() {
    let mut session = EditSession::new(source(40, 30)).unwrap();
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="10"></svg>"#;
    session.set_watermark_image(crate::assets::decode::decode_watermark(svg).unwrap());
    session.set_watermark_kind(WatermarkKind::Image).unwrap();
    match session.snapshot().watermark {
        WatermarkLayer::Image { image, .. } => assert_eq!(image.aspect_ratio(), 3.0),
        other => panic!("expected image watermark, got {other:?}"),
    }
}

#[test]
fn bad_watermark_upload_leaves_state_unchanged() {
    let mut session = EditSession::new(source(40, 30)).unwrap();
    session.set_watermark_image_bytes(&png_bytes(3, 3)).unwrap();
    session.set_watermark_kind(WatermarkKind::Image).unwrap();

    let err = session.set_watermark_image_bytes(b"garbage").unwrap_err();
    assert!(matches!(err, BannerError::Decode(_)));
    assert_eq!(session.watermark_kind(), WatermarkKind::Image);
    assert_eq!(session.watermark_image().unwrap().size(), (3.0, 3.0));
}

#[test]
fn snapshot_hides_empty_text_and_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<EditSnapshot>();

    let mut session = EditSession::new(source(40, 30)).unwrap();
    assert!(session.snapshot().text.is_none());
    assert!(!session.snapshot().has_overlays());
    session.text.content = "Hello".to_string();
    assert_eq!(session.snapshot().text.unwrap().content, "Hello");
}

#[test]
fn export_without_crop_is_invalid_crop() {
    let mut session = EditSession::new(source(40, 30)).unwrap();
    session.clear_crop();
    let err = session
        .export(&FontBook::empty(), &RenderOpts::default())
        .unwrap_err();
    assert!(matches!(err, BannerError::InvalidCrop(_)));
}

#[test]
fn export_encodes_cropped_output() {
    let mut session = EditSession::new(source(64, 48)).unwrap();
    session.set_crop_pixels(8, 8, 32, 24).unwrap();
    session.export = ExportSpec {
        format: crate::encode::ExportFormat::Webp,
        quality: 1.0,
    };
    let out = session
        .export(&FontBook::empty(), &RenderOpts::default())
        .unwrap();
    assert_eq!((out.width, out.height), (32, 24));
    assert!(out.filename.ends_with(".webp"));
    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [40, 80, 120, 255]);
}
