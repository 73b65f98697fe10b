use std::io::Cursor;

use super::*;

fn encode_png(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = encode_png(1, 1, vec![100u8, 50u8, 200u8, 128u8]);

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_garbage_is_decode_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, BannerError::Decode(_)));
}

#[test]
fn decode_svg_parse_ok_and_err() {
    let ok = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="5"></svg>"#;
    let tree = parse_svg(ok).unwrap();
    assert_eq!(tree.size().width(), 10.0);

    let bad = br#"<svg"#;
    assert!(matches!(parse_svg(bad), Err(BannerError::Decode(_))));
}

#[test]
fn watermark_sniffs_svg_and_raster() {
    let svg = br#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20"/></svg>"#;
    let wm = decode_watermark(svg).unwrap();
    assert!(matches!(wm, WatermarkImage::Svg(_)));
    assert_eq!(wm.aspect_ratio(), 2.0);

    let png = encode_png(4, 2, [255u8, 0, 0, 255].repeat(8));
    let wm = decode_watermark(&png).unwrap();
    assert!(matches!(wm, WatermarkImage::Raster(_)));
    assert_eq!(wm.size(), (4.0, 2.0));
}

#[test]
fn watermark_over_size_limit_is_rejected() {
    let big = vec![0u8; MAX_WATERMARK_BYTES + 1];
    assert!(matches!(
        decode_watermark(&big),
        Err(BannerError::Decode(_))
    ));
}
