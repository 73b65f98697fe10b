use super::*;

fn gradient(w: u32, h: u32) -> FrameRGBA {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[
                (x * 255 / w.max(1)) as u8,
                (y * 255 / h.max(1)) as u8,
                ((x ^ y) & 0xff) as u8,
                255,
            ]);
        }
    }
    FrameRGBA {
        width: w,
        height: h,
        data,
        premultiplied: true,
    }
}

fn spec(format: ExportFormat, quality: f64) -> ExportSpec {
    ExportSpec { format, quality }
}

#[test]
fn filename_has_timestamp_and_extension() {
    assert_eq!(
        suggested_filename(ExportFormat::Jpeg, 1_700_000_000_123),
        "edited-banner-1700000000123.jpeg"
    );
    let out = encode_frame(&gradient(4, 4), &ExportSpec::default(), Rgba8::BLACK).unwrap();
    assert!(out.filename.starts_with("edited-banner-"));
    assert!(out.filename.ends_with(".png"));
}

#[test]
fn quality_mappings() {
    assert_eq!(jpeg_quality(0.0), 1);
    assert_eq!(jpeg_quality(0.5), 50);
    assert_eq!(jpeg_quality(0.92), 92);
    assert_eq!(jpeg_quality(7.0), 100);
    assert_eq!(webp_quality(1.0), None);
    assert_eq!(webp_quality(3.0), None);
    assert_eq!(webp_quality(0.0), Some(0.0));
    assert_eq!(webp_quality(0.5), Some(50.0));
}

#[test]
fn png_round_trips_pixels() {
    let frame = gradient(16, 9);
    let out = encode_frame(&frame, &spec(ExportFormat::Png, 0.1), Rgba8::BLACK).unwrap();
    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (16, 9));
    assert_eq!(decoded.into_raw(), frame.data);
}

#[test]
fn jpeg_flattens_transparency_onto_background() {
    let frame = FrameRGBA::transparent(8, 8).unwrap();
    let out = encode_frame(
        &frame,
        &spec(ExportFormat::Jpeg, 1.0),
        Rgba8::rgb(255, 255, 255),
    )
    .unwrap();
    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgb8();
    assert!(decoded.pixels().all(|p| p.0.iter().all(|&c| c >= 250)));
}

#[test]
fn jpeg_size_does_not_grow_with_lower_quality() {
    let frame = gradient(64, 48);
    let hi = encode_frame(&frame, &spec(ExportFormat::Jpeg, 1.0), Rgba8::BLACK).unwrap();
    let lo = encode_frame(&frame, &spec(ExportFormat::Jpeg, 0.5), Rgba8::BLACK).unwrap();
    assert!(lo.bytes.len() <= hi.bytes.len());
}

#[test]
fn webp_full_quality_is_lossless() {
    let frame = gradient(12, 10);
    let out = encode_frame(&frame, &spec(ExportFormat::Webp, 1.0), Rgba8::BLACK).unwrap();
    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.into_raw(), frame.data);
}

fn noisy(w: u32, h: u32) -> FrameRGBA {
    let mut state = 0x2545_f491_u32;
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        data.extend_from_slice(&[r, g, b, 255]);
    }
    FrameRGBA {
        width: w,
        height: h,
        data,
        premultiplied: true,
    }
}

#[test]
fn webp_low_quality_is_lossy_not_posterized() {
    let frame = noisy(64, 48);
    let out = encode_frame(&frame, &spec(ExportFormat::Webp, 0.0), Rgba8::BLACK).unwrap();
    assert_eq!(&out.bytes[8..12], b"WEBP");

    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (64, 48));
    let reds: std::collections::BTreeSet<u8> = decoded.pixels().map(|p| p.0[0]).collect();
    assert!(reds.len() > 8, "only {} distinct red values", reds.len());

    let lossless = encode_frame(&frame, &spec(ExportFormat::Webp, 1.0), Rgba8::BLACK).unwrap();
    assert!(out.bytes.len() < lossless.bytes.len());
}

#[test]
fn invalid_frames_and_quality_are_encoding_errors() {
    let empty = FrameRGBA {
        width: 0,
        height: 0,
        data: Vec::new(),
        premultiplied: true,
    };
    assert!(matches!(
        encode_frame(&empty, &ExportSpec::default(), Rgba8::BLACK),
        Err(BannerError::Encoding(_))
    ));

    let mut short = gradient(2, 2);
    short.data.pop();
    assert!(matches!(
        encode_frame(&short, &ExportSpec::default(), Rgba8::BLACK),
        Err(BannerError::Encoding(_))
    ));

    assert!(matches!(
        encode_frame(&gradient(2, 2), &spec(ExportFormat::Jpeg, f64::NAN), Rgba8::BLACK),
        Err(BannerError::Encoding(_))
    ));
}
