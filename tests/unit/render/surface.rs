use super::*;

#[test]
fn surface_dims_reject_oversized_and_empty() {
    assert_eq!(surface_dims(640, 480).unwrap(), (640, 480));
    assert!(matches!(
        surface_dims(70_000, 10),
        Err(BannerError::Render(_))
    ));
    assert!(surface_dims(10, 0).is_err());
}

#[test]
fn pixmap_conversion_checks_length() {
    assert!(image_premul_bytes_to_pixmap(&[0u8; 12], 2, 2).is_err());
    let pixmap = image_premul_bytes_to_pixmap(&[255u8; 16], 2, 2).unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (2, 2));
}

#[test]
fn empty_layer_is_transparent() {
    let data = render_layer(8, 4, |_| Ok(())).unwrap();
    assert_eq!(data.len(), 8 * 4 * 4);
    assert!(data.iter().all(|&b| b == 0));
}

#[test]
fn image_is_stretched_into_rect() {
    let image = SourceImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new([0u8, 0, 255, 255].repeat(4)),
    };
    let data = render_layer(20, 10, |ctx| {
        draw_image_in_rect(ctx, &image, Rect::new(4.0, 2.0, 12.0, 8.0))
    })
    .unwrap();

    let at = |x: usize, y: usize| {
        let i = (y * 20 + x) * 4;
        [data[i], data[i + 1], data[i + 2], data[i + 3]]
    };
    assert_eq!(at(8, 5), [0, 0, 255, 255]);
    assert_eq!(at(1, 1), [0, 0, 0, 0]);
    assert_eq!(at(15, 5), [0, 0, 0, 0]);
}

#[test]
fn layer_errors_propagate() {
    let err = render_layer(4, 4, |_| Err(BannerError::render("boom"))).unwrap_err();
    assert!(err.to_string().contains("boom"));
}
