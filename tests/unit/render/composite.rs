use super::*;

#[test]
fn over_opaque_source_replaces_destination() {
    assert_eq!(over([1, 2, 3, 255], [200, 100, 50, 255], 1.0), [200, 100, 50, 255]);
}

#[test]
fn over_transparent_or_zero_opacity_keeps_destination() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
    assert_eq!(over(dst, [255, 255, 255, 255], 0.0), dst);
}

#[test]
fn over_half_opacity_blends_evenly() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    for c in &out[..3] {
        assert!((i32::from(*c) - 128).abs() <= 1);
    }
    assert_eq!(out[3], 255);
}

#[test]
fn over_in_place_checks_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(matches!(
        over_in_place(&mut dst, &[0u8; 4], 1.0),
        Err(BannerError::Render(_))
    ));
}

#[test]
fn over_in_place_composites_every_pixel() {
    let mut dst = [0u8, 0, 255, 255].repeat(2);
    let src = [[255u8, 0, 0, 255], [0, 0, 0, 0]].concat();
    over_in_place(&mut dst, &src, 1.0).unwrap();
    assert_eq!(dst, vec![255, 0, 0, 255, 0, 0, 255, 255]);
}

#[test]
fn flatten_uses_background_for_missing_coverage() {
    let src = [[0u8, 0, 0, 0], [255, 255, 255, 255], [64, 0, 0, 128]].concat();
    let rgb = flatten_over_rgb8(&src, [10, 20, 30]);
    assert_eq!(&rgb[0..3], &[10, 20, 30]);
    assert_eq!(&rgb[3..6], &[255, 255, 255]);
    assert_eq!(rgb[6], 64 + 5);
    assert_eq!(rgb[7], 10);
}
