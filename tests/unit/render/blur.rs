use super::*;

fn single_dot(w: u32, h: u32, x: u32, y: u32) -> Vec<u8> {
    let mut buf = vec![0u8; (w * h * 4) as usize];
    let idx = ((y * w + x) * 4) as usize;
    buf[idx..idx + 4].copy_from_slice(&[255, 255, 255, 255]);
    buf
}

#[test]
fn shadow_kernel_follows_canvas_sigma() {
    assert_eq!(shadow_kernel(0.0), None);
    assert_eq!(shadow_kernel(-1.0), None);
    assert_eq!(shadow_kernel(f64::NAN), None);
    assert_eq!(shadow_kernel(4.0), Some((6, 2.0)));
    assert_eq!(shadow_kernel(1.0), Some((2, 0.5)));
    assert_eq!(shadow_kernel(10_000.0).map(|k| k.0), Some(256));
}

#[test]
fn constant_image_is_unchanged() {
    let (w, h) = (4u32, 3u32);
    let src = [10u8, 20, 30, 40].repeat((w * h) as usize);
    assert_eq!(blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap(), src);
}

#[test]
fn radius_zero_is_identity_and_length_is_checked() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap(), src);
    assert!(blur_rgba8_premul(&src, 2, 2, 1, 1.0).is_err());
    assert!(matches!(
        blur_rgba8_premul(&src, 1, 2, 1, 0.0),
        Err(BannerError::Validation(_))
    ));
}

#[test]
fn single_pixel_energy_is_conserved() {
    let (w, h) = (9u32, 9u32);
    let out = blur_rgba8_premul(&single_dot(w, h, 4, 4), w, h, 3, 1.2).unwrap();
    assert!(out.chunks_exact(4).filter(|px| px[3] != 0).count() > 1);
    let sum_a: i32 = out.chunks_exact(4).map(|px| i32::from(px[3])).sum();
    assert!((sum_a - 255).abs() <= 6);
}

#[test]
fn covered_blur_matches_full_blur_away_from_edges() {
    let (w, h) = (40u32, 30u32);
    let src = single_dot(w, h, 20, 15);
    let full = blur_rgba8_premul(&src, w, h, 4, 1.5).unwrap();

    let mut region = src.clone();
    blur_covered_in_place(&mut region, w, h, 4, 1.5).unwrap();
    assert_eq!(region, full);
}

#[test]
fn covered_blur_ignores_empty_buffers() {
    let mut buf = vec![0u8; 16 * 16 * 4];
    blur_covered_in_place(&mut buf, 16, 16, 5, 2.0).unwrap();
    assert!(buf.iter().all(|&b| b == 0));
}
