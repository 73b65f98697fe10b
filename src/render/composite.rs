use crate::foundation::error::{BannerError, BannerResult};
use crate::foundation::math::mul_div255_u16;

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels, with `opacity` scaling the whole source.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u16(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - sa;

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u16(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u16(u16::from(src[i]), op);
        let dc = mul_div255_u16(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Composite `src` over `dst` pixel by pixel. Both buffers hold premultiplied RGBA8.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> BannerResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(BannerError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    if opacity <= 0.0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Flatten premultiplied pixels over an opaque background, returning packed RGB8.
pub fn flatten_over_rgb8(src: &[u8], background: [u8; 3]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len() / 4 * 3);
    for px in src.chunks_exact(4) {
        let inv = 255u16 - u16::from(px[3]);
        for c in 0..3 {
            out.push(add_sat_u8(
                u16::from(px[c]),
                mul_div255_u16(u16::from(background[c]), inv),
            ));
        }
    }
    out
}

fn add_sat_u8(a: u16, b: u16) -> u8 {
    (a + b).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
