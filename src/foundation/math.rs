pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Straight RGBA8 to premultiplied RGBA8.
pub(crate) fn premultiply(px: [u8; 4]) -> [u8; 4] {
    let a = u16::from(px[3]);
    match a {
        0 => [0, 0, 0, 0],
        255 => px,
        _ => [
            mul_div255_u8(u16::from(px[0]), a),
            mul_div255_u8(u16::from(px[1]), a),
            mul_div255_u8(u16::from(px[2]), a),
            px[3],
        ],
    }
}

/// Premultiplied RGBA8 back to straight RGBA8.
pub(crate) fn unpremultiply(px: [u8; 4]) -> [u8; 4] {
    let a = u32::from(px[3]);
    match a {
        0 => [0, 0, 0, 0],
        255 => px,
        _ => {
            let un = |c: u8| -> u8 { ((u32::from(c) * 255 + a / 2) / a).min(255) as u8 };
            [un(px[0]), un(px[1]), un(px[2]), px[3]]
        }
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let out = premultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&out);
    }
}
