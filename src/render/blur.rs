use crate::foundation::error::{BannerError, BannerResult};

// Kernel half-width cap; shadow blurs beyond this look identical at banner sizes.
const MAX_RADIUS: u32 = 256;

/// Kernel parameters for a canvas-style shadow blur of `blur` pixels.
///
/// Canvas shadows use a Gaussian with `sigma = blur / 2`; the kernel covers three sigmas.
pub fn shadow_kernel(blur: f64) -> Option<(u32, f32)> {
    if !blur.is_finite() || blur <= 0.0 {
        return None;
    }
    let sigma = blur / 2.0;
    let radius = ((sigma * 3.0).ceil() as u32).clamp(1, MAX_RADIUS);
    Some((radius, sigma as f32))
}

/// Separable Gaussian blur over premultiplied RGBA8, clamping at the buffer edges.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> BannerResult<Vec<u8>> {
    let expected_len = crate::render::frame_len(width, height)?;
    if src.len() != expected_len {
        return Err(BannerError::render(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Blur `buf` in place, touching only the box around its non-transparent pixels.
///
/// Text shadows cover a small part of the frame, so the blur runs on the covered box grown by the
/// kernel radius instead of the whole buffer.
pub fn blur_covered_in_place(
    buf: &mut [u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> BannerResult<()> {
    if buf.len() != crate::render::frame_len(width, height)? {
        return Err(BannerError::render(
            "blur_covered_in_place expects buf matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(());
    }
    let Some((x0, y0, x1, y1)) = alpha_bounds(buf, width, height) else {
        return Ok(());
    };

    let x0 = x0.saturating_sub(radius);
    let y0 = y0.saturating_sub(radius);
    let x1 = x1.saturating_add(radius).min(width - 1);
    let y1 = y1.saturating_add(radius).min(height - 1);
    let (rw, rh) = (x1 - x0 + 1, y1 - y0 + 1);

    let row_bytes = (width as usize) * 4;
    let region_row = (rw as usize) * 4;
    let mut region = Vec::with_capacity(region_row * rh as usize);
    for y in y0..=y1 {
        let start = (y as usize) * row_bytes + (x0 as usize) * 4;
        region.extend_from_slice(&buf[start..start + region_row]);
    }

    let blurred = blur_rgba8_premul(&region, rw, rh, radius, sigma)?;
    for (row, y) in (y0..=y1).enumerate() {
        let start = (y as usize) * row_bytes + (x0 as usize) * 4;
        buf[start..start + region_row]
            .copy_from_slice(&blurred[row * region_row..(row + 1) * region_row]);
    }
    tracing::debug!(x0, y0, rw, rh, radius, "blurred covered region");
    Ok(())
}

/// Inclusive pixel bounds of the non-transparent area.
fn alpha_bounds(buf: &[u8], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (i, px) in buf.chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let x = (i % width as usize) as u32;
        let y = (i / width as usize) as u32;
        debug_assert!(y < height);
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> BannerResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(BannerError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(BannerError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    // Put the rounding remainder on the center tap so the kernel sums to exactly 1.0.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
