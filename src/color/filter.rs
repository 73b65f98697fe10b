use crate::foundation::math::{premultiply, unpremultiply};
use crate::render::FrameRGBA;

/// Global tone adjustments, each in percent.
///
/// `brightness`, `contrast` and `saturation` are identity at 100; `grayscale` and `sepia` are
/// identity at 0.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorAdjustment {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub grayscale: f64,
    pub sepia: f64,
}

impl Default for ColorAdjustment {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorAdjustment {
    pub const IDENTITY: Self = Self {
        brightness: 100.0,
        contrast: 100.0,
        saturation: 100.0,
        grayscale: 0.0,
        sepia: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Fold the five operations, in their fixed order, into one matrix.
    pub fn to_matrix(&self) -> ColorMatrix {
        let amount = |pct: f64| -> f32 {
            if pct.is_finite() {
                (pct / 100.0).max(0.0) as f32
            } else {
                1.0
            }
        };
        let unit = |pct: f64| -> f32 {
            if pct.is_finite() {
                (pct / 100.0).clamp(0.0, 1.0) as f32
            } else {
                0.0
            }
        };

        // Identity stages are skipped so the baseline folds to an exact identity.
        let stages = [
            (self.brightness != 100.0).then(|| ColorMatrix::brightness(amount(self.brightness))),
            (self.contrast != 100.0).then(|| ColorMatrix::contrast(amount(self.contrast))),
            (self.saturation != 100.0).then(|| ColorMatrix::saturate(amount(self.saturation))),
            (self.grayscale != 0.0).then(|| ColorMatrix::grayscale(unit(self.grayscale))),
            (self.sepia != 0.0).then(|| ColorMatrix::sepia(unit(self.sepia))),
        ];
        stages
            .into_iter()
            .flatten()
            .fold(ColorMatrix::IDENTITY, ColorMatrix::then)
    }
}

/// Affine color transform over straight RGB in `0.0..=1.0`: `out = m * rgb + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix {
    pub m: [[f32; 3]; 3],
    pub offset: [f32; 3],
}

impl ColorMatrix {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        offset: [0.0; 3],
    };

    fn scale(s: f32, offset: f32) -> Self {
        Self {
            m: [[s, 0.0, 0.0], [0.0, s, 0.0], [0.0, 0.0, s]],
            offset: [offset; 3],
        }
    }

    fn linear(m: [[f32; 3]; 3]) -> Self {
        Self {
            m,
            offset: [0.0; 3],
        }
    }

    pub fn brightness(b: f32) -> Self {
        Self::scale(b, 0.0)
    }

    pub fn contrast(c: f32) -> Self {
        Self::scale(c, 0.5 - 0.5 * c)
    }

    pub fn saturate(s: f32) -> Self {
        Self::linear([
            [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
        ])
    }

    pub fn grayscale(g: f32) -> Self {
        let k = 1.0 - g;
        Self::linear([
            [0.2126 + 0.7874 * k, 0.7152 - 0.7152 * k, 0.0722 - 0.0722 * k],
            [0.2126 - 0.2126 * k, 0.7152 + 0.2848 * k, 0.0722 - 0.0722 * k],
            [0.2126 - 0.2126 * k, 0.7152 - 0.7152 * k, 0.0722 + 0.9278 * k],
        ])
    }

    pub fn sepia(p: f32) -> Self {
        let k = 1.0 - p;
        Self::linear([
            [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
            [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
            [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
        ])
    }

    /// `self` first, then `next`.
    pub fn then(self, next: Self) -> Self {
        let mut m = [[0.0f32; 3]; 3];
        let mut offset = [0.0f32; 3];
        for i in 0..3 {
            for j in 0..3 {
                m[i][j] = (0..3).map(|k| next.m[i][k] * self.m[k][j]).sum();
            }
            offset[i] = (0..3).map(|k| next.m[i][k] * self.offset[k]).sum::<f32>() + next.offset[i];
        }
        Self { m, offset }
    }

    /// Transform one straight RGBA8 pixel; alpha passes through, channels clamp to 0..=255.
    pub fn apply_straight(&self, px: [u8; 4]) -> [u8; 4] {
        let rgb = [
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
        ];
        let mut out = [0u8, 0, 0, px[3]];
        for i in 0..3 {
            let v = self.m[i][0] * rgb[0] + self.m[i][1] * rgb[1] + self.m[i][2] * rgb[2]
                + self.offset[i];
            out[i] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        out
    }
}

/// Apply `adj` to every pixel of a premultiplied frame, producing a new frame.
#[tracing::instrument(level = "debug", skip(src), fields(width = src.width, height = src.height))]
pub fn apply_color_filter(src: &FrameRGBA, adj: &ColorAdjustment) -> FrameRGBA {
    if adj.is_identity() {
        return src.clone();
    }

    let matrix = adj.to_matrix();
    let mut data = Vec::with_capacity(src.data.len());
    for px in src.data.chunks_exact(4) {
        let px = [px[0], px[1], px[2], px[3]];
        if px[3] == 0 {
            data.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let out = premultiply(matrix.apply_straight(unpremultiply(px)));
        data.extend_from_slice(&out);
    }

    FrameRGBA {
        width: src.width,
        height: src.height,
        data,
        premultiplied: true,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/filter.rs"]
mod tests;
