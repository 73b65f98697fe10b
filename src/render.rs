use crate::foundation::error::{BannerError, BannerResult};
use crate::foundation::math::unpremultiply;

pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod overlay;
pub(crate) mod pipeline;
pub(crate) mod surface;

/// Rendered frame: RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent premultiplied frame.
    pub fn transparent(width: u32, height: u32) -> BannerResult<Self> {
        let len = frame_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
            premultiplied: true,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// Pixel at `(x, y)` as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixels, as encoders expect them.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
        }
        out
    }
}

pub(crate) fn frame_len(width: u32, height: u32) -> BannerResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BannerError::render("frame buffer size overflow"))
}
