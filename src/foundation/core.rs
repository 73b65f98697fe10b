use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{BannerError, BannerResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Straight (non-premultiplied) RGBA8 color.
///
/// Documents spell colors the CSS way (`#fff`, `#ffffff80`, `rgba(0,0,0,0.5)`, `white`); the
/// serde form is the parsed string on input and `#rrggbbaa` on output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Premultiplied `[r, g, b, a]`.
    pub fn to_premul(self) -> [u8; 4] {
        crate::foundation::math::premultiply([self.r, self.g, self.b, self.a])
    }

    /// Parse a CSS-style color string.
    pub fn parse(s: &str) -> BannerResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }

        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            let args = args
                .strip_suffix(')')
                .ok_or_else(|| BannerError::validation(format!("unterminated color '{s}'")))?;
            return parse_rgb_args(s, args);
        }

        named_color(&lower).ok_or_else(|| BannerError::validation(format!("unknown color '{s}'")))
    }
}

impl FromStr for Rgba8 {
    type Err = BannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = BannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rgba8> for String {
    fn from(c: Rgba8) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

fn parse_hex(hex: &str) -> BannerResult<Rgba8> {
    let bad = || BannerError::validation(format!("invalid hex color '#{hex}'"));
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad());
    }
    let nibble = |i: usize| -> BannerResult<u8> {
        u8::from_str_radix(&hex[i..i + 1], 16)
            .map(|v| v * 17)
            .map_err(|_| bad())
    };
    let byte = |i: usize| -> BannerResult<u8> {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad())
    };

    match hex.len() {
        3 => Ok(Rgba8::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Ok(Rgba8::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Ok(Rgba8::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Ok(Rgba8::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => Err(bad()),
    }
}

fn parse_rgb_args(original: &str, args: &str) -> BannerResult<Rgba8> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(BannerError::validation(format!(
            "color '{original}' must have 3 or 4 components"
        )));
    }

    let channel = |p: &str| -> BannerResult<u8> {
        let v: f64 = p
            .parse()
            .map_err(|_| BannerError::validation(format!("invalid channel '{p}' in '{original}'")))?;
        if !v.is_finite() {
            return Err(BannerError::validation(format!(
                "non-finite channel in '{original}'"
            )));
        }
        Ok(v.round().clamp(0.0, 255.0) as u8)
    };

    let alpha = match parts.get(3) {
        Some(p) => {
            let (num, scale) = match p.strip_suffix('%') {
                Some(pct) => (pct, 0.01),
                None => (*p, 1.0),
            };
            let v: f64 = num.parse().map_err(|_| {
                BannerError::validation(format!("invalid alpha '{p}' in '{original}'"))
            })?;
            if !v.is_finite() {
                return Err(BannerError::validation(format!(
                    "non-finite alpha in '{original}'"
                )));
            }
            ((v * scale).clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };

    Ok(Rgba8::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

fn named_color(name: &str) -> Option<Rgba8> {
    Some(match name {
        "transparent" => Rgba8::TRANSPARENT,
        "black" => Rgba8::BLACK,
        "white" => Rgba8::WHITE,
        "red" => Rgba8::rgb(255, 0, 0),
        "green" => Rgba8::rgb(0, 128, 0),
        "blue" => Rgba8::rgb(0, 0, 255),
        "yellow" => Rgba8::rgb(255, 255, 0),
        "gray" | "grey" => Rgba8::rgb(128, 128, 128),
        _ => return None,
    })
}

/// Anchor given as percentages of the output buffer's width and height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

impl PercentPoint {
    pub const CENTER: Self = Self { x: 50.0, y: 50.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Resolve against output dimensions (not source dimensions).
    pub fn resolve(self, width: u32, height: u32) -> Point {
        Point::new(
            self.x / 100.0 * f64::from(width),
            self.y / 100.0 * f64::from(height),
        )
    }
}
