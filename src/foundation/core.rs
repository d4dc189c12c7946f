use crate::foundation::error::{PoppetError, PoppetResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Display surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions that fit a raster surface.
    pub fn new(width: u32, height: u32) -> PoppetResult<Self> {
        if width == 0 || height == 0 {
            return Err(PoppetError::validation("Canvas dimensions must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(PoppetError::validation("Canvas dimensions must fit in u16"));
        }
        Ok(Self { width, height })
    }

    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

/// Position normalized to the image's intrinsic size, nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NormPoint {
    /// Fraction of image width.
    pub x: f64,
    /// Fraction of image height.
    pub y: f64,
}

impl NormPoint {
    /// Construct from raw components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in normalized units.
    pub fn distance(self, other: NormPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Straight-alpha RGBA color with a floating point alpha, resolved once at entity creation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `[0, 1]`.
    pub a: f32,
}

impl Rgba8 {
    /// Construct a color.
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0.0,
        }
    }

    /// Same color with a replaced alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> PoppetResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(PoppetError::validation(format!("invalid hex color '{hex}'")));
        }
        let channel = |i: usize| -> PoppetResult<u8> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| PoppetError::validation(format!("invalid hex color '{hex}': {e}")))
        };
        Ok(Self::opaque(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Brighten or darken every color channel by `delta`, saturating at the channel bounds.
    pub fn shifted(self, delta: i16) -> Self {
        let shift = |c: u8| -> u8 { (i16::from(c) + delta).clamp(0, 255) as u8 };
        Self {
            r: shift(self.r),
            g: shift(self.g),
            b: shift(self.b),
            a: self.a,
        }
    }

    /// Convert to premultiplied float channels in `[0, 1]`.
    pub fn premul_f32(self) -> [f32; 4] {
        let a = self.a.clamp(0.0, 1.0);
        [
            f32::from(self.r) / 255.0 * a,
            f32::from(self.g) / 255.0 * a,
            f32::from(self.b) / 255.0 * a,
            a,
        ]
    }
}

/// Monotonic session time in milliseconds (a frame callback timestamp).
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct TimeMs(pub f64);

impl TimeMs {
    /// Milliseconds elapsed since `earlier`; negative when `earlier` is in the future.
    pub fn since(self, earlier: TimeMs) -> f64 {
        self.0 - earlier.0
    }

    /// Shift forward by `ms` milliseconds.
    pub fn plus(self, ms: f64) -> TimeMs {
        TimeMs(self.0 + ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
