use std::io::Cursor;

use anyhow::Context;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{PoppetError, PoppetResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::fx::vortex::apply_vortex;

/// Full-resolution, session-owned raster; premultiplied RGBA8, row-major, tightly packed.
///
/// Every in-place mutation bumps [`BackingImage::revision`] so renderers can cache uploads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackingImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
    revision: u64,
}

impl BackingImage {
    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> PoppetResult<Self> {
        if width == 0 || height == 0 {
            return Err(PoppetError::decode("image has zero natural dimensions"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PoppetError::decode("image size overflow"))?;
        if data.len() != expected {
            return Err(PoppetError::decode(format!(
                "image byte len {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            revision: 0,
        })
    }

    /// Decode an encoded image (any format `image` understands) into a backing buffer.
    pub fn decode(bytes: &[u8]) -> PoppetResult<Self> {
        let dyn_img = image::load_from_memory(bytes)
            .context("decode image from memory")
            .map_err(|e| PoppetError::decode(format!("{e:#}")))?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut data = rgba.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_rgba8(width, height, data)
    }

    /// Encode as PNG (straight alpha).
    pub fn encode_png(&self) -> PoppetResult<Vec<u8>> {
        encode_png_premul(self.width, self.height, &self.data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Straight-alpha color of the pixel containing `p` (buffer coordinates, clamped to bounds).
    pub fn sample(&self, p: Point) -> Rgba8 {
        let clamp = |v: f64, max: u32| -> usize {
            if v.is_finite() {
                v.floor().clamp(0.0, f64::from(max - 1)) as usize
            } else {
                0
            }
        };
        let x = clamp(p.x, self.width);
        let y = clamp(p.y, self.height);
        let i = (y * self.width as usize + x) * 4;
        let mut px = [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]];
        unpremultiply_rgba8_in_place(&mut px);
        Rgba8::new(px[0], px[1], px[2], f32::from(px[3]) / 255.0)
    }

    /// Destructive vortex warp; returns whether any pixel was written.
    pub fn apply_vortex(&mut self, center: Point, strength: f64) -> bool {
        let written = apply_vortex(&mut self.data, self.width, self.height, center, strength);
        if written {
            self.revision += 1;
        }
        written
    }

    /// Replace the whole raster, e.g. with a generative result; dimensions may change.
    pub fn replace_with(&mut self, other: BackingImage) {
        let revision = self.revision.max(other.revision) + 1;
        *self = Self { revision, ..other };
    }
}

pub(crate) fn encode_png_premul(width: u32, height: u32, premul: &[u8]) -> PoppetResult<Vec<u8>> {
    let mut straight = premul.to_vec();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| PoppetError::render("pixel buffer does not match its dimensions"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/backing.rs"]
mod tests;
