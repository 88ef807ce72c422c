//! Fixed-point color packings used by texture records.

mod rgb565;
mod rgba4444;
mod rgba8888;

use crate::foundation::core::Raster;
use crate::foundation::error::{ScError, ScResult};

/// Pixel codec selected by a texture record's format tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum PixelFormat {
    /// 4 bytes per pixel, disk order R, G, B, A.
    Rgba8888,
    /// One 16-bit word per pixel, `RRRR GGGG BBBB AAAA`.
    Rgba4444,
    /// One 16-bit word per pixel, `RRRRR GGGGGG BBBBB`, always opaque.
    Rgb565,
}

impl PixelFormat {
    /// Map a texture format tag to its codec. Unsupported tags return `None`.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Rgba8888),
            2 => Some(Self::Rgba4444),
            4 => Some(Self::Rgb565),
            _ => None,
        }
    }

    /// Format tag written in front of the texture dimensions.
    pub fn tag(self) -> u8 {
        match self {
            Self::Rgba8888 => 0,
            Self::Rgba4444 => 2,
            Self::Rgb565 => 4,
        }
    }

    /// Human-readable codec name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rgba8888 => "RGBA8888",
            Self::Rgba4444 => "RGBA4444",
            Self::Rgb565 => "RGB565",
        }
    }

    /// Packed size of one pixel in bytes.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8888 => 4,
            Self::Rgba4444 | Self::Rgb565 => 2,
        }
    }

    /// Packed payload size for a `width` x `height` image.
    pub fn payload_len(self, width: u32, height: u32) -> ScResult<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(self.bytes_per_pixel()))
            .ok_or_else(|| ScError::malformed(format!("texture size {width}x{height} overflows")))
    }

    /// Decode a packed payload. Fails when `bytes` holds fewer than `width * height` pixels.
    pub fn decode(self, bytes: &[u8], width: u32, height: u32) -> ScResult<Raster> {
        let len = self.payload_len(width, height)?;
        let Some(packed) = bytes.get(..len) else {
            return Err(ScError::malformed(format!(
                "truncated {} payload: need {len} bytes for {width}x{height}, have {}",
                self.name(),
                bytes.len()
            )));
        };
        let rgba = match self {
            Self::Rgba8888 => rgba8888::decode(packed),
            Self::Rgba4444 => rgba4444::decode(packed),
            Self::Rgb565 => rgb565::decode(packed),
        };
        Raster::from_raw(width, height, rgba)
            .ok_or_else(|| ScError::malformed("decoded pixel buffer does not match dimensions"))
    }

    /// Pack a raster into this format.
    pub fn encode(self, raster: &Raster) -> Vec<u8> {
        match self {
            Self::Rgba8888 => rgba8888::encode(raster),
            Self::Rgba4444 => rgba4444::encode(raster),
            Self::Rgb565 => rgb565::encode(raster),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pixel/format.rs"]
mod tests;
