pub use kurbo::{Affine, Point, Rect};

/// Straight-alpha RGBA8 raster, row-major and tightly packed.
pub type Raster = image::RgbaImage;

/// Size of every record header: one type byte plus a little-endian `i32` length.
pub(crate) const RECORD_HEADER_LEN: u64 = 5;

/// Zero record appended after every freshly written record.
pub(crate) const TERMINATOR: [u8; 5] = [0; 5];

/// Where an entity's bytes live relative to the backing file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Offset {
    /// The record exists verbatim in the backing file at this byte offset.
    Existing(u64),
    /// Newly synthesized entity with no source record.
    Pending,
    /// Unsaved clone of the entity whose record sits at this byte offset.
    ClonedFrom(u64),
}

impl Offset {
    /// Byte offset when the entity is already present in the file.
    pub fn existing(self) -> Option<u64> {
        match self {
            Self::Existing(at) => Some(at),
            Self::Pending | Self::ClonedFrom(_) => None,
        }
    }

    /// Offset of the record a clone of this entity would be re-parsed from.
    pub fn clone_source(self) -> Option<u64> {
        match self {
            Self::Existing(at) | Self::ClonedFrom(at) => Some(at),
            Self::Pending => None,
        }
    }

    /// Offset carried by a clone of this entity.
    pub fn for_clone(self) -> Self {
        match self.clone_source() {
            Some(at) => Self::ClonedFrom(at),
            None => Self::Pending,
        }
    }

    /// Move the offset forward by `delta` when it points at or past `at`.
    pub(crate) fn shift_from(&mut self, at: u64, delta: u64) {
        match self {
            Self::Existing(o) | Self::ClonedFrom(o) if *o >= at => *o += delta,
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
