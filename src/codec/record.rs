/// Top-level record families, keyed by the record type byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RecordKind {
    End,
    Texture,
    Shape,
    MovieClip,
    /// Text fields, 2x3 matrices, color transforms: recognized but kept as opaque bytes.
    Opaque,
    Unknown,
}

impl RecordKind {
    pub(crate) fn classify(kind: u8) -> Self {
        match kind {
            0 => Self::End,
            1 | 16 | 19 => Self::Texture,
            2 | 18 => Self::Shape,
            3 | 10 | 12 | 14 => Self::MovieClip,
            7 | 8 | 9 | 13 | 15 | 20 => Self::Opaque,
            _ => Self::Unknown,
        }
    }
}

/// Record type used for textures synthesized from a raster.
pub(crate) const NEW_TEXTURE_RECORD: u8 = 1;

/// Record type used for shapes serialized without a source record.
pub(crate) const NEW_SHAPE_RECORD: u8 = 2;

/// Movie clip sub-format without a transform table.
pub(crate) const CLIP_WITHOUT_TRANSFORMS: u8 = 14;

/// Movie clip sub-format with one extra byte per entry.
pub(crate) const CLIP_WITH_ENTRY_BYTES: u8 = 12;

/// Movie clip sub-record tags.
pub(crate) const CLIP_TAG_END: u8 = 0;
pub(crate) const CLIP_TAG_FRAME: u8 = 5;
pub(crate) const CLIP_TAG_LABEL: u8 = 11;

#[cfg(test)]
#[path = "../../tests/unit/codec/record.rs"]
mod tests;
