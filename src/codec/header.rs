use std::io::{Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::codec::reader::RecordReader;
use crate::entity::export::Export;
use crate::foundation::core::Offset;
use crate::foundation::error::{ScError, ScResult};

/// Bytes between the six header counts and the export block. Never interpreted.
pub(crate) const HEADER_PADDING_LEN: u64 = 5;

/// Object counts stored in the first twelve bytes of a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct HeaderCounts {
    /// Number of shape records.
    pub shapes: u16,
    /// Number of movie clip records.
    pub movie_clips: u16,
    /// Number of texture records.
    pub textures: u16,
    /// Number of text field records.
    pub text_fields: u16,
    /// Number of 2x3 matrices.
    pub matrices: u16,
    /// Number of color transforms.
    pub color_transforms: u16,
}

impl HeaderCounts {
    pub(crate) fn read(r: &mut RecordReader<'_>) -> ScResult<Self> {
        Ok(Self {
            shapes: r.u16("shape count")?,
            movie_clips: r.u16("movie clip count")?,
            textures: r.u16("texture count")?,
            text_fields: r.u16("text field count")?,
            matrices: r.u16("matrix count")?,
            color_transforms: r.u16("color transform count")?,
        })
    }
}

/// Read the export block: a `u16` count, that many `i16` ids, then that many names in the
/// same order.
pub(crate) fn read_exports(r: &mut RecordReader<'_>) -> ScResult<Vec<Export>> {
    let count = r.u16("export count")?;
    let mut exports = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let slot = r.position();
        let id = r.i16("export id")?;
        exports.push(Export::new(id, String::new(), Offset::Existing(slot)));
    }
    for export in &mut exports {
        export.name = r.short_string("export name")?.unwrap_or_default();
    }
    Ok(exports)
}

/// Length-prefixed export name.
pub(crate) fn encode_name(name: &str) -> ScResult<Vec<u8>> {
    let len = u8::try_from(name.len())
        .ok()
        .filter(|&len| len < u8::MAX)
        .ok_or_else(|| {
            ScError::validation(format!(
                "export name '{name}' is {} bytes; at most 254 fit",
                name.len()
            ))
        })?;
    let mut out = Vec::with_capacity(name.len() + 1);
    out.push(len);
    out.extend_from_slice(name.as_bytes());
    Ok(out)
}

/// Rewrite the shape, movie clip and texture counts at offset 0.
pub(crate) fn write_counts<W: Write + Seek + ?Sized>(
    out: &mut W,
    shapes: usize,
    movie_clips: usize,
    textures: usize,
) -> ScResult<()> {
    let count = |what: &str, n: usize| {
        u16::try_from(n)
            .map_err(|_| ScError::validation(format!("{n} {what} exceed the u16 header count")))
    };
    let shapes = count("shapes", shapes)?;
    let movie_clips = count("movie clips", movie_clips)?;
    let textures = count("textures", textures)?;

    out.seek(SeekFrom::Start(0))?;
    out.write_u16::<LittleEndian>(shapes)?;
    out.write_u16::<LittleEndian>(movie_clips)?;
    out.write_u16::<LittleEndian>(textures)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/codec/header.rs"]
mod tests;
