use std::path::PathBuf;

use crate::codec::header::{self, HEADER_PADDING_LEN, HeaderCounts};
use crate::codec::reader::RecordReader;
use crate::codec::record::RecordKind;
use crate::container::layout::ContainerLayout;
use crate::container::model::Container;
use crate::entity::movie_clip::MovieClip;
use crate::entity::shape::Shape;
use crate::entity::texture::Texture;
use crate::foundation::error::{ScError, ScResult};

/// Decode a whole container. `textures` carries the companion stream for the split layout.
pub(crate) fn decode(
    path: PathBuf,
    layout: ContainerLayout,
    primary: &[u8],
    textures: Option<&[u8]>,
) -> ScResult<Container> {
    if matches!(layout, ContainerLayout::Split { .. }) != textures.is_some() {
        return Err(ScError::validation(
            "split layout requires exactly one companion texture stream",
        ));
    }

    let mut r = RecordReader::new(primary);
    let counts = HeaderCounts::read(&mut r)?;
    r.skip(HEADER_PADDING_LEN)?;
    let export_section_offset = r.position();
    let mut exports = header::read_exports(&mut r)?;
    tracing::debug!(?counts, exports = exports.len(), "header");

    let mut companion = textures.map(RecordReader::new);
    let mut texture_list: Vec<Texture> = Vec::new();
    let mut shapes: Vec<Shape> = Vec::new();
    let mut movie_clips: Vec<MovieClip> = Vec::new();

    let eof_offset = loop {
        let record = r.record_header()?;
        if record.kind == 0 {
            break record.offset;
        }
        r.ensure_payload(&record)?;

        match RecordKind::classify(record.kind) {
            RecordKind::Texture => {
                let id = u16::try_from(texture_list.len())
                    .map_err(|_| ScError::malformed("more than 65535 texture records"))?;
                let texture = match companion.as_mut() {
                    Some(tex) => Texture::parse_split(id, &record, &mut r, tex)?,
                    None => Texture::parse(id, &record, &mut r)?,
                };
                texture_list.push(texture);
            }
            RecordKind::Shape => shapes.push(Shape::parse(&record, &mut r, &texture_list)?),
            RecordKind::MovieClip => {
                movie_clips.push(MovieClip::parse(&record, &mut r, &shapes)?);
            }
            RecordKind::Opaque => {
                tracing::trace!(kind = record.kind, offset = record.offset, "opaque record");
            }
            RecordKind::Unknown => {
                tracing::warn!(
                    kind = record.kind,
                    offset = record.offset,
                    "unknown record type; skipping"
                );
            }
            RecordKind::End => {}
        }

        if r.position() > record.end() {
            return Err(ScError::malformed(format!(
                "record type {} at offset {} overruns its declared length",
                record.kind, record.offset
            )));
        }
        r.seek_to(record.end())?;
    };

    let texture_eof_offset = match companion.as_mut() {
        Some(tex) => Some(companion_eof(tex)?),
        None => None,
    };

    for export in &mut exports {
        export.movie_clip = movie_clips.iter().position(|c| c.id == export.id);
        if export.movie_clip.is_none() {
            tracing::debug!(export = %export.name, id = export.id, "export target not found");
        }
    }

    tracing::debug!(
        textures = texture_list.len(),
        shapes = shapes.len(),
        movie_clips = movie_clips.len(),
        eof_offset,
        "decoded container"
    );

    Ok(Container {
        path,
        layout,
        counts,
        textures: texture_list,
        shapes,
        movie_clips,
        exports,
        eof_offset,
        texture_eof_offset,
        export_section_offset,
        pending: Vec::new(),
    })
}

/// Offset of the companion's zero record, the append point for new pixel records.
fn companion_eof(r: &mut RecordReader<'_>) -> ScResult<u64> {
    loop {
        if r.remaining() == 0 {
            tracing::warn!("companion texture stream has no terminator");
            return Ok(r.position());
        }
        let record = r.record_header()?;
        if record.kind == 0 {
            return Ok(record.offset);
        }
        tracing::warn!(
            kind = record.kind,
            offset = record.offset,
            "companion texture stream has more records than the primary"
        );
        r.ensure_payload(&record)?;
        r.seek_to(record.end())?;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/decode.rs"]
mod tests;
