//! Incremental patch writer.
//!
//! A save never rewrites the container wholesale. Existing records are patched in place where
//! the model allows it (texture pixels, a chunk's texture id), cloned and synthesized records
//! are appended at the end-of-records offset followed by a fresh zero terminator, and new
//! exports are spliced into the export block. The header counts are rewritten last.

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::codec::backing;
use crate::codec::header::{encode_name, write_counts};
use crate::codec::record::CLIP_WITHOUT_TRANSFORMS;
use crate::codec::splice::RecordSplicer;
use crate::container::layout::ContainerLayout;
use crate::container::model::Container;
use crate::entity::shape::ChunkKind;
use crate::entity::{ChunkRef, EntityRef};
use crate::foundation::core::{Offset, RECORD_HEADER_LEN, TERMINATOR};
use crate::foundation::error::{ScError, ScResult};

trait Stream: Read + Write + Seek {}

impl<T: Read + Write + Seek + ?Sized> Stream for T {}

impl Container {
    /// Flush pending changes of a single-file container into `out`.
    ///
    /// `out` must hold the bytes of the backing file (typically the backing file itself, or
    /// a copy of it). After a successful save every entity offset describes `out`.
    #[tracing::instrument(skip_all, fields(pending = self.pending.len()))]
    pub fn save<W: Read + Write + Seek>(&mut self, out: &mut W) -> ScResult<()> {
        if matches!(self.layout, ContainerLayout::Split { .. }) {
            return Err(ScError::validation(
                "split containers need a companion stream; use save_split",
            ));
        }
        self.flush(out, None)
    }

    /// Flush pending changes of a split container. `textures` must hold the companion file's
    /// bytes.
    #[tracing::instrument(skip_all, fields(pending = self.pending.len()))]
    pub fn save_split<W, T>(&mut self, out: &mut W, textures: &mut T) -> ScResult<()>
    where
        W: Read + Write + Seek,
        T: Read + Write + Seek,
    {
        if self.layout == ContainerLayout::Single {
            return Err(ScError::validation(
                "single-file containers have no companion stream; use save",
            ));
        }
        self.flush(out, Some(textures))
    }

    /// Patch the backing file (and companion file, for split containers) in place.
    pub fn save_in_place(&mut self) -> ScResult<()> {
        let open = |path: &std::path::Path| {
            std::fs::OpenOptions::new().read(true).write(true).open(path)
        };
        let mut out = open(&self.path)?;
        match self.layout.clone() {
            ContainerLayout::Single => self.save(&mut out),
            ContainerLayout::Split { texture_path } => {
                let mut textures = open(&texture_path)?;
                self.save_split(&mut out, &mut textures)
            }
        }
    }

    fn flush(
        &mut self,
        out: &mut dyn Stream,
        mut textures: Option<&mut dyn Stream>,
    ) -> ScResult<()> {
        let (exports, others): (Vec<EntityRef>, Vec<EntityRef>) = self
            .pending
            .iter()
            .copied()
            .partition(|e| matches!(e, EntityRef::Export(_)));

        for entity in others.into_iter().chain(exports) {
            match entity {
                EntityRef::Texture(i) => {
                    let companion = textures.as_mut().map(|t| &mut **t as &mut dyn Stream);
                    self.flush_texture(i, out, companion)?;
                }
                EntityRef::Shape(i) => self.flush_shape(i, out)?,
                EntityRef::Chunk(at) => self.flush_chunk(at, out)?,
                EntityRef::MovieClip(i) => self.flush_movie_clip(i, out)?,
                EntityRef::Export(i) => self.flush_export(i, out)?,
            }
            tracing::debug!(?entity, "flushed");
        }
        self.pending.clear();

        write_counts(
            out,
            self.shapes.len(),
            self.movie_clips.len(),
            self.textures.len(),
        )?;
        self.counts.shapes = self.shapes.len() as u16;
        self.counts.movie_clips = self.movie_clips.len() as u16;
        self.counts.textures = self.textures.len() as u16;
        out.flush()?;
        if let Some(tex) = textures {
            tex.flush()?;
        }
        tracing::info!(eof_offset = self.eof_offset, "saved");
        Ok(())
    }

    fn flush_texture(
        &mut self,
        index: usize,
        out: &mut dyn Stream,
        companion: Option<&mut dyn Stream>,
    ) -> ScResult<()> {
        let texture = self
            .textures
            .get(index)
            .ok_or_else(|| ScError::unknown_entity(format!("texture index {index}")))?;

        match (texture.offset, companion) {
            (Offset::Existing(at), None) => {
                out.seek(SeekFrom::Start(at + RECORD_HEADER_LEN))?;
                out.write_all(&texture.encode_metadata())?;
                out.write_all(&texture.encode_pixels()?)?;
            }
            (Offset::Existing(at), Some(companion)) => {
                out.seek(SeekFrom::Start(at + RECORD_HEADER_LEN))?;
                out.write_all(&texture.encode_metadata())?;
                match texture.companion {
                    Some(pixels_at) => {
                        companion.seek(SeekFrom::Start(pixels_at + RECORD_HEADER_LEN))?;
                        companion.write_all(&texture.encode_metadata())?;
                        companion.write_all(&texture.encode_pixels()?)?;
                    }
                    None => {
                        let record = texture.encode_record(texture.record_type, true)?;
                        let pixels_at = self.append_companion(companion, &record)?;
                        self.textures[index].companion = Some(pixels_at);
                    }
                }
            }
            (Offset::ClonedFrom(_) | Offset::Pending, None) => {
                let record = texture.encode_record(texture.record_type, true)?;
                let at = append_record(out, &mut self.eof_offset, &record)?;
                self.textures[index].offset = Offset::Existing(at);
            }
            (Offset::ClonedFrom(_) | Offset::Pending, Some(companion)) => {
                let meta = texture.encode_record(texture.record_type, false)?;
                let pixels = texture.encode_record(texture.record_type, true)?;
                let pixels_at = self.append_companion(companion, &pixels)?;
                let at = append_record(out, &mut self.eof_offset, &meta)?;
                let texture = &mut self.textures[index];
                texture.offset = Offset::Existing(at);
                texture.companion = Some(pixels_at);
            }
        }
        Ok(())
    }

    fn append_companion(&mut self, companion: &mut dyn Stream, record: &[u8]) -> ScResult<u64> {
        let eof = self.texture_eof_offset.get_or_insert(0);
        append_record(companion, eof, record)
    }

    fn flush_shape(&mut self, index: usize, out: &mut dyn Stream) -> ScResult<()> {
        let shape = self
            .shapes
            .get(index)
            .ok_or_else(|| ScError::unknown_entity(format!("shape index {index}")))?;

        let (record, chunk_positions) = match shape.offset {
            Offset::Existing(_) => return Ok(()),
            Offset::Pending => shape.encode_record(&self.textures)?,
            Offset::ClonedFrom(source) => {
                let src = backing::read_record(&self.path, source)?;
                let mut splice = RecordSplicer::new(&src, source);
                splice.copy(RECORD_HEADER_LEN)?;
                splice.replace(2, &shape.id.to_le_bytes())?;
                splice.copy(4)?;

                let mut positions = Vec::with_capacity(shape.chunks.len());
                loop {
                    let kind = splice.copy_u8()?;
                    let length = u64::try_from(splice.copy_i32()?).map_err(|_| {
                        ScError::malformed(format!("negative chunk length in shape at {source}"))
                    })?;
                    if ChunkKind::from_tag(kind).is_none() {
                        if kind == 0 {
                            break;
                        }
                        splice.copy(length)?;
                        continue;
                    }
                    let chunk = shape.chunks.get(positions.len()).ok_or_else(|| {
                        ScError::malformed(format!(
                            "source of shape {} has more chunks than its clone",
                            shape.id
                        ))
                    })?;
                    let body = chunk.encode_payload(&self.textures)?;
                    if body.len() as u64 != length {
                        return Err(ScError::malformed(format!(
                            "chunk {} of shape {} re-encodes to {} bytes, source has {length}",
                            chunk.index,
                            shape.id,
                            body.len()
                        )));
                    }
                    positions.push(splice.written());
                    splice.replace(length, &body)?;
                }
                splice.copy_remaining()?;
                if positions.len() != shape.chunks.len() {
                    return Err(ScError::malformed(format!(
                        "source of shape {} has fewer chunks than its clone",
                        shape.id
                    )));
                }
                (splice.finish(), positions)
            }
        };

        let at = append_record(out, &mut self.eof_offset, &record)?;
        let shape = &mut self.shapes[index];
        shape.offset = Offset::Existing(at);
        for (chunk, rel) in shape.chunks.iter_mut().zip(chunk_positions) {
            chunk.offset = Offset::Existing(at + rel);
        }
        Ok(())
    }

    fn flush_chunk(&mut self, at: ChunkRef, out: &mut dyn Stream) -> ScResult<()> {
        let chunk = self.chunk(at)?;
        if let Offset::Existing(pos) = chunk.offset {
            out.seek(SeekFrom::Start(pos))?;
            out.write_u8(chunk.texture_id)?;
        }
        Ok(())
    }

    fn flush_movie_clip(&mut self, index: usize, out: &mut dyn Stream) -> ScResult<()> {
        let clip = self
            .movie_clips
            .get(index)
            .ok_or_else(|| ScError::unknown_entity(format!("movie clip index {index}")))?;

        let source = match clip.offset {
            Offset::Existing(_) => return Ok(()),
            Offset::Pending => {
                return Err(ScError::validation(format!(
                    "movie clip {} has no source record to serialize from",
                    clip.id
                )));
            }
            Offset::ClonedFrom(source) => source,
        };

        let src = backing::read_record(&self.path, source)?;
        let kind = src.first().copied().unwrap_or_default();
        let mut splice = RecordSplicer::new(&src, source);
        splice.copy(RECORD_HEADER_LEN)?;
        splice.replace(2, &clip.id.to_le_bytes())?;
        splice.copy(1)?;
        splice.copy_i16()?;
        if kind != CLIP_WITHOUT_TRANSFORMS {
            let n = splice.copy_i32()?;
            let transforms = u64::try_from(n).map_err(|_| {
                ScError::malformed(format!(
                    "source of movie clip {} has transform count {n}",
                    clip.id
                ))
            })?;
            splice.copy(transforms * 6)?;
        }
        let count = splice.copy_i16()?;
        if usize::try_from(count).ok() != Some(clip.entries.len()) {
            return Err(ScError::malformed(format!(
                "source of movie clip {} lists {count} entries, clone has {}",
                clip.id,
                clip.entries.len()
            )));
        }
        for entry in &clip.entries {
            splice.replace(2, &entry.id.to_le_bytes())?;
        }
        splice.copy_remaining()?;

        let record = splice.finish();
        let at = append_record(out, &mut self.eof_offset, &record)?;
        self.movie_clips[index].offset = Offset::Existing(at);
        Ok(())
    }

    /// Insert the export's id at the end of the id block and its name at the end of the name
    /// block, shifting everything behind it.
    fn flush_export(&mut self, index: usize, out: &mut dyn Stream) -> ScResult<()> {
        let export = self
            .exports
            .get(index)
            .ok_or_else(|| ScError::unknown_entity(format!("export index {index}")))?;
        if export.offset != Offset::Pending {
            return Ok(());
        }
        let id = export
            .movie_clip
            .and_then(|c| self.movie_clips.get(c))
            .map_or(export.id, |c| c.id);
        let name = encode_name(&export.name)?;

        let section = self.export_section_offset;
        out.seek(SeekFrom::Start(section))?;
        let count = out.read_u16::<LittleEndian>()?;
        let new_count = count
            .checked_add(1)
            .ok_or_else(|| ScError::validation("export count exceeds u16"))?;
        let id_end = section + 2 + u64::from(count) * 2;

        out.seek(SeekFrom::Start(id_end))?;
        let mut tail = Vec::new();
        out.read_to_end(&mut tail)?;
        let mut names_len = 0usize;
        for _ in 0..count {
            let len = *tail.get(names_len).ok_or_else(|| {
                ScError::malformed("export name block runs past the end of the stream")
            })?;
            names_len += 1;
            if len != u8::MAX {
                names_len += usize::from(len);
            }
        }
        if names_len > tail.len() {
            return Err(ScError::malformed(
                "export name block runs past the end of the stream",
            ));
        }

        out.seek(SeekFrom::Start(id_end))?;
        out.write_i16::<LittleEndian>(id)?;
        out.write_all(&tail[..names_len])?;
        out.write_all(&name)?;
        out.write_all(&tail[names_len..])?;
        out.seek(SeekFrom::Start(section))?;
        out.write_u16::<LittleEndian>(new_count)?;

        self.shift_offsets(id_end, 2 + name.len() as u64);
        let export = &mut self.exports[index];
        export.id = id;
        export.offset = Offset::Existing(id_end);
        tracing::debug!(export = %export.name, id, "inserted export");
        Ok(())
    }
}

/// Write `record` at `*eof` followed by a zero terminator; advance `*eof` to the terminator.
/// Returns where the record starts.
fn append_record(out: &mut dyn Stream, eof: &mut u64, record: &[u8]) -> ScResult<u64> {
    let at = *eof;
    out.seek(SeekFrom::Start(at))?;
    out.write_all(record)?;
    out.write_all(&TERMINATOR)?;
    *eof = at + record.len() as u64;
    Ok(at)
}

#[cfg(test)]
#[path = "../tests/unit/patch.rs"]
mod tests;
