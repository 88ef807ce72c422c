//! In-memory edits. Every operation validates before it mutates, then marks what it touched in
//! the pending set; nothing reaches disk until [`Container::save`].

use std::collections::BTreeMap;

use crate::codec::backing;
use crate::codec::header::encode_name;
use crate::codec::reader::RecordReader;
use crate::codec::record::NEW_TEXTURE_RECORD;
use crate::container::model::Container;
use crate::entity::export::Export;
use crate::entity::movie_clip::MovieClip;
use crate::entity::shape::{ChunkKind, Shape};
use crate::entity::texture::Texture;
use crate::entity::{ChunkRef, EntityRef};
use crate::foundation::core::{Offset, Point, Raster};
use crate::foundation::error::{ScError, ScResult};
use crate::pixel::PixelFormat;
use crate::render::compositor;

/// Cloned shapes get ids strictly above this floor.
pub(crate) const CLONED_SHAPE_ID_FLOOR: i16 = 20000;

impl Container {
    /// Append a copy of texture `id` built from its live raster. Returns the new texture id.
    #[tracing::instrument(skip(self))]
    pub fn duplicate_texture(&mut self, id: u16) -> ScResult<u16> {
        let source = self
            .texture(id)
            .ok_or_else(|| ScError::unknown_entity(format!("texture {id}")))?;
        if source.is_placeholder() {
            return Err(ScError::UnsupportedPixelFormat(source.format_tag));
        }
        let new_id = self.next_texture_id()?;
        let mut copy = source.clone();
        copy.id = new_id;
        copy.offset = source.offset.for_clone();
        copy.companion = None;

        self.textures.push(copy);
        self.add_change(EntityRef::Texture(usize::from(new_id)));
        tracing::debug!(source = id, texture = new_id, "duplicated texture");
        Ok(new_id)
    }

    /// Append a new texture holding `raster`, stored with `format` on save.
    pub fn add_texture(&mut self, raster: Raster, format: PixelFormat) -> ScResult<u16> {
        let id = self.next_texture_id()?;
        let texture = Texture::from_raster(id, NEW_TEXTURE_RECORD, format, raster)?;
        self.textures.push(texture);
        self.add_change(EntityRef::Texture(usize::from(id)));
        Ok(id)
    }

    /// Append a copy of shape `id` under a fresh id. Returns the new shape's arena index.
    #[tracing::instrument(skip(self))]
    pub fn duplicate_shape(&mut self, id: i16) -> ScResult<usize> {
        let source = self
            .shape_index(id)
            .ok_or_else(|| ScError::unknown_entity(format!("shape {id}")))?;
        let new_id = self.next_shape_id()?;
        let shape = self.clone_shape(source, new_id)?;

        self.shapes.push(shape);
        let index = self.shapes.len() - 1;
        self.add_change(EntityRef::Shape(index));
        Ok(index)
    }

    /// Append a copy of the clip at arena index `index`, deep-copying the shapes it references.
    ///
    /// The copy gets id `max clip id + 1`. Each distinct referenced shape is cloned once under a
    /// fresh id above [`CLONED_SHAPE_ID_FLOOR`] and the copy's display list points at the
    /// clones. Returns the new clip's arena index.
    #[tracing::instrument(skip(self))]
    pub fn duplicate_movie_clip(&mut self, index: usize) -> ScResult<usize> {
        let source = self
            .movie_clips
            .get(index)
            .ok_or_else(|| ScError::unknown_entity(format!("movie clip index {index}")))?;
        let Some(at) = source.offset.clone_source() else {
            return Err(ScError::validation(format!(
                "movie clip {} has no source record to clone",
                source.id
            )));
        };

        let record = backing::read_record(&self.path, at)?;
        let mut r = RecordReader::with_base(&record, at);
        let header = r.record_header()?;
        let mut clip = MovieClip::parse(&header, &mut r, &self.shapes)?;
        clip.id = self.next_movie_clip_id()?;
        clip.offset = Offset::ClonedFrom(at);

        // Build every clone before touching the arena so a failure leaves the container as is.
        let mut next_id = self.next_shape_id()?;
        let mut cloned: BTreeMap<usize, (i16, Shape)> = BTreeMap::new();
        for entry in &clip.entries {
            let Some(shape) = entry.shape else { continue };
            if cloned.contains_key(&shape) {
                continue;
            }
            let new_id = next_id;
            next_id = next_id
                .checked_add(1)
                .ok_or_else(|| ScError::validation("shape id space exhausted"))?;
            cloned.insert(shape, (new_id, self.clone_shape(shape, new_id)?));
        }

        let mut remap = BTreeMap::new();
        for (source_index, (new_id, shape)) in cloned {
            self.shapes.push(shape);
            let new_index = self.shapes.len() - 1;
            self.add_change(EntityRef::Shape(new_index));
            remap.insert(source_index, (new_id, new_index));
        }
        for entry in &mut clip.entries {
            if let Some((new_id, new_index)) = entry.shape.and_then(|s| remap.get(&s)) {
                entry.id = *new_id;
                entry.shape = Some(*new_index);
            }
        }

        tracing::debug!(clip = clip.id, shapes = remap.len(), "duplicated movie clip");
        self.movie_clips.push(clip);
        let new_index = self.movie_clips.len() - 1;
        self.add_change(EntityRef::MovieClip(new_index));
        Ok(new_index)
    }

    /// Duplicate the clip behind export `export_name` and publish the copy as `new_name`.
    ///
    /// Returns the arena indices of the new clip and the new export. An empty or taken name is
    /// rejected before anything is cloned.
    pub fn duplicate_movie_clip_via_export(
        &mut self,
        export_name: &str,
        new_name: &str,
    ) -> ScResult<(usize, usize)> {
        if new_name.is_empty() {
            return Err(ScError::name_conflict("export name must not be empty"));
        }
        if self.export_index(new_name).is_some() {
            return Err(ScError::name_conflict(format!(
                "export '{new_name}' already exists"
            )));
        }
        encode_name(new_name)?;

        let export = self
            .export_by_name(export_name)
            .ok_or_else(|| ScError::unknown_entity(format!("export '{export_name}'")))?;
        let clip = export.movie_clip.ok_or_else(|| {
            ScError::unknown_entity(format!(
                "export '{export_name}' targets missing movie clip {}",
                export.id
            ))
        })?;

        let new_clip = self.duplicate_movie_clip(clip)?;
        let mut export = Export::new(
            self.movie_clips[new_clip].id,
            new_name.to_string(),
            Offset::Pending,
        );
        export.movie_clip = Some(new_clip);
        self.exports.push(export);
        let new_export = self.exports.len() - 1;
        self.add_change(EntityRef::Export(new_export));
        Ok((new_clip, new_export))
    }

    /// Paint `replacement` into the texture region under the chunk's UV polygon.
    ///
    /// The region is cleared first, then `replacement` is drawn at the polygon's bounding box
    /// origin, clipped to the polygon.
    #[tracing::instrument(skip(self, replacement))]
    pub fn replace_chunk_pixels(&mut self, at: ChunkRef, replacement: &Raster) -> ScResult<()> {
        let chunk = self.chunk(at)?;
        let texture_id = chunk.texture_id;
        let uv = chunk.points_uv.clone();
        let texture = self
            .textures
            .get_mut(usize::from(texture_id))
            .ok_or_else(|| ScError::unknown_entity(format!("texture {texture_id}")))?;
        compositor::replace_region(texture.image_mut()?, &uv, replacement)?;
        self.add_change(EntityRef::Texture(usize::from(texture_id)));
        Ok(())
    }

    /// Point a chunk at another texture.
    ///
    /// Normalized-UV chunks keep their on-disk fractions, so their pixel UVs are rescaled to
    /// the new texture's size.
    pub fn set_chunk_texture_id(&mut self, at: ChunkRef, texture_id: u8) -> ScResult<()> {
        let target = self
            .texture(u16::from(texture_id))
            .ok_or_else(|| ScError::unknown_entity(format!("texture {texture_id}")))?;
        let target_size = (f64::from(target.width), f64::from(target.height));
        let chunk = self.chunk(at)?;
        let source_size = self
            .texture(u16::from(chunk.texture_id))
            .map(|t| (f64::from(t.width), f64::from(t.height)));

        let chunk = &mut self.shapes[at.shape].chunks[at.chunk];
        if chunk.kind == ChunkKind::NormalizedUv {
            if let Some((w, h)) = source_size.filter(|&(w, h)| w > 0.0 && h > 0.0) {
                for p in &mut chunk.points_uv {
                    *p = Point::new(p.x / w * target_size.0, p.y / h * target_size.1);
                }
            }
        }
        chunk.texture_id = texture_id;
        let dirty = match chunk.offset {
            Offset::Existing(_) => EntityRef::Chunk(at),
            Offset::Pending | Offset::ClonedFrom(_) => EntityRef::Shape(at.shape),
        };
        self.add_change(dirty);
        Ok(())
    }

    /// Re-parse the source record of the shape at `index` and relabel it as `new_id`.
    fn clone_shape(&self, index: usize, new_id: i16) -> ScResult<Shape> {
        let source = &self.shapes[index];
        let mut shape = match source.offset.clone_source() {
            Some(at) => {
                let record = backing::read_record(&self.path, at)?;
                let mut r = RecordReader::with_base(&record, at);
                let header = r.record_header()?;
                let mut shape = Shape::parse(&header, &mut r, &self.textures)?;
                shape.offset = Offset::ClonedFrom(at);
                shape
            }
            None => source.clone(),
        };
        shape.id = new_id;
        for chunk in &mut shape.chunks {
            chunk.shape_id = new_id;
            chunk.offset = chunk.offset.for_clone();
        }
        Ok(shape)
    }

    fn next_texture_id(&self) -> ScResult<u16> {
        u16::try_from(self.textures.len())
            .map_err(|_| ScError::validation("texture id space exhausted"))
    }

    fn next_shape_id(&self) -> ScResult<i16> {
        let max = self
            .shapes
            .iter()
            .map(|s| s.id)
            .max()
            .unwrap_or(0)
            .max(CLONED_SHAPE_ID_FLOOR);
        max.checked_add(1)
            .ok_or_else(|| ScError::validation("shape id space exhausted"))
    }

    fn next_movie_clip_id(&self) -> ScResult<i16> {
        let max = self.movie_clips.iter().map(|c| c.id).max().unwrap_or(0);
        max.checked_add(1)
            .ok_or_else(|| ScError::validation("movie clip id space exhausted"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/edit.rs"]
mod tests;
