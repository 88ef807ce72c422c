use std::fmt;

use crate::container::model::Container;
use crate::entity::shape::ChunkKind;
use crate::entity::{ChunkRef, EntityRef};
use crate::foundation::core::{Offset, Point, Raster};
use crate::foundation::error::{ScError, ScResult};
use crate::render::compositor;
use crate::render::options::RenderOptions;

/// Summary of one entity, printed by `scedit info` as text or JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityInfo {
    /// A texture record.
    Texture {
        /// Texture id.
        id: u16,
        /// Record type byte.
        record_type: u8,
        /// Codec tag.
        format_tag: u8,
        /// Codec name, `None` for placeholders.
        format: Option<&'static str>,
        /// Width in pixels.
        width: u16,
        /// Height in pixels.
        height: u16,
        /// Record location.
        offset: Offset,
    },
    /// A shape record.
    Shape {
        /// Shape id.
        id: i16,
        /// Number of chunks.
        chunks: usize,
        /// Record location.
        offset: Offset,
    },
    /// One chunk of a shape.
    Chunk {
        /// Index within the shape.
        index: usize,
        /// Owning shape id.
        shape_id: i16,
        /// Referenced texture id.
        texture_id: u8,
        /// UV storage kind.
        uv_kind: ChunkKind,
        /// Polygon vertex count.
        points: usize,
        /// Shape-space vertices in pixels.
        xy: Vec<Point>,
        /// Texture-space vertices in pixels.
        uv: Vec<Point>,
    },
    /// A movie clip record.
    MovieClip {
        /// Clip id.
        id: i16,
        /// Record sub-format.
        record_type: u8,
        /// Declared frame count.
        frame_count: i16,
        /// Display-list length.
        entries: usize,
        /// Ids of the shapes on the display list.
        shape_ids: Vec<i16>,
        /// Record location.
        offset: Offset,
    },
    /// An export entry.
    Export {
        /// Export name.
        name: String,
        /// Target clip id.
        id: i16,
        /// Whether a clip with that id was loaded.
        resolved: bool,
    },
}

impl fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Texture {
                id,
                record_type,
                format_tag,
                format,
                width,
                height,
                ..
            } => {
                writeln!(f, "TextureId: {id}")?;
                writeln!(f, "ImageType: {record_type}")?;
                match format {
                    Some(name) => writeln!(f, "ImageFormat: {name}")?,
                    None => writeln!(f, "ImageFormat: unsupported (tag {format_tag})")?,
                }
                writeln!(f, "Width: {width}")?;
                writeln!(f, "Height: {height}")
            }
            Self::Shape { id, chunks, .. } => {
                writeln!(f, "ShapeId: {id}")?;
                writeln!(f, "Polygons: {chunks}")
            }
            Self::Chunk {
                index,
                shape_id,
                texture_id,
                points,
                ..
            } => {
                writeln!(f, "ChunkId: {index}")?;
                writeln!(f, "ShapeId (ref): {shape_id}")?;
                writeln!(f, "TextureId (ref): {texture_id}")?;
                writeln!(f, "Points: {points}")
            }
            Self::MovieClip {
                id,
                record_type,
                frame_count,
                entries,
                ..
            } => {
                writeln!(f, "MovieClipId: {id}")?;
                writeln!(f, "ClipType: {record_type}")?;
                writeln!(f, "Frames: {frame_count}")?;
                writeln!(f, "Entries: {entries}")
            }
            Self::Export { name, id, resolved } => {
                writeln!(f, "Export: {name}")?;
                writeln!(f, "MovieClipId (ref): {id}")?;
                if !resolved {
                    writeln!(f, "(unresolved)")?;
                }
                Ok(())
            }
        }
    }
}

impl Container {
    /// Summary of `entity`.
    pub fn describe(&self, entity: EntityRef) -> ScResult<EntityInfo> {
        Ok(match entity {
            EntityRef::Texture(i) => {
                let t = self
                    .textures
                    .get(i)
                    .ok_or_else(|| missing(entity))?;
                EntityInfo::Texture {
                    id: t.id,
                    record_type: t.record_type,
                    format_tag: t.format_tag,
                    format: t.format().map(|f| f.name()),
                    width: t.width,
                    height: t.height,
                    offset: t.offset,
                }
            }
            EntityRef::Shape(i) => {
                let s = self.shapes.get(i).ok_or_else(|| missing(entity))?;
                EntityInfo::Shape {
                    id: s.id,
                    chunks: s.chunks.len(),
                    offset: s.offset,
                }
            }
            EntityRef::Chunk(at) => {
                let c = self.chunk(at)?;
                EntityInfo::Chunk {
                    index: c.index,
                    shape_id: c.shape_id,
                    texture_id: c.texture_id,
                    uv_kind: c.kind,
                    points: c.points_xy.len(),
                    xy: c.points_xy.clone(),
                    uv: c.points_uv.clone(),
                }
            }
            EntityRef::MovieClip(i) => {
                let c = self.movie_clips.get(i).ok_or_else(|| missing(entity))?;
                EntityInfo::MovieClip {
                    id: c.id,
                    record_type: c.record_type,
                    frame_count: c.frame_count,
                    entries: c.entries.len(),
                    shape_ids: c.shapes().map(|s| self.shapes[s].id).collect(),
                    offset: c.offset,
                }
            }
            EntityRef::Export(i) => {
                let e = self.exports.get(i).ok_or_else(|| missing(entity))?;
                EntityInfo::Export {
                    name: e.name.clone(),
                    id: e.id,
                    resolved: e.movie_clip.is_some(),
                }
            }
        })
    }

    /// Display name of `entity`: the export name for exports, `"<Kind> <id>"` otherwise.
    pub fn name(&self, entity: EntityRef) -> ScResult<String> {
        Ok(match entity {
            EntityRef::Texture(i) => {
                let t = self.textures.get(i).ok_or_else(|| missing(entity))?;
                format!("Texture {}", t.id)
            }
            EntityRef::Shape(i) => {
                let s = self.shapes.get(i).ok_or_else(|| missing(entity))?;
                format!("Shape {}", s.id)
            }
            EntityRef::Chunk(at) => format!("Chunk {}", self.chunk(at)?.index),
            EntityRef::MovieClip(i) => {
                let c = self.movie_clips.get(i).ok_or_else(|| missing(entity))?;
                format!("MovieClip {}", c.id)
            }
            EntityRef::Export(i) => {
                let e = self.exports.get(i).ok_or_else(|| missing(entity))?;
                e.name.clone()
            }
        })
    }

    /// Rasterize `entity`. Clips and exports have no image and yield `None`.
    #[tracing::instrument(skip(self, opts))]
    pub fn render(&self, entity: EntityRef, opts: &RenderOptions) -> ScResult<Option<Raster>> {
        match entity {
            EntityRef::Texture(i) => {
                let t = self.textures.get(i).ok_or_else(|| missing(entity))?;
                let image = t
                    .image()
                    .ok_or(ScError::UnsupportedPixelFormat(t.format_tag))?;
                Ok(Some(image.clone()))
            }
            EntityRef::Shape(i) => {
                let s = self.shapes.get(i).ok_or_else(|| missing(entity))?;
                compositor::render_shape(s, &self.textures, opts).map(Some)
            }
            EntityRef::Chunk(at) => compositor::render_chunk(self.chunk(at)?, &self.textures, opts),
            EntityRef::MovieClip(_) | EntityRef::Export(_) => Ok(None),
        }
    }

    /// Every entity in arena order: textures, shapes with their chunks, clips, exports.
    pub fn entities(&self) -> Vec<EntityRef> {
        let mut out = Vec::new();
        out.extend((0..self.textures.len()).map(EntityRef::Texture));
        for (shape, s) in self.shapes.iter().enumerate() {
            out.push(EntityRef::Shape(shape));
            out.extend(
                (0..s.chunks.len()).map(|chunk| EntityRef::Chunk(ChunkRef { shape, chunk })),
            );
        }
        out.extend((0..self.movie_clips.len()).map(EntityRef::MovieClip));
        out.extend((0..self.exports.len()).map(EntityRef::Export));
        out
    }
}

fn missing(entity: EntityRef) -> ScError {
    ScError::unknown_entity(format!("{entity:?}"))
}

#[cfg(test)]
#[path = "../../tests/unit/container/describe.rs"]
mod tests;
