use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::codec::decode;
use crate::codec::header::HeaderCounts;
use crate::container::layout::{ContainerLayout, LoadOptions};
use crate::entity::export::Export;
use crate::entity::movie_clip::MovieClip;
use crate::entity::shape::{Shape, ShapeChunk};
use crate::entity::texture::Texture;
use crate::entity::{ChunkRef, EntityRef};
use crate::foundation::error::{ScError, ScResult};

/// A decoded SC container together with the bookkeeping needed to patch its backing file.
///
/// Entities live in per-kind arenas and are only ever appended. Edits mark entities dirty in an
/// insertion-ordered, deduplicated pending set which [`Container::save`] drains.
#[derive(Debug)]
pub struct Container {
    pub(crate) path: PathBuf,
    pub(crate) layout: ContainerLayout,
    pub(crate) counts: HeaderCounts,
    pub(crate) textures: Vec<Texture>,
    pub(crate) shapes: Vec<Shape>,
    pub(crate) movie_clips: Vec<MovieClip>,
    pub(crate) exports: Vec<Export>,
    pub(crate) eof_offset: u64,
    pub(crate) texture_eof_offset: Option<u64>,
    pub(crate) export_section_offset: u64,
    pub(crate) pending: Vec<EntityRef>,
}

impl Container {
    /// Open a container with default [`LoadOptions`].
    pub fn open(path: impl AsRef<Path>) -> ScResult<Self> {
        Self::open_with(path, &LoadOptions::default())
    }

    /// Open a container, picking up the split companion file per `opts`.
    #[tracing::instrument(skip(opts), fields(path = %path.as_ref().display()))]
    pub fn open_with(path: impl AsRef<Path>, opts: &LoadOptions) -> ScResult<Self> {
        let path = path.as_ref();
        let primary = std::fs::read(path)
            .with_context(|| format!("read container '{}'", path.display()))?;
        match opts.resolve(path) {
            ContainerLayout::Single => Self::from_bytes(path, &primary),
            ContainerLayout::Split { texture_path } => {
                let textures = std::fs::read(&texture_path).with_context(|| {
                    format!("read companion texture file '{}'", texture_path.display())
                })?;
                Self::from_split_bytes(path, &primary, texture_path, &textures)
            }
        }
    }

    /// Decode a single-file container from memory.
    ///
    /// `path` names the backing file that clones re-read their source records from; it must
    /// hold the same bytes as `primary`.
    pub fn from_bytes(path: impl Into<PathBuf>, primary: &[u8]) -> ScResult<Self> {
        decode::decode(path.into(), ContainerLayout::Single, primary, None)
    }

    /// Decode a split container from its primary and companion streams.
    pub fn from_split_bytes(
        path: impl Into<PathBuf>,
        primary: &[u8],
        texture_path: impl Into<PathBuf>,
        textures: &[u8],
    ) -> ScResult<Self> {
        let layout = ContainerLayout::Split {
            texture_path: texture_path.into(),
        };
        decode::decode(path.into(), layout, primary, Some(textures))
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Storage layout detected at load time.
    pub fn layout(&self) -> &ContainerLayout {
        &self.layout
    }

    /// Header counts as read at load time.
    pub fn header_counts(&self) -> HeaderCounts {
        self.counts
    }

    /// Textures in id order.
    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    /// Shapes in record order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Movie clips in record order.
    pub fn movie_clips(&self) -> &[MovieClip] {
        &self.movie_clips
    }

    /// Exports in export-block order.
    pub fn exports(&self) -> &[Export] {
        &self.exports
    }

    /// Offset of the terminating zero record, where the next record is appended.
    pub fn eof_offset(&self) -> u64 {
        self.eof_offset
    }

    /// Offset of the export count.
    pub fn export_section_offset(&self) -> u64 {
        self.export_section_offset
    }

    /// Dirty entities in the order they will be flushed, exports aside.
    pub fn pending_changes(&self) -> &[EntityRef] {
        &self.pending
    }

    /// Texture by id.
    pub fn texture(&self, id: u16) -> Option<&Texture> {
        self.textures.get(usize::from(id))
    }

    /// Arena index of the shape with `id`.
    pub fn shape_index(&self, id: i16) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    /// Shape by id.
    pub fn shape_by_id(&self, id: i16) -> Option<&Shape> {
        self.shape_index(id).map(|i| &self.shapes[i])
    }

    /// Arena index of the clip with `id`.
    pub fn movie_clip_index(&self, id: i16) -> Option<usize> {
        self.movie_clips.iter().position(|c| c.id == id)
    }

    /// Movie clip by id.
    pub fn movie_clip_by_id(&self, id: i16) -> Option<&MovieClip> {
        self.movie_clip_index(id).map(|i| &self.movie_clips[i])
    }

    /// Arena index of the export named `name`.
    pub fn export_index(&self, name: &str) -> Option<usize> {
        self.exports.iter().position(|e| e.name == name)
    }

    /// Export by name.
    pub fn export_by_name(&self, name: &str) -> Option<&Export> {
        self.export_index(name).map(|i| &self.exports[i])
    }

    /// Chunk behind a [`ChunkRef`].
    pub fn chunk(&self, at: ChunkRef) -> ScResult<&ShapeChunk> {
        self.shapes
            .get(at.shape)
            .and_then(|s| s.chunks.get(at.chunk))
            .ok_or_else(|| {
                ScError::unknown_entity(format!("chunk {} of shape index {}", at.chunk, at.shape))
            })
    }

    /// Mark an entity dirty. Marking it twice keeps the first position.
    pub(crate) fn add_change(&mut self, entity: EntityRef) {
        if !self.pending.contains(&entity) {
            self.pending.push(entity);
        }
    }

    /// Move every tracked offset at or past `at` forward by `delta` bytes.
    pub(crate) fn shift_offsets(&mut self, at: u64, delta: u64) {
        for t in &mut self.textures {
            t.offset.shift_from(at, delta);
        }
        for s in &mut self.shapes {
            s.offset.shift_from(at, delta);
            for c in &mut s.chunks {
                c.offset.shift_from(at, delta);
            }
        }
        for c in &mut self.movie_clips {
            c.offset.shift_from(at, delta);
        }
        for e in &mut self.exports {
            e.offset.shift_from(at, delta);
        }
        if self.eof_offset >= at {
            self.eof_offset += delta;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/model.rs"]
mod tests;
