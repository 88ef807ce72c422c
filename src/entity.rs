//! Typed entities decoded from the record stream.
//!
//! Entities reference each other by numeric id or arena index, never by ownership: a chunk
//! names its texture by id, a clip lists shape indices, an export resolves to a clip index.

pub(crate) mod export;
pub(crate) mod movie_clip;
pub(crate) mod shape;
pub(crate) mod texture;

/// Position of a chunk: the owning shape's index in [`crate::Container::shapes`] and the chunk's
/// index within that shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ChunkRef {
    /// Index of the owning shape.
    pub shape: usize,
    /// Index of the chunk inside the shape.
    pub chunk: usize,
}

/// Handle to one entity of a [`crate::Container`], by kind and arena index.
///
/// This is also the identity used by the pending-change set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum EntityRef {
    /// Index into [`crate::Container::textures`] (equal to the texture id).
    Texture(usize),
    /// Index into [`crate::Container::shapes`].
    Shape(usize),
    /// One chunk of a shape.
    Chunk(ChunkRef),
    /// Index into [`crate::Container::movie_clips`].
    MovieClip(usize),
    /// Index into [`crate::Container::exports`].
    Export(usize),
}
