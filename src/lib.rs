//! `scedit` reads, patches and renders SC sprite asset containers.
//!
//! An SC file bundles raster textures, textured polygon shapes and movie clips behind a flat
//! stream of `[type][length][payload]` records. This crate covers the three parts of that format
//! that need binary fidelity:
//!
//! - **Record stream codec**: [`Container::open`] decodes the stream (single-file or split
//!   `<base>_tex.<ext>` layout) into an arena of [`Texture`], [`Shape`], [`MovieClip`] and
//!   [`Export`] entities cross-referenced by id.
//! - **Pixel codecs**: [`PixelFormat`] converts RGBA8888, RGBA4444 and RGB565 payloads to and from
//!   straight-alpha [`Raster`]s.
//! - **Geometry compositor**: [`render_shape`] and [`render_chunk`] map texture polygons into shape
//!   space through per-chunk affine transforms.
//!
//! Edits never rewrite the whole file. Dirty entities are tracked on the [`Container`] and
//! [`Container::save`] appends cloned records at the end-of-records offset, patches existing
//! texture payloads in place, and finally rewrites the header counts.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod codec;
mod container;
mod entity;
mod foundation;
mod patch;
mod pixel;
mod render;

pub use codec::header::HeaderCounts;
pub use container::describe::EntityInfo;
pub use container::layout::{ContainerLayout, LayoutHint, LoadOptions};
pub use container::model::Container;
pub use entity::export::Export;
pub use entity::movie_clip::{ClipEntry, FrameLabel, MovieClip};
pub use entity::shape::{ChunkKind, Shape, ShapeChunk};
pub use entity::texture::Texture;
pub use entity::{ChunkRef, EntityRef};
pub use foundation::core::{Affine, Offset, Point, Raster, Rect};
pub use foundation::error::{ScError, ScResult};
pub use pixel::PixelFormat;
pub use render::affine::affine_from_basis;
pub use render::compositor::{render_chunk, render_shape};
pub use render::options::RenderOptions;
pub use render::png::{export_raster_to_png, load_png};

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
pub(crate) mod fixture;
