//! Geometry compositor: polygon-clipped texture extraction, per-chunk affine mapping and
//! straight-alpha compositing into shape space.

pub(crate) mod affine;
pub(crate) mod compositor;
pub(crate) mod options;
pub(crate) mod png;
pub(crate) mod raster;
