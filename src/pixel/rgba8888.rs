use crate::foundation::core::Raster;

// Disk order R, G, B, A already matches the raster's in-memory layout.
pub(super) fn decode(packed: &[u8]) -> Vec<u8> {
    packed.to_vec()
}

pub(super) fn encode(raster: &Raster) -> Vec<u8> {
    raster.as_raw().clone()
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/rgba8888.rs"]
mod tests;
