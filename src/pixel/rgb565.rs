use crate::foundation::core::Raster;

pub(super) fn decode(packed: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(packed.len() * 2);
    for word in packed.chunks_exact(2) {
        let color = u16::from_le_bytes([word[0], word[1]]);
        rgba.extend_from_slice(&[
            (((color >> 11) & 0x1F) << 3) as u8,
            (((color >> 5) & 0x3F) << 2) as u8,
            ((color & 0x1F) << 3) as u8,
            255,
        ]);
    }
    rgba
}

// Alpha is dropped.
pub(super) fn encode(raster: &Raster) -> Vec<u8> {
    let mut out = Vec::with_capacity(raster.as_raw().len() / 2);
    for px in raster.pixels() {
        let [r, g, b, _] = px.0;
        let color = ((u16::from(r >> 3) & 0x1F) << 11)
            | ((u16::from(g >> 2) & 0x3F) << 5)
            | (u16::from(b >> 3) & 0x1F);
        out.extend_from_slice(&color.to_le_bytes());
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/rgb565.rs"]
mod tests;
