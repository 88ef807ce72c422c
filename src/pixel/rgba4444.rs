use crate::foundation::core::Raster;

pub(super) fn decode(packed: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(packed.len() * 2);
    for word in packed.chunks_exact(2) {
        let color = u16::from_le_bytes([word[0], word[1]]);
        rgba.extend_from_slice(&[
            (((color >> 12) & 0xF) << 4) as u8,
            (((color >> 8) & 0xF) << 4) as u8,
            (((color >> 4) & 0xF) << 4) as u8,
            ((color & 0xF) << 4) as u8,
        ]);
    }
    rgba
}

pub(super) fn encode(raster: &Raster) -> Vec<u8> {
    let mut out = Vec::with_capacity(raster.as_raw().len() / 2);
    for px in raster.pixels() {
        let [r, g, b, a] = px.0.map(|c| u16::from(c >> 4) & 0xF);
        let color = (r << 12) | (g << 8) | (b << 4) | a;
        out.extend_from_slice(&color.to_le_bytes());
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/rgba4444.rs"]
mod tests;
