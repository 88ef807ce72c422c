/// Knobs for [`crate::Container::render`], [`crate::render_shape`] and [`crate::render_chunk`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Stroke each chunk's polygon outline over the result.
    pub show_polygons: bool,
    /// Outline color, straight-alpha RGBA.
    pub outline_rgba: [u8; 4],
    /// Outline brush size in pixels.
    pub outline_width: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_polygons: false,
            outline_rgba: [169, 169, 169, 255],
            outline_width: 1,
        }
    }
}
