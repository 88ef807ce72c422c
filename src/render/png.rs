use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Raster;
use crate::foundation::error::ScResult;

/// Write `raster` as a PNG file, creating parent directories as needed.
pub fn export_raster_to_png(raster: &Raster, path: impl AsRef<Path>) -> ScResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    raster
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Read a PNG file into a straight-alpha RGBA raster.
pub fn load_png(path: impl AsRef<Path>) -> ScResult<Raster> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("read png '{}'", path.display()))?;
    let image = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
        .with_context(|| format!("decode png '{}'", path.display()))?;
    Ok(image.to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/render/png.rs"]
mod tests;
