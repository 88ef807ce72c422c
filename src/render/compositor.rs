use std::collections::HashMap;

use crate::entity::shape::{Shape, ShapeChunk};
use crate::entity::texture::Texture;
use crate::foundation::core::{Affine, Point, Raster, Rect};
use crate::foundation::error::{ScError, ScResult};
use crate::render::affine::chunk_transform;
use crate::render::options::RenderOptions;
use crate::render::raster::{self, PixelBounds};

/// Composite every chunk of `shape` into one raster covering the union of the chunks' XY
/// polygons.
///
/// Each chunk's texture is painted through the affine transform defined by the first three
/// vertex pairs, clipped to the chunk's UV polygon as mapped into shape space. Chunks are drawn
/// in order, later ones over earlier ones. Chunks whose texture is a placeholder contribute
/// nothing.
#[tracing::instrument(skip_all, fields(shape = shape.id, chunks = shape.chunks.len()))]
pub fn render_shape(
    shape: &Shape,
    textures: &[Texture],
    opts: &RenderOptions,
) -> ScResult<Raster> {
    let all_xy: Vec<Point> = shape
        .chunks
        .iter()
        .flat_map(|c| c.points_xy.iter().copied())
        .collect();
    let bounds = PixelBounds::from_points(&all_xy);
    let (width, height) = bounds.surface_size("shape output")?;
    let to_output = Affine::translate((-bounds.x0 as f64, -bounds.y0 as f64));

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    let mut paints: HashMap<u8, (vello_cpu::Image, Rect)> = HashMap::new();

    for chunk in &shape.chunks {
        let transform = to_output * chunk_transform(chunk, Point::ZERO)?;
        let Some(image) = chunk_texture(chunk, textures)?.image() else {
            tracing::debug!(chunk = chunk.index, "placeholder texture; chunk skipped");
            continue;
        };
        let (paint, texture_rect) = match paints.get(&chunk.texture_id) {
            Some(cached) => cached.clone(),
            None => {
                let rect = Rect::new(0.0, 0.0, f64::from(image.width()), f64::from(image.height()));
                let entry = (raster::image_paint(image)?, rect);
                paints.insert(chunk.texture_id, entry.clone());
                entry
            }
        };

        let outline: Vec<Point> = chunk.points_uv.iter().map(|p| transform * *p).collect();
        let outline_path = raster::polygon_path(&outline);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.push_clip_layer(&outline_path);
        ctx.set_transform(raster::affine_to_cpu(transform));
        ctx.set_paint(paint);
        ctx.fill_rect(&raster::rect_to_cpu(texture_rect));
        ctx.pop_layer();

        if opts.show_polygons {
            stroke_outline(&mut ctx, &outline_path, opts);
        }
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(raster::to_raster(&pixmap))
}

/// Cut a single chunk's UV polygon out of its texture, without mapping it into shape space.
///
/// The output covers the polygon's bounding box intersected with the texture. Returns `None`
/// when the texture is a placeholder with no pixels.
pub fn render_chunk(
    chunk: &ShapeChunk,
    textures: &[Texture],
    opts: &RenderOptions,
) -> ScResult<Option<Raster>> {
    if chunk.points_uv.len() < 3 {
        return Err(ScError::degenerate(format!(
            "chunk {} of shape {} has {} points; at least 3 are needed",
            chunk.index,
            chunk.shape_id,
            chunk.points_uv.len()
        )));
    }
    let Some(image) = chunk_texture(chunk, textures)?.image() else {
        return Ok(None);
    };
    let Some(region) =
        PixelBounds::from_points(&chunk.points_uv).clip_to(image.width(), image.height())
    else {
        return Ok(Some(Raster::new(1, 1)));
    };
    let (width, height) = region.surface_size("chunk cutout")?;
    let to_local = Affine::translate((-region.x0 as f64, -region.y0 as f64));
    let local: Vec<Point> = chunk.points_uv.iter().map(|p| to_local * *p).collect();
    let path = raster::polygon_path(&local);

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.push_clip_layer(&path);
    ctx.set_transform(raster::affine_to_cpu(to_local));
    ctx.set_paint(raster::image_paint(image)?);
    ctx.fill_rect(&raster::rect_to_cpu(Rect::new(
        0.0,
        0.0,
        f64::from(image.width()),
        f64::from(image.height()),
    )));
    ctx.pop_layer();
    if opts.show_polygons {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        stroke_outline(&mut ctx, &path, opts);
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(Some(raster::to_raster(&pixmap)))
}

/// Clear the polygon `uv` in `texture`, then draw `replacement` at the polygon's bounding box
/// origin, clipped to the polygon.
///
/// Only pixels the polygon covers change; everything else keeps its exact bytes.
pub(crate) fn replace_region(
    texture: &mut Raster,
    uv: &[Point],
    replacement: &Raster,
) -> ScResult<()> {
    if uv.len() < 3 {
        return Err(ScError::degenerate(format!(
            "replacement polygon has {} points; at least 3 are needed",
            uv.len()
        )));
    }
    let placed = PixelBounds::from_points(uv);
    let Some(region) = placed.clip_to(texture.width(), texture.height()) else {
        return Ok(());
    };
    let (width, height) = region.surface_size("replacement region")?;
    let to_local = Affine::translate((-region.x0 as f64, -region.y0 as f64));
    let local: Vec<Point> = uv.iter().map(|p| to_local * *p).collect();
    let path = raster::polygon_path(&local);

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    ctx.fill_path(&path);
    ctx.flush();
    let mut coverage = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut coverage);

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.push_clip_layer(&path);
    ctx.set_transform(raster::affine_to_cpu(to_local * Affine::translate(placed.origin().to_vec2())));
    ctx.set_paint(raster::image_paint(replacement)?);
    ctx.fill_rect(&raster::rect_to_cpu(Rect::new(
        0.0,
        0.0,
        f64::from(replacement.width()),
        f64::from(replacement.height()),
    )));
    ctx.pop_layer();
    ctx.flush();
    let mut patch = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut patch);

    raster::splice_covered(texture, region, &coverage, &patch);
    Ok(())
}

fn stroke_outline(
    ctx: &mut vello_cpu::RenderContext,
    path: &vello_cpu::kurbo::BezPath,
    opts: &RenderOptions,
) {
    let [r, g, b, a] = opts.outline_rgba;
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(opts.outline_width.max(1))));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
    ctx.stroke_path(path);
}

fn chunk_texture<'a>(chunk: &ShapeChunk, textures: &'a [Texture]) -> ScResult<&'a Texture> {
    textures.get(usize::from(chunk.texture_id)).ok_or_else(|| {
        ScError::unknown_entity(format!(
            "texture {} referenced by chunk {} of shape {}",
            chunk.texture_id, chunk.index, chunk.shape_id
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
