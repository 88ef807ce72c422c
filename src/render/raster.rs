use std::sync::Arc;

use kurbo::PathEl;

use crate::foundation::core::{Affine, Point, Raster, Rect};
use crate::foundation::error::{ScError, ScResult};
use crate::foundation::math::{mul_div255_u16, round_px};

/// Largest surface the compositor allocates, in pixels (256 MiB of RGBA8).
pub(crate) const MAX_SURFACE_PIXELS: u64 = 1 << 26;

/// Integer pixel rectangle covering a polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PixelBounds {
    pub(crate) x0: i64,
    pub(crate) y0: i64,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl PixelBounds {
    /// Bounding box with origin and size rounded independently (ties to even). Empty or
    /// zero-area boxes clamp to 1x1.
    pub(crate) fn from_points(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self {
                x0: 0,
                y0: 0,
                width: 1,
                height: 1,
            };
        };
        let bbox = points
            .iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p));
        let size = |v: f64| round_px(v).clamp(1, i64::from(u32::MAX)) as u32;
        Self {
            x0: round_px(bbox.x0),
            y0: round_px(bbox.y0),
            width: size(bbox.width()),
            height: size(bbox.height()),
        }
    }

    pub(crate) fn origin(&self) -> Point {
        Point::new(self.x0 as f64, self.y0 as f64)
    }

    /// Intersection with the `width` x `height` rectangle at the origin, `None` when empty.
    pub(crate) fn clip_to(&self, width: u32, height: u32) -> Option<Self> {
        let x0 = self.x0.max(0);
        let y0 = self.y0.max(0);
        let x1 = (self.x0 + i64::from(self.width)).min(i64::from(width));
        let y1 = (self.y0 + i64::from(self.height)).min(i64::from(height));
        (x1 > x0 && y1 > y0).then(|| Self {
            x0,
            y0,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    /// Pixmap dimensions for a surface of this size. `what` names the surface in the error.
    pub(crate) fn surface_size(&self, what: &str) -> ScResult<(u16, u16)> {
        let pixels = u64::from(self.width) * u64::from(self.height);
        match (u16::try_from(self.width), u16::try_from(self.height)) {
            (Ok(w), Ok(h)) if pixels <= MAX_SURFACE_PIXELS => Ok((w, h)),
            _ => Err(ScError::validation(format!(
                "{what} of {}x{} pixels exceeds the render limit",
                self.width, self.height
            ))),
        }
    }
}

/// Premultiply a straight-alpha raster into a pixmap.
pub(crate) fn to_pixmap(raster: &Raster) -> ScResult<vello_cpu::Pixmap> {
    let w: u16 = raster
        .width()
        .try_into()
        .map_err(|_| ScError::validation("raster width exceeds u16"))?;
    let h: u16 = raster
        .height()
        .try_into()
        .map_err(|_| ScError::validation("raster height exceeds u16"))?;

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(usize::from(w) * usize::from(h));
    for px in raster.pixels() {
        let [r, g, b, a] = premultiply(px.0);
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 { r, g, b, a });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Read a pixmap back into a straight-alpha raster.
pub(crate) fn to_raster(pixmap: &vello_cpu::Pixmap) -> Raster {
    let mut straight = pixmap.data_as_u8_slice().to_vec();
    for px in straight.chunks_exact_mut(4) {
        let [r, g, b, a] = unpremultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&[r, g, b, a]);
    }
    let (w, h) = (u32::from(pixmap.width()), u32::from(pixmap.height()));
    Raster::from_raw(w, h, straight).unwrap_or_else(|| Raster::new(w, h))
}

fn premultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let a16 = u16::from(a);
    let mul = |c: u8| mul_div255_u16(u16::from(c), a16) as u8;
    [mul(r), mul(g), mul(b), a]
}

fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    if a == 0 {
        return [0; 4];
    }
    let a16 = u16::from(a);
    let div = |c: u8| ((u16::from(c) * 255 + a16 / 2) / a16).min(255) as u8;
    [div(r), div(g), div(b), a]
}

/// Nearest-neighbour image paint over `raster`, anchored at the user-space origin.
pub(crate) fn image_paint(raster: &Raster) -> ScResult<vello_cpu::Image> {
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(to_pixmap(raster)?)),
        sampler: vello_cpu::peniko::ImageSampler {
            quality: vello_cpu::peniko::ImageQuality::Low,
            ..vello_cpu::peniko::ImageSampler::default()
        },
    })
}

/// Closed polygon through `points`.
pub(crate) fn polygon_path(points: &[Point]) -> vello_cpu::kurbo::BezPath {
    let mut path = kurbo::BezPath::new();
    let mut it = points.iter();
    if let Some(first) = it.next() {
        path.move_to(*first);
        for p in it {
            path.line_to(*p);
        }
        path.close_path();
    }
    bezpath_to_cpu(&path)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Write `patch` into `dst` at `region`, wherever `coverage` is non-zero.
///
/// Covered texture pixels are first faded by their coverage, then `patch` is composited over
/// them. Uncovered pixels are left byte-for-byte untouched.
pub(crate) fn splice_covered(
    dst: &mut Raster,
    region: PixelBounds,
    coverage: &vello_cpu::Pixmap,
    patch: &vello_cpu::Pixmap,
) {
    let cov = coverage.data_as_u8_slice();
    let src = patch.data_as_u8_slice();
    let width = usize::from(coverage.width());
    for (i, (c, p)) in cov.chunks_exact(4).zip(src.chunks_exact(4)).enumerate() {
        let covered = u16::from(c[3]);
        if covered == 0 {
            continue;
        }
        let (x, y) = ((i % width) as i64 + region.x0, (i / width) as i64 + region.y0);
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            continue;
        };
        if x >= dst.width() || y >= dst.height() {
            continue;
        }
        let px = dst.get_pixel_mut(x, y);
        let kept = premultiply(px.0).map(|v| mul_div255_u16(u16::from(v), 255 - covered));
        let inv = 255 - u16::from(p[3]);
        let mut out = [0u8; 4];
        for k in 0..4 {
            out[k] = (u16::from(p[k]) + mul_div255_u16(kept[k], inv)).min(255) as u8;
        }
        px.0 = unpremultiply(out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
