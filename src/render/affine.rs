use crate::entity::shape::ShapeChunk;
use crate::foundation::core::{Affine, Point};
use crate::foundation::error::{ScError, ScResult};

const MIN_DETERMINANT: f64 = 1e-9;

/// Affine map taking triangle `from` onto triangle `to`, vertex for vertex.
///
/// Each triangle defines a basis matrix `[p1 - p0, p2 - p0 | p0]`; the result is
/// `basis(to) * basis(from)^-1`. Fails with [`ScError::DegenerateChunk`] when `from` is
/// collinear.
pub fn affine_from_basis(from: [Point; 3], to: [Point; 3]) -> ScResult<Affine> {
    let src = basis(from);
    if src.determinant().abs() < MIN_DETERMINANT {
        return Err(ScError::degenerate(format!(
            "source triangle {from:?} is collinear"
        )));
    }
    Ok(basis(to) * src.inverse())
}

fn basis([p0, p1, p2]: [Point; 3]) -> Affine {
    Affine::new([
        p1.x - p0.x,
        p1.y - p0.y,
        p2.x - p0.x,
        p2.y - p0.y,
        p0.x,
        p0.y,
    ])
}

/// Transform from the chunk's UV space, offset by `uv_origin`, into shape space.
pub(crate) fn chunk_transform(chunk: &ShapeChunk, uv_origin: Point) -> ScResult<Affine> {
    let (Some(uv), Some(xy)) = (first_three(&chunk.points_uv), first_three(&chunk.points_xy))
    else {
        return Err(ScError::degenerate(format!(
            "chunk {} of shape {} has {} points; at least 3 are needed",
            chunk.index,
            chunk.shape_id,
            chunk.points_xy.len().min(chunk.points_uv.len())
        )));
    };
    let local = uv.map(|p| Point::new(p.x - uv_origin.x, p.y - uv_origin.y));
    affine_from_basis(local, xy)
}

fn first_three(points: &[Point]) -> Option<[Point; 3]> {
    match points {
        [a, b, c, ..] => Some([*a, *b, *c]),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/affine.rs"]
mod tests;
