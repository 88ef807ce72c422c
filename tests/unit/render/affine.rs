use super::*;
use crate::container::model::Container;
use crate::fixture::{FixtureChunk, ScFixture, px};

fn approx(a: Affine, b: [f64; 6]) {
    for (x, y) in a.as_coeffs().iter().zip(b) {
        assert!((x - y).abs() < 1e-9, "{:?} != {b:?}", a.as_coeffs());
    }
}

#[test]
fn scale_between_triangles() {
    let from = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(0.0, 10.0),
    ];
    let to = [
        Point::new(0.0, 0.0),
        Point::new(20.0, 0.0),
        Point::new(0.0, 20.0),
    ];
    approx(affine_from_basis(from, to).unwrap(), [2.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
}

#[test]
fn maps_vertices_and_interior_points() {
    let from = [
        Point::new(1.0, 1.0),
        Point::new(3.0, 1.0),
        Point::new(1.0, 5.0),
    ];
    let to = [
        Point::new(10.0, 20.0),
        Point::new(10.0, 24.0),
        Point::new(2.0, 20.0),
    ];
    let t = affine_from_basis(from, to).unwrap();
    for (a, b) in from.iter().zip(to) {
        let mapped = t * *a;
        assert!((mapped - b).hypot() < 1e-9);
    }
    let centroid = t * Point::new(5.0 / 3.0, 7.0 / 3.0);
    assert!((centroid - Point::new(22.0 / 3.0, 64.0 / 3.0)).hypot() < 1e-9);
}

#[test]
fn collinear_source_is_degenerate() {
    let from = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(2.0, 2.0),
    ];
    let to = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
    ];
    assert!(matches!(
        affine_from_basis(from, to),
        Err(ScError::DegenerateChunk(_))
    ));
}

#[test]
fn chunk_transform_is_relative_to_the_uv_origin() {
    let bytes = ScFixture::new()
        .solid_texture(16, 16, [1, 2, 3, 255])
        .shape(
            1,
            &[FixtureChunk::plain(
                0,
                &[(0, 0), (px(4), 0), (0, px(4))],
                &[(4, 4), (8, 4), (4, 8)],
            )],
        )
        .build();
    let c = Container::from_bytes("t.sc", &bytes).unwrap();
    let chunk = &c.shapes()[0].chunks()[0];
    approx(
        chunk_transform(chunk, Point::new(4.0, 4.0)).unwrap(),
        [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    );
    approx(
        chunk_transform(chunk, Point::ZERO).unwrap(),
        [1.0, 0.0, 0.0, 1.0, -4.0, -4.0],
    );
}

#[test]
fn chunk_with_two_points_has_no_transform() {
    let bytes = ScFixture::new()
        .solid_texture(4, 4, [1, 2, 3, 255])
        .shape(1, &[FixtureChunk::plain(0, &[(0, 0), (px(1), 0)], &[(0, 0), (1, 0)])])
        .build();
    let c = Container::from_bytes("t.sc", &bytes).unwrap();
    assert!(matches!(
        chunk_transform(&c.shapes()[0].chunks()[0], Point::ZERO),
        Err(ScError::DegenerateChunk(_))
    ));
}
