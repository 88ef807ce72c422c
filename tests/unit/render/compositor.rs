use super::*;
use crate::container::model::Container;
use crate::fixture::{FixtureChunk, ScFixture, px};

const RED: [u8; 4] = [200, 10, 10, 255];
const GREEN: [u8; 4] = [10, 200, 10, 255];

fn tri(texture_id: u8, at: i32, scale: i32) -> FixtureChunk {
    FixtureChunk::plain(
        texture_id,
        &[
            (px(at), px(at)),
            (px(at + 4 * scale), px(at)),
            (px(at), px(at + 4 * scale)),
        ],
        &[(0, 0), (4, 0), (0, 4)],
    )
}

fn container(chunks: &[FixtureChunk]) -> Container {
    let bytes = ScFixture::new()
        .solid_texture(4, 4, RED)
        .solid_texture(4, 4, GREEN)
        .texture(7, 4, 4, &[])
        .shape(1, chunks)
        .build();
    Container::from_bytes("t.sc", &bytes).unwrap()
}

fn shape(c: &Container) -> &Shape {
    &c.shapes()[0]
}

#[test]
fn identity_chunk_copies_the_texture_region() {
    let c = container(&[tri(0, 0, 1)]);
    let out = render_shape(shape(&c), c.textures(), &RenderOptions::default()).unwrap();
    assert_eq!(out.dimensions(), (4, 4));
    assert_eq!(out.get_pixel(0, 0).0, RED);
    assert_eq!(out.get_pixel(1, 1).0, RED);
    assert_eq!(out.get_pixel(3, 3).0, [0; 4]);
}

#[test]
fn chunk_is_scaled_into_shape_space() {
    let c = container(&[tri(0, 0, 2)]);
    let out = render_shape(shape(&c), c.textures(), &RenderOptions::default()).unwrap();
    assert_eq!(out.dimensions(), (8, 8));
    assert_eq!(out.get_pixel(1, 1).0, RED);
    assert_eq!(out.get_pixel(5, 1).0, RED);
    assert_eq!(out.get_pixel(7, 7).0, [0; 4]);
}

#[test]
fn output_origin_is_the_xy_bounding_box() {
    let c = container(&[tri(0, 10, 1)]);
    let out = render_shape(shape(&c), c.textures(), &RenderOptions::default()).unwrap();
    assert_eq!(out.dimensions(), (4, 4));
    assert_eq!(out.get_pixel(0, 0).0, RED);
}

#[test]
fn later_chunks_draw_over_earlier_ones() {
    let c = container(&[tri(1, 0, 1), tri(0, 0, 1)]);
    let out = render_shape(shape(&c), c.textures(), &RenderOptions::default()).unwrap();
    assert_eq!(out.get_pixel(1, 0).0, RED);
}

#[test]
fn placeholder_chunks_are_skipped() {
    let c = container(&[tri(0, 0, 1), tri(2, 4, 1)]);
    let out = render_shape(shape(&c), c.textures(), &RenderOptions::default()).unwrap();
    assert_eq!(out.dimensions(), (8, 8));
    assert_eq!(out.get_pixel(0, 0).0, RED);
    assert_eq!(out.get_pixel(4, 4).0, [0; 4]);
}

#[test]
fn outlines_are_stroked_on_request() {
    let c = container(&[tri(0, 0, 2)]);
    let opts = RenderOptions {
        show_polygons: true,
        outline_rgba: [1, 2, 3, 255],
        outline_width: 2,
    };
    let out = render_shape(shape(&c), c.textures(), &opts).unwrap();
    assert_eq!(out.get_pixel(3, 0).0, [1, 2, 3, 255]);
    assert_eq!(out.get_pixel(1, 1).0, RED);
}

#[test]
fn shape_with_a_two_point_chunk_is_degenerate() {
    let c = container(&[FixtureChunk::plain(
        0,
        &[(0, 0), (px(2), 0)],
        &[(0, 0), (2, 0)],
    )]);
    assert!(matches!(
        render_shape(shape(&c), c.textures(), &RenderOptions::default()),
        Err(ScError::DegenerateChunk(_))
    ));
    assert!(matches!(
        render_chunk(&shape(&c).chunks()[0], c.textures(), &RenderOptions::default()),
        Err(ScError::DegenerateChunk(_))
    ));
}

#[test]
fn render_chunk_returns_the_uv_cutout() {
    let c = container(&[tri(1, 10, 3)]);
    let chunk = &shape(&c).chunks()[0];
    let out = render_chunk(chunk, c.textures(), &RenderOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(out.dimensions(), (4, 4));
    assert_eq!(out.get_pixel(0, 0).0, GREEN);
    assert_eq!(out.get_pixel(3, 3).0, [0; 4]);
}

#[test]
fn oversized_shape_is_rejected() {
    let c = container(&[FixtureChunk::plain(
        0,
        &[
            (-2_000_000_000, -2_000_000_000),
            (2_000_000_000, -2_000_000_000),
            (-2_000_000_000, 2_000_000_000),
        ],
        &[(0, 0), (4, 0), (0, 4)],
    )]);
    assert!(matches!(
        render_shape(shape(&c), c.textures(), &RenderOptions::default()),
        Err(ScError::Validation(_))
    ));
}

#[test]
fn render_chunk_is_limited_to_the_texture() {
    let c = container(&[FixtureChunk::plain(
        0,
        &[(0, 0), (px(4), 0), (0, px(4))],
        &[(2, 2), (60_000, 2), (2, 60_000)],
    )]);
    let out = render_chunk(&shape(&c).chunks()[0], c.textures(), &RenderOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(out.dimensions(), (2, 2));
    assert_eq!(out.get_pixel(0, 0).0, RED);
}

#[test]
fn render_chunk_outside_the_texture_is_empty() {
    let c = container(&[FixtureChunk::plain(
        0,
        &[(0, 0), (px(4), 0), (0, px(4))],
        &[(20, 20), (24, 20), (20, 24)],
    )]);
    let out = render_chunk(&shape(&c).chunks()[0], c.textures(), &RenderOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(out.dimensions(), (1, 1));
    assert_eq!(out.get_pixel(0, 0).0, [0; 4]);
}

#[test]
fn render_chunk_of_a_placeholder_has_no_image() {
    let c = container(&[tri(2, 0, 1)]);
    let out = render_chunk(&shape(&c).chunks()[0], c.textures(), &RenderOptions::default());
    assert!(out.unwrap().is_none());
}

#[test]
fn missing_texture_is_an_unknown_entity() {
    let c = container(&[tri(9, 0, 1)]);
    assert!(matches!(
        render_chunk(&shape(&c).chunks()[0], c.textures(), &RenderOptions::default()),
        Err(ScError::UnknownEntity(_))
    ));
}

#[test]
fn replace_region_clears_before_drawing() {
    let mut texture = Raster::from_pixel(4, 4, image::Rgba(RED));
    let uv = [
        Point::new(0.0, 0.0),
        Point::new(2.0, 0.0),
        Point::new(2.0, 2.0),
        Point::new(0.0, 2.0),
    ];
    let replacement = Raster::from_pixel(2, 2, image::Rgba([0, 0, 255, 100]));
    replace_region(&mut texture, &uv, &replacement).unwrap();
    assert_eq!(texture.get_pixel(1, 1).0, [0, 0, 255, 100]);
    assert_eq!(texture.get_pixel(3, 3).0, RED);
    assert_eq!(texture.get_pixel(2, 0).0, RED);
}

#[test]
fn replace_region_outside_the_texture_is_a_no_op() {
    let mut texture = Raster::from_pixel(4, 4, image::Rgba(RED));
    let uv = [
        Point::new(10.0, 10.0),
        Point::new(12.0, 10.0),
        Point::new(10.0, 12.0),
    ];
    replace_region(&mut texture, &uv, &Raster::new(2, 2)).unwrap();
    assert!(texture.pixels().all(|p| p.0 == RED));
}

#[test]
fn replace_region_needs_a_polygon() {
    let mut texture = Raster::new(2, 2);
    let line = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
    assert!(matches!(
        replace_region(&mut texture, &line, &Raster::new(1, 1)),
        Err(ScError::DegenerateChunk(_))
    ));
}
