use super::*;
use crate::fixture::{FixtureChunk, ScFixture, px};
use crate::foundation::core::Offset;

fn tri(texture_id: u8) -> FixtureChunk {
    FixtureChunk::plain(
        texture_id,
        &[(0, 0), (px(4), 0), (0, px(4))],
        &[(0, 0), (4, 0), (0, 4)],
    )
}

fn fixture() -> ScFixture {
    ScFixture::new()
        .export(7, "hero")
        .solid_texture(4, 4, [200, 10, 10, 255])
        .solid_texture(8, 2, [10, 200, 10, 255])
        .texture(6, 2, 2, &[])
        .shape(100, &[tri(0)])
        .shape(101, &[tri(1), tri(0)])
        .movie_clip(10, 5, 1, &[100], &[])
        .movie_clip(10, 7, 2, &[100, 101, 100, 5], &[(0, "idle")])
}

fn open(fixture: &ScFixture) -> (tempfile::TempDir, Container) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ui.sc");
    std::fs::write(&path, fixture.build()).unwrap();
    let container = Container::open(&path).unwrap();
    (dir, container)
}

#[test]
fn duplicate_texture_copies_the_live_raster() {
    let (_dir, mut c) = open(&fixture());
    let at = ChunkRef { shape: 0, chunk: 0 };
    let patch = Raster::from_pixel(4, 4, image::Rgba([0, 0, 255, 255]));
    c.replace_chunk_pixels(at, &patch).unwrap();

    let id = c.duplicate_texture(0).unwrap();
    assert_eq!(id, 3);
    let copy = c.texture(3).unwrap();
    assert_eq!(copy.image(), c.texture(0).unwrap().image());
    assert_eq!(
        copy.offset(),
        Offset::ClonedFrom(c.texture(0).unwrap().offset().existing().unwrap())
    );
    assert_eq!(
        c.pending_changes(),
        &[EntityRef::Texture(0), EntityRef::Texture(3)]
    );
}

#[test]
fn placeholder_textures_cannot_be_duplicated() {
    let (_dir, mut c) = open(&fixture());
    assert!(matches!(
        c.duplicate_texture(2),
        Err(ScError::UnsupportedPixelFormat(6))
    ));
    assert!(matches!(
        c.duplicate_texture(9),
        Err(ScError::UnknownEntity(_))
    ));
    assert_eq!(c.textures().len(), 3);
    assert!(c.pending_changes().is_empty());
}

#[test]
fn add_texture_is_pending() {
    let (_dir, mut c) = open(&fixture());
    let id = c
        .add_texture(Raster::new(3, 3), PixelFormat::Rgb565)
        .unwrap();
    assert_eq!(id, 3);
    let t = c.texture(3).unwrap();
    assert_eq!(t.offset(), Offset::Pending);
    assert_eq!(t.format(), Some(PixelFormat::Rgb565));
    assert_eq!(t.record_type(), 1);
}

#[test]
fn duplicate_shape_allocates_above_the_floor() {
    let (_dir, mut c) = open(&fixture());
    let index = c.duplicate_shape(101).unwrap();
    let shape = &c.shapes()[index];
    assert_eq!(shape.id(), 20001);
    assert_eq!(
        shape.offset(),
        Offset::ClonedFrom(c.shapes()[1].offset().existing().unwrap())
    );
    assert_eq!(shape.chunks().len(), 2);
    for chunk in shape.chunks() {
        assert_eq!(chunk.shape_id(), 20001);
        assert!(matches!(chunk.offset(), Offset::ClonedFrom(_)));
    }

    let again = c.duplicate_shape(20001).unwrap();
    assert_eq!(c.shapes()[again].id(), 20002);
    assert_eq!(c.shapes()[again].offset(), shape_offset(&c, 1));
}

fn shape_offset(c: &Container, index: usize) -> Offset {
    Offset::ClonedFrom(c.shapes()[index].offset().existing().unwrap())
}

#[test]
fn shape_ids_above_the_floor_keep_counting() {
    let (_dir, mut c) = open(&ScFixture::new().shape(25000, &[]).shape(3, &[]));
    let index = c.duplicate_shape(3).unwrap();
    assert_eq!(c.shapes()[index].id(), 25001);
}

#[test]
fn clones_reparse_the_backing_file() {
    let (_dir, mut c) = open(&fixture());
    c.set_chunk_texture_id(ChunkRef { shape: 0, chunk: 0 }, 1)
        .unwrap();
    let index = c.duplicate_shape(100).unwrap();
    assert_eq!(c.shapes()[index].chunks()[0].texture_id(), 0);
}

#[test]
fn duplicate_movie_clip_clones_each_referenced_shape_once() {
    let (_dir, mut c) = open(&fixture());
    let index = c.duplicate_movie_clip(1).unwrap();
    let clip = &c.movie_clips()[index];
    assert_eq!(clip.id(), 8);
    assert_eq!(clip.frame_count(), 2);

    let ids: Vec<i16> = clip.entries().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![20001, 20002, 20001, 5]);
    assert_eq!(clip.entries()[3].shape, None);
    assert_eq!(c.shapes().len(), 4);
    assert_eq!(c.shapes()[2].id(), 20001);
    assert_eq!(c.shapes()[3].id(), 20002);
    assert_eq!(c.shapes()[3].chunks().len(), 2);
    assert_eq!(
        c.pending_changes(),
        &[
            EntityRef::Shape(2),
            EntityRef::Shape(3),
            EntityRef::MovieClip(2)
        ]
    );
}

#[test]
fn duplicate_via_export_registers_a_pending_export() {
    let (_dir, mut c) = open(&fixture());
    let (clip, export) = c.duplicate_movie_clip_via_export("hero", "hero_copy").unwrap();
    assert_eq!(c.movie_clips()[clip].id(), 8);
    let e = &c.exports()[export];
    assert_eq!(e.name(), "hero_copy");
    assert_eq!(e.id(), 8);
    assert_eq!(e.movie_clip(), Some(clip));
    assert_eq!(e.offset(), Offset::Pending);
    assert_eq!(c.pending_changes().last(), Some(&EntityRef::Export(export)));
}

#[test]
fn name_conflicts_leave_the_container_untouched() {
    let (_dir, mut c) = open(&fixture());
    for name in ["", "hero"] {
        assert!(matches!(
            c.duplicate_movie_clip_via_export("hero", name),
            Err(ScError::NameConflict(_))
        ));
    }
    assert!(matches!(
        c.duplicate_movie_clip_via_export("villain", "x"),
        Err(ScError::UnknownEntity(_))
    ));
    assert_eq!(c.movie_clips().len(), 2);
    assert_eq!(c.shapes().len(), 2);
    assert_eq!(c.exports().len(), 1);
    assert!(c.pending_changes().is_empty());
}

#[test]
fn replace_chunk_pixels_paints_inside_the_polygon() {
    let (_dir, mut c) = open(&fixture());
    let blue = Raster::from_pixel(4, 4, image::Rgba([0, 0, 255, 255]));
    c.replace_chunk_pixels(ChunkRef { shape: 0, chunk: 0 }, &blue)
        .unwrap();
    let image = c.texture(0).unwrap().image().unwrap();
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 255, 255]);
    assert_eq!(image.get_pixel(3, 3).0, [200, 10, 10, 255]);
    assert_eq!(c.pending_changes(), &[EntityRef::Texture(0)]);
}

#[test]
fn set_chunk_texture_id_validates_and_marks_the_chunk() {
    let (_dir, mut c) = open(&fixture());
    let at = ChunkRef { shape: 1, chunk: 1 };
    assert!(matches!(
        c.set_chunk_texture_id(at, 9),
        Err(ScError::UnknownEntity(_))
    ));
    c.set_chunk_texture_id(at, 1).unwrap();
    assert_eq!(c.chunk(at).unwrap().texture_id(), 1);
    assert_eq!(c.pending_changes(), &[EntityRef::Chunk(at)]);
}

#[test]
fn retargeting_a_cloned_chunk_marks_its_shape() {
    let (_dir, mut c) = open(&fixture());
    let shape = c.duplicate_shape(100).unwrap();
    c.set_chunk_texture_id(ChunkRef { shape, chunk: 0 }, 1)
        .unwrap();
    assert_eq!(c.pending_changes(), &[EntityRef::Shape(shape)]);
}

#[test]
fn normalized_uvs_follow_the_new_texture_size() {
    let chunk = FixtureChunk::normalized(
        0,
        &[(0, 0), (1, 0), (0, 1)],
        &[(0, 0), (65535, 0), (0, 65535)],
    );
    let (_dir, mut c) = open(&fixture().shape(102, &[chunk]));
    let at = ChunkRef { shape: 2, chunk: 0 };
    assert_eq!(c.chunk(at).unwrap().points_uv()[1], Point::new(4.0, 0.0));
    c.set_chunk_texture_id(at, 1).unwrap();
    let uv = c.chunk(at).unwrap().points_uv();
    assert_eq!(uv[1], Point::new(8.0, 0.0));
    assert_eq!(uv[2], Point::new(0.0, 2.0));
}
