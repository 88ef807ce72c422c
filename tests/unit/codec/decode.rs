use super::*;
use crate::fixture::{FixtureChunk, ScFixture, px};
use crate::foundation::core::Offset;

fn single(bytes: &[u8]) -> ScResult<Container> {
    decode(PathBuf::from("mem.sc"), ContainerLayout::Single, bytes, None)
}

fn sample() -> ScFixture {
    ScFixture::new()
        .export(10, "hero")
        .export(99, "ghost")
        .solid_texture(4, 4, [255, 0, 0, 255])
        .shape(
            5,
            &[FixtureChunk::plain(
                0,
                &[(0, 0), (px(4), 0), (0, px(4))],
                &[(0, 0), (4, 0), (0, 4)],
            )],
        )
        .raw(13, &[1, 2, 3])
        .movie_clip(10, 10, 2, &[5, 77], &[(1, "walk")])
}

#[test]
fn decodes_every_entity_kind() {
    let c = single(&sample().build()).unwrap();
    assert_eq!(c.textures().len(), 1);
    assert_eq!(c.shapes().len(), 1);
    assert_eq!(c.movie_clips().len(), 1);
    assert_eq!(c.exports().len(), 2);
    assert_eq!(c.header_counts().textures, 1);
    assert_eq!(c.export_section_offset(), 17);
    assert!(c.pending_changes().is_empty());
}

#[test]
fn exports_resolve_to_clips_by_id() {
    let c = single(&sample().build()).unwrap();
    assert_eq!(c.exports()[0].movie_clip(), Some(0));
    assert_eq!(c.exports()[1].movie_clip(), None);
}

#[test]
fn eof_offset_points_at_the_terminator() {
    let bytes = sample().build();
    let c = single(&bytes).unwrap();
    assert_eq!(c.eof_offset(), bytes.len() as u64 - 5);
}

#[test]
fn opaque_and_unknown_records_are_skipped() {
    let bytes = ScFixture::new()
        .raw(13, &[0xEE; 9])
        .raw(42, &[0xDD; 3])
        .solid_texture(1, 1, [1, 2, 3, 4])
        .build();
    let c = single(&bytes).unwrap();
    assert_eq!(c.textures().len(), 1);
    assert_eq!(c.textures()[0].image().unwrap().get_pixel(0, 0).0, [1, 2, 3, 4]);
}

#[test]
fn truncated_record_is_fatal() {
    let mut bytes = sample().build();
    bytes.truncate(bytes.len() - 12);
    assert!(matches!(single(&bytes), Err(ScError::MalformedContainer(_))));
}

#[test]
fn placeholder_texture_is_realigned_past_its_pixels() {
    let bytes = ScFixture::new()
        .texture(6, 2, 2, &[0x55; 8])
        .solid_texture(1, 1, [9, 9, 9, 9])
        .build();
    let c = single(&bytes).unwrap();
    assert!(c.textures()[0].is_placeholder());
    assert_eq!((c.textures()[0].width(), c.textures()[0].height()), (2, 2));
    assert_eq!(c.textures()[1].id(), 1);
    assert!(!c.textures()[1].is_placeholder());
}

#[test]
fn split_layout_reads_pixels_from_the_companion() {
    let (primary, companion) = ScFixture::new()
        .solid_texture(2, 1, [0, 255, 0, 255])
        .solid_texture(1, 1, [0, 0, 255, 255])
        .build_split();
    let layout = ContainerLayout::Split {
        texture_path: PathBuf::from("mem_tex.sc"),
    };
    let c = decode(PathBuf::from("mem.sc"), layout, &primary, Some(&companion)).unwrap();
    assert_eq!(c.textures().len(), 2);
    assert_eq!(
        c.textures()[1].image().unwrap().get_pixel(0, 0).0,
        [0, 0, 255, 255]
    );
    assert_eq!(c.texture_eof_offset, Some(companion.len() as u64 - 5));
    assert_eq!(c.textures()[0].companion, Some(0));
    assert_eq!(c.textures()[0].offset(), Offset::Existing(19));
}

#[test]
fn layout_and_streams_must_agree() {
    let bytes = sample().build();
    let layout = ContainerLayout::Split {
        texture_path: PathBuf::from("t"),
    };
    assert!(decode(PathBuf::from("a"), layout, &bytes, None).is_err());
    assert!(decode(PathBuf::from("a"), ContainerLayout::Single, &bytes, Some(&[])).is_err());
}
