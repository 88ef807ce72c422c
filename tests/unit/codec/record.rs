use super::*;

#[test]
fn classifies_every_known_family() {
    assert_eq!(RecordKind::classify(0), RecordKind::End);
    for t in [1, 16, 19] {
        assert_eq!(RecordKind::classify(t), RecordKind::Texture);
    }
    for t in [2, 18] {
        assert_eq!(RecordKind::classify(t), RecordKind::Shape);
    }
    for t in [3, 10, 12, 14] {
        assert_eq!(RecordKind::classify(t), RecordKind::MovieClip);
    }
    for t in [7, 8, 9, 13, 15, 20] {
        assert_eq!(RecordKind::classify(t), RecordKind::Opaque);
    }
}

#[test]
fn anything_else_is_unknown() {
    for t in [4, 5, 6, 11, 17, 21, 22, 99, 255] {
        assert_eq!(RecordKind::classify(t), RecordKind::Unknown, "type {t}");
    }
}
