use super::*;

#[test]
fn reads_little_endian_scalars() {
    let bytes = [0x01, 0x34, 0x12, 0xFE, 0xFF, 0x78, 0x56, 0x34, 0x12];
    let mut r = RecordReader::new(&bytes);
    assert_eq!(r.u8("a").unwrap(), 1);
    assert_eq!(r.u16("b").unwrap(), 0x1234);
    assert_eq!(r.i16("c").unwrap(), -2);
    assert_eq!(r.u32("d").unwrap(), 0x1234_5678);
    assert_eq!(r.remaining(), 0);
}

#[test]
fn reading_past_the_end_is_malformed() {
    let mut r = RecordReader::new(&[1, 2, 3]);
    let err = r.i32("length").unwrap_err();
    assert!(matches!(err, ScError::MalformedContainer(_)));
    assert!(err.to_string().contains("length"), "{err}");
}

#[test]
fn positions_are_reported_from_the_base() {
    let bytes = [0u8; 8];
    let mut r = RecordReader::with_base(&bytes, 100);
    r.skip(3).unwrap();
    assert_eq!(r.position(), 103);
    assert_eq!(r.end(), 108);
    r.seek_to(107).unwrap();
    assert_eq!(r.remaining(), 1);
    assert!(r.seek_to(99).is_err());
    assert!(r.seek_to(109).is_err());
}

#[test]
fn short_bytes_treats_255_as_absent() {
    let bytes = [2, b'h', b'i', 255, 0];
    let mut r = RecordReader::new(&bytes);
    assert_eq!(r.short_bytes("name").unwrap(), Some(&b"hi"[..]));
    assert_eq!(r.short_bytes("name").unwrap(), None);
    assert_eq!(r.short_bytes("name").unwrap(), Some(&b""[..]));
}

#[test]
fn record_header_and_payload_bounds() {
    let bytes = [7, 3, 0, 0, 0, 9, 9];
    let mut r = RecordReader::new(&bytes);
    let header = r.record_header().unwrap();
    assert_eq!(header.kind, 7);
    assert_eq!(header.length, 3);
    assert_eq!(header.payload_start(), 5);
    assert_eq!(header.end(), 8);
    assert!(matches!(
        r.ensure_payload(&header),
        Err(ScError::MalformedContainer(_))
    ));
}

#[test]
fn negative_record_length_is_malformed() {
    let mut bytes = vec![2];
    bytes.extend_from_slice(&(-1i32).to_le_bytes());
    let err = RecordReader::new(&bytes).record_header().unwrap_err();
    assert!(err.to_string().contains("negative"), "{err}");
}
