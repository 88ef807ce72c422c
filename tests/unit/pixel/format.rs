use super::*;

#[test]
fn tags_map_to_codecs() {
    assert_eq!(PixelFormat::from_tag(0), Some(PixelFormat::Rgba8888));
    assert_eq!(PixelFormat::from_tag(2), Some(PixelFormat::Rgba4444));
    assert_eq!(PixelFormat::from_tag(4), Some(PixelFormat::Rgb565));
    for tag in [1, 3, 5, 6, 10, 255] {
        assert_eq!(PixelFormat::from_tag(tag), None, "tag {tag}");
    }
    for f in [PixelFormat::Rgba8888, PixelFormat::Rgba4444, PixelFormat::Rgb565] {
        assert_eq!(PixelFormat::from_tag(f.tag()), Some(f));
    }
}

#[test]
fn payload_len_uses_bytes_per_pixel() {
    assert_eq!(PixelFormat::Rgba8888.payload_len(3, 2).unwrap(), 24);
    assert_eq!(PixelFormat::Rgb565.payload_len(3, 2).unwrap(), 12);
    assert_eq!(PixelFormat::Rgba4444.payload_len(0, 9).unwrap(), 0);
}

#[test]
fn rgba8888_round_trip_is_lossless() {
    let bytes: Vec<u8> = (0..32).collect();
    let raster = PixelFormat::Rgba8888.decode(&bytes, 4, 2).unwrap();
    assert_eq!(raster.get_pixel(1, 0).0, [4, 5, 6, 7]);
    assert_eq!(PixelFormat::Rgba8888.encode(&raster), bytes);
}

#[test]
fn short_payload_is_malformed_not_zero_filled() {
    let err = PixelFormat::Rgb565.decode(&[0; 7], 2, 2).unwrap_err();
    assert!(matches!(err, ScError::MalformedContainer(_)), "{err}");
}

#[test]
fn trailing_bytes_are_ignored() {
    let raster = PixelFormat::Rgb565.decode(&[0xFF; 6], 1, 1).unwrap();
    assert_eq!(raster.dimensions(), (1, 1));
    assert_eq!(raster.get_pixel(0, 0).0, [248, 252, 248, 255]);
}
