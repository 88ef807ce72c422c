use super::*;

#[test]
fn white_quantizes_to_248_252_248() {
    let raster = Raster::from_raw(1, 1, vec![255, 255, 255, 255]).unwrap();
    let packed = encode(&raster);
    assert_eq!(packed, 0xFFFFu16.to_le_bytes().to_vec());
    assert_eq!(decode(&packed), vec![248, 252, 248, 255]);
}

#[test]
fn decode_is_always_opaque() {
    assert_eq!(decode(&[0, 0]), vec![0, 0, 0, 255]);
}

#[test]
fn channels_land_in_their_bit_fields() {
    let red = Raster::from_raw(1, 1, vec![255, 0, 0, 10]).unwrap();
    let green = Raster::from_raw(1, 1, vec![0, 255, 0, 10]).unwrap();
    let blue = Raster::from_raw(1, 1, vec![0, 0, 255, 10]).unwrap();
    assert_eq!(encode(&red), 0xF800u16.to_le_bytes().to_vec());
    assert_eq!(encode(&green), 0x07E0u16.to_le_bytes().to_vec());
    assert_eq!(encode(&blue), 0x001Fu16.to_le_bytes().to_vec());
}
