use super::*;

#[test]
fn decode_shifts_each_nibble_without_replication() {
    // R=0xF, G=0x8, B=0x1, A=0x0
    let word: u16 = 0xF810;
    assert_eq!(decode(&word.to_le_bytes()), vec![0xF0, 0x80, 0x10, 0x00]);
}

#[test]
fn encode_keeps_the_high_nibble() {
    let raster = Raster::from_raw(1, 1, vec![0xFF, 0x8C, 0x1F, 0x0E]).unwrap();
    assert_eq!(encode(&raster), 0xF810u16.to_le_bytes().to_vec());
}

#[test]
fn low_bits_are_lost_on_a_round_trip() {
    let raster = Raster::from_raw(1, 1, vec![0xAB, 0xCD, 0xEF, 0x12]).unwrap();
    assert_eq!(decode(&encode(&raster)), vec![0xA0, 0xC0, 0xE0, 0x10]);
}
