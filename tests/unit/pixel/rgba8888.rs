use super::*;

#[test]
fn channel_order_is_preserved() {
    let packed = [1, 2, 3, 4, 250, 251, 252, 253];
    let rgba = decode(&packed);
    assert_eq!(rgba, packed);

    let raster = Raster::from_raw(2, 1, rgba).unwrap();
    assert_eq!(encode(&raster), packed);
}
