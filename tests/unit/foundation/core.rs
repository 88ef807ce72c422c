use super::*;

#[test]
fn existing_offset_is_its_own_clone_source() {
    assert_eq!(Offset::Existing(40).existing(), Some(40));
    assert_eq!(Offset::Existing(40).clone_source(), Some(40));
    assert_eq!(Offset::Existing(40).for_clone(), Offset::ClonedFrom(40));
}

#[test]
fn clones_of_clones_point_at_the_original_record() {
    let clone = Offset::Existing(7).for_clone();
    assert_eq!(clone.existing(), None);
    assert_eq!(clone.for_clone(), Offset::ClonedFrom(7));
}

#[test]
fn pending_has_no_source() {
    assert_eq!(Offset::Pending.clone_source(), None);
    assert_eq!(Offset::Pending.for_clone(), Offset::Pending);
}

#[test]
fn shift_moves_offsets_at_or_past_the_insertion_point() {
    let mut before = Offset::Existing(9);
    let mut at = Offset::Existing(10);
    let mut cloned = Offset::ClonedFrom(30);
    let mut pending = Offset::Pending;
    for o in [&mut before, &mut at, &mut cloned, &mut pending] {
        o.shift_from(10, 4);
    }
    assert_eq!(before, Offset::Existing(9));
    assert_eq!(at, Offset::Existing(14));
    assert_eq!(cloned, Offset::ClonedFrom(34));
    assert_eq!(pending, Offset::Pending);
}
