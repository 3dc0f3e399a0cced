use super::*;

#[test]
fn test_new_and_getters() {
    let interval = Interval::new(3, 7);
    assert_eq!(interval.from_inclusive(), 3);
    assert_eq!(interval.to_exclusive(), 7);
    assert_eq!(interval.len(), 4);
    assert!(!interval.is_empty());
    assert_eq!(interval.range(), 3..7);
}

#[test]
fn test_with_length() {
    assert_eq!(Interval::with_length(5), Interval::new(0, 5));
    assert!(Interval::with_length(0).is_empty());
}

#[test]
#[should_panic]
fn test_new_rejects_reversed_bounds() {
    Interval::new(4, 2);
}

#[test]
fn test_slice() {
    let values = [10, 11, 12, 13, 14];
    assert_eq!(Interval::new(1, 4).slice(&values), &[11, 12, 13]);
    assert!(Interval::new(2, 2).slice(&values).is_empty());
}

#[test]
fn test_split_at() {
    let (left, right) = Interval::new(2, 8).split_at(5);
    assert_eq!(left, Interval::new(2, 5));
    assert_eq!(right, Interval::new(5, 8));

    // Splitting at either end yields an empty side
    let (left, right) = Interval::new(2, 8).split_at(2);
    assert!(left.is_empty());
    assert_eq!(right.len(), 6);
}

#[test]
#[should_panic]
fn test_split_at_outside_interval() {
    Interval::new(2, 8).split_at(9);
}
