use crate::score::*;

#[test]
fn test_feasibility() {
    assert!(SimpleScore::of(0).is_feasible());
    assert!(SimpleScore::of(-10).is_feasible());
    assert!(!SimpleScore::of_uninitialized(-1, 10).is_feasible());
}

#[test]
fn test_comparison() {
    assert!(SimpleScore::of(0) > SimpleScore::of(-5));
    assert!(SimpleScore::of(-5) > SimpleScore::of_uninitialized(-1, 100));
}

#[test]
fn test_arithmetic() {
    let s1 = SimpleScore::of(10);
    let s2 = SimpleScore::of(3);

    assert_eq!(s1 + s2, SimpleScore::of(13));
    assert_eq!(s1 - s2, SimpleScore::of(7));
    assert_eq!(-s1, SimpleScore::of(-10));
    assert_eq!(s1.multiply(1.5), SimpleScore::of(15));
    assert_eq!(SimpleScore::from(4), SimpleScore::of(4));
}

#[test]
fn test_parse() {
    assert_eq!(SimpleScore::parse("42").unwrap(), SimpleScore::of(42));
    assert_eq!(SimpleScore::parse(" -7 ").unwrap(), SimpleScore::of(-7));
    assert_eq!(
        SimpleScore::parse("-3init/5").unwrap(),
        SimpleScore::of_uninitialized(-3, 5)
    );
    assert!(SimpleScore::parse("abc").is_err());
}

#[test]
fn test_display() {
    assert_eq!(format!("{}", SimpleScore::of(-4)), "-4");
    assert_eq!(format!("{}", SimpleScore::of_uninitialized(-1, 2)), "-1init/2");
}
