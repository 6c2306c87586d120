use crate::score::*;

type Bendable = BendableScore<2, 2>;

#[test]
fn test_comparison_is_lexicographic() {
    let s1 = Bendable::of([0, -1], [100, 100]);
    let s2 = Bendable::of([0, 0], [-100, -100]);
    let s3 = Bendable::of([0, 0], [-100, -99]);

    assert!(s2 > s1);
    assert!(s3 > s2);
    assert!(!s1.is_feasible());
    assert!(s2.is_feasible());
}

#[test]
fn test_arithmetic() {
    let s1 = Bendable::of([-1, -2], [-3, -4]);
    let s2 = Bendable::of([1, 1], [1, 1]);
    assert_eq!(s1 + s2, Bendable::of([0, -1], [-2, -3]));
    assert_eq!(s1 - s2, Bendable::of([-2, -3], [-4, -5]));
    assert_eq!(-s1, Bendable::of([1, 2], [3, 4]));
    assert_eq!(s1.abs(), Bendable::of([1, 2], [3, 4]));
    assert_eq!(Bendable::zero(), Bendable::of([0, 0], [0, 0]));
}

#[test]
fn test_level_numbers() {
    let score = Bendable::of([-1, -2], [-3, -4]);
    assert_eq!(score.to_level_numbers(), vec![-1, -2, -3, -4]);
    assert_eq!(Bendable::from_level_numbers(&[-1, -2, -3, -4]), score);
    assert_eq!(Bendable::level_label(1), ScoreLevel::Hard);
    assert_eq!(Bendable::level_label(2), ScoreLevel::Soft);
}

#[test]
fn test_parse_and_display() {
    let score = Bendable::of([0, -1], [-2, -3]);
    assert_eq!(score.to_string(), "[0/-1]hard/[-2/-3]soft");
    assert_eq!(Bendable::parse("[0/-1]hard/[-2/-3]soft").unwrap(), score);
    assert_eq!(
        Bendable::parse("-1init/[0/-1]hard/[-2/-3]soft").unwrap(),
        score.with_init_score(-1)
    );
    assert!(Bendable::parse("[0]hard/[-2/-3]soft").is_err());
}
