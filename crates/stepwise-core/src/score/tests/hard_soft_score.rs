use crate::score::*;

#[test]
fn test_creation() {
    let score = HardSoftScore::of(-2, -100);
    assert_eq!(score.hard(), -2);
    assert_eq!(score.soft(), -100);
    assert_eq!(score.init_score(), 0);
    assert_eq!(HardSoftScore::of_hard(-2), HardSoftScore::of(-2, 0));
    assert_eq!(HardSoftScore::of_soft(-100), HardSoftScore::of(0, -100));
}

#[test]
fn test_feasibility() {
    assert!(HardSoftScore::of(0, -1000).is_feasible());
    assert!(HardSoftScore::of(10, -50).is_feasible());
    assert!(!HardSoftScore::of(-1, 0).is_feasible());
    assert!(!HardSoftScore::of_uninitialized(-1, 0, 0).is_feasible());
}

#[test]
fn test_comparison() {
    use std::cmp::Ordering;

    let infeasible = HardSoftScore::of(-1, 0);
    let feasible = HardSoftScore::of(0, -1000);
    assert!(feasible > infeasible);
    assert!(feasible.is_better_than(&infeasible));
    assert!(infeasible.is_worse_than(&feasible));

    let s1 = HardSoftScore::of(0, -100);
    let s2 = HardSoftScore::of(0, -50);
    assert_eq!(s2.compare(&s1), Ordering::Greater);
}

#[test]
fn test_init_score_dominates() {
    let uninitialized = HardSoftScore::of_uninitialized(-1, 100, 100);
    let initialized = HardSoftScore::of(-50, -50);
    assert!(initialized > uninitialized);
    assert!(!uninitialized.is_solution_initialized());
    assert_eq!(uninitialized.with_init_score(0), HardSoftScore::of(100, 100));
}

#[test]
fn test_arithmetic() {
    let s1 = HardSoftScore::of(-1, -100);
    let s2 = HardSoftScore::of(-1, -50);

    assert_eq!(s1 + s2, HardSoftScore::of(-2, -150));
    assert_eq!(s1 - s2, HardSoftScore::of(0, -50));
    assert_eq!(-s1, HardSoftScore::of(1, 100));
    assert_eq!(s1.abs(), HardSoftScore::of(1, 100));
    assert_eq!(s1.multiply(2.0), HardSoftScore::of(-2, -200));
    assert_eq!(s1.divide(2.0), HardSoftScore::of(-1, -50));
}

#[test]
fn test_level_numbers() {
    let score = HardSoftScore::of(-3, 7);
    assert_eq!(score.to_level_numbers(), vec![-3, 7]);
    assert_eq!(score.to_level_doubles(), vec![-3.0, 7.0]);
    assert_eq!(HardSoftScore::from_level_numbers(&[-3, 7]), score);
    assert_eq!(HardSoftScore::level_label(0), ScoreLevel::Hard);
    assert_eq!(HardSoftScore::level_label(1), ScoreLevel::Soft);
}

#[test]
fn test_parse_and_display() {
    let score = HardSoftScore::parse("-1hard/-20soft").unwrap();
    assert_eq!(score, HardSoftScore::of(-1, -20));
    assert_eq!(format!("{}", score), "-1hard/-20soft");

    let partial = HardSoftScore::parse("-2init/0hard/-3soft").unwrap();
    assert_eq!(partial, HardSoftScore::of_uninitialized(-2, 0, -3));
    assert_eq!(partial.to_string_repr(), "-2init/0hard/-3soft");

    assert!(HardSoftScore::parse("1hard").is_err());
    assert!(HardSoftScore::parse("xhard/0soft").is_err());
    assert!(HardSoftScore::parse("1init/0hard/0soft").is_err());
}
