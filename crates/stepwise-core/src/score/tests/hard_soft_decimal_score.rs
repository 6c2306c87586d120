use crate::score::*;

#[test]
fn test_creation() {
    let score = HardSoftDecimalScore::of(-2, -100);
    assert_eq!(score.hard_scaled(), -200000);
    assert_eq!(score.soft_scaled(), -10000000);
}

#[test]
fn test_level_doubles_undo_scaling() {
    let score = HardSoftDecimalScore::of_scaled(-150000, 250);
    assert_eq!(score.to_level_numbers(), vec![-150000, 250]);
    assert_eq!(score.to_level_doubles(), vec![-1.5, 0.0025]);
}

#[test]
fn test_comparison_and_arithmetic() {
    let s1 = HardSoftDecimalScore::of(-1, -100);
    let s2 = HardSoftDecimalScore::of(-1, -50);
    assert!(s2 > s1);
    assert_eq!(s1 + s2, HardSoftDecimalScore::of(-2, -150));
    assert_eq!(-s1, HardSoftDecimalScore::of(1, 100));
}

#[test]
fn test_parse_and_display() {
    let score = HardSoftDecimalScore::parse("-1.5hard/-2.25soft").unwrap();
    assert_eq!(score, HardSoftDecimalScore::of_scaled(-150000, -225000));
    assert_eq!(score.to_string(), "-1.5hard/-2.25soft");
    assert_eq!(HardSoftDecimalScore::of(0, -3).to_string(), "0hard/-3soft");

    let partial = HardSoftDecimalScore::parse("-1init/0hard/0soft").unwrap();
    assert_eq!(partial.init_score(), -1);
    assert!(HardSoftDecimalScore::parse("0hard").is_err());
}
