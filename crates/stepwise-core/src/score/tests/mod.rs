mod bendable_score;
mod hard_soft_decimal_score;
mod hard_soft_score;
mod simple_score;
