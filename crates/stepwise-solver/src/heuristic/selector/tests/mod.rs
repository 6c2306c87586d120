//! Tests for the selector module.

use super::*;
use crate::heuristic::r#move::Move;

mod chained;
mod change;
mod union;
