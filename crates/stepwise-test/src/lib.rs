//! Shared test fixtures for Stepwise crates.
//!
//! - [`nqueens`] - N-Queens with a from-scratch and an incremental calculator
//! - [`routing`] - a chained vehicle routing toy for chained moves
//! - [`toy`] - four entities choosing between two values
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! stepwise-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use stepwise_scoring::ScoreDirector;
//! use stepwise_test::nqueens::nqueens_director;
//!
//! let mut director = nqueens_director(&[0, 2, 1, 3]);
//! assert_eq!(director.calculate_score().score(), -2);
//! ```

pub mod nqueens;
pub mod routing;
pub mod toy;

pub use nqueens::{NQueensCalculator, NQueensSolution, Queen};
pub use routing::{RoutingSolution, Visit};
pub use toy::ToySolution;
