//! Supplies: derived lookups maintained alongside the working solution.
//!
//! A supply answers questions that would otherwise need a scan over every
//! entity, such as "which entity follows this value?" for chained variables.

mod chain;

pub use chain::ChainSupply;
