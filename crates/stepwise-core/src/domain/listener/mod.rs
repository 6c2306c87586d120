//! Shadow variable listeners.
//!
//! Shadow variables are derived from genuine planning variables and are
//! never assigned by moves. Each [`ShadowVariableListener`] declares the
//! variables it reads (its sources) and the shadow variable it writes. A
//! [`ListenerGraph`] orders the listeners so every shadow variable is
//! recomputed after all of its sources.

mod shadow;

#[cfg(test)]
mod tests;

pub use shadow::{ListenerGraph, ShadowVariableListener};
