//! CLI command implementations.

pub mod check;
pub mod defaults;
pub mod emit;
