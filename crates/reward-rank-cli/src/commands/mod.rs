//! Command implementations.

pub mod inspect;
pub mod rank;
