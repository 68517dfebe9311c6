//! Core data types for binloader.
//!
//! The normalized model produced by a load: `Binary` owns its `Section`s
//! (and their bytes) and its `Symbol`s.

pub mod binary;
pub mod section;
pub mod symbol;
