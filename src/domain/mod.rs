//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `ahp` - Pairwise-comparison engine (matrices, weights, consistency, ranking)

pub mod ahp;
pub mod foundation;
