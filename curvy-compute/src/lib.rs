//! Symbolic and numeric machinery for analyzing real functions of one variable.
//!
//! Expressions parsed by [`curvy_parser`] are converted into the flattened [`symbolic::Expr`]
//! representation, over which this crate provides simplification, differentiation, exact
//! polynomial and rational-function algebra, a real-root solver, a singularity finder, and limits
//! at infinity. The [`numerical`] module evaluates expressions with `f64`s for sampling.

pub mod consts;
pub mod numerical;
pub mod primitive;
pub mod symbolic;
