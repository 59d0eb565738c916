//! Symbolic manipulation of expressions in one variable.
//!
//! [`Expr`] is the flattened representation that every other module in here works with. Sums and
//! products are n-ary, and numbers are exact rationals, so `0.1 + 0.2` is exactly `3/10`.

pub mod derivative;
pub mod error;
pub mod expr;
pub mod limit;
pub mod poly;
pub mod rational;
pub mod simplify;
pub mod singularity;
pub mod solve;
pub mod step_collector;

pub use expr::{Expr, Primary};
pub use simplify::{simplify, simplify_with, simplify_with_steps};
pub use step_collector::StepCollector;
