//! Names that expressions may refer to, besides the variable being analyzed.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Archimedes' constant, written `pi`.
pub const PI: &str = "pi";

/// Euler's number, written `e`.
pub const E: &str = "e";

/// The named constants that expressions may use.
pub const CONSTANTS: [&str; 2] = [PI, E];

/// The functions that expressions may call, mapped to the number of arguments each accepts.
///
/// `ln` is an alias of `log`, the natural logarithm. `sqrt` and `exp` are lowered to powers during
/// conversion, so they never appear in a symbolic expression.
pub static FUNCTIONS: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    [
        ("sin", 1),
        ("cos", 1),
        ("tan", 1),
        ("asin", 1),
        ("acos", 1),
        ("atan", 1),
        ("exp", 1),
        ("log", 1),
        ("ln", 1),
        ("sqrt", 1),
        ("abs", 1),
    ]
    .into_iter()
    .collect()
});

/// Returns the numeric value of a named constant.
pub fn constant_value(name: &str) -> Option<f64> {
    match name {
        PI => Some(std::f64::consts::PI),
        E => Some(std::f64::consts::E),
        _ => None,
    }
}
