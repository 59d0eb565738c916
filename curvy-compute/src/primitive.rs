//! Functions to construct [`Integer`]s and [`Rational`]s from various types.

use rug::{Integer, Rational};
use std::cmp::Ordering;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given value.
pub fn rat<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Parses an integer literal, such as `144`.
pub fn int_from_str(s: &str) -> Option<Integer> {
    Integer::from_str_radix(s, 10).ok()
}

/// Parses a decimal literal, such as `2.5`, `3.` or `.125`, into the exact [`Rational`] it
/// denotes.
pub fn rational_from_decimal(s: &str) -> Option<Rational> {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }

    let digits = format!("{}{}", whole, frac);
    let numerator = int_from_str(&digits)?;
    let denominator = pow_integer(&int(10), frac.len() as u32);
    Some(Rational::from((numerator, denominator)))
}

/// Computes `base^exp` for a non-negative integer exponent by repeated squaring.
pub fn pow_integer(base: &Integer, mut exp: u32) -> Integer {
    let mut result = int(1);
    let mut square = base.clone();
    while exp > 0 {
        if exp & 1 == 1 {
            result *= &square;
        }
        square = square.clone() * &square;
        exp >>= 1;
    }
    result
}

/// Computes `base^exp` for an integer exponent. Returns [`None`] if `base` is zero and `exp` is
/// negative, or if the exponent is too large to be computed reasonably.
pub fn pow_rational(base: &Rational, exp: &Integer) -> Option<Rational> {
    let magnitude = exp.clone().abs().to_u32().filter(|&n| n <= 4096)?;
    let numer = pow_integer(base.numer(), magnitude);
    let denom = pow_integer(base.denom(), magnitude);

    if exp.cmp0() == Ordering::Less {
        if numer.cmp0() == Ordering::Equal {
            None
        } else {
            Some(Rational::from((denom, numer)))
        }
    } else {
        Some(Rational::from((numer, denom)))
    }
}

/// Returns the exact `n`-th root of a non-negative integer, if it is a perfect `n`-th power.
pub fn exact_root(value: &Integer, n: u32) -> Option<Integer> {
    if value.cmp0() == Ordering::Less || n == 0 {
        return None;
    }

    let root = value.clone().root(n);
    if pow_integer(&root, n) == *value {
        Some(root)
    } else {
        None
    }
}

/// Returns true if the rational number is zero.
pub fn is_zero(n: &Rational) -> bool {
    n.cmp0() == Ordering::Equal
}

/// Returns true if the rational number is an integer.
pub fn is_integer(n: &Rational) -> bool {
    *n.denom() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_are_exact() {
        assert_eq!(rational_from_decimal("2.5"), Some(rat((5, 2))));
        assert_eq!(rational_from_decimal(".125"), Some(rat((1, 8))));
        assert_eq!(rational_from_decimal("3."), Some(rat(3)));
        assert_eq!(rational_from_decimal("0.1"), Some(rat((1, 10))));
        assert_eq!(rational_from_decimal("."), None);
    }

    #[test]
    fn rational_powers() {
        assert_eq!(pow_rational(&rat((2, 3)), &int(3)), Some(rat((8, 27))));
        assert_eq!(pow_rational(&rat((2, 3)), &int(-2)), Some(rat((9, 4))));
        assert_eq!(pow_rational(&rat(0), &int(-1)), None);
        assert_eq!(pow_rational(&rat(0), &int(0)), Some(rat(1)));
    }

    #[test]
    fn perfect_roots() {
        assert_eq!(exact_root(&int(27), 3), Some(int(3)));
        assert_eq!(exact_root(&int(28), 3), None);
        assert_eq!(exact_root(&int(-4), 2), None);
    }
}
