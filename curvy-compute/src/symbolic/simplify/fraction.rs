//! Tools to help manipulate fractions.

use crate::symbolic::expr::Expr;
use std::cmp::Ordering;

/// Create an [`Expr`] representing a fraction with the given numerator and denominator.
///
/// The representation is an [`Expr::Mul`] containing the numerator, and the denominator raised
/// to the power of -1.
pub(crate) fn make_fraction(numerator: Expr, denominator: Expr) -> Expr {
    numerator * denominator.recip()
}

/// Splits an expression into a numerator and a denominator.
///
/// Every factor raised to a negative number is moved to the denominator with the sign of its
/// exponent flipped. Rational coefficients are left in the numerator.
///
/// - `x^2 / (x - 1)` -> `(x^2, x - 1)`
/// - `3*x*y^-2` -> `(3*x, y^2)`
/// - `x + 1` -> `(x + 1, 1)`
pub(crate) fn split_fraction(expr: &Expr) -> (Expr, Expr) {
    /// If the factor is a power with a negative numeric exponent, returns the factor that belongs
    /// in the denominator.
    fn denominator_part(factor: &Expr) -> Option<Expr> {
        let Expr::Exp(base, exp) = factor else { return None };
        let n = exp.as_number().filter(|n| n.cmp0() == Ordering::Less)?;
        let flipped = -n.clone();
        if flipped == 1 {
            Some((**base).clone())
        } else {
            Some((**base).clone().pow(Expr::number(flipped)))
        }
    }

    let factors = match expr {
        Expr::Mul(factors) => factors.as_slice(),
        expr => std::slice::from_ref(expr),
    };

    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for factor in factors {
        match denominator_part(factor) {
            Some(part) => denominator.push(part),
            None => numerator.push(factor.clone()),
        }
    }

    (Expr::Mul(numerator).downgrade(), Expr::Mul(denominator).downgrade())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn split_simple_fraction() {
        let x = Expr::symbol("x");
        let expr = make_fraction(x.clone().pow(Expr::integer(2)), x.clone() + Expr::integer(-1));
        let (num, den) = split_fraction(&expr);

        assert_eq!(num, x.clone().pow(Expr::integer(2)));
        assert_eq!(den, x + Expr::integer(-1));
    }

    #[test]
    fn split_without_denominator() {
        let expr = Expr::symbol("x") + Expr::integer(1);
        let (num, den) = split_fraction(&expr);

        assert_eq!(num, expr);
        assert_eq!(den, Expr::integer(1));
    }
}
