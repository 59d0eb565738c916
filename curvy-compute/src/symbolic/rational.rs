//! Rational functions: quotients of two polynomials.
//!
//! Any expression built from numbers, the variable, `+`, `*` and integer powers is a rational
//! function. Writing it as a single reduced fraction `p / q` makes several questions easy to
//! answer exactly: the roots are the roots of `p`, the vertical asymptotes are the roots of `q`,
//! and the behavior at infinity depends only on the leading terms.

use crate::primitive::{is_integer, rat};
use log::trace;
use std::cmp::Ordering;
use super::{
    expr::{Expr, Primary},
    poly::Poly,
    simplify::{fraction::make_fraction, simplify},
};

/// The largest exponent [`RationalFunction::from_expr`] will expand.
const MAX_EXPANDED_POWER: u32 = 64;

/// A rational function `num / den`.
///
/// After [`RationalFunction::reduce`], `num` and `den` have no common factors and `den` is
/// monic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationalFunction {
    /// The numerator.
    pub num: Poly,

    /// The denominator. Never the zero polynomial.
    pub den: Poly,
}

impl RationalFunction {
    /// Creates the rational function `num / 1`.
    pub fn polynomial(num: Poly) -> Self {
        Self { num, den: Poly::constant(rat(1)) }
    }

    /// Converts an expression into a reduced rational function in `var`. Returns [`None`] if the
    /// expression is not a rational function with rational coefficients, or if it divides by an
    /// expression that is identically zero.
    pub fn from_expr(expr: &Expr, var: &str) -> Option<Self> {
        let result = match expr {
            Expr::Primary(Primary::Number(n)) => Self::polynomial(Poly::constant(n.clone())),
            Expr::Primary(Primary::Symbol(sym)) if sym == var => Self::polynomial(Poly::x()),
            Expr::Primary(_) => return None,
            Expr::Add(terms) => {
                let mut sum = Self::polynomial(Poly::zero());
                for term in terms {
                    let term = Self::from_expr(term, var)?;
                    sum = Self {
                        num: &(&sum.num * &term.den) + &(&term.num * &sum.den),
                        den: &sum.den * &term.den,
                    }.reduce();
                }
                sum
            },
            Expr::Mul(factors) => {
                let mut product = Self::polynomial(Poly::constant(rat(1)));
                for factor in factors {
                    let factor = Self::from_expr(factor, var)?;
                    product = Self {
                        num: &product.num * &factor.num,
                        den: &product.den * &factor.den,
                    }.reduce();
                }
                product
            },
            Expr::Exp(base, exp) => {
                let n = exp.as_number().filter(|n| is_integer(n))?;
                let magnitude = n.numer().clone().abs().to_u32().filter(|&n| n <= MAX_EXPANDED_POWER)?;
                let base = Self::from_expr(base, var)?;
                if n.cmp0() == Ordering::Less {
                    if base.num.is_zero() {
                        return None;
                    }
                    Self { num: base.den.pow(magnitude), den: base.num.pow(magnitude) }.reduce()
                } else {
                    Self { num: base.num.pow(magnitude), den: base.den.pow(magnitude) }.reduce()
                }
            },
        };

        if result.den.is_zero() {
            None
        } else {
            Some(result)
        }
    }

    /// Cancels the common factors of the numerator and denominator, and makes the denominator
    /// monic.
    pub fn reduce(self) -> Self {
        if self.num.is_zero() {
            return Self::polynomial(Poly::zero());
        }

        let g = self.num.gcd(&self.den);
        let (num, den) = match (self.num.div_rem(&g), self.den.div_rem(&g)) {
            (Some((num, _)), Some((den, _))) => (num, den),
            _ => (self.num, self.den),
        };

        match den.leading_coeff() {
            Some(lc) => {
                let scale = rat(1) / lc;
                Self { num: num.scale(&scale), den: den.scale(&scale) }
            },
            None => Self { num, den },
        }
    }

    /// Returns true if the denominator is constant.
    pub fn is_polynomial(&self) -> bool {
        self.den.is_constant()
    }

    /// Returns the quotient of the polynomial division `num / den` if the function has an oblique
    /// asymptote. That is, if the denominator is not constant and the degree of the numerator is
    /// exactly one more than the degree of the denominator.
    pub fn oblique_asymptote(&self) -> Option<Poly> {
        let num_degree = self.num.degree()?;
        let den_degree = self.den.degree().filter(|&degree| degree >= 1)?;
        if num_degree != den_degree + 1 {
            return None;
        }

        self.num.div_rem(&self.den).map(|(quotient, _)| quotient)
    }

    /// Converts the rational function into an expression in `var`.
    pub fn to_expr(&self, var: &str) -> Expr {
        if self.is_polynomial() {
            let scale = match self.den.leading_coeff() {
                Some(lc) => rat(1) / lc,
                None => rat(1),
            };
            return self.num.scale(&scale).to_expr(var);
        }

        make_fraction(self.num.to_expr(var), self.den.to_expr(var))
    }
}

/// Rewrites every rational sub-expression of `expr` as a single reduced fraction, then simplifies
/// the result.
///
/// - `(x^2 - 1)/(x - 1)` -> `x + 1`
/// - `1/x + 1/x^2` -> `(x + 1) / x^2`
/// - `sin((x^2 - 1)/(x - 1))` -> `sin(x + 1)`
pub fn canonicalize(expr: &Expr, var: &str) -> Expr {
    let canonical = simplify(&canonicalize_inner(expr, var));
    trace!("canonical form of `{}` is `{}`", expr, canonical);
    canonical
}

fn canonicalize_inner(expr: &Expr, var: &str) -> Expr {
    if expr.contains_symbol(var) {
        if let Some(function) = RationalFunction::from_expr(expr, var) {
            return function.to_expr(var);
        }
    }

    match expr {
        Expr::Primary(Primary::Call(name, args)) => Expr::call(
            name,
            args.iter().map(|arg| canonicalize_inner(arg, var)).collect(),
        ),
        Expr::Primary(_) => expr.clone(),
        Expr::Add(terms) => terms.iter()
            .map(|term| canonicalize_inner(term, var))
            .fold(Expr::Add(Vec::new()), |acc, term| acc + term)
            .downgrade(),
        Expr::Mul(factors) => factors.iter()
            .map(|factor| canonicalize_inner(factor, var))
            .fold(Expr::Mul(Vec::new()), |acc, factor| acc * factor)
            .downgrade(),
        Expr::Exp(base, exp) => canonicalize_inner(base, var).pow(canonicalize_inner(exp, var)),
    }
}

#[cfg(test)]
mod tests {
    use curvy_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(input: &str) -> Expr {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        Expr::from_ast(&ast, "x").unwrap()
    }

    fn poly(coeffs: &[i64]) -> Poly {
        Poly::from_coeffs(coeffs.iter().map(|&c| rat(c)).collect())
    }

    #[test]
    fn removable_factor_cancels() {
        let function = RationalFunction::from_expr(&parse("(x^2 - 1)/(x - 1)"), "x").unwrap();
        assert_eq!(function.num, poly(&[1, 1]));
        assert_eq!(function.den, poly(&[1]));
        assert!(function.is_polynomial());
    }

    #[test]
    fn denominator_is_monic() {
        let function = RationalFunction::from_expr(&parse("x / (2*x + 4)"), "x").unwrap();
        assert_eq!(function.num, Poly::from_coeffs(vec![rat(0), rat((1, 2))]));
        assert_eq!(function.den, poly(&[2, 1]));
    }

    #[test]
    fn oblique_asymptote() {
        let function = RationalFunction::from_expr(&parse("(x**3 + 2*x**2) / (x**2 - 1)"), "x").unwrap();
        assert_eq!(function.oblique_asymptote(), Some(poly(&[2, 1])));

        let function = RationalFunction::from_expr(&parse("x^2 + 1"), "x").unwrap();
        assert_eq!(function.oblique_asymptote(), None);
    }

    #[test]
    fn not_rational() {
        assert_eq!(RationalFunction::from_expr(&parse("sqrt(x)"), "x"), None);
        assert_eq!(RationalFunction::from_expr(&parse("1 / (x - x)"), "x"), None);
        assert_eq!(RationalFunction::from_expr(&parse("x + pi"), "x"), None);
    }

    #[test]
    fn canonical_forms() {
        assert_eq!(canonicalize(&parse("(x^2 - 1)/(x - 1)"), "x").to_string(), "x + 1");
        assert_eq!(canonicalize(&parse("1/x + 1/x^2"), "x").to_string(), "(x + 1) / x^2");
        assert_eq!(canonicalize(&parse("sin((x^2 - 1)/(x - 1))"), "x").to_string(), "sin(x + 1)");
    }
}
