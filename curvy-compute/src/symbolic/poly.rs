//! Univariate polynomials with exact rational coefficients.

use crate::primitive::{is_integer, rat};
use rug::{Integer, Rational};
use std::{cmp::Ordering, ops::{Add, Mul, Neg, Sub}};
use super::expr::{Expr, Primary};

/// The largest exponent [`Poly::from_expr`] will expand.
const MAX_EXPANDED_POWER: u32 = 64;

/// A polynomial in one variable, with exact rational coefficients.
///
/// Coefficients are stored from the constant term upwards, with no trailing zeros. The zero
/// polynomial has no coefficients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    coeffs: Vec<Rational>,
}

impl Poly {
    /// Creates a polynomial from its coefficients, starting with the constant term.
    pub fn from_coeffs(mut coeffs: Vec<Rational>) -> Self {
        while coeffs.last().map_or(false, |c| c.cmp0() == Ordering::Equal) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// A constant polynomial.
    pub fn constant(c: Rational) -> Self {
        Self::from_coeffs(vec![c])
    }

    /// The polynomial `x`.
    pub fn x() -> Self {
        Self::from_coeffs(vec![rat(0), rat(1)])
    }

    /// The polynomial `x - r`.
    pub fn linear_factor(r: &Rational) -> Self {
        Self::from_coeffs(vec![-r.clone(), rat(1)])
    }

    /// Returns the coefficients, starting with the constant term.
    pub fn coeffs(&self) -> &[Rational] {
        &self.coeffs
    }

    /// Returns the coefficient of `x^n`.
    pub fn coeff(&self, n: usize) -> Rational {
        self.coeffs.get(n).cloned().unwrap_or_else(|| rat(0))
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Returns true if the polynomial has degree zero, or is the zero polynomial.
    pub fn is_constant(&self) -> bool {
        self.coeffs.len() <= 1
    }

    /// Returns the degree of the polynomial, or [`None`] for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Returns the coefficient of the highest power, or [`None`] for the zero polynomial.
    pub fn leading_coeff(&self) -> Option<&Rational> {
        self.coeffs.last()
    }

    /// Multiplies every coefficient by `c`.
    pub fn scale(&self, c: &Rational) -> Self {
        Self::from_coeffs(self.coeffs.iter().map(|a| a.clone() * c).collect())
    }

    /// Divides the polynomial by its leading coefficient.
    pub fn monic(&self) -> Self {
        match self.leading_coeff() {
            Some(lc) => self.scale(&(rat(1) / lc)),
            None => Self::zero(),
        }
    }

    /// Raises the polynomial to a non-negative integer power.
    pub fn pow(&self, mut n: u32) -> Self {
        let mut result = Self::constant(rat(1));
        let mut square = self.clone();
        while n > 0 {
            if n & 1 == 1 {
                result = &result * &square;
            }
            square = &square * &square;
            n >>= 1;
        }
        result
    }

    /// Divides `self` by `divisor`, returning the quotient and remainder. Returns [`None`] if the
    /// divisor is the zero polynomial.
    pub fn div_rem(&self, divisor: &Poly) -> Option<(Poly, Poly)> {
        let divisor_degree = divisor.degree()?;
        let divisor_lc = divisor.leading_coeff()?;

        let mut remainder = self.coeffs.clone();
        let mut quotient = vec![rat(0); remainder.len().saturating_sub(divisor_degree)];
        while remainder.len() > divisor_degree {
            let shift = remainder.len() - 1 - divisor_degree;
            let factor = remainder[remainder.len() - 1].clone() / divisor_lc;
            for (i, c) in divisor.coeffs.iter().enumerate() {
                remainder[shift + i] -= factor.clone() * c;
            }
            quotient[shift] = factor;

            // the leading term is now exactly zero
            remainder.pop();
            while remainder.last().map_or(false, |c| c.cmp0() == Ordering::Equal) {
                remainder.pop();
            }
        }

        Some((Poly::from_coeffs(quotient), Poly::from_coeffs(remainder)))
    }

    /// Returns the monic greatest common divisor of two polynomials. The GCD of two zero
    /// polynomials is zero.
    pub fn gcd(&self, other: &Poly) -> Poly {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let remainder = match a.div_rem(&b) {
                Some((_, remainder)) => remainder,
                None => break,
            };
            a = b;
            b = remainder.monic();
        }
        a.monic()
    }

    /// Returns the derivative of the polynomial.
    pub fn derivative(&self) -> Self {
        Self::from_coeffs(
            self.coeffs.iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| c.clone() * rat(i as u32))
                .collect(),
        )
    }

    /// Returns the square-free part of the polynomial, `p / gcd(p, p')`, which has the same
    /// distinct roots as `p`, each with multiplicity one.
    pub fn square_free(&self) -> Self {
        if self.is_constant() {
            return self.clone();
        }

        let g = self.gcd(&self.derivative());
        match self.div_rem(&g) {
            Some((quotient, _)) => quotient,
            None => self.clone(),
        }
    }

    /// Evaluates the polynomial exactly at a rational point.
    pub fn eval(&self, x: &Rational) -> Rational {
        self.coeffs.iter()
            .rev()
            .fold(rat(0), |acc, c| acc * x + c)
    }

    /// Returns the sign of the polynomial at a rational point.
    pub fn sign_at(&self, x: &Rational) -> Ordering {
        self.eval(x).cmp0()
    }

    /// Evaluates the polynomial at a floating-point value.
    pub fn eval_f64(&self, x: f64) -> f64 {
        self.coeffs.iter()
            .rev()
            .fold(0.0, |acc, c| acc * x + c.to_f64())
    }

    /// Returns the coefficients multiplied by the smallest positive integer that makes all of them
    /// integers.
    pub fn integer_coeffs(&self) -> Vec<Integer> {
        let lcm = self.coeffs.iter()
            .fold(Integer::from(1), |lcm, c| lcm.lcm(c.denom()));
        self.coeffs.iter()
            .map(|c| {
                let scaled = c.clone() * Rational::from(lcm.clone());
                scaled.numer().clone()
            })
            .collect()
    }

    /// Converts an expression into a polynomial in `var`. Returns [`None`] if the expression is
    /// not a polynomial with rational coefficients.
    pub fn from_expr(expr: &Expr, var: &str) -> Option<Self> {
        match expr {
            Expr::Primary(Primary::Number(n)) => Some(Self::constant(n.clone())),
            Expr::Primary(Primary::Symbol(sym)) if sym == var => Some(Self::x()),
            Expr::Primary(_) => None,
            Expr::Add(terms) => terms.iter()
                .try_fold(Self::zero(), |sum, term| Some(&sum + &Self::from_expr(term, var)?)),
            Expr::Mul(factors) => factors.iter()
                .try_fold(Self::constant(rat(1)), |product, factor| {
                    Some(&product * &Self::from_expr(factor, var)?)
                }),
            Expr::Exp(base, exp) => {
                let n = exp.as_number().filter(|n| is_integer(n))?;
                let n = n.numer().to_u32().filter(|&n| n <= MAX_EXPANDED_POWER)?;
                Some(Self::from_expr(base, var)?.pow(n))
            },
        }
    }

    /// Converts the polynomial into an expression in `var`, with terms in descending order of
    /// degree.
    pub fn to_expr(&self, var: &str) -> Expr {
        let terms = self.coeffs.iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| c.cmp0() != Ordering::Equal)
            .map(|(degree, c)| {
                let power = match degree {
                    0 => return Expr::number(c.clone()),
                    1 => Expr::symbol(var),
                    n => Expr::symbol(var).pow(Expr::integer(n as i64)),
                };
                if *c == 1 {
                    power
                } else {
                    Expr::Mul(vec![Expr::number(c.clone()), power])
                }
            })
            .collect();
        Expr::Add(terms).downgrade()
    }
}

impl Add for &Poly {
    type Output = Poly;

    fn add(self, rhs: &Poly) -> Poly {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        Poly::from_coeffs((0..len).map(|i| self.coeff(i) + rhs.coeff(i)).collect())
    }
}

impl Sub for &Poly {
    type Output = Poly;

    fn sub(self, rhs: &Poly) -> Poly {
        self + &-rhs
    }
}

impl Neg for &Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        self.scale(&rat(-1))
    }
}

impl Mul for &Poly {
    type Output = Poly;

    fn mul(self, rhs: &Poly) -> Poly {
        if self.is_zero() || rhs.is_zero() {
            return Poly::zero();
        }

        let mut coeffs = vec![rat(0); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a.clone() * b;
            }
        }
        Poly::from_coeffs(coeffs)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Builds a polynomial from integer coefficients, starting with the constant term.
    fn poly(coeffs: &[i64]) -> Poly {
        Poly::from_coeffs(coeffs.iter().map(|&c| rat(c)).collect())
    }

    #[test]
    fn division() {
        // (x^3 + 2x^2) / (x^2 - 1) = x + 2, remainder x + 2
        let (quotient, remainder) = poly(&[0, 0, 2, 1]).div_rem(&poly(&[-1, 0, 1])).unwrap();
        assert_eq!(quotient, poly(&[2, 1]));
        assert_eq!(remainder, poly(&[2, 1]));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(poly(&[1, 1]).div_rem(&Poly::zero()), None);
    }

    #[test]
    fn gcd_is_monic() {
        // gcd(2x^2 - 2, 3x - 3) = x - 1
        assert_eq!(poly(&[-2, 0, 2]).gcd(&poly(&[-3, 3])), poly(&[-1, 1]));
        assert_eq!(poly(&[1, 1]).gcd(&poly(&[-1, 1])), poly(&[1]));
    }

    #[test]
    fn square_free_part() {
        // (x - 1)^2 (x + 2) = x^3 - 3x + 2
        let p = poly(&[2, -3, 0, 1]);
        assert_eq!(p.square_free(), poly(&[-2, 1, 1]));
    }

    #[test]
    fn from_and_to_expr() {
        let x = Expr::symbol("x");
        let expr = (x.clone() + Expr::integer(1)).pow(Expr::integer(2));
        let p = Poly::from_expr(&expr, "x").unwrap();
        assert_eq!(p, poly(&[1, 2, 1]));
        assert_eq!(p.to_expr("x").to_string(), "x^2 + 2*x + 1");

        assert_eq!(Poly::from_expr(&x.clone().recip(), "x"), None);
        assert_eq!(Poly::from_expr(&(x + Expr::symbol("pi")), "x"), None);
    }

    #[test]
    fn integer_coefficients() {
        let p = Poly::from_coeffs(vec![rat((1, 2)), rat((2, 3))]);
        assert_eq!(p.integer_coeffs(), vec![Integer::from(3), Integer::from(4)]);
    }

    #[test]
    fn evaluation() {
        let p = poly(&[-4, 0, 1]);
        assert_eq!(p.eval(&rat(2)), rat(0));
        assert_eq!(p.eval_f64(3.0), 5.0);
    }
}
