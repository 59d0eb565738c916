//! Limits at positive and negative infinity.
//!
//! Rational functions are handled exactly by comparing the degrees of the numerator and
//! denominator. Algebraic expressions, such as `x / sqrt(x^2 + 1)`, are reduced to their dominant
//! term `c * |x|^p`. Everything else goes through a compositional evaluator that combines the
//! limits of sub-expressions, using L'Hôpital's rule to resolve products of the form `0 * ∞`.
//! Sums of the form `∞ - ∞` are rewritten by merging logarithms or multiplying by the conjugate of
//! a square root.

use crate::consts::E;
use crate::numerical::{eval_const, eval_function};
use log::trace;
use std::{cmp::Ordering, f64::consts::FRAC_PI_2, fmt};
use super::{
    derivative::derivative,
    expr::{Expr, Primary},
    rational::{canonicalize, RationalFunction},
    simplify::simplify,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How many times an indeterminate form may be rewritten in a row.
const MAX_REWRITE_DEPTH: usize = 4;

/// Powers closer than this are treated as equal when comparing dominant terms.
const POWER_TOLERANCE: f64 = 1e-12;

/// Dominant terms of a sum cancel if their coefficients add up to less than this fraction of the
/// largest coefficient.
const CANCEL_TOLERANCE: f64 = 1e-12;

/// The direction the variable moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// `x -> +∞`
    PosInfinity,

    /// `x -> -∞`
    NegInfinity,
}

/// The value of a limit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LimitValue {
    /// The limit is a finite real number.
    Finite(f64),

    /// The expression grows without bound.
    PosInfinity,

    /// The expression decreases without bound.
    NegInfinity,

    /// The expression stays bounded but does not converge, such as `sin(x)`.
    Bounded,

    /// The limit could not be determined.
    Unknown,
}

impl LimitValue {
    /// Returns the finite value of the limit, if there is one.
    pub fn finite(self) -> Option<f64> {
        match self {
            Self::Finite(value) => Some(value),
            _ => None,
        }
    }

    fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Self::Unknown
        } else if value == f64::INFINITY {
            Self::PosInfinity
        } else if value == f64::NEG_INFINITY {
            Self::NegInfinity
        } else {
            Self::Finite(value)
        }
    }

    fn infinity(positive: bool) -> Self {
        if positive {
            Self::PosInfinity
        } else {
            Self::NegInfinity
        }
    }

    fn is_infinite(self) -> bool {
        matches!(self, Self::PosInfinity | Self::NegInfinity)
    }

    /// Infinite values produced by evaluating a function at a finite point are poles, where the
    /// sign of the limit depends on the side it is approached from.
    fn finite_or_unknown(self) -> Self {
        if self.is_infinite() {
            Self::Unknown
        } else {
            self
        }
    }

    fn is_zero(self) -> bool {
        self == Self::Finite(0.0)
    }

    /// Returns the limit of the negation.
    fn neg(self) -> Self {
        match self {
            Self::Finite(value) => Self::Finite(-value),
            Self::PosInfinity => Self::NegInfinity,
            Self::NegInfinity => Self::PosInfinity,
            other => other,
        }
    }

    /// Combines the limits of two terms of a sum.
    fn add(self, other: Self) -> Self {
        use LimitValue::*;
        match (self, other) {
            (Unknown, _) | (_, Unknown) => Unknown,
            (PosInfinity, NegInfinity) | (NegInfinity, PosInfinity) => Unknown,
            (PosInfinity, _) | (_, PosInfinity) => PosInfinity,
            (NegInfinity, _) | (_, NegInfinity) => NegInfinity,
            (Bounded, _) | (_, Bounded) => Bounded,
            (Finite(a), Finite(b)) => Self::from_f64(a + b),
        }
    }

    /// Combines the limits of two factors of a product. Returns [`None`] for the indeterminate
    /// form `0 * ∞`.
    fn mul(self, other: Self) -> Option<Self> {
        use LimitValue::*;
        let result = match (self, other) {
            (Unknown, _) | (_, Unknown) => Unknown,
            (Finite(a), Finite(b)) => Self::from_f64(a * b),
            (Finite(a), b) | (b, Finite(a)) if a == 0.0 => match b {
                Bounded => Finite(0.0),
                _ => return None,
            },
            (Finite(a), b) | (b, Finite(a)) => match b {
                Bounded => Bounded,
                b if a > 0.0 => b,
                b => b.neg(),
            },
            (Bounded, Bounded) => Bounded,
            (Bounded, _) | (_, Bounded) => Unknown,
            (a, b) => Self::infinity(a == b),
        };
        Some(result)
    }
}

impl fmt::Display for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(value) => write!(f, "{}", value),
            Self::PosInfinity => write!(f, "∞"),
            Self::NegInfinity => write!(f, "-∞"),
            Self::Bounded => write!(f, "bounded, no limit"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Computes the limit of `expr` as `var` goes to positive or negative infinity.
pub fn limit_at_infinity(expr: &Expr, var: &str, direction: Direction) -> LimitValue {
    let value = Limit { var, direction }.limit(expr, 0);
    trace!("limit of `{}` as {} -> {:?} is {:?}", expr, var, direction, value);
    value
}

/// Computes the limit of a rational function at infinity from the leading terms.
pub fn rational_limit(function: &RationalFunction, direction: Direction) -> LimitValue {
    let (Some(num_degree), Some(den_degree)) = (function.num.degree(), function.den.degree()) else {
        return LimitValue::Finite(0.0);
    };
    let (Some(num_lc), Some(den_lc)) = (function.num.leading_coeff(), function.den.leading_coeff()) else {
        return LimitValue::Finite(0.0);
    };
    let ratio = num_lc.clone() / den_lc;

    match num_degree.cmp(&den_degree) {
        Ordering::Less => LimitValue::Finite(0.0),
        Ordering::Equal => LimitValue::Finite(ratio.to_f64()),
        Ordering::Greater => {
            let mut positive = ratio.cmp0() == Ordering::Greater;
            if direction == Direction::NegInfinity && (num_degree - den_degree) % 2 == 1 {
                positive = !positive;
            }
            LimitValue::infinity(positive)
        },
    }
}

/// The dominant term `coeff * |x|^power` of an expression as `x` goes to infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Leading {
    coeff: f64,
    power: f64,
}

impl Leading {
    fn limit(self) -> LimitValue {
        if self.power.abs() <= POWER_TOLERANCE {
            LimitValue::Finite(self.coeff)
        } else if self.power < 0.0 {
            LimitValue::Finite(0.0)
        } else {
            LimitValue::infinity(self.coeff > 0.0)
        }
    }
}

struct Limit<'a> {
    var: &'a str,
    direction: Direction,
}

impl Limit<'_> {
    fn limit(&self, expr: &Expr, depth: usize) -> LimitValue {
        if !expr.contains_symbol(self.var) {
            return eval_const(expr).map_or(LimitValue::Unknown, LimitValue::from_f64);
        }

        if let Some(function) = RationalFunction::from_expr(expr, self.var) {
            return rational_limit(&function, self.direction);
        }

        if let Some(leading) = self.leading(expr) {
            return leading.limit();
        }

        match expr {
            Expr::Primary(Primary::Symbol(_)) => LimitValue::infinity(self.direction == Direction::PosInfinity),
            Expr::Primary(Primary::Number(n)) => LimitValue::Finite(n.to_f64()),
            Expr::Primary(Primary::Call(name, args)) => match args.as_slice() {
                [u] => self.function(name, self.limit(u, depth)),
                _ => LimitValue::Unknown,
            },
            Expr::Add(terms) => self.sum(terms, depth),
            Expr::Mul(factors) => self.product(factors, depth),
            Expr::Exp(base, exp) => self.power(base, exp, depth),
        }
    }

    /// Returns the dominant term of an algebraic expression: a constant, the variable, or sums,
    /// products and constant powers of those. Returns [`None`] for anything else, and for sums
    /// whose dominant terms cancel.
    fn leading(&self, expr: &Expr) -> Option<Leading> {
        if !expr.contains_symbol(self.var) {
            let value = eval_const(expr).ok().filter(|value| value.is_finite() && *value != 0.0)?;
            return Some(Leading { coeff: value, power: 0.0 });
        }

        if let Some(function) = RationalFunction::from_expr(expr, self.var) {
            let (num_degree, den_degree) = (function.num.degree()?, function.den.degree()?);
            let ratio = function.num.leading_coeff()?.clone() / function.den.leading_coeff()?;
            let mut coeff = ratio.to_f64();
            if self.direction == Direction::NegInfinity && (num_degree + den_degree) % 2 == 1 {
                coeff = -coeff;
            }
            return Some(Leading { coeff, power: num_degree as f64 - den_degree as f64 });
        }

        match expr {
            Expr::Mul(factors) => {
                let mut product = Leading { coeff: 1.0, power: 0.0 };
                for factor in factors {
                    let factor = self.leading(factor)?;
                    product.coeff *= factor.coeff;
                    product.power += factor.power;
                }
                Some(product)
            },
            Expr::Add(terms) => {
                let mut leading = Vec::with_capacity(terms.len());
                for term in terms {
                    leading.push(self.leading(term)?);
                }

                let power = leading.iter().map(|term| term.power).fold(f64::NEG_INFINITY, f64::max);
                let dominant = leading.iter()
                    .filter(|term| (term.power - power).abs() <= POWER_TOLERANCE)
                    .collect::<Vec<_>>();
                let scale = dominant.iter().map(|term| term.coeff.abs()).fold(0.0, f64::max);
                let coeff = dominant.iter().map(|term| term.coeff).sum::<f64>();
                if coeff.abs() <= CANCEL_TOLERANCE * scale {
                    return None;
                }
                Some(Leading { coeff, power })
            },
            Expr::Exp(base, exp) if !exp.contains_symbol(self.var) => {
                let n = eval_const(exp).ok()?;
                let base = self.leading(base)?;
                // real powers of negative numbers only exist for integer exponents
                if base.coeff < 0.0 && n.fract() != 0.0 {
                    return None;
                }
                let coeff = base.coeff.powf(n);
                (coeff.is_finite() && coeff != 0.0).then_some(Leading { coeff, power: base.power * n })
            },
            _ => None,
        }
    }

    fn sum(&self, terms: &[Expr], depth: usize) -> LimitValue {
        let value = terms.iter()
            .map(|term| self.limit(term, depth))
            .fold(LimitValue::Finite(0.0), LimitValue::add);
        if value != LimitValue::Unknown || depth >= MAX_REWRITE_DEPTH {
            return value;
        }

        match self.merge_logs(terms).or_else(|| self.conjugate(terms)) {
            Some(rewritten) => {
                trace!("rewrote `{}` as `{}`", Expr::Add(terms.to_vec()), rewritten);
                self.limit(&rewritten, depth + 1)
            },
            None => value,
        }
    }

    /// Merges the logarithms of a sum into one: `a*log(u) + b*log(v)` -> `log(u^a * v^b)`.
    fn merge_logs(&self, terms: &[Expr]) -> Option<Expr> {
        let mut logs = Vec::new();
        let mut rest = Vec::new();
        for term in terms {
            let (coefficient, factor) = term.split_coefficient();
            match factor.as_call("log") {
                Some([arg]) => logs.push(arg.clone().pow(Expr::number(coefficient))),
                _ => rest.push(term.clone()),
            }
        }
        if logs.len() < 2 {
            return None;
        }

        let arg = canonicalize(&Expr::Mul(logs), self.var);
        rest.push(Expr::call("log", vec![arg]));
        Some(Expr::Add(rest).downgrade())
    }

    /// Multiplies a sum containing a square root by its conjugate: `r + s` ->
    /// `(r^2 - s^2) / (r - s)`.
    fn conjugate(&self, terms: &[Expr]) -> Option<Expr> {
        let position = terms.iter().position(|term| {
            let (_, factor) = term.split_coefficient();
            matches!(
                &factor,
                Expr::Exp(base, exp) if base.contains_symbol(self.var)
                    && exp.as_number().map_or(false, |n| *n.denom() == 2)
            )
        })?;

        let mut rest = terms.to_vec();
        let root = rest.remove(position);
        let rest = Expr::Add(rest).downgrade();

        let square = |expr: &Expr| expr.clone().pow(Expr::integer(2));
        let num = canonicalize(&simplify(&(square(&root) - square(&rest))), self.var);
        Some(num * (root - rest).recip())
    }

    fn product(&self, factors: &[Expr], depth: usize) -> LimitValue {
        let limits = factors.iter()
            .map(|factor| self.limit(factor, depth))
            .collect::<Vec<_>>();

        let combined = limits.iter()
            .try_fold(LimitValue::Finite(1.0), |acc, &limit| acc.mul(limit));
        if let Some(value) = combined {
            return value;
        }

        // 0 * ∞: split the product into the factors going to zero and the rest, and apply
        // L'Hôpital's rule to the resulting quotient
        if depth >= MAX_REWRITE_DEPTH {
            return LimitValue::Unknown;
        }

        let (zero, rest): (Vec<_>, Vec<_>) = factors.iter()
            .zip(&limits)
            .partition(|(_, limit)| limit.is_zero());
        let zero = Expr::Mul(zero.into_iter().map(|(factor, _)| factor.clone()).collect()).downgrade();
        let rest = Expr::Mul(rest.into_iter().map(|(factor, _)| factor.clone()).collect()).downgrade();

        // rest / (1 / zero) is ∞/∞, zero / (1 / rest) is 0/0
        let value = [(&rest, &zero), (&zero, &rest)].into_iter()
            .map(|(num, den)| self.lhopital(num, &simplify(&den.clone().recip()), depth + 1))
            .find(|value| *value != LimitValue::Unknown)
            .unwrap_or(LimitValue::Unknown);
        value
    }

    /// Computes the limit of `num / den` as the limit of `num' / den'`.
    fn lhopital(&self, num: &Expr, den: &Expr, depth: usize) -> LimitValue {
        let (Ok(num_prime), Ok(den_prime)) = (derivative(num, self.var), derivative(den, self.var)) else {
            return LimitValue::Unknown;
        };
        if den_prime.is_zero() {
            return LimitValue::Unknown;
        }

        let quotient = canonicalize(&(num_prime * den_prime.recip()), self.var);
        trace!("L'Hôpital's rule: `{}` / `{}` -> `{}`", num, den, quotient);
        self.limit(&quotient, depth)
    }

    fn power(&self, base: &Expr, exp: &Expr, depth: usize) -> LimitValue {
        use LimitValue::*;

        // u^n for constant n
        if let Some(n) = exp.as_number().map(|n| n.to_f64()) {
            let integer = exp.as_number().map_or(false, |n| *n.denom() == 1);
            let odd = integer && exp.as_number().map_or(false, |n| n.numer().is_odd());
            return match self.limit(base, depth) {
                Finite(v) => LimitValue::from_f64(v.powf(n)).finite_or_unknown(),
                _ if n == 0.0 => Finite(1.0),
                PosInfinity if n > 0.0 => PosInfinity,
                NegInfinity if n > 0.0 && integer => LimitValue::infinity(!odd),
                PosInfinity | NegInfinity if n < 0.0 => Finite(0.0),
                Bounded if n > 0.0 => Bounded,
                _ => Unknown,
            };
        }

        // a^v for constant a
        if !base.contains_symbol(self.var) {
            let Ok(a) = eval_const(base) else { return Unknown };
            if a <= 0.0 {
                return Unknown;
            }
            return match self.limit(exp, depth) {
                Finite(v) => LimitValue::from_f64(a.powf(v)),
                PosInfinity if a > 1.0 => PosInfinity,
                PosInfinity if a < 1.0 => Finite(0.0),
                NegInfinity if a > 1.0 => Finite(0.0),
                NegInfinity if a < 1.0 => PosInfinity,
                _ if a == 1.0 => Finite(1.0),
                Bounded => Bounded,
                _ => Unknown,
            };
        }

        // u^v = e^(v * log(u))
        let exponent = simplify(&(exp.clone() * Expr::call("log", vec![base.clone()])));
        self.limit(&Expr::symbol(E).pow(exponent), depth)
    }

    fn function(&self, name: &str, arg: LimitValue) -> LimitValue {
        use LimitValue::*;
        match (name, arg) {
            (_, Unknown) => Unknown,
            ("log" | "ln", PosInfinity) => PosInfinity,
            ("log" | "ln", Finite(v)) if v == 0.0 => NegInfinity,
            ("sin" | "cos", PosInfinity | NegInfinity | Bounded) => Bounded,
            ("atan", PosInfinity) => Finite(FRAC_PI_2),
            ("atan", NegInfinity) => Finite(-FRAC_PI_2),
            ("atan", Bounded) => Bounded,
            ("abs", PosInfinity | NegInfinity) => PosInfinity,
            ("abs", Bounded) => Bounded,
            (name, Finite(v)) => eval_function(name, v)
                .map_or(Unknown, LimitValue::from_f64)
                .finite_or_unknown(),
            _ => Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use curvy_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn limit(input: &str, direction: Direction) -> LimitValue {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        let expr = simplify(&Expr::from_ast(&ast, "x").unwrap());
        limit_at_infinity(&expr, "x", direction)
    }

    fn assert_finite(input: &str, direction: Direction, expected: f64) {
        match limit(input, direction) {
            LimitValue::Finite(value) => assert_float_absolute_eq!(value, expected, 1e-9),
            other => panic!("limit of `{}` was {:?}, expected {}", input, other, expected),
        }
    }

    #[test]
    fn rational_functions() {
        assert_finite("1/x", Direction::PosInfinity, 0.0);
        assert_finite("(3*x^2 + 1) / (2*x^2 - x)", Direction::NegInfinity, 1.5);
        assert_eq!(limit("x^3 / (x + 1)", Direction::NegInfinity), LimitValue::PosInfinity);
        assert_eq!(limit("(x**3 + 2*x**2) / (x**2 - 1)", Direction::NegInfinity), LimitValue::NegInfinity);
    }

    #[test]
    fn exponentials() {
        assert_finite("exp(-x)", Direction::PosInfinity, 0.0);
        assert_eq!(limit("exp(-x)", Direction::NegInfinity), LimitValue::PosInfinity);
        assert_finite("2 + 3*exp(x)", Direction::NegInfinity, 2.0);
    }

    #[test]
    fn lhopital() {
        assert_finite("x * exp(-x)", Direction::PosInfinity, 0.0);
        assert_finite("log(x) / x", Direction::PosInfinity, 0.0);
    }

    #[test]
    fn bounded_and_oscillating() {
        assert_eq!(limit("sin(x)", Direction::PosInfinity), LimitValue::Bounded);
        assert_finite("sin(x) / x", Direction::PosInfinity, 0.0);
        assert_eq!(limit("x * sin(x)", Direction::PosInfinity), LimitValue::Unknown);
    }

    #[test]
    fn arctangent() {
        assert_finite("atan(x)", Direction::PosInfinity, FRAC_PI_2);
        assert_finite("atan(x^2 - x)", Direction::NegInfinity, FRAC_PI_2);
    }

    #[test]
    fn infinity_minus_infinity() {
        assert_eq!(limit("exp(x) - x^2", Direction::PosInfinity), LimitValue::Unknown);
    }

    #[test]
    fn square_roots() {
        assert_eq!(limit("sqrt(x)", Direction::PosInfinity), LimitValue::PosInfinity);
        assert_finite("1 / sqrt(x^2 + 1)", Direction::PosInfinity, 0.0);
    }

    #[test]
    fn dominant_terms() {
        assert_finite("x / sqrt(x^2 + 1)", Direction::PosInfinity, 1.0);
        assert_finite("x / sqrt(x^2 + 1)", Direction::NegInfinity, -1.0);
        assert_finite("sqrt(4*x^2 + x) / (x + 3)", Direction::PosInfinity, 2.0);
        assert_eq!(limit("x^2 / sqrt(x^2 + 1)", Direction::NegInfinity), LimitValue::PosInfinity);
    }

    #[test]
    fn conjugate_of_square_root() {
        assert_finite("sqrt(x^2 + 1) - x", Direction::PosInfinity, 0.0);
        assert_eq!(limit("sqrt(x^2 + 1) - x", Direction::NegInfinity), LimitValue::PosInfinity);
        assert_finite("x - sqrt(x^2 + x)", Direction::PosInfinity, -0.5);
    }

    #[test]
    fn difference_of_logarithms() {
        assert_finite("log(x + 1) - log(x)", Direction::PosInfinity, 0.0);
        assert_finite("2*log(x) - log(x^2 + 1)", Direction::PosInfinity, 0.0);
    }
}
