//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](curvy_parser::parser::ast::expr::Expr) type from `curvy_parser` is a recursive
//! `enum` that represents the AST of a mathematical expression. It's convenient for parsing, but
//! not so much for algebraic manipulation.
//!
//! This module defines a separate [`Expr`], which simplifies the AST by recursively flattening it
//! into a list of terms or factors, depending on the operation. Subtraction is represented as
//! addition of a term multiplied by `-1`, and division as multiplication by a factor raised to the
//! power of `-1`. Every number is an exact [`Rational`]; decimal literals such as `0.1` are
//! converted to the fraction they denote.
//!
//! # Strict equality
//!
//! Determining if two expressions are mathematically equal is extremely difficult in general, so
//! the [`PartialEq`] implementation of [`Expr`] implements **strict equality** instead. Two
//! expressions are strictly equal if:
//!
//! - They are the same type of expression (i.e. both [`Expr::Primary`], both [`Expr::Add`], etc.).
//! - If both are [`Expr::Primary`], both expressions must have strictly equal values.
//! - If both are [`Expr::Add`] or [`Expr::Mul`], both expressions must have strictly equal terms /
//! factors, in any order.
//! - If both are [`Expr::Exp`], both expressions must have strictly equal base and exponent.
//!
//! Strict equality can **never** report false positives: if two expressions are strictly equal,
//! they are mathematically equal. It is used by the simplifier to find like terms and factors.

mod convert;
mod iter;

use crate::primitive::{is_integer, is_zero, rat};
use iter::ExprIter;
use rug::Rational;
use std::{cmp::Ordering, fmt, ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub}};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primary {
    /// An exact rational number, such as `2`, `-1/3`, or `5/2`.
    Number(Rational),

    /// A variable or named constant, such as `x`, `pi`, or `e`.
    Symbol(String),

    /// A function call, such as `sin(x)`.
    Call(String, Vec<Expr>),
}

/// A mathematical expression with information about its terms and factors.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<Expr>),

    /// Multiple factors multiplied together.
    Mul(Vec<Expr>),

    /// An expression raised to a power.
    Exp(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Creates an expression holding the given number.
    pub fn number(n: Rational) -> Self {
        Self::Primary(Primary::Number(n))
    }

    /// Creates an expression holding the given integer.
    pub fn integer(n: i64) -> Self {
        Self::number(rat(n))
    }

    /// Creates an expression holding the given symbol.
    pub fn symbol(name: &str) -> Self {
        Self::Primary(Primary::Symbol(name.to_owned()))
    }

    /// Creates a call to the function with the given name.
    pub fn call(name: &str, args: Vec<Expr>) -> Self {
        Self::Primary(Primary::Call(name.to_owned(), args))
    }

    /// Creates the expression `self^exp`. No simplification is done.
    pub fn pow(self, exp: Expr) -> Self {
        Self::Exp(Box::new(self), Box::new(exp))
    }

    /// Creates the expression `self^-1`. No simplification is done.
    pub fn recip(self) -> Self {
        self.pow(Self::integer(-1))
    }

    /// Returns the square root of this expression. No simplification is done.
    pub fn sqrt(self) -> Self {
        self.pow(Self::number(rat((1, 2))))
    }

    /// If the expression is a [`Primary::Number`], returns a reference to the contained number.
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            Self::Primary(Primary::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Number`], returns the contained number.
    pub fn into_number(self) -> Option<Rational> {
        match self {
            Self::Primary(Primary::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Primary::Number`].
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Primary(Primary::Number(_)))
    }

    /// Returns true if the expression is the number zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().map_or(false, is_zero)
    }

    /// Returns true if the expression is the number one.
    pub fn is_one(&self) -> bool {
        self.as_number().map_or(false, |n| *n == 1)
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// If the expression is a call to the function with the given name, returns its arguments.
    pub fn as_call(&self, name: &str) -> Option<&[Expr]> {
        match self {
            Self::Primary(Primary::Call(target, args)) if target == name => Some(args),
            _ => None,
        }
    }

    /// Returns true if the given symbol appears anywhere in the expression.
    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.post_order_iter().any(|expr| expr.as_symbol() == Some(symbol))
    }

    /// Returns true if the expression raises zero to a negative power anywhere, as in `1/0`.
    pub fn divides_by_zero(&self) -> bool {
        self.post_order_iter().any(|expr| match expr {
            Self::Exp(base, exp) => base.is_zero()
                && exp.as_number().map_or(false, |n| n.cmp0() == Ordering::Less),
            _ => false,
        })
    }

    /// Splits the expression into its numeric coefficient and the remaining factors.
    ///
    /// - `5` -> `(5, 1)`
    /// - `3*a*b` -> `(3, a*b)`
    /// - `a` -> `(1, a)`
    pub fn split_coefficient(&self) -> (Rational, Expr) {
        match self {
            Self::Primary(Primary::Number(n)) => (n.clone(), Self::integer(1)),
            Self::Mul(factors) => {
                let mut coefficient = rat(1);
                let mut rest = Vec::with_capacity(factors.len());
                for factor in factors {
                    match factor.as_number() {
                        Some(n) => coefficient *= n,
                        None => rest.push(factor.clone()),
                    }
                }
                (coefficient, Self::Mul(rest).downgrade())
            },
            expr => (rat(1), expr.clone()),
        }
    }

    /// Returns true if the expression should be printed with a leading minus sign.
    fn is_negative_term(&self) -> bool {
        match self {
            Self::Primary(Primary::Number(n)) => n.cmp0() == Ordering::Less,
            Self::Mul(factors) => factors.iter()
                .find_map(Expr::as_number)
                .map_or(false, |n| n.cmp0() == Ordering::Less),
            _ => false,
        }
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`Expr::Add`] with zero / one term, or an [`Expr::Mul`]
    /// with zero / one factor. This function checks for these cases and simplifies the expression
    /// into the single term / factor, or an [`Expr::Primary`] containing the number 0 or 1.
    pub fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::integer(0)
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::integer(1)
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns the number of nodes in the expression tree. This is used as a rough measure of how
    /// complicated an expression is.
    pub fn complexity(&self) -> usize {
        self.post_order_iter().count()
    }
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                lhs.len() == rhs.len()
                    && lhs.iter().all(|lhs| rhs.contains(lhs))
                    && rhs.iter().all(|rhs| lhs.contains(rhs))
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

impl From<Rational> for Expr {
    fn from(n: Rational) -> Self {
        Self::number(n)
    }
}

/// Writes a number, wrapping non-integers and negative numbers in parentheses if `wrap` is true.
fn fmt_number(f: &mut fmt::Formatter, n: &Rational, wrap: bool) -> fmt::Result {
    if wrap && (!is_integer(n) || n.cmp0() == Ordering::Less) {
        write!(f, "({})", n)
    } else {
        write!(f, "{}", n)
    }
}

/// Writes a factor of a product, wrapping sums and powers with fractional bases in parentheses.
fn fmt_factor(f: &mut fmt::Formatter, factor: &Expr) -> fmt::Result {
    match factor {
        Expr::Add(_) => write!(f, "({})", factor),
        Expr::Primary(Primary::Number(n)) => fmt_number(f, n, true),
        _ => write!(f, "{}", factor),
    }
}

/// Writes the given factors joined by `*`.
fn fmt_factors(f: &mut fmt::Formatter, factors: &[Expr]) -> fmt::Result {
    let mut iter = factors.iter();
    if let Some(first) = iter.next() {
        fmt_factor(f, first)?;
        for factor in iter {
            write!(f, "*")?;
            fmt_factor(f, factor)?;
        }
    }
    Ok(())
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                    for term in iter {
                        if term.is_negative_term() {
                            write!(f, " - {}", -term.clone())?;
                        } else {
                            write!(f, " + {}", term)?;
                        }
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                // split the product into a numerator and a denominator
                let mut coefficient = rat(1);
                let mut numerator = Vec::new();
                let mut denominator = Vec::new();
                for factor in factors {
                    match factor {
                        Expr::Primary(Primary::Number(n)) => coefficient *= n,
                        Expr::Exp(base, exp) if exp.as_number().map_or(false, |n| n.cmp0() == Ordering::Less) => {
                            let exp = -exp.as_number().cloned().unwrap_or_else(|| rat(-1));
                            if exp == 1 {
                                denominator.push((**base).clone());
                            } else {
                                denominator.push((**base).clone().pow(Expr::number(exp)));
                            }
                        },
                        factor => numerator.push(factor.clone()),
                    }
                }

                if coefficient.cmp0() == Ordering::Less {
                    write!(f, "-")?;
                    coefficient = -coefficient;
                }
                let (coeff_numer, coeff_denom) = coefficient.into_numer_denom();
                if coeff_denom != 1 {
                    denominator.insert(0, Expr::number(Rational::from(coeff_denom)));
                }
                if coeff_numer != 1 || numerator.is_empty() {
                    numerator.insert(0, Expr::number(Rational::from(coeff_numer)));
                }

                fmt_factors(f, &numerator)?;
                if !denominator.is_empty() {
                    write!(f, " / ")?;
                    // a single sum is already parenthesized by `fmt_factor`
                    match denominator.as_slice() {
                        [Expr::Mul(_)] | [_, _, ..] => {
                            write!(f, "(")?;
                            fmt_factors(f, &denominator)?;
                            write!(f, ")")?;
                        },
                        _ => fmt_factors(f, &denominator)?,
                    }
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                if exp.as_number().map_or(false, |n| *n == rat((1, 2))) {
                    return write!(f, "sqrt({})", base);
                }

                if exp.as_number().map_or(false, |n| *n == -1) {
                    write!(f, "1 / ")?;
                    return match **base {
                        Expr::Add(_) | Expr::Mul(_) => write!(f, "({})", base),
                        _ => fmt_factor(f, base),
                    };
                }

                match &**base {
                    Expr::Add(_) | Expr::Mul(_) | Expr::Exp(..) => write!(f, "({})", base)?,
                    Expr::Primary(Primary::Number(n)) => fmt_number(f, n, true)?,
                    base => write!(f, "{}", base)?,
                }
                write!(f, "^")?;
                match &**exp {
                    Expr::Primary(Primary::Number(n)) => fmt_number(f, n, true),
                    Expr::Primary(_) => write!(f, "{}", exp),
                    exp => write!(f, "({})", exp),
                }
            },
        }
    }
}

/// Adds two [`Expr`]s together. No simplification is done, except for the case where both
/// operands are numbers, which are added together, or where the operands are a mix of
/// [`Primary`] and / or [`Expr::Add`], in which case both are combined in one list of terms
/// (flattening).
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Primary(Primary::Number(lhs)), Self::Primary(Primary::Number(rhs))) => {
                Self::number(lhs + rhs)
            },
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) => {
                terms.push(other);
                Self::Add(terms)
            },
            (other, Self::Add(mut terms)) => {
                terms.insert(0, other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

impl AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::integer(0));
        *self = lhs + rhs;
    }
}

impl Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

/// Multiplies two [`Expr`]s together. No simplification is done, except for the case where both
/// operands are numbers, or where the operands are a mix of [`Primary`] and / or [`Expr::Mul`],
/// in which case both are combined in one list of factors (flattening).
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Primary(Primary::Number(lhs)), Self::Primary(Primary::Number(rhs))) => {
                Self::number(lhs * rhs)
            },
            (Self::Mul(mut factors), Self::Mul(other)) => {
                factors.extend(other);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (other, Self::Mul(mut factors)) => {
                factors.insert(0, other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::integer(1));
        *self = lhs * rhs;
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is a number or a product with a numeric factor, in which case the number is negated.
impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Number(n)) => Self::number(-n),
            Self::Mul(mut factors) => {
                match factors.iter().position(Expr::is_number) {
                    Some(idx) => {
                        let n = factors.remove(idx).into_number().unwrap_or_else(|| rat(1));
                        let negated = -n;
                        if negated != 1 {
                            factors.insert(idx, Self::number(negated));
                        }
                        Self::Mul(factors).downgrade()
                    },
                    None => {
                        factors.insert(0, Self::integer(-1));
                        Self::Mul(factors)
                    },
                }
            },
            expr => Self::integer(-1) * expr,
        }
    }
}

/// NOTE: Strict equality allows different orderings of terms and factors, but
/// `pretty_assertions` prints the difference as if order mattered. If a test fails, the diff may
/// show terms that are actually present in both expressions.
#[cfg(test)]
mod tests {
    use curvy_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    /// Parse the given expression and return the [`Expr`] representation.
    fn parse_expr(input: &str) -> Expr {
        let expr = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        Expr::from_ast(&expr, "x").unwrap()
    }

    #[test]
    fn strict_equality() {
        let a = parse_expr("2*(x + (pi - 5))");
        let b = parse_expr("(pi - 5 + x) * 2");
        assert_eq!(a, b);
    }

    #[test]
    fn strict_equality_2() {
        // these are NOT strictly equal (but are semantically equal)
        let a = parse_expr("2*(x + (pi - 5))");
        let b = parse_expr("2*x + 2*pi - 10");
        assert_ne!(a, b);
    }

    #[test]
    fn simple_expr() {
        let expr = parse_expr("x^2 + 5*x + 6");

        assert_eq!(expr, Expr::Add(vec![
            Expr::symbol("x").pow(Expr::integer(2)),
            Expr::Mul(vec![Expr::integer(5), Expr::symbol("x")]),
            Expr::integer(6),
        ]));
    }

    #[test]
    fn subtraction_and_division() {
        let expr = parse_expr("x - 4/x");

        assert_eq!(expr, Expr::Add(vec![
            Expr::symbol("x"),
            Expr::Mul(vec![
                Expr::integer(-4),
                Expr::symbol("x").recip(),
            ]),
        ]));
    }

    #[test]
    fn decimal_literals_are_exact() {
        assert_eq!(parse_expr("0.25"), Expr::number(rat((1, 4))));
    }

    #[test]
    fn coefficient_split() {
        let expr = parse_expr("3*x*sin(x)/2");
        let (coefficient, rest) = expr.split_coefficient();

        assert_eq!(coefficient, rat((3, 2)));
        assert_eq!(rest, Expr::Mul(vec![
            Expr::symbol("x"),
            Expr::call("sin", vec![Expr::symbol("x")]),
        ]));
    }

    #[test]
    fn iterates_call_arguments() {
        let expr = parse_expr("sin(x^2)");
        let visited = expr.post_order_iter().map(|e| e.to_string()).collect::<Vec<_>>();

        assert_eq!(visited, vec!["x", "2", "x^2", "sin(x^2)"]);
        assert!(expr.contains_symbol("x"));
        assert!(!expr.contains_symbol("pi"));
    }

    #[test]
    fn fmt_polynomial() {
        let expr = Expr::Add(vec![
            Expr::symbol("x").pow(Expr::integer(2)),
            Expr::Mul(vec![Expr::integer(-3), Expr::symbol("x")]),
            Expr::integer(-4),
        ]);

        assert_eq!(expr.to_string(), "x^2 - 3*x - 4");
    }

    #[test]
    fn fmt_fraction() {
        let expr = parse_expr("(x^3 + 2*x^2) / (x^2 - 1)");
        assert_eq!(expr.to_string(), "(x^3 + 2*x^2) / (x^2 - 1)");
    }

    #[test]
    fn fmt_sum_in_denominator() {
        let expr = parse_expr("x^3 / (x^2 + 1)");
        assert_eq!(expr.to_string(), "x^3 / (x^2 + 1)");

        let expr = parse_expr("1 / (x*(x + 1))");
        assert_eq!(expr.to_string(), "1 / (x*(x + 1))");
    }

    #[test]
    fn fmt_rational_coefficient() {
        let expr = Expr::Mul(vec![Expr::number(rat((-3, 2))), Expr::symbol("x")]);
        assert_eq!(expr.to_string(), "-3*x / 2");
    }

    #[test]
    fn fmt_sqrt_and_reciprocal() {
        let expr = parse_expr("sqrt(x + 1)");
        assert_eq!(expr.to_string(), "sqrt(x + 1)");

        let expr = Expr::symbol("x").recip();
        assert_eq!(expr.to_string(), "1 / x");
    }
}
