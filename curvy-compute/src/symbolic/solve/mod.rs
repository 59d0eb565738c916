//! Real solutions of `expr = 0`.
//!
//! Rational functions are solved exactly: the numerator is made square-free, rational roots are
//! found with the rational root theorem, a remaining quadratic is solved with its discriminant,
//! and anything of higher degree is isolated with a [Sturm sequence](sturm).
//!
//! Other expressions are decomposed structurally. A product is zero when one of its factors is,
//! `u^c` is zero when `u` is (for positive `c`), `e^u` is never zero, `log(u)` is zero when `u` is
//! one, and a sum with a single term depending on the variable is solved by inverting that term.
//! When nothing applies, the roots are searched for [numerically](numeric) over the analysis
//! window, unless that is disabled.
//!
//! Complex solutions are never reported.

pub mod numeric;
pub mod sturm;

use crate::consts::E;
use crate::numerical::{eval, eval_const};
use crate::primitive::{exact_root, int, is_integer, rat};
use log::{debug, trace};
use rug::{Integer, Rational};
use std::cmp::Ordering;
use super::{
    error::Unsolvable,
    expr::{Expr, Primary},
    poly::Poly,
    rational::RationalFunction,
    simplify::simplify,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Two solutions closer than this are considered the same.
pub const DEDUP_TOLERANCE: f64 = 1e-9;

/// The rational root theorem is skipped for polynomials whose constant or leading coefficient is
/// larger than this in magnitude. Sturm isolation still finds the roots.
const MAX_RATIONAL_ROOT_COEFF: u64 = 1_000_000_000;

/// The maximum number of candidates the rational root theorem will try.
const MAX_RATIONAL_ROOT_CANDIDATES: usize = 20_000;

/// How deep structural decomposition may recurse before falling back to a numeric search.
const MAX_DEPTH: usize = 16;

/// A real solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Root {
    /// The value of the solution.
    pub value: f64,

    /// The exact solution, if it is known.
    pub exact: Option<Expr>,
}

impl Root {
    /// Creates a root with no exact form.
    pub fn approximate(value: f64) -> Self {
        Self { value, exact: None }
    }

    /// Creates an exact rational root.
    pub fn rational(value: Rational) -> Self {
        Self { value: value.to_f64(), exact: Some(Expr::number(value)) }
    }
}

/// Options that control how equations are solved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    /// The interval searched by the numeric fallback.
    pub window: (f64, f64),

    /// Whether to search for roots numerically when no symbolic method applies. When disabled,
    /// such equations are an error.
    pub numeric_fallback: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            window: (-10.0, 10.0),
            numeric_fallback: true,
        }
    }
}

/// Returns the distinct real roots of `expr` in the variable `var`, sorted in ascending order.
///
/// Roots where `expr` itself is undefined are dropped. If `expr` is identically zero, no roots
/// are returned.
pub fn solve(expr: &Expr, var: &str, options: &SolveOptions) -> Result<Vec<Root>, Unsolvable> {
    let mut roots = Solver { var, options }.solve(expr, 0)?;

    roots.retain(|root| {
        root.value.is_finite() && eval(expr, var, root.value).map_or(false, f64::is_finite)
    });
    let roots = dedup_roots(roots);
    debug!("roots of `{}`: {:?}", expr, roots.iter().map(|root| root.value).collect::<Vec<_>>());
    Ok(roots)
}

/// Sorts roots and merges those closer than [`DEDUP_TOLERANCE`], preferring exact roots.
pub fn dedup_roots(mut roots: Vec<Root>) -> Vec<Root> {
    roots.sort_by(|a, b| a.value.total_cmp(&b.value));

    let mut result: Vec<Root> = Vec::with_capacity(roots.len());
    for root in roots {
        match result.last_mut() {
            Some(last) if (root.value - last.value).abs() <= DEDUP_TOLERANCE => {
                if last.exact.is_none() && root.exact.is_some() {
                    *last = root;
                }
            },
            _ => result.push(root),
        }
    }
    result
}

/// Returns the distinct real roots of a polynomial, with exact forms where possible.
pub fn polynomial_roots(p: &Poly) -> Vec<Root> {
    if p.is_constant() {
        return Vec::new();
    }

    let mut remaining = p.square_free();
    let mut roots = Vec::new();

    for candidate in rational_root_candidates(&remaining) {
        if remaining.is_constant() {
            break;
        }
        if remaining.sign_at(&candidate) == Ordering::Equal {
            if let Some((quotient, _)) = remaining.div_rem(&Poly::linear_factor(&candidate)) {
                remaining = quotient;
            }
            roots.push(Root::rational(candidate));
        }
    }

    match remaining.degree() {
        Some(1) => {
            let root = -remaining.coeff(0) / remaining.coeff(1);
            roots.push(Root::rational(root));
        },
        Some(2) => roots.extend(quadratic_roots(&remaining)),
        Some(_) => roots.extend(sturm::isolate_real_roots(&remaining).into_iter().map(Root::approximate)),
        None => {},
    }

    dedup_roots(roots)
}

/// Lists the candidates `±p/q` of the rational root theorem, where `p` divides the constant term
/// and `q` divides the leading coefficient. Returns no candidates if the coefficients are too
/// large.
fn rational_root_candidates(p: &Poly) -> Vec<Rational> {
    let coeffs = p.integer_coeffs();
    let mut candidates = Vec::new();

    // strip the root x = 0 first, so that the constant term is non-zero
    let Some(lowest) = coeffs.iter().position(|c| c.cmp0() != Ordering::Equal) else {
        return candidates;
    };
    if lowest > 0 {
        candidates.push(rat(0));
    }

    let (Some(constant), Some(leading)) = (coeffs.get(lowest), coeffs.last()) else {
        return candidates;
    };
    let (Some(numers), Some(denoms)) = (divisors(constant), divisors(leading)) else {
        return candidates;
    };
    if numers.len() * denoms.len() > MAX_RATIONAL_ROOT_CANDIDATES {
        return candidates;
    }

    for numer in &numers {
        for denom in &denoms {
            let candidate = Rational::from((numer.clone(), denom.clone()));
            if *candidate.denom() != *denom {
                // not in lowest terms; the reduced form is tried separately
                continue;
            }
            candidates.push(-candidate.clone());
            candidates.push(candidate);
        }
    }
    candidates
}

/// Returns the positive divisors of `n`, or [`None`] if `n` is too large.
fn divisors(n: &Integer) -> Option<Vec<Integer>> {
    let n = n.clone().abs().to_u64().filter(|&n| n <= MAX_RATIONAL_ROOT_COEFF)?;
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            small.push(int(d));
            if d * d != n {
                large.push(int(n / d));
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    Some(small)
}

/// Solves `a x^2 + b x + c = 0` exactly, writing irrational roots as `p ± q*sqrt(r)`.
fn quadratic_roots(p: &Poly) -> Vec<Root> {
    let (c, b, a) = (p.coeff(0), p.coeff(1), p.coeff(2));
    let discriminant = b.clone() * &b - rat(4) * a.clone() * &c;
    let two_a = rat(2) * a;
    let center = -b / &two_a;

    match discriminant.cmp0() {
        Ordering::Less => Vec::new(),
        Ordering::Equal => vec![Root::rational(center)],
        Ordering::Greater => {
            // sqrt(n/d) = sqrt(n*d) / d = s * sqrt(r) / d
            let radicand = discriminant.numer().clone() * discriminant.denom();
            let (outside, inside) = extract_square(&radicand);
            let scale = Rational::from((outside, discriminant.denom().clone())) / &two_a;
            let spread = scale.to_f64().abs() * inside.to_f64().sqrt();

            let surd = Expr::number(Rational::from(inside)).sqrt();
            [-1, 1].into_iter()
                .map(|sign| {
                    let coefficient = scale.clone() * rat(sign);
                    let exact = Expr::number(center.clone())
                        + Expr::Mul(vec![Expr::number(coefficient.clone()), surd.clone()]);
                    let value = center.to_f64() + spread * if coefficient.cmp0() == Ordering::Less { -1.0 } else { 1.0 };
                    Root { value, exact: Some(simplify(&exact)) }
                })
                .collect()
        },
    }
}

/// Writes a positive integer `n` as `s^2 * r`, returning `(s, r)`. Only factors up to `10^5` are
/// extracted.
fn extract_square(n: &Integer) -> (Integer, Integer) {
    let mut outside = int(1);
    let mut inside = n.clone();
    let mut k = int(2);
    while k <= 100_000 {
        let square = k.clone() * &k;
        if square > inside {
            break;
        }
        while inside.is_divisible(&square) {
            inside /= &square;
            outside *= &k;
        }
        k += 1;
    }
    if let Some(root) = exact_root(&inside, 2) {
        outside *= root;
        inside = int(1);
    }
    (outside, inside)
}

/// Solves equations by decomposing them structurally.
struct Solver<'a> {
    var: &'a str,
    options: &'a SolveOptions,
}

impl Solver<'_> {
    fn solve(&self, expr: &Expr, depth: usize) -> Result<Vec<Root>, Unsolvable> {
        trace!("solving `{} = 0`", expr);
        if !expr.contains_symbol(self.var) {
            // a non-zero constant has no roots; an identically zero one is reported as none too
            return Ok(Vec::new());
        }

        if let Some(function) = RationalFunction::from_expr(expr, self.var) {
            return Ok(polynomial_roots(&function.num));
        }

        if depth >= MAX_DEPTH {
            return self.numeric(expr);
        }

        match expr {
            Expr::Mul(factors) => {
                let mut roots = Vec::new();
                for factor in factors.iter().filter(|factor| factor.contains_symbol(self.var)) {
                    roots.extend(self.solve(factor, depth + 1)?);
                }
                Ok(roots)
            },
            Expr::Exp(base, exp) => {
                if !exp.contains_symbol(self.var) {
                    // u^c is zero exactly when u is, for positive c
                    match eval_const(exp) {
                        Ok(c) if c > 0.0 => self.solve(base, depth + 1),
                        Ok(_) => Ok(Vec::new()),
                        Err(_) => self.numeric(expr),
                    }
                } else if !base.contains_symbol(self.var) {
                    // a^v is never zero for positive a
                    match eval_const(base) {
                        Ok(a) if a > 0.0 => Ok(Vec::new()),
                        _ => self.numeric(expr),
                    }
                } else {
                    self.numeric(expr)
                }
            },
            Expr::Primary(Primary::Call(name, args)) => match (name.as_str(), args.as_slice()) {
                ("log", [u]) | ("acos", [u]) => {
                    self.solve(&simplify(&(u.clone() + Expr::integer(-1))), depth + 1)
                },
                ("abs" | "asin" | "atan", [u]) => self.solve(u, depth + 1),
                _ => self.numeric(expr),
            },
            Expr::Add(terms) => {
                let (varying, constant): (Vec<_>, Vec<_>) = terms.iter()
                    .cloned()
                    .partition(|term| term.contains_symbol(self.var));
                match varying.as_slice() {
                    [term] => {
                        let target = simplify(&-Expr::Add(constant).downgrade());
                        self.invert(term, &target, depth + 1)
                    },
                    _ => self.numeric(expr),
                }
            },
            Expr::Primary(_) => Ok(Vec::new()),
        }
    }

    /// Solves `term = target`, where `target` does not depend on the variable.
    fn invert(&self, term: &Expr, target: &Expr, depth: usize) -> Result<Vec<Root>, Unsolvable> {
        let Ok(value) = eval_const(target) else {
            return self.numeric(&(term.clone() - target.clone()));
        };
        if !value.is_finite() {
            return Ok(Vec::new());
        }

        // solves `u = new_target`
        let solve_for = |u: &Expr, new_target: Expr| {
            self.solve(&simplify(&(u.clone() - new_target)), depth + 1)
        };

        match term {
            Expr::Primary(Primary::Symbol(sym)) if sym == self.var => Ok(vec![Root {
                value,
                exact: Some(target.clone()),
            }]),
            Expr::Mul(factors) => {
                let (varying, constant): (Vec<_>, Vec<_>) = factors.iter()
                    .cloned()
                    .partition(|factor| factor.contains_symbol(self.var));
                let constant = Expr::Mul(constant).downgrade();
                match (varying.as_slice(), eval_const(&constant)) {
                    ([u], Ok(k)) if k != 0.0 => solve_for(u, target.clone() * constant.recip()),
                    _ => self.numeric(&(term.clone() - target.clone())),
                }
            },
            Expr::Exp(base, exp) if !base.contains_symbol(self.var) => {
                // a^u = c => u = log(c) / log(a)
                match eval_const(base) {
                    Ok(a) if a > 0.0 && a != 1.0 => {
                        if value <= 0.0 {
                            return Ok(Vec::new());
                        }
                        let log_target = Expr::call("log", vec![target.clone()]);
                        let exponent = if base.as_symbol() == Some(E) {
                            log_target
                        } else {
                            log_target * Expr::call("log", vec![(**base).clone()]).recip()
                        };
                        solve_for(exp, exponent)
                    },
                    _ => self.numeric(&(term.clone() - target.clone())),
                }
            },
            Expr::Exp(base, exp) if !exp.contains_symbol(self.var) => {
                let Some(n) = exp.as_number().filter(|n| n.cmp0() != Ordering::Equal) else {
                    return self.numeric(&(term.clone() - target.clone()));
                };
                let root_of_target = target.clone().pow(Expr::number(rat(1) / n));
                if is_integer(n) && n.numer().is_even() {
                    // u^n = c has two real solutions for positive c
                    match value.partial_cmp(&0.0) {
                        Some(Ordering::Greater) => {
                            let mut roots = solve_for(base, root_of_target.clone())?;
                            roots.extend(solve_for(base, -root_of_target)?);
                            Ok(roots)
                        },
                        Some(Ordering::Equal) => self.solve(base, depth),
                        _ => Ok(Vec::new()),
                    }
                } else if is_integer(n) {
                    // odd powers are invertible, but real odd roots of negative numbers are
                    // written as -(|c|^(1/n))
                    if value < 0.0 {
                        solve_for(base, -((-target.clone()).pow(Expr::number(rat(1) / n))))
                    } else {
                        solve_for(base, root_of_target)
                    }
                } else if value >= 0.0 {
                    solve_for(base, root_of_target)
                } else {
                    Ok(Vec::new())
                }
            },
            Expr::Primary(Primary::Call(name, args)) => {
                let [u] = args.as_slice() else {
                    return self.numeric(&(term.clone() - target.clone()));
                };
                let half_pi = std::f64::consts::FRAC_PI_2;
                let call = |name: &str| Expr::call(name, vec![target.clone()]);
                match name.as_str() {
                    "log" => solve_for(u, Expr::symbol(E).pow(target.clone())),
                    "asin" if value.abs() <= half_pi => solve_for(u, call("sin")),
                    "acos" if (0.0..=std::f64::consts::PI).contains(&value) => solve_for(u, call("cos")),
                    "atan" if value.abs() < half_pi => solve_for(u, call("tan")),
                    "asin" | "acos" | "atan" => Ok(Vec::new()),
                    "abs" if value > 0.0 => {
                        let mut roots = solve_for(u, target.clone())?;
                        roots.extend(solve_for(u, -target.clone())?);
                        Ok(roots)
                    },
                    "abs" if value == 0.0 => self.solve(u, depth),
                    "abs" => Ok(Vec::new()),
                    _ => self.numeric(&(term.clone() - target.clone())),
                }
            },
            _ => self.numeric(&(term.clone() - target.clone())),
        }
    }

    /// Searches for roots numerically, if allowed.
    fn numeric(&self, expr: &Expr) -> Result<Vec<Root>, Unsolvable> {
        if !self.options.numeric_fallback {
            return Err(Unsolvable { equation: expr.to_string() });
        }

        debug!("no symbolic method for `{} = 0`, searching numerically", expr);
        let roots = numeric::scan_roots(expr, self.var, self.options.window)
            .map_err(|_| Unsolvable { equation: expr.to_string() })?;
        Ok(roots.into_iter().map(Root::approximate).collect())
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use curvy_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(input: &str) -> Expr {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        simplify(&Expr::from_ast(&ast, "x").unwrap())
    }

    fn roots_of(input: &str) -> Vec<f64> {
        solve(&parse(input), "x", &SolveOptions::default())
            .unwrap()
            .into_iter()
            .map(|root| root.value)
            .collect()
    }

    fn assert_roots(input: &str, expected: &[f64]) {
        let roots = roots_of(input);
        assert_eq!(roots.len(), expected.len(), "roots of `{}` were {:?}", input, roots);
        for (root, expected) in roots.iter().zip(expected) {
            assert_float_absolute_eq!(*root, *expected, 1e-9);
        }
    }

    #[test]
    fn rational_roots() {
        assert_roots("x**2 - 4", &[-2.0, 2.0]);
        assert_roots("(x - 1)^3 * (2*x + 1)", &[-0.5, 1.0]);
        assert_roots("x^3 - x", &[-1.0, 0.0, 1.0]);
    }

    #[test]
    fn exact_forms() {
        let roots = solve(&parse("x^2 - 4"), "x", &SolveOptions::default()).unwrap();
        assert_eq!(roots[0].exact, Some(Expr::integer(-2)));
        assert_eq!(roots[1].exact, Some(Expr::integer(2)));
    }

    #[test]
    fn quadratic_surds() {
        let roots = solve(&parse("x^2 - 2*x - 1"), "x", &SolveOptions::default()).unwrap();
        assert_eq!(roots.len(), 2);
        assert_float_absolute_eq!(roots[0].value, 1.0 - 2f64.sqrt(), 1e-12);
        assert_float_absolute_eq!(roots[1].value, 1.0 + 2f64.sqrt(), 1e-12);
        assert_eq!(roots[1].exact.as_ref().map(ToString::to_string).as_deref(), Some("1 + sqrt(2)"));
    }

    #[test]
    fn no_real_roots() {
        assert_roots("x^2 + 1", &[]);
        assert_roots("1/x", &[]);
        assert_roots("exp(x)", &[]);
    }

    #[test]
    fn higher_degree() {
        // x^5 - 3x + 1 has three real roots
        assert_eq!(roots_of("x^5 - 3*x + 1").len(), 3);
    }

    #[test]
    fn identically_zero() {
        assert_roots("x - x", &[]);
    }

    #[test]
    fn roots_of_rational_function() {
        // the factor x - 1 cancels, and x = 1 is not in the domain anyway
        assert_roots("(x^2 - 1)/(x - 1)", &[-1.0]);
        assert_roots("(x**3 + 2*x**2) / (x**2 - 1)", &[-2.0, 0.0]);
    }

    #[test]
    fn logarithm_and_exponential() {
        assert_roots("log(x)", &[1.0]);
        assert_roots("log(x^2 - 3)", &[-2.0, 2.0]);
        assert_roots("exp(x) - 2", &[2f64.ln()]);
        assert_roots("sqrt(x) - 3", &[9.0]);
    }

    #[test]
    fn products() {
        assert_roots("x * exp(x)", &[0.0]);
        assert_roots("(x - 3) * log(x)", &[1.0, 3.0]);
    }

    #[test]
    fn undefined_roots_are_dropped() {
        // sin(x)/x has a removable singularity at 0
        let roots = roots_of("sin(x) / x");
        assert!(roots.iter().all(|root| root.abs() > 1.0));
        assert_eq!(roots.len(), 6);
    }

    #[test]
    fn numeric_fallback_can_be_disabled() {
        let options = SolveOptions { numeric_fallback: false, ..Default::default() };
        let err = solve(&parse("sin(x) - x/2"), "x", &options).unwrap_err();
        assert!(err.equation.contains("sin(x)"));

        // exact methods still work
        assert!(solve(&parse("x^2 - 4"), "x", &options).is_ok());
    }
}
