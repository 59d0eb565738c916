//! Numeric root search over a bounded window, used when no symbolic method applies.

use crate::numerical::eval;
use crate::symbolic::expr::Expr;
use curvy_error::Error;

/// The number of subintervals the window is split into when scanning for sign changes.
const SCAN_STEPS: usize = 4000;

/// The number of bisections used to refine a sign change.
const BISECTIONS: usize = 100;

/// A refined sign change is only accepted as a root if the expression is this close to zero
/// there. Sign changes across poles, such as in `1/x`, fail this check.
const RESIDUAL_TOLERANCE: f64 = 1e-6;

/// Rounding error allowed when the terms of a sum cancel, in multiples of the machine epsilon.
const CANCELLATION_ULPS: f64 = 64.0;

#[derive(Debug, Clone, Copy)]
struct Sample {
    x: f64,
    y: f64,

    /// True if `y` is zero up to the rounding error of cancelling terms.
    zero: bool,
}

impl Sample {
    fn at(expr: &Expr, var: &str, x: f64) -> Result<Self, Error> {
        let y = eval(expr, var, x)?;
        let magnitude = match expr {
            Expr::Add(terms) => terms.iter()
                .map(|term| eval(term, var, x).map(f64::abs))
                .sum::<Result<f64, _>>()?,
            _ => y.abs(),
        };
        Ok(Self { x, y, zero: y.abs() <= CANCELLATION_ULPS * f64::EPSILON * magnitude })
    }
}

/// Finds the roots of `expr` in the closed window `[lo, hi]` by scanning for sign changes and
/// refining each one by bisection.
///
/// A scan point where the expression is zero is a root only if both of its neighbors are not. A
/// run of zeros is a stretch where the expression vanishes identically, such as the second
/// derivative of `abs(x)`, and yields no roots. Roots where the expression touches zero without
/// changing sign are only found if a scan point lands on them exactly.
pub fn scan_roots(expr: &Expr, var: &str, (lo, hi): (f64, f64)) -> Result<Vec<f64>, Error> {
    let step = (hi - lo) / SCAN_STEPS as f64;
    let samples = (0..=SCAN_STEPS)
        .map(|i| {
            let x = if i == SCAN_STEPS { hi } else { lo + step * i as f64 };
            Sample::at(expr, var, x)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let f = |x: f64| eval(expr, var, x);
    let mut roots = Vec::new();
    let mut i = 0;
    while i < samples.len() {
        let sample = samples[i];
        if sample.zero {
            let run = samples[i..].iter().take_while(|next| next.zero).count();
            if run == 1 {
                roots.push(sample.x);
            }
            i += run;
            continue;
        }

        if let Some(prev) = i.checked_sub(1).map(|j| samples[j]) {
            let finite = prev.y.is_finite() && sample.y.is_finite();
            if finite && !prev.zero && (prev.y < 0.0) != (sample.y < 0.0) {
                let root = bisect(&f, prev.x, sample.x, prev.y)?;
                if f(root)?.abs() <= RESIDUAL_TOLERANCE {
                    roots.push(root);
                }
            }
        }
        i += 1;
    }

    Ok(roots)
}

/// Bisects `[a, b]`, where `f(a)` has sign `fa` and `f(b)` has the opposite sign.
fn bisect(f: &impl Fn(f64) -> Result<f64, Error>, mut a: f64, mut b: f64, fa: f64) -> Result<f64, Error> {
    let a_negative = fa < 0.0;
    for _ in 0..BISECTIONS {
        let mid = 0.5 * (a + b);
        let y = f(mid)?;
        if y == 0.0 {
            return Ok(mid);
        }
        // NaN keeps the left half
        if (y < 0.0) == a_negative {
            a = mid;
        } else {
            b = mid;
        }
    }
    Ok(0.5 * (a + b))
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use std::f64::consts::PI;
    use curvy_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use super::*;

    fn parse(input: &str) -> Expr {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        Expr::from_ast(&ast, "x").unwrap()
    }

    #[test]
    fn sine_roots() {
        let expr = Expr::call("sin", vec![Expr::symbol("x")]);
        let roots = scan_roots(&expr, "x", (-4.0, 4.0)).unwrap();

        assert_eq!(roots.len(), 3);
        assert_float_absolute_eq!(roots[0], -PI, 1e-9);
        assert_float_absolute_eq!(roots[1], 0.0, 1e-9);
        assert_float_absolute_eq!(roots[2], PI, 1e-9);
    }

    #[test]
    fn vanishing_stretches_have_no_roots() {
        // the second derivative of abs(x), zero everywhere up to rounding
        let expr = parse("1/abs(x) - x^2/abs(x)^3");
        assert!(scan_roots(&expr, "x", (-10.0, 10.0)).unwrap().is_empty());

        // zero on all of [0, 2]
        let expr = parse("abs(x) - x");
        assert!(scan_roots(&expr, "x", (-2.0, 2.0)).unwrap().is_empty());
    }

    #[test]
    fn poles_are_not_roots() {
        let expr = Expr::symbol("x").recip();
        assert!(scan_roots(&expr, "x", (-1.0, 1.5)).unwrap().is_empty());
    }
}
